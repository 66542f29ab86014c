// tests/line_matcher.rs
mod common;
use crate::common::init_tracing;

use std::error::Error;

use renderwatch::matcher::{FrameVariant, LineMatcher, PassVariant, RuleKind};

type TestResult = Result<(), Box<dyn Error>>;

/// One representative line per built-in grammar.
const SAMPLES: [(&str, RuleKind); 7] = [
    ("Starting frame 3", RuleKind::Frame(FrameVariant::Starting)),
    ("Frame 2 completed", RuleKind::Frame(FrameVariant::Completed)),
    ("ERROR   | Failed to cook scene graph", RuleKind::Error),
    (
        "[kat] Starting render pass 1 of 3",
        RuleKind::Pass(PassVariant::Starting),
    ),
    (
        "00:00:05  1024MB  |   15% done - 2 rays/pixel",
        RuleKind::Pass(PassVariant::Percent),
    ),
    (
        "[kat] Finished render pass 1 of 3",
        RuleKind::Pass(PassVariant::Finished),
    ),
    (
        "Block 3/48 (2,0) rendered by GPU 0 in 12ms",
        RuleKind::BlockRendered,
    ),
];

#[test]
fn each_sample_line_is_classified_by_its_own_rule() -> TestResult {
    init_tracing();
    let matcher = LineMatcher::katana()?;

    for (line, expected) in SAMPLES {
        let m = matcher
            .classify(line)
            .ok_or_else(|| format!("no rule matched {line:?}"))?;
        assert_eq!(m.kind(), expected, "wrong rule for {line:?}");
        assert_eq!(m.line(), line);
    }
    Ok(())
}

#[test]
fn built_in_grammars_are_mutually_exclusive_on_samples() -> TestResult {
    init_tracing();
    let matcher = LineMatcher::katana()?;

    for (line, expected) in SAMPLES {
        assert_eq!(
            matcher.matching_kinds(line),
            vec![expected],
            "{line:?} matched more than one grammar"
        );
    }
    Ok(())
}

#[test]
fn captures_are_extracted_per_rule() -> TestResult {
    init_tracing();
    let matcher = LineMatcher::katana()?;

    let frame = matcher.classify("Frame 1042 completed in 12.3s").ok_or("no match")?;
    assert_eq!(frame.group(1), Some("1042"));
    assert_eq!(frame.matched(), "Frame 1042 completed in 12.3s");

    let pass = matcher
        .classify("[kat] Starting render pass 2 of 5")
        .ok_or("no match")?;
    assert_eq!(pass.group(1), Some("2"));
    assert_eq!(pass.group(2), Some("5"));
    assert_eq!(pass.capture_count(), 2);

    let percent = matcher
        .classify("00:01:12  2048MB  |   75% done - 8 rays/pixel")
        .ok_or("no match")?;
    assert_eq!(percent.group(1), Some("75"));
    assert_eq!(percent.group(2), Some("% done - 8 rays/pixel"));

    let block = matcher
        .classify("Block 12/64 (3,1) rendered by GPU 1 in 40ms")
        .ok_or("no match")?;
    assert_eq!(block.group(1), Some("12"));
    assert_eq!(block.group(2), Some("64"));
    Ok(())
}

#[test]
fn near_miss_lines_are_not_classified() -> TestResult {
    init_tracing();
    let matcher = LineMatcher::katana()?;

    let adversarial = [
        "",
        "starting frame 3",
        "Frame completed",
        "frame 2 completed",
        "error   | lowercase marker",
        "ERROR| no space before the bar",
        "[kat] Starting render pass one of three",
        "% done - no number",
        "15 % done",
        "Block 3/48 rendered",
        "Blocks 3/48 (0,0) were rendered",
        "Rendering frame 3",
        "[INFO] Katana 3.6v4 batch render",
    ];

    for line in adversarial {
        assert!(
            matcher.classify(line).is_none(),
            "{line:?} should not match any rule"
        );
    }
    Ok(())
}

#[test]
fn first_registered_rule_wins_on_overlap() -> TestResult {
    init_tracing();
    let matcher = LineMatcher::new()
        .with_rule(r"frame (\d+)", RuleKind::Frame(FrameVariant::Starting))?
        .with_rule(r"(\d+)", RuleKind::BlockRendered)?;

    let m = matcher.classify("frame 7").ok_or("no match")?;
    assert_eq!(m.kind(), RuleKind::Frame(FrameVariant::Starting));
    assert_eq!(
        matcher.matching_kinds("frame 7"),
        vec![
            RuleKind::Frame(FrameVariant::Starting),
            RuleKind::BlockRendered
        ]
    );
    Ok(())
}

#[test]
fn lines_mixing_grammars_match_every_involved_rule() -> TestResult {
    init_tracing();
    let matcher = LineMatcher::katana()?;

    let cases = [
        (
            "ERROR   | Frame 3 completed with errors",
            vec![RuleKind::Frame(FrameVariant::Completed), RuleKind::Error],
        ),
        (
            "ERROR   | Starting frame 3 failed",
            vec![RuleKind::Frame(FrameVariant::Starting), RuleKind::Error],
        ),
        (
            "ERROR   | Block 2/8 (0,0) rendered with NaN pixels",
            vec![RuleKind::Error, RuleKind::BlockRendered],
        ),
        (
            "Frame 4 completed, 100% done",
            vec![
                RuleKind::Frame(FrameVariant::Completed),
                RuleKind::Pass(PassVariant::Percent),
            ],
        ),
    ];

    for (line, expected) in cases {
        assert_eq!(matcher.matching_kinds(line), expected, "line {line:?}");
    }
    Ok(())
}

#[test]
fn table_order_decides_between_progress_grammars() -> TestResult {
    init_tracing();
    let matcher = LineMatcher::katana()?;

    let m = matcher
        .classify("Frame 4 completed, 100% done")
        .ok_or("no match")?;
    assert_eq!(m.kind(), RuleKind::Frame(FrameVariant::Completed));
    assert_eq!(m.group(1), Some("4"));

    let m = matcher
        .classify("ERROR   | Block 2/8 (0,0) rendered")
        .ok_or("no match")?;
    assert_eq!(m.kind(), RuleKind::Error);
    Ok(())
}

#[test]
fn invalid_pattern_is_rejected() {
    init_tracing();
    let result = LineMatcher::new().with_rule(r"Block (\d+", RuleKind::BlockRendered);
    assert!(result.is_err());
}

#[test]
fn katana_table_has_seven_rules_in_priority_order() -> TestResult {
    let matcher = LineMatcher::katana()?;
    let kinds: Vec<RuleKind> = matcher.rules().iter().map(|r| r.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            RuleKind::Frame(FrameVariant::Starting),
            RuleKind::Frame(FrameVariant::Completed),
            RuleKind::Error,
            RuleKind::Pass(PassVariant::Starting),
            RuleKind::Pass(PassVariant::Percent),
            RuleKind::Pass(PassVariant::Finished),
            RuleKind::BlockRendered,
        ]
    );
    Ok(())
}
