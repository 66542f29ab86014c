#![allow(dead_code)]

pub use renderwatch_test_utils::builders;
pub use renderwatch_test_utils::recording_sink::RecordingSink;
pub use renderwatch_test_utils::{init_tracing, with_timeout};

use renderwatch::types::RenderEvent;

/// Assert two percentages are equal within floating-point noise.
pub fn assert_percent(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected progress {expected}, got {actual}"
    );
}

/// The single `SetProgress` value in `events`, if exactly one is present.
pub fn only_progress(events: &[RenderEvent]) -> Option<f64> {
    let values: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            RenderEvent::SetProgress(p) => Some(*p),
            _ => None,
        })
        .collect();
    match values.as_slice() {
        [p] => Some(*p),
        _ => None,
    }
}
