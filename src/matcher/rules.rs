// src/matcher/rules.rs

//! Built-in stdout grammars for Katana and its embedded renderers.
//!
//! Each constant is one independent grammar. They are written so that no
//! realistic line matches more than one of them; `LineMatcher` still applies
//! them first-match-wins in the order of [`KATANA_RULES`].

use std::fmt;

/// `Starting frame 3 ...`
pub const KATANA_FRAME_STARTING: &str = r".*Starting frame ([0-9]+).*";

/// `Frame 2 completed`
pub const KATANA_FRAME_COMPLETED: &str = r".*Frame ([0-9]+) completed.*";

/// `ERROR   | something went wrong`
pub const KATANA_ERROR: &str = r".*ERROR +\|.*";

/// `[kat] Starting render pass 1 of 3`
pub const ARNOLD_PASS_STARTING: &str =
    r".*\[kat\] Starting render pass ([0-9]+) of ([0-9]+).*";

/// `15% done - 2 rays/pixel`
pub const ARNOLD_PERCENT_DONE: &str = r"([0-9]+)(% done.*)";

/// `[kat] Finished render pass 1 of 3`
pub const ARNOLD_PASS_FINISHED: &str =
    r".*\[kat\] Finished render pass ([0-9]+) of ([0-9]+).*";

/// `Block 3/48 (2,0) rendered by GPU 0 in 12ms`
pub const REDSHIFT_BLOCK_RENDERED: &str = r"Block (\d+)/(\d+) .+ rendered";

/// Which side of a Katana frame a frame-progress line reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVariant {
    Starting,
    Completed,
}

/// Which phase of an Arnold render pass a line reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassVariant {
    Starting,
    Percent,
    Finished,
}

/// Handler tag attached to every match rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Katana frame sequencing.
    Frame(FrameVariant),
    /// Katana error marker; fatal.
    Error,
    /// Arnold render-pass progress.
    Pass(PassVariant),
    /// Redshift bucket/block completion.
    BlockRendered,
}

impl RuleKind {
    /// Stable short name, used in log fields and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Frame(FrameVariant::Starting) => "katana_frame_starting",
            RuleKind::Frame(FrameVariant::Completed) => "katana_frame_completed",
            RuleKind::Error => "katana_error",
            RuleKind::Pass(PassVariant::Starting) => "arnold_pass_starting",
            RuleKind::Pass(PassVariant::Percent) => "arnold_percent_done",
            RuleKind::Pass(PassVariant::Finished) => "arnold_pass_finished",
            RuleKind::BlockRendered => "redshift_block_rendered",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The default rule table, in priority order.
pub const KATANA_RULES: [(&str, RuleKind); 7] = [
    (
        KATANA_FRAME_STARTING,
        RuleKind::Frame(FrameVariant::Starting),
    ),
    (
        KATANA_FRAME_COMPLETED,
        RuleKind::Frame(FrameVariant::Completed),
    ),
    (KATANA_ERROR, RuleKind::Error),
    (ARNOLD_PASS_STARTING, RuleKind::Pass(PassVariant::Starting)),
    (ARNOLD_PERCENT_DONE, RuleKind::Pass(PassVariant::Percent)),
    (ARNOLD_PASS_FINISHED, RuleKind::Pass(PassVariant::Finished)),
    (REDSHIFT_BLOCK_RENDERED, RuleKind::BlockRendered),
];
