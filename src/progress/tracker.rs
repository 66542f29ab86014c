// src/progress/tracker.rs

use tracing::debug;

use crate::errors::ProgressError;
use crate::matcher::{MatchResult, RuleKind};
use crate::progress::handlers::{capture, on_block_progress, on_frame_progress, on_render_pass};
use crate::progress::state::EngineState;
use crate::types::{FrameRange, RenderEvent};

/// Turns matched renderer lines into normalized progress and status events.
///
/// One tracker is built per render task and dropped when the task ends.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    range: FrameRange,
    state: EngineState,
}

impl ProgressTracker {
    pub fn new(range: FrameRange) -> Self {
        Self {
            range,
            state: EngineState::default(),
        }
    }

    /// Resume tracking from a previously captured state.
    pub fn with_state(range: FrameRange, state: EngineState) -> Self {
        Self { range, state }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn last_progress(&self) -> f64 {
        self.state.last_progress_percent
    }

    /// Route a classified line to the matching progress handler.
    ///
    /// Error-marker matches carry no progress and yield no events; they are
    /// handled by [`crate::failure::FailureDetector`].
    pub fn apply(&mut self, m: &MatchResult) -> Result<Vec<RenderEvent>, ProgressError> {
        let rule = m.kind().name();

        match m.kind() {
            RuleKind::Frame(variant) => {
                let frame: i64 = capture(m, rule, 1)?;
                Ok(on_frame_progress(
                    &mut self.state,
                    self.range,
                    variant,
                    frame,
                    m.matched(),
                ))
            }
            RuleKind::Pass(variant) => on_render_pass(&mut self.state, self.range, variant, m),
            RuleKind::BlockRendered => {
                let completed: u64 = capture(m, rule, 1)?;
                let total: u64 = capture(m, rule, 2)?;
                on_block_progress(&mut self.state, self.range, completed, total)
            }
            RuleKind::Error => {
                debug!("error marker passed to progress tracker; ignoring");
                Ok(Vec::new())
            }
        }
    }
}
