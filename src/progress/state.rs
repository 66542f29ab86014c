// src/progress/state.rs

/// Mutable per-task progress state.
///
/// Owned by [`super::ProgressTracker`] for the lifetime of one render task;
/// the handler functions in [`super::handlers`] take it explicitly so each
/// update can be exercised on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    /// Frames completed so far, relative to the range start. Never decreases.
    pub finished_frame_count: i64,
    /// Bounds of the active Arnold render pass (`1 of 1` until reported).
    pub pass_start: u32,
    pub pass_end: u32,
    /// Last Arnold `% done` value and the text that followed it.
    pub pass_percent: f64,
    pub pass_text: String,
    /// Most recent value sent as `SetProgress`; always within `[0, 100]`.
    pub last_progress_percent: f64,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            finished_frame_count: 0,
            pass_start: 1,
            pass_end: 1,
            pass_percent: 0.0,
            pass_text: String::new(),
            last_progress_percent: 0.0,
        }
    }
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed frame offset, keeping the count non-decreasing.
    pub(crate) fn record_finished_frames(&mut self, finished: i64) {
        if finished > self.finished_frame_count {
            self.finished_frame_count = finished;
        }
    }
}
