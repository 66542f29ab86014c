use std::fmt;

use crate::errors::{RenderwatchError, Result};

/// GPU device index as understood by the renderer and the worker.
pub type DeviceIndex = u32;

/// Inclusive frame range assigned to one render task.
///
/// Construction enforces `start <= end` and a frame count that fits in an
/// `i64`, so progress formulas never divide by zero or overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    start: i64,
    end: i64,
}

impl FrameRange {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(RenderwatchError::InvalidFrameRange { start, end });
        }
        if end.checked_sub(start).and_then(|d| d.checked_add(1)).is_none() {
            return Err(RenderwatchError::FrameRangeTooLarge { start, end });
        }
        Ok(Self { start, end })
    }

    /// A task rendering exactly one frame.
    pub fn single(frame: i64) -> Self {
        Self {
            start: frame,
            end: frame,
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of frames in the range (always >= 1).
    pub fn frame_count(&self) -> i64 {
        self.end - self.start + 1
    }

    pub fn is_single_frame(&self) -> bool {
        self.end == self.start
    }
}

impl fmt::Display for FrameRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Event sent back to the job-tracking supervisor.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    /// Task progress in percent, always within `[0, 100]`.
    SetProgress(f64),
    /// Human-readable status line for the job tracker.
    SetStatusMessage(String),
    /// Terminal failure; carries the reason verbatim.
    FailRender(String),
}

impl fmt::Display for RenderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderEvent::SetProgress(p) => write!(f, "PROGRESS {p:.2}"),
            RenderEvent::SetStatusMessage(msg) => write!(f, "STATUS {msg}"),
            RenderEvent::FailRender(reason) => write!(f, "FAIL {reason}"),
        }
    }
}
