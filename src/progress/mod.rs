// src/progress/mod.rs

//! Progress extraction.
//!
//! [`ProgressTracker`] owns the per-task [`EngineState`] and dispatches
//! classified lines to the handlers in [`handlers`]:
//!
//! - Katana frame lines drive multi-frame progress.
//! - Arnold pass lines drive status, and progress for single-frame tasks.
//! - Redshift block lines give fractional progress within the current frame.

pub mod handlers;
pub mod state;
pub mod tracker;

pub use handlers::{clamp_percent, trailing_text};
pub use state::EngineState;
pub use tracker::ProgressTracker;
