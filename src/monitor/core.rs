// src/monitor/core.rs

//! Pure per-line monitor.
//!
//! [`StdoutMonitor`] wires the line matcher, the progress tracker and the
//! failure detector together. It performs no IO: callers hand it one line
//! at a time and forward the returned events. The async shell in
//! [`super::stream`] does exactly that for a live process.

use tracing::{debug, warn};

use crate::errors::Result;
use crate::failure::FailureDetector;
use crate::matcher::{LineMatcher, RuleKind};
use crate::progress::ProgressTracker;
use crate::types::{FrameRange, RenderEvent};

/// Counters and final state of one monitored task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorSummary {
    pub lines_read: u64,
    pub lines_matched: u64,
    /// Lines that matched a rule but could not be turned into progress.
    pub lines_rejected: u64,
    pub last_progress: f64,
    /// Reason of the terminal failure, if one was seen.
    pub failure: Option<String>,
}

/// Per-task stdout monitor.
#[derive(Debug, Clone)]
pub struct StdoutMonitor {
    matcher: LineMatcher,
    tracker: ProgressTracker,
    failure: FailureDetector,
    summary: MonitorSummary,
}

impl StdoutMonitor {
    /// Monitor with the built-in Katana / Arnold / Redshift rules.
    pub fn katana(range: FrameRange) -> Result<Self> {
        Ok(Self::new(
            LineMatcher::katana()?,
            ProgressTracker::new(range),
            FailureDetector::katana()?,
        ))
    }

    pub fn new(matcher: LineMatcher, tracker: ProgressTracker, failure: FailureDetector) -> Self {
        Self {
            matcher,
            tracker,
            failure,
            summary: MonitorSummary::default(),
        }
    }

    pub fn has_failed(&self) -> bool {
        self.summary.failure.is_some()
    }

    pub fn summary(&self) -> MonitorSummary {
        MonitorSummary {
            last_progress: self.tracker.last_progress(),
            ..self.summary.clone()
        }
    }

    /// Process one stdout line and return the events it produces.
    ///
    /// Error markers are checked before the progress rules, so a line that
    /// carries both only fails the task. After a failure every further line
    /// is ignored.
    pub fn handle_line(&mut self, line: &str) -> Vec<RenderEvent> {
        if self.has_failed() {
            debug!("stdout after failure (ignored): {}", line);
            return Vec::new();
        }

        self.summary.lines_read += 1;

        // The error marker outranks every progress grammar on the same line.
        if let Some(event) = self.failure.scan(line) {
            self.summary.lines_matched += 1;
            self.summary.failure = Some(line.to_string());
            return vec![event];
        }

        let Some(m) = self.matcher.classify(line) else {
            debug!("stdout: {}", line);
            return Vec::new();
        };
        self.summary.lines_matched += 1;

        if m.kind() == RuleKind::Error {
            let event = self.failure.on_error_line(&m);
            self.summary.failure = Some(m.line().to_string());
            return vec![event];
        }

        match self.tracker.apply(&m) {
            Ok(events) => events,
            Err(e) => {
                self.summary.lines_rejected += 1;
                warn!(
                    rule = %m.kind(),
                    error = %e,
                    line = %m.line(),
                    "matched stdout line could not be turned into progress; skipping"
                );
                Vec::new()
            }
        }
    }
}
