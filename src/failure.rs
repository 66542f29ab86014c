// src/failure.rs

//! Fatal error-marker detection.

use tracing::error;

use crate::errors::Result;
use crate::matcher::{LineMatcher, MatchResult, RuleKind};
use crate::types::RenderEvent;

/// A [`LineMatcher`] restricted to error-marker rules.
///
/// A match is terminal for the task: the caller is expected to stop feeding
/// lines and terminate the render process.
#[derive(Debug, Clone)]
pub struct FailureDetector {
    matcher: LineMatcher,
}

impl FailureDetector {
    /// Detector for Katana's `ERROR   |` marker.
    pub fn katana() -> Result<Self> {
        Ok(Self {
            matcher: LineMatcher::katana_subset(&[RuleKind::Error])?,
        })
    }

    /// Detector over a caller-supplied matcher; only `RuleKind::Error`
    /// matches count as failures.
    pub fn from_matcher(matcher: LineMatcher) -> Self {
        Self { matcher }
    }

    /// Scan a raw line and return the failure event if it is an error marker.
    pub fn scan(&self, line: &str) -> Option<RenderEvent> {
        self.matcher
            .classify(line)
            .filter(|m| m.kind() == RuleKind::Error)
            .map(|m| self.on_error_line(&m))
    }

    /// Build the failure signal for an already-classified error line.
    ///
    /// The reason is the full input line, verbatim.
    pub fn on_error_line(&self, m: &MatchResult) -> RenderEvent {
        error!(line = %m.line(), "renderer reported an error");
        RenderEvent::FailRender(m.line().to_string())
    }
}
