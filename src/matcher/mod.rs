// src/matcher/mod.rs

//! Line classification for renderer stdout.
//!
//! - [`rules`] holds the built-in Katana, Arnold and Redshift grammars and
//!   the `RuleKind` tags they route to.
//! - [`line_matcher`] owns the ordered rule table and the per-line
//!   `classify` operation.

pub mod line_matcher;
pub mod rules;

pub use line_matcher::{LineMatcher, MatchResult, MatchRule};
pub use rules::{FrameVariant, PassVariant, RuleKind};
