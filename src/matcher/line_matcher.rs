// src/matcher/line_matcher.rs

use std::fmt;

use anyhow::Context;
use regex::Regex;
use tracing::trace;

use crate::errors::Result;
use crate::matcher::rules::{KATANA_RULES, RuleKind};

/// One compiled pattern plus the handler it routes to.
#[derive(Clone)]
pub struct MatchRule {
    pattern: Regex,
    kind: RuleKind,
}

impl fmt::Debug for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchRule")
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

impl MatchRule {
    pub fn new(pattern: &str, kind: RuleKind) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("invalid stdout pattern for rule {kind}: {pattern}"))?;
        Ok(Self { pattern, kind })
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }
}

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    kind: RuleKind,
    line: String,
    /// Group 0 is the full match; groups that did not participate are `None`.
    groups: Vec<Option<String>>,
}

impl MatchResult {
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// The complete input line, exactly as it was classified.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Text matched by the whole pattern.
    pub fn matched(&self) -> &str {
        self.group(0).unwrap_or_default()
    }

    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|g| g.as_deref())
    }

    /// Number of capture groups, not counting group 0.
    pub fn capture_count(&self) -> usize {
        self.groups.len().saturating_sub(1)
    }
}

/// Ordered, first-match-wins table of stdout rules.
///
/// Holds no state between lines; the same matcher can classify lines from
/// any number of streams.
#[derive(Debug, Clone, Default)]
pub struct LineMatcher {
    rules: Vec<MatchRule>,
}

impl LineMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matcher with the full Katana / Arnold / Redshift rule set.
    pub fn katana() -> Result<Self> {
        let mut matcher = Self::new();
        for (pattern, kind) in KATANA_RULES {
            matcher.push(MatchRule::new(pattern, kind)?);
        }
        Ok(matcher)
    }

    /// Matcher holding only the rules of the given kinds, in table order.
    pub fn katana_subset(kinds: &[RuleKind]) -> Result<Self> {
        let mut matcher = Self::new();
        for (pattern, kind) in KATANA_RULES {
            if kinds.contains(&kind) {
                matcher.push(MatchRule::new(pattern, kind)?);
            }
        }
        Ok(matcher)
    }

    pub fn with_rule(mut self, pattern: &str, kind: RuleKind) -> Result<Self> {
        self.push(MatchRule::new(pattern, kind)?);
        Ok(self)
    }

    pub fn push(&mut self, rule: MatchRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Classify a line against the rules in registration order.
    pub fn classify(&self, line: &str) -> Option<MatchResult> {
        for rule in &self.rules {
            if let Some(caps) = rule.pattern.captures(line) {
                trace!(rule = %rule.kind, "stdout line matched");
                let groups = caps
                    .iter()
                    .map(|g| g.map(|m| m.as_str().to_string()))
                    .collect();
                return Some(MatchResult {
                    kind: rule.kind,
                    line: line.to_string(),
                    groups,
                });
            }
        }
        None
    }

    /// Every rule kind whose pattern matches `line`, ignoring priority.
    ///
    /// Used to check that the grammars stay mutually exclusive.
    pub fn matching_kinds(&self, line: &str) -> Vec<RuleKind> {
        self.rules
            .iter()
            .filter(|rule| rule.pattern.is_match(line))
            .map(|rule| rule.kind)
            .collect()
    }
}
