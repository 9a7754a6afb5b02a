use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::trace::{MatchTrace, PatternTraceEntry, PatternTraceResult};

/// One compiled pattern inside a [`Matcher`], tagged with the id of the
/// template or rule it came from.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    id: String,
    regex: Regex,
}

impl CompiledPattern {
    pub(crate) fn new(id: impl Into<String>, regex: Regex) -> Self {
        Self {
            id: id.into(),
            regex,
        }
    }

    /// Id of the template or rule this pattern was compiled from.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The compiled pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Test the whole candidate against this pattern.
    #[must_use]
    pub fn is_match(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// An immutable predicate over candidate schema names.
///
/// Patterns are tried in declaration order and the first full match wins.
/// A matcher with no patterns rejects everything. Cloning is cheap and the
/// compiled state is shared read-only, so a matcher can be used from any
/// number of threads at once.
#[derive(Clone)]
pub struct Matcher {
    patterns: Arc<[CompiledPattern]>,
}

impl Matcher {
    pub(crate) fn new(patterns: Vec<CompiledPattern>) -> Self {
        Self {
            patterns: patterns.into(),
        }
    }

    /// A matcher that rejects every candidate.
    #[must_use]
    pub fn never() -> Self {
        Self::new(Vec::new())
    }

    /// Returns `true` if this matcher can never succeed.
    #[must_use]
    pub fn is_never(&self) -> bool {
        self.patterns.is_empty()
    }

    /// The compiled patterns, in evaluation order.
    #[must_use]
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Returns `true` if any pattern fully matches `candidate`.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.first_match(candidate).is_some()
    }

    /// Id of the first pattern that fully matches `candidate`.
    #[must_use]
    pub fn first_match(&self, candidate: &str) -> Option<&str> {
        let hit = self.patterns.iter().find(|p| p.is_match(candidate));
        match hit {
            Some(pattern) => {
                tracing::trace!(candidate, pattern_id = pattern.id(), "name matched");
                Some(pattern.id())
            }
            None => {
                tracing::trace!(candidate, patterns = self.patterns.len(), "name not matched");
                None
            }
        }
    }

    /// Evaluate `candidate` and record the outcome of every pattern.
    #[must_use]
    pub fn trace(&self, candidate: &str) -> MatchTrace {
        let mut matched_pattern = None;
        let trace = self
            .patterns
            .iter()
            .map(|p| {
                let result = if matched_pattern.is_some() {
                    PatternTraceResult::Skipped
                } else if p.is_match(candidate) {
                    matched_pattern = Some(p.id().to_owned());
                    PatternTraceResult::Matched
                } else {
                    PatternTraceResult::NotMatched
                };
                PatternTraceEntry {
                    pattern_id: p.id().to_owned(),
                    pattern: p.as_str().to_owned(),
                    result,
                }
            })
            .collect();

        MatchTrace {
            candidate: candidate.to_owned(),
            matched_pattern,
            trace,
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.patterns.iter().map(|p| (p.id(), p.as_str())))
            .finish()
    }
}
