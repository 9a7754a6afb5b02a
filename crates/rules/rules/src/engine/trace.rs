use serde::{Deserialize, Serialize};

/// Result of testing a candidate against a single compiled pattern.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatternTraceResult {
    /// The pattern fully matched the candidate.
    Matched,
    /// The pattern did not match.
    NotMatched,
    /// The pattern was not tried because an earlier one already matched.
    Skipped,
}

impl PatternTraceResult {
    /// Return the `snake_case` string representation (matches serde serialization).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::NotMatched => "not_matched",
            Self::Skipped => "skipped",
        }
    }
}

/// Trace entry for a single pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternTraceEntry {
    /// Id of the template or rule the pattern was compiled from.
    pub pattern_id: String,
    /// The compiled pattern text, including anchors and flags.
    pub pattern: String,
    /// Outcome for this pattern.
    pub result: PatternTraceResult,
}

/// Complete trace of testing one candidate name against a matcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchTrace {
    /// The candidate schema name that was tested.
    pub candidate: String,
    /// Id of the first pattern that matched, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
    /// Per-pattern entries in declaration order.
    pub trace: Vec<PatternTraceEntry>,
}

impl MatchTrace {
    /// Returns `true` if some pattern matched.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.matched_pattern.is_some()
    }
}
