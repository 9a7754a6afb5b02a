use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseCharCaseError;

/// How literal name fragments are folded before they are compiled into a
/// pattern, and whether the resulting pattern is case sensitive.
///
/// | Policy   | Literal        | Pattern          |
/// |----------|----------------|------------------|
/// | `Ignore` | unchanged      | case-insensitive |
/// | `Exact`  | unchanged      | case-sensitive   |
/// | `Upper`  | upper-cased    | case-sensitive   |
/// | `Lower`  | lower-cased    | case-sensitive   |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum CharCase {
    /// Match any casing of the candidate.
    #[default]
    Ignore,
    /// Match the literal exactly as written.
    Exact,
    /// Upper-case the literal, then match case-sensitively.
    Upper,
    /// Lower-case the literal, then match case-sensitively.
    Lower,
}

impl CharCase {
    /// All policies, in declaration order.
    pub const ALL: [Self; 4] = [Self::Ignore, Self::Exact, Self::Upper, Self::Lower];

    /// Return the lowercase token used in rule documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Exact => "exact",
            Self::Upper => "upper",
            Self::Lower => "lower",
        }
    }

    /// Fold a literal according to this policy.
    ///
    /// Only `Upper` and `Lower` change the text; `Ignore` relies on the
    /// compiled pattern being case-insensitive instead.
    #[must_use]
    pub fn fold<'a>(&self, literal: &'a str) -> Cow<'a, str> {
        match self {
            Self::Ignore | Self::Exact => Cow::Borrowed(literal),
            Self::Upper => Cow::Owned(literal.to_uppercase()),
            Self::Lower => Cow::Owned(literal.to_lowercase()),
        }
    }

    /// Returns `true` if patterns built under this policy ignore case.
    #[must_use]
    pub fn is_case_insensitive(&self) -> bool {
        matches!(self, Self::Ignore)
    }
}

impl fmt::Display for CharCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharCase {
    type Err = ParseCharCaseError;

    /// Strict parse: the token must name one of the four policies (ASCII
    /// case-insensitive). Anything else is an error rather than a fallback.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCharCaseError::new(s))
    }
}

impl TryFrom<String> for CharCase {
    type Error = ParseCharCaseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CharCase> for &'static str {
    fn from(value: CharCase) -> Self {
        value.as_str()
    }
}
