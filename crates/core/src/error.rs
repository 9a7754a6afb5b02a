use thiserror::Error;

/// Returned when a char-case token does not name a known policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown char case '{token}': expected one of ignore, exact, upper, lower")]
pub struct ParseCharCaseError {
    token: String,
}

impl ParseCharCaseError {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// The token that failed to parse.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}
