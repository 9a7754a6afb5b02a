use crate::error::RuleError;
use crate::registry::AggRules;

/// Trait for rule frontends that load an aggregate rule document.
///
/// Implementations parse a specific file format (YAML, JSON, ...) into an
/// unvalidated [`AggRules`] registry. Callers validate the result before
/// asking it for matchers.
pub trait RuleFrontend: Send + Sync {
    /// Return the file extensions this frontend supports (e.g., `["yaml", "yml"]`).
    fn extensions(&self) -> &[&str];

    /// Parse a rule document from a string.
    fn parse(&self, content: &str) -> Result<AggRules, RuleError>;

    /// Parse a rule document from a file path.
    ///
    /// The default implementation reads the file and delegates to [`parse`](Self::parse).
    fn parse_file(&self, path: &std::path::Path) -> Result<AggRules, RuleError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RuleError::Parse(format!("cannot read {}: {e}", path.display())))?;
        self.parse(&content)
    }
}
