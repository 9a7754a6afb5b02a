use aggrules_core::CharCase;

/// Marker that replaces a literal space or dot in a substituted value when
/// the template does not configure its own.
pub const DEFAULT_MARKER: &str = "_";

/// One alternative in a mapper's ordered list of `${name}` templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexTemplate {
    /// Identity, unique within the owning mapper.
    pub id: String,
    /// Whether this alternative takes part in matching.
    pub enabled: bool,
    /// Case policy. `None` inherits the owning mapper's policy.
    pub char_case: Option<CharCase>,
    /// Regex text with `${name}` placeholders.
    pub template: String,
    /// Replacement for a literal space inside a substituted value.
    pub space: Option<String>,
    /// Replacement for a literal dot inside a substituted value.
    pub dot: Option<String>,
}

impl RegexTemplate {
    /// Create an enabled template that inherits its case policy.
    pub fn new(id: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            char_case: None,
            template: template.into(),
            space: None,
            dot: None,
        }
    }

    /// Set an explicit case policy.
    #[must_use]
    pub fn with_char_case(mut self, char_case: CharCase) -> Self {
        self.char_case = Some(char_case);
        self
    }

    /// Set the replacement for spaces in substituted values.
    #[must_use]
    pub fn with_space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    /// Set the replacement for dots in substituted values.
    #[must_use]
    pub fn with_dot(mut self, dot: impl Into<String>) -> Self {
        self.dot = Some(dot.into());
        self
    }

    /// Set the enabled state.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The policy in force, falling back to `inherited`.
    #[must_use]
    pub fn effective_case(&self, inherited: CharCase) -> CharCase {
        self.char_case.unwrap_or(inherited)
    }

    /// The space replacement in force.
    #[must_use]
    pub fn space(&self) -> &str {
        self.space.as_deref().unwrap_or(DEFAULT_MARKER)
    }

    /// The dot replacement in force.
    #[must_use]
    pub fn dot(&self) -> &str {
        self.dot.as_deref().unwrap_or(DEFAULT_MARKER)
    }
}
