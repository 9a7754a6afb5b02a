use std::marker::PhantomData;

use aggrules_core::{CharCase, Recorder};

use super::RuleObject;
use crate::compile::{compile_basename, derive_matcher, full_match, literal};
use crate::engine::{CompiledPattern, Matcher};
use crate::error::RuleError;

/// Fact-count column name used when a rule does not name one.
pub const DEFAULT_FACT_COUNT_NAME: &str = "fact_count";

/// Matches the row-count column of an aggregate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactCountMatch {
    /// Identity.
    pub id: String,
    /// Whether the rule is switched on.
    pub enabled: bool,
    /// Case policy for the column name.
    pub char_case: CharCase,
    /// Expected column name.
    pub fact_count_name: String,
}

impl FactCountMatch {
    /// Create an enabled rule expecting `fact_count`, ignoring case.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            char_case: CharCase::default(),
            fact_count_name: DEFAULT_FACT_COUNT_NAME.to_owned(),
        }
    }

    /// Set the expected column name.
    #[must_use]
    pub fn with_fact_count_name(mut self, name: impl Into<String>) -> Self {
        self.fact_count_name = name.into();
        self
    }

    /// Set the case policy.
    #[must_use]
    pub fn with_char_case(mut self, char_case: CharCase) -> Self {
        self.char_case = char_case;
        self
    }

    /// Set the enabled state.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Matcher for this rule's fact-count column.
    pub fn matcher(&self) -> Result<Matcher, RuleError> {
        self.matcher_for(&self.fact_count_name)
    }

    /// Matcher for an explicitly named fact-count column, using this rule's
    /// case policy.
    pub fn matcher_for(&self, fact_count_name: &str) -> Result<Matcher, RuleError> {
        let regex = full_match(&literal(fact_count_name, self.char_case), self.char_case)?;
        Ok(Matcher::new(vec![CompiledPattern::new(self.id.clone(), regex)]))
    }
}

impl RuleObject for FactCountMatch {
    const KIND: &'static str = "FactCountMatch";

    fn id(&self) -> &str {
        &self.id
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn validate<R: Recorder>(&self, recorder: &mut R) -> bool {
        if self.fact_count_name.trim().is_empty() {
            recorder.error("fact count name is empty");
            return false;
        }
        true
    }
}

/// Which basis a [`NameMatch`] derives its literal from.
pub trait NameKind {
    /// Kind name used in diagnostics.
    const KIND: &'static str;
}

/// Basis is the fact table's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableNames;

impl NameKind for TableNames {
    const KIND: &'static str = "TableMatch";
}

/// Basis is the fact table's raw foreign-key column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyNames;

impl NameKind for ForeignKeyNames {
    const KIND: &'static str = "ForeignKeyMatch";
}

/// A derive-then-wrap name rule.
///
/// The literal part of the pattern comes from a basis string supplied when
/// the matcher is built, optionally narrowed by `basename`, and is wrapped in
/// the author's `pretemplate` and `posttemplate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch<K> {
    /// Identity.
    pub id: String,
    /// Whether the rule is switched on.
    pub enabled: bool,
    /// Case policy for the derived literal.
    pub char_case: CharCase,
    /// Pattern with one capturing group that extracts the literal from the basis.
    pub basename: Option<String>,
    /// Regex text placed before the literal.
    pub pretemplate: Option<String>,
    /// Regex text placed after the literal.
    pub posttemplate: Option<String>,
    kind: PhantomData<fn() -> K>,
}

/// Recognizes aggregate tables of a fact table.
pub type TableMatch = NameMatch<TableNames>;

/// Recognizes aggregate foreign-key columns of a fact-table foreign key.
pub type ForeignKeyMatch = NameMatch<ForeignKeyNames>;

impl<K: NameKind> NameMatch<K> {
    /// Create an enabled rule that matches the basis itself, ignoring case.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            char_case: CharCase::default(),
            basename: None,
            pretemplate: None,
            posttemplate: None,
            kind: PhantomData,
        }
    }

    /// Set the case policy.
    #[must_use]
    pub fn with_char_case(mut self, char_case: CharCase) -> Self {
        self.char_case = char_case;
        self
    }

    /// Set the basename extraction pattern.
    #[must_use]
    pub fn with_basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = Some(basename.into());
        self
    }

    /// Set the regex text placed before the literal.
    #[must_use]
    pub fn with_pretemplate(mut self, pretemplate: impl Into<String>) -> Self {
        self.pretemplate = Some(pretemplate.into());
        self
    }

    /// Set the regex text placed after the literal.
    #[must_use]
    pub fn with_posttemplate(mut self, posttemplate: impl Into<String>) -> Self {
        self.posttemplate = Some(posttemplate.into());
        self
    }

    /// Set the enabled state.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Build the matcher for `basis`.
    ///
    /// If a basename pattern is configured and `basis` does not match it,
    /// the matcher rejects every candidate.
    pub fn matcher(&self, basis: &str) -> Result<Matcher, RuleError> {
        let basename = self.basename.as_deref().map(compile_basename).transpose()?;
        derive_matcher(
            &self.id,
            basis,
            basename.as_ref(),
            self.pretemplate.as_deref().unwrap_or_default(),
            self.posttemplate.as_deref().unwrap_or_default(),
            self.char_case,
        )
    }
}

impl<K: NameKind> RuleObject for NameMatch<K> {
    const KIND: &'static str = K::KIND;

    fn id(&self) -> &str {
        &self.id
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn validate<R: Recorder>(&self, recorder: &mut R) -> bool {
        let mut ok = true;

        if let Some(basename) = &self.basename
            && let Err(e) = compile_basename(basename)
        {
            recorder.error(&e.to_string());
            ok = false;
        }

        // Probe the wrapping text with a neutral literal so malformed pre or
        // post templates surface here rather than when a matcher is built.
        if let Err(e) = derive_matcher(
            &self.id,
            "x",
            None,
            self.pretemplate.as_deref().unwrap_or_default(),
            self.posttemplate.as_deref().unwrap_or_default(),
            self.char_case,
        ) {
            recorder.error(&format!("pretemplate/posttemplate do not compile: {e}"));
            ok = false;
        }

        ok
    }
}
