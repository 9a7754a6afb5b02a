use std::sync::Arc;

use aggrules_core::RuleTag;

use super::RuleObject;
use super::mapper::{IgnoreMap, LevelMap, MeasureMap};
use super::name::{FactCountMatch, ForeignKeyMatch, TableMatch};
use super::slot::Slot;
use crate::engine::Matcher;
use crate::error::RuleError;

/// A named bundle of naming rules; the unit a consumer asks for matchers.
///
/// Matchers can only be built once the rule set has been validated, which
/// binds every slot. Asking an unbound slot for a matcher returns
/// [`RuleError::Unresolved`].
#[derive(Debug)]
pub struct AggRule {
    /// Tag naming the rule.
    pub tag: RuleTag,
    /// Whether the rule is switched on.
    pub enabled: bool,
    /// Whether this rule is chosen when no tag is given.
    pub is_default: bool,
    /// Overrides the fact-count rule's column name when set.
    pub count_column: Option<String>,
    /// Columns to skip. Optional.
    pub ignore_map: Slot<IgnoreMap>,
    /// The row-count column.
    pub fact_count_match: Slot<FactCountMatch>,
    /// Foreign-key columns.
    pub foreign_key_match: Slot<ForeignKeyMatch>,
    /// Aggregate table names.
    pub table_match: Slot<TableMatch>,
    /// Level columns.
    pub level_map: Slot<LevelMap>,
    /// Measure columns.
    pub measure_map: Slot<MeasureMap>,
}

impl AggRule {
    /// Create an enabled, non-default rule with every slot empty.
    pub fn new(tag: impl Into<RuleTag>) -> Self {
        Self {
            tag: tag.into(),
            enabled: true,
            is_default: false,
            count_column: None,
            ignore_map: Slot::empty(),
            fact_count_match: Slot::empty(),
            foreign_key_match: Slot::empty(),
            table_match: Slot::empty(),
            level_map: Slot::empty(),
            measure_map: Slot::empty(),
        }
    }

    /// Flag the rule as the default.
    #[must_use]
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Set the enabled state.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Override the fact-count column name.
    #[must_use]
    pub fn with_count_column(mut self, count_column: impl Into<String>) -> Self {
        self.count_column = Some(count_column.into());
        self
    }

    /// Set the ignore-map slot.
    #[must_use]
    pub fn with_ignore_map(mut self, slot: Slot<IgnoreMap>) -> Self {
        self.ignore_map = slot;
        self
    }

    /// Set the fact-count slot.
    #[must_use]
    pub fn with_fact_count_match(mut self, slot: Slot<FactCountMatch>) -> Self {
        self.fact_count_match = slot;
        self
    }

    /// Set the foreign-key slot.
    #[must_use]
    pub fn with_foreign_key_match(mut self, slot: Slot<ForeignKeyMatch>) -> Self {
        self.foreign_key_match = slot;
        self
    }

    /// Set the table slot.
    #[must_use]
    pub fn with_table_match(mut self, slot: Slot<TableMatch>) -> Self {
        self.table_match = slot;
        self
    }

    /// Set the level slot.
    #[must_use]
    pub fn with_level_map(mut self, slot: Slot<LevelMap>) -> Self {
        self.level_map = slot;
        self
    }

    /// Set the measure slot.
    #[must_use]
    pub fn with_measure_map(mut self, slot: Slot<MeasureMap>) -> Self {
        self.measure_map = slot;
        self
    }

    fn bound<'a, T: RuleObject>(&self, slot: &'a Slot<T>) -> Result<&'a Arc<T>, RuleError> {
        slot.resolved().ok_or_else(|| RuleError::Unresolved {
            rule: self.tag.to_string(),
            slot: T::KIND,
        })
    }

    /// Matcher for aggregate tables of the fact table `fact_table_name`.
    pub fn table_matcher(&self, fact_table_name: &str) -> Result<Matcher, RuleError> {
        self.bound(&self.table_match)?.matcher(fact_table_name)
    }

    /// Matcher for the fact-count column.
    pub fn fact_count_matcher(&self) -> Result<Matcher, RuleError> {
        let rule = self.bound(&self.fact_count_match)?;
        match &self.count_column {
            Some(column) => rule.matcher_for(column),
            None => rule.matcher(),
        }
    }

    /// Matcher for aggregate columns standing for the fact-table foreign key
    /// `foreign_key_name`.
    pub fn foreign_key_matcher(&self, foreign_key_name: &str) -> Result<Matcher, RuleError> {
        self.bound(&self.foreign_key_match)?.matcher(foreign_key_name)
    }

    /// Matcher for the aggregate column of one dimension level.
    pub fn level_matcher(
        &self,
        usage_prefix: Option<&str>,
        hierarchy_name: &str,
        level_name: &str,
        level_column_name: &str,
    ) -> Result<Matcher, RuleError> {
        self.bound(&self.level_map)?
            .matcher(usage_prefix, hierarchy_name, level_name, level_column_name)
    }

    /// Matcher for the aggregate column of one measure.
    pub fn measure_matcher(
        &self,
        measure_name: &str,
        measure_column_name: &str,
        aggregate_name: &str,
    ) -> Result<Matcher, RuleError> {
        self.bound(&self.measure_map)?
            .matcher(measure_name, measure_column_name, aggregate_name)
    }

    /// Matcher for columns to skip. A rule without an ignore map skips nothing.
    pub fn ignore_matcher(&self) -> Result<Matcher, RuleError> {
        match self.ignore_map.resolved() {
            Some(map) => map.matcher(),
            None => Ok(Matcher::never()),
        }
    }
}
