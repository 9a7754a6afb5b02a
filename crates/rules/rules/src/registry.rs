use std::collections::HashMap;
use std::sync::Arc;

use aggrules_core::{Level, ListRecorder, Recorder, RefId, RuleTag};

use crate::error::RuleError;
use crate::ir::RuleObject;
use crate::ir::mapper::{IgnoreMap, LevelMap, MeasureMap};
use crate::ir::name::{FactCountMatch, ForeignKeyMatch, TableMatch};
use crate::ir::rule::AggRule;
use crate::validate;

/// Objects of one kind, keyed by id.
pub type Pool<T> = HashMap<RefId, Arc<T>>;

/// A rule object kind that has a pool in [`AggRules`].
pub trait Pooled: RuleObject + Sized {
    /// The pool holding objects of this kind.
    fn pool(rules: &AggRules) -> &Pool<Self>;

    /// Mutable access for registration.
    fn pool_mut(rules: &mut AggRules) -> &mut Pool<Self>;
}

macro_rules! pooled {
    ($ty:ty, $field:ident) => {
        impl Pooled for $ty {
            fn pool(rules: &AggRules) -> &Pool<Self> {
                &rules.$field
            }

            fn pool_mut(rules: &mut AggRules) -> &mut Pool<Self> {
                &mut rules.$field
            }
        }
    };
}

/// The root registry of a rule document.
///
/// Holds a pool per object kind, so that fragments can be shared between
/// rules by reference, plus the ordered list of [`AggRule`]s. Validate once
/// with [`validate`](Self::validate) (or [`into_validated`](Self::into_validated))
/// before asking rules for matchers. A validated registry is never changed
/// again; to reload, build and validate a new one and swap the `Arc`.
#[derive(Debug)]
pub struct AggRules {
    tag: RuleTag,
    fact_count_matches: Pool<FactCountMatch>,
    foreign_key_matches: Pool<ForeignKeyMatch>,
    table_matches: Pool<TableMatch>,
    level_maps: Pool<LevelMap>,
    measure_maps: Pool<MeasureMap>,
    ignore_maps: Pool<IgnoreMap>,
    rules: Vec<AggRule>,
}

pooled!(FactCountMatch, fact_count_matches);
pooled!(ForeignKeyMatch, foreign_key_matches);
pooled!(TableMatch, table_matches);
pooled!(LevelMap, level_maps);
pooled!(MeasureMap, measure_maps);
pooled!(IgnoreMap, ignore_maps);

impl AggRules {
    /// Create an empty registry for the document named `tag`.
    pub fn new(tag: impl Into<RuleTag>) -> Self {
        Self {
            tag: tag.into(),
            fact_count_matches: Pool::new(),
            foreign_key_matches: Pool::new(),
            table_matches: Pool::new(),
            level_maps: Pool::new(),
            measure_maps: Pool::new(),
            ignore_maps: Pool::new(),
            rules: Vec::new(),
        }
    }

    /// The document name.
    pub fn tag(&self) -> &RuleTag {
        &self.tag
    }

    /// Add an object to its kind's pool.
    pub fn register<T: Pooled>(&mut self, object: T) -> Result<(), RuleError> {
        let id = RefId::new(object.id());
        if id.is_blank() {
            return Err(RuleError::Parse(format!("pooled {} has an empty id", T::KIND)));
        }
        let pool = T::pool_mut(self);
        if pool.contains_key(&id) {
            return Err(RuleError::DuplicateId {
                kind: T::KIND,
                id: id.to_string(),
            });
        }
        pool.insert(id, Arc::new(object));
        Ok(())
    }

    /// Append a rule.
    pub fn push_rule(&mut self, rule: AggRule) {
        self.rules.push(rule);
    }

    /// Look up a pooled object by id.
    pub fn lookup<T: Pooled>(&self, id: &str) -> Option<&Arc<T>> {
        T::pool(self).get(id)
    }

    /// The pool for kind `T`.
    pub fn pool<T: Pooled>(&self) -> &Pool<T> {
        T::pool(self)
    }

    /// All rules in declaration order.
    pub fn rules(&self) -> &[AggRule] {
        &self.rules
    }

    /// Select an enabled rule by tag, or the default rule when `tag` is `None`.
    pub fn rule(&self, tag: Option<&str>) -> Result<&AggRule, RuleError> {
        match tag {
            Some(tag) => self
                .rules
                .iter()
                .find(|r| r.enabled && r.tag.as_str() == tag)
                .ok_or_else(|| RuleError::UnknownRule(tag.to_owned())),
            None => self.default_rule(),
        }
    }

    /// The single enabled rule flagged default.
    pub fn default_rule(&self) -> Result<&AggRule, RuleError> {
        let mut defaults = self.rules.iter().filter(|r| r.enabled && r.is_default);
        match (defaults.next(), defaults.count()) {
            (None, _) => Err(RuleError::NoDefaultRule),
            (Some(rule), 0) => Ok(rule),
            (Some(_), more) => Err(RuleError::AmbiguousDefaultRule(more + 1)),
        }
    }

    /// Validate the whole document, reporting every problem into `recorder`
    /// and binding every resolvable slot.
    ///
    /// Returns `true` when no error was reported.
    pub fn validate<R: Recorder>(&self, recorder: &mut R) -> bool {
        validate::validate_rules(self, recorder)
    }

    /// Validate and, if no error was reported, freeze the registry for
    /// sharing. On failure the error carries every `Error` diagnostic.
    pub fn into_validated(self) -> Result<Arc<Self>, RuleError> {
        let mut recorder = ListRecorder::new();
        if self.validate(&mut recorder) {
            return Ok(Arc::new(self));
        }
        let errors = recorder
            .into_diagnostics()
            .into_iter()
            .filter(|d| d.level == Level::Error)
            .collect();
        Err(RuleError::Invalid(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::slot::Slot;

    #[test]
    fn register_and_lookup() {
        let mut rules = AggRules::new("doc");
        rules.register(TableMatch::new("ta")).unwrap();
        rules.register(FactCountMatch::new("ta")).unwrap();

        assert_eq!(rules.lookup::<TableMatch>("ta").unwrap().id, "ta");
        assert_eq!(rules.lookup::<FactCountMatch>("ta").unwrap().id, "ta");
        assert!(rules.lookup::<ForeignKeyMatch>("ta").is_none());
        assert_eq!(rules.pool::<TableMatch>().len(), 1);
    }

    #[test]
    fn register_rejects_duplicates_and_blank_ids() {
        let mut rules = AggRules::new("doc");
        rules.register(LevelMap::new("lxx")).unwrap();
        let err = rules.register(LevelMap::new("lxx")).unwrap_err();
        assert!(matches!(err, RuleError::DuplicateId { kind: "LevelMap", .. }));

        let err = rules.register(MeasureMap::new("")).unwrap_err();
        assert!(matches!(err, RuleError::Parse(_)));
    }

    #[test]
    fn rule_selection() {
        let mut rules = AggRules::new("doc");
        rules.push_rule(AggRule::new("other"));
        rules.push_rule(AggRule::new("default").with_default(true));
        rules.push_rule(AggRule::new("off").with_enabled(false));

        assert_eq!(rules.rule(None).unwrap().tag.as_str(), "default");
        assert_eq!(rules.rule(Some("other")).unwrap().tag.as_str(), "other");
        assert!(matches!(rules.rule(Some("off")), Err(RuleError::UnknownRule(_))));
        assert!(matches!(rules.rule(Some("nope")), Err(RuleError::UnknownRule(_))));
    }

    #[test]
    fn default_rule_cardinality() {
        let rules = AggRules::new("doc");
        assert!(matches!(rules.default_rule(), Err(RuleError::NoDefaultRule)));

        let mut rules = AggRules::new("doc");
        rules.push_rule(AggRule::new("a").with_default(true));
        rules.push_rule(AggRule::new("b").with_default(true));
        assert!(matches!(
            rules.default_rule(),
            Err(RuleError::AmbiguousDefaultRule(2))
        ));
    }

    #[test]
    fn into_validated_returns_errors() {
        let mut rules = AggRules::new("doc");
        rules.push_rule(
            AggRule::new("default")
                .with_default(true)
                .with_table_match(Slot::reference("missing")),
        );
        let Err(RuleError::Invalid(errors)) = rules.into_validated() else {
            panic!("expected invalid rule set");
        };
        assert!(errors.iter().all(|d| d.level == Level::Error));
        assert!(errors.iter().any(|d| d.message.contains("'missing'")));
    }
}
