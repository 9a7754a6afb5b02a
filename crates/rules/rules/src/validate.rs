//! Whole-document validation and slot resolution.
//!
//! Pools are validated first, each object once, under `Kind[id]`. Then every
//! enabled [`AggRule`] resolves its six slots: an inline object is validated
//! in place, a reference is looked up in its pool. Every resolvable slot is
//! bound even when other parts of the document are broken, so a single pass
//! reports every problem.

use std::collections::HashSet;
use std::sync::Arc;

use aggrules_core::Recorder;

use crate::ir::mapper::{IgnoreMap, LevelMap, MeasureMap};
use crate::ir::name::{FactCountMatch, ForeignKeyMatch, TableMatch};
use crate::ir::rule::AggRule;
use crate::ir::slot::{RuleRef, Selection, Slot};
use crate::registry::{AggRules, Pooled};

/// Whether an empty slot is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Mandatory,
    Optional,
}

pub(crate) fn validate_rules<R: Recorder>(rules: &AggRules, recorder: &mut R) -> bool {
    tracing::debug!(tag = %rules.tag(), rules = rules.rules().len(), "validating aggregate rules");

    let ok = recorder.scoped(&format!("AggRules[{}]", rules.tag()), |rec| {
        let mut ok = true;
        ok &= validate_pool::<FactCountMatch, R>(rules, rec);
        ok &= validate_pool::<ForeignKeyMatch, R>(rules, rec);
        ok &= validate_pool::<TableMatch, R>(rules, rec);
        ok &= validate_pool::<LevelMap, R>(rules, rec);
        ok &= validate_pool::<MeasureMap, R>(rules, rec);
        ok &= validate_pool::<IgnoreMap, R>(rules, rec);
        ok &= validate_tags(rules, rec);
        ok &= validate_default(rules, rec);

        for rule in rules.rules() {
            if !rule.enabled {
                rec.info(&format!("AggRule '{}' is disabled and was not validated", rule.tag));
                continue;
            }
            ok &= rec.scoped(&format!("AggRule[{}]", rule.tag), |rec| {
                validate_rule(rule, rules, rec)
            });
        }
        ok
    });

    tracing::debug!(tag = %rules.tag(), ok, "validation finished");
    ok
}

/// Validate one rule's slots against the registry and bind them.
pub(crate) fn validate_rule<R: Recorder>(rule: &AggRule, rules: &AggRules, recorder: &mut R) -> bool {
    let mut ok = true;
    ok &= resolve_slot(&rule.ignore_map, Requirement::Optional, rules, recorder);
    ok &= resolve_slot(&rule.fact_count_match, Requirement::Mandatory, rules, recorder);
    ok &= resolve_slot(&rule.foreign_key_match, Requirement::Mandatory, rules, recorder);
    ok &= resolve_slot(&rule.table_match, Requirement::Mandatory, rules, recorder);
    ok &= resolve_slot(&rule.level_map, Requirement::Mandatory, rules, recorder);
    ok &= resolve_slot(&rule.measure_map, Requirement::Mandatory, rules, recorder);

    if let Some(column) = &rule.count_column
        && column.trim().is_empty()
    {
        recorder.error("count column is empty");
        ok = false;
    }
    ok
}

fn validate_pool<T: Pooled, R: Recorder>(rules: &AggRules, recorder: &mut R) -> bool {
    let pool = rules.pool::<T>();
    let mut entries: Vec<_> = pool.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut ok = true;
    for (id, object) in entries {
        ok &= recorder.scoped(&format!("{}[{id}]", T::KIND), |rec| object.validate(rec));
    }
    ok
}

fn validate_tags<R: Recorder>(rules: &AggRules, recorder: &mut R) -> bool {
    let mut seen = HashSet::new();
    let mut ok = true;
    for rule in rules.rules() {
        if rule.tag.is_blank() {
            recorder.error("AggRule has an empty tag");
            ok = false;
        } else if !seen.insert(rule.tag.as_str()) {
            recorder.error(&format!("duplicate AggRule tag '{}'", rule.tag));
            ok = false;
        }
    }
    ok
}

fn validate_default<R: Recorder>(rules: &AggRules, recorder: &mut R) -> bool {
    let defaults: Vec<&str> = rules
        .rules()
        .iter()
        .filter(|r| r.enabled && r.is_default)
        .map(|r| r.tag.as_str())
        .collect();
    match defaults.len() {
        0 => {
            recorder.error("no AggRule is flagged default");
            false
        }
        1 => true,
        n => {
            recorder.error(&format!(
                "{n} AggRules are flagged default: {}",
                defaults.join(", ")
            ));
            false
        }
    }
}

fn validate_ref<R: Recorder>(reference: &RuleRef, recorder: &mut R) -> bool {
    if reference.ref_id.is_blank() {
        recorder.error("refid is empty");
        return false;
    }
    true
}

fn resolve_slot<T: Pooled, R: Recorder>(
    slot: &Slot<T>,
    requirement: Requirement,
    rules: &AggRules,
    recorder: &mut R,
) -> bool {
    recorder.scoped(T::KIND, |rec| match slot.selection() {
        Selection::Both => {
            rec.error("both base and baseref are ok");
            false
        }
        Selection::Neither => match requirement {
            Requirement::Mandatory => {
                rec.error("neither base nor baseref is ok");
                false
            }
            Requirement::Optional => true,
        },
        Selection::Inline(object) => {
            let ok = object.validate(rec);
            slot.bind(Arc::clone(object));
            ok
        }
        Selection::Reference(reference) => {
            if !validate_ref(reference, rec) {
                return false;
            }
            match rules.lookup::<T>(&reference.ref_id) {
                Some(object) => {
                    if !object.is_enabled() {
                        rec.warn(&format!(
                            "referenced {} '{}' is disabled",
                            T::KIND,
                            reference.ref_id
                        ));
                    }
                    slot.bind(Arc::clone(object));
                    true
                }
                None => {
                    rec.error(&format!("{} '{}' not found", T::KIND, reference.ref_id));
                    false
                }
            }
        }
    })
}
