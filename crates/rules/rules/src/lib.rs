//! Aggregate-table recognition rules.
//!
//! A rule document ([`AggRules`]) describes how the aggregate tables of a
//! star schema are named: which tables aggregate a given fact table, and
//! which of their columns hold the fact count, foreign keys, levels and
//! measures. Documents are loaded by a [`RuleFrontend`], validated once, and
//! then asked for [`Matcher`]s that test candidate names.

pub mod compile;
pub mod engine;
pub mod error;
pub mod frontend;
pub mod ir;
pub mod registry;
mod validate;

pub use engine::{CompiledPattern, MatchTrace, Matcher, PatternTraceEntry, PatternTraceResult};
pub use error::RuleError;
pub use frontend::RuleFrontend;
pub use ir::RuleObject;
pub use ir::mapper::{IgnoreMap, LevelMap, MeasureMap, TemplateMapper};
pub use ir::name::{FactCountMatch, ForeignKeyMatch, NameMatch, TableMatch};
pub use ir::rule::AggRule;
pub use ir::slot::{RuleRef, Selection, Slot};
pub use ir::template::RegexTemplate;
pub use registry::{AggRules, Pool, Pooled};
