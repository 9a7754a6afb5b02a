//! The rule model.
//!
//! Plain records describing how aggregate tables, their fact-count column,
//! foreign keys, level columns and measure columns are named. Objects are
//! built by a loader, registered in [`AggRules`](crate::registry::AggRules)
//! and validated once; after that they are only read.

pub mod mapper;
pub mod name;
pub mod rule;
pub mod slot;
pub mod template;

use aggrules_core::Recorder;

/// Behavior shared by every rule object that can sit in a slot or a pool.
pub trait RuleObject {
    /// Kind name used in diagnostics, e.g. `TableMatch`.
    const KIND: &'static str;

    /// The object's identity.
    fn id(&self) -> &str;

    /// Whether the object is switched on.
    fn is_enabled(&self) -> bool;

    /// Check the object's own invariants, reporting into `recorder`.
    ///
    /// Returns `true` when no error was reported.
    fn validate<R: Recorder>(&self, recorder: &mut R) -> bool;
}

/// An object is usable ("ok") when it is present and enabled.
pub fn is_ok<T: RuleObject>(object: Option<&T>) -> bool {
    object.is_some_and(RuleObject::is_enabled)
}
