use std::sync::{Arc, OnceLock};

use aggrules_core::RefId;

use super::{RuleObject, is_ok};

/// A reference to an object held in one of the registry's pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRef {
    /// Id of the pooled object.
    pub ref_id: RefId,
    /// Whether the reference is switched on.
    pub enabled: bool,
}

impl RuleRef {
    /// Create an enabled reference.
    pub fn new(ref_id: impl Into<RefId>) -> Self {
        Self {
            ref_id: ref_id.into(),
            enabled: true,
        }
    }

    /// Set the enabled state.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// What a slot's declaration selects, judged by which sides are usable.
#[derive(Debug)]
pub enum Selection<'a, T> {
    /// Only the inline object is usable.
    Inline(&'a Arc<T>),
    /// Only the reference is usable.
    Reference(&'a RuleRef),
    /// Both sides are usable; the declaration is ambiguous.
    Both,
    /// Neither side is usable.
    Neither,
}

/// One of an [`AggRule`](super::rule::AggRule)'s sub-configurations.
///
/// A loader may fill in an inline object, a reference, both or neither;
/// validation decides whether that is legal and binds the selected object
/// exactly once. Matchers are only built from the bound object.
#[derive(Debug)]
pub struct Slot<T> {
    inline: Option<Arc<T>>,
    reference: Option<RuleRef>,
    resolved: OnceLock<Arc<T>>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            inline: None,
            reference: None,
            resolved: OnceLock::new(),
        }
    }
}

impl<T: RuleObject> Slot<T> {
    /// A slot with nothing declared.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A slot declaring an inline object.
    pub fn inline(value: T) -> Self {
        Self::empty().with_inline(value)
    }

    /// A slot declaring an enabled reference to `ref_id`.
    pub fn reference(ref_id: impl Into<RefId>) -> Self {
        Self::empty().with_reference(RuleRef::new(ref_id))
    }

    /// Set the inline object.
    #[must_use]
    pub fn with_inline(mut self, value: T) -> Self {
        self.inline = Some(Arc::new(value));
        self
    }

    /// Set the reference.
    #[must_use]
    pub fn with_reference(mut self, reference: RuleRef) -> Self {
        self.reference = Some(reference);
        self
    }

    /// The declared inline object, usable or not.
    pub fn inline_value(&self) -> Option<&Arc<T>> {
        self.inline.as_ref()
    }

    /// The declared reference, usable or not.
    pub fn reference_value(&self) -> Option<&RuleRef> {
        self.reference.as_ref()
    }

    /// Classify the declaration.
    pub fn selection(&self) -> Selection<'_, T> {
        let inline_ok = is_ok(self.inline.as_deref());
        let reference_ok = self.reference.as_ref().is_some_and(|r| r.enabled);
        match (inline_ok, reference_ok) {
            (true, true) => Selection::Both,
            (false, false) => Selection::Neither,
            (true, false) => self
                .inline
                .as_ref()
                .map_or(Selection::Neither, Selection::Inline),
            (false, true) => self
                .reference
                .as_ref()
                .map_or(Selection::Neither, Selection::Reference),
        }
    }

    /// The object bound by validation, if any.
    pub fn resolved(&self) -> Option<&Arc<T>> {
        self.resolved.get()
    }

    /// Bind the selected object. Later calls keep the first binding.
    pub(crate) fn bind(&self, value: Arc<T>) {
        if self.resolved.set(value).is_err() {
            tracing::trace!(kind = T::KIND, "slot already bound");
        }
    }
}
