//! Exact-type snapshots and the assumption ledger they record into.
//!
//! A [`CheckedType`] caches the decision "is this declared type exact?". The
//! answer is free for leaf types. For other types it can be bought by
//! recording an [`Assumption`] that the current hierarchy has a single
//! concrete subtype; if the ledger refuses, the snapshot stays non-exact.

use crate::diagnostics::emit_assumption_rejected;
use crate::stamp::{Stamp, StampFactory};
use crate::types::NominalType;

/// A fact about the class hierarchy that must stay true for compiled code to be valid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Assumption {
    /// `context` has exactly one concrete subtype, `subtype`, and nothing extends it.
    ConcreteSubtype {
        context: NominalType,
        subtype: NominalType,
    },
}

/// Sink for hierarchy assumptions.
pub trait AssumptionLedger {
    /// Records `assumption`. Returns false if recording is not currently permitted.
    fn record_assumption(&mut self, assumption: Assumption) -> bool;
}

/// A simple ledger that accepts assumptions until it is sealed.
#[derive(Debug, Default)]
pub struct AssumptionSet {
    assumptions: Vec<Assumption>,
    sealed: bool,
}

impl AssumptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger that refuses every recording.
    pub fn sealed() -> Self {
        Self {
            assumptions: Vec::new(),
            sealed: true,
        }
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.assumptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assumptions.is_empty()
    }

    pub fn contains(&self, assumption: &Assumption) -> bool {
        self.assumptions.contains(assumption)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assumption> {
        self.assumptions.iter()
    }
}

impl AssumptionLedger for AssumptionSet {
    fn record_assumption(&mut self, assumption: Assumption) -> bool {
        if self.sealed {
            return false;
        }
        if !self.assumptions.contains(&assumption) {
            self.assumptions.push(assumption);
        }
        true
    }
}

/// A nominal type paired with whether it is provably exact.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CheckedType {
    ty: NominalType,
    exact: bool,
}

impl CheckedType {
    /// Snapshot for `ty`, using `ledger` to make it exact when the hierarchy allows.
    pub fn create(ty: NominalType, ledger: Option<&mut dyn AssumptionLedger>) -> Self {
        if ty.is_leaf() {
            return Self { ty, exact: true };
        }
        let (Some(ledger), Some(subtype)) = (ledger, ty.leaf_concrete_subtype()) else {
            return Self::create_without_assumptions(ty);
        };
        let assumption = Assumption::ConcreteSubtype {
            context: ty.clone(),
            subtype: subtype.clone(),
        };
        if ledger.record_assumption(assumption) {
            Self {
                ty: subtype,
                exact: true,
            }
        } else {
            emit_assumption_rejected(ty.name());
            Self::create_without_assumptions(ty)
        }
    }

    /// Snapshot asserting exactness, e.g. for the type of a freshly allocated object.
    pub fn create_exact(ty: NominalType) -> Self {
        Self { ty, exact: true }
    }

    /// Snapshot that is exact only for leaf types.
    pub fn create_without_assumptions(ty: NominalType) -> Self {
        let exact = ty.is_leaf();
        Self { ty, exact }
    }

    pub fn ty(&self) -> &NominalType {
        &self.ty
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Object stamp describing values of this checked type.
    pub fn to_stamp(&self, non_null: bool) -> Stamp {
        StampFactory::object_for_checked_type(self, non_null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticReason, DiagnosticsCollector};
    use crate::types::class_table::ClassTable;
    use std::sync::Arc;

    fn table() -> Arc<ClassTable> {
        ClassTable::builder("Object")
            .final_class("Leaf", None)
            .abstract_class("Base", None)
            .class("Impl", Some("Base"))
            .class("Open", None)
            .class("OpenChild", Some("Open"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_leaf_type_is_exact_without_ledger() {
        let t = table();
        let checked = CheckedType::create(t.lookup("Leaf").unwrap(), None);
        assert!(checked.is_exact());
    }

    #[test]
    fn test_assumption_recorded() {
        let t = table();
        let mut ledger = AssumptionSet::new();
        let base = t.lookup("Base").unwrap();
        let checked = CheckedType::create(base.clone(), Some(&mut ledger));
        assert!(checked.is_exact());
        assert_eq!(checked.ty().name(), "Impl");
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains(&Assumption::ConcreteSubtype {
            context: base,
            subtype: t.lookup("Impl").unwrap(),
        }));
    }

    #[test]
    fn test_rejected_assumption_degrades() {
        DiagnosticsCollector::enable();
        DiagnosticsCollector::clear();

        let t = table();
        let mut ledger = AssumptionSet::sealed();
        let base = t.lookup("Base").unwrap();
        let checked = CheckedType::create(base.clone(), Some(&mut ledger));
        assert!(!checked.is_exact());
        assert_eq!(checked.ty(), &base);
        assert!(ledger.is_empty());

        let diags = DiagnosticsCollector::take();
        assert!(matches!(
            &diags[..],
            [d] if matches!(d.reason, DiagnosticReason::AssumptionRejected)
        ));
        DiagnosticsCollector::disable();
    }

    #[test]
    fn test_open_hierarchy_stays_inexact() {
        let t = table();
        let mut ledger = AssumptionSet::new();
        let checked = CheckedType::create(t.lookup("Open").unwrap(), Some(&mut ledger));
        assert!(!checked.is_exact());
        assert!(ledger.is_empty());
    }
}
