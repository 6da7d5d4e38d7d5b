//! Nominal object stamps.
//!
//! An [`ObjectStamp`] constrains a reference by an optional nominal type
//! (`None` is unconstrained), whether that type is exact, and nullness.

use serde::Serialize;
use std::fmt;

use crate::diagnostics::emit_unrelated_object_types;
use crate::types::NominalType;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectStamp {
    #[serde(rename = "type")]
    ty: Option<NominalType>,
    exact: bool,
    non_null: bool,
    always_null: bool,
}

fn is_empty_parts(ty: Option<&NominalType>, exact: bool, non_null: bool, always_null: bool) -> bool {
    if non_null && always_null {
        return true;
    }
    match ty {
        Some(ty) => exact && !ty.is_concrete() && !ty.is_array(),
        None => exact,
    }
}

fn meet_types(a: Option<&NominalType>, b: Option<&NominalType>) -> Option<NominalType> {
    match (a, b) {
        (Some(a), Some(b)) if a == b => Some(a.clone()),
        (Some(a), Some(b)) => a.common_ancestor(b),
        _ => None,
    }
}

impl ObjectStamp {
    /// Builds a normalized stamp.
    ///
    /// Leaf types are always exact, an always-null stamp carries no type, the
    /// root type without exactness is dropped, and contradictions collapse to
    /// [`ObjectStamp::empty_stamp`].
    pub fn new(ty: Option<NominalType>, exact: bool, non_null: bool, always_null: bool) -> Self {
        let (mut ty, mut exact) = (ty, exact);
        if always_null {
            ty = None;
            exact = false;
        }
        if let Some(t) = &ty {
            if t.is_leaf() {
                exact = true;
            } else if !exact && t.is_top() {
                ty = None;
            }
        }
        if is_empty_parts(ty.as_ref(), exact, non_null, always_null) {
            return Self::empty_stamp();
        }
        Self {
            ty,
            exact,
            non_null,
            always_null,
        }
    }

    /// Any reference, including null.
    pub fn unrestricted_stamp() -> Self {
        Self {
            ty: None,
            exact: false,
            non_null: false,
            always_null: false,
        }
    }

    pub fn empty_stamp() -> Self {
        Self {
            ty: None,
            exact: true,
            non_null: true,
            always_null: true,
        }
    }

    /// Only the null reference.
    pub fn null_stamp() -> Self {
        Self {
            ty: None,
            exact: false,
            non_null: false,
            always_null: true,
        }
    }

    pub fn ty(&self) -> Option<&NominalType> {
        self.ty.as_ref()
    }

    pub fn is_exact_type(&self) -> bool {
        self.exact && self.ty.is_some()
    }

    pub fn non_null(&self) -> bool {
        self.non_null
    }

    pub fn always_null(&self) -> bool {
        self.always_null
    }

    pub fn is_empty(&self) -> bool {
        is_empty_parts(self.ty.as_ref(), self.exact, self.non_null, self.always_null)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.ty.is_none() && !self.exact && !self.non_null && !self.always_null
    }

    /// True if a non-null object of type `ty` is described by this stamp.
    pub fn admits_type(&self, ty: &NominalType) -> bool {
        if self.is_empty() || self.always_null {
            return false;
        }
        match &self.ty {
            None => true,
            Some(own) if self.exact => own == ty,
            Some(own) => ty.is_subtype_of(own),
        }
    }

    pub fn meet(&self, other: &ObjectStamp) -> ObjectStamp {
        if self == other || other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        if other.always_null {
            return Self::new(self.ty.clone(), self.exact, false, self.always_null);
        }
        if self.always_null {
            return Self::new(other.ty.clone(), other.exact, false, other.always_null);
        }
        let ty = meet_types(self.ty.as_ref(), other.ty.as_ref());
        let exact = self.exact && other.exact && self.ty == other.ty;
        Self::new(ty, exact, self.non_null && other.non_null, false)
    }

    pub fn join(&self, other: &ObjectStamp) -> ObjectStamp {
        self.join0(other, false)
    }

    /// Like [`join`](Self::join), but keeps this stamp's type when the two
    /// types are unrelated. Only valid when a runtime check has established
    /// that the value really has this stamp's type.
    pub fn improve_with(&self, other: &ObjectStamp) -> ObjectStamp {
        self.join0(other, true)
    }

    fn join0(&self, other: &ObjectStamp, improve: bool) -> ObjectStamp {
        if self == other {
            return self.clone();
        }
        if self.is_empty() {
            return self.clone();
        }
        if other.is_empty() {
            return other.clone();
        }

        let non_null = self.non_null || other.non_null;
        let mut always_null = self.always_null || other.always_null;
        let (ty, exact) = match (&self.ty, &other.ty) {
            (a, b) if a == b => (a.clone(), self.exact || other.exact),
            (None, b) => (b.clone(), other.exact),
            (a, None) => (a.clone(), self.exact),
            (Some(a), Some(b)) if b.is_subtype_of(a) => {
                if self.exact {
                    always_null = true;
                }
                (Some(b.clone()), other.exact)
            }
            (Some(a), Some(b)) if a.is_subtype_of(b) => {
                if other.exact {
                    always_null = true;
                }
                (Some(a.clone()), self.exact)
            }
            (Some(a), Some(b)) => {
                emit_unrelated_object_types(
                    if improve { "improve_with" } else { "join" },
                    a.name(),
                    b.name(),
                );
                if self.exact && other.exact && !improve {
                    // Two exact, unrelated types describe disjoint object sets.
                    // The shared null is dropped too, even when both admit it.
                    return Self::empty_stamp();
                }
                if self.exact
                    || other.exact
                    || (!a.is_interface_or_array_of_interface()
                        && !b.is_interface_or_array_of_interface())
                {
                    always_null = true;
                }
                if improve {
                    (Some(a.clone()), self.exact)
                } else {
                    (None, false)
                }
            }
        };
        Self::new(ty, exact, non_null, always_null)
    }
}

impl fmt::Display for ObjectStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "a <empty>");
        }
        write!(f, "a")?;
        if self.non_null {
            write!(f, "!")?;
        }
        if self.exact {
            write!(f, "#")?;
        }
        match &self.ty {
            Some(ty) => write!(f, " {}", ty)?,
            None => write!(f, " -")?,
        }
        if self.always_null {
            write!(f, " NULL")?;
        }
        Ok(())
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
            .class("Animal", None)
            .class("Dog", Some("Animal"))
            .final_class("Cat", Some("Animal"))
            .final_class("Rock", None)
            .abstract_class("Shape", None)
            .interface("Pet", &[])
            .implements("Dog", &["Pet"])
            .build()
            .unwrap()
    }

    fn declared(t: &Arc<ClassTable>, name: &str) -> ObjectStamp {
        ObjectStamp::new(Some(t.lookup(name).unwrap()), false, false, false)
    }

    #[test]
    fn test_leaf_type_forces_exact() {
        let t = table();
        let cat = declared(&t, "Cat");
        assert!(cat.is_exact_type());
        assert!(!declared(&t, "Dog").is_exact_type());
    }

    #[test]
    fn test_normalization() {
        let t = table();
        assert!(ObjectStamp::new(Some(t.lookup("Shape").unwrap()), true, false, false).is_empty());
        assert!(ObjectStamp::new(None, false, true, true).is_empty());
        assert_eq!(
            ObjectStamp::new(Some(t.lookup("Dog").unwrap()), false, false, true),
            ObjectStamp::null_stamp()
        );
        assert_eq!(declared(&t, "Object"), ObjectStamp::unrestricted_stamp());
    }

    #[test]
    fn test_meet_uses_common_ancestor() {
        let t = table();
        let m = declared(&t, "Dog").meet(&declared(&t, "Cat"));
        assert_eq!(m.ty().map(|ty| ty.name()), Some("Animal"));
        assert!(!m.is_exact_type());

        let m = declared(&t, "Dog").meet(&declared(&t, "Rock"));
        assert!(m.is_unrestricted());
    }

    #[test]
    fn test_meet_with_null_keeps_type() {
        let t = table();
        let dog = ObjectStamp::new(Some(t.lookup("Dog").unwrap()), false, true, false);
        let m = dog.meet(&ObjectStamp::null_stamp());
        assert_eq!(m.ty(), dog.ty());
        assert!(!m.non_null());
        assert_eq!(m, ObjectStamp::null_stamp().meet(&dog));
    }

    #[test]
    fn test_join_picks_subtype() {
        let t = table();
        let j = declared(&t, "Animal").join(&declared(&t, "Dog"));
        assert_eq!(j, declared(&t, "Dog"));
    }

    #[test]
    fn test_join_exact_supertype_only_null() {
        let t = table();
        let exact_animal = ObjectStamp::new(Some(t.lookup("Animal").unwrap()), true, false, false);
        let j = exact_animal.join(&declared(&t, "Dog"));
        assert_eq!(j, ObjectStamp::null_stamp());
    }

    #[test]
    fn test_join_unrelated_leaf_types_is_empty() {
        let t = table();
        assert!(declared(&t, "Cat").join(&declared(&t, "Rock")).is_empty());
    }

    #[test]
    fn test_join_unrelated_classes_only_null() {
        let t = table();
        let j = declared(&t, "Animal").join(&declared(&t, "Shape"));
        assert_eq!(j, ObjectStamp::null_stamp());
    }

    #[test]
    fn test_join_with_interface_drops_type() {
        let t = table();
        let j = declared(&t, "Animal").join(&declared(&t, "Pet"));
        assert!(j.is_unrestricted());
    }

    #[test]
    fn test_improve_with_keeps_own_type() {
        DiagnosticsCollector::enable();
        DiagnosticsCollector::clear();

        let t = table();
        let pet = declared(&t, "Pet");
        let improved = pet.improve_with(&declared(&t, "Animal"));
        assert_eq!(improved.ty(), pet.ty());

        let diags = DiagnosticsCollector::take();
        assert!(
            diags
                .iter()
                .any(|d| matches!(d.reason, DiagnosticReason::UnrelatedObjectTypes)),
            "Expected unrelated-types diagnostic, got {:?}",
            diags
        );
        DiagnosticsCollector::disable();
    }

    #[test]
    fn test_admits_type() {
        let t = table();
        let animal = declared(&t, "Animal");
        assert!(animal.admits_type(&t.lookup("Dog").unwrap()));
        assert!(!animal.admits_type(&t.lookup("Rock").unwrap()));
        assert!(!ObjectStamp::null_stamp().admits_type(&t.lookup("Dog").unwrap()));
    }

    #[test]
    fn test_display() {
        let t = table();
        let dog = ObjectStamp::new(Some(t.lookup("Dog").unwrap()), false, true, false);
        insta::assert_snapshot!(dog.to_string(), @"a! Dog");
        insta::assert_snapshot!(declared(&t, "Cat").to_string(), @"a# Cat");
        insta::assert_snapshot!(ObjectStamp::null_stamp().to_string(), @"a - NULL");
        insta::assert_snapshot!(ObjectStamp::empty_stamp().to_string(), @"a <empty>");
    }
}
