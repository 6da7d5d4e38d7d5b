//! Nominal types as seen by object stamps.
//!
//! The class hierarchy itself lives outside this crate. Object stamps reach it
//! only through the narrow [`TypeProvider`] queries, via [`NominalType`]
//! handles that pair a type id with the provider that owns it.
//!
//! # Submodules
//!
//! - `class_table`: in-memory [`TypeProvider`] over explicitly declared classes
//! - `checked`: [`CheckedType`] snapshots and the assumption ledger

pub mod checked;
pub mod class_table;

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identifier of a nominal type within one provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

/// Queries the lattice needs from the nominal type hierarchy.
///
/// Implementations must answer consistently for the lifetime of the stamps
/// that reference their types, and `common_ancestor` must be symmetric.
pub trait TypeProvider: fmt::Debug + Send + Sync {
    /// Display name of a type.
    fn name(&self, ty: TypeId) -> &str;

    /// Most specific type both arguments are subtypes of, or `None` if the
    /// only common supertype is the unconstrained top.
    fn common_ancestor(&self, a: TypeId, b: TypeId) -> Option<TypeId>;

    /// Reflexive subtype test: `sub <: sup`.
    fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool;

    /// Whether instances of exactly this type can exist.
    fn is_concretely_instantiable(&self, ty: TypeId) -> bool;

    /// Whether the type can never have subtypes.
    fn is_leaf(&self, ty: TypeId) -> bool;

    fn is_interface(&self, ty: TypeId) -> bool;

    /// Element type of an array type, `None` for non-arrays.
    fn component_type(&self, _ty: TypeId) -> Option<TypeId> {
        None
    }

    /// Whether a declared value of this interface type is guaranteed by the
    /// runtime to implement it. Untrusted interfaces are dropped from declared
    /// stamps.
    fn is_trusted_interface(&self, _ty: TypeId) -> bool {
        false
    }

    /// The single concrete subtype of `ty` currently known, if the type is
    /// effectively exact under the present hierarchy.
    fn leaf_concrete_subtype(&self, _ty: TypeId) -> Option<TypeId> {
        None
    }
}

/// A type handle: a [`TypeId`] plus the provider that defines it.
///
/// Equality and hashing use the id and the provider's identity, so handles
/// from different providers never compare equal.
#[derive(Clone)]
pub struct NominalType {
    id: TypeId,
    provider: Arc<dyn TypeProvider>,
}

impl NominalType {
    pub fn new(id: TypeId, provider: Arc<dyn TypeProvider>) -> Self {
        Self { id, provider }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn provider(&self) -> &Arc<dyn TypeProvider> {
        &self.provider
    }

    pub fn name(&self) -> &str {
        self.provider.name(self.id)
    }

    fn with_id(&self, id: TypeId) -> NominalType {
        NominalType {
            id,
            provider: Arc::clone(&self.provider),
        }
    }

    fn same_provider(&self, other: &NominalType) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.provider), Arc::as_ptr(&other.provider))
    }

    /// `self <: other`. Types from different providers are unrelated.
    pub fn is_subtype_of(&self, other: &NominalType) -> bool {
        self.same_provider(other) && self.provider.is_subtype_of(self.id, other.id)
    }

    /// `other <: self`.
    pub fn is_assignable_from(&self, other: &NominalType) -> bool {
        other.is_subtype_of(self)
    }

    /// Least common ancestor, or `None` when only the unconstrained top is shared.
    pub fn common_ancestor(&self, other: &NominalType) -> Option<NominalType> {
        if !self.same_provider(other) {
            return None;
        }
        self.provider
            .common_ancestor(self.id, other.id)
            .map(|id| self.with_id(id))
    }

    /// True for the hierarchy root, which every type is assignable to.
    pub fn is_top(&self) -> bool {
        self.provider.common_ancestor(self.id, self.id).is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.provider.is_leaf(self.id)
    }

    pub fn is_concrete(&self) -> bool {
        self.provider.is_concretely_instantiable(self.id)
    }

    pub fn is_interface(&self) -> bool {
        self.provider.is_interface(self.id)
    }

    pub fn is_array(&self) -> bool {
        self.provider.component_type(self.id).is_some()
    }

    pub fn component_type(&self) -> Option<NominalType> {
        self.provider
            .component_type(self.id)
            .map(|id| self.with_id(id))
    }

    /// Interfaces and arrays whose innermost element type is an interface.
    pub fn is_interface_or_array_of_interface(&self) -> bool {
        let mut current = self.id;
        while let Some(component) = self.provider.component_type(current) {
            current = component;
        }
        self.provider.is_interface(current)
    }

    pub fn is_trusted_interface(&self) -> bool {
        self.provider.is_trusted_interface(self.id)
    }

    pub fn leaf_concrete_subtype(&self) -> Option<NominalType> {
        self.provider
            .leaf_concrete_subtype(self.id)
            .map(|id| self.with_id(id))
    }
}

impl PartialEq for NominalType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.same_provider(other)
    }
}

impl Eq for NominalType {}

impl Hash for NominalType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for NominalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NominalType({}, {:?})", self.name(), self.id)
    }
}

impl fmt::Display for NominalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for NominalType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
