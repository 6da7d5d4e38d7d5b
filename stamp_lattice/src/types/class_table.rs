//! In-memory class hierarchy implementing [`TypeProvider`].
//!
//! Models a single-inheritance class tree rooted at one class, with
//! interfaces, abstract and final classes, and covariant array types. The
//! least common ancestor walks superclass chains only; interfaces are never
//! chosen as a common ancestor unless one operand is a subtype of the other.

use crate::config::StampConfig;
use crate::error::{StampError, StampResult};
use crate::types::{NominalType, TypeId, TypeProvider};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClassShape {
    Concrete,
    Final,
    Abstract,
    Interface,
    Array,
}

#[derive(Debug)]
struct ClassEntry {
    name: String,
    shape: ClassShape,
    superclass: Option<TypeId>,
    interfaces: Vec<TypeId>,
    component: Option<TypeId>,
}

impl ClassEntry {
    fn supertypes(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.superclass.into_iter().chain(self.interfaces.iter().copied())
    }
}

#[derive(Debug)]
struct PendingClass {
    name: String,
    shape: ClassShape,
    superclass: Option<String>,
    interfaces: Vec<String>,
    component: Option<String>,
}

/// A fixed class hierarchy.
///
/// # Examples
///
/// ```text
/// let table = ClassTable::builder("Object")
///     .class("Shape", None)
///     .final_class("Circle", Some("Shape"))
///     .interface("Drawable", &[])
///     .build()?;
/// let circle = table.lookup("Circle")?;
/// ```
#[derive(Debug)]
pub struct ClassTable {
    entries: Vec<ClassEntry>,
    by_name: HashMap<String, TypeId>,
    root: TypeId,
    trust_interfaces: bool,
}

/// Builder for [`ClassTable`]; names are resolved when [`build`](Self::build) runs.
#[derive(Debug)]
pub struct ClassTableBuilder {
    root: String,
    pending: Vec<PendingClass>,
    trust_interfaces: bool,
}

impl ClassTableBuilder {
    fn push(
        mut self,
        name: &str,
        shape: ClassShape,
        superclass: Option<&str>,
        interfaces: &[&str],
    ) -> Self {
        self.pending.push(PendingClass {
            name: name.to_string(),
            shape,
            superclass: superclass.map(str::to_string),
            interfaces: interfaces.iter().map(|s| s.to_string()).collect(),
            component: None,
        });
        self
    }

    /// A concrete, extensible class. `None` extends the root class.
    pub fn class(self, name: &str, superclass: Option<&str>) -> Self {
        self.push(name, ClassShape::Concrete, superclass, &[])
    }

    /// A class that cannot be extended.
    pub fn final_class(self, name: &str, superclass: Option<&str>) -> Self {
        self.push(name, ClassShape::Final, superclass, &[])
    }

    pub fn abstract_class(self, name: &str, superclass: Option<&str>) -> Self {
        self.push(name, ClassShape::Abstract, superclass, &[])
    }

    pub fn interface(self, name: &str, extends: &[&str]) -> Self {
        self.push(name, ClassShape::Interface, None, extends)
    }

    /// Adds implemented interfaces to a class declared earlier.
    pub fn implements(mut self, name: &str, interfaces: &[&str]) -> Self {
        if let Some(entry) = self.pending.iter_mut().find(|p| p.name == name) {
            entry
                .interfaces
                .extend(interfaces.iter().map(|s| s.to_string()));
        }
        self
    }

    /// Registers the array type `component[]`.
    pub fn array_of(mut self, component: &str) -> Self {
        self.pending.push(PendingClass {
            name: format!("{}[]", component),
            shape: ClassShape::Array,
            superclass: None,
            interfaces: Vec::new(),
            component: Some(component.to_string()),
        });
        self
    }

    pub fn trust_interfaces(mut self, trust: bool) -> Self {
        self.trust_interfaces = trust;
        self
    }

    pub fn with_config(self, config: &StampConfig) -> Self {
        self.trust_interfaces(config.trust_interfaces)
    }

    pub fn build(self) -> StampResult<Arc<ClassTable>> {
        let mut by_name = HashMap::new();
        by_name.insert(self.root.clone(), TypeId(0));
        for (i, pending) in self.pending.iter().enumerate() {
            let id = TypeId(i as u32 + 1);
            if by_name.insert(pending.name.clone(), id).is_some() {
                return Err(StampError::Config(format!(
                    "duplicate type '{}'",
                    pending.name
                )));
            }
        }

        let resolve = |name: &str| -> StampResult<TypeId> {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| StampError::UnknownType(name.to_string()))
        };

        let mut entries = Vec::with_capacity(self.pending.len() + 1);
        entries.push(ClassEntry {
            name: self.root.clone(),
            shape: ClassShape::Concrete,
            superclass: None,
            interfaces: Vec::new(),
            component: None,
        });
        for pending in &self.pending {
            let superclass = match &pending.superclass {
                Some(name) => resolve(name)?,
                None => TypeId(0),
            };
            let interfaces = pending
                .interfaces
                .iter()
                .map(|name| resolve(name))
                .collect::<StampResult<Vec<_>>>()?;
            let component = pending.component.as_deref().map(resolve).transpose()?;
            entries.push(ClassEntry {
                name: pending.name.clone(),
                shape: pending.shape,
                superclass: Some(superclass),
                interfaces,
                component,
            });
        }

        check_acyclic(&entries)?;
        Ok(Arc::new(ClassTable {
            entries,
            by_name,
            root: TypeId(0),
            trust_interfaces: self.trust_interfaces,
        }))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

/// Rejects superclass or interface chains that lead back to themselves.
fn check_acyclic(entries: &[ClassEntry]) -> StampResult<()> {
    let mut marks = vec![Mark::Unvisited; entries.len()];
    for start in 0..entries.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::Active;
        // Each frame is a type and the position of its next supertype.
        let mut stack = vec![(start, 0usize)];
        while let Some(frame) = stack.last_mut() {
            let (ty, next) = *frame;
            frame.1 += 1;
            match entries[ty].supertypes().nth(next) {
                Some(supertype) => {
                    let id = supertype.0 as usize;
                    match marks[id] {
                        Mark::Active => {
                            return Err(StampError::CyclicHierarchy(entries[id].name.clone()))
                        }
                        Mark::Unvisited => {
                            marks[id] = Mark::Active;
                            stack.push((id, 0));
                        }
                        Mark::Done => {}
                    }
                }
                None => {
                    marks[ty] = Mark::Done;
                    stack.pop();
                }
            }
        }
    }
    Ok(())
}

impl ClassTable {
    /// Starts a hierarchy whose root class is `root`.
    pub fn builder(root: &str) -> ClassTableBuilder {
        ClassTableBuilder {
            root: root.to_string(),
            pending: Vec::new(),
            trust_interfaces: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn root(self: &Arc<Self>) -> NominalType {
        NominalType::new(self.root, Arc::clone(self) as Arc<dyn TypeProvider>)
    }

    /// Looks up a type by name.
    pub fn lookup(self: &Arc<Self>, name: &str) -> StampResult<NominalType> {
        let id = self
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| StampError::UnknownType(name.to_string()))?;
        Ok(NominalType::new(id, Arc::clone(self) as Arc<dyn TypeProvider>))
    }

    fn entry(&self, ty: TypeId) -> &ClassEntry {
        &self.entries[ty.0 as usize]
    }

    fn supertypes(&self, ty: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        self.entry(ty).supertypes()
    }

    fn is_array_type(&self, ty: TypeId) -> bool {
        self.entry(ty).component.is_some()
    }

    fn array_type_of(&self, component: TypeId) -> Option<TypeId> {
        self.entries
            .iter()
            .position(|e| e.component == Some(component))
            .map(|i| TypeId(i as u32))
    }

    fn has_proper_subtypes(&self, ty: TypeId) -> bool {
        (0..self.entries.len() as u32)
            .map(TypeId)
            .any(|t| t != ty && self.is_subtype_of(t, ty))
    }
}

impl TypeProvider for ClassTable {
    fn name(&self, ty: TypeId) -> &str {
        &self.entry(ty).name
    }

    fn common_ancestor(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        let lca = if self.is_subtype_of(a, b) {
            b
        } else if self.is_subtype_of(b, a) {
            a
        } else if let (Some(ca), Some(cb)) = (self.entry(a).component, self.entry(b).component) {
            self.common_ancestor(ca, cb)
                .and_then(|c| self.array_type_of(c))
                .unwrap_or(self.root)
        } else {
            let mut current = self.entry(a).superclass;
            loop {
                match current {
                    Some(sup) if self.is_subtype_of(b, sup) => break sup,
                    Some(sup) => current = self.entry(sup).superclass,
                    None => break self.root,
                }
            }
        };
        (lca != self.root).then_some(lca)
    }

    fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup || sup == self.root {
            return true;
        }
        if let (Some(cs), Some(cp)) = (self.entry(sub).component, self.entry(sup).component) {
            return self.is_subtype_of(cs, cp);
        }
        if self.is_array_type(sub) {
            return false;
        }
        let mut worklist: Vec<TypeId> = self.supertypes(sub).collect();
        while let Some(ty) = worklist.pop() {
            if ty == sup {
                return true;
            }
            worklist.extend(self.supertypes(ty));
        }
        false
    }

    fn is_concretely_instantiable(&self, ty: TypeId) -> bool {
        matches!(
            self.entry(ty).shape,
            ClassShape::Concrete | ClassShape::Final | ClassShape::Array
        )
    }

    fn is_leaf(&self, ty: TypeId) -> bool {
        match self.entry(ty).shape {
            ClassShape::Final => true,
            ClassShape::Array => self.entry(ty).component.is_some_and(|c| self.is_leaf(c)),
            _ => false,
        }
    }

    fn is_interface(&self, ty: TypeId) -> bool {
        self.entry(ty).shape == ClassShape::Interface
    }

    fn component_type(&self, ty: TypeId) -> Option<TypeId> {
        self.entry(ty).component
    }

    fn is_trusted_interface(&self, ty: TypeId) -> bool {
        self.trust_interfaces && self.is_interface(ty)
    }

    fn leaf_concrete_subtype(&self, ty: TypeId) -> Option<TypeId> {
        if self.is_array_type(ty) {
            return None;
        }
        let mut concrete = (0..self.entries.len() as u32)
            .map(TypeId)
            .filter(|&t| !self.is_array_type(t))
            .filter(|&t| self.is_concretely_instantiable(t) && self.is_subtype_of(t, ty));
        let only = concrete.next()?;
        if concrete.next().is_some() || self.has_proper_subtypes(only) {
            return None;
        }
        Some(only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Arc<ClassTable> {
        ClassTable::builder("Object")
            .class("Animal", None)
            .final_class("Dog", Some("Animal"))
            .class("Cat", Some("Animal"))
            .abstract_class("Shape", None)
            .class("Square", Some("Shape"))
            .interface("Pet", &[])
            .implements("Dog", &["Pet"])
            .array_of("Animal")
            .array_of("Dog")
            .build()
            .unwrap()
    }

    #[test]
    fn test_subtyping() {
        let t = sample();
        let dog = t.lookup("Dog").unwrap();
        let animal = t.lookup("Animal").unwrap();
        let pet = t.lookup("Pet").unwrap();
        assert!(dog.is_subtype_of(&animal));
        assert!(dog.is_subtype_of(&pet));
        assert!(!animal.is_subtype_of(&dog));
        assert!(dog.is_subtype_of(&t.root()));
    }

    #[test]
    fn test_array_covariance() {
        let t = sample();
        let dogs = t.lookup("Dog[]").unwrap();
        let animals = t.lookup("Animal[]").unwrap();
        assert!(dogs.is_subtype_of(&animals));
        assert!(!animals.is_subtype_of(&dogs));
        assert!(dogs.is_array());
        assert!(dogs.is_leaf());
        assert!(!animals.is_leaf());
    }

    #[test]
    fn test_common_ancestor() {
        let t = sample();
        let dog = t.lookup("Dog").unwrap();
        let cat = t.lookup("Cat").unwrap();
        let square = t.lookup("Square").unwrap();
        let lca = dog.common_ancestor(&cat).unwrap();
        assert_eq!(lca.name(), "Animal");
        assert_eq!(cat.common_ancestor(&dog), Some(lca));
        assert_eq!(dog.common_ancestor(&square), None);
    }

    #[test]
    fn test_flags() {
        let t = sample();
        assert!(t.lookup("Dog").unwrap().is_leaf());
        assert!(!t.lookup("Shape").unwrap().is_concrete());
        assert!(t.lookup("Pet").unwrap().is_interface());
        assert!(!t.lookup("Pet").unwrap().is_trusted_interface());
    }

    #[test]
    fn test_leaf_concrete_subtype() {
        let t = sample();
        let shape = t.lookup("Shape").unwrap();
        let square = t.lookup("Square").unwrap();
        assert_eq!(shape.leaf_concrete_subtype(), Some(square.clone()));
        assert_eq!(square.leaf_concrete_subtype(), Some(square));
        assert_eq!(t.lookup("Animal").unwrap().leaf_concrete_subtype(), None);
    }

    #[test]
    fn test_unknown_names_fail_to_build() {
        let result = ClassTable::builder("Object")
            .class("A", Some("Missing"))
            .build();
        assert!(matches!(result, Err(StampError::UnknownType(ref n)) if n == "Missing"));

        let result = ClassTable::builder("Object").class("A", None).class("A", None).build();
        assert!(matches!(result, Err(StampError::Config(_))), "Expected duplicate error");
    }

    #[test]
    fn test_cyclic_superclass_chain_is_rejected() {
        let result = ClassTable::builder("Object")
            .class("A", Some("B"))
            .class("B", Some("A"))
            .class("C", None)
            .build();
        assert!(matches!(result, Err(StampError::CyclicHierarchy(_))));

        let result = ClassTable::builder("Object").class("Selfish", Some("Selfish")).build();
        assert!(
            matches!(result, Err(StampError::CyclicHierarchy(ref n)) if n == "Selfish"),
            "Expected self-extension to be rejected"
        );
    }

    #[test]
    fn test_cyclic_interfaces_are_rejected() {
        let result = ClassTable::builder("Object")
            .interface("Readable", &["Closeable"])
            .interface("Closeable", &["Readable"])
            .build();
        assert!(matches!(result, Err(StampError::CyclicHierarchy(_))));

        // A diamond shares supertypes without looping.
        let table = ClassTable::builder("Object")
            .interface("Closeable", &[])
            .interface("Readable", &["Closeable"])
            .interface("Writable", &["Closeable"])
            .class("File", None)
            .implements("File", &["Readable", "Writable"])
            .build()
            .unwrap();
        let file = table.lookup("File").unwrap();
        assert!(file.is_subtype_of(&table.lookup("Closeable").unwrap()));
    }
}
