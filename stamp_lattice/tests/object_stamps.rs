//! Object stamps against a concrete class hierarchy.

mod common;

use common::*;
use stamp_lattice::diagnostics::{DiagnosticReason, DiagnosticsCollector};
use stamp_lattice::*;
use std::sync::Arc;

fn object(stamp: &Stamp) -> &ObjectStamp {
    stamp.as_object().expect("object stamp")
}

fn instance(ty: NominalType, handle: u64) -> Constant {
    Constant::Object(ObjectRef { ty, handle })
}

#[test]
fn test_join_picks_the_subtype() {
    let zoo = zoo();
    let animal = StampFactory::declared(ty(&zoo, "Animal"));
    let dog = StampFactory::declared_non_null(ty(&zoo, "Dog"));
    let joined = animal.join(&dog).unwrap();
    assert_eq!(object(&joined).ty(), Some(&ty(&zoo, "Dog")));
    assert!(object(&joined).non_null());
    assert!(!object(&joined).is_exact_type());
}

#[test]
fn test_join_with_exact_supertype_is_only_null() {
    let zoo = zoo();
    let exact_animal = StampFactory::exact(ty(&zoo, "Animal"));
    let dog = StampFactory::declared(ty(&zoo, "Dog"));
    let joined = exact_animal.join(&dog).unwrap();
    assert_eq!(joined, StampFactory::always_null());
    assert_eq!(joined.as_constant(), Some(Constant::Null));

    let dog = StampFactory::declared_non_null(ty(&zoo, "Dog"));
    assert!(exact_animal.join(&dog).unwrap().is_empty());
}

#[test]
fn test_meet_uses_common_ancestor() {
    let zoo = zoo();
    let dog = StampFactory::exact_non_null(ty(&zoo, "Dog"));
    let cat = StampFactory::declared_non_null(ty(&zoo, "Cat"));
    let merged = dog.meet(&cat).unwrap();
    assert_eq!(object(&merged).ty(), Some(&ty(&zoo, "Animal")));
    assert!(!object(&merged).is_exact_type());
    assert!(object(&merged).non_null());

    // Only the root is shared, which constrains nothing.
    let rock = StampFactory::declared(ty(&zoo, "Rock"));
    assert!(dog.meet(&rock).unwrap().is_unrestricted());
}

#[test]
fn test_meet_with_null_keeps_type() {
    let zoo = zoo();
    let dog = StampFactory::exact_non_null(ty(&zoo, "Dog"));
    let merged = dog.meet(&StampFactory::always_null()).unwrap();
    assert_eq!(merged, StampFactory::exact(ty(&zoo, "Dog")));
    assert!(merged.contains(&Constant::Null));
}

#[test]
fn test_exact_abstract_type_is_empty() {
    let zoo = zoo();
    assert!(StampFactory::exact(ty(&zoo, "Shape")).is_empty());
    assert!(StampFactory::exact_non_null(ty(&zoo, "Pet")).is_empty());
    assert!(!StampFactory::exact(ty(&zoo, "Circle")).is_empty());
}

#[test]
fn test_leaf_types_are_exact() {
    let zoo = zoo();
    let cat = StampFactory::declared_non_null(ty(&zoo, "Cat"));
    assert!(object(&cat).is_exact_type());
    insta::assert_snapshot!(cat.to_string(), @"a!# Cat");
}

#[test]
fn test_untrusted_interface_is_dropped() {
    let zoo = zoo();
    let pet = StampFactory::declared(ty(&zoo, "Pet"));
    assert!(pet.is_unrestricted());
    let trusted = StampFactory::declared_trusted(ty(&zoo, "Pet"));
    assert_eq!(object(&trusted).ty(), Some(&ty(&zoo, "Pet")));
}

#[test]
fn test_trusted_interfaces_from_config() {
    let config = StampConfig::from_toml_str("trust_interfaces = true").unwrap();
    let table = ClassTable::builder("Object")
        .interface("Runnable", &[])
        .class("Task", None)
        .implements("Task", &["Runnable"])
        .with_config(&config)
        .build()
        .unwrap();
    let runnable = StampFactory::declared(ty(&table, "Runnable"));
    assert_eq!(object(&runnable).ty(), Some(&ty(&table, "Runnable")));
}

#[test]
fn test_improve_keeps_own_type_for_unrelated_interface() {
    let zoo = zoo();
    let pet = StampFactory::declared_trusted(ty(&zoo, "Pet"));
    let shape = StampFactory::declared(ty(&zoo, "Shape"));

    DiagnosticsCollector::enable();
    DiagnosticsCollector::clear();
    let joined = pet.join(&shape).unwrap();
    let improved = pet.improve_with(&shape).unwrap();
    let diagnostics = DiagnosticsCollector::take();
    DiagnosticsCollector::disable();

    assert!(joined.is_unrestricted());
    assert_eq!(object(&improved).ty(), Some(&ty(&zoo, "Pet")));
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics
        .iter()
        .all(|d| d.reason == DiagnosticReason::UnrelatedObjectTypes));
}

#[test]
fn test_unrelated_classes_join_to_null() {
    let zoo = zoo();
    let dog = StampFactory::declared(ty(&zoo, "Dog"));
    let shape = StampFactory::declared(ty(&zoo, "Shape"));
    assert_eq!(dog.join(&shape).unwrap(), StampFactory::always_null());
}

#[test]
fn test_unrelated_exact_nullable_join_is_empty() {
    let zoo = zoo();
    let cat = StampFactory::exact(ty(&zoo, "Cat"));
    let rock = StampFactory::exact(ty(&zoo, "Rock"));
    assert!(cat.contains(&Constant::Null) && rock.contains(&Constant::Null));
    let joined = cat.join(&rock).unwrap();
    assert_eq!(joined, StampFactory::empty_object());
    assert_eq!(rock.join(&cat).unwrap(), joined);
    assert!(!joined.contains(&Constant::Null));
}

#[test]
fn test_object_constants() {
    let zoo = zoo();
    let animal = StampFactory::declared(ty(&zoo, "Animal"));
    let rex = instance(ty(&zoo, "Dog"), 7);
    assert!(animal.contains(&rex));
    assert!(animal.contains(&Constant::Null));
    assert!(!StampFactory::exact(ty(&zoo, "Animal")).contains(&rex));
    assert!(!StampFactory::declared_non_null(ty(&zoo, "Animal")).contains(&Constant::Null));

    let rex_stamp = animal.constant(&rex).unwrap();
    assert_eq!(rex_stamp, StampFactory::exact_non_null(ty(&zoo, "Dog")));
    // Only null survives the trip back to a constant.
    assert_eq!(rex_stamp.as_constant(), None);
    assert_eq!(
        animal.constant(&Constant::Null).unwrap().as_constant(),
        Some(Constant::Null)
    );
    assert!(animal.constant(&Constant::for_int(1)).is_err());
}

#[test]
fn test_checked_type_records_assumption() {
    let zoo = zoo();
    let shape = ty(&zoo, "Shape");
    let mut ledger = AssumptionSet::new();
    let checked = CheckedType::create(shape.clone(), Some(&mut ledger));
    assert!(checked.is_exact());
    assert_eq!(checked.ty(), &ty(&zoo, "Circle"));
    assert!(ledger.contains(&Assumption::ConcreteSubtype {
        context: shape,
        subtype: ty(&zoo, "Circle"),
    }));
    insta::assert_snapshot!(checked.to_stamp(true).to_string(), @"a!# Circle");
}

#[test]
fn test_checked_type_degrades_when_ledger_is_sealed() {
    let zoo = zoo();
    let mut ledger = AssumptionSet::sealed();
    DiagnosticsCollector::enable();
    DiagnosticsCollector::clear();
    let checked = CheckedType::create(ty(&zoo, "Shape"), Some(&mut ledger));
    let diagnostics = DiagnosticsCollector::take();
    DiagnosticsCollector::disable();

    assert!(!checked.is_exact());
    assert_eq!(checked.ty(), &ty(&zoo, "Shape"));
    assert!(ledger.is_empty());
    assert_eq!(diagnostics[0].reason, DiagnosticReason::AssumptionRejected);
    assert_eq!(
        checked.to_stamp(false),
        StampFactory::declared(ty(&zoo, "Shape"))
    );
}

#[test]
fn test_checked_type_without_ledger() {
    let zoo = zoo();
    let animal = CheckedType::create(ty(&zoo, "Animal"), None);
    assert!(!animal.is_exact());
    let cat = CheckedType::create(ty(&zoo, "Cat"), None);
    assert!(cat.is_exact());
    let fresh = CheckedType::create_exact(ty(&zoo, "Animal"));
    assert_eq!(fresh.to_stamp(true), StampFactory::exact_non_null(ty(&zoo, "Animal")));
}

#[test]
fn test_array_types_are_covariant() {
    let table: Arc<ClassTable> = ClassTable::builder("Object")
        .class("Animal", None)
        .class("Dog", Some("Animal"))
        .array_of("Animal")
        .array_of("Dog")
        .build()
        .unwrap();
    let animals = StampFactory::declared(ty(&table, "Animal[]"));
    let dogs = StampFactory::declared(ty(&table, "Dog[]"));
    let joined = animals.join(&dogs).unwrap();
    assert_eq!(object(&joined).ty(), Some(&ty(&table, "Dog[]")));
    let merged = animals.meet(&dogs).unwrap();
    assert_eq!(object(&merged).ty(), Some(&ty(&table, "Animal[]")));
}

#[test]
fn test_types_from_different_tables_never_match() {
    let a = zoo();
    let b = zoo();
    assert_ne!(ty(&a, "Dog"), ty(&b, "Dog"));
}
