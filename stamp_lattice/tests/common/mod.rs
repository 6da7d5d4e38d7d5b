//! Shared helpers for integration tests
// Each test target uses a different subset of these helpers.
#![allow(dead_code)]

use proptest::prelude::*;
use stamp_lattice::bits;
use stamp_lattice::*;
use std::sync::Arc;

/// Integer widths exercised by property tests.
pub const WIDTHS: [u32; 5] = [1, 8, 16, 32, 64];

/// A small hierarchy with interfaces, final and abstract classes.
///
/// ```text
/// Object
/// ├── Animal ── Dog (implements Pet)
/// │          └─ Cat (final)
/// ├── Rock (final)
/// └── Shape (abstract) ── Circle (final)
/// Pet (interface)
/// ```
pub fn zoo() -> Arc<ClassTable> {
    ClassTable::builder("Object")
        .interface("Pet", &[])
        .class("Animal", None)
        .class("Dog", Some("Animal"))
        .implements("Dog", &["Pet"])
        .final_class("Cat", Some("Animal"))
        .final_class("Rock", None)
        .abstract_class("Shape", None)
        .final_class("Circle", Some("Shape"))
        .build()
        .expect("zoo hierarchy is well formed")
}

/// Looks up a type, panicking on typos in the test.
pub fn ty(table: &Arc<ClassTable>, name: &str) -> NominalType {
    table
        .lookup(name)
        .unwrap_or_else(|e| panic!("lookup {}: {}", name, e))
}

/// Class names of [`zoo`] without interfaces, for laws that need a tree.
pub const CLASS_NAMES: [&str; 7] = ["Object", "Animal", "Dog", "Cat", "Rock", "Shape", "Circle"];

pub fn int_stamp(bits: u32, lower: i64, upper: i64) -> Stamp {
    StampFactory::for_integer(bits, lower, upper)
}

pub fn int_constant(bits: u32, value: i64) -> Stamp {
    Stamp::Integer(IntegerStamp::constant_of(bits, value))
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

pub fn arb_width() -> impl Strategy<Value = u32> {
    prop::sample::select(WIDTHS.to_vec())
}

/// Values of the width, biased toward small numbers and the limits.
pub fn arb_int_value(bits: u32) -> impl Strategy<Value = i64> {
    prop_oneof![
        3 => any::<i64>().prop_map(move |v| bits::narrow(v, bits)),
        3 => (-16i64..=16).prop_map(move |v| bits::narrow(v, bits)),
        1 => Just(bits::min_value(bits)),
        1 => Just(bits::max_value(bits)),
    ]
}

/// A stamp together with values known to be members of it.
///
/// The stamp is the meet of the members' constant stamps, optionally widened
/// by a range, so it covers ranges, masks and constants alike.
pub fn arb_integer_stamp_with_members(bits: u32) -> impl Strategy<Value = (IntegerStamp, Vec<i64>)> {
    (
        prop::collection::vec(arb_int_value(bits), 1..4),
        prop::option::of((arb_int_value(bits), arb_int_value(bits))),
    )
        .prop_map(move |(values, widen)| {
            let mut stamp = IntegerStamp::empty_of(bits);
            for v in &values {
                stamp = stamp
                    .meet(&IntegerStamp::constant_of(bits, *v))
                    .expect("same width");
            }
            if let Some((a, b)) = widen {
                let range = IntegerStamp::range(bits, a.min(b), a.max(b));
                stamp = stamp.meet(&range).expect("same width");
            }
            (stamp, values)
        })
}

pub fn arb_integer_stamp_of(bits: u32) -> impl Strategy<Value = IntegerStamp> {
    prop_oneof![
        6 => arb_integer_stamp_with_members(bits).prop_map(|(s, _)| s),
        2 => (any::<u64>(), any::<u64>())
            .prop_map(move |(down, up)| IntegerStamp::for_mask(bits, down & up, up)),
        1 => Just(IntegerStamp::empty_of(bits)),
        1 => Just(IntegerStamp::unrestricted_of(bits)),
    ]
}

pub fn arb_integer_stamp() -> impl Strategy<Value = IntegerStamp> {
    arb_width().prop_flat_map(arb_integer_stamp_of)
}

/// Float values including the special cases.
pub fn arb_float_value(bits: u32) -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => (-1.0e6f64..1.0e6),
        1 => Just(0.0),
        1 => Just(-0.0),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
        1 => Just(f64::NAN),
    ]
    .prop_map(move |v| if bits == 32 { f64::from(v as f32) } else { v })
}

pub fn arb_float_stamp_with_members(bits: u32) -> impl Strategy<Value = (FloatStamp, Vec<f64>)> {
    prop::collection::vec(arb_float_value(bits), 1..4).prop_map(move |values| {
        let mut stamp = FloatStamp::empty_of(bits);
        for v in &values {
            stamp = stamp
                .meet(&FloatStamp::constant_of(bits, *v))
                .expect("same width");
        }
        (stamp, values)
    })
}

pub fn arb_float_stamp_of(bits: u32) -> impl Strategy<Value = FloatStamp> {
    prop_oneof![
        6 => arb_float_stamp_with_members(bits).prop_map(|(s, _)| s),
        1 => Just(FloatStamp::empty_of(bits)),
        1 => Just(FloatStamp::nan_of(bits)),
        1 => Just(FloatStamp::unrestricted_of(bits)),
    ]
}

/// Object stamps over the class-only part of [`zoo`].
pub fn arb_class_stamp(table: Arc<ClassTable>) -> impl Strategy<Value = ObjectStamp> {
    (
        prop::option::of(prop::sample::select(CLASS_NAMES.to_vec())),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(move |(name, exact, non_null, always_null)| {
            let ty = name.map(|n| ty(&table, n));
            ObjectStamp::new(ty, exact, non_null, always_null)
        })
}
