//! Property tests: every stamp fold over-approximates its constant fold.
//!
//! For stamps `a` and `b` with known members `x` and `y`, the folded constant
//! `op(x, y)` must be a member of the folded stamp `op(a, b)`.

mod common;

use common::*;
use proptest::prelude::*;
use stamp_lattice::ops::{
    BinaryOpKind, FloatConvert, IntegerConvertKind, ShiftOpKind, TernaryOpKind, UnaryOpKind,
};
use stamp_lattice::*;

fn int_table() -> &'static ArithmeticOpTable {
    ArithmeticOpTable::for_kind(ValueKind::Int32)
}

fn float_table() -> &'static ArithmeticOpTable {
    ArithmeticOpTable::for_kind(ValueKind::Float64)
}

fn float_constant(bits: u32, v: f64) -> Constant {
    if bits == 32 {
        Constant::for_float(v as f32)
    } else {
        Constant::for_double(v)
    }
}

type Members<T, V> = (T, Vec<V>);

fn int_pair() -> impl Strategy<Value = (Members<IntegerStamp, i64>, Members<IntegerStamp, i64>)> {
    arb_width().prop_flat_map(|bits| {
        (
            arb_integer_stamp_with_members(bits),
            arb_integer_stamp_with_members(bits),
        )
    })
}

fn float_widths() -> impl Strategy<Value = u32> {
    prop::sample::select(vec![32u32, 64])
}

fn float_pair() -> impl Strategy<Value = (Members<FloatStamp, f64>, Members<FloatStamp, f64>)> {
    float_widths().prop_flat_map(|bits| {
        (
            arb_float_stamp_with_members(bits),
            arb_float_stamp_with_members(bits),
        )
    })
}

fn float_triple() -> impl Strategy<Value = [Members<FloatStamp, f64>; 3]> {
    float_widths().prop_flat_map(|bits| {
        [
            arb_float_stamp_with_members(bits),
            arb_float_stamp_with_members(bits),
            arb_float_stamp_with_members(bits),
        ]
    })
}

/// The drawn members plus a midpoint and both zeros when the stamp spans them.
fn with_interior(s: &FloatStamp, xs: &[f64]) -> Vec<f64> {
    let mut members = xs.to_vec();
    let (lo, hi) = (s.lower_bound(), s.upper_bound());
    if lo.is_finite() && hi.is_finite() && lo < hi {
        let mid = lo / 2.0 + hi / 2.0;
        members.push(if s.bits() == 32 { f64::from(mid as f32) } else { mid });
    }
    if s.contains(0.0) {
        members.extend([0.0, -0.0]);
    }
    members
}

// ---------------------------------------------------------------------------
// Integer operators
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn integer_binary_ops_are_sound(((a, xs), (b, ys)) in int_pair()) {
        let bits = a.bits();
        for kind in BinaryOpKind::ALL {
            let op = int_table().binary(kind).unwrap();
            let result = op
                .fold_stamp(&Stamp::Integer(a), &Stamp::Integer(b))
                .unwrap();
            for x in &xs {
                for y in &ys {
                    let folded = op
                        .fold_constant(&Constant::int(bits, *x), &Constant::int(bits, *y))
                        .unwrap();
                    if let Some(c) = folded {
                        prop_assert!(
                            result.contains(&c),
                            "{}({}, {}) = {} escapes {}({}, {}) = {}",
                            kind.name(), x, y, c, kind.name(), a, b, result
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn integer_unary_ops_are_sound((a, xs) in arb_width().prop_flat_map(arb_integer_stamp_with_members)) {
        let bits = a.bits();
        for kind in [UnaryOpKind::Neg, UnaryOpKind::Not, UnaryOpKind::Abs] {
            let op = int_table().unary(kind).unwrap();
            let result = op.fold_stamp(&Stamp::Integer(a)).unwrap();
            for x in &xs {
                let c = op.fold_constant(&Constant::int(bits, *x)).unwrap().unwrap();
                prop_assert!(
                    result.contains(&c),
                    "{}({}) = {} escapes {}({}) = {}",
                    kind.name(), x, c, kind.name(), a, result
                );
            }
        }
    }

    #[test]
    fn shifts_are_sound(
        (a, xs) in prop::sample::select(vec![8u32, 32, 64]).prop_flat_map(arb_integer_stamp_with_members),
        (n, amounts) in arb_integer_stamp_with_members(32),
    ) {
        let bits = a.bits();
        for kind in ShiftOpKind::ALL {
            let op = int_table().shift(kind).unwrap();
            let result = op.fold_stamp(&Stamp::Integer(a), &Stamp::Integer(n)).unwrap();
            for x in &xs {
                for amount in &amounts {
                    let c = op
                        .fold_constant(&Constant::int(bits, *x), &Constant::int(32, *amount))
                        .unwrap()
                        .unwrap();
                    prop_assert!(
                        result.contains(&c),
                        "{}({}, {}) = {} escapes {}({}, {}) = {}",
                        kind.name(), x, amount, c, kind.name(), a, n, result
                    );
                }
            }
        }
    }

    #[test]
    fn width_conversions_are_sound(
        case in prop::sample::select(vec![
            (IntegerConvertKind::ZeroExtend, 1u32, 32u32),
            (IntegerConvertKind::ZeroExtend, 8, 32),
            (IntegerConvertKind::ZeroExtend, 16, 64),
            (IntegerConvertKind::ZeroExtend, 32, 64),
            (IntegerConvertKind::SignExtend, 1, 8),
            (IntegerConvertKind::SignExtend, 8, 32),
            (IntegerConvertKind::SignExtend, 32, 64),
            (IntegerConvertKind::Narrow, 64, 32),
            (IntegerConvertKind::Narrow, 32, 8),
            (IntegerConvertKind::Narrow, 16, 8),
            (IntegerConvertKind::Narrow, 32, 1),
        ]),
        seed in any::<u64>(),
    ) {
        let (kind, from, to) = case;
        // Derive members deterministically from the seed so each case uses its own width.
        let xs: Vec<i64> = (0..3)
            .map(|i| bits::narrow(seed.rotate_left(i * 21) as i64 >> (i * 7), from))
            .collect();
        let mut a = IntegerStamp::empty_of(from);
        for x in &xs {
            a = a.meet(&IntegerStamp::constant_of(from, *x)).unwrap();
        }
        let op = int_table().integer_convert(kind).unwrap();
        let result = op.fold_stamp(from, to, &Stamp::Integer(a)).unwrap();
        for x in &xs {
            let c = op.fold_constant(from, to, &Constant::int(from, *x)).unwrap().unwrap();
            prop_assert!(
                result.contains(&c),
                "{}({} -> {}) of {} = {} escapes {}",
                kind.name(), from, to, x, c, result
            );
        }
    }

    #[test]
    fn integer_to_float_is_sound(
        (a, xs) in prop::sample::select(vec![32u32, 64]).prop_flat_map(arb_integer_stamp_with_members),
    ) {
        let bits = a.bits();
        let kinds = if bits == 32 {
            [FloatConvert::I2F, FloatConvert::I2D]
        } else {
            [FloatConvert::L2F, FloatConvert::L2D]
        };
        for kind in kinds {
            let op = int_table().float_convert(kind).unwrap();
            let result = op.fold_stamp(&Stamp::Integer(a)).unwrap();
            for x in &xs {
                let c = op.fold_constant(&Constant::int(bits, *x)).unwrap().unwrap();
                prop_assert!(result.contains(&c), "{} of {} = {} escapes {}", kind.name(), x, c, result);
            }
        }
    }

    #[test]
    fn integer_reinterpret_is_sound(
        (a, xs) in prop::sample::select(vec![32u32, 64]).prop_flat_map(arb_integer_stamp_with_members),
    ) {
        let bits = a.bits();
        let result_kind = if bits == 32 { ValueKind::Float32 } else { ValueKind::Float64 };
        let op = int_table().reinterpret().unwrap();
        let result = op.fold_stamp(result_kind, &Stamp::Integer(a)).unwrap();
        for x in &xs {
            let c = op.fold_constant(result_kind, &Constant::int(bits, *x)).unwrap().unwrap();
            prop_assert!(result.contains(&c), "reinterpret of {} = {} escapes {}", x, c, result);
        }
    }
}

// ---------------------------------------------------------------------------
// Float operators
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn float_binary_ops_are_sound(((a, xs), (b, ys)) in float_pair()) {
        let bits = a.bits();
        let (xs, ys) = (with_interior(&a, &xs), with_interior(&b, &ys));
        for kind in BinaryOpKind::ALL {
            let Some(op) = float_table().binary(kind) else {
                continue;
            };
            let result = op.fold_stamp(&Stamp::Float(a), &Stamp::Float(b)).unwrap();
            for x in &xs {
                for y in &ys {
                    let c = op
                        .fold_constant(&float_constant(bits, *x), &float_constant(bits, *y))
                        .unwrap()
                        .unwrap();
                    prop_assert!(
                        result.contains(&c),
                        "{}({}, {}) = {} escapes {}({}, {}) = {}",
                        kind.name(), x, y, c, kind.name(), a, b, result
                    );
                }
            }
        }
    }

    #[test]
    fn float_unary_ops_are_sound((a, xs) in float_widths().prop_flat_map(arb_float_stamp_with_members)) {
        let bits = a.bits();
        for kind in UnaryOpKind::ALL {
            let op = float_table().unary(kind).unwrap();
            let result = op.fold_stamp(&Stamp::Float(a)).unwrap();
            for x in &xs {
                let c = op.fold_constant(&float_constant(bits, *x)).unwrap().unwrap();
                prop_assert!(
                    result.contains(&c),
                    "{}({}) = {} escapes {}({}) = {}",
                    kind.name(), x, c, kind.name(), a, result
                );
            }
        }
    }

    #[test]
    fn float_conversions_are_sound((a, xs) in float_widths().prop_flat_map(arb_float_stamp_with_members)) {
        let bits = a.bits();
        let kinds = if bits == 32 {
            [FloatConvert::F2I, FloatConvert::F2L, FloatConvert::F2D, FloatConvert::F2UI, FloatConvert::F2UL]
        } else {
            [FloatConvert::D2I, FloatConvert::D2L, FloatConvert::D2F, FloatConvert::D2UI, FloatConvert::D2UL]
        };
        let xs = with_interior(&a, &xs);
        for kind in kinds {
            let op = float_table().float_convert(kind).unwrap();
            let result = op.fold_stamp(&Stamp::Float(a)).unwrap();
            for x in &xs {
                let c = op.fold_constant(&float_constant(bits, *x)).unwrap().unwrap();
                prop_assert!(result.contains(&c), "{} of {} = {} escapes {}", kind.name(), x, c, result);
            }
        }
    }

    #[test]
    fn fma_is_sound([(a, xs), (b, ys), (c, zs)] in float_triple()) {
        let bits = a.bits();
        let op = float_table().ternary(TernaryOpKind::Fma).unwrap();
        let result = op
            .fold_stamp(&Stamp::Float(a), &Stamp::Float(b), &Stamp::Float(c))
            .unwrap();
        for x in &xs {
            for y in &ys {
                for z in &zs {
                    let folded = op
                        .fold_constant(
                            &float_constant(bits, *x),
                            &float_constant(bits, *y),
                            &float_constant(bits, *z),
                        )
                        .unwrap()
                        .unwrap();
                    prop_assert!(result.contains(&folded), "fma({}, {}, {}) = {} escapes {}", x, y, z, folded, result);
                }
            }
        }
    }

    #[test]
    fn float_reinterpret_is_sound((a, xs) in float_widths().prop_flat_map(arb_float_stamp_with_members)) {
        let bits = a.bits();
        let result_kind = if bits == 32 { ValueKind::Int32 } else { ValueKind::Int64 };
        let op = float_table().reinterpret().unwrap();
        let result = op.fold_stamp(result_kind, &Stamp::Float(a)).unwrap();
        for x in with_interior(&a, &xs) {
            let c = op.fold_constant(result_kind, &float_constant(bits, x)).unwrap().unwrap();
            prop_assert!(result.contains(&c), "reinterpret of {} = {} escapes {}", x, c, result);
        }
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn integer_constants_round_trip(bits in arb_width(), value in any::<i64>()) {
        let c = Constant::int(bits, value);
        let stamp = StampFactory::for_kind(c.kind()).constant(&c).unwrap();
        prop_assert_eq!(stamp.as_constant(), Some(c.clone()));
        prop_assert!(stamp.contains(&c));
    }

    #[test]
    fn nonzero_float_constants_round_trip(v in prop::num::f64::NORMAL) {
        let c = Constant::for_double(v);
        let stamp = StampFactory::for_constant(&c);
        prop_assert_eq!(stamp.as_constant(), Some(c));
    }
}
