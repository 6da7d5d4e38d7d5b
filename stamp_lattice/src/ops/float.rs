//! Float operators.
//!
//! Constant folds follow IEEE 754 round-to-nearest. Single-precision folds are
//! computed in double precision and rounded once, which is exact for the basic
//! arithmetic operations. Bitwise operators act on the raw bit patterns.

use num_traits::ToPrimitive;

use crate::bits;
use crate::constant::Constant;
use crate::error::{StampError, StampResult};
use crate::kind::ValueKind;
use crate::stamp::float::{ieee_max, ieee_min};
use crate::stamp::{FloatStamp, IntegerStamp, Stamp, StampFactory};

use super::descriptor::{BinaryOp, FloatConvertOp, OpDescriptor, ReinterpretOp, TernaryOp, UnaryOp};
use super::table::ArithmeticOpTable;
use super::{BinaryOpKind, FloatConvert, TernaryOpKind, UnaryOpKind};

const INF: f64 = f64::INFINITY;
const NEG_INF: f64 = f64::NEG_INFINITY;

fn float_operand(op: &'static str, c: &Constant) -> StampResult<(u32, f64)> {
    match c {
        Constant::Float32(v) => Ok((32, f64::from(*v))),
        Constant::Float64(v) => Ok((64, *v)),
        _ => Err(StampError::incompatible_constants(op, c, &"float")),
    }
}

fn float_operands(op: &'static str, a: &Constant, b: &Constant) -> StampResult<(u32, f64, f64)> {
    match (a, b) {
        (Constant::Float32(x), Constant::Float32(y)) => Ok((32, f64::from(*x), f64::from(*y))),
        (Constant::Float64(x), Constant::Float64(y)) => Ok((64, *x, *y)),
        _ => Err(StampError::incompatible_constants(op, a, b)),
    }
}

fn float_constant(bits: u32, value: f64) -> Constant {
    if bits == 32 {
        Constant::for_float(value as f32)
    } else {
        Constant::for_double(value)
    }
}

fn raw_bits(bits: u32, value: f64) -> u64 {
    if bits == 32 {
        u64::from((value as f32).to_bits())
    } else {
        value.to_bits()
    }
}

fn from_raw_bits(bits: u32, raw: u64) -> Constant {
    if bits == 32 {
        Constant::for_float(f32::from_bits(raw as u32))
    } else {
        Constant::for_double(f64::from_bits(raw))
    }
}

fn float_stamp<'a>(op: &'static str, s: &'a Stamp) -> StampResult<&'a FloatStamp> {
    s.as_float()
        .ok_or_else(|| StampError::incompatible_stamps(op, s, &"float"))
}

fn fold1(op: &'static str, c: &Constant, f: fn(f64) -> f64) -> StampResult<Option<Constant>> {
    let (bits, v) = float_operand(op, c)?;
    Ok(Some(float_constant(bits, f(v))))
}

fn fold2(op: &'static str, a: &Constant, b: &Constant, f: fn(f64, f64) -> f64) -> StampResult<Option<Constant>> {
    let (bits, x, y) = float_operands(op, a, b)?;
    Ok(Some(float_constant(bits, f(x, y))))
}

fn fold_bitwise(
    op: &'static str,
    a: &Constant,
    b: &Constant,
    f: fn(u64, u64) -> u64,
) -> StampResult<Option<Constant>> {
    let (bits, x, y) = float_operands(op, a, b)?;
    Ok(Some(from_raw_bits(bits, f(raw_bits(bits, x), raw_bits(bits, y)))))
}

fn lift1(op: &'static str, s: &Stamp, f: fn(&FloatStamp) -> FloatStamp) -> StampResult<Stamp> {
    Ok(Stamp::Float(f(float_stamp(op, s)?)))
}

fn lift2(
    op: &'static str,
    a: &Stamp,
    b: &Stamp,
    f: fn(&FloatStamp, &FloatStamp) -> FloatStamp,
) -> StampResult<Stamp> {
    Ok(Stamp::Float(f(float_stamp(op, a)?, float_stamp(op, b)?)))
}

/// Stamp for operators only folded on constants.
fn imprecise(op: &'static str, a: &Stamp, _b: &Stamp) -> StampResult<Stamp> {
    Ok(Stamp::Float(float_stamp(op, a)?.unrestricted()))
}

/// Rounds a double-precision bound to the stamp's width. Rounding is
/// monotone, so rounded bounds still bound the rounded results.
fn round(bits: u32, value: f64) -> f64 {
    if bits == 32 {
        f64::from(value as f32)
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Stamp folds
// ---------------------------------------------------------------------------

pub(crate) fn neg(s: &FloatStamp) -> FloatStamp {
    FloatStamp::new(s.bits(), -s.upper_bound(), -s.lower_bound(), s.is_non_nan())
}

pub(crate) fn abs(s: &FloatStamp) -> FloatStamp {
    if s.is_nan_only() {
        return *s;
    }
    let (lower, upper) = (s.lower_bound(), s.upper_bound());
    if lower >= 0.0 {
        *s
    } else if upper <= 0.0 {
        FloatStamp::new(s.bits(), -upper, -lower, s.is_non_nan())
    } else {
        FloatStamp::new(s.bits(), 0.0, (-lower).max(upper), s.is_non_nan())
    }
}

fn rounded_sqrt(bits: u32, value: f64) -> f64 {
    if bits == 32 {
        f64::from((value as f32).sqrt())
    } else {
        value.sqrt()
    }
}

pub(crate) fn sqrt(s: &FloatStamp) -> FloatStamp {
    if s.is_nan_only() {
        return *s;
    }
    if s.upper_bound() < 0.0 {
        return FloatStamp::nan_of(s.bits());
    }
    // Negative inputs produce NaN; sqrt(-0.0) is -0.0.
    let lower = rounded_sqrt(s.bits(), ieee_max(-0.0, s.lower_bound()));
    let upper = rounded_sqrt(s.bits(), s.upper_bound());
    FloatStamp::new(
        s.bits(),
        lower,
        upper,
        s.is_non_nan() && s.lower_bound() >= 0.0,
    )
}

pub(crate) fn add(a: &FloatStamp, b: &FloatStamp) -> FloatStamp {
    let bits = a.bits();
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    let non_nan = a.is_non_nan()
        && b.is_non_nan()
        && !(a.can_be_negative_infinity() && b.can_be_positive_infinity())
        && !(a.can_be_positive_infinity() && b.can_be_negative_infinity());
    let (l1, u1, l2, u2) = (a.lower_bound(), a.upper_bound(), b.lower_bound(), b.upper_bound());
    let mut lower = round(bits, l1 + l2);
    let mut upper = round(bits, u1 + u2);
    // A bound sum of opposite infinities is NaN; the remaining members decide.
    if (l1 == INF && u2 > NEG_INF) || (u1 > NEG_INF && l2 == INF) {
        lower = INF;
    }
    if (l1 < INF && u2 == NEG_INF) || (u1 == NEG_INF && l2 < INF) {
        upper = NEG_INF;
    }
    FloatStamp::new(bits, lower, upper, non_nan)
}

pub(crate) fn sub(a: &FloatStamp, b: &FloatStamp) -> FloatStamp {
    let bits = a.bits();
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    let non_nan = a.is_non_nan()
        && b.is_non_nan()
        && !(a.can_be_negative_infinity() && b.can_be_negative_infinity())
        && !(a.can_be_positive_infinity() && b.can_be_positive_infinity());
    let (l1, u1, l2, u2) = (a.lower_bound(), a.upper_bound(), b.lower_bound(), b.upper_bound());
    let mut lower = round(bits, l1 - u2);
    let mut upper = round(bits, u1 - l2);
    if (l1 == INF && l2 < INF) || (u1 > NEG_INF && u2 == NEG_INF) {
        lower = INF;
    }
    if (l1 < INF && l2 == INF) || (u1 == NEG_INF && u2 > NEG_INF) {
        upper = NEG_INF;
    }
    FloatStamp::new(bits, lower, upper, non_nan)
}

pub(crate) fn mul(a: &FloatStamp, b: &FloatStamp) -> FloatStamp {
    let bits = a.bits();
    if a.is_empty() || a.is_nan_only() {
        return *a;
    }
    if b.is_empty() || b.is_nan_only() {
        return *b;
    }
    let non_nan = a.is_non_nan()
        && b.is_non_nan()
        && !(a.contains(0.0) && b.can_be_inf())
        && !(b.contains(0.0) && a.can_be_inf());

    // Single-valued operands whose neighbours are not members. A zero
    // singleton yields to an infinite one.
    let singleton = |s: &FloatStamp| s.lower_bound() == s.upper_bound();
    let pivot = match (singleton(a), singleton(b)) {
        (true, true) if a.lower_bound() == 0.0 => Some((b, a)),
        (true, _) => Some((a, b)),
        (false, true) => Some((b, a)),
        (false, false) => None,
    };
    if let Some((constant, other)) = pivot {
        let v = constant.lower_bound();
        if v.is_infinite() {
            if other.lower_bound() == 0.0 && other.upper_bound() == 0.0 {
                return FloatStamp::nan_of(bits);
            }
            let (lower, upper) = if other.lower_bound() >= 0.0 {
                (v, v)
            } else if other.upper_bound() <= 0.0 {
                (-v, -v)
            } else {
                (NEG_INF, INF)
            };
            return FloatStamp::new(bits, lower, upper, non_nan);
        }
        if v == 0.0 {
            return FloatStamp::new(bits, -0.0, 0.0, non_nan);
        }
    }

    // The product is monotone in each operand, so the corners bound it. A
    // corner of an infinity and a zero is NaN; the members next to the zero
    // bound lie on one side of it, which fixes the sign of the infinity.
    let (l1, u1, l2, u2) = (a.lower_bound(), a.upper_bound(), b.lower_bound(), b.upper_bound());
    let mut lower = INF;
    let mut upper = NEG_INF;
    for (x, x_is_lower, y, y_is_lower) in [
        (l1, true, l2, true),
        (u1, false, u2, false),
        (l1, true, u2, false),
        (u1, false, l2, true),
    ] {
        let product = round(bits, x * y);
        let (lo, hi) = if product.is_nan() {
            let (infinity, zero_is_lower) = if x.is_infinite() { (x, y_is_lower) } else { (y, x_is_lower) };
            let limit = if zero_is_lower { infinity } else { -infinity };
            (ieee_min(limit, 0.0), ieee_max(limit, 0.0))
        } else {
            (product, product)
        };
        lower = ieee_min(lower, lo);
        upper = ieee_max(upper, hi);
    }
    FloatStamp::new(bits, lower, upper, non_nan)
}

pub(crate) fn div(a: &FloatStamp, b: &FloatStamp) -> FloatStamp {
    let bits = a.bits();
    if a.is_empty() || a.is_nan_only() {
        return *a;
    }
    if b.is_empty() || b.is_nan_only() {
        return *b;
    }
    let non_nan = a.is_non_nan()
        && b.is_non_nan()
        && !(a.can_be_inf() && b.can_be_inf())
        && !(a.contains(0.0) && b.contains(0.0));
    let infinite = |s: &FloatStamp| s.lower_bound() == s.upper_bound() && s.lower_bound().is_infinite();
    let (l1, u1, l2, u2) = (a.lower_bound(), a.upper_bound(), b.lower_bound(), b.upper_bound());

    if infinite(b) {
        if infinite(a) {
            return FloatStamp::nan_of(bits);
        }
        return FloatStamp::new(bits, -0.0, 0.0, non_nan);
    }
    if infinite(a) {
        let (lower, upper) = if l2 > 0.0 {
            (l1 / l2, l1 / l2)
        } else if u2 < 0.0 {
            (l1 / u2, l1 / u2)
        } else {
            (NEG_INF, INF)
        };
        return FloatStamp::new(bits, lower, upper, non_nan);
    }

    // With a divisor of one sign the quotient is monotone in each operand.
    let (lower, upper) = if l2 > 0.0 {
        (
            l1 / if l1 < 0.0 { l2 } else { u2 },
            u1 / if u1 < 0.0 { u2 } else { l2 },
        )
    } else if u2 < 0.0 {
        (
            u1 / if u1 < 0.0 { l2 } else { u2 },
            l1 / if l1 < 0.0 { u2 } else { l2 },
        )
    } else {
        (NEG_INF, INF)
    };
    FloatStamp::new(bits, round(bits, lower), round(bits, upper), non_nan)
}

pub(crate) fn min(a: &FloatStamp, b: &FloatStamp) -> FloatStamp {
    FloatStamp::new(
        a.bits(),
        ieee_min(a.lower_bound(), b.lower_bound()),
        ieee_min(a.upper_bound(), b.upper_bound()),
        a.is_non_nan() && b.is_non_nan(),
    )
}

pub(crate) fn max(a: &FloatStamp, b: &FloatStamp) -> FloatStamp {
    FloatStamp::new(
        a.bits(),
        ieee_max(a.lower_bound(), b.lower_bound()),
        ieee_max(a.upper_bound(), b.upper_bound()),
        a.is_non_nan() && b.is_non_nan(),
    )
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn convert_operand(kind: FloatConvert, c: &Constant) -> StampResult<f64> {
    let (_, v) = float_operand(kind.name(), c)?;
    if c.kind() != kind.input_kind() {
        return Err(StampError::incompatible_constants(kind.name(), c, &kind.input_kind()));
    }
    Ok(v)
}

fn result_bits(kind: FloatConvert) -> u32 {
    if kind.result_kind() == ValueKind::Int32 {
        32
    } else {
        64
    }
}

/// Saturating conversion with NaN mapping to zero.
fn to_integer(bits: u32, v: f64) -> i64 {
    if v.is_nan() {
        return 0;
    }
    match v.trunc().to_i64() {
        Some(x) => bits::saturate(x, bits),
        None if v < 0.0 => bits::min_value(bits),
        None => bits::max_value(bits),
    }
}

/// Saturating unsigned conversion: NaN and negative values map to zero.
fn to_unsigned(bits: u32, v: f64) -> u64 {
    // `as` truncates toward zero and saturates at both ends of u64.
    (v as u64).min(bits::max_unsigned(bits) as u64)
}

fn fold_to_integer(kind: FloatConvert, c: &Constant) -> StampResult<Option<Constant>> {
    let v = convert_operand(kind, c)?;
    let bits = result_bits(kind);
    let value = if kind.is_unsigned() {
        to_unsigned(bits, v) as i64
    } else {
        to_integer(bits, v)
    };
    Ok(Constant::for_integer_kind(kind.result_kind(), value))
}

fn to_unsigned_stamp(kind: FloatConvert, s: &Stamp) -> StampResult<Stamp> {
    let input = float_stamp(kind.name(), s)?;
    let bits = result_bits(kind);
    if input.is_nan_only() {
        return Ok(Stamp::Integer(IntegerStamp::constant_of(bits, 0)));
    }
    let lower = if input.can_be_nan() {
        0
    } else {
        to_unsigned(bits, input.lower_bound())
    };
    let upper = to_unsigned(bits, input.upper_bound());
    Ok(StampFactory::for_unsigned_integer(bits, lower, upper))
}

fn to_integer_stamp(kind: FloatConvert, s: &Stamp) -> StampResult<Stamp> {
    if kind.is_unsigned() {
        return to_unsigned_stamp(kind, s);
    }
    let input = float_stamp(kind.name(), s)?;
    let bits = result_bits(kind);
    if input.is_nan_only() {
        return Ok(Stamp::Integer(IntegerStamp::constant_of(bits, 0)));
    }
    let mut lower = to_integer(bits, input.lower_bound());
    let mut upper = to_integer(bits, input.upper_bound());
    if input.can_be_nan() {
        lower = lower.min(0);
        upper = upper.max(0);
    }
    Ok(Stamp::Integer(IntegerStamp::range(bits, lower, upper)))
}

fn fold_widen(c: &Constant) -> StampResult<Option<Constant>> {
    let v = convert_operand(FloatConvert::F2D, c)?;
    Ok(Some(Constant::for_double(v)))
}

fn fold_round(c: &Constant) -> StampResult<Option<Constant>> {
    let v = convert_operand(FloatConvert::D2F, c)?;
    Ok(Some(Constant::for_float(v as f32)))
}

fn widen_stamp(s: &Stamp) -> StampResult<Stamp> {
    let input = float_stamp("f2d", s)?;
    Ok(Stamp::Float(FloatStamp::new(
        64,
        input.lower_bound(),
        input.upper_bound(),
        input.is_non_nan(),
    )))
}

fn round_stamp(s: &Stamp) -> StampResult<Stamp> {
    let input = float_stamp("d2f", s)?;
    // Rounding is monotone, so rounding the bounds bounds the results.
    Ok(Stamp::Float(FloatStamp::new(
        32,
        f64::from(input.lower_bound() as f32),
        f64::from(input.upper_bound() as f32),
        input.is_non_nan(),
    )))
}

// ---------------------------------------------------------------------------
// Fused multiply-add and reinterpretation
// ---------------------------------------------------------------------------

fn fold_fma(a: &Constant, b: &Constant, c: &Constant) -> StampResult<Option<Constant>> {
    match (a, b, c) {
        (Constant::Float32(x), Constant::Float32(y), Constant::Float32(z)) => {
            Ok(Some(Constant::for_float(x.mul_add(*y, *z))))
        }
        (Constant::Float64(x), Constant::Float64(y), Constant::Float64(z)) => {
            Ok(Some(Constant::for_double(x.mul_add(*y, *z))))
        }
        _ => Err(StampError::incompatible_constants("fma", a, &format!("{}, {}", b, c))),
    }
}

/// The bits of a float as a sign-extended integer of the same width.
fn float_pattern(bits: u32, value: f64) -> i64 {
    if bits == 32 {
        i64::from((value as f32).to_bits() as i32)
    } else {
        value.to_bits() as i64
    }
}

fn fold_reinterpret(result: ValueKind, c: &Constant) -> StampResult<Option<Constant>> {
    let (bits, v) = float_operand("reinterpret", c)?;
    Ok(result
        .is_numeric_integer()
        .then(|| Constant::int(bits, float_pattern(bits, v))))
}

/// Positive floats order like their bit patterns, negative floats in
/// reverse. Zeros of both signs and NaN payloads break the order.
fn reinterpret_stamp(result: ValueKind, s: &Stamp) -> StampResult<Stamp> {
    let input = float_stamp("reinterpret", s)?;
    let bits = input.bits();
    if !result.is_numeric_integer() {
        return Err(StampError::incompatible_stamps("reinterpret", s, &result));
    }
    let (lower, upper) = (input.lower_bound(), input.upper_bound());
    let stamp = if input.can_be_nan() {
        IntegerStamp::unrestricted_of(bits)
    } else if lower > 0.0 {
        IntegerStamp::range(bits, float_pattern(bits, lower), float_pattern(bits, upper))
    } else if upper < 0.0 {
        IntegerStamp::range(bits, float_pattern(bits, upper), float_pattern(bits, lower))
    } else {
        IntegerStamp::unrestricted_of(bits)
    };
    Ok(Stamp::Integer(stamp))
}

// ---------------------------------------------------------------------------
// Identity elements
// ---------------------------------------------------------------------------

fn is_exactly(c: &Constant, value: f64) -> bool {
    c.as_double()
        .is_some_and(|v| v.to_bits() == value.to_bits())
}

pub(super) fn table() -> ArithmeticOpTable {
    use BinaryOpKind as B;

    let ops: Vec<OpDescriptor> = vec![
        UnaryOp::new(UnaryOpKind::Neg, |c| fold1("neg", c, |v| -v), |s| lift1("neg", s, neg)).into(),
        UnaryOp::new(
            UnaryOpKind::Not,
            |c| {
                let (bits, v) = float_operand("not", c)?;
                Ok(Some(from_raw_bits(bits, !raw_bits(bits, v))))
            },
            |s| Ok(Stamp::Float(float_stamp("not", s)?.unrestricted())),
        )
        .into(),
        UnaryOp::new(UnaryOpKind::Abs, |c| fold1("abs", c, f64::abs), |s| lift1("abs", s, abs)).into(),
        UnaryOp::new(
            UnaryOpKind::Sqrt,
            |c| {
                let (bits, v) = float_operand("sqrt", c)?;
                Ok(Some(float_constant(bits, rounded_sqrt(bits, v))))
            },
            |s| lift1("sqrt", s, sqrt),
        )
        .into(),
        BinaryOp::new(
            B::Add,
            |a, b| fold2("add", a, b, |x, y| x + y),
            |a, b| lift2("add", a, b, add),
        )
        .commutative()
        .with_neutral(|c| is_exactly(c, -0.0))
        .into(),
        BinaryOp::new(
            B::Sub,
            |a, b| fold2("sub", a, b, |x, y| x - y),
            |a, b| lift2("sub", a, b, sub),
        )
        .with_neutral(|c| is_exactly(c, 0.0))
        .into(),
        BinaryOp::new(
            B::Mul,
            |a, b| fold2("mul", a, b, |x, y| x * y),
            |a, b| lift2("mul", a, b, mul),
        )
        .commutative()
        .with_neutral(|c| is_exactly(c, 1.0))
        .into(),
        BinaryOp::new(
            B::Div,
            |a, b| fold2("div", a, b, |x, y| x / y),
            |a, b| lift2("div", a, b, div),
        )
        .with_neutral(|c| is_exactly(c, 1.0))
        .into(),
        BinaryOp::new(
            B::Rem,
            |a, b| fold2("rem", a, b, |x, y| x % y),
            |a, b| imprecise("rem", a, b),
        )
        .into(),
        BinaryOp::new(
            B::And,
            |a, b| fold_bitwise("and", a, b, |x, y| x & y),
            |a, b| imprecise("and", a, b),
        )
        .commutative()
        .associative()
        .into(),
        BinaryOp::new(
            B::Or,
            |a, b| fold_bitwise("or", a, b, |x, y| x | y),
            |a, b| imprecise("or", a, b),
        )
        .commutative()
        .associative()
        .into(),
        BinaryOp::new(
            B::Xor,
            |a, b| fold_bitwise("xor", a, b, |x, y| x ^ y),
            |a, b| imprecise("xor", a, b),
        )
        .commutative()
        .associative()
        .into(),
        BinaryOp::new(
            B::Min,
            |a, b| fold2("min", a, b, ieee_min),
            |a, b| lift2("min", a, b, min),
        )
        .commutative()
        .associative()
        .with_neutral(|c| is_exactly(c, f64::INFINITY))
        .into(),
        BinaryOp::new(
            B::Max,
            |a, b| fold2("max", a, b, ieee_max),
            |a, b| lift2("max", a, b, max),
        )
        .commutative()
        .associative()
        .with_neutral(|c| is_exactly(c, f64::NEG_INFINITY))
        .into(),
        FloatConvertOp::new(
            FloatConvert::F2I,
            |c| fold_to_integer(FloatConvert::F2I, c),
            |s| to_integer_stamp(FloatConvert::F2I, s),
        )
        .into(),
        FloatConvertOp::new(
            FloatConvert::F2L,
            |c| fold_to_integer(FloatConvert::F2L, c),
            |s| to_integer_stamp(FloatConvert::F2L, s),
        )
        .into(),
        FloatConvertOp::new(
            FloatConvert::D2I,
            |c| fold_to_integer(FloatConvert::D2I, c),
            |s| to_integer_stamp(FloatConvert::D2I, s),
        )
        .into(),
        FloatConvertOp::new(
            FloatConvert::D2L,
            |c| fold_to_integer(FloatConvert::D2L, c),
            |s| to_integer_stamp(FloatConvert::D2L, s),
        )
        .into(),
        FloatConvertOp::new(FloatConvert::F2D, fold_widen, widen_stamp).into(),
        FloatConvertOp::new(FloatConvert::D2F, fold_round, round_stamp).into(),
        FloatConvertOp::new(
            FloatConvert::F2UI,
            |c| fold_to_integer(FloatConvert::F2UI, c),
            |s| to_integer_stamp(FloatConvert::F2UI, s),
        )
        .into(),
        FloatConvertOp::new(
            FloatConvert::F2UL,
            |c| fold_to_integer(FloatConvert::F2UL, c),
            |s| to_integer_stamp(FloatConvert::F2UL, s),
        )
        .into(),
        FloatConvertOp::new(
            FloatConvert::D2UI,
            |c| fold_to_integer(FloatConvert::D2UI, c),
            |s| to_integer_stamp(FloatConvert::D2UI, s),
        )
        .into(),
        FloatConvertOp::new(
            FloatConvert::D2UL,
            |c| fold_to_integer(FloatConvert::D2UL, c),
            |s| to_integer_stamp(FloatConvert::D2UL, s),
        )
        .into(),
        TernaryOp::new(TernaryOpKind::Fma, fold_fma, |a, _, _| {
            Ok(Stamp::Float(float_stamp("fma", a)?.unrestricted()))
        })
        .into(),
        ReinterpretOp::new(fold_reinterpret, reinterpret_stamp).into(),
    ];
    ArithmeticOpTable::create(ops)
}
