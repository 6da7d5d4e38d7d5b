//! Integer operators.
//!
//! Constant folds compute on sign-extended `i64` values with wrapping
//! arithmetic and truncate to the operand width, matching two's-complement
//! machine semantics. Stamp folds over-approximate: every concrete result of
//! the operation applied to members of the inputs is a member of the output.
#![allow(clippy::cast_sign_loss)]

use crate::bits::{self, mask, max_value, min_value};
use crate::constant::Constant;
use crate::error::{StampError, StampResult};
use crate::kind::ValueKind;
use crate::stamp::{FloatStamp, IntegerStamp, Stamp};

use super::descriptor::{
    BinaryOp, FloatConvertOp, IntegerConvertOp, OpDescriptor, ReinterpretOp, ShiftOp, UnaryOp,
};
use super::table::ArithmeticOpTable;
use super::{BinaryOpKind, FloatConvert, IntegerConvertKind, ShiftOpKind, UnaryOpKind};

// ---------------------------------------------------------------------------
// Operand extraction
// ---------------------------------------------------------------------------

fn int_operand(op: &'static str, c: &Constant) -> StampResult<(u32, i64)> {
    c.integer_parts()
        .ok_or_else(|| StampError::incompatible_constants(op, c, &"integer"))
}

fn int_operands(op: &'static str, a: &Constant, b: &Constant) -> StampResult<(u32, i64, i64)> {
    match (a.integer_parts(), b.integer_parts()) {
        (Some((bits_a, x)), Some((bits_b, y))) if bits_a == bits_b => Ok((bits_a, x, y)),
        _ => Err(StampError::incompatible_constants(op, a, b)),
    }
}

fn int_stamp<'a>(op: &'static str, s: &'a Stamp) -> StampResult<&'a IntegerStamp> {
    s.as_integer()
        .ok_or_else(|| StampError::incompatible_stamps(op, s, &"integer"))
}

fn fold1(op: &'static str, c: &Constant, f: fn(i64) -> i64) -> StampResult<Option<Constant>> {
    let (bits, v) = int_operand(op, c)?;
    Ok(Some(Constant::int(bits, f(v))))
}

fn fold2(
    op: &'static str,
    a: &Constant,
    b: &Constant,
    f: fn(u32, i64, i64) -> Option<i64>,
) -> StampResult<Option<Constant>> {
    let (bits, x, y) = int_operands(op, a, b)?;
    Ok(f(bits, x, y).map(|v| Constant::int(bits, v)))
}

fn lift1(op: &'static str, s: &Stamp, f: fn(&IntegerStamp) -> IntegerStamp) -> StampResult<Stamp> {
    Ok(Stamp::Integer(f(int_stamp(op, s)?)))
}

fn lift2(
    op: &'static str,
    a: &Stamp,
    b: &Stamp,
    f: fn(&IntegerStamp, &IntegerStamp) -> IntegerStamp,
) -> StampResult<Stamp> {
    let (x, y) = (int_stamp(op, a)?, int_stamp(op, b)?);
    if x.bits() != y.bits() {
        return Err(StampError::BitWidthMismatch {
            op,
            expected: x.bits(),
            found: y.bits(),
        });
    }
    Ok(Stamp::Integer(f(x, y)))
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

fn add_overflows_positively(x: i64, y: i64, bits: u32) -> bool {
    let result = x.wrapping_add(y);
    if bits == 64 {
        (!x & !y & result) < 0
    } else {
        result > max_value(bits)
    }
}

fn add_overflows_negatively(x: i64, y: i64, bits: u32) -> bool {
    let result = x.wrapping_add(y);
    if bits == 64 {
        (x & y & !result) < 0
    } else {
        result < min_value(bits)
    }
}

pub(crate) fn add(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    let bits = a.bits();
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    if let (Some(x), Some(y)) = (a.as_constant_value(), b.as_constant_value()) {
        return IntegerStamp::constant_of(bits, x.wrapping_add(y));
    }
    if a.is_unrestricted() {
        return *a;
    }
    if b.is_unrestricted() {
        return *b;
    }

    let default_mask = mask(bits);
    let variable_bits = (a.down_mask() ^ a.up_mask()) | (b.down_mask() ^ b.up_mask());
    let variable_bits_with_carry = variable_bits
        | (bits::carry_bits(a.down_mask(), b.down_mask()) ^ bits::carry_bits(a.up_mask(), b.up_mask()));
    let known_sum = a.down_mask().wrapping_add(b.down_mask());
    let mut down = known_sum & !variable_bits_with_carry & default_mask;
    let mut up = (known_sum | variable_bits_with_carry) & default_mask;

    let (lo_a, hi_a, lo_b, hi_b) = (a.lower_bound(), a.upper_bound(), b.lower_bound(), b.upper_bound());
    let lower_negative = add_overflows_negatively(lo_a, lo_b, bits);
    let lower_positive = add_overflows_positively(lo_a, lo_b, bits);
    let upper_negative = add_overflows_negatively(hi_a, hi_b, bits);
    let upper_positive = add_overflows_positively(hi_a, hi_b, bits);

    // Bounds that wrap in different directions cannot be ordered.
    let (mut lower, mut upper) =
        if (lower_negative && !upper_negative) || (!lower_positive && upper_positive) {
            (min_value(bits), max_value(bits))
        } else {
            (
                bits::narrow(lo_a.wrapping_add(lo_b), bits),
                bits::narrow(hi_a.wrapping_add(hi_b), bits),
            )
        };

    let limit = IntegerStamp::range(bits, lower, upper);
    up &= limit.up_mask();
    upper = bits::sign_extend(upper as u64 & up, bits);
    down |= limit.down_mask();
    lower = bits::sign_extend(lower as u64 | down, bits);
    IntegerStamp::create(bits, lower, upper, down, up)
}

pub(crate) fn neg(a: &IntegerStamp) -> IntegerStamp {
    let bits = a.bits();
    if a.is_empty() {
        return *a;
    }
    if let Some(v) = a.as_constant_value() {
        return IntegerStamp::constant_of(bits, v.wrapping_neg());
    }
    if a.lower_bound() != min_value(bits) {
        return IntegerStamp::range(bits, -a.upper_bound(), -a.lower_bound());
    }
    a.unrestricted()
}

pub(crate) fn sub(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    if b.is_empty() {
        return *b;
    }
    add(a, &neg(b))
}

pub(crate) fn mul(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    if let (Some(x), Some(y)) = (a.as_constant_value(), b.as_constant_value()) {
        return IntegerStamp::constant_of(a.bits(), x.wrapping_mul(y));
    }
    if a.up_mask() == 0 {
        return *a;
    }
    if b.up_mask() == 0 {
        return *b;
    }
    a.unrestricted()
}

pub(crate) fn div(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    let bits = a.bits();
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    if b.is_strictly_positive() {
        let (lo_b, hi_b) = (b.lower_bound(), b.upper_bound());
        let lower = (a.lower_bound() / lo_b).min(a.lower_bound() / hi_b);
        let upper = (a.upper_bound() / lo_b).max(a.upper_bound() / hi_b);
        return IntegerStamp::range(bits, lower, upper);
    }
    a.unrestricted()
}

pub(crate) fn rem(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    let bits = a.bits();
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    // The result takes the dividend's sign and is smaller in magnitude than
    // both operands.
    let magnitude = if b.lower_bound() == min_value(bits) {
        max_value(bits)
    } else {
        b.lower_bound().abs().max(b.upper_bound().abs()) - 1
    };
    if magnitude < 0 {
        // The divisor is always zero.
        return a.empty();
    }
    let lower = a.lower_bound().min(0).max(-magnitude);
    let upper = a.upper_bound().max(0).min(magnitude);
    IntegerStamp::range(bits, lower, upper)
}

pub(crate) fn abs(a: &IntegerStamp) -> IntegerStamp {
    let bits = a.bits();
    if a.is_empty() {
        return *a;
    }
    if let Some(v) = a.as_constant_value() {
        return IntegerStamp::constant_of(bits, v.wrapping_abs());
    }
    if a.lower_bound() == min_value(bits) {
        return a.unrestricted();
    }
    if a.is_positive() {
        return *a;
    }
    IntegerStamp::range(bits, 0, (-a.lower_bound()).max(a.upper_bound()))
}

pub(crate) fn max(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    IntegerStamp::range(
        a.bits(),
        a.lower_bound().max(b.lower_bound()),
        a.upper_bound().max(b.upper_bound()),
    )
}

pub(crate) fn min(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    IntegerStamp::range(
        a.bits(),
        a.lower_bound().min(b.lower_bound()),
        a.upper_bound().min(b.upper_bound()),
    )
}

/// Integers whose unsigned reading lies in `[lower, upper]`, with known bits.
fn unsigned_range(bits: u32, lower: u64, upper: u64, down_mask: u64, up_mask: u64) -> IntegerStamp {
    let (mut signed_lower, mut signed_upper) = (bits::sign_extend(lower, bits), bits::sign_extend(upper, bits));
    if (signed_lower >= 0) != (signed_upper >= 0) {
        signed_lower = min_value(bits);
        signed_upper = max_value(bits);
    }
    IntegerStamp::create(bits, signed_lower, signed_upper, down_mask, up_mask)
}

/// Unsigned min or max. The result is one of the operands, so only bits
/// known in both survive.
fn unsigned_pick(a: &IntegerStamp, b: &IntegerStamp, pick: fn(u64, u64) -> u64) -> IntegerStamp {
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    unsigned_range(
        a.bits(),
        pick(a.unsigned_lower_bound(), b.unsigned_lower_bound()),
        pick(a.unsigned_upper_bound(), b.unsigned_upper_bound()),
        a.down_mask() & b.down_mask(),
        a.up_mask() | b.up_mask(),
    )
}

pub(crate) fn umax(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    unsigned_pick(a, b, u64::max)
}

pub(crate) fn umin(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    unsigned_pick(a, b, u64::min)
}

fn signed_high(bits: u32, x: i64, y: i64) -> i64 {
    ((i128::from(x) * i128::from(y)) >> bits) as i64
}

fn unsigned_high(bits: u32, x: u64, y: u64) -> u64 {
    ((u128::from(x) * u128::from(y)) >> bits) as u64
}

/// The product is bilinear, so its extremes over a box sit at the corners.
fn corner_extremes<T: Copy + Ord>(corners: [T; 4]) -> (T, T) {
    corners
        .iter()
        .fold((corners[0], corners[0]), |(lower, upper), &c| (lower.min(c), upper.max(c)))
}

pub(crate) fn mul_high(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    let bits = a.bits();
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    let (la, ua, lb, ub) = (a.lower_bound(), a.upper_bound(), b.lower_bound(), b.upper_bound());
    let (lower, upper) = corner_extremes([
        signed_high(bits, la, lb),
        signed_high(bits, la, ub),
        signed_high(bits, ua, lb),
        signed_high(bits, ua, ub),
    ]);
    IntegerStamp::range(bits, lower, upper)
}

pub(crate) fn umul_high(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    let bits = a.bits();
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    let (la, ua) = (a.unsigned_lower_bound(), a.unsigned_upper_bound());
    let (lb, ub) = (b.unsigned_lower_bound(), b.unsigned_upper_bound());
    let (lower, upper) = corner_extremes([
        unsigned_high(bits, la, lb),
        unsigned_high(bits, la, ub),
        unsigned_high(bits, ua, lb),
        unsigned_high(bits, ua, ub),
    ]);
    unsigned_range(bits, lower, upper, 0, mask(bits))
}

// ---------------------------------------------------------------------------
// Bitwise
// ---------------------------------------------------------------------------

pub(crate) fn not(a: &IntegerStamp) -> IntegerStamp {
    if a.is_empty() {
        return *a;
    }
    let default_mask = mask(a.bits());
    IntegerStamp::create(
        a.bits(),
        !a.upper_bound(),
        !a.lower_bound(),
        !a.up_mask() & default_mask,
        !a.down_mask() & default_mask,
    )
}

pub(crate) fn and(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    IntegerStamp::for_mask(a.bits(), a.down_mask() & b.down_mask(), a.up_mask() & b.up_mask())
}

pub(crate) fn or(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    IntegerStamp::for_mask(a.bits(), a.down_mask() | b.down_mask(), a.up_mask() | b.up_mask())
}

pub(crate) fn xor(a: &IntegerStamp, b: &IntegerStamp) -> IntegerStamp {
    if a.is_empty() {
        return *a;
    }
    if b.is_empty() {
        return *b;
    }
    let variable_bits = (a.down_mask() ^ a.up_mask()) | (b.down_mask() ^ b.up_mask());
    let known = a.down_mask() ^ b.down_mask();
    IntegerStamp::for_mask(a.bits(), known & !variable_bits, known | variable_bits)
}

// ---------------------------------------------------------------------------
// Shifts
// ---------------------------------------------------------------------------

/// Shift amounts are masked to the stack width: 31 for 32-bit and narrower, 63 for 64-bit.
fn stack_shift_mask(bits: u32) -> i64 {
    if bits > 32 {
        63
    } else {
        31
    }
}

/// Bits that may be set in any value of `[lower, upper]`.
fn may_be_set_for(bits: u32, lower: i64, upper: i64) -> u64 {
    let combined = (lower | upper) as u64;
    if combined == 0 {
        0
    } else {
        (u64::MAX >> combined.leading_zeros()) & mask(bits)
    }
}

/// True if shifting `value` left by `amount` keeps every discarded bit equal to the sign.
fn no_sign_change_after_shifting(bits: u32, value: i64, amount: u32) -> bool {
    let removed_bits = (-1i64).wrapping_shl(bits - amount - 1);
    if value < 0 {
        value & removed_bits == removed_bits
    } else {
        value & removed_bits == 0
    }
}

fn has_precise_shift_width(bits: u32) -> bool {
    bits == 32 || bits == 64
}

pub(crate) fn shl(value: &IntegerStamp, amount: &IntegerStamp) -> IntegerStamp {
    let bits = value.bits();
    if value.is_empty() {
        return *value;
    }
    if amount.is_empty() {
        return value.empty();
    }
    if value.up_mask() == 0 {
        return *value;
    }
    if !has_precise_shift_width(bits) {
        return value.unrestricted();
    }
    let shift_mask = i64::from(bits - 1);
    let shift_bits = (bits - 1).count_ones();
    let default_mask = mask(bits);

    if let Some(n) = amount.as_constant_value() {
        let shift = (n & shift_mask) as u32;
        if shift == 0 {
            return *value;
        }
        if no_sign_change_after_shifting(bits, value.lower_bound(), shift)
            && no_sign_change_after_shifting(bits, value.upper_bound(), shift)
        {
            return IntegerStamp::create(
                bits,
                value.lower_bound() << shift,
                value.upper_bound() << shift,
                (value.down_mask() << shift) & default_mask,
                (value.up_mask() << shift) & default_mask,
            );
        }
    }
    if amount.lower_bound() >> shift_bits == amount.upper_bound() >> shift_bits {
        let mut down = default_mask;
        let mut up = 0u64;
        for i in amount.lower_bound()..=amount.upper_bound() {
            if amount.contains(i) {
                let shift = (i & shift_mask) as u32;
                down &= value.down_mask() << shift;
                up |= value.up_mask() << shift;
            }
        }
        return IntegerStamp::for_mask(bits, down & default_mask, up & default_mask);
    }
    value.unrestricted()
}

pub(crate) fn shr(value: &IntegerStamp, amount: &IntegerStamp) -> IntegerStamp {
    let bits = value.bits();
    if value.is_empty() {
        return *value;
    }
    if amount.is_empty() {
        return value.empty();
    }
    if !has_precise_shift_width(bits) {
        return value.unrestricted();
    }
    let default_mask = mask(bits);

    if let Some(n) = amount.as_constant_value() {
        let shift = (n & i64::from(bits - 1)) as u32;
        if shift == 0 {
            return *value;
        }
        // Move the sign bit to bit 63 so the arithmetic shift replicates it.
        let extra = 64 - bits;
        let down = (((value.down_mask() << extra) as i64) >> (shift + extra)) as u64 & default_mask;
        let up = (((value.up_mask() << extra) as i64) >> (shift + extra)) as u64 & default_mask;
        return IntegerStamp::create(
            bits,
            value.lower_bound() >> shift,
            value.upper_bound() >> shift,
            down,
            up,
        );
    }
    let may = may_be_set_for(bits, value.lower_bound(), value.upper_bound());
    IntegerStamp::for_mask(bits, 0, may)
}

pub(crate) fn ushr(value: &IntegerStamp, amount: &IntegerStamp) -> IntegerStamp {
    let bits = value.bits();
    if value.is_empty() {
        return *value;
    }
    if amount.is_empty() {
        return value.empty();
    }
    if !has_precise_shift_width(bits) {
        return value.unrestricted();
    }

    if let Some(n) = amount.as_constant_value() {
        let shift = (n & i64::from(bits - 1)) as u32;
        if shift == 0 {
            return *value;
        }
        let down = value.down_mask() >> shift;
        let up = value.up_mask() >> shift;
        return if value.lower_bound() < 0 {
            IntegerStamp::create(bits, down as i64, up as i64, down, up)
        } else {
            IntegerStamp::create(
                bits,
                value.lower_bound() >> shift,
                value.upper_bound() >> shift,
                down,
                up,
            )
        };
    }
    let may = may_be_set_for(bits, value.lower_bound(), value.upper_bound());
    IntegerStamp::for_mask(bits, 0, may)
}

fn shift_operands(op: &'static str, value: &Constant, amount: &Constant) -> StampResult<(u32, i64, u32)> {
    let (bits, v) = int_operand(op, value)?;
    let (_, n) = int_operand(op, amount)?;
    Ok((bits, v, (n & stack_shift_mask(bits)) as u32))
}

fn fold_shl(value: &Constant, amount: &Constant) -> StampResult<Option<Constant>> {
    let (bits, v, shift) = shift_operands("shl", value, amount)?;
    Ok(Some(Constant::int(bits, v.wrapping_shl(shift))))
}

fn fold_shr(value: &Constant, amount: &Constant) -> StampResult<Option<Constant>> {
    let (bits, v, shift) = shift_operands("shr", value, amount)?;
    Ok(Some(Constant::int(bits, v >> shift)))
}

fn fold_ushr(value: &Constant, amount: &Constant) -> StampResult<Option<Constant>> {
    let (bits, v, shift) = shift_operands("ushr", value, amount)?;
    let stack_bits = if bits > 32 { 64 } else { 32 };
    let unsigned = bits::zero_extend(v, stack_bits) >> shift;
    Ok(Some(Constant::int(bits, unsigned as i64)))
}

// ---------------------------------------------------------------------------
// Width conversions
// ---------------------------------------------------------------------------

pub(crate) fn zero_extend(input_bits: u32, result_bits: u32, s: &IntegerStamp) -> IntegerStamp {
    if s.is_empty() {
        return IntegerStamp::empty_of(result_bits);
    }
    if input_bits == result_bits {
        return *s;
    }
    // When the signed range straddles zero only the masks survive extension.
    IntegerStamp::create(
        result_bits,
        s.unsigned_lower_bound() as i64,
        s.unsigned_upper_bound() as i64,
        s.down_mask(),
        s.up_mask(),
    )
}

pub(crate) fn sign_extend(input_bits: u32, result_bits: u32, s: &IntegerStamp) -> IntegerStamp {
    if s.is_empty() {
        return IntegerStamp::empty_of(result_bits);
    }
    if input_bits == result_bits {
        return *s;
    }
    let result_mask = mask(result_bits);
    IntegerStamp::create(
        result_bits,
        s.lower_bound(),
        s.upper_bound(),
        bits::sign_extend(s.down_mask(), input_bits) as u64 & result_mask,
        bits::sign_extend(s.up_mask(), input_bits) as u64 & result_mask,
    )
}

pub(crate) fn narrow(input_bits: u32, result_bits: u32, s: &IntegerStamp) -> IntegerStamp {
    if s.is_empty() {
        return IntegerStamp::empty_of(result_bits);
    }
    if input_bits == result_bits {
        return *s;
    }
    let (min, max) = (min_value(result_bits), max_value(result_bits));
    let (lower, upper) = if s.lower_bound() >= min && s.upper_bound() <= max {
        (s.lower_bound(), s.upper_bound())
    } else {
        (min, max)
    };
    let result_mask = mask(result_bits);
    IntegerStamp::create(
        result_bits,
        lower,
        upper,
        s.down_mask() & result_mask,
        s.up_mask() & result_mask,
    )
}

fn convert_operand(op: &'static str, input_bits: u32, c: &Constant) -> StampResult<i64> {
    let (bits, v) = int_operand(op, c)?;
    if bits != input_bits {
        return Err(StampError::BitWidthMismatch {
            op,
            expected: input_bits,
            found: bits,
        });
    }
    Ok(v)
}

fn lift_convert(
    op: &'static str,
    input_bits: u32,
    result_bits: u32,
    s: &Stamp,
    f: fn(u32, u32, &IntegerStamp) -> IntegerStamp,
) -> StampResult<Stamp> {
    Ok(Stamp::Integer(f(input_bits, result_bits, int_stamp(op, s)?)))
}

// ---------------------------------------------------------------------------
// Integer to float
// ---------------------------------------------------------------------------

fn to_float_operand(kind: FloatConvert, c: &Constant) -> StampResult<i64> {
    let (_, v) = int_operand(kind.name(), c)?;
    if c.kind().stack_kind() != kind.input_kind() {
        return Err(StampError::incompatible_constants(kind.name(), c, &kind.input_kind()));
    }
    Ok(v)
}

fn to_float_stamp(kind: FloatConvert, s: &Stamp) -> StampResult<Stamp> {
    let input = int_stamp(kind.name(), s)?;
    let (lower, upper) = (input.lower_bound(), input.upper_bound());
    // Rounding is monotone, so converting the bounds bounds the results.
    let stamp = match kind.result_kind().bits() {
        Some(32) => FloatStamp::new(32, f64::from(lower as f32), f64::from(upper as f32), true),
        _ => FloatStamp::new(64, lower as f64, upper as f64, true),
    };
    Ok(Stamp::Float(stamp))
}

fn fold_to_float(kind: FloatConvert, c: &Constant) -> StampResult<Option<Constant>> {
    let v = to_float_operand(kind, c)?;
    Ok(Some(match kind.result_kind() {
        ValueKind::Float32 => Constant::for_float(v as f32),
        _ => Constant::for_double(v as f64),
    }))
}

// ---------------------------------------------------------------------------
// Reinterpretation as float
// ---------------------------------------------------------------------------

fn float_from_pattern(bits: u32, pattern: i64) -> f64 {
    if bits == 32 {
        f64::from(f32::from_bits(pattern as u32))
    } else {
        f64::from_bits(pattern as u64)
    }
}

/// Bit patterns of +inf and -inf as sign-extended integers of the width.
fn infinity_patterns(bits: u32) -> (i64, i64) {
    if bits == 32 {
        (
            i64::from(f32::INFINITY.to_bits() as i32),
            i64::from(f32::NEG_INFINITY.to_bits() as i32),
        )
    } else {
        (f64::INFINITY.to_bits() as i64, f64::NEG_INFINITY.to_bits() as i64)
    }
}

fn fold_reinterpret(result: ValueKind, c: &Constant) -> StampResult<Option<Constant>> {
    let (bits, v) = int_operand("reinterpret", c)?;
    Ok(match result {
        ValueKind::Float32 if bits == 32 => Some(Constant::for_float(f32::from_bits(v as u32))),
        ValueKind::Float64 if bits == 64 => Some(Constant::for_double(f64::from_bits(v as u64))),
        _ => None,
    })
}

/// Non-negative patterns order like the floats they encode up to +inf, with
/// NaNs above. Negative patterns run from -0.0 down to -inf, with NaNs above.
fn reinterpret_stamp(result: ValueKind, s: &Stamp) -> StampResult<Stamp> {
    let input = int_stamp("reinterpret", s)?;
    let bits = input.bits();
    if !result.is_numeric_float() {
        return Err(StampError::incompatible_stamps("reinterpret", s, &result));
    }
    let (lower, upper) = (input.lower_bound(), input.upper_bound());
    let (pos_inf, neg_inf) = infinity_patterns(bits);
    let stamp = if lower >= 0 {
        if lower > pos_inf {
            FloatStamp::nan_of(bits)
        } else {
            FloatStamp::new(
                bits,
                float_from_pattern(bits, lower),
                float_from_pattern(bits, upper.min(pos_inf)),
                upper <= pos_inf,
            )
        }
    } else if upper < 0 {
        if lower > neg_inf {
            FloatStamp::nan_of(bits)
        } else {
            FloatStamp::new(
                bits,
                float_from_pattern(bits, upper.min(neg_inf)),
                float_from_pattern(bits, lower),
                upper <= neg_inf,
            )
        }
    } else {
        FloatStamp::unrestricted_of(bits)
    };
    Ok(Stamp::Float(stamp))
}

// ---------------------------------------------------------------------------
// Identity elements
// ---------------------------------------------------------------------------

fn is_zero(c: &Constant) -> bool {
    c.integer_parts().is_some_and(|(_, v)| v == 0)
}

fn is_one(c: &Constant) -> bool {
    c.integer_parts().is_some_and(|(_, v)| v == 1)
}

fn is_all_ones(c: &Constant) -> bool {
    c.integer_parts()
        .is_some_and(|(bits, v)| bits::zero_extend(v, bits) == mask(bits))
}

fn is_min_value(c: &Constant) -> bool {
    c.integer_parts().is_some_and(|(bits, v)| v == min_value(bits))
}

fn is_max_value(c: &Constant) -> bool {
    c.integer_parts().is_some_and(|(bits, v)| v == max_value(bits))
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

pub(super) fn table() -> ArithmeticOpTable {
    use BinaryOpKind as B;

    let ops: Vec<OpDescriptor> = vec![
        UnaryOp::new(
            UnaryOpKind::Neg,
            |c| fold1("neg", c, i64::wrapping_neg),
            |s| lift1("neg", s, neg),
        )
        .into(),
        UnaryOp::new(UnaryOpKind::Not, |c| fold1("not", c, |v| !v), |s| lift1("not", s, not)).into(),
        UnaryOp::new(
            UnaryOpKind::Abs,
            |c| fold1("abs", c, i64::wrapping_abs),
            |s| lift1("abs", s, abs),
        )
        .into(),
        BinaryOp::new(
            B::Add,
            |a, b| fold2("add", a, b, |_, x, y| Some(x.wrapping_add(y))),
            |a, b| lift2("add", a, b, add),
        )
        .commutative()
        .associative()
        .with_neutral(is_zero)
        .into(),
        BinaryOp::new(
            B::Sub,
            |a, b| fold2("sub", a, b, |_, x, y| Some(x.wrapping_sub(y))),
            |a, b| lift2("sub", a, b, sub),
        )
        .self_inverse()
        .with_neutral(is_zero)
        .into(),
        BinaryOp::new(
            B::Mul,
            |a, b| fold2("mul", a, b, |_, x, y| Some(x.wrapping_mul(y))),
            |a, b| lift2("mul", a, b, mul),
        )
        .commutative()
        .associative()
        .with_neutral(is_one)
        .into(),
        BinaryOp::new(
            B::Div,
            |a, b| fold2("div", a, b, |_, x, y| (y != 0).then(|| x.wrapping_div(y))),
            |a, b| lift2("div", a, b, div),
        )
        .with_neutral(is_one)
        .into(),
        BinaryOp::new(
            B::Rem,
            |a, b| fold2("rem", a, b, |_, x, y| (y != 0).then(|| x.wrapping_rem(y))),
            |a, b| lift2("rem", a, b, rem),
        )
        .into(),
        BinaryOp::new(
            B::And,
            |a, b| fold2("and", a, b, |_, x, y| Some(x & y)),
            |a, b| lift2("and", a, b, and),
        )
        .commutative()
        .associative()
        .with_neutral(is_all_ones)
        .into(),
        BinaryOp::new(
            B::Or,
            |a, b| fold2("or", a, b, |_, x, y| Some(x | y)),
            |a, b| lift2("or", a, b, or),
        )
        .commutative()
        .associative()
        .with_neutral(is_zero)
        .into(),
        BinaryOp::new(
            B::Xor,
            |a, b| fold2("xor", a, b, |_, x, y| Some(x ^ y)),
            |a, b| lift2("xor", a, b, xor),
        )
        .commutative()
        .associative()
        .self_inverse()
        .with_neutral(is_zero)
        .into(),
        BinaryOp::new(
            B::Min,
            |a, b| fold2("min", a, b, |_, x, y| Some(x.min(y))),
            |a, b| lift2("min", a, b, min),
        )
        .commutative()
        .associative()
        .with_neutral(is_max_value)
        .into(),
        BinaryOp::new(
            B::Max,
            |a, b| fold2("max", a, b, |_, x, y| Some(x.max(y))),
            |a, b| lift2("max", a, b, max),
        )
        .commutative()
        .associative()
        .with_neutral(is_min_value)
        .into(),
        BinaryOp::new(
            B::UMin,
            |a, b| {
                fold2("umin", a, b, |bits, x, y| {
                    Some(bits::zero_extend(x, bits).min(bits::zero_extend(y, bits)) as i64)
                })
            },
            |a, b| lift2("umin", a, b, umin),
        )
        .commutative()
        .associative()
        .with_neutral(is_all_ones)
        .into(),
        BinaryOp::new(
            B::UMax,
            |a, b| {
                fold2("umax", a, b, |bits, x, y| {
                    Some(bits::zero_extend(x, bits).max(bits::zero_extend(y, bits)) as i64)
                })
            },
            |a, b| lift2("umax", a, b, umax),
        )
        .commutative()
        .associative()
        .with_neutral(is_zero)
        .into(),
        BinaryOp::new(
            B::MulHigh,
            |a, b| fold2("mulhigh", a, b, |bits, x, y| Some(signed_high(bits, x, y))),
            |a, b| lift2("mulhigh", a, b, mul_high),
        )
        .commutative()
        .into(),
        BinaryOp::new(
            B::UMulHigh,
            |a, b| {
                fold2("umulhigh", a, b, |bits, x, y| {
                    Some(unsigned_high(bits, bits::zero_extend(x, bits), bits::zero_extend(y, bits)) as i64)
                })
            },
            |a, b| lift2("umulhigh", a, b, umul_high),
        )
        .commutative()
        .into(),
        ShiftOp::new(ShiftOpKind::Shl, fold_shl, |a, b| lift2_shift("shl", a, b, shl)).into(),
        ShiftOp::new(ShiftOpKind::Shr, fold_shr, |a, b| lift2_shift("shr", a, b, shr)).into(),
        ShiftOp::new(ShiftOpKind::UShr, fold_ushr, |a, b| lift2_shift("ushr", a, b, ushr)).into(),
        IntegerConvertOp::new(
            IntegerConvertKind::ZeroExtend,
            |from, to, c| {
                let v = convert_operand("zero_extend", from, c)?;
                Ok(Some(Constant::int(to, bits::zero_extend(v, from) as i64)))
            },
            |from, to, s| lift_convert("zero_extend", from, to, s, zero_extend),
        )
        .into(),
        IntegerConvertOp::new(
            IntegerConvertKind::SignExtend,
            |from, to, c| Ok(Some(Constant::int(to, convert_operand("sign_extend", from, c)?))),
            |from, to, s| lift_convert("sign_extend", from, to, s, sign_extend),
        )
        .into(),
        IntegerConvertOp::new(
            IntegerConvertKind::Narrow,
            |from, to, c| Ok(Some(Constant::int(to, convert_operand("narrow", from, c)?))),
            |from, to, s| lift_convert("narrow", from, to, s, narrow),
        )
        .into(),
        FloatConvertOp::new(
            FloatConvert::I2F,
            |c| fold_to_float(FloatConvert::I2F, c),
            |s| to_float_stamp(FloatConvert::I2F, s),
        )
        .into(),
        FloatConvertOp::new(
            FloatConvert::L2F,
            |c| fold_to_float(FloatConvert::L2F, c),
            |s| to_float_stamp(FloatConvert::L2F, s),
        )
        .into(),
        FloatConvertOp::new(
            FloatConvert::I2D,
            |c| fold_to_float(FloatConvert::I2D, c),
            |s| to_float_stamp(FloatConvert::I2D, s),
        )
        .into(),
        FloatConvertOp::new(
            FloatConvert::L2D,
            |c| fold_to_float(FloatConvert::L2D, c),
            |s| to_float_stamp(FloatConvert::L2D, s),
        )
        .into(),
        ReinterpretOp::new(fold_reinterpret, reinterpret_stamp).into(),
    ];
    ArithmeticOpTable::create(ops)
}

/// Shift amounts may have any integer width, so only kinds are checked here.
fn lift2_shift(
    op: &'static str,
    value: &Stamp,
    amount: &Stamp,
    f: fn(&IntegerStamp, &IntegerStamp) -> IntegerStamp,
) -> StampResult<Stamp> {
    Ok(Stamp::Integer(f(int_stamp(op, value)?, int_stamp(op, amount)?)))
}
