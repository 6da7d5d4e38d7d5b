//! Bounded integer stamps with known-bits masks.
//!
//! An [`IntegerStamp`] describes the `bits`-wide two's-complement values `v`
//! with `lower <= v <= upper`, every bit of `down_mask` set, and no bit outside
//! `up_mask` set. Every constructor canonicalizes: bounds are tightened to the
//! nearest values the masks allow, masks are tightened from the high bits the
//! bounds share, and this repeats to a fixed point. Canonical form is what
//! makes structural equality coincide with lattice equality.
#![allow(clippy::cast_sign_loss)]

use crate::bits::{self, mask, max_value, min_value, sign_bit, sign_extend};
use crate::error::{StampError, StampResult};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct IntegerStamp {
    bits: u32,
    lower: i64,
    upper: i64,
    down_mask: u64,
    up_mask: u64,
}

#[inline]
fn is_empty_parts(lower: i64, upper: i64, down: u64, up: u64) -> bool {
    lower > upper || down & !up != 0 || (up == 0 && (lower > 0 || upper < 0))
}

/// Smallest value compatible with the masks alone.
fn min_value_for_masks(bits: u32, down: u64, up: u64) -> i64 {
    if sign_bit(up, bits) == 0 {
        down as i64
    } else {
        (down | (u64::MAX << (bits - 1))) as i64
    }
}

/// Largest value compatible with the masks alone.
fn max_value_for_masks(bits: u32, down: u64, up: u64) -> i64 {
    if sign_bit(down, bits) == 1 {
        sign_extend(up, bits)
    } else {
        (up & (mask(bits) >> 1)) as i64
    }
}

/// Bits that may vary, excluding the sign bit.
#[inline]
fn optional_bits(bits: u32, down: u64, up: u64) -> u64 {
    up & !down & mask(bits - 1)
}

/// Greedily sets optional bits (high to low) on `initial` while staying `<= bound`.
fn set_optional_bits(bits: u32, bound: i64, down: u64, up: u64, initial: i64) -> i64 {
    let optional = optional_bits(bits, down, up);
    let mut value = initial;
    for position in (0..bits).rev() {
        let bit = 1u64 << position;
        if bit & optional != 0 && (value | bit as i64) <= bound {
            value |= bit as i64;
        }
    }
    value
}

/// Largest mask-compatible value `<= upper`, or `min_value(bits)` if none exists.
fn compute_upper_bound(bits: u32, upper: i64, down: u64, up: u64) -> i64 {
    let mut new_upper = sign_extend(down, bits);
    if upper < 0 || new_upper > upper {
        new_upper = min_value_for_masks(bits, down, up);
    }
    new_upper = set_optional_bits(bits, upper, down, up, new_upper);
    if new_upper > upper {
        return min_value(bits);
    }
    new_upper
}

/// Smallest mask-compatible value `>= lower`, or `max_value(bits)` if none exists.
fn compute_lower_bound(bits: u32, lower: i64, down: u64, up: u64) -> i64 {
    let mut new_lower = min_value_for_masks(bits, down, up);
    let optional = optional_bits(bits, down, up);
    if new_lower < lower {
        if optional == 0 {
            new_lower = 0;
        } else {
            for position in (0..bits).rev() {
                let bit = 1i64 << position;
                if bit as u64 & optional != 0 && new_lower.wrapping_add(bit) <= lower {
                    new_lower = new_lower.wrapping_add(bit);
                }
            }
            if new_lower < lower {
                // Increment at the lowest optional bit, then repair any mask
                // bits the carry disturbed.
                let mut incremented = false;
                for position in 0..bits - 1 {
                    let bit = 1i64 << position;
                    if incremented {
                        if bit as u64 & down != 0 && new_lower & bit == 0 {
                            new_lower |= bit;
                        }
                        if bit as u64 & up == 0 && new_lower & bit != 0 {
                            new_lower = new_lower.wrapping_add(bit);
                        }
                    } else if bit as u64 & optional != 0 {
                        new_lower = new_lower.wrapping_add(bit);
                        incremented = true;
                    }
                }
            }
        }
    }
    if new_lower < lower {
        return max_value(bits);
    }
    new_lower
}

impl IntegerStamp {
    #[inline]
    fn raw(bits: u32, lower: i64, upper: i64, down_mask: u64, up_mask: u64) -> Self {
        Self {
            bits,
            lower,
            upper,
            down_mask,
            up_mask,
        }
    }

    fn check_width(bits: u32) {
        assert!(
            bits::is_supported_width(bits),
            "unsupported integer stamp width {}",
            bits
        );
    }

    fn check_bounds(bits: u32, lower: i64, upper: i64) {
        assert!(
            (min_value(bits)..=max_value(bits)).contains(&lower)
                && (min_value(bits)..=max_value(bits)).contains(&upper),
            "bounds [{}, {}] do not fit in {} bits",
            lower,
            upper,
            bits
        );
    }

    /// All `bits`-wide values.
    pub fn unrestricted_of(bits: u32) -> Self {
        Self::check_width(bits);
        Self::raw(bits, min_value(bits), max_value(bits), 0, mask(bits))
    }

    /// The canonical empty stamp of the width.
    pub fn empty_of(bits: u32) -> Self {
        Self::check_width(bits);
        Self::raw(bits, max_value(bits), min_value(bits), mask(bits), 0)
    }

    /// Exactly `value`, truncated to the width.
    pub fn constant_of(bits: u32, value: i64) -> Self {
        Self::check_width(bits);
        let value = bits::narrow(value, bits);
        let m = value as u64 & mask(bits);
        Self::raw(bits, value, value, m, m)
    }

    /// All values in `[lower, upper]`, with masks derived from the range.
    ///
    /// # Panics
    /// Panics if the width is unsupported or a bound does not fit in it.
    pub fn range(bits: u32, lower: i64, upper: i64) -> Self {
        Self::check_width(bits);
        Self::check_bounds(bits, lower, upper);
        if lower > upper {
            return Self::empty_of(bits);
        }
        if lower == upper {
            return Self::constant_of(bits, lower);
        }
        let same_bit_mask = u64::MAX >> ((lower ^ upper) as u64).leading_zeros();
        let default_mask = mask(bits);
        Self::raw(
            bits,
            lower,
            upper,
            default_mask & (lower as u64 & !same_bit_mask),
            default_mask & (lower as u64 | same_bit_mask),
        )
    }

    /// Canonical stamp for the given bounds and masks.
    ///
    /// # Panics
    /// Panics if the width is unsupported or a bound does not fit in it.
    pub fn create(bits: u32, lower: i64, upper: i64, down_mask: u64, up_mask: u64) -> Self {
        Self::check_width(bits);
        Self::check_bounds(bits, lower, upper);
        let default_mask = mask(bits);
        let (down_mask, up_mask) = (down_mask & default_mask, up_mask & default_mask);
        if is_empty_parts(lower, upper, down_mask, up_mask) {
            return Self::empty_of(bits);
        }
        if down_mask == 0 && up_mask == default_mask {
            return Self::range(bits, lower, upper);
        }

        // Each pass only tightens bounds and masks, so this reaches a fixed point.
        let (mut lower, mut upper, mut down, mut up) = (lower, upper, down_mask, up_mask);
        loop {
            let mut lower_tmp = lower.max(min_value_for_masks(bits, down, up));
            let mut upper_tmp = upper.min(max_value_for_masks(bits, down, up));

            let (bounded_down, bounded_up) = if lower_tmp == upper_tmp {
                (lower_tmp as u64, lower_tmp as u64)
            } else {
                let same_bit_mask = u64::MAX >> ((lower_tmp ^ upper_tmp) as u64).leading_zeros();
                (
                    lower_tmp as u64 & !same_bit_mask,
                    lower_tmp as u64 | same_bit_mask,
                )
            };
            let down_tmp = default_mask & (down | bounded_down);
            let up_tmp = default_mask & up & bounded_up;

            upper_tmp = upper_tmp.min(max_value_for_masks(bits, down_tmp, up_tmp));
            lower_tmp = lower_tmp.max(min_value_for_masks(bits, down_tmp, up_tmp));
            upper_tmp = compute_upper_bound(bits, upper_tmp, down_tmp, up_tmp);
            lower_tmp = compute_lower_bound(bits, lower_tmp, down_tmp, up_tmp);

            if is_empty_parts(lower_tmp, upper_tmp, down_tmp, up_tmp) {
                return Self::empty_of(bits);
            }
            if (lower_tmp, upper_tmp, down_tmp, up_tmp) == (lower, upper, down, up) {
                return Self::raw(bits, lower, upper, down, up);
            }
            (lower, upper, down, up) = (lower_tmp, upper_tmp, down_tmp, up_tmp);
        }
    }

    /// The values compatible with the masks, bounds derived from them.
    pub fn for_mask(bits: u32, down_mask: u64, up_mask: u64) -> Self {
        Self::check_width(bits);
        let (down, up) = (down_mask & mask(bits), up_mask & mask(bits));
        if down & !up != 0 {
            return Self::empty_of(bits);
        }
        Self::create(
            bits,
            min_value_for_masks(bits, down, up),
            max_value_for_masks(bits, down, up),
            down,
            up,
        )
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn lower_bound(&self) -> i64 {
        self.lower
    }

    pub fn upper_bound(&self) -> i64 {
        self.upper
    }

    /// Bits set in every value.
    pub fn down_mask(&self) -> u64 {
        self.down_mask
    }

    /// Bits that may be set in some value.
    pub fn up_mask(&self) -> u64 {
        self.up_mask
    }

    pub fn unrestricted(&self) -> Self {
        Self::unrestricted_of(self.bits)
    }

    pub fn empty(&self) -> Self {
        Self::empty_of(self.bits)
    }

    pub fn is_empty(&self) -> bool {
        is_empty_parts(self.lower, self.upper, self.down_mask, self.up_mask)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.lower == min_value(self.bits)
            && self.upper == max_value(self.bits)
            && self.down_mask == 0
            && self.up_mask == mask(self.bits)
    }

    pub fn is_constant(&self) -> bool {
        self.lower == self.upper
    }

    /// The single value of a constant stamp.
    pub fn as_constant_value(&self) -> Option<i64> {
        self.is_constant().then_some(self.lower)
    }

    pub fn contains(&self, value: i64) -> bool {
        let m = mask(self.bits);
        let v = value as u64;
        value >= self.lower
            && value <= self.upper
            && v & self.down_mask == self.down_mask
            && v & self.up_mask == v & m
    }

    pub fn is_positive(&self) -> bool {
        self.lower >= 0
    }

    pub fn is_strictly_positive(&self) -> bool {
        self.lower > 0
    }

    pub fn is_negative(&self) -> bool {
        self.upper <= 0
    }

    pub fn is_strictly_negative(&self) -> bool {
        self.upper < 0
    }

    pub fn can_be_positive(&self) -> bool {
        self.upper > 0
    }

    pub fn can_be_negative(&self) -> bool {
        self.lower < 0
    }

    fn same_sign_bounds(&self) -> bool {
        (self.lower >= 0) == (self.upper >= 0)
    }

    /// Lower bound when the values are read as unsigned.
    pub fn unsigned_lower_bound(&self) -> u64 {
        if self.same_sign_bounds() {
            bits::zero_extend(self.lower, self.bits)
        } else {
            0
        }
    }

    /// Upper bound when the values are read as unsigned.
    pub fn unsigned_upper_bound(&self) -> u64 {
        if self.same_sign_bounds() {
            bits::zero_extend(self.upper, self.bits)
        } else {
            mask(self.bits)
        }
    }

    fn check_same_width(&self, other: &IntegerStamp, op: &'static str) -> StampResult<()> {
        if self.bits != other.bits {
            return Err(StampError::BitWidthMismatch {
                op,
                expected: self.bits,
                found: other.bits,
            });
        }
        Ok(())
    }

    /// Least upper bound.
    pub fn meet(&self, other: &IntegerStamp) -> StampResult<IntegerStamp> {
        self.check_same_width(other, "meet")?;
        if self == other || other.is_empty() {
            return Ok(*self);
        }
        if self.is_empty() {
            return Ok(*other);
        }
        Ok(Self::create(
            self.bits,
            self.lower.min(other.lower),
            self.upper.max(other.upper),
            self.down_mask & other.down_mask,
            self.up_mask | other.up_mask,
        ))
    }

    /// Greatest lower bound.
    pub fn join(&self, other: &IntegerStamp) -> StampResult<IntegerStamp> {
        self.check_same_width(other, "join")?;
        if self == other {
            return Ok(*self);
        }
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        let down = self.down_mask | other.down_mask;
        let up = self.up_mask & other.up_mask;
        if is_empty_parts(lower, upper, down, up) {
            return Ok(self.empty());
        }
        Ok(Self::create(self.bits, lower, upper, down, up))
    }
}

impl fmt::Display for IntegerStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.bits)?;
        if self.is_empty() {
            return write!(f, " <empty>");
        }
        if self.lower == self.upper {
            write!(f, " [{}]", self.lower)?;
        } else if self.lower != min_value(self.bits) || self.upper != max_value(self.bits) {
            write!(f, " [{} - {}]", self.lower, self.upper)?;
        }
        if self.down_mask != 0 {
            write!(f, " \u{21ca}{:x}", self.down_mask)?;
        }
        if self.up_mask != mask(self.bits) {
            write!(f, " \u{21c8}{:x}", self.up_mask)?;
        }
        Ok(())
    }
}
