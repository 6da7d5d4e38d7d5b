//! Two's-complement helpers for integers of 1 to 64 bits.
//!
//! Values are carried as `i64` (sign-extended) and masks as `u64`
//! (zero-extended to the width).
#![allow(clippy::cast_sign_loss)]

/// Widths an integer stamp may have.
#[inline]
pub const fn is_supported_width(bits: u32) -> bool {
    matches!(bits, 1 | 8 | 16 | 32 | 64)
}

/// All-ones mask of the low `bits` bits.
#[inline]
pub const fn mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Smallest signed value of the width.
#[inline]
pub const fn min_value(bits: u32) -> i64 {
    if bits >= 64 {
        i64::MIN
    } else {
        -(1i64 << (bits - 1))
    }
}

/// Largest signed value of the width.
#[inline]
pub const fn max_value(bits: u32) -> i64 {
    if bits >= 64 {
        i64::MAX
    } else {
        (1i64 << (bits - 1)) - 1
    }
}

/// Largest unsigned value of the width, as a (possibly negative) `i64` bit pattern.
#[inline]
pub const fn max_unsigned(bits: u32) -> i64 {
    mask(bits) as i64
}

/// Interprets the low `bits` bits of `value` as a signed number.
#[inline]
pub const fn sign_extend(value: u64, bits: u32) -> i64 {
    if bits >= 64 {
        value as i64
    } else {
        let shift = 64 - bits;
        ((value << shift) as i64) >> shift
    }
}

/// Interprets the low `bits` bits of `value` as an unsigned number.
#[inline]
pub const fn zero_extend(value: i64, bits: u32) -> u64 {
    (value as u64) & mask(bits)
}

/// Truncates `value` to `bits` bits and sign-extends the result.
#[inline]
pub const fn narrow(value: i64, bits: u32) -> i64 {
    sign_extend(value as u64, bits)
}

/// Clamps `value` into the signed range of the width.
#[inline]
pub const fn saturate(value: i64, bits: u32) -> i64 {
    let (min, max) = (min_value(bits), max_value(bits));
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// The sign bit of `value` at the given width, as 0 or 1.
#[inline]
pub const fn sign_bit(value: u64, bits: u32) -> u64 {
    (value >> (bits - 1)) & 1
}

/// Bits that differ between `a + b` and `a ^ b`, i.e. the carries of the addition.
#[inline]
pub const fn carry_bits(a: u64, b: u64) -> u64 {
    a.wrapping_add(b) ^ a ^ b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_limits() {
        assert_eq!(mask(1), 1);
        assert_eq!(mask(8), 0xff);
        assert_eq!(mask(64), u64::MAX);
        assert_eq!(min_value(1), -1);
        assert_eq!(max_value(1), 0);
        assert_eq!(min_value(8), -128);
        assert_eq!(max_value(8), 127);
        assert_eq!(min_value(32), i32::MIN as i64);
        assert_eq!(max_value(64), i64::MAX);
        assert_eq!(max_unsigned(16), 0xffff);
    }

    #[test]
    fn test_extension() {
        assert_eq!(sign_extend(0xff, 8), -1);
        assert_eq!(sign_extend(0x7f, 8), 127);
        assert_eq!(sign_extend(1, 1), -1);
        assert_eq!(zero_extend(-1, 8), 0xff);
        assert_eq!(narrow(0x1_0000_0005, 32), 5);
        assert_eq!(narrow(200, 8), -56);
    }

    #[test]
    fn test_saturate_and_carry() {
        assert_eq!(saturate(300, 8), 127);
        assert_eq!(saturate(-300, 8), -128);
        assert_eq!(saturate(5, 8), 5);
        assert_eq!(carry_bits(0b01, 0b01), 0b10);
        assert_eq!(carry_bits(0b100, 0b010), 0);
    }

    #[test]
    fn test_supported_widths() {
        for bits in [1, 8, 16, 32, 64] {
            assert!(is_supported_width(bits));
        }
        assert!(!is_supported_width(0));
        assert!(!is_supported_width(24));
    }
}
