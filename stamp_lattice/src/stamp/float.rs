//! Interval stamps for 32- and 64-bit IEEE floats.
//!
//! Bounds are carried as `f64` for both widths. A stamp whose bounds are NaN
//! describes either nothing (`non_nan`) or only NaN (`!non_nan`); both forms are
//! normalized on construction so equal sets compare equal.

use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{StampError, StampResult};

#[derive(Clone, Copy, Debug, Serialize)]
pub struct FloatStamp {
    bits: u32,
    lower: f64,
    upper: f64,
    non_nan: bool,
}

/// `Math.min` semantics: NaN propagates and -0.0 sorts below 0.0.
pub(crate) fn ieee_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else if a == b {
        if a.is_sign_negative() {
            a
        } else {
            b
        }
    } else {
        a.min(b)
    }
}

/// `Math.max` semantics: NaN propagates and 0.0 sorts above -0.0.
pub(crate) fn ieee_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else if a == b {
        if a.is_sign_negative() {
            b
        } else {
            a
        }
    } else {
        a.max(b)
    }
}

fn meet_bound(a: f64, b: f64, op: fn(f64, f64) -> f64) -> f64 {
    if a.is_nan() {
        b
    } else if b.is_nan() {
        a
    } else {
        op(a, b)
    }
}

impl FloatStamp {
    fn check_width(bits: u32) {
        assert!(bits == 32 || bits == 64, "unsupported float stamp width {}", bits);
    }

    /// Builds a normalized stamp.
    ///
    /// # Panics
    /// Panics unless `bits` is 32 or 64.
    pub fn new(bits: u32, lower: f64, upper: f64, non_nan: bool) -> Self {
        Self::check_width(bits);
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return if non_nan {
                Self::empty_of(bits)
            } else {
                Self::nan_of(bits)
            };
        }
        Self {
            bits,
            lower,
            upper,
            non_nan,
        }
    }

    pub fn unrestricted_of(bits: u32) -> Self {
        Self::new(bits, f64::NEG_INFINITY, f64::INFINITY, false)
    }

    pub fn empty_of(bits: u32) -> Self {
        Self::check_width(bits);
        Self {
            bits,
            lower: f64::INFINITY,
            upper: f64::NEG_INFINITY,
            non_nan: true,
        }
    }

    /// The stamp containing only NaN.
    pub fn nan_of(bits: u32) -> Self {
        Self::check_width(bits);
        Self {
            bits,
            lower: f64::NAN,
            upper: f64::NAN,
            non_nan: false,
        }
    }

    /// Exactly `value` (or only NaN).
    pub fn constant_of(bits: u32, value: f64) -> Self {
        if value.is_nan() {
            Self::nan_of(bits)
        } else {
            Self::new(bits, value, value, true)
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper
    }

    pub fn is_non_nan(&self) -> bool {
        self.non_nan
    }

    pub fn can_be_nan(&self) -> bool {
        !self.non_nan
    }

    /// True for the stamp containing only NaN.
    pub fn is_nan_only(&self) -> bool {
        self.lower.is_nan() && !self.non_nan
    }

    pub fn can_be_inf(&self) -> bool {
        self.can_be_negative_infinity() || self.can_be_positive_infinity()
    }

    pub fn can_be_positive_infinity(&self) -> bool {
        self.upper == f64::INFINITY
    }

    pub fn can_be_negative_infinity(&self) -> bool {
        self.lower == f64::NEG_INFINITY
    }

    pub fn unrestricted(&self) -> Self {
        Self::unrestricted_of(self.bits)
    }

    pub fn empty(&self) -> Self {
        Self::empty_of(self.bits)
    }

    pub fn is_empty(&self) -> bool {
        self.non_nan && !(self.lower <= self.upper)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.lower == f64::NEG_INFINITY && self.upper == f64::INFINITY && !self.non_nan
    }

    /// Single non-NaN value. Zero never qualifies since the bounds do not
    /// separate -0.0 from 0.0 in every producer.
    pub fn is_constant(&self) -> bool {
        self.lower.to_bits() == self.upper.to_bits() && self.non_nan && self.lower != 0.0
    }

    pub fn as_constant_value(&self) -> Option<f64> {
        self.is_constant().then_some(self.lower)
    }

    pub fn contains(&self, value: f64) -> bool {
        if value.is_nan() {
            !self.non_nan
        } else {
            // -0.0 and 0.0 compare equal here, so a range reaching zero admits both.
            value >= self.lower && value <= self.upper
        }
    }

    fn check_same_width(&self, other: &FloatStamp, op: &'static str) -> StampResult<()> {
        if self.bits != other.bits {
            return Err(StampError::BitWidthMismatch {
                op,
                expected: self.bits,
                found: other.bits,
            });
        }
        Ok(())
    }

    pub fn meet(&self, other: &FloatStamp) -> StampResult<FloatStamp> {
        self.check_same_width(other, "meet")?;
        if self == other || other.is_empty() {
            return Ok(*self);
        }
        if self.is_empty() {
            return Ok(*other);
        }
        Ok(Self::new(
            self.bits,
            meet_bound(self.lower, other.lower, ieee_min),
            meet_bound(self.upper, other.upper, ieee_max),
            self.non_nan && other.non_nan,
        ))
    }

    pub fn join(&self, other: &FloatStamp) -> StampResult<FloatStamp> {
        self.check_same_width(other, "join")?;
        if self == other {
            return Ok(*self);
        }
        let non_nan = self.non_nan || other.non_nan;
        let lower = ieee_max(self.lower, other.lower);
        let upper = ieee_min(self.upper, other.upper);
        if lower > upper {
            return Ok(Self::new(self.bits, f64::NAN, f64::NAN, non_nan));
        }
        Ok(Self::new(self.bits, lower, upper, non_nan))
    }
}

impl PartialEq for FloatStamp {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
            && self.lower.to_bits() == other.lower.to_bits()
            && self.upper.to_bits() == other.upper.to_bits()
            && self.non_nan == other.non_nan
    }
}

impl Eq for FloatStamp {}

impl Hash for FloatStamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
        self.lower.to_bits().hash(state);
        self.upper.to_bits().hash(state);
        self.non_nan.hash(state);
    }
}

impl fmt::Display for FloatStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.bits)?;
        if self.non_nan {
            write!(f, "!")?;
        }
        if self.is_empty() {
            write!(f, " <empty>")
        } else if self.is_nan_only() {
            write!(f, " [NaN]")
        } else if self.lower.to_bits() == self.upper.to_bits() {
            write!(f, " [{:?}]", self.lower)
        } else if self.lower != f64::NEG_INFINITY || self.upper != f64::INFINITY {
            write!(f, " [{:?} - {:?}]", self.lower, self.upper)
        } else {
            Ok(())
        }
    }
}
