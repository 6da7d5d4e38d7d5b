//! Constructors for commonly used stamps.
//!
//! Per-kind defaults and empties, plus a few hot singletons, are built once
//! on first use and shared read-only afterwards.
#![allow(clippy::cast_sign_loss)]

use once_cell::sync::Lazy;

use super::{FloatStamp, IntegerStamp, ObjectStamp, Stamp};
use crate::bits;
use crate::constant::Constant;
use crate::kind::ValueKind;
use crate::types::checked::CheckedType;
use crate::types::NominalType;

struct StampCache {
    defaults: [Stamp; ValueKind::COUNT],
    empties: [Stamp; ValueKind::COUNT],
    positive_int: Stamp,
    boolean_true: Stamp,
    boolean_false: Stamp,
    object_non_null: Stamp,
    always_null: Stamp,
}

fn default_for_kind(kind: ValueKind) -> Stamp {
    match kind {
        ValueKind::Bool | ValueKind::Int8 | ValueKind::Int16 | ValueKind::Int32 | ValueKind::Int64 => {
            Stamp::Integer(IntegerStamp::unrestricted_of(kind.bits().unwrap_or(64)))
        }
        ValueKind::Float32 => Stamp::Float(FloatStamp::unrestricted_of(32)),
        ValueKind::Float64 => Stamp::Float(FloatStamp::unrestricted_of(64)),
        ValueKind::Object => Stamp::Object(ObjectStamp::unrestricted_stamp()),
        ValueKind::Void => Stamp::Void,
        ValueKind::Illegal => Stamp::Illegal,
    }
}

impl StampCache {
    fn new() -> Self {
        let defaults = ValueKind::ALL.map(default_for_kind);
        let empties = ValueKind::ALL.map(|kind| default_for_kind(kind).empty());
        Self {
            defaults,
            empties,
            positive_int: Stamp::Integer(IntegerStamp::range(32, 0, bits::max_value(32))),
            boolean_true: Stamp::Integer(IntegerStamp::constant_of(1, -1)),
            boolean_false: Stamp::Integer(IntegerStamp::constant_of(1, 0)),
            object_non_null: Stamp::Object(ObjectStamp::new(None, false, true, false)),
            always_null: Stamp::Object(ObjectStamp::null_stamp()),
        }
    }
}

static CACHE: Lazy<StampCache> = Lazy::new(StampCache::new);

/// Namespace for stamp constructors.
#[derive(Debug, Clone, Copy)]
pub struct StampFactory;

impl StampFactory {
    /// The unrestricted stamp of `kind`.
    pub fn for_kind(kind: ValueKind) -> Stamp {
        CACHE.defaults[kind.index()].clone()
    }

    /// The empty stamp of `kind`.
    pub fn empty(kind: ValueKind) -> Stamp {
        CACHE.empties[kind.index()].clone()
    }

    pub fn int_value() -> Stamp {
        Self::for_kind(ValueKind::Int32)
    }

    /// 32-bit integers in `[0, i32::MAX]`.
    pub fn positive_int() -> Stamp {
        CACHE.positive_int.clone()
    }

    pub fn boolean_true() -> Stamp {
        CACHE.boolean_true.clone()
    }

    pub fn boolean_false() -> Stamp {
        CACHE.boolean_false.clone()
    }

    pub fn void() -> Stamp {
        Stamp::Void
    }

    pub fn illegal() -> Stamp {
        Stamp::Illegal
    }

    /// Integers of `bits` width in `[lower, upper]`.
    ///
    /// # Panics
    /// Panics if the width is unsupported or a bound does not fit in it.
    pub fn for_integer(bits: u32, lower: i64, upper: i64) -> Stamp {
        Stamp::Integer(IntegerStamp::range(bits, lower, upper))
    }

    /// Integers of an integer `kind` in `[lower, upper]`; `None` for other kinds.
    pub fn for_integer_kind(kind: ValueKind, lower: i64, upper: i64) -> Option<Stamp> {
        if !kind.is_numeric_integer() {
            return None;
        }
        kind.bits().map(|bits| Self::for_integer(bits, lower, upper))
    }

    pub fn for_integer_with_mask(
        bits: u32,
        lower: i64,
        upper: i64,
        down_mask: u64,
        up_mask: u64,
    ) -> Stamp {
        Stamp::Integer(IntegerStamp::create(bits, lower, upper, down_mask, up_mask))
    }

    /// Integers whose unsigned reading lies in `[lower, upper]`.
    ///
    /// When the range crosses the sign boundary the signed bounds cannot
    /// express it and the full signed range is used.
    pub fn for_unsigned_integer(bits: u32, lower: u64, upper: u64) -> Stamp {
        let mut signed_lower = bits::sign_extend(lower, bits);
        let mut signed_upper = bits::sign_extend(upper, bits);
        if (signed_lower >= 0) != (signed_upper >= 0) {
            signed_lower = bits::min_value(bits);
            signed_upper = bits::max_value(bits);
        }
        Stamp::Integer(IntegerStamp::create(
            bits,
            signed_lower,
            signed_upper,
            0,
            bits::mask(bits),
        ))
    }

    pub fn for_float(bits: u32, lower: f64, upper: f64, non_nan: bool) -> Stamp {
        Stamp::Float(FloatStamp::new(bits, lower, upper, non_nan))
    }

    /// The most precise stamp for a single constant.
    pub fn for_constant(constant: &Constant) -> Stamp {
        match constant {
            Constant::Bool(_) | Constant::Int { .. } => {
                let (bits, value) = constant.integer_parts().unwrap_or((64, 0));
                Stamp::Integer(IntegerStamp::constant_of(bits, value))
            }
            Constant::Float32(v) => Stamp::Float(FloatStamp::constant_of(32, f64::from(*v))),
            Constant::Float64(v) => Stamp::Float(FloatStamp::constant_of(64, *v)),
            Constant::Null => Self::always_null(),
            Constant::Object(r) => Self::exact_non_null(r.ty.clone()),
        }
    }

    /// Any reference, including null.
    pub fn object() -> Stamp {
        Self::for_kind(ValueKind::Object)
    }

    pub fn object_non_null() -> Stamp {
        CACHE.object_non_null.clone()
    }

    pub fn always_null() -> Stamp {
        CACHE.always_null.clone()
    }

    pub fn empty_object() -> Stamp {
        Self::empty(ValueKind::Object)
    }

    fn declared_stamp(ty: NominalType, non_null: bool, trusted: bool) -> Stamp {
        // Untrusted interface types are not verified, so values may not implement them.
        let ty = (trusted
            || !ty.is_interface_or_array_of_interface()
            || ty.is_trusted_interface())
        .then_some(ty);
        Stamp::Object(ObjectStamp::new(ty, false, non_null, false))
    }

    /// Values of `ty` or any subtype, or null.
    pub fn declared(ty: NominalType) -> Stamp {
        Self::declared_stamp(ty, false, false)
    }

    pub fn declared_non_null(ty: NominalType) -> Stamp {
        Self::declared_stamp(ty, true, false)
    }

    /// Like [`declared`](Self::declared), keeping interface types as given.
    pub fn declared_trusted(ty: NominalType) -> Stamp {
        Self::declared_stamp(ty, false, true)
    }

    pub fn declared_trusted_non_null(ty: NominalType) -> Stamp {
        Self::declared_stamp(ty, true, true)
    }

    /// Values of exactly `ty`, or null. Empty if `ty` cannot be instantiated.
    pub fn exact(ty: NominalType) -> Stamp {
        Stamp::Object(ObjectStamp::new(Some(ty), true, false, false))
    }

    pub fn exact_non_null(ty: NominalType) -> Stamp {
        Stamp::Object(ObjectStamp::new(Some(ty), true, true, false))
    }

    pub fn object_for_checked_type(checked: &CheckedType, non_null: bool) -> Stamp {
        Stamp::Object(ObjectStamp::new(
            Some(checked.ty().clone()),
            checked.is_exact(),
            non_null,
            false,
        ))
    }
}
