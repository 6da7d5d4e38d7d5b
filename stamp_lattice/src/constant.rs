//! Concrete constant values.

use crate::bits;
use crate::kind::ValueKind;
use crate::types::NominalType;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Reference to a heap object known at compile time.
///
/// The handle identifies the object to the embedder; the nominal type is its
/// exact runtime type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectRef {
    pub ty: NominalType,
    pub handle: u64,
}

/// A concrete value of some [`ValueKind`].
///
/// Integer constants carry their width and a sign-extended value, so a
/// constant never holds bits outside its width. Float equality is by bit
/// pattern, which distinguishes `-0.0` from `0.0`.
#[derive(Clone, Debug, Serialize)]
pub enum Constant {
    Bool(bool),
    Int { bits: u32, value: i64 },
    Float32(f32),
    Float64(f64),
    Null,
    Object(ObjectRef),
}

impl Constant {
    /// Integer constant of the given width. Width 1 produces a [`Constant::Bool`].
    ///
    /// # Panics
    /// Panics if `bits` is not a supported integer width.
    pub fn int(bits: u32, value: i64) -> Self {
        assert!(
            bits::is_supported_width(bits),
            "unsupported integer width {}",
            bits
        );
        if bits == 1 {
            Constant::Bool(value & 1 != 0)
        } else {
            Constant::Int {
                bits,
                value: bits::narrow(value, bits),
            }
        }
    }

    pub fn for_bool(value: bool) -> Self {
        Constant::Bool(value)
    }

    pub fn for_byte(value: i8) -> Self {
        Constant::Int {
            bits: 8,
            value: i64::from(value),
        }
    }

    pub fn for_short(value: i16) -> Self {
        Constant::Int {
            bits: 16,
            value: i64::from(value),
        }
    }

    pub fn for_int(value: i32) -> Self {
        Constant::Int {
            bits: 32,
            value: i64::from(value),
        }
    }

    pub fn for_long(value: i64) -> Self {
        Constant::Int { bits: 64, value }
    }

    pub fn for_float(value: f32) -> Self {
        Constant::Float32(value)
    }

    pub fn for_double(value: f64) -> Self {
        Constant::Float64(value)
    }

    /// Integer constant of an integer kind, truncating `value` to the kind's width.
    pub fn for_integer_kind(kind: ValueKind, value: i64) -> Option<Self> {
        match kind {
            ValueKind::Bool => Some(Constant::Bool(value != 0)),
            k if k.is_numeric_integer() => k.bits().map(|bits| Constant::int(bits, value)),
            _ => None,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Constant::Bool(_) => ValueKind::Bool,
            Constant::Int { bits, .. } => {
                ValueKind::for_integer_bits(*bits).unwrap_or(ValueKind::Int64)
            }
            Constant::Float32(_) => ValueKind::Float32,
            Constant::Float64(_) => ValueKind::Float64,
            Constant::Null | Constant::Object(_) => ValueKind::Object,
        }
    }

    /// Reads an integer or boolean constant as a 64-bit value (true is 1).
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Constant::Bool(b) => Some(i64::from(*b)),
            Constant::Int { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Reads an integer constant as a 32-bit value, truncating wider values.
    pub fn as_int(&self) -> Option<i32> {
        self.as_long().map(|v| bits::narrow(v, 32) as i32)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Constant::Bool(b) => Some(*b),
            Constant::Int { value, .. } => Some(*value != 0),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Constant::Float32(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads a float constant at double precision; single-precision values widen exactly.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Constant::Float32(v) => Some(f64::from(*v)),
            Constant::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Width and value of an integer constant in stamp representation.
    ///
    /// Booleans are 1-bit integers, so `true` is `-1` (all bits set).
    pub fn integer_parts(&self) -> Option<(u32, i64)> {
        match self {
            Constant::Bool(b) => Some((1, if *b { -1 } else { 0 })),
            Constant::Int { bits, value } => Some((*bits, *value)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Constant::Null)
    }

    /// True for the zero value of the constant's kind (`false`, `0`, `+0.0`, `null`).
    pub fn is_default_for_kind(&self) -> bool {
        match self {
            Constant::Bool(b) => !*b,
            Constant::Int { value, .. } => *value == 0,
            Constant::Float32(v) => v.to_bits() == 0,
            Constant::Float64(v) => v.to_bits() == 0,
            Constant::Null => true,
            Constant::Object(_) => false,
        }
    }
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constant::Bool(a), Constant::Bool(b)) => a == b,
            (
                Constant::Int { bits: b1, value: v1 },
                Constant::Int { bits: b2, value: v2 },
            ) => b1 == b2 && v1 == v2,
            (Constant::Float32(a), Constant::Float32(b)) => a.to_bits() == b.to_bits(),
            (Constant::Float64(a), Constant::Float64(b)) => a.to_bits() == b.to_bits(),
            (Constant::Null, Constant::Null) => true,
            (Constant::Object(a), Constant::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Constant {}

impl Hash for Constant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Constant::Bool(b) => b.hash(state),
            Constant::Int { bits, value } => {
                bits.hash(state);
                value.hash(state);
            }
            Constant::Float32(v) => v.to_bits().hash(state),
            Constant::Float64(v) => v.to_bits().hash(state),
            Constant::Null => {}
            Constant::Object(obj) => obj.hash(state),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Bool(b) => write!(f, "bool {}", b),
            Constant::Int { value, .. } => write!(f, "{} {}", self.kind(), value),
            Constant::Float32(v) => write!(f, "f32 {:?}", v),
            Constant::Float64(v) => write!(f, "f64 {:?}", v),
            Constant::Null => write!(f, "null"),
            Constant::Object(obj) => write!(f, "object {}#{}", obj.ty.name(), obj.handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_constructor_truncates() {
        assert_eq!(Constant::int(8, 200), Constant::for_byte(-56));
        assert_eq!(Constant::int(32, 1 << 32), Constant::for_int(0));
        assert_eq!(Constant::int(1, 1), Constant::Bool(true));
        assert_eq!(Constant::int(1, 0), Constant::Bool(false));
    }

    #[test]
    fn test_accessors() {
        let c = Constant::for_long(-1);
        assert_eq!(c.as_long(), Some(-1));
        assert_eq!(c.as_int(), Some(-1));
        assert_eq!(Constant::for_long(1 << 33).as_int(), Some(0));
        assert_eq!(Constant::Bool(true).as_long(), Some(1));
        assert_eq!(Constant::Bool(true).integer_parts(), Some((1, -1)));
        assert_eq!(Constant::for_float(1.5).as_double(), Some(1.5));
        assert_eq!(Constant::Null.as_long(), None);
    }

    #[test]
    fn test_float_equality_is_bitwise() {
        assert_ne!(Constant::for_double(0.0), Constant::for_double(-0.0));
        assert_eq!(Constant::for_double(f64::NAN), Constant::for_double(f64::NAN));
        assert_ne!(Constant::for_float(1.0), Constant::for_double(1.0));
    }

    #[test]
    fn test_kind_and_default() {
        assert_eq!(Constant::for_short(3).kind(), ValueKind::Int16);
        assert_eq!(Constant::Null.kind(), ValueKind::Object);
        assert!(Constant::for_int(0).is_default_for_kind());
        assert!(!Constant::for_double(-0.0).is_default_for_kind());
        assert_eq!(
            Constant::for_integer_kind(ValueKind::Int8, 300),
            Some(Constant::for_byte(44))
        );
        assert_eq!(Constant::for_integer_kind(ValueKind::Float32, 1), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Constant::for_int(42).to_string(), "i32 42");
        assert_eq!(Constant::for_double(1.0).to_string(), "f64 1.0");
        assert_eq!(Constant::Null.to_string(), "null");
    }
}
