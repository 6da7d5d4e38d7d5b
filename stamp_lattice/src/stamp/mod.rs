//! The stamp lattice.
//!
//! [`Stamp`] is the sum of all abstract value kinds. Lattice operations
//! dispatch to the variant types and reject mixed pairs with
//! [`StampError::IncompatibleStamps`].
//!
//! - [`integer`]: [`IntegerStamp`], bounds plus known-bits masks
//! - [`float`]: [`FloatStamp`], IEEE intervals with NaN tracking
//! - [`object`]: [`ObjectStamp`], nominal type and nullness
//! - [`factory`]: [`StampFactory`] and its cached defaults

pub mod factory;
pub mod float;
pub mod integer;
pub mod object;

pub use factory::StampFactory;
pub use float::FloatStamp;
pub use integer::IntegerStamp;
pub use object::ObjectStamp;

use serde::Serialize;
use std::fmt;

use crate::constant::Constant;
use crate::error::{StampError, StampResult};
use crate::kind::ValueKind;

/// An abstract value: a set of runtime values a computation may produce.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "stamp", rename_all = "snake_case")]
pub enum Stamp {
    Integer(IntegerStamp),
    Float(FloatStamp),
    Object(ObjectStamp),
    /// The result of a computation that produces no value.
    Void,
    /// The second slot of a two-slot value; never a usable value itself.
    Illegal,
}

impl Stamp {
    /// The value kind this stamp describes.
    pub fn value_kind(&self) -> ValueKind {
        match self {
            // Widths are validated on construction.
            Stamp::Integer(s) => ValueKind::for_integer_bits(s.bits()).unwrap_or(ValueKind::Illegal),
            Stamp::Float(s) => ValueKind::for_float_bits(s.bits()).unwrap_or(ValueKind::Illegal),
            Stamp::Object(_) => ValueKind::Object,
            Stamp::Void => ValueKind::Void,
            Stamp::Illegal => ValueKind::Illegal,
        }
    }

    pub fn stack_kind(&self) -> ValueKind {
        self.value_kind().stack_kind()
    }

    pub fn unrestricted(&self) -> Stamp {
        match self {
            Stamp::Integer(s) => Stamp::Integer(s.unrestricted()),
            Stamp::Float(s) => Stamp::Float(s.unrestricted()),
            Stamp::Object(_) => Stamp::Object(ObjectStamp::unrestricted_stamp()),
            Stamp::Void => Stamp::Void,
            Stamp::Illegal => Stamp::Illegal,
        }
    }

    pub fn empty(&self) -> Stamp {
        match self {
            Stamp::Integer(s) => Stamp::Integer(s.empty()),
            Stamp::Float(s) => Stamp::Float(s.empty()),
            Stamp::Object(_) => Stamp::Object(ObjectStamp::empty_stamp()),
            Stamp::Void => Stamp::Void,
            Stamp::Illegal => Stamp::Illegal,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Stamp::Integer(s) => s.is_empty(),
            Stamp::Float(s) => s.is_empty(),
            Stamp::Object(s) => s.is_empty(),
            Stamp::Void => false,
            Stamp::Illegal => true,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        match self {
            Stamp::Integer(s) => s.is_unrestricted(),
            Stamp::Float(s) => s.is_unrestricted(),
            Stamp::Object(s) => s.is_unrestricted(),
            Stamp::Void | Stamp::Illegal => true,
        }
    }

    /// False for the illegal stamp and for stamps that describe no value.
    pub fn is_legal(&self) -> bool {
        !matches!(self, Stamp::Illegal) && !self.is_empty()
    }

    /// True if both stamps describe values of the same kind and width.
    pub fn is_compatible(&self, other: &Stamp) -> bool {
        match (self, other) {
            (Stamp::Integer(a), Stamp::Integer(b)) => a.bits() == b.bits(),
            (Stamp::Float(a), Stamp::Float(b)) => a.bits() == b.bits(),
            (Stamp::Object(_), Stamp::Object(_))
            | (Stamp::Void, Stamp::Void)
            | (Stamp::Illegal, Stamp::Illegal) => true,
            _ => false,
        }
    }

    /// True if `constant` has this stamp's kind and width.
    pub fn is_compatible_constant(&self, constant: &Constant) -> bool {
        match self {
            Stamp::Integer(s) => constant.integer_parts().is_some_and(|(bits, _)| bits == s.bits()),
            Stamp::Float(s) => match constant {
                Constant::Float32(_) => s.bits() == 32,
                Constant::Float64(_) => s.bits() == 64,
                _ => false,
            },
            Stamp::Object(_) => matches!(constant, Constant::Null | Constant::Object(_)),
            Stamp::Void | Stamp::Illegal => false,
        }
    }

    /// Membership test for a concrete value.
    pub fn contains(&self, constant: &Constant) -> bool {
        if !self.is_compatible_constant(constant) {
            return false;
        }
        match (self, constant) {
            (Stamp::Integer(s), c) => c.integer_parts().is_some_and(|(_, v)| s.contains(v)),
            (Stamp::Float(s), c) => c.as_double().is_some_and(|v| s.contains(v)),
            (Stamp::Object(s), Constant::Null) => !s.is_empty() && !s.non_null(),
            (Stamp::Object(s), Constant::Object(r)) => s.admits_type(&r.ty),
            _ => false,
        }
    }

    /// The most precise stamp of this kind describing exactly `constant`.
    pub fn constant(&self, constant: &Constant) -> StampResult<Stamp> {
        if !self.is_compatible_constant(constant) {
            return Err(StampError::IncompatibleConstant {
                constant: constant.to_string(),
                stamp: self.to_string(),
            });
        }
        Ok(StampFactory::for_constant(constant))
    }

    /// The single value this stamp describes, if it describes exactly one.
    pub fn as_constant(&self) -> Option<Constant> {
        match self {
            Stamp::Integer(s) => s.as_constant_value().map(|v| Constant::int(s.bits(), v)),
            Stamp::Float(s) => s.as_constant_value().map(|v| match s.bits() {
                32 => Constant::Float32(v as f32),
                _ => Constant::Float64(v),
            }),
            Stamp::Object(s) if s.always_null() && !s.is_empty() => Some(Constant::Null),
            _ => None,
        }
    }

    /// Least upper bound, used where control flow merges.
    pub fn meet(&self, other: &Stamp) -> StampResult<Stamp> {
        match (self, other) {
            (Stamp::Integer(a), Stamp::Integer(b)) if a.bits() == b.bits() => {
                Ok(Stamp::Integer(a.meet(b)?))
            }
            (Stamp::Float(a), Stamp::Float(b)) if a.bits() == b.bits() => {
                Ok(Stamp::Float(a.meet(b)?))
            }
            (Stamp::Object(a), Stamp::Object(b)) => Ok(Stamp::Object(a.meet(b))),
            (Stamp::Void, Stamp::Void) => Ok(Stamp::Void),
            (Stamp::Illegal, Stamp::Illegal) => Ok(Stamp::Illegal),
            _ => Err(StampError::incompatible_stamps("meet", self, other)),
        }
    }

    /// Greatest lower bound, used to combine two facts about one value.
    pub fn join(&self, other: &Stamp) -> StampResult<Stamp> {
        match (self, other) {
            (Stamp::Integer(a), Stamp::Integer(b)) if a.bits() == b.bits() => {
                Ok(Stamp::Integer(a.join(b)?))
            }
            (Stamp::Float(a), Stamp::Float(b)) if a.bits() == b.bits() => {
                Ok(Stamp::Float(a.join(b)?))
            }
            (Stamp::Object(a), Stamp::Object(b)) => Ok(Stamp::Object(a.join(b))),
            (Stamp::Void, Stamp::Void) => Ok(Stamp::Void),
            (Stamp::Illegal, Stamp::Illegal) => Ok(Stamp::Illegal),
            _ => Err(StampError::incompatible_stamps("join", self, other)),
        }
    }

    /// Refines this stamp with `other` after a runtime-checked cast.
    ///
    /// Identical to [`join`](Self::join) except for object stamps of
    /// unrelated types, where this stamp's type is kept.
    pub fn improve_with(&self, other: &Stamp) -> StampResult<Stamp> {
        match (self, other) {
            (Stamp::Object(a), Stamp::Object(b)) => Ok(Stamp::Object(a.improve_with(b))),
            _ => self.join(other).map_err(|_| StampError::incompatible_stamps("improve_with", self, other)),
        }
    }

    pub fn as_integer(&self) -> Option<&IntegerStamp> {
        match self {
            Stamp::Integer(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<&FloatStamp> {
        match self {
            Stamp::Float(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectStamp> {
        match self {
            Stamp::Object(s) => Some(s),
            _ => None,
        }
    }
}

impl From<IntegerStamp> for Stamp {
    fn from(s: IntegerStamp) -> Self {
        Stamp::Integer(s)
    }
}

impl From<FloatStamp> for Stamp {
    fn from(s: FloatStamp) -> Self {
        Stamp::Float(s)
    }
}

impl From<ObjectStamp> for Stamp {
    fn from(s: ObjectStamp) -> Self {
        Stamp::Object(s)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stamp::Integer(s) => fmt::Display::fmt(s, f),
            Stamp::Float(s) => fmt::Display::fmt(s, f),
            Stamp::Object(s) => fmt::Display::fmt(s, f),
            Stamp::Void => f.write_str("void"),
            Stamp::Illegal => f.write_str("illegal"),
        }
    }
}
