//! Value kinds: the storage categories every stamp and constant belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a value, selecting its stamp variant and operator table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Object,
    Void,
    Illegal,
}

impl ValueKind {
    /// Number of kinds, for kind-indexed tables.
    pub const COUNT: usize = 10;

    /// All kinds in index order.
    pub const ALL: [ValueKind; Self::COUNT] = [
        ValueKind::Bool,
        ValueKind::Int8,
        ValueKind::Int16,
        ValueKind::Int32,
        ValueKind::Int64,
        ValueKind::Float32,
        ValueKind::Float64,
        ValueKind::Object,
        ValueKind::Void,
        ValueKind::Illegal,
    ];

    /// Position of this kind in [`ValueKind::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The kind used when the value occupies a machine stack slot.
    ///
    /// Sub-word integers are widened to `Int32`; every other kind is its own stack kind.
    pub const fn stack_kind(self) -> ValueKind {
        match self {
            ValueKind::Bool | ValueKind::Int8 | ValueKind::Int16 | ValueKind::Int32 => {
                ValueKind::Int32
            }
            other => other,
        }
    }

    /// Bit width of primitive kinds, `None` for object, void and illegal.
    pub const fn bits(self) -> Option<u32> {
        match self {
            ValueKind::Bool => Some(1),
            ValueKind::Int8 => Some(8),
            ValueKind::Int16 => Some(16),
            ValueKind::Int32 | ValueKind::Float32 => Some(32),
            ValueKind::Int64 | ValueKind::Float64 => Some(64),
            ValueKind::Object | ValueKind::Void | ValueKind::Illegal => None,
        }
    }

    pub const fn is_numeric_integer(self) -> bool {
        matches!(
            self,
            ValueKind::Bool | ValueKind::Int8 | ValueKind::Int16 | ValueKind::Int32 | ValueKind::Int64
        )
    }

    pub const fn is_numeric_float(self) -> bool {
        matches!(self, ValueKind::Float32 | ValueKind::Float64)
    }

    pub const fn is_primitive(self) -> bool {
        self.is_numeric_integer() || self.is_numeric_float()
    }

    /// The integer kind for a stamp width, if the width is supported.
    pub const fn for_integer_bits(bits: u32) -> Option<ValueKind> {
        match bits {
            1 => Some(ValueKind::Bool),
            8 => Some(ValueKind::Int8),
            16 => Some(ValueKind::Int16),
            32 => Some(ValueKind::Int32),
            64 => Some(ValueKind::Int64),
            _ => None,
        }
    }

    /// The float kind for a stamp width, if the width is supported.
    pub const fn for_float_bits(bits: u32) -> Option<ValueKind> {
        match bits {
            32 => Some(ValueKind::Float32),
            64 => Some(ValueKind::Float64),
            _ => None,
        }
    }

    /// Short name used in stamp and constant display.
    pub const fn type_name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int8 => "i8",
            ValueKind::Int16 => "i16",
            ValueKind::Int32 => "i32",
            ValueKind::Int64 => "i64",
            ValueKind::Float32 => "f32",
            ValueKind::Float64 => "f64",
            ValueKind::Object => "object",
            ValueKind::Void => "void",
            ValueKind::Illegal => "illegal",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
