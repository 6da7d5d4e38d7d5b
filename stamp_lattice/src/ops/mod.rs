//! Arithmetic operators over constants and stamps.
//!
//! An operator is named by an [`OpSymbol`]. An [`ArithmeticOpTable`] maps each
//! symbol to at most one descriptor valid for one family of value kinds;
//! descriptors fold concrete [`Constant`](crate::Constant)s and abstract
//! [`Stamp`](crate::Stamp)s.
//!
//! - [`descriptor`]: the typed descriptors and their folding wrappers
//! - [`table`]: [`ArithmeticOpTable`] and the per-kind lookup
//! - `integer` / `float`: the integer and float operator implementations

pub mod descriptor;
mod float;
mod integer;
pub mod table;

pub use descriptor::{
    BinaryOp, FloatConvertOp, IntegerConvertOp, OpDescriptor, ReinterpretOp, ShiftOp, TernaryOp, UnaryOp,
};
pub use table::ArithmeticOpTable;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::kind::ValueKind;

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOpKind {
    /// neg(x) -> -x
    Neg,
    /// not(x) -> bitwise complement
    Not,
    /// abs(x) -> |x|
    Abs,
    /// sqrt(x), floats only
    Sqrt,
}

/// Binary operators whose operands share one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOpKind {
    /// add(a, b) -> a + b
    Add,
    /// sub(a, b) -> a - b
    Sub,
    /// mul(a, b) -> a * b
    Mul,
    /// div(a, b) -> a / b, truncating for integers
    Div,
    /// rem(a, b) -> a % b, sign of the dividend
    Rem,
    /// and(a, b) -> a & b
    And,
    /// or(a, b) -> a | b
    Or,
    /// xor(a, b) -> a ^ b
    Xor,
    /// min(a, b)
    Min,
    /// max(a, b)
    Max,
    /// umin(a, b), operands read as unsigned; integers only
    UMin,
    /// umax(a, b), operands read as unsigned; integers only
    UMax,
    /// High half of the double-width signed product; integers only
    MulHigh,
    /// High half of the double-width unsigned product; integers only
    UMulHigh,
}

/// Operators over three operands of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TernaryOpKind {
    /// fma(a, b, c) -> a * b + c with a single rounding; floats only
    Fma,
}

/// Shifts; the amount is masked to the stack width of the shifted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftOpKind {
    /// shl(x, n) -> x << n
    Shl,
    /// shr(x, n) -> x >> n, arithmetic
    Shr,
    /// ushr(x, n) -> x >>> n, logical
    UShr,
}

/// Width changes between integer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegerConvertKind {
    ZeroExtend,
    SignExtend,
    Narrow,
}

/// Conversions between a float kind and another numeric kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloatConvert {
    F2I,
    F2L,
    D2I,
    D2L,
    I2F,
    L2F,
    I2D,
    L2D,
    F2D,
    D2F,
    /// Float to unsigned int, saturating at zero and the unsigned maximum.
    F2UI,
    F2UL,
    D2UI,
    D2UL,
}

impl UnaryOpKind {
    pub const COUNT: usize = 4;
    pub const ALL: [UnaryOpKind; Self::COUNT] = [Self::Neg, Self::Not, Self::Abs, Self::Sqrt];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Neg => "neg",
            Self::Not => "not",
            Self::Abs => "abs",
            Self::Sqrt => "sqrt",
        }
    }
}

impl BinaryOpKind {
    pub const COUNT: usize = 14;
    pub const ALL: [BinaryOpKind; Self::COUNT] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Rem,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Min,
        Self::Max,
        Self::UMin,
        Self::UMax,
        Self::MulHigh,
        Self::UMulHigh,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Rem => "rem",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Min => "min",
            Self::Max => "max",
            Self::UMin => "umin",
            Self::UMax => "umax",
            Self::MulHigh => "mulhigh",
            Self::UMulHigh => "umulhigh",
        }
    }
}

impl TernaryOpKind {
    pub const COUNT: usize = 1;
    pub const ALL: [TernaryOpKind; Self::COUNT] = [Self::Fma];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fma => "fma",
        }
    }
}

impl ShiftOpKind {
    pub const COUNT: usize = 3;
    pub const ALL: [ShiftOpKind; Self::COUNT] = [Self::Shl, Self::Shr, Self::UShr];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Shl => "shl",
            Self::Shr => "shr",
            Self::UShr => "ushr",
        }
    }
}

impl IntegerConvertKind {
    pub const COUNT: usize = 3;
    pub const ALL: [IntegerConvertKind; Self::COUNT] =
        [Self::ZeroExtend, Self::SignExtend, Self::Narrow];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ZeroExtend => "zero_extend",
            Self::SignExtend => "sign_extend",
            Self::Narrow => "narrow",
        }
    }
}

impl FloatConvert {
    pub const COUNT: usize = 14;
    pub const ALL: [FloatConvert; Self::COUNT] = [
        Self::F2I,
        Self::F2L,
        Self::D2I,
        Self::D2L,
        Self::I2F,
        Self::L2F,
        Self::I2D,
        Self::L2D,
        Self::F2D,
        Self::D2F,
        Self::F2UI,
        Self::F2UL,
        Self::D2UI,
        Self::D2UL,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::F2I => "f2i",
            Self::F2L => "f2l",
            Self::D2I => "d2i",
            Self::D2L => "d2l",
            Self::I2F => "i2f",
            Self::L2F => "l2f",
            Self::I2D => "i2d",
            Self::L2D => "l2d",
            Self::F2D => "f2d",
            Self::D2F => "d2f",
            Self::F2UI => "f2ui",
            Self::F2UL => "f2ul",
            Self::D2UI => "d2ui",
            Self::D2UL => "d2ul",
        }
    }

    /// Stack kind of the operand.
    pub const fn input_kind(self) -> ValueKind {
        match self {
            Self::F2I | Self::F2L | Self::F2D | Self::F2UI | Self::F2UL => ValueKind::Float32,
            Self::D2I | Self::D2L | Self::D2F | Self::D2UI | Self::D2UL => ValueKind::Float64,
            Self::I2F | Self::I2D => ValueKind::Int32,
            Self::L2F | Self::L2D => ValueKind::Int64,
        }
    }

    pub const fn result_kind(self) -> ValueKind {
        match self {
            Self::F2I | Self::D2I | Self::F2UI | Self::D2UI => ValueKind::Int32,
            Self::F2L | Self::D2L | Self::F2UL | Self::D2UL => ValueKind::Int64,
            Self::I2F | Self::L2F | Self::D2F => ValueKind::Float32,
            Self::I2D | Self::L2D | Self::F2D => ValueKind::Float64,
        }
    }

    /// True for the conversions that read the result as unsigned.
    pub const fn is_unsigned(self) -> bool {
        matches!(self, Self::F2UI | Self::F2UL | Self::D2UI | Self::D2UL)
    }
}

/// Names one operator, independent of the kind it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpSymbol {
    Unary(UnaryOpKind),
    Binary(BinaryOpKind),
    Ternary(TernaryOpKind),
    Shift(ShiftOpKind),
    IntegerConvert(IntegerConvertKind),
    FloatConvert(FloatConvert),
    /// Bit-pattern reinterpretation between kinds of equal width.
    Reinterpret,
}

impl OpSymbol {
    pub fn name(&self) -> &'static str {
        match self {
            OpSymbol::Unary(k) => k.name(),
            OpSymbol::Binary(k) => k.name(),
            OpSymbol::Ternary(k) => k.name(),
            OpSymbol::Shift(k) => k.name(),
            OpSymbol::IntegerConvert(k) => k.name(),
            OpSymbol::FloatConvert(k) => k.name(),
            OpSymbol::Reinterpret => "reinterpret",
        }
    }

    /// Looks up a symbol by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        UnaryOpKind::ALL
            .iter()
            .map(|k| OpSymbol::Unary(*k))
            .chain(BinaryOpKind::ALL.iter().map(|k| OpSymbol::Binary(*k)))
            .chain(TernaryOpKind::ALL.iter().map(|k| OpSymbol::Ternary(*k)))
            .chain(ShiftOpKind::ALL.iter().map(|k| OpSymbol::Shift(*k)))
            .chain(IntegerConvertKind::ALL.iter().map(|k| OpSymbol::IntegerConvert(*k)))
            .chain(FloatConvert::ALL.iter().map(|k| OpSymbol::FloatConvert(*k)))
            .chain(std::iter::once(OpSymbol::Reinterpret))
            .find(|symbol| symbol.name() == name)
    }
}

impl fmt::Display for OpSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
