//! The per-kind operator registry.

use once_cell::sync::Lazy;

use super::descriptor::{
    BinaryOp, FloatConvertOp, IntegerConvertOp, OpDescriptor, ReinterpretOp, ShiftOp, TernaryOp, UnaryOp,
};
use super::{BinaryOpKind, FloatConvert, IntegerConvertKind, OpSymbol, ShiftOpKind, TernaryOpKind, UnaryOpKind};
use crate::kind::ValueKind;
use crate::stamp::Stamp;

/// At most one descriptor per operator symbol, for one family of value kinds.
#[derive(Debug, Clone)]
pub struct ArithmeticOpTable {
    unary: [Option<UnaryOp>; UnaryOpKind::COUNT],
    binary: [Option<BinaryOp>; BinaryOpKind::COUNT],
    ternary: [Option<TernaryOp>; TernaryOpKind::COUNT],
    shift: [Option<ShiftOp>; ShiftOpKind::COUNT],
    integer_convert: [Option<IntegerConvertOp>; IntegerConvertKind::COUNT],
    float_convert: [Option<FloatConvertOp>; FloatConvert::COUNT],
    reinterpret: Option<ReinterpretOp>,
}

static INTEGER_TABLE: Lazy<ArithmeticOpTable> = Lazy::new(super::integer::table);
static FLOAT_TABLE: Lazy<ArithmeticOpTable> = Lazy::new(super::float::table);
static EMPTY_TABLE: ArithmeticOpTable = ArithmeticOpTable::EMPTY;

fn register<T>(slot: &mut Option<T>, op: T, symbol: OpSymbol) {
    assert!(slot.is_none(), "operator '{}' registered twice", symbol);
    *slot = Some(op);
}

impl ArithmeticOpTable {
    /// The table for kinds without arithmetic.
    pub const EMPTY: ArithmeticOpTable = ArithmeticOpTable {
        unary: [None; UnaryOpKind::COUNT],
        binary: [None; BinaryOpKind::COUNT],
        ternary: [None; TernaryOpKind::COUNT],
        shift: [None; ShiftOpKind::COUNT],
        integer_convert: [None; IntegerConvertKind::COUNT],
        float_convert: [None; FloatConvert::COUNT],
        reinterpret: None,
    };

    /// Builds a table from descriptors.
    ///
    /// # Panics
    /// Panics if two descriptors share a symbol.
    pub fn create(ops: impl IntoIterator<Item = OpDescriptor>) -> Self {
        let mut table = Self::EMPTY;
        for op in ops {
            let symbol = op.symbol();
            match op {
                OpDescriptor::Unary(op) => register(&mut table.unary[op.kind().index()], op, symbol),
                OpDescriptor::Binary(op) => register(&mut table.binary[op.kind().index()], op, symbol),
                OpDescriptor::Ternary(op) => register(&mut table.ternary[op.kind().index()], op, symbol),
                OpDescriptor::Shift(op) => register(&mut table.shift[op.kind().index()], op, symbol),
                OpDescriptor::IntegerConvert(op) => {
                    register(&mut table.integer_convert[op.kind().index()], op, symbol)
                }
                OpDescriptor::FloatConvert(op) => {
                    register(&mut table.float_convert[op.kind().index()], op, symbol)
                }
                OpDescriptor::Reinterpret(op) => register(&mut table.reinterpret, op, symbol),
            }
        }
        table
    }

    /// The shared table for `kind`.
    pub fn for_kind(kind: ValueKind) -> &'static ArithmeticOpTable {
        match kind {
            ValueKind::Bool | ValueKind::Int8 | ValueKind::Int16 | ValueKind::Int32 | ValueKind::Int64 => {
                &*INTEGER_TABLE
            }
            ValueKind::Float32 | ValueKind::Float64 => &*FLOAT_TABLE,
            ValueKind::Object | ValueKind::Void | ValueKind::Illegal => &EMPTY_TABLE,
        }
    }

    pub fn for_stamp(stamp: &Stamp) -> &'static ArithmeticOpTable {
        Self::for_kind(stamp.value_kind())
    }

    pub fn operator(&self, symbol: OpSymbol) -> Option<OpDescriptor> {
        match symbol {
            OpSymbol::Unary(k) => self.unary[k.index()].map(OpDescriptor::Unary),
            OpSymbol::Binary(k) => self.binary[k.index()].map(OpDescriptor::Binary),
            OpSymbol::Ternary(k) => self.ternary[k.index()].map(OpDescriptor::Ternary),
            OpSymbol::Shift(k) => self.shift[k.index()].map(OpDescriptor::Shift),
            OpSymbol::IntegerConvert(k) => self.integer_convert[k.index()].map(OpDescriptor::IntegerConvert),
            OpSymbol::FloatConvert(k) => self.float_convert[k.index()].map(OpDescriptor::FloatConvert),
            OpSymbol::Reinterpret => self.reinterpret.map(OpDescriptor::Reinterpret),
        }
    }

    pub fn unary(&self, kind: UnaryOpKind) -> Option<&UnaryOp> {
        self.unary[kind.index()].as_ref()
    }

    pub fn binary(&self, kind: BinaryOpKind) -> Option<&BinaryOp> {
        self.binary[kind.index()].as_ref()
    }

    pub fn ternary(&self, kind: TernaryOpKind) -> Option<&TernaryOp> {
        self.ternary[kind.index()].as_ref()
    }

    pub fn shift(&self, kind: ShiftOpKind) -> Option<&ShiftOp> {
        self.shift[kind.index()].as_ref()
    }

    pub fn integer_convert(&self, kind: IntegerConvertKind) -> Option<&IntegerConvertOp> {
        self.integer_convert[kind.index()].as_ref()
    }

    pub fn float_convert(&self, kind: FloatConvert) -> Option<&FloatConvertOp> {
        self.float_convert[kind.index()].as_ref()
    }

    pub fn reinterpret(&self) -> Option<&ReinterpretOp> {
        self.reinterpret.as_ref()
    }

    pub fn neg(&self) -> Option<&UnaryOp> {
        self.unary(UnaryOpKind::Neg)
    }

    pub fn add(&self) -> Option<&BinaryOp> {
        self.binary(BinaryOpKind::Add)
    }

    pub fn sub(&self) -> Option<&BinaryOp> {
        self.binary(BinaryOpKind::Sub)
    }

    pub fn mul(&self) -> Option<&BinaryOp> {
        self.binary(BinaryOpKind::Mul)
    }

    pub fn and(&self) -> Option<&BinaryOp> {
        self.binary(BinaryOpKind::And)
    }

    /// All registered descriptors, unary first.
    pub fn operators(&self) -> impl Iterator<Item = OpDescriptor> + '_ {
        self.unary
            .iter()
            .flatten()
            .map(|op| OpDescriptor::Unary(*op))
            .chain(self.binary.iter().flatten().map(|op| OpDescriptor::Binary(*op)))
            .chain(self.ternary.iter().flatten().map(|op| OpDescriptor::Ternary(*op)))
            .chain(self.shift.iter().flatten().map(|op| OpDescriptor::Shift(*op)))
            .chain(self.integer_convert.iter().flatten().map(|op| OpDescriptor::IntegerConvert(*op)))
            .chain(self.float_convert.iter().flatten().map(|op| OpDescriptor::FloatConvert(*op)))
            .chain(self.reinterpret.iter().map(|op| OpDescriptor::Reinterpret(*op)))
    }

    pub fn is_empty(&self) -> bool {
        self.operators().next().is_none()
    }
}
