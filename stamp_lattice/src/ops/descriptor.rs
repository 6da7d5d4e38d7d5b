//! Typed operator descriptors.
//!
//! Each descriptor bundles a constant fold and a stamp fold for one operator.
//! The public `fold_*` methods check operand compatibility, pass empty inputs
//! through, and fold singleton stamps exactly before handing the general case
//! to the operator's stamp function.

use crate::constant::Constant;
use crate::diagnostics::{emit_empty_result, emit_unrestricted_fallback};
use crate::error::{StampError, StampResult};
use crate::kind::ValueKind;
use crate::stamp::{IntegerStamp, Stamp, StampFactory};

use super::{BinaryOpKind, FloatConvert, IntegerConvertKind, OpSymbol, ShiftOpKind, TernaryOpKind, UnaryOpKind};

pub(crate) type UnaryConstantFn = fn(&Constant) -> StampResult<Option<Constant>>;
pub(crate) type UnaryStampFn = fn(&Stamp) -> StampResult<Stamp>;
pub(crate) type BinaryConstantFn = fn(&Constant, &Constant) -> StampResult<Option<Constant>>;
pub(crate) type BinaryStampFn = fn(&Stamp, &Stamp) -> StampResult<Stamp>;
pub(crate) type NeutralFn = fn(&Constant) -> bool;
pub(crate) type ConvertConstantFn = fn(u32, u32, &Constant) -> StampResult<Option<Constant>>;
pub(crate) type ConvertStampFn = fn(u32, u32, &Stamp) -> StampResult<Stamp>;
pub(crate) type TernaryConstantFn = fn(&Constant, &Constant, &Constant) -> StampResult<Option<Constant>>;
pub(crate) type TernaryStampFn = fn(&Stamp, &Stamp, &Stamp) -> StampResult<Stamp>;
pub(crate) type ReinterpretConstantFn = fn(ValueKind, &Constant) -> StampResult<Option<Constant>>;
pub(crate) type ReinterpretStampFn = fn(ValueKind, &Stamp) -> StampResult<Stamp>;

fn report(op: &'static str, inputs: &[&Stamp], result: &Stamp) {
    if result.is_unrestricted() && inputs.iter().all(|s| !s.is_unrestricted()) {
        emit_unrestricted_fallback(op, || describe(inputs));
    } else if result.is_empty() {
        emit_empty_result(op, || describe(inputs));
    }
}

fn describe(inputs: &[&Stamp]) -> String {
    inputs
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_numeric(op: &'static str, stamp: &Stamp) -> StampResult<()> {
    match stamp {
        Stamp::Integer(_) | Stamp::Float(_) => Ok(()),
        _ => Err(StampError::IncompatibleStamps {
            op,
            left: "numeric".to_string(),
            right: stamp.to_string(),
        }),
    }
}

fn constant_result(folded: Option<Constant>) -> Option<Stamp> {
    folded.map(|c| StampFactory::for_constant(&c))
}

#[derive(Debug, Clone, Copy)]
pub struct UnaryOp {
    kind: UnaryOpKind,
    fold_constant: UnaryConstantFn,
    fold_stamp: UnaryStampFn,
}

impl UnaryOp {
    pub(crate) fn new(kind: UnaryOpKind, fold_constant: UnaryConstantFn, fold_stamp: UnaryStampFn) -> Self {
        Self {
            kind,
            fold_constant,
            fold_stamp,
        }
    }

    pub fn kind(&self) -> UnaryOpKind {
        self.kind
    }

    pub fn fold_constant(&self, value: &Constant) -> StampResult<Option<Constant>> {
        (self.fold_constant)(value)
    }

    pub fn fold_stamp(&self, stamp: &Stamp) -> StampResult<Stamp> {
        check_numeric(self.kind.name(), stamp)?;
        if stamp.is_empty() {
            return Ok(stamp.clone());
        }
        if let Some(c) = stamp.as_constant() {
            if let Some(folded) = constant_result(self.fold_constant(&c)?) {
                return Ok(folded);
            }
        }
        let result = (self.fold_stamp)(stamp)?;
        report(self.kind.name(), &[stamp], &result);
        Ok(result)
    }
}

/// A binary operator plus the algebraic facts optimizations may rely on.
#[derive(Debug, Clone, Copy)]
pub struct BinaryOp {
    kind: BinaryOpKind,
    commutative: bool,
    associative: bool,
    self_inverse: bool,
    neutral: Option<NeutralFn>,
    fold_constant: BinaryConstantFn,
    fold_stamp: BinaryStampFn,
}

impl BinaryOp {
    pub(crate) fn new(kind: BinaryOpKind, fold_constant: BinaryConstantFn, fold_stamp: BinaryStampFn) -> Self {
        Self {
            kind,
            commutative: false,
            associative: false,
            self_inverse: false,
            neutral: None,
            fold_constant,
            fold_stamp,
        }
    }

    pub(crate) fn commutative(mut self) -> Self {
        self.commutative = true;
        self
    }

    pub(crate) fn associative(mut self) -> Self {
        self.associative = true;
        self
    }

    /// `x op x` is always zero.
    pub(crate) fn self_inverse(mut self) -> Self {
        self.self_inverse = true;
        self
    }

    pub(crate) fn with_neutral(mut self, neutral: NeutralFn) -> Self {
        self.neutral = Some(neutral);
        self
    }

    pub fn kind(&self) -> BinaryOpKind {
        self.kind
    }

    pub fn is_commutative(&self) -> bool {
        self.commutative
    }

    pub fn is_associative(&self) -> bool {
        self.associative
    }

    /// True if `x op value == x` for every `x`.
    pub fn is_identity_element(&self, value: &Constant) -> bool {
        self.neutral.is_some_and(|neutral| neutral(value))
    }

    /// The constant `x op x` evaluates to for every `x` of `stamp`, if any.
    pub fn zero(&self, stamp: &Stamp) -> Option<Constant> {
        if !self.self_inverse {
            return None;
        }
        stamp.as_integer().map(|s| Constant::int(s.bits(), 0))
    }

    pub fn fold_constant(&self, a: &Constant, b: &Constant) -> StampResult<Option<Constant>> {
        (self.fold_constant)(a, b)
    }

    pub fn fold_stamp(&self, a: &Stamp, b: &Stamp) -> StampResult<Stamp> {
        if !a.is_compatible(b) {
            return Err(StampError::incompatible_stamps(self.kind.name(), a, b));
        }
        check_numeric(self.kind.name(), a)?;
        if a.is_empty() {
            return Ok(a.clone());
        }
        if b.is_empty() {
            return Ok(b.clone());
        }
        if let (Some(x), Some(y)) = (a.as_constant(), b.as_constant()) {
            if let Some(folded) = constant_result(self.fold_constant(&x, &y)?) {
                return Ok(folded);
            }
        }
        let result = (self.fold_stamp)(a, b)?;
        report(self.kind.name(), &[a, b], &result);
        Ok(result)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TernaryOp {
    kind: TernaryOpKind,
    fold_constant: TernaryConstantFn,
    fold_stamp: TernaryStampFn,
}

impl TernaryOp {
    pub(crate) fn new(kind: TernaryOpKind, fold_constant: TernaryConstantFn, fold_stamp: TernaryStampFn) -> Self {
        Self {
            kind,
            fold_constant,
            fold_stamp,
        }
    }

    pub fn kind(&self) -> TernaryOpKind {
        self.kind
    }

    pub fn fold_constant(&self, a: &Constant, b: &Constant, c: &Constant) -> StampResult<Option<Constant>> {
        (self.fold_constant)(a, b, c)
    }

    pub fn fold_stamp(&self, a: &Stamp, b: &Stamp, c: &Stamp) -> StampResult<Stamp> {
        for other in [b, c] {
            if !a.is_compatible(other) {
                return Err(StampError::incompatible_stamps(self.kind.name(), a, other));
            }
        }
        check_numeric(self.kind.name(), a)?;
        if let Some(empty) = [a, b, c].into_iter().find(|s| s.is_empty()) {
            return Ok(empty.clone());
        }
        if let (Some(x), Some(y), Some(z)) = (a.as_constant(), b.as_constant(), c.as_constant()) {
            if let Some(folded) = constant_result(self.fold_constant(&x, &y, &z)?) {
                return Ok(folded);
            }
        }
        let result = (self.fold_stamp)(a, b, c)?;
        report(self.kind.name(), &[a, b, c], &result);
        Ok(result)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ShiftOp {
    kind: ShiftOpKind,
    fold_constant: BinaryConstantFn,
    fold_stamp: BinaryStampFn,
}

impl ShiftOp {
    pub(crate) fn new(kind: ShiftOpKind, fold_constant: BinaryConstantFn, fold_stamp: BinaryStampFn) -> Self {
        Self {
            kind,
            fold_constant,
            fold_stamp,
        }
    }

    pub fn kind(&self) -> ShiftOpKind {
        self.kind
    }

    /// Mask applied to the shift amount: the stack width of `value` minus one.
    pub fn shift_amount_mask(&self, value: &Stamp) -> Option<u32> {
        value.as_integer().map(|s| if s.bits() > 32 { 63 } else { 31 })
    }

    pub fn fold_constant(&self, value: &Constant, amount: &Constant) -> StampResult<Option<Constant>> {
        (self.fold_constant)(value, amount)
    }

    pub fn fold_stamp(&self, value: &Stamp, amount: &Stamp) -> StampResult<Stamp> {
        if value.as_integer().is_none() || amount.as_integer().is_none() {
            return Err(StampError::incompatible_stamps(self.kind.name(), value, amount));
        }
        if value.is_empty() {
            return Ok(value.clone());
        }
        if amount.is_empty() {
            return Ok(value.empty());
        }
        if let (Some(x), Some(n)) = (value.as_constant(), amount.as_constant()) {
            if let Some(folded) = constant_result(self.fold_constant(&x, &n)?) {
                return Ok(folded);
            }
        }
        let result = (self.fold_stamp)(value, amount)?;
        report(self.kind.name(), &[value, amount], &result);
        Ok(result)
    }
}

/// Width conversion between integer kinds.
#[derive(Debug, Clone, Copy)]
pub struct IntegerConvertOp {
    kind: IntegerConvertKind,
    fold_constant: ConvertConstantFn,
    fold_stamp: ConvertStampFn,
}

impl IntegerConvertOp {
    pub(crate) fn new(
        kind: IntegerConvertKind,
        fold_constant: ConvertConstantFn,
        fold_stamp: ConvertStampFn,
    ) -> Self {
        Self {
            kind,
            fold_constant,
            fold_stamp,
        }
    }

    pub fn kind(&self) -> IntegerConvertKind {
        self.kind
    }

    fn check_widths(&self, input_bits: u32, result_bits: u32) -> StampResult<()> {
        for bits in [input_bits, result_bits] {
            if !crate::bits::is_supported_width(bits) {
                return Err(StampError::UnsupportedWidth(bits));
            }
        }
        let ordered = match self.kind {
            IntegerConvertKind::ZeroExtend | IntegerConvertKind::SignExtend => result_bits >= input_bits,
            IntegerConvertKind::Narrow => result_bits <= input_bits,
        };
        if !ordered {
            return Err(StampError::BitWidthMismatch {
                op: self.kind.name(),
                expected: input_bits,
                found: result_bits,
            });
        }
        Ok(())
    }

    pub fn fold_constant(
        &self,
        input_bits: u32,
        result_bits: u32,
        value: &Constant,
    ) -> StampResult<Option<Constant>> {
        self.check_widths(input_bits, result_bits)?;
        (self.fold_constant)(input_bits, result_bits, value)
    }

    pub fn fold_stamp(&self, input_bits: u32, result_bits: u32, stamp: &Stamp) -> StampResult<Stamp> {
        self.check_widths(input_bits, result_bits)?;
        let Some(input) = stamp.as_integer() else {
            return Err(StampError::IncompatibleStamps {
                op: self.kind.name(),
                left: format!("i{}", input_bits),
                right: stamp.to_string(),
            });
        };
        if input.bits() != input_bits {
            return Err(StampError::BitWidthMismatch {
                op: self.kind.name(),
                expected: input_bits,
                found: input.bits(),
            });
        }
        if stamp.is_empty() {
            return Ok(Stamp::Integer(IntegerStamp::empty_of(result_bits)));
        }
        if let Some(c) = stamp.as_constant() {
            if let Some(folded) = constant_result(self.fold_constant(input_bits, result_bits, &c)?) {
                return Ok(folded);
            }
        }
        let result = (self.fold_stamp)(input_bits, result_bits, stamp)?;
        report(self.kind.name(), &[stamp], &result);
        Ok(result)
    }
}

/// Conversion between a float kind and another numeric kind.
#[derive(Debug, Clone, Copy)]
pub struct FloatConvertOp {
    kind: FloatConvert,
    fold_constant: UnaryConstantFn,
    fold_stamp: UnaryStampFn,
}

impl FloatConvertOp {
    pub(crate) fn new(kind: FloatConvert, fold_constant: UnaryConstantFn, fold_stamp: UnaryStampFn) -> Self {
        Self {
            kind,
            fold_constant,
            fold_stamp,
        }
    }

    pub fn kind(&self) -> FloatConvert {
        self.kind
    }

    fn check_input(&self, stamp: &Stamp) -> StampResult<()> {
        if stamp.stack_kind() != self.kind.input_kind() {
            return Err(StampError::IncompatibleStamps {
                op: self.kind.name(),
                left: self.kind.input_kind().to_string(),
                right: stamp.to_string(),
            });
        }
        Ok(())
    }

    pub fn fold_constant(&self, value: &Constant) -> StampResult<Option<Constant>> {
        (self.fold_constant)(value)
    }

    pub fn fold_stamp(&self, stamp: &Stamp) -> StampResult<Stamp> {
        self.check_input(stamp)?;
        if stamp.is_empty() {
            return Ok(StampFactory::empty(self.kind.result_kind()));
        }
        if let Some(c) = stamp.as_constant() {
            if let Some(folded) = constant_result(self.fold_constant(&c)?) {
                return Ok(folded);
            }
        }
        let result = (self.fold_stamp)(stamp)?;
        report(self.kind.name(), &[stamp], &result);
        Ok(result)
    }
}

/// Reads the bits of a 32- or 64-bit value as another kind of the same width.
#[derive(Debug, Clone, Copy)]
pub struct ReinterpretOp {
    fold_constant: ReinterpretConstantFn,
    fold_stamp: ReinterpretStampFn,
}

fn reinterpret_widths(result: ValueKind, input: ValueKind, input_text: &dyn std::fmt::Display) -> StampResult<()> {
    let result_bits = match result {
        ValueKind::Int32 | ValueKind::Float32 => 32,
        ValueKind::Int64 | ValueKind::Float64 => 64,
        _ => {
            return Err(StampError::IncompatibleStamps {
                op: "reinterpret",
                left: result.to_string(),
                right: input_text.to_string(),
            })
        }
    };
    let input_bits = input.bits().unwrap_or(0);
    if input_bits != result_bits {
        return Err(StampError::BitWidthMismatch {
            op: "reinterpret",
            expected: result_bits,
            found: input_bits,
        });
    }
    Ok(())
}

impl ReinterpretOp {
    pub(crate) fn new(fold_constant: ReinterpretConstantFn, fold_stamp: ReinterpretStampFn) -> Self {
        Self {
            fold_constant,
            fold_stamp,
        }
    }

    /// The constant of kind `result` with the bits of `value`.
    pub fn fold_constant(&self, result: ValueKind, value: &Constant) -> StampResult<Option<Constant>> {
        reinterpret_widths(result, value.kind(), value)?;
        if value.kind() == result {
            return Ok(Some(value.clone()));
        }
        (self.fold_constant)(result, value)
    }

    pub fn fold_stamp(&self, result: ValueKind, stamp: &Stamp) -> StampResult<Stamp> {
        check_numeric("reinterpret", stamp)?;
        reinterpret_widths(result, stamp.value_kind(), stamp)?;
        if stamp.value_kind() == result {
            return Ok(stamp.clone());
        }
        if stamp.is_empty() {
            return Ok(StampFactory::empty(result));
        }
        if let Some(c) = stamp.as_constant() {
            if let Some(folded) = constant_result(self.fold_constant(result, &c)?) {
                return Ok(folded);
            }
        }
        let result_stamp = (self.fold_stamp)(result, stamp)?;
        report("reinterpret", &[stamp], &result_stamp);
        Ok(result_stamp)
    }
}

/// Any registered operator.
#[derive(Debug, Clone, Copy)]
pub enum OpDescriptor {
    Unary(UnaryOp),
    Binary(BinaryOp),
    Ternary(TernaryOp),
    Shift(ShiftOp),
    IntegerConvert(IntegerConvertOp),
    FloatConvert(FloatConvertOp),
    Reinterpret(ReinterpretOp),
}

impl OpDescriptor {
    pub fn symbol(&self) -> OpSymbol {
        match self {
            OpDescriptor::Unary(op) => OpSymbol::Unary(op.kind),
            OpDescriptor::Binary(op) => OpSymbol::Binary(op.kind),
            OpDescriptor::Ternary(op) => OpSymbol::Ternary(op.kind),
            OpDescriptor::Shift(op) => OpSymbol::Shift(op.kind),
            OpDescriptor::IntegerConvert(op) => OpSymbol::IntegerConvert(op.kind),
            OpDescriptor::FloatConvert(op) => OpSymbol::FloatConvert(op.kind),
            OpDescriptor::Reinterpret(_) => OpSymbol::Reinterpret,
        }
    }

    pub fn name(&self) -> &'static str {
        self.symbol().name()
    }

    /// Only binary operators can be commutative.
    pub fn is_commutative(&self) -> bool {
        matches!(self, OpDescriptor::Binary(op) if op.is_commutative())
    }

    pub fn is_associative(&self) -> bool {
        matches!(self, OpDescriptor::Binary(op) if op.is_associative())
    }

    pub fn is_identity_element(&self, value: &Constant) -> bool {
        matches!(self, OpDescriptor::Binary(op) if op.is_identity_element(value))
    }
}

impl From<UnaryOp> for OpDescriptor {
    fn from(op: UnaryOp) -> Self {
        OpDescriptor::Unary(op)
    }
}

impl From<BinaryOp> for OpDescriptor {
    fn from(op: BinaryOp) -> Self {
        OpDescriptor::Binary(op)
    }
}

impl From<TernaryOp> for OpDescriptor {
    fn from(op: TernaryOp) -> Self {
        OpDescriptor::Ternary(op)
    }
}

impl From<ShiftOp> for OpDescriptor {
    fn from(op: ShiftOp) -> Self {
        OpDescriptor::Shift(op)
    }
}

impl From<IntegerConvertOp> for OpDescriptor {
    fn from(op: IntegerConvertOp) -> Self {
        OpDescriptor::IntegerConvert(op)
    }
}

impl From<FloatConvertOp> for OpDescriptor {
    fn from(op: FloatConvertOp) -> Self {
        OpDescriptor::FloatConvert(op)
    }
}

impl From<ReinterpretOp> for OpDescriptor {
    fn from(op: ReinterpretOp) -> Self {
        OpDescriptor::Reinterpret(op)
    }
}
