//! 32-bit floating-point ALU operation set.
//!
//! Opcodes occupy a 4-bit register; encodings 1 through 11 are defined and
//! encoding 0 is invalid. The pass policy per operation:
//!
//! | Opcode | Name       | Policy    | Oracle     |
//! |--------|------------|-----------|------------|
//! | 1      | MUL        | unchecked | advisory   |
//! | 2      | DIV        | unchecked | advisory   |
//! | 3      | SUB        | checked   | IEEE-754   |
//! | 4      | OR         | checked   | raw bits   |
//! | 5      | AND        | checked   | raw bits   |
//! | 6      | XOR        | checked   | raw bits   |
//! | 7      | SHL        | checked   | `a << 1`   |
//! | 8      | SHR        | checked   | `a >> 1`   |
//! | 9      | FP2INT     | unchecked | advisory   |
//! | 10     | ADD        | checked   | IEEE-754   |
//! | 11     | COMPLEMENT | unchecked | none       |
//!
//! The hardware's complement operation computes a logical rather than a
//! bitwise negation, so it has no reference function and is never judged.

use std::fmt;

use crate::common::bits::width_mask;
use crate::oracle::float;

use super::{InputClass, OpDescriptor, OperandKind, Operation};

/// Operations of the 32-bit floating-point ALU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Fp32Op {
    /// IEEE-754 multiplication.
    Mul = 1,
    /// IEEE-754 division.
    Div = 2,
    /// IEEE-754 subtraction.
    Sub = 3,
    /// Bitwise OR.
    Or = 4,
    /// Bitwise AND.
    And = 5,
    /// Bitwise XOR.
    Xor = 6,
    /// Logical left shift by one.
    Shl = 7,
    /// Logical right shift by one.
    Shr = 8,
    /// Float to signed integer conversion.
    Fp2Int = 9,
    /// IEEE-754 addition.
    Add = 10,
    /// Complement of `a`.
    Complement = 11,
}

const FLOAT_BINS: &[InputClass] = &[
    InputClass::Nominal,
    InputClass::Negative,
    InputClass::Zero,
    InputClass::Subnormal,
    InputClass::Infinite,
    InputClass::Nan,
];

const LOGIC_BINS: &[InputClass] = &[InputClass::Zero, InputClass::AllOnes, InputClass::Alternating];

const SHIFT_BINS: &[InputClass] = &[InputClass::Nominal, InputClass::Carry];

const UNARY_BINS: &[InputClass] = &[InputClass::Nominal, InputClass::Zero, InputClass::AllOnes];

impl Operation for Fp32Op {
    const SET: &'static str = "fp32";
    const OPERAND_WIDTH: u8 = float::WIDTH;
    const ALL: &'static [Self] = &[
        Self::Mul,
        Self::Div,
        Self::Sub,
        Self::Or,
        Self::And,
        Self::Xor,
        Self::Shl,
        Self::Shr,
        Self::Fp2Int,
        Self::Add,
        Self::Complement,
    ];

    fn descriptor(self) -> OpDescriptor {
        let opcode = self as u8;
        match self {
            Self::Mul => OpDescriptor::unchecked("MUL", opcode, Some(float::mul)).operands(OperandKind::Float),
            Self::Div => OpDescriptor::unchecked("DIV", opcode, Some(float::div)).operands(OperandKind::Float),
            Self::Sub => OpDescriptor::checked("SUB", opcode, float::sub).operands(OperandKind::Float),
            Self::Or => OpDescriptor::checked("OR", opcode, float::or),
            Self::And => OpDescriptor::checked("AND", opcode, float::and),
            Self::Xor => OpDescriptor::checked("XOR", opcode, float::xor),
            Self::Shl => OpDescriptor::checked("SHL", opcode, float::shl1).unary(),
            Self::Shr => OpDescriptor::checked("SHR", opcode, float::shr1).unary(),
            Self::Fp2Int => OpDescriptor::unchecked("FP2INT", opcode, Some(float::fp2int))
                .operands(OperandKind::FloatToInt)
                .unary(),
            Self::Add => OpDescriptor::checked("ADD", opcode, float::add).operands(OperandKind::Float),
            Self::Complement => OpDescriptor::unchecked("COMPLEMENT", opcode, None).unary(),
        }
    }

    fn classify(self, a: u32, b: u32) -> Option<InputClass> {
        let mask = width_mask(Self::OPERAND_WIDTH);
        match self {
            Self::Mul | Self::Div | Self::Sub | Self::Add => Some(InputClass::of_float_pair(a, b)),
            Self::Fp2Int => Some(InputClass::of_float(a)),
            Self::Or | Self::And | Self::Xor => InputClass::of_pattern_pair(a, b, mask),
            Self::Shl => Some(shifted_out(a >> 31)),
            Self::Shr => Some(shifted_out(a & 1)),
            Self::Complement => Some(match a {
                0 => InputClass::Zero,
                _ if a == mask => InputClass::AllOnes,
                _ => InputClass::Nominal,
            }),
        }
    }

    fn coverage_bins(self) -> &'static [InputClass] {
        match self {
            Self::Mul | Self::Div | Self::Sub | Self::Add | Self::Fp2Int => FLOAT_BINS,
            Self::Or | Self::And | Self::Xor => LOGIC_BINS,
            Self::Shl | Self::Shr => SHIFT_BINS,
            Self::Complement => UNARY_BINS,
        }
    }
}

/// A set bit leaving the register counts as a carry.
const fn shifted_out(bit: u32) -> InputClass {
    if bit == 0 { InputClass::Nominal } else { InputClass::Carry }
}

impl fmt::Display for Fp32Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
