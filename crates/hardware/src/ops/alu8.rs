//! 8-bit integer ALU operation set.
//!
//! Opcodes occupy a 3-bit register. Every operation is checked against the
//! reference functions in [`crate::oracle::integer`].

use std::fmt;

use crate::common::StatusFlags;
use crate::common::bits::width_mask;
use crate::oracle::integer;

use super::{InputClass, OpDescriptor, OperandKind, Operation};

/// Operations of the 8-bit integer ALU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Alu8Op {
    /// Wrapping addition.
    Add = 0b000,
    /// Wrapping subtraction.
    Sub = 0b001,
    /// Bitwise AND.
    And = 0b010,
    /// Bitwise OR.
    Or = 0b011,
    /// Bitwise XOR.
    Xor = 0b100,
    /// Bitwise NOT of `a`.
    Not = 0b101,
    /// Logical left shift by `b[2:0]`.
    Shl = 0b110,
    /// Logical right shift by `b[2:0]`.
    Shr = 0b111,
}

const ARITH_BINS: &[InputClass] = &[
    InputClass::Nominal,
    InputClass::ZeroResult,
    InputClass::Carry,
    InputClass::Overflow,
];

const LOGIC_BINS: &[InputClass] = &[InputClass::Zero, InputClass::AllOnes, InputClass::Alternating];

const NOT_BINS: &[InputClass] = &[InputClass::Nominal, InputClass::Zero, InputClass::AllOnes];

const SHIFT_BINS: &[InputClass] = &[
    InputClass::Nominal,
    InputClass::ZeroShift,
    InputClass::MaxShift,
];

/// Largest encodable shift amount.
const MAX_SHAMT: u32 = 0b111;

impl Operation for Alu8Op {
    const SET: &'static str = "alu8";
    const OPERAND_WIDTH: u8 = integer::WIDTH;
    const ALL: &'static [Self] = &[
        Self::Add,
        Self::Sub,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Not,
        Self::Shl,
        Self::Shr,
    ];

    fn descriptor(self) -> OpDescriptor {
        let opcode = self as u8;
        match self {
            Self::Add => OpDescriptor::checked("ADD", opcode, integer::add),
            Self::Sub => OpDescriptor::checked("SUB", opcode, integer::sub),
            Self::And => OpDescriptor::checked("AND", opcode, integer::and),
            Self::Or => OpDescriptor::checked("OR", opcode, integer::or),
            Self::Xor => OpDescriptor::checked("XOR", opcode, integer::xor),
            Self::Not => OpDescriptor::checked("NOT", opcode, integer::not).unary(),
            Self::Shl => OpDescriptor::checked("SHL", opcode, integer::shl),
            Self::Shr => OpDescriptor::checked("SHR", opcode, integer::shr),
        }
        .operands(OperandKind::Bits)
    }

    fn classify(self, a: u32, b: u32) -> Option<InputClass> {
        let mask = width_mask(Self::OPERAND_WIDTH);
        let (a, b) = (a & mask, b & mask);
        match self {
            Self::Add | Self::Sub => {
                let flags = self
                    .oracle(a, b)
                    .and_then(|e| e.flags)
                    .unwrap_or_default();
                Some(if flags.contains(StatusFlags::CARRY) {
                    InputClass::Carry
                } else if flags.contains(StatusFlags::OVERFLOW) {
                    InputClass::Overflow
                } else if flags.contains(StatusFlags::ZERO) {
                    InputClass::ZeroResult
                } else {
                    InputClass::Nominal
                })
            }
            Self::And | Self::Or | Self::Xor => InputClass::of_pattern_pair(a, b, mask),
            Self::Not => Some(match a {
                0 => InputClass::Zero,
                _ if a == mask => InputClass::AllOnes,
                _ => InputClass::Nominal,
            }),
            Self::Shl | Self::Shr => Some(match b & MAX_SHAMT {
                0 => InputClass::ZeroShift,
                MAX_SHAMT => InputClass::MaxShift,
                _ => InputClass::Nominal,
            }),
        }
    }

    fn coverage_bins(self) -> &'static [InputClass] {
        match self {
            Self::Add | Self::Sub => ARITH_BINS,
            Self::And | Self::Or | Self::Xor => LOGIC_BINS,
            Self::Not => NOT_BINS,
            Self::Shl | Self::Shr => SHIFT_BINS,
        }
    }
}

impl fmt::Display for Alu8Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
