//! Operation sets and their descriptors.
//!
//! Every DUT under test exposes an opcode register selecting one of a fixed
//! set of functions. This module provides:
//! 1. **Operation trait:** The typed view of an opcode set used by the harness.
//! 2. **Descriptors:** An exhaustive per-variant table of display name, opcode
//!    encoding, oracle and check policy.
//! 3. **Operation sets:** [`Alu8Op`] (8-bit integer ALU) and [`Fp32Op`]
//!    (32-bit IEEE-754 ALU).
//! 4. **Input classes:** Coverage bins derived from operands.
//!
//! Opcode decoding goes through the descriptor table, so an unknown encoding
//! is `None` rather than an out-of-range index.

/// 8-bit integer ALU operation set.
pub mod alu8;

/// Coverage input classes.
pub mod class;

/// 32-bit floating-point ALU operation set.
pub mod fp32;

pub use alu8::Alu8Op;
pub use class::InputClass;
pub use fp32::Fp32Op;

use std::fmt;
use std::hash::Hash;

use serde::Serialize;

use crate::oracle::{Expectation, OracleFn};

/// Whether an operation's result is judged against its oracle.
///
/// `Unchecked` operations still run and their outputs are reported, but the
/// verdict is always a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckPolicy {
    /// Result and masked flags must match the expectation.
    Checked,
    /// Always passes; observed values are surfaced for inspection only.
    Unchecked,
}

/// How operands and results are interpreted for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandKind {
    /// Raw bit patterns.
    Bits,
    /// IEEE-754 single-precision operands and result.
    Float,
    /// IEEE-754 operand converted to an integer result.
    FloatToInt,
}

/// Static description of one operation.
#[derive(Clone, Copy, Debug)]
pub struct OpDescriptor {
    /// Display name (e.g. `"ADD"`).
    pub name: &'static str,
    /// Value driven onto the DUT's opcode register.
    pub opcode: u8,
    /// Reference function, if one is defined.
    pub oracle: Option<OracleFn>,
    /// Pass policy.
    pub policy: CheckPolicy,
    /// Display interpretation of operands and result.
    pub operands: OperandKind,
    /// Only operand `a` is meaningful.
    pub unary: bool,
}

impl OpDescriptor {
    /// Describes a checked operation; checked operations always carry an oracle.
    pub const fn checked(name: &'static str, opcode: u8, oracle: OracleFn) -> Self {
        Self {
            name,
            opcode,
            oracle: Some(oracle),
            policy: CheckPolicy::Checked,
            operands: OperandKind::Bits,
            unary: false,
        }
    }

    /// Describes an unchecked operation, with an advisory oracle if one exists.
    pub const fn unchecked(name: &'static str, opcode: u8, oracle: Option<OracleFn>) -> Self {
        Self {
            name,
            opcode,
            oracle,
            policy: CheckPolicy::Unchecked,
            operands: OperandKind::Bits,
            unary: false,
        }
    }

    /// Sets the display interpretation.
    #[must_use]
    pub const fn operands(mut self, kind: OperandKind) -> Self {
        self.operands = kind;
        self
    }

    /// Marks the operation as single-operand.
    #[must_use]
    pub const fn unary(mut self) -> Self {
        self.unary = true;
        self
    }
}

/// A typed opcode set.
///
/// Implementors are plain enums; every method is a pure table lookup.
pub trait Operation: Copy + Eq + Ord + Hash + fmt::Debug + 'static {
    /// Short name of the set, used as trace scope and coverage namespace.
    const SET: &'static str;
    /// Width of the operand registers in bits.
    const OPERAND_WIDTH: u8;
    /// Every variant, in opcode order.
    const ALL: &'static [Self];

    /// Returns the descriptor of this operation.
    fn descriptor(self) -> OpDescriptor;

    /// Derives the coverage input class of an operand pair.
    ///
    /// `None` means the operands fall outside the modeled classes; the
    /// operation itself is still marked as exercised.
    fn classify(self, a: u32, b: u32) -> Option<InputClass>;

    /// Returns the input classes modeled for this operation.
    fn coverage_bins(self) -> &'static [InputClass];

    /// Display name.
    fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Opcode register encoding.
    fn opcode(self) -> u8 {
        self.descriptor().opcode
    }

    /// Pass policy.
    fn policy(self) -> CheckPolicy {
        self.descriptor().policy
    }

    /// Evaluates the oracle, if the operation has one.
    fn oracle(self, a: u32, b: u32) -> Option<Expectation> {
        self.descriptor().oracle.map(|f| f(a, b))
    }

    /// Decodes an opcode register value.
    fn from_opcode(opcode: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.opcode() == opcode)
    }

    /// Looks up an operation by display name (case-insensitive).
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }
}
