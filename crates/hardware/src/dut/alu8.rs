//! Behavioral model of the 8-bit integer ALU.
//!
//! Register interface:
//! - `a[7:0]`, `b[7:0]`, `op[2:0]` inputs.
//! - `result[7:0]`, `zero`, `carry`, `overflow` outputs.
//!
//! Carry and overflow use the usual sign-bit formulations of the adder and
//! subtractor; logic and shift operations clear them.

use crate::common::StatusFlags;

use super::{Dut, InputRegisters, OutputRegisters, PortWidths, Propagation, latch};

const MASK: u32 = 0xFF;
const SIGN: u32 = 0x80;
const SHAMT: u32 = 0b111;
const OPCODE_MASK: u8 = 0b111;

/// 8-bit integer ALU.
#[derive(Clone, Debug, Default)]
pub struct Alu8 {
    inputs: InputRegisters,
    outputs: OutputRegisters,
}

impl Alu8 {
    /// Creates the ALU with all registers cleared.
    pub fn new() -> Self {
        Self::default()
    }

    fn compute(inputs: InputRegisters) -> OutputRegisters {
        let a = inputs.a & MASK;
        let b = inputs.b & MASK;
        let (result, carry, overflow) = match inputs.opcode & OPCODE_MASK {
            0b000 => {
                let sum = a + b;
                let r = sum & MASK;
                (r, sum > MASK, (a ^ r) & (b ^ r) & SIGN != 0)
            }
            0b001 => {
                let r = a.wrapping_sub(b) & MASK;
                (r, a < b, (a ^ b) & (a ^ r) & SIGN != 0)
            }
            0b010 => (a & b, false, false),
            0b011 => (a | b, false, false),
            0b100 => (a ^ b, false, false),
            0b101 => (!a & MASK, false, false),
            0b110 => ((a << (b & SHAMT)) & MASK, false, false),
            _ => (a >> (b & SHAMT), false, false),
        };
        let flags = StatusFlags::NONE
            .with(StatusFlags::ZERO, result == 0)
            .with(StatusFlags::CARRY, carry)
            .with(StatusFlags::OVERFLOW, overflow);
        OutputRegisters { result, flags }
    }
}

impl Dut for Alu8 {
    fn name(&self) -> &str {
        "alu8"
    }

    fn ports(&self) -> PortWidths {
        PortWidths {
            operand: 8,
            opcode: 3,
            result: 8,
            flags: StatusFlags::ZERO | StatusFlags::CARRY | StatusFlags::OVERFLOW,
        }
    }

    fn poke(&mut self, inputs: InputRegisters) {
        self.inputs = inputs;
    }

    fn eval(&mut self) -> Propagation {
        latch(&mut self.outputs, Self::compute(self.inputs))
    }

    fn peek(&self) -> OutputRegisters {
        self.outputs
    }
}
