//! Behavioral model of the 32-bit floating-point ALU.
//!
//! Register interface:
//! - `a[31:0]`, `b[31:0]`, `op[3:0]` inputs.
//! - `result[31:0]`, `overflow`, `underflow`, `exception` outputs.
//!
//! Opcode map: 1 MUL, 2 DIV, 3 SUB, 4 OR, 5 AND, 6 XOR, 7 SHL, 8 SHR,
//! 9 FP2INT, 10 ADD, 11 COMPLEMENT. Any other encoding drives a zero result
//! and raises `exception`.
//!
//! COMPLEMENT is a logical negation (`result = (a == 0)`), not a bitwise one.

use crate::common::{StatusFlags, bits_f32, f32_bits};

use super::{Dut, InputRegisters, OutputRegisters, PortWidths, Propagation, latch};

const QNAN: u32 = 0x7FC0_0000;
const OPCODE_MASK: u8 = 0b1111;

/// 32-bit floating-point ALU.
#[derive(Clone, Debug, Default)]
pub struct FpAlu32 {
    inputs: InputRegisters,
    outputs: OutputRegisters,
}

impl FpAlu32 {
    /// Creates the ALU with all registers cleared.
    pub fn new() -> Self {
        Self::default()
    }

    fn compute(inputs: InputRegisters) -> OutputRegisters {
        let InputRegisters { a, b, opcode } = inputs;
        match opcode & OPCODE_MASK {
            1 => float_op(a, b, |x, y| x * y),
            2 => {
                let mut out = float_op(a, b, |x, y| x / y);
                if bits_f32(b) == 0.0 {
                    out.flags = out
                        .flags
                        .with(StatusFlags::OVERFLOW, false)
                        .with(StatusFlags::EXCEPTION, true);
                }
                out
            }
            3 => float_op(a, b, |x, y| x - y),
            4 => bits(a | b),
            5 => bits(a & b),
            6 => bits(a ^ b),
            7 => bits(a << 1),
            8 => bits(a >> 1),
            9 => to_int(a),
            10 => float_op(a, b, |x, y| x + y),
            11 => bits(u32::from(a == 0)),
            _ => OutputRegisters {
                result: 0,
                flags: StatusFlags::EXCEPTION,
            },
        }
    }
}

const fn bits(result: u32) -> OutputRegisters {
    OutputRegisters {
        result,
        flags: StatusFlags::NONE,
    }
}

fn float_op(a: u32, b: u32, f: impl Fn(f32, f32) -> f32) -> OutputRegisters {
    let (x, y) = (bits_f32(a), bits_f32(b));
    let r = f(x, y);
    let flags = StatusFlags::NONE
        .with(StatusFlags::OVERFLOW, r.is_infinite() && x.is_finite() && y.is_finite())
        .with(StatusFlags::UNDERFLOW, r.is_subnormal())
        .with(StatusFlags::EXCEPTION, r.is_nan());
    let result = if r.is_nan() { QNAN } else { f32_bits(r) };
    OutputRegisters { result, flags }
}

fn to_int(a: u32) -> OutputRegisters {
    let x = bits_f32(a);
    let t = x.trunc();
    let in_range = t >= -2_147_483_648.0 && t < 2_147_483_648.0;
    OutputRegisters {
        result: x as i32 as u32,
        flags: StatusFlags::NONE.with(StatusFlags::EXCEPTION, x.is_nan() || !in_range),
    }
}

impl Dut for FpAlu32 {
    fn name(&self) -> &str {
        "fp_alu32"
    }

    fn ports(&self) -> PortWidths {
        PortWidths {
            operand: 32,
            opcode: 4,
            result: 32,
            flags: StatusFlags::OVERFLOW | StatusFlags::UNDERFLOW | StatusFlags::EXCEPTION,
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
