//! 8-bit integer ALU reference functions.
//!
//! Each function masks its operands to the register width, computes the
//! wrapped result and derives the status flags the hardware exposes:
//! 1. **Zero:** Result is all zeros (every operation).
//! 2. **Carry:** Unsigned carry out of ADD, borrow out of SUB.
//! 3. **Overflow:** Signed overflow of ADD and SUB.
//!
//! Logic operations and shifts never raise carry or overflow. Shift amounts
//! use the low three bits of `b`.

use crate::common::bits::{msb, width_mask};
use crate::common::StatusFlags;

use super::Expectation;

/// Register width of the integer ALU.
pub const WIDTH: u8 = 8;

/// Register mask of the integer ALU.
const MASK: u32 = width_mask(WIDTH);

/// Shift amount mask (`b[2:0]`).
const SHAMT_MASK: u32 = 0b111;

/// Packs a result with its zero, carry and overflow flags.
fn outcome(result: u32, carry: bool, overflow: bool) -> Expectation {
    let flags = StatusFlags::NONE
        .with(StatusFlags::ZERO, result == 0)
        .with(StatusFlags::CARRY, carry)
        .with(StatusFlags::OVERFLOW, overflow);
    Expectation::new(result, flags)
}

/// Wrapping addition with carry-out and signed overflow.
pub fn add(a: u32, b: u32) -> Expectation {
    let (a, b) = (a & MASK, b & MASK);
    let full = a + b;
    let result = full & MASK;
    let overflow = msb(a, WIDTH) == msb(b, WIDTH) && msb(result, WIDTH) != msb(a, WIDTH);
    outcome(result, full > MASK, overflow)
}

/// Wrapping subtraction with borrow-out and signed overflow.
pub fn sub(a: u32, b: u32) -> Expectation {
    let (a, b) = (a & MASK, b & MASK);
    let result = a.wrapping_sub(b) & MASK;
    let overflow = msb(a, WIDTH) != msb(b, WIDTH) && msb(result, WIDTH) != msb(a, WIDTH);
    outcome(result, a < b, overflow)
}

/// Bitwise AND.
pub fn and(a: u32, b: u32) -> Expectation {
    outcome(a & b & MASK, false, false)
}

/// Bitwise OR.
pub fn or(a: u32, b: u32) -> Expectation {
    outcome((a | b) & MASK, false, false)
}

/// Bitwise XOR.
pub fn xor(a: u32, b: u32) -> Expectation {
    outcome((a ^ b) & MASK, false, false)
}

/// Bitwise NOT of `a`; `b` is ignored.
pub fn not(a: u32, _b: u32) -> Expectation {
    outcome(!a & MASK, false, false)
}

/// Logical left shift by `b[2:0]`.
pub fn shl(a: u32, b: u32) -> Expectation {
    outcome(((a & MASK) << (b & SHAMT_MASK)) & MASK, false, false)
}

/// Logical right shift by `b[2:0]`.
pub fn shr(a: u32, b: u32) -> Expectation {
    outcome((a & MASK) >> (b & SHAMT_MASK), false, false)
}
