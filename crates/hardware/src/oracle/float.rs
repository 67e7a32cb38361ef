//! 32-bit IEEE-754 ALU reference functions.
//!
//! Arithmetic operates on the IEEE-754 reinterpretation of the operand bits
//! using the host's round-to-nearest-even `f32`; bitwise operations operate
//! on the raw patterns. Status flags are derived from the result:
//! 1. **Overflow:** Infinite result from finite operands.
//! 2. **Underflow:** Subnormal non-zero result.
//! 3. **Exception:** NaN result, division by zero, or an unrepresentable
//!    float-to-integer conversion.
//!
//! NaN results are canonicalized so that payload differences between the
//! host FPU and the DUT never cause a mismatch.

use crate::common::{StatusFlags, bits_f32, f32_bits};

use super::Expectation;

/// Register width of the floating-point ALU.
pub const WIDTH: u8 = 32;

/// Canonical quiet NaN for single precision (positive, zero payload).
pub const CANONICAL_NAN: u32 = 0x7FC0_0000;

/// Replaces any NaN pattern by [`CANONICAL_NAN`].
#[inline]
pub fn canonicalize(bits: u32) -> u32 {
    if bits_f32(bits).is_nan() { CANONICAL_NAN } else { bits }
}

/// Derives the status flags of an arithmetic result.
fn ieee_flags(x: f32, y: f32, r: f32) -> StatusFlags {
    StatusFlags::NONE
        .with(StatusFlags::OVERFLOW, r.is_infinite() && x.is_finite() && y.is_finite())
        .with(StatusFlags::UNDERFLOW, r.is_subnormal())
        .with(StatusFlags::EXCEPTION, r.is_nan())
}

/// Applies a binary `f32` function to two bit patterns.
fn arith(a: u32, b: u32, f: impl Fn(f32, f32) -> f32) -> Expectation {
    let (x, y) = (bits_f32(a), bits_f32(b));
    let r = f(x, y);
    Expectation::new(canonicalize(f32_bits(r)), ieee_flags(x, y, r))
}

/// Bitwise result: no floating flags.
const fn raw(result: u32) -> Expectation {
    Expectation::new(result, StatusFlags::NONE)
}

/// `a + b`.
pub fn add(a: u32, b: u32) -> Expectation {
    arith(a, b, |x, y| x + y)
}

/// `a - b`.
pub fn sub(a: u32, b: u32) -> Expectation {
    arith(a, b, |x, y| x - y)
}

/// `a * b`.
pub fn mul(a: u32, b: u32) -> Expectation {
    arith(a, b, |x, y| x * y)
}

/// `a / b`; a zero divisor raises the exception flag instead of overflow.
pub fn div(a: u32, b: u32) -> Expectation {
    let mut e = arith(a, b, |x, y| x / y);
    if bits_f32(b) == 0.0 {
        e.flags = e.flags.map(|f| {
            f.with(StatusFlags::OVERFLOW, false)
                .with(StatusFlags::EXCEPTION, true)
        });
    }
    e
}

/// Converts `a` to a signed 32-bit integer, truncating toward zero.
///
/// NaN converts to zero and out-of-range values saturate; both raise the
/// exception flag.
pub fn fp2int(a: u32, _b: u32) -> Expectation {
    let x = bits_f32(a);
    let t = x.trunc();
    let representable = !x.is_nan() && t >= i32::MIN as f32 && t < -(i32::MIN as f32);
    let flags = StatusFlags::NONE.with(StatusFlags::EXCEPTION, !representable);
    // `as` saturates and maps NaN to zero.
    Expectation::new(x as i32 as u32, flags)
}

/// Bitwise OR of the raw patterns.
pub const fn or(a: u32, b: u32) -> Expectation {
    raw(a | b)
}

/// Bitwise AND of the raw patterns.
pub const fn and(a: u32, b: u32) -> Expectation {
    raw(a & b)
}

/// Bitwise XOR of the raw patterns.
pub const fn xor(a: u32, b: u32) -> Expectation {
    raw(a ^ b)
}

/// Logical left shift of `a` by one; `b` is ignored.
pub const fn shl1(a: u32, _b: u32) -> Expectation {
    raw(a << 1)
}

/// Logical right shift of `a` by one; `b` is ignored.
pub const fn shr1(a: u32, _b: u32) -> Expectation {
    raw(a >> 1)
}
