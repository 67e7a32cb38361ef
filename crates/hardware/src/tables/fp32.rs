//! Vector tables for the 32-bit floating-point ALU.
//!
//! Bitwise and shift vectors carry their hand-computed results. Floating
//! ADD and SUB rely on the oracle and also check the floating flags; MUL,
//! DIV, FP2INT and COMPLEMENT are unchecked and only report what the DUT
//! produced. Shift vectors leave `b` at zero: the shifts are by one.

use crate::common::{StatusFlags, f32_bits};
use crate::ops::Fp32Op;
use crate::vector::{Vector, VectorTable};

/// Every flag the floating-point ALU drives.
const FP_FLAGS: StatusFlags = StatusFlags::OVERFLOW
    .union(StatusFlags::UNDERFLOW)
    .union(StatusFlags::EXCEPTION);

/// Floating operands, optionally flag-checked.
fn fv(op: Fp32Op, a: f32, b: f32, label: &str) -> Vector<Fp32Op> {
    let v = Vector::new(op, f32_bits(a), f32_bits(b)).labeled(label);
    match op {
        Fp32Op::Add | Fp32Op::Sub => v.check(FP_FLAGS),
        _ => v,
    }
}

/// Raw-bit operands with a hand-computed result.
fn bv(op: Fp32Op, a: u32, b: u32, expected: u32, label: &str) -> Vector<Fp32Op> {
    Vector::new(op, a, b).expect(expected).labeled(label)
}

/// Regression table covering every opcode.
pub fn regression() -> VectorTable<Fp32Op> {
    use Fp32Op::{Add, And, Complement, Div, Fp2Int, Mul, Or, Shl, Shr, Sub, Xor};

    let vectors = vec![
        fv(Add, 1.0, 2.0, "1.0 + 2.0"),
        fv(Add, 3.5, 2.5, "3.5 + 2.5"),
        fv(Add, 100.0, 0.5, "100.0 + 0.5"),
        fv(Add, -5.0, 3.0, "-5.0 + 3.0"),
        fv(Add, 0.0, 0.0, "0.0 + 0.0"),
        fv(Sub, 5.0, 3.0, "5.0 - 3.0"),
        fv(Sub, 10.0, 10.0, "10.0 - 10.0"),
        fv(Sub, 100.0, 50.0, "100.0 - 50.0"),
        fv(Mul, 2.0, 3.0, "2.0 * 3.0"),
        fv(Mul, 4.0, 0.5, "4.0 * 0.5"),
        fv(Mul, -2.0, 3.0, "-2.0 * 3.0"),
        fv(Mul, 1.5, 2.0, "1.5 * 2.0"),
        fv(Div, 6.0, 2.0, "6.0 / 2.0"),
        fv(Div, 10.0, 4.0, "10.0 / 4.0"),
        fv(Div, 1.0, 2.0, "1.0 / 2.0"),
        bv(Or, 0xFFFF_0000, 0x0000_FFFF, 0xFFFF_FFFF, "0xFFFF0000 | 0x0000FFFF"),
        bv(Or, 0xAAAA_AAAA, 0x5555_5555, 0xFFFF_FFFF, "0xAAAAAAAA | 0x55555555"),
        bv(Or, 0x0000_0000, 0xFFFF_FFFF, 0xFFFF_FFFF, "0x00000000 | 0xFFFFFFFF"),
        bv(And, 0xFFFF_0000, 0xFF00_FF00, 0xFF00_0000, "0xFFFF0000 & 0xFF00FF00"),
        bv(And, 0xAAAA_AAAA, 0x5555_5555, 0x0000_0000, "0xAAAAAAAA & 0x55555555"),
        bv(And, 0xFFFF_FFFF, 0x0F0F_0F0F, 0x0F0F_0F0F, "0xFFFFFFFF & 0x0F0F0F0F"),
        bv(Xor, 0xFFFF_FFFF, 0xFFFF_FFFF, 0x0000_0000, "0xFFFFFFFF ^ 0xFFFFFFFF"),
        bv(Xor, 0xAAAA_AAAA, 0x5555_5555, 0xFFFF_FFFF, "0xAAAAAAAA ^ 0x55555555"),
        bv(Xor, 0x1234_5678, 0x0000_0000, 0x1234_5678, "0x12345678 ^ 0x00000000"),
        bv(Shl, 0x0000_0001, 0, 0x0000_0002, "0x00000001 << 1"),
        bv(Shl, 0x8000_0000, 0, 0x0000_0000, "0x80000000 << 1"),
        bv(Shl, 0x1234_5678, 0, 0x2468_ACF0, "0x12345678 << 1"),
        bv(Shr, 0x8000_0000, 0, 0x4000_0000, "0x80000000 >> 1"),
        bv(Shr, 0x0000_0002, 0, 0x0000_0001, "0x00000002 >> 1"),
        bv(Shr, 0x1234_5678, 0, 0x091A_2B3C, "0x12345678 >> 1"),
        fv(Fp2Int, 5.0, 0.0, "FP2INT(5.0)"),
        fv(Fp2Int, 10.5, 0.0, "FP2INT(10.5)"),
        fv(Fp2Int, 100.0, 0.0, "FP2INT(100.0)"),
        Vector::new(Complement, 0x0000_0000, 0).labeled("~0x00000000"),
        Vector::new(Complement, 0xFFFF_FFFF, 0).labeled("~0xFFFFFFFF"),
        Vector::new(Complement, 0xAAAA_AAAA, 0).labeled("~0xAAAAAAAA"),
    ];
    VectorTable::new("fp32-regression", vectors)
}

/// Coverage demo: nominal additions and two bitwise patterns. Special
/// floating operands (NaN, infinities, subnormals) are never exercised.
pub fn coverage_demo() -> VectorTable<Fp32Op> {
    let adds = (1..=5u8).map(|i| {
        let x = f32::from(i);
        Vector::new(Fp32Op::Add, f32_bits(x), f32_bits(x + 0.5))
    });
    let bitwise = [
        Vector::new(Fp32Op::Or, 0xAAAA_AAAA, 0x5555_5555),
        Vector::new(Fp32Op::And, 0xFFFF_FFFF, 0xFFFF_FFFF),
    ];
    VectorTable::new("fp32-coverage-demo", adds.chain(bitwise).collect())
}
