//! Vector tables for the 8-bit integer ALU.

use crate::common::StatusFlags;
use crate::ops::Alu8Op;
use crate::vector::{Vector, VectorTable};

/// Every flag the 8-bit ALU drives.
const ALU_FLAGS: StatusFlags = StatusFlags::ZERO.union(StatusFlags::CARRY).union(StatusFlags::OVERFLOW);

/// Vector with a precomputed result and an optional zero-flag check.
fn zv(op: Alu8Op, a: u32, b: u32, expected: u32, zero: Option<bool>, label: &str) -> Vector<Alu8Op> {
    let v = Vector::new(op, a, b).expect(expected).labeled(label);
    match zero {
        Some(z) => v.expect_flags(StatusFlags::ZERO, StatusFlags::NONE.with(StatusFlags::ZERO, z)),
        None => v,
    }
}

/// Regression table: directed cases per operation, then reference-model
/// cases checking every flag.
pub fn regression() -> VectorTable<Alu8Op> {
    use Alu8Op::{Add, And, Not, Or, Shl, Shr, Sub, Xor};

    let vectors = vec![
        // ADD
        zv(Add, 0x00, 0x00, 0x00, Some(true), "0 + 0 = 0"),
        zv(Add, 0x01, 0x01, 0x02, Some(false), "1 + 1 = 2"),
        zv(Add, 0xFF, 0x01, 0x00, Some(true), "255 + 1 wraps to 0"),
        zv(Add, 0x7F, 0x01, 0x80, None, "127 + 1 = 128"),
        // SUB
        zv(Sub, 0x05, 0x03, 0x02, Some(false), "5 - 3 = 2"),
        zv(Sub, 0x03, 0x03, 0x00, Some(true), "3 - 3 = 0"),
        zv(Sub, 0x00, 0x01, 0xFF, Some(false), "0 - 1 wraps to 255"),
        // AND
        zv(And, 0xAA, 0x55, 0x00, Some(true), "alternating AND is empty"),
        zv(And, 0xFF, 0x0F, 0x0F, Some(false), "mask low nibble"),
        // OR
        zv(Or, 0xAA, 0x55, 0xFF, Some(false), "alternating OR is full"),
        zv(Or, 0x00, 0x00, 0x00, Some(true), "0 | 0 = 0"),
        // XOR
        zv(Xor, 0xFF, 0xFF, 0x00, Some(true), "x ^ x = 0"),
        zv(Xor, 0xAA, 0x55, 0xFF, Some(false), "alternating XOR is full"),
        // NOT
        zv(Not, 0xAA, 0x00, 0x55, Some(false), "~0xAA = 0x55"),
        zv(Not, 0xFF, 0x00, 0x00, Some(true), "~0xFF = 0"),
        // SHL / SHR
        zv(Shl, 0x01, 0x04, 0x10, Some(false), "1 << 4 = 16"),
        zv(Shr, 0x80, 0x04, 0x08, Some(false), "128 >> 4 = 8"),
        zv(Shl, 0x01, 0x00, 0x01, Some(false), "1 << 0 = 1"),
        // Reference-model cases, all flags from the oracle
        Vector::new(Add, 0x7F, 0x01).check(ALU_FLAGS).labeled("signed overflow"),
        Vector::new(Sub, 0x80, 0x01).check(ALU_FLAGS).labeled("signed underflow"),
        Vector::new(Xor, 0xFF, 0x0F).check(ALU_FLAGS).labeled("invert low nibble"),
        Vector::new(Not, 0xAA, 0x00).check(ALU_FLAGS).labeled("complement"),
    ];
    VectorTable::new("alu8-regression", vectors)
}

/// Coverage demo: ADD and SUB over small nominal operands and two AND
/// patterns. OR, XOR, NOT and the shifts are never exercised.
pub fn coverage_demo() -> VectorTable<Alu8Op> {
    let adds = (0..10).map(|i| Vector::new(Alu8Op::Add, i, i + 1));
    let subs = (0..5).map(|i| Vector::new(Alu8Op::Sub, 10, i));
    let ands = [(0xFF, 0x0F), (0xAA, 0x55)]
        .into_iter()
        .map(|(a, b)| Vector::new(Alu8Op::And, a, b));
    VectorTable::new("alu8-coverage-demo", adds.chain(subs).chain(ands).collect())
}
