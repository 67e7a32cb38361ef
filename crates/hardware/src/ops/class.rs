//! Input classes for functional coverage.
//!
//! An input class names an interesting region of an operation's input space
//! ("carry-producing add", "NaN operand", ...). Classes are derived per
//! operation by [`Operation::classify`](super::Operation::classify); the
//! coverage ledger only stores them.

use std::fmt;

use serde::Serialize;

use crate::common::bits_f32;

/// Coverage input class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputClass {
    /// Ordinary operands with no special property.
    Nominal,
    /// Operands are zero.
    Zero,
    /// Operands are all ones.
    AllOnes,
    /// Operands are the alternating 0xAA../0x55.. patterns.
    Alternating,
    /// The operation produces a zero result.
    ZeroResult,
    /// The operation carries (or borrows, or shifts a set bit) out of the register.
    Carry,
    /// The operation overflows in the signed domain.
    Overflow,
    /// Shift amount is zero.
    ZeroShift,
    /// Shift amount is the largest encodable one.
    MaxShift,
    /// A floating operand is negative.
    Negative,
    /// A floating operand is subnormal.
    Subnormal,
    /// A floating operand is infinite.
    Infinite,
    /// A floating operand is NaN.
    Nan,
}

impl InputClass {
    /// Returns the snake-case name used in reports and coverage files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nominal => "nominal",
            Self::Zero => "zero",
            Self::AllOnes => "all_ones",
            Self::Alternating => "alternating",
            Self::ZeroResult => "zero_result",
            Self::Carry => "carry",
            Self::Overflow => "overflow",
            Self::ZeroShift => "zero_shift",
            Self::MaxShift => "max_shift",
            Self::Negative => "negative",
            Self::Subnormal => "subnormal",
            Self::Infinite => "infinite",
            Self::Nan => "nan",
        }
    }

    /// Classifies a single IEEE-754 operand.
    pub fn of_float(bits: u32) -> Self {
        let x = bits_f32(bits);
        if x.is_nan() {
            Self::Nan
        } else if x.is_infinite() {
            Self::Infinite
        } else if x.is_subnormal() {
            Self::Subnormal
        } else if x == 0.0 {
            Self::Zero
        } else if x.is_sign_negative() {
            Self::Negative
        } else {
            Self::Nominal
        }
    }

    /// Classifies an IEEE-754 operand pair by its most exceptional member.
    pub fn of_float_pair(a: u32, b: u32) -> Self {
        let (ca, cb) = (Self::of_float(a), Self::of_float(b));
        if float_rank(ca) >= float_rank(cb) { ca } else { cb }
    }

    /// Classifies a bitwise operand pair, `mask` being the register-width mask.
    ///
    /// Returns `None` when the pair is not one of the modeled patterns.
    pub fn of_pattern_pair(a: u32, b: u32, mask: u32) -> Option<Self> {
        let alternating = [0xAAAA_AAAA & mask, 0x5555_5555 & mask];
        if a == 0 && b == 0 {
            Some(Self::Zero)
        } else if a == mask && b == mask {
            Some(Self::AllOnes)
        } else if alternating.contains(&a) && alternating.contains(&b) {
            Some(Self::Alternating)
        } else {
            None
        }
    }
}

/// Severity order used to pick the representative class of an operand pair.
const fn float_rank(class: InputClass) -> u8 {
    match class {
        InputClass::Nan => 5,
        InputClass::Infinite => 4,
        InputClass::Subnormal => 3,
        InputClass::Zero => 2,
        InputClass::Negative => 1,
        _ => 0,
    }
}

impl fmt::Display for InputClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
