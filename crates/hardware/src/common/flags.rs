//! DUT status flags.
//!
//! The DUT register interface exposes a handful of one-bit status outputs
//! next to the primary result:
//!
//! | Bit | Flag      | Short | Typical source                         |
//! |-----|-----------|-------|----------------------------------------|
//! |  0  | ZERO      | Z     | Result is all zeros                    |
//! |  1  | CARRY     | C     | Unsigned carry/borrow out              |
//! |  2  | OVERFLOW  | V     | Signed or floating overflow            |
//! |  3  | UNDERFLOW | U     | Floating underflow (subnormal result)  |
//! |  4  | EXCEPTION | E     | Invalid operation / unknown opcode     |
//!
//! The same type doubles as a mask selecting which flags a vector checks.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// Set of DUT status flags, or a mask over them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusFlags(u8);

impl StatusFlags {
    /// No flags.
    pub const NONE: Self = Self(0);
    /// Result is zero.
    pub const ZERO: Self = Self(1 << 0);
    /// Carry (or borrow) out of the most significant bit.
    pub const CARRY: Self = Self(1 << 1);
    /// Signed or floating-point overflow.
    pub const OVERFLOW: Self = Self(1 << 2);
    /// Floating-point underflow.
    pub const UNDERFLOW: Self = Self(1 << 3);
    /// Invalid operation.
    pub const EXCEPTION: Self = Self(1 << 4);
    /// Every defined flag.
    pub const ALL: Self = Self(0b1_1111);

    /// Flag table in bit order: flag, long name, short name.
    pub const NAMES: [(Self, &'static str, &'static str); 5] = [
        (Self::ZERO, "zero", "Z"),
        (Self::CARRY, "carry", "C"),
        (Self::OVERFLOW, "overflow", "V"),
        (Self::UNDERFLOW, "underflow", "U"),
        (Self::EXCEPTION, "exception", "E"),
    ];

    /// Builds a flag set from raw bits, dropping undefined bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Returns the raw bit value.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if no flags are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns the union of two sets; usable in constants.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `self` with `flag` forced to `on`.
    #[must_use]
    pub const fn with(self, flag: Self, on: bool) -> Self {
        if on {
            Self(self.0 | flag.0)
        } else {
            Self(self.0 & !flag.0)
        }
    }

    /// Looks up a single flag by its long name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(_, long, _)| long.eq_ignore_ascii_case(name))
            .map(|(flag, _, _)| *flag)
    }

    /// Iterates over the single flags contained in this set, in bit order.
    pub fn iter(self) -> impl Iterator<Item = Self> {
        Self::NAMES
            .into_iter()
            .map(|(flag, _, _)| flag)
            .filter(move |flag| self.contains(*flag))
    }

    /// Renders the flags selected by `visible` as `Z=1 C=0 ...`.
    pub fn render(self, visible: Self) -> String {
        Self::NAMES
            .iter()
            .filter(|(flag, _, _)| visible.contains(*flag))
            .map(|(flag, _, short)| format!("{short}={}", u8::from(self.contains(*flag))))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl BitOr for StatusFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for StatusFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitXor for StatusFlags {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl Not for StatusFlags {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }
}

impl fmt::Display for StatusFlags {
    /// Formats as `zero|carry`, or `-` when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _, _)| self.contains(*flag))
            .map(|(_, long, _)| *long)
            .collect();
        f.write_str(&names.join("|"))
    }
}
