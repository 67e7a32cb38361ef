//! Built-in vector tables.
//!
//! Each operation set ships two tables:
//! 1. **Default:** The regression table exercising every operation, with
//!    precomputed expectations where the result is easy to state by hand.
//! 2. **Coverage demo:** A deliberately narrow table that leaves coverage
//!    holes, for exercising the coverage report.

/// 8-bit integer ALU tables.
pub mod alu8;

/// 32-bit floating-point ALU tables.
pub mod fp32;

use std::fmt;
use std::str::FromStr;

use crate::common::ConfigError;
use crate::ops::{Alu8Op, Fp32Op, Operation};
use crate::vector::VectorTable;

/// Selector for a built-in table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuiltinTable {
    /// Regression table.
    #[default]
    Default,
    /// Narrow table with coverage holes.
    CoverageDemo,
}

impl BuiltinTable {
    /// Every selector, in display order.
    pub const ALL: [Self; 2] = [Self::Default, Self::CoverageDemo];

    /// Command-line name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::CoverageDemo => "coverage-demo",
        }
    }
}

impl FromStr for BuiltinTable {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownTable(s.to_string()))
    }
}

impl fmt::Display for BuiltinTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operation sets with built-in tables.
pub trait Builtin: Operation {
    /// Builds the selected table.
    fn builtin(which: BuiltinTable) -> VectorTable<Self>;
}

impl Builtin for Alu8Op {
    fn builtin(which: BuiltinTable) -> VectorTable<Self> {
        match which {
            BuiltinTable::Default => alu8::regression(),
            BuiltinTable::CoverageDemo => alu8::coverage_demo(),
        }
    }
}

impl Builtin for Fp32Op {
    fn builtin(which: BuiltinTable) -> VectorTable<Self> {
        match which {
            BuiltinTable::Default => fp32::regression(),
            BuiltinTable::CoverageDemo => fp32::coverage_demo(),
        }
    }
}
