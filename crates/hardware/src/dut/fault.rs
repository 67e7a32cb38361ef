//! Fault injection.
//!
//! [`FaultyDut`] wraps any DUT and perturbs it with one [`Fault`]:
//! - `stuck-at:<bit>:<0|1>` forces one bit of the result register.
//! - `no-settle` makes the outputs oscillate so settling never converges.

use std::fmt;
use std::str::FromStr;

use crate::common::ConfigError;

use super::{Dut, InputRegisters, OutputRegisters, PortWidths, Propagation};

/// An injected defect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Result bit `bit` reads as `value` regardless of the computed result.
    StuckAt {
        /// Bit index in the result register.
        bit: u8,
        /// Forced level.
        value: bool,
    },
    /// The outputs toggle on every evaluation pass.
    NoSettle,
}

impl FromStr for Fault {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::Fault(s.to_string());
        let spec = s.trim().to_ascii_lowercase();
        if spec == "no-settle" {
            return Ok(Self::NoSettle);
        }
        let mut parts = spec.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some("stuck-at"), Some(bit), Some(level), None) => {
                let bit: u8 = bit.parse().map_err(|_| invalid())?;
                if bit >= 32 {
                    return Err(invalid());
                }
                let value = match level {
                    "0" => false,
                    "1" => true,
                    _ => return Err(invalid()),
                };
                Ok(Self::StuckAt { bit, value })
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StuckAt { bit, value } => write!(f, "stuck-at:{bit}:{}", u8::from(*value)),
            Self::NoSettle => f.write_str("no-settle"),
        }
    }
}

/// A DUT with an injected fault.
#[derive(Debug)]
pub struct FaultyDut<D> {
    inner: D,
    fault: Fault,
    phase: bool,
}

impl<D: Dut> FaultyDut<D> {
    /// Wraps `inner` with `fault`.
    pub const fn new(inner: D, fault: Fault) -> Self {
        Self {
            inner,
            fault,
            phase: false,
        }
    }

    /// The injected fault.
    pub const fn fault(&self) -> Fault {
        self.fault
    }
}

impl<D: Dut> Dut for FaultyDut<D> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn ports(&self) -> PortWidths {
        self.inner.ports()
    }

    fn poke(&mut self, inputs: InputRegisters) {
        self.inner.poke(inputs);
    }

    fn eval(&mut self) -> Propagation {
        match self.fault {
            Fault::StuckAt { .. } => self.inner.eval(),
            Fault::NoSettle => {
                let _ = self.inner.eval();
                self.phase = !self.phase;
                Propagation::Changed
            }
        }
    }

    fn peek(&self) -> OutputRegisters {
        let mut out = self.inner.peek();
        match self.fault {
            Fault::StuckAt { bit, value } => {
                let mask = 1u32 << bit;
                out.result = if value { out.result | mask } else { out.result & !mask };
            }
            Fault::NoSettle => out.result ^= u32::from(self.phase),
        }
        out
    }
}
