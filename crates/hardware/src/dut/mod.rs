//! Device-under-test boundary.
//!
//! The harness sees a DUT only through a fixed register interface. This module provides:
//! 1. **Dut trait:** `poke` inputs, `eval` one propagation pass, `peek` outputs.
//! 2. **Register types:** Input and output register snapshots, port widths and
//!    the signal list used by traces.
//! 3. **Adapter:** [`DutAdapter`], the apply/settle/read protocol over a DUT.
//! 4. **Reference models:** [`Alu8`] and [`FpAlu32`] behavioral models, and
//!    [`FaultyDut`] for fault injection.

/// Apply/settle/read protocol.
pub mod adapter;

/// 8-bit integer ALU model.
pub mod alu8;

/// Fault injection wrapper.
pub mod fault;

/// 32-bit floating-point ALU model.
pub mod fp_alu32;

pub use adapter::DutAdapter;
pub use alu8::Alu8;
pub use fault::{Fault, FaultyDut};
pub use fp_alu32::FpAlu32;

use std::fmt;

use crate::common::StatusFlags;

/// Values driven onto the DUT's input ports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputRegisters {
    /// Operand `a`.
    pub a: u32,
    /// Operand `b`.
    pub b: u32,
    /// Operation select.
    pub opcode: u8,
}

/// Values sampled from the DUT's output ports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputRegisters {
    /// Result register.
    pub result: u32,
    /// Status outputs.
    pub flags: StatusFlags,
}

/// Outcome of one evaluation pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    /// Outputs did not change; the DUT has reached a fixed point.
    Stable,
    /// Outputs changed and another pass is required.
    Changed,
}

/// Port widths of a DUT.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortWidths {
    /// Width of `a` and `b` in bits.
    pub operand: u8,
    /// Width of the opcode register in bits.
    pub opcode: u8,
    /// Width of the result register in bits.
    pub result: u8,
    /// Status outputs the DUT actually drives.
    pub flags: StatusFlags,
}

/// One traced signal: name and width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signal {
    /// Port name.
    pub name: &'static str,
    /// Width in bits.
    pub width: u8,
}

impl PortWidths {
    /// Lists the visible signals: inputs, result, then each driven flag.
    pub fn signals(&self) -> Vec<Signal> {
        let mut signals = vec![
            Signal { name: "a", width: self.operand },
            Signal { name: "b", width: self.operand },
            Signal { name: "op", width: self.opcode },
            Signal { name: "result", width: self.result },
        ];
        signals.extend(
            StatusFlags::NAMES
                .iter()
                .filter(|(flag, _, _)| self.flags.contains(*flag))
                .map(|&(_, name, _)| Signal { name, width: 1 }),
        );
        signals
    }
}

/// Every visible signal of the DUT at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignalSnapshot {
    /// Input registers as applied.
    pub inputs: InputRegisters,
    /// Output registers after settling.
    pub outputs: OutputRegisters,
}

impl SignalSnapshot {
    /// Returns signal values in the order of [`PortWidths::signals`].
    pub fn values(&self, ports: &PortWidths) -> Vec<u32> {
        let mut values = vec![
            self.inputs.a,
            self.inputs.b,
            u32::from(self.inputs.opcode),
            self.outputs.result,
        ];
        values.extend(
            ports
                .flags
                .iter()
                .map(|flag| u32::from(self.outputs.flags.contains(flag))),
        );
        values
    }
}

/// A combinational device under test.
///
/// Implementations expose a fixed register interface and nothing else. The
/// harness drives them through [`DutAdapter`]; it never inspects internal
/// state.
pub trait Dut: fmt::Debug {
    /// Model name, used as the trace scope.
    fn name(&self) -> &str;

    /// Port widths of the register interface.
    fn ports(&self) -> PortWidths;

    /// Drives the input registers. Outputs are not updated until `eval`.
    fn poke(&mut self, inputs: InputRegisters);

    /// Runs one propagation pass.
    fn eval(&mut self) -> Propagation;

    /// Samples the output registers without changing state.
    fn peek(&self) -> OutputRegisters;
}

impl<D: Dut + ?Sized> Dut for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn ports(&self) -> PortWidths {
        (**self).ports()
    }

    fn poke(&mut self, inputs: InputRegisters) {
        (**self).poke(inputs);
    }

    fn eval(&mut self) -> Propagation {
        (**self).eval()
    }

    fn peek(&self) -> OutputRegisters {
        (**self).peek()
    }
}

/// Latches freshly computed outputs and reports whether they changed.
///
/// Shared by the reference models, which are single-pass combinational
/// functions of their inputs.
pub(crate) fn latch(current: &mut OutputRegisters, next: OutputRegisters) -> Propagation {
    if *current == next {
        Propagation::Stable
    } else {
        *current = next;
        Propagation::Changed
    }
}
