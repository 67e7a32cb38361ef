//! Apply/settle/read protocol over a DUT.
//!
//! The adapter owns the DUT for its whole lifetime and enforces the
//! per-vector sequence:
//! 1. **Apply:** Operands are masked to the operand ports and the operation's
//!    opcode is driven onto the opcode register.
//! 2. **Settle:** `eval` is repeated until the DUT reports a fixed point,
//!    bounded by the settle limit.
//! 3. **Read:** Outputs are sampled, masked to the driven ports. A read
//!    without a settle since the last apply yields `None`.

use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::common::{SettleError, width_mask};
use crate::ops::Operation;

use super::{Dut, InputRegisters, OutputRegisters, PortWidths, Propagation, SignalSnapshot};

/// Drives a DUT with operations of the set `O`.
#[derive(Debug)]
pub struct DutAdapter<O> {
    dut: Box<dyn Dut>,
    ports: PortWidths,
    settle_limit: u32,
    applied: InputRegisters,
    settled: bool,
    _ops: PhantomData<O>,
}

impl<O: Operation> DutAdapter<O> {
    /// Takes ownership of `dut`.
    ///
    /// # Arguments
    ///
    /// * `dut` - The device under test.
    /// * `settle_limit` - Maximum evaluation passes per settle (at least one).
    pub fn new(dut: Box<dyn Dut>, settle_limit: u32) -> Self {
        let ports = dut.ports();
        debug!(dut = dut.name(), ?ports, settle_limit, "DUT acquired");
        Self {
            dut,
            ports,
            settle_limit: settle_limit.max(1),
            applied: InputRegisters::default(),
            settled: false,
            _ops: PhantomData,
        }
    }

    /// Model name of the DUT.
    pub fn name(&self) -> &str {
        self.dut.name()
    }

    /// Port widths of the DUT.
    pub const fn ports(&self) -> PortWidths {
        self.ports
    }

    /// Writes operands and opcode into the input registers.
    pub fn apply(&mut self, a: u32, b: u32, op: O) {
        let operand = width_mask(self.ports.operand);
        let inputs = InputRegisters {
            a: a & operand,
            b: b & operand,
            opcode: op.opcode() & width_mask(self.ports.opcode) as u8,
        };
        trace!(op = op.name(), a = inputs.a, b = inputs.b, "apply");
        self.dut.poke(inputs);
        self.applied = inputs;
        self.settled = false;
    }

    /// Evaluates the DUT until its outputs stop changing.
    ///
    /// # Returns
    ///
    /// The number of evaluation passes it took.
    ///
    /// # Errors
    ///
    /// [`SettleError::NonConvergent`] if the outputs still change after
    /// `settle_limit` passes.
    pub fn settle(&mut self) -> Result<u32, SettleError> {
        for pass in 1..=self.settle_limit {
            if self.dut.eval() == Propagation::Stable {
                trace!(passes = pass, "settled");
                self.settled = true;
                return Ok(pass);
            }
        }
        Err(SettleError::NonConvergent {
            dut: self.dut.name().to_string(),
            iterations: self.settle_limit,
        })
    }

    /// Samples the output registers.
    ///
    /// Returns `None` if no settle completed since the last apply.
    pub fn read(&self) -> Option<OutputRegisters> {
        self.settled.then(|| {
            let raw = self.dut.peek();
            OutputRegisters {
                result: raw.result & width_mask(self.ports.result),
                flags: raw.flags & self.ports.flags,
            }
        })
    }

    /// Samples every visible signal: applied inputs and settled outputs.
    pub fn snapshot(&self) -> Option<SignalSnapshot> {
        self.read().map(|outputs| SignalSnapshot {
            inputs: self.applied,
            outputs,
        })
    }
}

impl<O> Drop for DutAdapter<O> {
    fn drop(&mut self) {
        debug!(dut = self.dut.name(), "DUT released");
    }
}
