//! Signal trace sinks.
//!
//! A trace records the DUT's visible signals once per vector at strictly
//! increasing timestamps. This module provides:
//! 1. **TraceSink trait:** `open` / `record` / `close` over an output resource.
//! 2. **VCD sink:** [`VcdTraceSink`], a Value Change Dump file writer.
//! 3. **Memory sink:** [`MemoryTrace`], a shared in-memory buffer.
//!
//! Every sink enforces the same lifecycle: `record` and `close` before
//! `open` fail with [`SinkError::NotOpen`], anything after `close` fails with
//! [`SinkError::Closed`], and a timestamp that does not advance fails with
//! [`SinkError::NonMonotonic`].

/// In-memory trace sink.
pub mod memory;

/// Value Change Dump writer and file sink.
pub mod vcd;

pub use memory::{MemoryTrace, TraceRecord};
pub use vcd::{VcdTraceSink, VcdWriter};

use crate::common::SinkError;
use crate::dut::{PortWidths, SignalSnapshot};

/// Static description of a trace, supplied when the sink is opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceHeader {
    /// Scope name (the DUT's model name).
    pub scope: String,
    /// Ports of the traced DUT.
    pub ports: PortWidths,
    /// Time advance per vector.
    pub time_step: u64,
}

/// Consumer of time-stamped signal snapshots.
pub trait TraceSink {
    /// Acquires the output resource and writes the header.
    ///
    /// # Errors
    ///
    /// [`SinkError::Io`] if the resource cannot be acquired.
    fn open(&mut self, header: &TraceHeader) -> Result<(), SinkError>;

    /// Appends one observation.
    ///
    /// # Errors
    ///
    /// Lifecycle and monotonicity violations, or I/O failures.
    fn record(&mut self, time: u64, snapshot: &SignalSnapshot) -> Result<(), SinkError>;

    /// Flushes and releases the output resource.
    ///
    /// # Errors
    ///
    /// Lifecycle violations or I/O failures while flushing.
    fn close(&mut self) -> Result<(), SinkError>;
}

/// Lifecycle of a sink resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    #[default]
    Pending,
    Open,
    Closed,
}

impl Lifecycle {
    /// Fails unless the sink is open.
    pub(crate) const fn ensure_open(self, sink: &'static str) -> Result<(), SinkError> {
        match self {
            Self::Open => Ok(()),
            Self::Pending => Err(SinkError::NotOpen { sink }),
            Self::Closed => Err(SinkError::Closed { sink }),
        }
    }

    /// Fails if the sink was already opened or closed.
    pub(crate) const fn ensure_pending(self, sink: &'static str) -> Result<(), SinkError> {
        match self {
            Self::Pending => Ok(()),
            Self::Open | Self::Closed => Err(SinkError::Closed { sink }),
        }
    }
}

/// Tracks the last accepted timestamp.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Timeline {
    last: Option<u64>,
}

impl Timeline {
    /// Accepts `time` if it is later than every earlier timestamp.
    pub(crate) fn advance(&mut self, time: u64) -> Result<(), SinkError> {
        match self.last {
            Some(last) if time <= last => Err(SinkError::NonMonotonic { time, last }),
            _ => {
                self.last = Some(time);
                Ok(())
            }
        }
    }
}
