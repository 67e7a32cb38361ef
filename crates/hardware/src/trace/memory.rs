//! In-memory trace sink.
//!
//! Clones of a [`MemoryTrace`] share one buffer, so a caller can hand one
//! clone to the run controller and inspect the records through another
//! after the run.

use std::cell::RefCell;
use std::rc::Rc;

use crate::common::SinkError;
use crate::dut::SignalSnapshot;

use super::{Lifecycle, Timeline, TraceHeader, TraceSink};

/// One recorded observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// Timestamp.
    pub time: u64,
    /// Signal values at `time`.
    pub snapshot: SignalSnapshot,
}

#[derive(Debug, Default)]
struct Shared {
    header: Option<TraceHeader>,
    records: Vec<TraceRecord>,
    lifecycle: Lifecycle,
    timeline: Timeline,
    closes: u32,
}

/// Trace sink keeping records in a shared buffer.
#[derive(Clone, Debug, Default)]
pub struct MemoryTrace {
    shared: Rc<RefCell<Shared>>,
}

impl MemoryTrace {
    const KIND: &'static str = "memory";

    /// Creates an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Header received at open, if opened.
    pub fn header(&self) -> Option<TraceHeader> {
        self.shared.borrow().header.clone()
    }

    /// Recorded observations in time order.
    pub fn records(&self) -> Vec<TraceRecord> {
        self.shared.borrow().records.clone()
    }

    /// Returns true once the sink has been closed.
    pub fn is_closed(&self) -> bool {
        self.shared.borrow().lifecycle == Lifecycle::Closed
    }

    /// Number of successful `close` calls.
    pub fn close_count(&self) -> u32 {
        self.shared.borrow().closes
    }
}

impl TraceSink for MemoryTrace {
    fn open(&mut self, header: &TraceHeader) -> Result<(), SinkError> {
        let mut shared = self.shared.borrow_mut();
        shared.lifecycle.ensure_pending(Self::KIND)?;
        shared.header = Some(header.clone());
        shared.lifecycle = Lifecycle::Open;
        Ok(())
    }

    fn record(&mut self, time: u64, snapshot: &SignalSnapshot) -> Result<(), SinkError> {
        let mut shared = self.shared.borrow_mut();
        shared.lifecycle.ensure_open(Self::KIND)?;
        shared.timeline.advance(time)?;
        shared.records.push(TraceRecord {
            time,
            snapshot: *snapshot,
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        let mut shared = self.shared.borrow_mut();
        shared.lifecycle.ensure_open(Self::KIND)?;
        shared.lifecycle = Lifecycle::Closed;
        shared.closes += 1;
        Ok(())
    }
}
