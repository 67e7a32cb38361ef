//! In-memory coverage sink.
//!
//! Clones share one ledger, so the caller can keep a handle for inspection
//! while the run controller owns another.

use std::cell::RefCell;
use std::rc::Rc;

use crate::common::SinkError;
use crate::ops::InputClass;

use super::{CoverBin, CoverageLedger, CoverageSink, CoverageSummary};

#[derive(Debug, Default)]
struct Shared {
    ledger: CoverageLedger,
    flushes: u32,
    snapshot: Option<CoverageSummary>,
}

/// Coverage sink keeping the ledger in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryCoverage {
    shared: Rc<RefCell<Shared>>,
}

impl MemoryCoverage {
    const KIND: &'static str = "memory coverage";

    /// Creates an empty coverage sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the ledger as marked so far.
    pub fn ledger(&self) -> CoverageLedger {
        self.shared.borrow().ledger.clone()
    }

    /// Number of successful flushes.
    pub fn flush_count(&self) -> u32 {
        self.shared.borrow().flushes
    }

    /// Snapshot taken at flush, if flushed.
    pub fn flushed(&self) -> Option<CoverageSummary> {
        self.shared.borrow().snapshot.clone()
    }
}

impl CoverageSink for MemoryCoverage {
    fn declare(&mut self, bins: &[CoverBin]) {
        self.shared.borrow_mut().ledger.declare(bins);
    }

    fn mark(&mut self, op: &'static str, class: Option<InputClass>) -> Result<(), SinkError> {
        let mut shared = self.shared.borrow_mut();
        if shared.flushes > 0 {
            return Err(SinkError::Closed { sink: Self::KIND });
        }
        shared.ledger.mark(op, class);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        let mut shared = self.shared.borrow_mut();
        if shared.flushes > 0 {
            return Err(SinkError::Closed { sink: Self::KIND });
        }
        shared.flushes += 1;
        shared.snapshot = Some(shared.ledger.summary());
        Ok(())
    }

    fn summary(&self) -> CoverageSummary {
        self.shared.borrow().ledger.summary()
    }
}
