//! Functional coverage.
//!
//! Coverage is tracked as a set of bins, one per operation plus one per
//! (operation, input class) pair the operation set models. This module provides:
//! 1. **Bins and ledger:** [`CoverBin`] and [`CoverageLedger`], the append-only
//!    record of exercised bins against the declared universe.
//! 2. **Summary:** [`CoverageSummary`], covered/total counts and the list of
//!    coverage holes.
//! 3. **CoverageSink trait:** `declare` / `mark` / `flush`, with a JSON file
//!    sink ([`JsonCoverageSink`]) and a shared in-memory sink
//!    ([`MemoryCoverage`]).

/// JSON ledger file sink.
pub mod json;

/// In-memory coverage sink.
pub mod memory;

pub use json::JsonCoverageSink;
pub use memory::MemoryCoverage;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::common::SinkError;
use crate::ops::{InputClass, Operation};

/// A coverage bin: an operation, optionally narrowed to one input class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CoverBin {
    /// Operation display name.
    pub op: &'static str,
    /// Input class, or `None` for the operation-level bin.
    pub class: Option<InputClass>,
}

impl CoverBin {
    /// Operation-level bin.
    pub const fn op(op: &'static str) -> Self {
        Self { op, class: None }
    }

    /// Bin for one input class of an operation.
    pub const fn class(op: &'static str, class: InputClass) -> Self {
        Self {
            op,
            class: Some(class),
        }
    }
}

impl fmt::Display for CoverBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            Some(class) => write!(f, "{}/{class}", self.op),
            None => f.write_str(self.op),
        }
    }
}

/// Returns every bin of the operation set `O`: one per operation, then one
/// per modeled input class.
pub fn universe<O: Operation>() -> Vec<CoverBin> {
    O::ALL
        .iter()
        .flat_map(|&op| {
            std::iter::once(CoverBin::op(op.name()))
                .chain(op.coverage_bins().iter().map(move |&class| CoverBin::class(op.name(), class)))
        })
        .collect()
}

/// Exercised bins against the declared universe.
///
/// Append-only: bins are never un-marked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageLedger {
    declared: BTreeSet<CoverBin>,
    hits: BTreeMap<CoverBin, u64>,
}

impl CoverageLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds bins to the declared universe.
    pub fn declare(&mut self, bins: &[CoverBin]) {
        self.declared.extend(bins.iter().copied());
    }

    /// Records one hit of the operation-level bin and, if classified, of the
    /// class bin.
    pub fn mark(&mut self, op: &'static str, class: Option<InputClass>) {
        *self.hits.entry(CoverBin::op(op)).or_default() += 1;
        if let Some(class) = class {
            *self.hits.entry(CoverBin::class(op, class)).or_default() += 1;
        }
    }

    /// Returns true if `bin` has been hit at least once.
    pub fn is_covered(&self, bin: &CoverBin) -> bool {
        self.hits.contains_key(bin)
    }

    /// Number of hits of `bin`.
    pub fn hits(&self, bin: &CoverBin) -> u64 {
        self.hits.get(bin).copied().unwrap_or(0)
    }

    /// Number of distinct bins hit, declared or not.
    pub fn exercised(&self) -> usize {
        self.hits.len()
    }

    /// Summarizes the ledger.
    pub fn summary(&self) -> CoverageSummary {
        let holes: Vec<CoverBin> = self
            .declared
            .iter()
            .filter(|bin| !self.is_covered(bin))
            .copied()
            .collect();
        let total = self.declared.len();
        let covered = total - holes.len();
        CoverageSummary {
            covered,
            total,
            percent: if total == 0 {
                0.0
            } else {
                covered as f64 * 100.0 / total as f64
            },
            holes,
            hits: self
                .hits
                .iter()
                .map(|(&bin, &hits)| BinHits { bin, hits })
                .collect(),
        }
    }
}

/// Hit count of one bin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BinHits {
    /// The bin.
    #[serde(flatten)]
    pub bin: CoverBin,
    /// Number of vectors that exercised it.
    pub hits: u64,
}

/// Snapshot of a coverage ledger.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoverageSummary {
    /// Declared bins hit at least once.
    pub covered: usize,
    /// Declared bins.
    pub total: usize,
    /// `covered / total` in percent (zero when nothing is declared).
    pub percent: f64,
    /// Declared bins never hit.
    pub holes: Vec<CoverBin>,
    /// Every bin hit, with its count.
    pub hits: Vec<BinHits>,
}

impl CoverageSummary {
    /// Writes the human-readable summary.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "Coverage: {:5.1}%  ({}/{} bins)",
            self.percent, self.covered, self.total
        )?;
        if self.holes.is_empty() {
            return Ok(());
        }
        writeln!(out, "Coverage holes ({}):", self.holes.len())?;
        for bin in &self.holes {
            writeln!(out, "  {bin}")?;
        }
        Ok(())
    }
}

/// Consumer of exercised coverage bins.
pub trait CoverageSink {
    /// Adds bins to the declared universe.
    fn declare(&mut self, bins: &[CoverBin]);

    /// Records that a vector exercised `op`, with the derived input class.
    ///
    /// Marking is idempotent with respect to coverage: repeated marks only
    /// raise hit counts.
    ///
    /// # Errors
    ///
    /// [`SinkError::Closed`] after [`flush`](Self::flush).
    fn mark(&mut self, op: &'static str, class: Option<InputClass>) -> Result<(), SinkError>;

    /// Persists the final snapshot. Called exactly once per run.
    ///
    /// # Errors
    ///
    /// I/O or encoding failures, or [`SinkError::Closed`] on a second flush.
    fn flush(&mut self) -> Result<(), SinkError>;

    /// Current snapshot of the ledger.
    fn summary(&self) -> CoverageSummary;
}
