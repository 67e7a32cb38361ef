//! JSON coverage ledger file.
//!
//! The ledger is accumulated in memory during the run and written once, at
//! flush, as a pretty-printed [`CoverageSummary`] tagged with the tool name
//! and version.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::common::SinkError;
use crate::ops::InputClass;

use super::{CoverBin, CoverageLedger, CoverageSink, CoverageSummary};

/// On-disk document.
#[derive(Serialize)]
struct LedgerFile<'a> {
    tool: &'static str,
    version: &'static str,
    #[serde(flatten)]
    summary: &'a CoverageSummary,
}

/// Coverage sink writing a JSON ledger file at flush.
#[derive(Debug)]
pub struct JsonCoverageSink {
    path: PathBuf,
    ledger: CoverageLedger,
    flushed: bool,
}

impl JsonCoverageSink {
    const KIND: &'static str = "json coverage";

    /// Creates a sink that will write to `path` when flushed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ledger: CoverageLedger::new(),
            flushed: false,
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, summary: &CoverageSummary) -> Result<(), SinkError> {
        let io_err = |action: &'static str| {
            move |source| SinkError::Io {
                action,
                path: self.path.clone(),
                source,
            }
        };
        let file = File::create(&self.path).map_err(io_err("create"))?;
        let mut out = BufWriter::new(file);
        let doc = LedgerFile {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            summary,
        };
        serde_json::to_writer_pretty(&mut out, &doc)?;
        writeln!(out).map_err(io_err("write"))?;
        out.flush().map_err(io_err("flush"))
    }
}

impl CoverageSink for JsonCoverageSink {
    fn declare(&mut self, bins: &[CoverBin]) {
        self.ledger.declare(bins);
    }

    fn mark(&mut self, op: &'static str, class: Option<InputClass>) -> Result<(), SinkError> {
        if self.flushed {
            return Err(SinkError::Closed { sink: Self::KIND });
        }
        self.ledger.mark(op, class);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        if self.flushed {
            return Err(SinkError::Closed { sink: Self::KIND });
        }
        self.flushed = true;
        let summary = self.ledger.summary();
        self.write(&summary)?;
        debug!(path = %self.path.display(), covered = summary.covered, total = summary.total, "coverage ledger written");
        Ok(())
    }

    fn summary(&self) -> CoverageSummary {
        self.ledger.summary()
    }
}
