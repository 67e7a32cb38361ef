//! Error types for the verification harness.
//!
//! This module defines the error taxonomy used throughout the harness. It provides:
//! 1. **Settle failures:** Fatal DUT conditions that abort a run.
//! 2. **Sink failures:** Trace and coverage resource errors, surfaced at run boundaries.
//! 3. **Configuration errors:** Invalid config files, vector files, and CLI specs.
//! 4. **Harness errors:** The umbrella type returned by the run controller.
//!
//! Expectation mismatches are deliberately absent: they are ordinary failed
//! outcomes in the run report, not errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::harness::RunState;

/// Fatal conditions raised by the DUT adapter.
///
/// Any of these terminates the run: the run controller moves to
/// [`RunState::Aborted`], cleans up its sinks and reports a fatal status.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SettleError {
    /// The DUT kept changing its outputs for the whole evaluation budget.
    ///
    /// This is what a combinational loop without a fixed point looks like
    /// from the outside.
    #[error("DUT `{dut}` did not settle within {iterations} evaluation passes")]
    NonConvergent {
        /// Name of the DUT model.
        dut: String,
        /// Number of evaluation passes attempted.
        iterations: u32,
    },

    /// Outputs were requested although no settle happened since the last apply.
    #[error("DUT `{dut}` outputs read before settling")]
    Unsettled {
        /// Name of the DUT model.
        dut: String,
    },
}

/// Errors raised by trace and coverage sinks.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The underlying file could not be created, written or flushed.
    #[error("failed to {action} `{}`: {source}", .path.display())]
    Io {
        /// What the sink was doing ("create", "write", "flush").
        action: &'static str,
        /// Destination path of the sink.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A trace record did not advance time.
    #[error("trace time {time} does not advance past {last}")]
    NonMonotonic {
        /// Rejected timestamp.
        time: u64,
        /// Last accepted timestamp.
        last: u64,
    },

    /// A record or close arrived before `open`.
    #[error("{sink} sink used before it was opened")]
    NotOpen {
        /// Sink kind.
        sink: &'static str,
    },

    /// A write arrived after the sink released its resource.
    #[error("{sink} sink is already closed")]
    Closed {
        /// Sink kind.
        sink: &'static str,
    },

    /// The coverage ledger could not be encoded.
    #[error("failed to encode coverage ledger: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors in configuration, vector files and command-line specs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration or vector file could not be read.
    #[error("failed to read `{}`: {source}", .path.display())]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A configuration or vector file is not valid JSON for its schema.
    #[error("invalid JSON in `{}`: {source}", .path.display())]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying decode error.
        source: serde_json::Error,
    },

    /// In-memory JSON could not be decoded.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A numeric setting that must be positive was zero.
    #[error("`{field}` must be greater than zero")]
    Zero {
        /// Offending field.
        field: &'static str,
    },

    /// The trace timeline of a table does not fit in 64 bits.
    #[error("time step {time_step} overflows the trace timeline of a {vectors}-vector table")]
    TimeOverflow {
        /// Configured time step.
        time_step: u64,
        /// Table length.
        vectors: usize,
    },

    /// An operation name is not part of the selected operation set.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    /// An operand literal could not be parsed.
    #[error("malformed operand `{0}`: expected an integer, a 0x/0b literal or {{\"f32\": <value>}}")]
    Operand(String),

    /// An operand or expected value does not fit the DUT's register width.
    #[error("value {value:#x} does not fit a {width}-bit register")]
    Width {
        /// Offending value.
        value: u64,
        /// Register width in bits.
        width: u8,
    },

    /// A built-in table name is not known.
    #[error("unknown vector table `{0}`: expected `default` or `coverage-demo`")]
    UnknownTable(String),

    /// A status flag name is not one of the defined flags.
    #[error("unknown status flag `{0}`")]
    UnknownFlag(String),

    /// A fault injection spec could not be parsed.
    #[error("invalid fault `{0}`: expected `stuck-at:<bit>:<0|1>` or `no-settle`")]
    Fault(String),
}

/// Errors returned by the run controller.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A sink failed at the `Idle` boundary, before any vector ran.
    #[error("sink failure: {0}")]
    Sink(#[from] SinkError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The report could not be written.
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),

    /// The run controller was driven through an illegal state transition.
    #[error("illegal run-state transition {from:?} -> {to:?}")]
    InvalidState {
        /// State before the transition.
        from: RunState,
        /// Requested state.
        to: RunState,
    },
}
