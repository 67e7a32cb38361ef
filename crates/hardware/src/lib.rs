//! Vector-driven functional verification harness for combinational logic.
//!
//! This crate drives a device under test with a table of stimulus vectors and
//! judges every observation against reference functions. It provides:
//! 1. **Vectors:** Immutable stimulus/expectation records, built in code or
//!    loaded from JSON.
//! 2. **Operations and oracles:** Typed opcode sets with an exhaustive
//!    descriptor per operation (name, encoding, reference function, check
//!    policy).
//! 3. **DUT boundary:** A register-level `Dut` trait, the apply/settle/read
//!    adapter, behavioral ALU models and fault injection.
//! 4. **Sinks:** VCD and in-memory signal traces; JSON and in-memory
//!    functional coverage.
//! 5. **Run controller:** The `Idle -> Running -> Finalizing -> Done` state
//!    machine (or `Aborted`) and the run report.

/// Common types (status flags, bit helpers, errors).
pub mod common;
/// Harness configuration (defaults, JSON loading, validation).
pub mod config;
/// Functional coverage ledger and sinks.
pub mod coverage;
/// DUT boundary, adapter, reference models and fault injection.
pub mod dut;
/// Run controller state machine.
pub mod harness;
/// Operation sets, descriptors and coverage input classes.
pub mod ops;
/// Reference functions and verdicts.
pub mod oracle;
/// Run report and printing.
pub mod report;
/// Built-in vector tables.
pub mod tables;
/// Signal trace sinks.
pub mod trace;
/// Vectors, vector tables and JSON loading.
pub mod vector;

/// Root configuration type; use `HarnessConfig::default()` or load from JSON.
pub use crate::config::HarnessConfig;
/// Run controller; construct with `Harness::new` or `Harness::from_config`.
pub use crate::harness::{Harness, RunState};
/// Aggregate run outcome.
pub use crate::report::{RunReport, RunStatus};
