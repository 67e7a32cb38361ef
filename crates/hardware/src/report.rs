//! Run report collection and printing.
//!
//! This module holds the aggregate outcome of one pass over a vector table. It provides:
//! 1. **Per-vector outcomes:** Operands, observed outputs, resolved
//!    expectations and the verdict, in table order.
//! 2. **Totals:** Pass and fail counts, final status and elapsed host time.
//! 3. **Sink diagnostics:** Trace and coverage errors met during the run.
//! 4. **Printing:** One line per vector and a summary section.

use std::io::{self, Write};
use std::time::Duration;

use crate::common::bits::hex;
use crate::common::{SettleError, SinkError, StatusFlags, bits_f32};
use crate::coverage::CoverageSummary;
use crate::dut::OutputRegisters;
use crate::ops::{OperandKind, Operation};
use crate::oracle::{Judgement, Verdict};

/// Final status of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Every vector was applied.
    Done,
    /// The DUT failed to settle; vectors from `index` on were not judged.
    Aborted {
        /// Index of the vector that could not be settled.
        index: usize,
        /// The fatal condition.
        error: SettleError,
    },
}

/// Outcome of one vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorOutcome<O> {
    /// Position in the table.
    pub index: usize,
    /// Trace timestamp of the vector.
    pub time: u64,
    /// Operation applied.
    pub op: O,
    /// Operand `a` as applied.
    pub a: u32,
    /// Operand `b` as applied.
    pub b: u32,
    /// Diagnostic label of the vector.
    pub label: String,
    /// Outputs read after settling.
    pub observed: OutputRegisters,
    /// Resolved expectations and verdict.
    pub judgement: Judgement,
}

impl<O: Operation> VectorOutcome<O> {
    /// Returns true unless the verdict is a failure.
    pub const fn passed(&self) -> bool {
        self.judgement.verdict.passed()
    }

    /// Formats the one-line report of this outcome.
    ///
    /// `flag_ports` selects the status outputs shown.
    pub fn line(&self, flag_ports: StatusFlags) -> String {
        let width = O::OPERAND_WIDTH;
        let desc = self.op.descriptor();
        let operand = |v: u32| match desc.operands {
            OperandKind::Float | OperandKind::FloatToInt => format!("{} ({:?})", hex(v, width), bits_f32(v)),
            OperandKind::Bits => hex(v, width),
        };
        let result = match desc.operands {
            OperandKind::Float => format!("{} ({:?})", hex(self.observed.result, width), bits_f32(self.observed.result)),
            OperandKind::FloatToInt => format!("{} ({})", hex(self.observed.result, width), self.observed.result as i32),
            OperandKind::Bits => hex(self.observed.result, width),
        };
        let operands = if desc.unary {
            format!("a={}", operand(self.a))
        } else {
            format!("a={} b={}", operand(self.a), operand(self.b))
        };

        let mut line = format!(
            "[{:>3}] {:<10} {} -> {}",
            self.index,
            desc.name,
            operands,
            result
        );
        if !flag_ports.is_empty() {
            line.push_str(&format!(" [{}]", self.observed.flags.render(flag_ports)));
        }
        line.push_str(&format!("  {}", self.judgement.verdict.label()));

        match self.judgement.verdict {
            Verdict::Fail { result, flags } => {
                if result {
                    if let Some(expected) = self.judgement.expected_result {
                        line.push_str(&format!(" expected {}", hex(expected, width)));
                    }
                }
                if !flags.is_empty() {
                    line.push_str(&format!(" flags differ: {flags}"));
                }
            }
            Verdict::Unchecked => match self.judgement.advisory {
                Some(advisory) => line.push_str(&format!(" (unchecked, oracle {})", hex(advisory.result, width))),
                None => line.push_str(" (unchecked)"),
            },
            Verdict::Pass => {}
        }
        if !self.label.is_empty() {
            line.push_str(&format!("  # {}", self.label));
        }
        line
    }
}

/// Aggregate outcome of one run.
#[derive(Debug)]
pub struct RunReport<O> {
    /// Name of the vector table.
    pub table: String,
    /// Model name of the DUT.
    pub dut: String,
    /// Status outputs driven by the DUT.
    pub flag_ports: StatusFlags,
    /// Vectors in the table.
    pub total: usize,
    /// Per-vector outcomes in table order.
    pub outcomes: Vec<VectorOutcome<O>>,
    /// Vectors that passed (including unchecked ones).
    pub pass_count: usize,
    /// Vectors that failed.
    pub fail_count: usize,
    /// Final status.
    pub status: RunStatus,
    /// Coverage snapshot, when a coverage sink was attached.
    pub coverage: Option<CoverageSummary>,
    /// Sink failures met during the run.
    pub sink_errors: Vec<SinkError>,
    /// Host time spent in the run.
    pub elapsed: Duration,
}

impl<O: Operation> RunReport<O> {
    /// Creates an empty report.
    pub fn new(table: impl Into<String>, dut: impl Into<String>, flag_ports: StatusFlags, total: usize) -> Self {
        Self {
            table: table.into(),
            dut: dut.into(),
            flag_ports,
            total,
            outcomes: Vec::with_capacity(total),
            pass_count: 0,
            fail_count: 0,
            status: RunStatus::Done,
            coverage: None,
            sink_errors: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Appends the next outcome and updates the counts.
    pub fn push(&mut self, outcome: VectorOutcome<O>) {
        if outcome.passed() {
            self.pass_count += 1;
        } else {
            self.fail_count += 1;
        }
        self.outcomes.push(outcome);
    }

    /// Returns true if the run aborted.
    pub const fn aborted(&self) -> bool {
        matches!(self.status, RunStatus::Aborted { .. })
    }

    /// Returns true for a completed run with no failures.
    pub const fn success(&self) -> bool {
        !self.aborted() && self.fail_count == 0
    }

    /// Process exit code: 0 success, 1 failures, 2 aborted.
    pub const fn exit_code(&self) -> u8 {
        if self.aborted() {
            2
        } else if self.fail_count > 0 {
            1
        } else {
            0
        }
    }

    /// Writes the per-vector lines. An aborted run ends with one `ABORTED`
    /// line for the vector that failed to settle.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn write_lines<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for outcome in &self.outcomes {
            writeln!(out, "{}", outcome.line(self.flag_ports))?;
        }
        if let RunStatus::Aborted { index, error } = &self.status {
            writeln!(out, "[{index:>3}] {:<10} {error}", "ABORTED")?;
        }
        Ok(())
    }

    /// Writes the summary section.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rule = "=".repeat(58);
        writeln!(out, "{rule}")?;
        writeln!(out, "VERIFICATION SUMMARY")?;
        writeln!(out, "{rule}")?;
        writeln!(out, "dut                      {}", self.dut)?;
        writeln!(out, "table                    {}", self.table)?;
        writeln!(out, "vectors                  {}", self.total)?;
        writeln!(out, "executed                 {}", self.outcomes.len())?;
        writeln!(out, "passed                   {}", self.pass_count)?;
        writeln!(out, "failed                   {}", self.fail_count)?;
        writeln!(out, "host_seconds             {:.4} s", self.elapsed.as_secs_f64())?;
        match &self.status {
            RunStatus::Done => writeln!(out, "status                   done")?,
            RunStatus::Aborted { index, error } => {
                writeln!(out, "status                   ABORTED at vector {index}: {error}")?;
            }
        }
        if !self.sink_errors.is_empty() {
            writeln!(out, "{}", "-".repeat(58))?;
            writeln!(out, "SINK ERRORS")?;
            for error in &self.sink_errors {
                writeln!(out, "  {error}")?;
            }
        }
        if let Some(coverage) = &self.coverage {
            writeln!(out, "{}", "-".repeat(58))?;
            coverage.write_to(out)?;
        }
        writeln!(out, "{rule}")?;
        writeln!(
            out,
            "{}: {}/{} passed",
            if self.success() { "PASSED" } else { "FAILED" },
            self.pass_count,
            self.total
        )
    }

    /// Writes the per-vector lines followed by the summary.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_lines(out)?;
        self.write_summary(out)?;
        out.flush()
    }

    /// Prints the per-vector lines and the summary to stdout.
    ///
    /// # Errors
    ///
    /// Propagates stdout write failures, such as a closed pipe.
    pub fn print(&self) -> io::Result<()> {
        self.write_to(&mut io::stdout().lock())
    }
}
