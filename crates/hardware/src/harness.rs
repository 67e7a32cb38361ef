//! Run controller.
//!
//! The [`Harness`] walks a vector table once, driving the DUT adapter,
//! judging each observation and feeding the optional sinks. Its lifecycle is
//! a small state machine:
//!
//! ```text
//! Idle --> Running --> Finalizing --> Done
//!             |
//!             +------> Aborted
//! ```
//!
//! 1. **Idle:** Constructed; the trace sink is opened here, and an open
//!    failure is returned before any vector runs.
//! 2. **Running:** Per vector: apply, settle, read, judge, append outcome,
//!    trace record, coverage mark.
//! 3. **Finalizing:** Trace close and coverage flush, each exactly once.
//! 4. **Done:** The report is returned by value.
//! 5. **Aborted:** Entered from `Running` when the DUT fails to settle; the
//!    sinks are still closed and flushed exactly once.
//!
//! Sink failures after `Idle` never change pass/fail accounting: the failing
//! sink stops receiving data, is still released, and the error is collected
//! in [`RunReport::sink_errors`].

use std::fmt;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::common::{ConfigError, HarnessError, SettleError};
use crate::config::HarnessConfig;
use crate::coverage::{self, CoverageSink};
use crate::dut::{Dut, DutAdapter};
use crate::ops::Operation;
use crate::oracle;
use crate::report::{RunReport, RunStatus, VectorOutcome};
use crate::trace::{TraceHeader, TraceSink};
use crate::vector::VectorTable;

/// Lifecycle state of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Constructed, sinks not opened.
    Idle,
    /// Applying vectors.
    Running,
    /// Releasing sinks after the last vector.
    Finalizing,
    /// Completed; the report is final.
    Done,
    /// Stopped by a fatal DUT condition.
    Aborted,
}

impl RunState {
    /// Returns true for `Done` and `Aborted`.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if `self -> next` is a legal transition.
    pub const fn allows(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Finalizing | Self::Aborted)
                | (Self::Finalizing, Self::Done)
        )
    }
}

/// Drives one pass over a vector table.
///
/// A harness runs once: [`Harness::run`] consumes it.
pub struct Harness<'t, O> {
    state: RunState,
    adapter: DutAdapter<O>,
    table: &'t VectorTable<O>,
    time_step: u64,
    trace: Option<Box<dyn TraceSink>>,
    coverage: Option<Box<dyn CoverageSink>>,
}

impl<'t, O: Operation> Harness<'t, O> {
    /// Default trace time advance per vector.
    pub const DEFAULT_TIME_STEP: u64 = 10;

    /// Creates a harness with no sinks attached.
    pub const fn new(adapter: DutAdapter<O>, table: &'t VectorTable<O>) -> Self {
        Self {
            state: RunState::Idle,
            adapter,
            table,
            time_step: Self::DEFAULT_TIME_STEP,
            trace: None,
            coverage: None,
        }
    }

    /// Creates a harness over `dut` using the time step and settle limit of
    /// `config`. Sinks are not attached; see [`Self::with_trace`] and
    /// [`Self::with_coverage`].
    ///
    /// # Errors
    ///
    /// [`HarnessError::Config`] if `config` fails validation.
    pub fn from_config(
        dut: Box<dyn Dut>,
        table: &'t VectorTable<O>,
        config: &HarnessConfig,
    ) -> Result<Self, HarnessError> {
        config.validate()?;
        let adapter = DutAdapter::new(dut, config.dut.settle_limit);
        Ok(Self::new(adapter, table).with_time_step(config.general.time_step))
    }

    /// Sets the trace time advance per vector. Zero is rejected by [`Self::run`].
    #[must_use]
    pub const fn with_time_step(mut self, time_step: u64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Attaches a trace sink.
    #[must_use]
    pub fn with_trace(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Attaches a coverage sink.
    #[must_use]
    pub fn with_coverage(mut self, sink: Box<dyn CoverageSink>) -> Self {
        self.coverage = Some(sink);
        self
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) -> Result<(), HarnessError> {
        if !self.state.allows(next) {
            return Err(HarnessError::InvalidState {
                from: self.state,
                to: next,
            });
        }
        debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
        Ok(())
    }

    /// Runs every vector and returns the report.
    ///
    /// # Errors
    ///
    /// - [`HarnessError::Config`] if the time step is zero or the last
    ///   vector's timestamp does not fit in a `u64`.
    /// - [`HarnessError::Sink`] if the trace sink cannot be opened; no vector
    ///   runs and no sink is touched afterwards.
    ///
    /// A DUT that fails to settle is not an error: the report carries
    /// [`RunStatus::Aborted`].
    pub fn run(mut self) -> Result<RunReport<O>, HarnessError> {
        let started = Instant::now();
        if self.time_step == 0 {
            return Err(ConfigError::Zero {
                field: "general.time_step",
            }
            .into());
        }
        let last_index = self.table.len().saturating_sub(1) as u64;
        if last_index.checked_mul(self.time_step).is_none() {
            return Err(ConfigError::TimeOverflow {
                time_step: self.time_step,
                vectors: self.table.len(),
            }
            .into());
        }

        let ports = self.adapter.ports();
        let header = TraceHeader {
            scope: self.adapter.name().to_string(),
            ports,
            time_step: self.time_step,
        };
        if let Some(trace) = self.trace.as_mut() {
            trace.open(&header)?;
        }
        if let Some(coverage) = self.coverage.as_mut() {
            coverage.declare(&coverage::universe::<O>());
        }

        self.transition(RunState::Running)?;
        let table = self.table;
        info!(
            table = table.name(),
            dut = self.adapter.name(),
            vectors = table.len(),
            "run started"
        );

        let mut report = RunReport::new(table.name(), self.adapter.name(), ports.flags, table.len());
        let mut trace_live = self.trace.is_some();
        let mut coverage_live = self.coverage.is_some();

        for (index, vector) in table.iter().enumerate() {
            let time = index as u64 * self.time_step;
            let op = vector.op();

            self.adapter.apply(vector.a(), vector.b(), op);
            if let Err(error) = self.adapter.settle() {
                error!(index, op = op.name(), %error, "DUT failed to settle; aborting run");
                report.status = RunStatus::Aborted { index, error };
                break;
            }
            let Some(snapshot) = self.adapter.snapshot() else {
                let error = SettleError::Unsettled {
                    dut: self.adapter.name().to_string(),
                };
                error!(index, op = op.name(), %error, "aborting run");
                report.status = RunStatus::Aborted { index, error };
                break;
            };

            let judgement = oracle::judge(vector, snapshot.outputs);
            if judgement.verdict.passed() {
                debug!(index, op = op.name(), verdict = judgement.verdict.label(), "vector");
            } else {
                warn!(
                    index,
                    op = op.name(),
                    label = vector.label(),
                    observed = snapshot.outputs.result,
                    expected = ?judgement.expected_result,
                    "vector failed"
                );
            }
            report.push(VectorOutcome {
                index,
                time,
                op,
                a: snapshot.inputs.a,
                b: snapshot.inputs.b,
                label: vector.label().to_string(),
                observed: snapshot.outputs,
                judgement,
            });

            if let Some(trace) = self.trace.as_mut().filter(|_| trace_live) {
                if let Err(e) = trace.record(time, &snapshot) {
                    warn!(index, error = %e, "trace sink failed; tracing disabled for this run");
                    report.sink_errors.push(e);
                    trace_live = false;
                }
            }
            if let Some(coverage) = self.coverage.as_mut().filter(|_| coverage_live) {
                let class = op.classify(snapshot.inputs.a, snapshot.inputs.b);
                if let Err(e) = coverage.mark(op.name(), class) {
                    warn!(index, error = %e, "coverage sink failed; coverage disabled for this run");
                    report.sink_errors.push(e);
                    coverage_live = false;
                }
            }
        }

        if report.aborted() {
            self.transition(RunState::Aborted)?;
            self.release(&mut report);
        } else {
            self.transition(RunState::Finalizing)?;
            self.release(&mut report);
            self.transition(RunState::Done)?;
        }

        report.elapsed = started.elapsed();
        info!(
            passed = report.pass_count,
            failed = report.fail_count,
            aborted = report.aborted(),
            "run finished"
        );
        Ok(report)
    }

    /// Closes the trace and flushes coverage. Each sink is taken out of the
    /// harness, so this happens at most once per run.
    fn release(&mut self, report: &mut RunReport<O>) {
        if let Some(mut trace) = self.trace.take() {
            if let Err(e) = trace.close() {
                warn!(error = %e, "trace sink failed to close");
                report.sink_errors.push(e);
            }
        }
        if let Some(mut coverage) = self.coverage.take() {
            if let Err(e) = coverage.flush() {
                warn!(error = %e, "coverage sink failed to flush");
                report.sink_errors.push(e);
            }
            report.coverage = Some(coverage.summary());
        }
    }
}

impl<O: Operation> fmt::Debug for Harness<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("state", &self.state)
            .field("dut", &self.adapter.name())
            .field("table", &self.table.name())
            .field("time_step", &self.time_step)
            .field("trace", &self.trace.is_some())
            .field("coverage", &self.coverage.is_some())
            .finish()
    }
}
