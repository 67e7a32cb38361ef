use rtlbench_core::coverage::MemoryCoverage;
use rtlbench_core::dut::{Dut, DutAdapter};
use rtlbench_core::ops::Operation;
use rtlbench_core::trace::MemoryTrace;
use rtlbench_core::vector::VectorTable;
use rtlbench_core::{Harness, RunReport};
use tracing_subscriber::EnvFilter;

/// Settle limit used by the helpers.
pub const SETTLE_LIMIT: u32 = 8;

/// Shared setup for harness tests.
///
/// Creating a context installs a test-writer log subscriber the first time;
/// later calls are no-ops.
pub struct TestContext {
    pub trace: MemoryTrace,
    pub coverage: MemoryCoverage,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
            .with_test_writer()
            .try_init();

        Self {
            trace: MemoryTrace::new(),
            coverage: MemoryCoverage::new(),
        }
    }

    /// Runs `table` against `dut` with no sinks attached.
    pub fn run<O: Operation>(&self, dut: impl Dut + 'static, table: &VectorTable<O>) -> RunReport<O> {
        let adapter = DutAdapter::new(Box::new(dut), SETTLE_LIMIT);
        Harness::new(adapter, table).run().expect("run without sinks cannot fail")
    }

    /// Runs `table` against `dut` with the context's memory sinks attached.
    pub fn run_traced<O: Operation>(&self, dut: impl Dut + 'static, table: &VectorTable<O>) -> RunReport<O> {
        let adapter = DutAdapter::new(Box::new(dut), SETTLE_LIMIT);
        Harness::new(adapter, table)
            .with_trace(Box::new(self.trace.clone()))
            .with_coverage(Box::new(self.coverage.clone()))
            .run()
            .expect("memory sinks cannot fail to open")
    }
}

/// Renders every per-vector line of a report.
pub fn lines<O: Operation>(report: &RunReport<O>) -> Vec<String> {
    report.outcomes.iter().map(|o| o.line(report.flag_ports)).collect()
}
