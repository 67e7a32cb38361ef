use mockall::mock;
use rtlbench_core::common::SinkError;
use rtlbench_core::coverage::{CoverBin, CoverageSink, CoverageSummary};
use rtlbench_core::dut::SignalSnapshot;
use rtlbench_core::ops::InputClass;
use rtlbench_core::trace::{TraceHeader, TraceSink};

mock! {
    pub Trace {}
    impl TraceSink for Trace {
        fn open(&mut self, header: &TraceHeader) -> Result<(), SinkError>;
        fn record(&mut self, time: u64, snapshot: &SignalSnapshot) -> Result<(), SinkError>;
        fn close(&mut self) -> Result<(), SinkError>;
    }
}

mock! {
    pub Coverage {}
    impl CoverageSink for Coverage {
        fn declare(&mut self, bins: &[CoverBin]);
        fn mark(&mut self, op: &'static str, class: Option<InputClass>) -> Result<(), SinkError>;
        fn flush(&mut self) -> Result<(), SinkError>;
        fn summary(&self) -> CoverageSummary;
    }
}

/// Summary of a ledger with nothing declared.
pub fn empty_summary() -> CoverageSummary {
    CoverageSummary {
        covered: 0,
        total: 0,
        percent: 0.0,
        holes: Vec::new(),
        hits: Vec::new(),
    }
}

/// A trace mock expecting exactly one open and one close, and any number of records.
pub fn strict_trace() -> MockTrace {
    let mut trace = MockTrace::new();
    trace.expect_open().times(1).returning(|_| Ok(()));
    trace.expect_record().returning(|_, _| Ok(()));
    trace.expect_close().times(1).returning(|| Ok(()));
    trace
}

/// A coverage mock expecting exactly one declare and one flush, and any number of marks.
pub fn strict_coverage() -> MockCoverage {
    let mut coverage = MockCoverage::new();
    coverage.expect_declare().times(1).return_const(());
    coverage.expect_mark().returning(|_, _| Ok(()));
    coverage.expect_flush().times(1).returning(|| Ok(()));
    coverage.expect_summary().returning(empty_summary);
    coverage
}
