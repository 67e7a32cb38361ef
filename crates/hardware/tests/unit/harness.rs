//! # Run Controller Tests
//!
//! Lifecycle of a run, sink ordering and the handling of sink failures at
//! each boundary.

use std::io;
use std::path::PathBuf;

use mockall::Sequence;
use pretty_assertions::assert_eq;
use rtlbench_core::common::{ConfigError, HarnessError, SettleError, SinkError, StatusFlags};
use rtlbench_core::config::HarnessConfig;
use rtlbench_core::dut::{Alu8, DutAdapter};
use rtlbench_core::ops::Alu8Op;
use rtlbench_core::tables::{Builtin, BuiltinTable};
use rtlbench_core::vector::{Vector, VectorTable};
use rtlbench_core::{Harness, RunStatus};

use crate::common::harness::{SETTLE_LIMIT, TestContext};
use crate::common::mocks::dut::{ConstantDut, OscillatingDut};
use crate::common::mocks::sinks::{MockCoverage, MockTrace, empty_summary, strict_coverage, strict_trace};

fn io_error(action: &'static str) -> SinkError {
    SinkError::Io {
        action,
        path: PathBuf::from("/dev/full"),
        source: io::Error::other("disk full"),
    }
}

fn harness(table: &VectorTable<Alu8Op>) -> Harness<'_, Alu8Op> {
    Harness::new(DutAdapter::new(Box::new(Alu8::new()), SETTLE_LIMIT), table)
}

#[test]
fn test_memory_sinks_see_every_vector() {
    let ctx = TestContext::new();
    let table = Alu8Op::builtin(BuiltinTable::Default);

    let report = ctx.run_traced(Alu8::new(), &table);

    let header = ctx.trace.header().expect("trace opened");
    assert_eq!(header.scope, "alu8");
    assert_eq!(header.time_step, Harness::<Alu8Op>::DEFAULT_TIME_STEP);

    let records = ctx.trace.records();
    assert_eq!(records.len(), table.len());
    let times: Vec<u64> = records.iter().map(|r| r.time).collect();
    let expected: Vec<u64> = (0..table.len() as u64).map(|i| i * 10).collect();
    assert_eq!(times, expected);
    for (record, outcome) in records.iter().zip(&report.outcomes) {
        assert_eq!(record.snapshot.outputs, outcome.observed);
        assert_eq!(record.time, outcome.time);
    }
    assert_eq!(ctx.trace.close_count(), 1);

    assert_eq!(ctx.coverage.flush_count(), 1);
    assert_eq!(ctx.coverage.flushed().as_ref(), report.coverage.as_ref());
    assert!(report.sink_errors.is_empty());
}

#[test]
fn test_sinks_released_once_on_clean_run() {
    let table = Alu8Op::builtin(BuiltinTable::Default);
    let mut coverage = MockCoverage::new();
    coverage.expect_declare().times(1).return_const(());
    coverage.expect_mark().times(table.len()).returning(|_, _| Ok(()));
    coverage.expect_flush().times(1).returning(|| Ok(()));
    coverage.expect_summary().times(1).returning(empty_summary);
    let mut trace = MockTrace::new();
    trace.expect_open().times(1).returning(|_| Ok(()));
    trace.expect_record().times(table.len()).returning(|_, _| Ok(()));
    trace.expect_close().times(1).returning(|| Ok(()));

    let report = harness(&table)
        .with_trace(Box::new(trace))
        .with_coverage(Box::new(coverage))
        .run()
        .expect("clean run");

    assert!(report.success());
    assert_eq!(report.coverage, Some(empty_summary()));
}

#[test]
fn test_trace_calls_are_ordered() {
    let table = VectorTable::new("two", vec![Vector::new(Alu8Op::Add, 1, 2), Vector::new(Alu8Op::Sub, 5, 3)]);
    let mut seq = Sequence::new();
    let mut trace = MockTrace::new();
    trace
        .expect_open()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|h| h.scope == "alu8" && h.time_step == 7)
        .returning(|_| Ok(()));
    trace
        .expect_record()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|t, s| *t == 0 && s.outputs.result == 3)
        .returning(|_, _| Ok(()));
    trace
        .expect_record()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|t, s| *t == 7 && s.outputs.result == 2)
        .returning(|_, _| Ok(()));
    trace.expect_close().times(1).in_sequence(&mut seq).returning(|| Ok(()));

    let report = harness(&table)
        .with_time_step(7)
        .with_trace(Box::new(trace))
        .run()
        .expect("clean run");
    assert_eq!(report.pass_count, 2);
}

#[test]
fn test_zero_time_step_is_a_config_error() {
    let table = Alu8Op::builtin(BuiltinTable::Default);
    let result = harness(&table).with_time_step(0).with_trace(Box::new(MockTrace::new())).run();
    assert!(matches!(
        result,
        Err(HarnessError::Config(ConfigError::Zero {
            field: "general.time_step"
        }))
    ));
}

#[test]
fn test_overflowing_timeline_is_a_config_error() {
    let config = HarnessConfig::from_json(r#"{ "general": { "time_step": 18446744073709551615 } }"#)
        .expect("nonzero time step validates");
    let table = VectorTable::new(
        "three",
        vec![
            Vector::new(Alu8Op::Add, 1, 1),
            Vector::new(Alu8Op::Add, 2, 2),
            Vector::new(Alu8Op::Add, 3, 3),
        ],
    );

    let result = Harness::from_config(Box::new(Alu8::new()), &table, &config)
        .expect("valid config")
        .with_trace(Box::new(MockTrace::new()))
        .with_coverage(Box::new(MockCoverage::new()))
        .run();

    assert!(matches!(
        result,
        Err(HarnessError::Config(ConfigError::TimeOverflow {
            time_step: u64::MAX,
            vectors: 3
        }))
    ));
}

#[test]
fn test_largest_time_step_fits_a_single_vector() {
    let ctx = TestContext::new();
    let table = VectorTable::new("one", vec![Vector::new(Alu8Op::Add, 1, 1)]);

    let report = harness(&table)
        .with_time_step(u64::MAX)
        .with_trace(Box::new(ctx.trace.clone()))
        .run()
        .expect("timestamp 0 fits");

    assert_eq!(report.outcomes[0].time, 0);
    assert_eq!(ctx.trace.records().len(), 1);
}

#[test]
fn test_trace_open_failure_stops_before_any_vector() {
    let table = Alu8Op::builtin(BuiltinTable::Default);
    let mut trace = MockTrace::new();
    trace.expect_open().times(1).returning(|_| Err(io_error("create")));
    trace.expect_record().never();
    trace.expect_close().never();
    let mut coverage = MockCoverage::new();
    coverage.expect_declare().never();
    coverage.expect_mark().never();
    coverage.expect_flush().never();

    let dut = ConstantDut::new(0, StatusFlags::NONE);
    let last = dut.last_inputs();
    let result = Harness::new(DutAdapter::<Alu8Op>::new(Box::new(dut), SETTLE_LIMIT), &table)
        .with_trace(Box::new(trace))
        .with_coverage(Box::new(coverage))
        .run();

    assert!(matches!(result, Err(HarnessError::Sink(SinkError::Io { action: "create", .. }))));
    assert_eq!(last.get(), Default::default());
}

#[test]
fn test_trace_record_failure_disables_trace_only() {
    let table = Alu8Op::builtin(BuiltinTable::Default);
    let mut trace = MockTrace::new();
    trace.expect_open().times(1).returning(|_| Ok(()));
    trace.expect_record().times(1).returning(|_, _| Err(io_error("write")));
    trace.expect_close().times(1).returning(|| Ok(()));

    let report = harness(&table)
        .with_trace(Box::new(trace))
        .with_coverage(Box::new(strict_coverage()))
        .run()
        .expect("record failures are collected");

    assert_eq!(report.sink_errors.len(), 1);
    assert_eq!(report.pass_count, table.len());
    assert_eq!(report.fail_count, 0);
    assert_eq!(report.status, RunStatus::Done);
}

#[test]
fn test_coverage_mark_failure_disables_coverage_only() {
    let table = Alu8Op::builtin(BuiltinTable::Default);
    let mut coverage = MockCoverage::new();
    coverage.expect_declare().times(1).return_const(());
    coverage
        .expect_mark()
        .times(1)
        .returning(|_, _| Err(SinkError::Closed { sink: "mock" }));
    coverage.expect_flush().times(1).returning(|| Ok(()));
    coverage.expect_summary().returning(empty_summary);

    let report = harness(&table)
        .with_trace(Box::new(strict_trace()))
        .with_coverage(Box::new(coverage))
        .run()
        .expect("mark failures are collected");

    assert!(matches!(report.sink_errors.as_slice(), [SinkError::Closed { sink: "mock" }]));
    assert_eq!(report.pass_count, table.len());
    // Sink trouble never changes the verdict accounting.
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_release_failures_are_collected() {
    let table = Alu8Op::builtin(BuiltinTable::Default);
    let mut trace = MockTrace::new();
    trace.expect_open().times(1).returning(|_| Ok(()));
    trace.expect_record().returning(|_, _| Ok(()));
    trace.expect_close().times(1).returning(|| Err(io_error("flush")));
    let mut coverage = MockCoverage::new();
    coverage.expect_declare().times(1).return_const(());
    coverage.expect_mark().returning(|_, _| Ok(()));
    coverage.expect_flush().times(1).returning(|| Err(io_error("write")));
    coverage.expect_summary().times(1).returning(empty_summary);

    let report = harness(&table)
        .with_trace(Box::new(trace))
        .with_coverage(Box::new(coverage))
        .run()
        .expect("release failures are collected");

    assert_eq!(report.sink_errors.len(), 2);
    assert!(report.coverage.is_some());
    assert_eq!(report.status, RunStatus::Done);
}

#[test]
fn test_abort_mid_table_keeps_earlier_outcomes() {
    let ctx = TestContext::new();
    let table = Alu8Op::builtin(BuiltinTable::Default);
    let dut = OscillatingDut::after(3);

    let report = ctx.run_traced(dut, &table);

    assert!(matches!(report.status, RunStatus::Aborted { index: 3, .. }));
    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.pass_count + report.fail_count, 3);
    assert_eq!(ctx.trace.records().len(), 3);
    assert_eq!(ctx.trace.close_count(), 1);
    assert_eq!(ctx.coverage.flush_count(), 1);
}

#[test]
fn test_from_config_applies_settle_limit_and_time_step() {
    let config = HarnessConfig::from_json(r#"{ "general": { "time_step": 4 }, "dut": { "settle_limit": 3 } }"#)
        .expect("valid config");
    let table = Alu8Op::builtin(BuiltinTable::Default);
    let dut = OscillatingDut::new();
    let evals = dut.evals();

    let ctx = TestContext::new();
    let report = Harness::from_config(Box::new(dut), &table, &config)
        .expect("valid config")
        .with_trace(Box::new(ctx.trace.clone()))
        .run()
        .expect("abort is not an error");

    assert_eq!(evals.get(), 3);
    assert!(matches!(
        report.status,
        RunStatus::Aborted {
            error: SettleError::NonConvergent { iterations: 3, .. },
            ..
        }
    ));
    assert_eq!(ctx.trace.header().map(|h| h.time_step), Some(4));
}

#[test]
fn test_from_config_rejects_invalid_config() {
    let mut config = HarnessConfig::default();
    config.dut.settle_limit = 0;
    let table = Alu8Op::builtin(BuiltinTable::Default);
    let result = Harness::from_config(Box::new(Alu8::new()), &table, &config);
    assert!(matches!(
        result,
        Err(HarnessError::Config(ConfigError::Zero {
            field: "dut.settle_limit"
        }))
    ));
}

#[test]
fn test_multi_pass_settle_within_limit() {
    let ctx = TestContext::new();
    let table = VectorTable::new("slow", vec![Vector::new(Alu8Op::Add, 0, 0)]);

    let settles = ctx.run(ConstantDut::new(0, StatusFlags::ZERO).with_passes(SETTLE_LIMIT), &table);
    assert_eq!(settles.status, RunStatus::Done);

    let too_slow = ctx.run(ConstantDut::new(0, StatusFlags::ZERO).with_passes(SETTLE_LIMIT + 1), &table);
    assert!(too_slow.aborted());
}

#[test]
fn test_operands_masked_to_port_width() {
    let ctx = TestContext::new();
    let table = VectorTable::new("wide", vec![Vector::new(Alu8Op::Xor, 0x1FF, 0x300)]);
    let dut = ConstantDut::new(0, StatusFlags::NONE);
    let last = dut.last_inputs();

    let report = ctx.run(dut, &table);

    let applied = last.get();
    assert_eq!((applied.a, applied.b, applied.opcode), (0xFF, 0x00, 4));
    assert_eq!((report.outcomes[0].a, report.outcomes[0].b), (0xFF, 0x00));
}

#[test]
fn test_runs_are_deterministic() {
    let ctx = TestContext::new();
    let table = Alu8Op::builtin(BuiltinTable::Default);
    let first = ctx.run(Alu8::new(), &table);
    let second = ctx.run(Alu8::new(), &table);
    assert_eq!(first.outcomes, second.outcomes);
}
