//! # Property Tests
//!
//! Random operands and random tables: oracles are total, runs are
//! deterministic, accounting always adds up, and the reference models agree
//! with their oracles everywhere.

use proptest::prelude::*;
use rtlbench_core::common::StatusFlags;
use rtlbench_core::dut::{Alu8, FpAlu32};
use rtlbench_core::ops::{Alu8Op, CheckPolicy, Fp32Op, OperandKind, Operation};
use rtlbench_core::oracle::float::CANONICAL_NAN;
use rtlbench_core::vector::{Vector, VectorTable};

use crate::common::harness::TestContext;

fn alu8_op() -> impl Strategy<Value = Alu8Op> {
    prop::sample::select(Alu8Op::ALL)
}

fn fp32_op() -> impl Strategy<Value = Fp32Op> {
    prop::sample::select(Fp32Op::ALL)
}

fn alu8_vector() -> impl Strategy<Value = Vector<Alu8Op>> {
    (alu8_op(), 0..=0xFFu32, 0..=0xFFu32, any::<bool>()).prop_map(|(op, a, b, flags)| {
        let v = Vector::new(op, a, b);
        if flags { v.check(StatusFlags::ZERO | StatusFlags::CARRY | StatusFlags::OVERFLOW) } else { v }
    })
}

/// A vector with an arbitrary, usually wrong, precomputed result.
fn noisy_alu8_vector() -> impl Strategy<Value = Vector<Alu8Op>> {
    (alu8_vector(), prop::option::of(0..=0xFFu32)).prop_map(|(v, expected)| match expected {
        Some(e) => v.expect(e),
        None => v,
    })
}

proptest! {
    #[test]
    fn prop_alu8_oracle_is_total(op in alu8_op(), a in any::<u32>(), b in any::<u32>()) {
        let e = op.oracle(a, b).unwrap();
        prop_assert!(e.result <= 0xFF);
        let flags = e.flags.unwrap();
        prop_assert_eq!(flags.contains(StatusFlags::ZERO), e.result == 0);
    }

    #[test]
    fn prop_fp32_oracle_is_total(op in fp32_op(), a in any::<u32>(), b in any::<u32>()) {
        match op.oracle(a, b) {
            Some(e) => {
                if op.descriptor().operands == OperandKind::Float && f32::from_bits(e.result).is_nan() {
                    prop_assert_eq!(e.result, CANONICAL_NAN);
                }
                prop_assert_eq!(op.oracle(a, b), Some(e));
            }
            None => prop_assert_eq!(op, Fp32Op::Complement),
        }
    }

    #[test]
    fn prop_alu8_model_agrees_with_oracle(vectors in prop::collection::vec(alu8_vector(), 1..40)) {
        let ctx = TestContext::new();
        let table = VectorTable::new("random", vectors);
        let report = ctx.run(Alu8::new(), &table);
        prop_assert_eq!(report.fail_count, 0);
        prop_assert_eq!(report.pass_count, table.len());
    }

    #[test]
    fn prop_fp32_model_agrees_with_oracle(
        vectors in prop::collection::vec((fp32_op(), any::<u32>(), any::<u32>()), 1..40)
    ) {
        let ctx = TestContext::new();
        let mask = StatusFlags::OVERFLOW | StatusFlags::UNDERFLOW | StatusFlags::EXCEPTION;
        let vectors = vectors
            .into_iter()
            .map(|(op, a, b)| Vector::new(op, a, b).check(mask))
            .collect();
        let table = VectorTable::new("random", vectors);
        let report = ctx.run(FpAlu32::new(), &table);
        prop_assert_eq!(report.fail_count, 0);
    }

    #[test]
    fn prop_accounting_adds_up(vectors in prop::collection::vec(noisy_alu8_vector(), 0..40)) {
        let ctx = TestContext::new();
        let table = VectorTable::new("noisy", vectors);
        let report = ctx.run(Alu8::new(), &table);
        prop_assert_eq!(report.pass_count + report.fail_count, table.len());
        prop_assert_eq!(report.outcomes.len(), table.len());
        prop_assert_eq!(report.exit_code(), u8::from(report.fail_count > 0));
        for (i, outcome) in report.outcomes.iter().enumerate() {
            prop_assert_eq!(outcome.index, i);
            let matches = outcome.judgement.expected_result.is_none_or(|e| e == outcome.observed.result)
                && outcome.judgement.expected_flags.is_none_or(|e| {
                    let mask = table.vectors()[i].check_flags();
                    e == outcome.observed.flags & mask
                });
            prop_assert_eq!(outcome.passed(), matches);
        }
    }

    #[test]
    fn prop_runs_are_deterministic(vectors in prop::collection::vec(noisy_alu8_vector(), 1..20)) {
        let ctx = TestContext::new();
        let table = VectorTable::new("noisy", vectors);
        let first = ctx.run(Alu8::new(), &table);
        let second = ctx.run(Alu8::new(), &table);
        prop_assert_eq!(first.outcomes, second.outcomes);
    }

    #[test]
    fn prop_unchecked_always_passes(a in any::<u32>(), b in any::<u32>(), expected in any::<u32>()) {
        let ctx = TestContext::new();
        let vectors = Fp32Op::ALL
            .iter()
            .filter(|op| op.policy() == CheckPolicy::Unchecked)
            .map(|&op| Vector::new(op, a, b).expect(expected))
            .collect();
        let table = VectorTable::new("unchecked", vectors);
        let report = ctx.run(FpAlu32::new(), &table);
        prop_assert_eq!(report.fail_count, 0);
        prop_assert_eq!(report.pass_count, 4);
    }
}
