//! # DUT Adapter Tests
//!
//! Tests for the apply/settle/read protocol and for the behavioral models
//! driven through it.

use pretty_assertions::assert_eq;
use rstest::rstest;
use rtlbench_core::common::{SettleError, StatusFlags, f32_bits};
use rtlbench_core::dut::{Alu8, Dut, DutAdapter, FpAlu32, InputRegisters, OutputRegisters, Propagation, Signal};
use rtlbench_core::ops::{Alu8Op, Fp32Op, Operation};

use crate::common::mocks::dut::{ConstantDut, OscillatingDut};

fn drive<O: Operation>(dut: impl Dut + 'static, op: O, a: u32, b: u32) -> OutputRegisters {
    let mut adapter = DutAdapter::<O>::new(Box::new(dut), 4);
    adapter.apply(a, b, op);
    adapter.settle().unwrap();
    adapter.read().unwrap()
}

#[test]
fn test_read_before_settle_is_none() {
    let mut adapter = DutAdapter::<Alu8Op>::new(Box::new(Alu8::new()), 4);
    assert_eq!(adapter.read(), None);
    adapter.apply(1, 1, Alu8Op::Add);
    adapter.settle().unwrap();
    assert!(adapter.read().is_some());
    adapter.apply(2, 2, Alu8Op::Add);
    assert_eq!(adapter.snapshot(), None);
}

#[test]
fn test_settle_reports_passes() {
    let mut adapter = DutAdapter::<Alu8Op>::new(Box::new(ConstantDut::new(0, StatusFlags::NONE).with_passes(3)), 4);
    adapter.apply(0, 0, Alu8Op::Add);
    assert_eq!(adapter.settle(), Ok(3));
}

#[test]
fn test_settle_limit_of_zero_still_evaluates_once() {
    let mut adapter = DutAdapter::<Alu8Op>::new(Box::new(ConstantDut::new(0, StatusFlags::NONE)), 0);
    adapter.apply(0, 0, Alu8Op::Add);
    assert_eq!(adapter.settle(), Ok(1));

    let mut adapter = DutAdapter::<Alu8Op>::new(Box::new(OscillatingDut::new()), 0);
    adapter.apply(0, 0, Alu8Op::Add);
    assert!(matches!(adapter.settle(), Err(SettleError::NonConvergent { iterations: 1, .. })));
}

#[test]
fn test_oscillator_never_settles() {
    let dut = OscillatingDut::new();
    let evals = dut.evals();
    let mut adapter = DutAdapter::<Alu8Op>::new(Box::new(dut), 5);
    adapter.apply(0, 0, Alu8Op::Add);
    assert_eq!(
        adapter.settle(),
        Err(SettleError::NonConvergent {
            dut: "oscillator".into(),
            iterations: 5
        })
    );
    assert_eq!(evals.get(), 5);
    assert_eq!(adapter.read(), None);
}

#[test]
fn test_outputs_masked_to_driven_ports() {
    let ports = FpAlu32::new().ports();
    let out = drive(
        ConstantDut::new(0xFFFF_FFFF, StatusFlags::ALL).with_ports(ports),
        Fp32Op::Or,
        0,
        0,
    );
    assert_eq!(out.flags, ports.flags);

    let narrow = drive(ConstantDut::new(0x1FF, StatusFlags::NONE), Alu8Op::Or, 0, 0);
    assert_eq!(narrow.result, 0xFF);
}

#[test]
fn test_snapshot_carries_applied_inputs() {
    let mut adapter = DutAdapter::<Alu8Op>::new(Box::new(Alu8::new()), 4);
    adapter.apply(0x0F, 0xF0, Alu8Op::Or);
    adapter.settle().unwrap();
    let snapshot = adapter.snapshot().unwrap();
    assert_eq!(
        snapshot.inputs,
        InputRegisters {
            a: 0x0F,
            b: 0xF0,
            opcode: 3
        }
    );
    assert_eq!(snapshot.outputs.result, 0xFF);
    assert_eq!(snapshot.values(&adapter.ports()), vec![0x0F, 0xF0, 3, 0xFF, 0, 0, 0]);
}

#[test]
fn test_alu8_signals() {
    let signals = Alu8::new().ports().signals();
    let names: Vec<&str> = signals.iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["a", "b", "op", "result", "zero", "carry", "overflow"]);
    assert_eq!(signals[2], Signal { name: "op", width: 3 });
}

#[test]
fn test_model_is_stable_after_one_change() {
    let mut alu = Alu8::new();
    alu.poke(InputRegisters { a: 1, b: 2, opcode: 0 });
    assert_eq!(alu.eval(), Propagation::Changed);
    assert_eq!(alu.eval(), Propagation::Stable);
    assert_eq!(alu.peek().result, 3);
}

#[rstest]
#[case::add(Alu8Op::Add, 0x7F, 0x01, 0x80, StatusFlags::OVERFLOW)]
#[case::sub(Alu8Op::Sub, 0x00, 0x01, 0xFF, StatusFlags::CARRY)]
#[case::not(Alu8Op::Not, 0xFF, 0x00, 0x00, StatusFlags::ZERO)]
#[case::shr(Alu8Op::Shr, 0x80, 0x07, 0x01, StatusFlags::NONE)]
fn test_alu8_model(#[case] op: Alu8Op, #[case] a: u32, #[case] b: u32, #[case] result: u32, #[case] flags: StatusFlags) {
    assert_eq!(drive(Alu8::new(), op, a, b), OutputRegisters { result, flags });
}

#[rstest]
#[case::add(Fp32Op::Add, f32_bits(1.0), f32_bits(2.0), f32_bits(3.0), StatusFlags::NONE)]
#[case::div_by_zero(Fp32Op::Div, f32_bits(1.0), 0, f32_bits(f32::INFINITY), StatusFlags::EXCEPTION)]
#[case::fp2int(Fp32Op::Fp2Int, f32_bits(10.5), 0, 10, StatusFlags::NONE)]
#[case::shl(Fp32Op::Shl, 0x8000_0001, 0, 0x0000_0002, StatusFlags::NONE)]
#[case::complement_is_logical(Fp32Op::Complement, 0xAAAA_AAAA, 0, 0, StatusFlags::NONE)]
fn test_fp_alu32_model(#[case] op: Fp32Op, #[case] a: u32, #[case] b: u32, #[case] result: u32, #[case] flags: StatusFlags) {
    assert_eq!(drive(FpAlu32::new(), op, a, b), OutputRegisters { result, flags });
}

#[test]
fn test_fp_alu32_invalid_opcode_raises_exception() {
    let mut alu = FpAlu32::new();
    alu.poke(InputRegisters { a: 1, b: 1, opcode: 0 });
    while alu.eval() == Propagation::Changed {}
    assert_eq!(
        alu.peek(),
        OutputRegisters {
            result: 0,
            flags: StatusFlags::EXCEPTION
        }
    );
}
