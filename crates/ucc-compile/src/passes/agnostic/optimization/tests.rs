//! Tests for the cancellation pass.

use std::f64::consts::PI;

use ucc_ir::{Circuit, CircuitDag, ClbitId, Instruction, NodeIndex, ParameterExpression, QubitId, StandardGate};

use crate::error::CompileError;
use crate::pass::Pass;
use crate::property::PropertySet;

use super::{CancellationReport, InverseCancellation};

fn run(dag: &mut CircuitDag) -> CancellationReport {
    let mut props = PropertySet::new();
    InverseCancellation::new().run(dag, &mut props).unwrap();
    props.remove::<CancellationReport>().unwrap()
}

fn surviving(dag: &CircuitDag) -> Vec<String> {
    let mut ops: Vec<String> = dag.topological_ops().map(|(_, inst)| format!("{inst:?}")).collect();
    ops.sort();
    ops
}

#[test]
fn test_cancel_cx_adjacent() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap(); // CX·CX = I
    let mut dag = circuit.into_dag();

    let report = run(&mut dag);

    assert_eq!(dag.num_ops(), 0);
    assert_eq!(report.pairs_cancelled, 1);
    assert_eq!(report.gates_removed, 2);
    assert_eq!(report.removed_by_kind.get("cx"), Some(&2));
    assert!(!dag.count_ops().contains_key("cx"));
    dag.verify_integrity().unwrap();
}

#[test]
fn test_cancel_cx_through_rz_on_control() {
    let theta = 0.731;
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.rz(theta, QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    let mut dag = circuit.into_dag();

    run(&mut dag);

    let ops: Vec<_> = dag.topological_ops().map(|(_, inst)| inst.clone()).collect();
    assert_eq!(
        ops,
        vec![Instruction::single_qubit_gate(StandardGate::Rz(theta.into()), QubitId(0))]
    );
    assert_eq!(dag.global_phase(), 0.0);
    assert_eq!(dag.count_ops().get("rz"), Some(&1));
    assert!(!dag.count_ops().contains_key("cx"));
}

#[test]
fn test_rz_on_target_blocks() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.rz(0.5, QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    let mut dag = circuit.into_dag();

    let report = run(&mut dag);

    assert_eq!(dag.num_ops(), 3);
    assert!(report.is_empty());
}

#[test]
fn test_cancel_cx_through_rx_on_target() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.rx(0.5, QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    let mut dag = circuit.into_dag();

    run(&mut dag);

    assert_eq!(dag.num_ops(), 1);
    assert_eq!(dag.count_ops().get("rx"), Some(&1));
}

#[test]
fn test_opaque_gates_block() {
    for blocker in ["h", "measure", "barrier"] {
        let mut circuit = Circuit::with_size("test", 2, 1);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        match blocker {
            "h" => circuit.h(QubitId(0)).unwrap(),
            "measure" => circuit.measure(QubitId(1), ClbitId(0)).unwrap(),
            _ => circuit.barrier([QubitId(0), QubitId(1)]).unwrap(),
        };
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let mut dag = circuit.into_dag();

        run(&mut dag);

        assert_eq!(dag.num_ops(), 3, "{blocker} should block the scan");
    }
}

#[test]
fn test_rotation_pair_cancels() {
    let mut circuit = Circuit::with_size("test", 1, 0);
    circuit.rz(0.4, QubitId(0)).unwrap();
    circuit.rz(-0.4, QubitId(0)).unwrap();
    circuit.rx(1.2, QubitId(0)).unwrap();
    circuit.rx(-1.2, QubitId(0)).unwrap();
    let mut dag = circuit.into_dag();

    let report = run(&mut dag);

    assert_eq!(dag.num_ops(), 0);
    assert_eq!(report.pairs_cancelled, 2);
    assert!(dag.global_phase().abs() < 1e-12 || (dag.global_phase() - 2.0 * PI).abs() < 1e-12);
}

#[test]
fn test_full_turn_pair_adds_phase() {
    // rx(π)·rx(π) = -I
    let mut circuit = Circuit::with_size("test", 1, 0);
    circuit.rx(PI, QubitId(0)).unwrap();
    circuit.rx(PI, QubitId(0)).unwrap();
    let mut dag = circuit.into_dag();

    let report = run(&mut dag);

    assert_eq!(dag.num_ops(), 0);
    assert!((dag.global_phase() - PI).abs() < 1e-9);
    assert!((report.phase_delta.abs() - PI).abs() < 1e-9);
}

#[test]
fn test_equal_rotations_do_not_cancel() {
    let mut circuit = Circuit::with_size("test", 1, 0);
    circuit.rz(0.3, QubitId(0)).unwrap();
    circuit.rz(0.3, QubitId(0)).unwrap();
    let mut dag = circuit.into_dag();

    run(&mut dag);

    assert_eq!(dag.num_ops(), 2);
}

#[test]
fn test_symbolic_rotations_are_opaque() {
    let mut circuit = Circuit::with_size("test", 1, 0);
    circuit.rz(ParameterExpression::symbol("t"), QubitId(0)).unwrap();
    circuit.rz(-ParameterExpression::symbol("t"), QubitId(0)).unwrap();
    let mut dag = circuit.into_dag();

    run(&mut dag);

    assert_eq!(dag.num_ops(), 2);
}

#[test]
fn test_each_gate_cancels_once() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    for _ in 0..3 {
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
    }
    let mut dag = circuit.into_dag();

    let report = run(&mut dag);

    assert_eq!(report.pairs_cancelled, 1);
    assert_eq!(dag.num_ops(), 1);
}

#[test]
fn test_scan_skips_disjoint_gates() {
    let mut circuit = Circuit::with_size("test", 4, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(2), QubitId(3)).unwrap();
    circuit.h(QubitId(3)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    let mut dag = circuit.into_dag();

    run(&mut dag);

    assert_eq!(dag.num_ops(), 2);
    assert_eq!(dag.count_ops().get("cx"), Some(&1));
    assert_eq!(dag.count_ops().get("h"), Some(&1));
}

#[test]
fn test_cx_with_shared_control_is_stepped_over() {
    let mut circuit = Circuit::with_size("test", 3, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(2)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    let mut dag = circuit.into_dag();

    run(&mut dag);

    let ops: Vec<_> = dag.topological_ops().map(|(_, inst)| inst.qubits.clone()).collect();
    assert_eq!(ops, vec![vec![QubitId(0), QubitId(2)]]);
}

#[test]
fn test_classical_operands_must_match() {
    let mut dag = CircuitDag::new();
    dag.add_qubit(QubitId(0));
    dag.add_qubit(QubitId(1));
    dag.add_clbit(ClbitId(0));
    let cx = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1));
    dag.apply(cx.clone().with_clbits([ClbitId(0)])).unwrap();
    dag.apply(cx.clone()).unwrap();

    run(&mut dag);
    assert_eq!(dag.num_ops(), 2);

    dag.apply(cx.with_clbits([ClbitId(0)])).unwrap();
    run(&mut dag);
    // The two gates carrying c0 pair up across the plain one.
    assert_eq!(dag.num_ops(), 1);
    let (_, remaining) = dag.topological_ops().next().unwrap();
    assert!(remaining.clbits.is_empty());
}

#[test]
fn test_report_accumulates_across_runs() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(1), QubitId(0)).unwrap();
    circuit.cx(QubitId(1), QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    let mut dag = circuit.into_dag();

    let pass = InverseCancellation::new();
    let mut props = PropertySet::new();
    // The inner pair goes first, which exposes the outer pair to the same scan.
    pass.run(&mut dag, &mut props).unwrap();
    assert_eq!(dag.num_ops(), 0);

    let cx = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1));
    dag.apply(cx.clone()).unwrap();
    dag.apply(cx).unwrap();
    pass.run(&mut dag, &mut props).unwrap();
    assert_eq!(dag.num_ops(), 0);

    let report = props.get::<CancellationReport>().unwrap();
    assert_eq!(report.pairs_cancelled, 3);
    assert_eq!(report.gates_removed, 6);
    assert_eq!(report.removed_by_kind.get("cx"), Some(&6));
}

#[test]
fn test_linearization_does_not_matter() {
    let mut circuit = Circuit::with_size("test", 3, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.rz(0.2, QubitId(2)).unwrap();
    circuit.rz(0.9, QubitId(0)).unwrap();
    circuit.cx(QubitId(2), QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.rz(-0.2, QubitId(2)).unwrap();
    circuit.rx(0.3, QubitId(1)).unwrap();
    circuit.cx(QubitId(2), QubitId(1)).unwrap();
    let dag = circuit.into_dag();

    let by_name: Vec<NodeIndex> = dag
        .lexicographical_topological_ops(|inst| inst.name().to_string())
        .into_iter()
        .map(|(node, _)| node)
        .collect();
    let by_first_qubit: Vec<NodeIndex> = dag
        .lexicographical_topological_ops(|inst| std::cmp::Reverse(inst.qubits.first().copied()))
        .into_iter()
        .map(|(node, _)| node)
        .collect();
    assert_ne!(by_name, by_first_qubit);

    let pass = InverseCancellation::new();
    let mut a = dag.clone();
    let mut b = dag.clone();
    pass.cancel_along(&mut a, &by_name).unwrap();
    pass.cancel_along(&mut b, &by_first_qubit).unwrap();

    assert_eq!(surviving(&a), surviving(&b));
    assert!((a.global_phase() - b.global_phase()).abs() < 1e-12);
}

#[test]
fn test_rejects_invalid_linearization() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.h(QubitId(1)).unwrap();
    let mut dag = circuit.into_dag();

    let mut order = dag.topological_op_nodes();
    order.reverse();
    let result = InverseCancellation::new().cancel_along(&mut dag, &order);
    assert!(matches!(result, Err(CompileError::InvalidLinearization(_))));

    order.pop();
    let result = InverseCancellation::new().cancel_along(&mut dag, &order);
    assert!(matches!(result, Err(CompileError::InvalidLinearization(_))));
    assert_eq!(dag.num_ops(), 2);
}

#[test]
fn test_rejects_bad_tolerance() {
    let mut dag = Circuit::bell().unwrap().into_dag();
    for tolerance in [0.0, -1e-9, f64::NAN, f64::INFINITY] {
        let result = InverseCancellation::new().with_tolerance(tolerance).run(&mut dag, &mut PropertySet::new());
        assert!(matches!(result, Err(CompileError::InvalidConfiguration(_))));
    }
}

#[test]
fn test_tolerance_controls_near_inverse() {
    let build = || {
        let mut circuit = Circuit::with_size("test", 1, 0);
        circuit.rz(0.5, QubitId(0)).unwrap();
        circuit.rz(-0.5 + 1e-6, QubitId(0)).unwrap();
        circuit.into_dag()
    };

    let mut strict = build();
    InverseCancellation::new().run(&mut strict, &mut PropertySet::new()).unwrap();
    assert_eq!(strict.num_ops(), 2);

    let mut loose = build();
    InverseCancellation::new()
        .with_tolerance(1e-5)
        .run(&mut loose, &mut PropertySet::new())
        .unwrap();
    assert_eq!(loose.num_ops(), 0);
}

#[test]
fn test_report_json() {
    let mut circuit = Circuit::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    let mut dag = circuit.into_dag();

    let report = run(&mut dag);
    let json = report.to_json().unwrap();
    let back: CancellationReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
    assert!(json.contains("\"pairs_cancelled\": 1"));
}
