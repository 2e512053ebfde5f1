//! One placed operation: what it does and which wires it acts on.

use serde::{Deserialize, Serialize};

use crate::gate::{Gate, StandardGate};
use crate::qubit::{ClbitId, QubitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    Gate(Gate),
    /// Reads each qubit into the classical bit at the same position.
    Measure,
    /// Returns a qubit to |0⟩.
    Reset,
    /// Ordering fence with no action of its own.
    Barrier,
}

/// An operation with its ordered operands.
///
/// Operand order is significant: for `cx` the first qubit is the control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub qubits: Vec<QubitId>,
    #[serde(default)]
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    fn on(kind: InstructionKind, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind,
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::on(InstructionKind::Gate(gate.into()), qubits)
    }

    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Operands in gate order, e.g. control then target.
    pub fn two_qubit_gate(gate: StandardGate, first: QubitId, second: QubitId) -> Self {
        Self::gate(gate, [first, second])
    }

    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self::on(InstructionKind::Measure, [qubit]).with_clbits([clbit])
    }

    pub fn reset(qubit: QubitId) -> Self {
        Self::on(InstructionKind::Reset, [qubit])
    }

    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::on(InstructionKind::Barrier, qubits)
    }

    /// Replace the classical operands, e.g. with the bits a conditioned gate
    /// reads.
    #[must_use]
    pub fn with_clbits(mut self, clbits: impl IntoIterator<Item = ClbitId>) -> Self {
        self.clbits = clbits.into_iter().collect();
        self
    }

    pub fn is_gate(&self) -> bool {
        self.as_gate().is_some()
    }

    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    pub fn as_gate(&self) -> Option<&Gate> {
        if let InstructionKind::Gate(gate) = &self.kind {
            Some(gate)
        } else {
            None
        }
    }

    /// Key under which the operation is counted.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(gate) => gate.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
        }
    }
}
