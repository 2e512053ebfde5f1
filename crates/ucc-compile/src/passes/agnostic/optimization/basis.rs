//! Gate descriptors: what the cancellation oracles know about an instruction.

use std::fmt;

use ucc_ir::{ClbitId, Instruction, QubitId, StandardGate};

use crate::unitary::Unitary;

/// The closed gate basis the cancellation oracles reason about.
///
/// Anything the oracles have no closed-form knowledge of is `Opaque`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BasisGate {
    /// Controlled-X. Operand 0 is the control, operand 1 the target.
    CX,
    /// Rotation around X by a concrete angle.
    Rx(f64),
    /// Rotation around Z by a concrete angle.
    Rz(f64),
    /// Any other operation. Never analyzed, never removed.
    Opaque,
}

impl BasisGate {
    /// Short name, matching the IR gate names.
    pub fn name(&self) -> &'static str {
        match self {
            BasisGate::CX => "cx",
            BasisGate::Rx(_) => "rx",
            BasisGate::Rz(_) => "rz",
            BasisGate::Opaque => "opaque",
        }
    }

    /// True for [`BasisGate::Opaque`].
    #[inline]
    pub fn is_opaque(&self) -> bool {
        matches!(self, BasisGate::Opaque)
    }

    /// Number of qubit operands, `None` for opaque gates.
    pub fn num_qubits(&self) -> Option<usize> {
        match self {
            BasisGate::CX => Some(2),
            BasisGate::Rx(_) | BasisGate::Rz(_) => Some(1),
            BasisGate::Opaque => None,
        }
    }
}

/// A gate as seen by the oracles: its basis kind and its operands.
///
/// Borrows the operands from the instruction it describes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateDescriptor<'a> {
    /// Basis kind.
    pub kind: BasisGate,
    /// Ordered qubit operands.
    pub qubits: &'a [QubitId],
    /// Ordered classical operands.
    pub clbits: &'a [ClbitId],
}

impl<'a> GateDescriptor<'a> {
    /// Describe a gate directly.
    pub fn new(kind: BasisGate, qubits: &'a [QubitId], clbits: &'a [ClbitId]) -> Self {
        Self {
            kind,
            qubits,
            clbits,
        }
    }

    /// Classify an IR instruction.
    ///
    /// `cx`, `rx` and `rz` map to their basis kinds when they are
    /// unconditioned, have the right number of operands and, for rotations,
    /// a finite numeric angle. Everything else is opaque.
    pub fn from_instruction(instruction: &'a Instruction) -> Self {
        Self::new(
            classify(instruction),
            &instruction.qubits,
            &instruction.clbits,
        )
    }

    /// Unitary of the gate on its own operands; `None` for opaque gates.
    pub fn matrix(&self) -> Option<Unitary> {
        match self.kind {
            BasisGate::CX => Some(Unitary::cx()),
            BasisGate::Rx(theta) => Some(Unitary::rx(theta)),
            BasisGate::Rz(theta) => Some(Unitary::rz(theta)),
            BasisGate::Opaque => None,
        }
    }

    /// Same qubit and classical operands, in the same order.
    pub fn same_operands(&self, other: &GateDescriptor<'_>) -> bool {
        self.qubits == other.qubits && self.clbits == other.clbits
    }
}

impl fmt::Display for GateDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.name())?;
        let qubits: Vec<String> = self.qubits.iter().map(ToString::to_string).collect();
        write!(f, "({})", qubits.join(", "))?;
        if !self.clbits.is_empty() {
            let clbits: Vec<String> = self.clbits.iter().map(ToString::to_string).collect();
            write!(f, "[{}]", clbits.join(", "))?;
        }
        Ok(())
    }
}

fn classify(instruction: &Instruction) -> BasisGate {
    let Some(gate) = instruction.as_gate() else {
        return BasisGate::Opaque;
    };
    if gate.condition.is_some() {
        return BasisGate::Opaque;
    }
    let angle = |p: &ucc_ir::ParameterExpression| p.as_f64().filter(|v| v.is_finite());

    let kind = match gate.as_standard() {
        Some(StandardGate::CX) => Some(BasisGate::CX),
        Some(StandardGate::Rx(p)) => angle(p).map(BasisGate::Rx),
        Some(StandardGate::Rz(p)) => angle(p).map(BasisGate::Rz),
        _ => None,
    };

    match kind {
        Some(kind) if kind.num_qubits() == Some(instruction.qubits.len()) => kind,
        _ => BasisGate::Opaque,
    }
}
