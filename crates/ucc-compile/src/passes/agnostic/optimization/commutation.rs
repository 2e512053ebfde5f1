//! Commutation rules for the cancellation basis.

use super::basis::{BasisGate, GateDescriptor};

/// Whether `a` and `b` commute.
///
/// Gates on fully disjoint operands (qubits and classical bits) always
/// commute. Overlapping gates are looked up in a fixed table:
///
/// | a | b | commute iff |
/// |---|---|---|
/// | CX | CX | no qubit is the control of one and the target of the other |
/// | CX | RZ | the RZ acts on the CX control |
/// | CX | RX | the RX acts on the CX target |
///
/// and symmetrically. Every other overlapping pair, and every pair involving
/// an opaque gate, does not commute. A gate without qubit operands is a hard
/// boundary, as is a basis gate whose operand count does not match its
/// arity.
///
/// The table is incomplete on purpose: it may answer `false` for gates that
/// do commute, never `true` for gates that do not.
pub fn commute(a: &GateDescriptor<'_>, b: &GateDescriptor<'_>) -> bool {
    if !well_formed(a) || !well_formed(b) {
        return false;
    }
    if disjoint(a, b) {
        return true;
    }

    match (a.kind, b.kind) {
        (BasisGate::Opaque, _) | (_, BasisGate::Opaque) => false,
        (BasisGate::CX, BasisGate::CX) => {
            a.qubits[0] != b.qubits[1] && a.qubits[1] != b.qubits[0]
        }
        (BasisGate::CX, BasisGate::Rz(_)) => b.qubits[0] == a.qubits[0],
        (BasisGate::Rz(_), BasisGate::CX) => a.qubits[0] == b.qubits[0],
        (BasisGate::CX, BasisGate::Rx(_)) => b.qubits[0] == a.qubits[1],
        (BasisGate::Rx(_), BasisGate::CX) => a.qubits[0] == b.qubits[1],
        _ => false,
    }
}

fn well_formed(d: &GateDescriptor<'_>) -> bool {
    !d.qubits.is_empty() && d.kind.num_qubits().is_none_or(|n| n == d.qubits.len())
}

fn disjoint(a: &GateDescriptor<'_>, b: &GateDescriptor<'_>) -> bool {
    a.qubits.iter().all(|q| !b.qubits.contains(q)) && a.clbits.iter().all(|c| !b.clbits.contains(c))
}
