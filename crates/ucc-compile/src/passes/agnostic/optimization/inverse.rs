//! Inverse detection for pairs of gates on the same operands.

use crate::error::{CompileError, CompileResult};

use super::basis::GateDescriptor;

/// Default tolerance of the inverse check.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Whether `b` undoes `a` up to a global phase.
///
/// `a` is the earlier gate. The pair cancels when the action of `a` followed
/// by `b`, `M_b · M_a`, equals `e^{iφ}·I` within `tolerance`; then `Some(φ)`
/// is returned and removing both gates must add `φ` to the circuit's global
/// phase. Opaque gates are never inverses.
///
/// # Errors
///
/// Returns [`CompileError::OperandMismatch`] if the two gates do not act on
/// identical qubit and classical operands.
pub fn inverse_of(
    a: &GateDescriptor<'_>,
    b: &GateDescriptor<'_>,
    tolerance: f64,
) -> CompileResult<Option<f64>> {
    if !a.same_operands(b) {
        return Err(CompileError::OperandMismatch {
            left: a.to_string(),
            right: b.to_string(),
        });
    }
    let (Some(ma), Some(mb)) = (a.matrix(), b.matrix()) else {
        return Ok(None);
    };
    if ma.dim() != mb.dim() {
        return Ok(None);
    }
    Ok(mb.mul(&ma).scalar_identity_phase(tolerance))
}
