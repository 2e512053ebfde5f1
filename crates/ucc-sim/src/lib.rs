//! `ucc-sim` is a dense statevector simulator for small circuits.
//!
//! It exists to check that circuit rewrites preserve behaviour: two DAGs are
//! equivalent when they map the same inputs to the same outputs, global phase
//! included.
//!
//! # Quick start
//!
//! ```rust
//! use ucc_ir::{Circuit, QubitId};
//! use ucc_sim::Statevector;
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let state = Statevector::from_dag(circuit.dag()).unwrap();
//! assert!((state.amplitudes()[3].norm_sqr() - 0.5).abs() < 1e-12);
//! ```

pub mod error;
pub mod statevector;

pub use error::{SimError, SimResult};
pub use statevector::{MAX_QUBITS, Statevector};

use ucc_ir::CircuitDag;

/// Check that two DAGs on the same register act identically on every
/// computational basis state, global phase included.
///
/// Cost grows as `4^n`; meant for registers of a dozen qubits or fewer.
pub fn unitary_equivalent(a: &CircuitDag, b: &CircuitDag, tol: f64) -> SimResult<bool> {
    if a.num_qubits() != b.num_qubits() {
        return Ok(false);
    }
    let n = a.num_qubits();
    if n > MAX_QUBITS {
        return Err(SimError::TooManyQubits {
            num_qubits: n,
            max: MAX_QUBITS,
        });
    }
    for index in 0..(1usize << n) {
        let mut left = Statevector::from_basis_state(n, index)?;
        let mut right = left.clone();
        left.run_dag(a)?;
        right.run_dag(b)?;
        if !left.approx_eq(&right, tol) {
            return Ok(false);
        }
    }
    Ok(true)
}
