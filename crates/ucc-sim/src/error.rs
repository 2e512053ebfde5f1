//! Error types for the sim crate.

use thiserror::Error;
use ucc_ir::QubitId;

/// Errors produced while simulating a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The register is too large to hold as a dense statevector.
    #[error("Cannot simulate {num_qubits} qubits (limit is {max})")]
    TooManyQubits {
        /// Requested number of qubits.
        num_qubits: usize,
        /// Largest supported register.
        max: usize,
    },

    /// The instruction is not a unitary this simulator knows.
    #[error("Cannot simulate instruction '{0}'")]
    UnsupportedInstruction(String),

    /// A rotation angle is still symbolic.
    #[error("Gate '{0}' has an unbound parameter")]
    SymbolicParameter(String),

    /// A classically conditioned gate was encountered.
    #[error("Gate '{0}' is classically conditioned")]
    ConditionedGate(String),

    /// An instruction refers to a qubit outside the simulated register.
    #[error("Qubit {0} is not part of the simulated register")]
    UnknownQubit(QubitId),

    /// Amplitude vector length is not a power of two, or lengths differ.
    #[error("Invalid amplitude vector of length {0}")]
    InvalidAmplitudes(usize),
}

/// Result type for simulation.
pub type SimResult<T> = Result<T, SimError>;
