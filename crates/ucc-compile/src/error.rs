//! Failures surfaced by passes and the pass manager.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    #[error(transparent)]
    Ir(#[from] ucc_ir::IrError),

    /// `inverse_of` only compares gates placed on the same wires.
    #[error("cannot compare gates on different operands: {left} vs {right}")]
    OperandMismatch { left: String, right: String },

    /// A caller-supplied node order breaks some wire's order.
    #[error("node order is not a topological order of the circuit: {0}")]
    InvalidLinearization(String),

    #[error("bad pass setting: {0}")]
    InvalidConfiguration(String),

    #[error("could not encode report: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CompileResult<T> = Result<T, CompileError>;
