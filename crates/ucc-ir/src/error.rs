//! Failures raised while building or editing a circuit graph.

use thiserror::Error;

use crate::dag::WireId;
use crate::qubit::{ClbitId, QubitId};

/// Ways a circuit graph edit can be rejected.
///
/// Every variant that concerns an incoming instruction carries that
/// instruction's name in `op`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// The instruction names a wire the graph never declared.
    #[error("`{op}` touches undeclared wire {wire}")]
    UnknownWire { op: String, wire: WireId },

    /// The same qubit is listed twice among one instruction's operands.
    #[error("`{op}` lists qubit {qubit} more than once")]
    RepeatedQubit { op: String, qubit: QubitId },

    /// The same classical bit is listed twice among one instruction's operands.
    #[error("`{op}` lists classical bit {clbit} more than once")]
    RepeatedClbit { op: String, clbit: ClbitId },

    /// Operand count disagrees with the gate's arity.
    #[error("`{op}` acts on {expected} qubit(s) but was handed {got}")]
    ArityMismatch { op: String, expected: u32, got: u32 },

    /// The node index is stale or names an input/output node.
    #[error("node is not a live operation")]
    InvalidNode,

    /// Wire bookkeeping no longer agrees with the graph.
    #[error("circuit graph is malformed: {0}")]
    InvalidDag(String),
}

pub type IrResult<T> = Result<T, IrError>;
