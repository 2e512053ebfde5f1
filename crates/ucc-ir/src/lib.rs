//! UCC Circuit Intermediate Representation
//!
//! Core data structures the UCC optimizer works on: gates, instructions and
//! the circuit graph.
//!
//! # Overview
//!
//! A circuit is held as a DAG ([`CircuitDag`]) whose nodes live in a stable
//! arena. Each qubit and classical bit is a wire running from an input node to
//! an output node through every operation that touches it, in program order.
//! Passes can remove operations without invalidating the indices of any other
//! node, and the DAG keeps a running count of operations by name together with
//! the circuit's global phase.
//!
//! The [`Circuit`] builder is the convenient way to construct a DAG.
//!
//! # Example
//!
//! ```rust
//! use ucc_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("pair", 2, 0);
//! circuit
//!     .cx(QubitId(0), QubitId(1))
//!     .unwrap()
//!     .cx(QubitId(0), QubitId(1))
//!     .unwrap();
//!
//! let dag = circuit.into_dag();
//! assert_eq!(dag.count_ops().get("cx"), Some(&2));
//! dag.verify_integrity().unwrap();
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I`, `X`, `Y`, `Z` | 1 | Identity and Pauli gates |
//! | `H` | 1 | Hadamard gate |
//! | `S`, `Sdg`, `T`, `Tdg`, `SX` | 1 | Fixed phase and sqrt(X) gates |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `CX`, `CY`, `CZ` | 2 | Controlled Pauli gates |
//! | `Swap`, `CP` | 2 | SWAP and controlled phase |
//! | `CCX` | 3 | Toffoli gate |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, CustomGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use parameter::{BinOp, ParameterExpression};
pub use qubit::{ClbitId, QubitId};
