//! UCC Compilation Framework
//!
//! This crate provides the pass infrastructure of the compiler and its
//! gate-cancellation passes. Passes operate on a [`CircuitDag`] and
//! communicate through a typed [`PropertySet`].
//!
//! # Overview
//!
//! The central transformation is [`passes::InverseCancellation`]: it walks
//! the operations of a circuit in topological order and removes pairs of
//! gates that undo each other, looking past gates that commute with them.
//! Removing a pair may leave a global phase behind; it is added to the
//! circuit so the result stays unitarily equivalent to the input.
//!
//! ```text
//! Input Circuit
//!       |
//!       v
//! +-------------+
//! | PassManager | <-- PropertySet (reports, op counts)
//! +-------------+
//!       |
//!       |-- InverseCancellation / FixedPoint(InverseCancellation)
//!       |-- IntegrityCheck
//!       '-- CountOps
//!       |
//!       v
//! Output Circuit (fewer gates, same action)
//! ```
//!
//! # Example
//!
//! ```rust
//! use ucc_compile::PassManagerBuilder;
//! use ucc_compile::passes::CancellationReport;
//! use ucc_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("demo", 2, 0);
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.rz(0.5, QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_optimization_level(2)
//!     .build();
//!
//! let mut dag = circuit.into_dag();
//! pm.run(&mut dag, &mut props).unwrap();
//!
//! assert_eq!(dag.num_ops(), 1);
//! assert_eq!(props.get::<CancellationReport>().unwrap().pairs_cancelled, 1);
//! ```
//!
//! # Optimization Levels
//!
//! | Level | Passes Included |
//! |-------|-----------------|
//! | 0 | Integrity check and op counts only |
//! | 1 | + one cancellation scan |
//! | 2, 3 | cancellation repeated until the gate count stops dropping |
//!
//! # Cancellation Basis
//!
//! The oracles know three gates: `cx`, `rx` and `rz` with numeric angles.
//! Every other operation (other gates, symbolic or conditioned gates,
//! measurements, resets, barriers) is opaque: it is never removed and the
//! scan never looks past it.
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to create custom compilation passes:
//!
//! ```rust
//! use ucc_compile::{Pass, PassKind, CompileResult, PropertySet};
//! use ucc_ir::CircuitDag;
//!
//! struct MyCustomPass;
//!
//! impl Pass for MyCustomPass {
//!     fn name(&self) -> &str { "my_custom_pass" }
//!     fn kind(&self) -> PassKind { PassKind::Transformation }
//!
//!     fn run(&self, dag: &mut CircuitDag, props: &mut PropertySet) -> CompileResult<()> {
//!         // Your pass logic here
//!         Ok(())
//!     }
//! }
//! ```
//!
//! [`CircuitDag`]: ucc_ir::CircuitDag

pub mod error;
pub mod manager;
pub mod pass;
pub mod property;
pub mod unitary;

// Built-in passes
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use passes::agnostic::optimization::{commute, inverse_of};
pub use property::PropertySet;
pub use unitary::Unitary;
