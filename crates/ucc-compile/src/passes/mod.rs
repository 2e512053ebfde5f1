//! Built-in compilation passes.
//!
//! All passes here are target-agnostic: they operate purely on DAG
//! structure and gate algebra, without a coupling map or native basis.

pub mod agnostic;

pub use agnostic::{
    BasisGate, CancellationReport, CountOps, FixedPoint, FixedPointReport, GateDescriptor,
    IntegrityCheck, InverseCancellation, OpCounts,
};
