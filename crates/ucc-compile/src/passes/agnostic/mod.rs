//! Target-agnostic compilation passes.
//!
//! These passes operate purely on the DAG structure without consulting
//! hardware properties. They are safe to run on any circuit.

pub mod analysis;
pub mod fixed_point;
pub mod optimization;

pub use analysis::{CountOps, IntegrityCheck, OpCounts};
pub use fixed_point::{FixedPoint, FixedPointReport};
pub use optimization::{BasisGate, CancellationReport, GateDescriptor, InverseCancellation};
