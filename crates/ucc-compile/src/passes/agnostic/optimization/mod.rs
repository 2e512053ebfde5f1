//! Gate-cancellation passes and the oracles they consult.

mod basis;
mod cancel;
mod commutation;
mod inverse;

#[cfg(test)]
mod tests;

pub use basis::{BasisGate, GateDescriptor};
pub use cancel::{CancellationReport, InverseCancellation};
pub use commutation::commute;
pub use inverse::{DEFAULT_TOLERANCE, inverse_of};
