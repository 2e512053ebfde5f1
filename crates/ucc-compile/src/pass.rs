//! The interface every compiler pass implements.

use ucc_ir::CircuitDag;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// Whether a pass may rewrite the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Leaves the circuit alone; only publishes properties.
    Analysis,
    Transformation,
}

/// One step of a pipeline.
///
/// A pass owns the circuit only while `run` executes. Anything it wants later
/// passes to see goes into the [`PropertySet`].
pub trait Pass: Send + Sync {
    /// Name shown in logs and pipeline listings.
    fn name(&self) -> &str;

    fn kind(&self) -> PassKind;

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()>;

    /// Lets a pass opt out based on what earlier passes found.
    fn should_run(&self, _dag: &CircuitDag, _properties: &PropertySet) -> bool {
        true
    }
}
