//! Repeat a transformation pass until it stops shrinking the circuit.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ucc_ir::CircuitDag;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Default iteration cap of [`FixedPoint`].
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// How a [`FixedPoint`] run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedPointReport {
    /// Name of the wrapped pass.
    pub pass: String,
    /// Number of times the wrapped pass ran.
    pub iterations: usize,
    /// False if the iteration cap was hit while ops were still removed.
    pub converged: bool,
}

/// Runs the wrapped pass again and again until the number of operations
/// stops decreasing, or `max_iterations` runs have been made.
pub struct FixedPoint<P> {
    inner: P,
    max_iterations: usize,
    name: String,
}

impl<P: Pass> FixedPoint<P> {
    /// Wrap `inner` with the default iteration cap.
    pub fn new(inner: P) -> Self {
        let name = format!("FixedPoint({})", inner.name());
        Self {
            inner,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            name,
        }
    }

    /// Set the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// The wrapped pass.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Pass> Pass for FixedPoint<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PassKind {
        self.inner.kind()
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        if self.max_iterations == 0 {
            return Err(CompileError::InvalidConfiguration(
                "max_iterations must be at least 1".into(),
            ));
        }

        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.max_iterations {
            let before = dag.num_ops();
            self.inner.run(dag, properties)?;
            iterations += 1;
            if dag.num_ops() >= before {
                converged = true;
                break;
            }
        }

        debug!(
            "{} finished after {} iterations (converged: {})",
            self.name, iterations, converged
        );
        properties.insert(FixedPointReport {
            pass: self.inner.name().to_string(),
            iterations,
            converged,
        });
        Ok(())
    }
}
