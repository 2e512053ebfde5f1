//! Ordered execution of passes over one circuit.

use tracing::{debug, info, instrument};

use ucc_ir::CircuitDag;

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::agnostic::fixed_point::DEFAULT_MAX_ITERATIONS;
use crate::passes::agnostic::optimization::DEFAULT_TOLERANCE;
use crate::passes::{CountOps, FixedPoint, IntegrityCheck, InverseCancellation};
use crate::property::PropertySet;

/// Runs its passes front to back, stopping at the first failure.
///
/// A failing pass may leave the circuit partly rewritten; every completed
/// rewrite preserves the circuit's action.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `pass` to the end of the pipeline.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    #[instrument(skip_all, fields(passes = self.passes.len()))]
    pub fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        info!(qubits = dag.num_qubits(), ops = dag.num_ops(), "starting pipeline");

        for pass in &self.passes {
            let name = pass.name();
            if !pass.should_run(dag, properties) {
                debug!(pass = name, "skipped");
                continue;
            }
            pass.run(dag, properties)?;
            debug!(pass = name, ops = dag.num_ops(), "finished");
        }

        info!(depth = dag.depth(), ops = dag.num_ops(), "pipeline done");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

/// Assembles the standard pipeline for an optimization level.
pub struct PassManagerBuilder {
    optimization_level: u8,
    tolerance: f64,
    max_iterations: usize,
}

impl PassManagerBuilder {
    /// Level 1 with the default tolerance and iteration cap.
    pub fn new() -> Self {
        Self {
            optimization_level: 1,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Levels above 3 are clamped to 3.
    ///
    /// | level | cancellation |
    /// |-------|--------------|
    /// | 0 | none |
    /// | 1 | one scan |
    /// | 2, 3 | scans repeated until the op count stops falling |
    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(3);
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Only consulted at levels 2 and 3.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// The pipeline always ends with an integrity check and op counts.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();
        let cancellation = InverseCancellation::new().with_tolerance(self.tolerance);

        match self.optimization_level {
            0 => {}
            1 => pm.add_pass(cancellation),
            _ => pm.add_pass(FixedPoint::new(cancellation).with_max_iterations(self.max_iterations)),
        }

        pm.add_pass(IntegrityCheck);
        pm.add_pass(CountOps);

        (pm, PropertySet::new())
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::{CancellationReport, OpCounts};
    use ucc_ir::{Circuit, QubitId};

    fn redundant() -> CircuitDag {
        let mut circuit = Circuit::with_size("test", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.rz(0.3, QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.into_dag()
    }

    #[test]
    fn test_empty_manager_is_identity() {
        let pm = PassManager::new();
        assert!(pm.is_empty());

        let mut dag = redundant();
        pm.run(&mut dag, &mut PropertySet::new()).unwrap();
        assert_eq!(dag.num_ops(), 4);
    }

    #[test]
    fn test_builder_levels() {
        let (pm, _) = PassManagerBuilder::new().with_optimization_level(0).build();
        assert_eq!(pm.pass_names(), vec!["integrity_check", "count_ops"]);

        let (pm, _) = PassManagerBuilder::new().build();
        assert_eq!(
            pm.pass_names(),
            vec!["InverseCancellation", "integrity_check", "count_ops"]
        );

        let (pm, _) = PassManagerBuilder::new().with_optimization_level(9).build();
        assert_eq!(
            pm.pass_names(),
            vec!["FixedPoint(InverseCancellation)", "integrity_check", "count_ops"]
        );
    }

    #[test]
    fn test_level_zero_leaves_circuit_alone() {
        let mut dag = redundant();
        let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(0).build();
        pm.run(&mut dag, &mut props).unwrap();

        assert_eq!(dag.num_ops(), 4);
        assert!(props.get::<CancellationReport>().is_none());
        assert_eq!(props.get::<OpCounts>().unwrap().total, 4);
    }

    #[test]
    fn test_pipeline_publishes_reports() {
        for level in 1..=3 {
            let mut dag = redundant();
            let (pm, mut props) = PassManagerBuilder::new()
                .with_optimization_level(level)
                .build();
            pm.run(&mut dag, &mut props).unwrap();

            assert_eq!(dag.num_ops(), 2);
            let report = props.get::<CancellationReport>().unwrap();
            assert_eq!(report.pairs_cancelled, 1);
            let counts = props.get::<OpCounts>().unwrap();
            assert_eq!(counts.get("cx"), 0);
            assert_eq!(counts.get("h"), 1);
            assert_eq!(counts.get("rz"), 1);
        }
    }

    #[test]
    fn test_bad_tolerance_fails_pipeline() {
        let mut dag = redundant();
        let (pm, mut props) = PassManagerBuilder::new().with_tolerance(-1.0).build();
        assert!(pm.run(&mut dag, &mut props).is_err());
        assert_eq!(dag.num_ops(), 4);
    }
}
