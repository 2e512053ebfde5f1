//! Analysis passes: structural checks and op-count snapshots.
//!
//! These run after the transformation passes and never modify the DAG.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ucc_ir::CircuitDag;

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Analysis pass that fails the pipeline if the DAG is no longer well formed.
///
/// Checks acyclicity, that every wire runs from its input to its output
/// node without gaps, and that the per-kind op counts agree with the
/// operations actually present. Add it after the passes that remove nodes.
pub struct IntegrityCheck;

impl Pass for IntegrityCheck {
    fn name(&self) -> &'static str {
        "integrity_check"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        dag.verify_integrity()?;
        debug!(
            "DAG integrity verified: {} qubits, {} clbits, {} ops",
            dag.num_qubits(),
            dag.num_clbits(),
            dag.num_ops()
        );
        Ok(())
    }
}

/// Snapshot of the operation counts of a DAG, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpCounts {
    /// Count per operation name.
    pub counts: BTreeMap<String, usize>,
    /// Total number of operations.
    pub total: usize,
}

impl OpCounts {
    /// Take a snapshot of `dag`.
    pub fn from_dag(dag: &CircuitDag) -> Self {
        let counts: BTreeMap<String, usize> = dag
            .count_ops()
            .iter()
            .map(|(name, &count)| (name.clone(), count))
            .collect();
        Self {
            total: counts.values().sum(),
            counts,
        }
    }

    /// Count for one operation name, zero if absent.
    pub fn get(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Serialize as JSON.
    pub fn to_json(&self) -> CompileResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Analysis pass publishing an [`OpCounts`] snapshot.
pub struct CountOps;

impl Pass for CountOps {
    fn name(&self) -> &'static str {
        "count_ops"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let counts = OpCounts::from_dag(dag);
        debug!("Op counts: {:?}", counts.counts);
        properties.insert(counts);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_ir::{Circuit, QubitId};

    #[test]
    fn test_count_ops_snapshot() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();
        let mut dag = circuit.into_dag();

        let mut props = PropertySet::new();
        CountOps.run(&mut dag, &mut props).unwrap();

        let counts = props.get::<OpCounts>().unwrap();
        assert_eq!(counts.get("cx"), 2);
        assert_eq!(counts.get("h"), 1);
        assert_eq!(counts.get("rz"), 0);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.to_json().unwrap(), r#"{"counts":{"cx":2,"h":1},"total":3}"#);
    }

    #[test]
    fn test_integrity_check_passes_after_removal() {
        let mut dag = Circuit::ghz(4).unwrap().into_dag();
        let victim = dag.topological_op_nodes()[2];
        dag.remove_op(victim).unwrap();

        IntegrityCheck.run(&mut dag, &mut PropertySet::new()).unwrap();
        assert_eq!(IntegrityCheck.kind(), PassKind::Analysis);
    }
}
