//! Commutation-aware inverse cancellation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use ucc_ir::{CircuitDag, IrError, NodeIndex};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;
use crate::unitary::Unitary;

use super::basis::GateDescriptor;
use super::commutation::commute;
use super::inverse::{DEFAULT_TOLERANCE, inverse_of};

/// What a cancellation scan removed.
///
/// Published to the [`PropertySet`] by [`InverseCancellation`]. Repeated
/// runs in one pipeline accumulate into the same report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CancellationReport {
    /// Number of gate pairs cancelled.
    pub pairs_cancelled: usize,
    /// Number of gates removed (twice the pairs).
    pub gates_removed: usize,
    /// Phase added to the circuit, in `(-π, π]`.
    pub phase_delta: f64,
    /// Removed gates by name.
    pub removed_by_kind: BTreeMap<String, usize>,
}

impl CancellationReport {
    /// True if nothing was cancelled.
    pub fn is_empty(&self) -> bool {
        self.pairs_cancelled == 0
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: &CancellationReport) {
        self.pairs_cancelled += other.pairs_cancelled;
        self.gates_removed += other.gates_removed;
        self.phase_delta = Unitary::normalize_angle(self.phase_delta + other.phase_delta);
        for (name, count) in &other.removed_by_kind {
            *self.removed_by_kind.entry(name.clone()).or_default() += count;
        }
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> CompileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Cancels pairs of mutually inverse gates, looking past gates they
/// commute with.
///
/// Operations are visited in a topological order. From each one the pass
/// walks back over the operations visited before it:
///
/// 1. an earlier gate on the same operands that undoes it is cancelled
///    together with it, and its phase is added to the circuit;
/// 2. a gate it commutes with is stepped over;
/// 3. anything else ends the walk.
///
/// Each gate is cancelled at most once and opaque gates are never removed.
/// One run is a single scan: cancellations can expose new pairs that only a
/// later run finds (see [`FixedPoint`](crate::passes::FixedPoint)).
#[derive(Debug, Clone)]
pub struct InverseCancellation {
    tolerance: f64,
}

impl InverseCancellation {
    /// Create the pass with the default tolerance.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Set the tolerance of the inverse check.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Tolerance of the inverse check.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Run one scan along `order`, which must list every operation of
    /// `dag` in a topological order.
    ///
    /// The result does not depend on which linearization is used.
    #[instrument(skip_all, fields(ops = order.len()))]
    pub fn cancel_along(
        &self,
        dag: &mut CircuitDag,
        order: &[NodeIndex],
    ) -> CompileResult<CancellationReport> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(CompileError::InvalidConfiguration(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        if !dag.is_linearization(order) {
            return Err(CompileError::InvalidLinearization(format!(
                "{} nodes given for a DAG with {} operations",
                order.len(),
                dag.num_ops()
            )));
        }

        let pairs = {
            let descriptors = order
                .iter()
                .map(|&node| {
                    dag.get_instruction(node)
                        .map(GateDescriptor::from_instruction)
                        .ok_or(CompileError::Ir(IrError::InvalidNode))
                })
                .collect::<CompileResult<Vec<_>>>()?;
            self.scan(&descriptors)?
        };

        let mut report = CancellationReport::default();
        let mut phase = 0.0;
        for &(earlier, later, pair_phase) in &pairs {
            for position in [earlier, later] {
                let removed = dag.remove_op(order[position])?;
                *report
                    .removed_by_kind
                    .entry(removed.name().to_string())
                    .or_default() += 1;
            }
            phase += pair_phase;
        }
        dag.add_global_phase(phase);

        report.pairs_cancelled = pairs.len();
        report.gates_removed = 2 * pairs.len();
        report.phase_delta = Unitary::normalize_angle(phase);

        debug!(
            "Cancelled {} pairs, {} ops remain",
            report.pairs_cancelled,
            dag.num_ops()
        );
        Ok(report)
    }

    /// Find cancelling pairs as `(earlier, later, phase)` positions in
    /// `descriptors`.
    fn scan(&self, descriptors: &[GateDescriptor<'_>]) -> CompileResult<Vec<(usize, usize, f64)>> {
        let mut removed = vec![false; descriptors.len()];
        let mut pairs = Vec::new();

        for (i, current) in descriptors.iter().enumerate() {
            if current.kind.is_opaque() {
                continue;
            }
            for j in (0..i).rev() {
                if removed[j] {
                    continue;
                }
                let earlier = &descriptors[j];
                if earlier.same_operands(current) {
                    if let Some(phase) = inverse_of(earlier, current, self.tolerance)? {
                        trace!("{earlier} cancels {current}, phase {phase}");
                        removed[i] = true;
                        removed[j] = true;
                        pairs.push((j, i, phase));
                        break;
                    }
                }
                if !commute(current, earlier) {
                    trace!("{current} blocked by {earlier}");
                    break;
                }
            }
        }

        Ok(pairs)
    }
}

impl Default for InverseCancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for InverseCancellation {
    fn name(&self) -> &'static str {
        "InverseCancellation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let order = dag.topological_op_nodes();
        let report = self.cancel_along(dag, &order)?;

        match properties.get_mut::<CancellationReport>() {
            Some(total) => total.merge(&report),
            None => properties.insert(report),
        }
        Ok(())
    }
}
