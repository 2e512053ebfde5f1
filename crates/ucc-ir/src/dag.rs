//! DAG-based circuit representation.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::f64::consts::TAU;
use std::fmt;

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex as PetNodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
///
/// Indices are stable: removing an operation never renumbers any other node.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input boundary of a wire.
    In(WireId),
    /// Output boundary of a wire.
    Out(WireId),
    /// Operation node.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Qubit(q) => write!(f, "{q}"),
            WireId::Clbit(c) => write!(f, "{c}"),
        }
    }
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// An edge in the circuit DAG: one hop along a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge belongs to.
    pub wire: WireId,
}

/// Wires an instruction touches, qubits first.
fn wires_of(inst: &Instruction) -> impl Iterator<Item = WireId> + '_ {
    inst.qubits
        .iter()
        .copied()
        .map(WireId::Qubit)
        .chain(inst.clbits.iter().copied().map(WireId::Clbit))
}

/// Reduce a phase into `[0, 2π)`.
fn normalize_phase(phase: f64) -> f64 {
    if !phase.is_finite() {
        return 0.0;
    }
    let p = phase.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if p >= TAU { 0.0 } else { p }
}

/// DAG-based circuit representation.
///
/// Every wire is a chain `In -> op -> ... -> op -> Out`; an operation on
/// several wires sits in several chains at once. Nodes live in a stable
/// arena, so a [`NodeIndex`] stays valid until that node itself is removed.
///
/// Alongside the graph the DAG keeps:
/// - a live count of operations by name (entries vanish when they reach zero),
/// - the circuit's global phase, in `[0, 2π)`.
///
/// ## Performance
///
/// `wire_front` maps each wire to the node just before its output node,
/// which makes appending an operation O(1) per wire. Removing an operation
/// re-splices each of its wires in O(degree).
#[derive(Debug, Clone)]
pub struct CircuitDag {
    graph: StableDiGraph<DagNode, DagEdge, u32>,
    /// Declaration order of qubits.
    qubits: Vec<QubitId>,
    /// Declaration order of classical bits.
    clbits: Vec<ClbitId>,
    inputs: FxHashMap<WireId, NodeIndex>,
    outputs: FxHashMap<WireId, NodeIndex>,
    /// Wire front: maps each wire to the node just before the output node.
    wire_front: FxHashMap<WireId, NodeIndex>,
    op_counts: FxHashMap<String, usize>,
    global_phase: f64,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::default(),
            qubits: vec![],
            clbits: vec![],
            inputs: FxHashMap::default(),
            outputs: FxHashMap::default(),
            wire_front: FxHashMap::default(),
            op_counts: FxHashMap::default(),
            global_phase: 0.0,
        }
    }

    fn add_wire(&mut self, wire: WireId) -> bool {
        if self.inputs.contains_key(&wire) {
            return false;
        }
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, DagEdge { wire });
        self.inputs.insert(wire, in_node);
        self.outputs.insert(wire, out_node);
        self.wire_front.insert(wire, in_node);
        true
    }

    /// Add a qubit wire. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.add_wire(WireId::Qubit(qubit)) {
            self.qubits.push(qubit);
        }
    }

    /// Add a classical wire. Adding an existing bit is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.add_wire(WireId::Clbit(clbit)) {
            self.clbits.push(clbit);
        }
    }

    /// Append an instruction at the end of all its wires.
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let op = instruction.name();

        if let Some(gate) = instruction.as_gate() {
            let expected = gate.num_qubits() as usize;
            let got = instruction.qubits.len();
            if expected != got {
                return Err(IrError::ArityMismatch {
                    op: op.to_string(),
                    expected: expected as u32,
                    got: got as u32,
                });
            }
        }

        if let Some(wire) = wires_of(&instruction).find(|w| !self.inputs.contains_key(w)) {
            return Err(IrError::UnknownWire {
                op: op.to_string(),
                wire,
            });
        }

        let mut seen = FxHashSet::default();
        if let Some(&qubit) = instruction.qubits.iter().find(|&&q| !seen.insert(q)) {
            return Err(IrError::RepeatedQubit {
                op: op.to_string(),
                qubit,
            });
        }

        let mut seen = FxHashSet::default();
        if let Some(&clbit) = instruction.clbits.iter().find(|&&c| !seen.insert(c)) {
            return Err(IrError::RepeatedClbit {
                op: op.to_string(),
                clbit,
            });
        }

        let wires: Vec<WireId> = wires_of(&instruction).collect();
        let name = instruction.name().to_string();
        let op_node = self.graph.add_node(DagNode::Op(instruction));

        for wire in wires {
            let out_node = self.outputs[&wire];
            let prev_node = self.wire_front[&wire];

            let eid = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Missing edge from wire front to output on {wire:?}"
                    ))
                })?;
            self.graph.remove_edge(eid);
            self.graph.add_edge(prev_node, op_node, DagEdge { wire });
            self.graph.add_edge(op_node, out_node, DagEdge { wire });
            self.wire_front.insert(wire, op_node);
        }

        *self.op_counts.entry(name).or_insert(0) += 1;
        Ok(op_node)
    }

    /// Remove an operation node, reconnecting each of its wires.
    ///
    /// The remaining operations keep their relative order on every wire and
    /// every other [`NodeIndex`] stays valid.
    pub fn remove_op(&mut self, node: NodeIndex) -> IrResult<Instruction> {
        match self.graph.node_weight(node) {
            Some(DagNode::Op(_)) => {}
            Some(_) => {
                return Err(IrError::InvalidDag(
                    "Cannot remove a wire boundary node".into(),
                ));
            }
            None => return Err(IrError::InvalidNode),
        }

        let incoming: Vec<(NodeIndex, WireId)> = self
            .graph
            .edges_directed(node, Direction::Incoming)
            .map(|e| (e.source(), e.weight().wire))
            .collect();
        let outgoing: FxHashMap<WireId, NodeIndex> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.weight().wire, e.target()))
            .collect();

        let Some(DagNode::Op(instruction)) = self.graph.remove_node(node) else {
            return Err(IrError::InvalidNode);
        };

        for (pred, wire) in incoming {
            let succ = outgoing.get(&wire).copied().ok_or_else(|| {
                IrError::InvalidDag(format!("Wire {wire:?} has no successor after {node:?}"))
            })?;
            self.graph.add_edge(pred, succ, DagEdge { wire });
            if self.wire_front.get(&wire) == Some(&node) {
                self.wire_front.insert(wire, pred);
            }
        }

        let name = instruction.name();
        if let Some(count) = self.op_counts.get_mut(name) {
            *count -= 1;
            if *count == 0 {
                self.op_counts.remove(name);
            }
        }

        Ok(instruction)
    }

    /// Operation nodes in a topological order.
    pub fn topological_op_nodes(&self) -> Vec<NodeIndex> {
        petgraph::algo::toposort(&self.graph, None)
            .expect("DAG must be acyclic: apply never creates cycles")
            .into_iter()
            .filter(|&idx| self.graph[idx].is_op())
            .collect()
    }

    /// Iterate over operations in topological order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.topological_op_nodes()
            .into_iter()
            .filter_map(|idx| self.get_instruction(idx).map(|inst| (idx, inst)))
    }

    /// Operations in the topological order that, at every step, emits the
    /// ready operation with the smallest `key` (ties broken by node index).
    ///
    /// Different keys give different, equally valid linearizations of the
    /// same DAG.
    pub fn lexicographical_topological_ops<K, F>(&self, key: F) -> Vec<(NodeIndex, &Instruction)>
    where
        K: Ord,
        F: Fn(&Instruction) -> K,
    {
        let mut in_degree: FxHashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|n| (n, self.graph.edges_directed(n, Direction::Incoming).count()))
            .collect();

        let rank = |n: NodeIndex| Reverse((self.graph[n].instruction().map(&key), n));

        let mut ready: BinaryHeap<_> = in_degree
            .iter()
            .filter(|&(_, &d)| d == 0)
            .map(|(&n, _)| rank(n))
            .collect();

        let mut order = Vec::with_capacity(self.num_ops());
        while let Some(Reverse((_, node))) = ready.pop() {
            if let Some(inst) = self.graph[node].instruction() {
                order.push((node, inst));
            }
            for edge in self.graph.edges_directed(node, Direction::Outgoing) {
                let target = edge.target();
                if let Some(d) = in_degree.get_mut(&target) {
                    *d -= 1;
                    if *d == 0 {
                        ready.push(rank(target));
                    }
                }
            }
        }
        order
    }

    /// Check that `order` lists every operation exactly once and never
    /// places an operation before its predecessor on any wire.
    pub fn is_linearization(&self, order: &[NodeIndex]) -> bool {
        if order.len() != self.num_ops() {
            return false;
        }
        let mut position: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        for (i, &node) in order.iter().enumerate() {
            let is_op = self.graph.node_weight(node).is_some_and(DagNode::is_op);
            if !is_op || position.insert(node, i).is_some() {
                return false;
            }
        }
        order.iter().all(|&node| {
            self.graph
                .edges_directed(node, Direction::Incoming)
                .filter_map(|e| position.get(&e.source()))
                .all(|&pred_pos| pred_pos < position[&node])
        })
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    /// The operation directly before `node` on `wire`, if any.
    pub fn predecessor_on_wire(&self, node: NodeIndex, wire: WireId) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .find(|e| e.weight().wire == wire)
            .map(|e| e.source())
            .filter(|&n| self.graph[n].is_op())
    }

    /// The operation directly after `node` on `wire`, if any.
    pub fn successor_on_wire(&self, node: NodeIndex, wire: WireId) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .find(|e| e.weight().wire == wire)
            .map(|e| e.target())
            .filter(|&n| self.graph[n].is_op())
    }

    /// Live operation counts by name.
    pub fn count_ops(&self) -> &FxHashMap<String, usize> {
        &self.op_counts
    }

    /// Number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Number of classical bits.
    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Number of operations.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph.node_count() - 2 * self.inputs.len()
    }

    /// Length of the longest chain of operations.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0;

        for node in petgraph::algo::toposort(&self.graph, None)
            .expect("DAG must be acyclic: apply never creates cycles")
        {
            let max_pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
            let node_depth = max_pred_depth + usize::from(self.graph[node].is_op());
            max_depth = max_depth.max(node_depth);
            depths.insert(node, node_depth);
        }

        max_depth
    }

    /// Qubits in declaration order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubits.iter().copied()
    }

    /// Classical bits in declaration order.
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.clbits.iter().copied()
    }

    /// Global phase in `[0, 2π)`.
    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    /// Set the global phase.
    pub fn set_global_phase(&mut self, phase: f64) {
        self.global_phase = normalize_phase(phase);
    }

    /// Accumulate `delta` into the global phase.
    pub fn add_global_phase(&mut self, delta: f64) {
        self.global_phase = normalize_phase(self.global_phase + delta);
    }

    /// Verify the structural integrity of the DAG.
    ///
    /// Checks that:
    /// - the graph is acyclic
    /// - every wire runs as a single chain from its In node to its Out node
    /// - every operation sits on exactly the wires of its operands
    /// - the operation counts match the live operations
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }

        let mut visits: FxHashMap<NodeIndex, usize> = FxHashMap::default();
        for (&wire, &in_node) in &self.inputs {
            let out_node = *self.outputs.get(&wire).ok_or_else(|| {
                IrError::InvalidDag(format!("Wire {wire:?} has an In node but no Out node"))
            })?;

            let mut current = in_node;
            let mut steps = 0;
            while current != out_node {
                current = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .find(|e| e.weight().wire == wire)
                    .map(|e| e.target())
                    .ok_or_else(|| {
                        IrError::InvalidDag(format!(
                            "Wire {wire:?} is broken after node {current:?}"
                        ))
                    })?;
                if current != out_node {
                    *visits.entry(current).or_insert(0) += 1;
                }
                steps += 1;
                if steps > self.graph.node_count() {
                    return Err(IrError::InvalidDag(format!(
                        "Wire {wire:?} does not terminate"
                    )));
                }
            }
        }

        let mut recount: FxHashMap<String, usize> = FxHashMap::default();
        for node in self.graph.node_indices() {
            let Some(inst) = self.graph[node].instruction() else {
                continue;
            };
            let expected = inst.qubits.len() + inst.clbits.len();
            if visits.get(&node).copied().unwrap_or(0) != expected {
                return Err(IrError::InvalidDag(format!(
                    "Operation {node:?} ('{}') is not on exactly its {expected} wires",
                    inst.name()
                )));
            }
            *recount.entry(inst.name().to_string()).or_insert(0) += 1;
        }

        if recount != self.op_counts {
            return Err(IrError::InvalidDag(
                "Operation counts do not match the live operations".into(),
            ));
        }

        Ok(())
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}
