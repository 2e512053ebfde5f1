//! Fluent circuit builder on top of [`CircuitDag`].

use crate::dag::CircuitDag;
use crate::error::IrResult;
use crate::gate::{Gate, StandardGate};
use crate::instruction::Instruction;
use crate::parameter::ParameterExpression;
use crate::qubit::{ClbitId, QubitId};

/// A named circuit being assembled gate by gate.
///
/// Every gate method appends to the graph and hands back `&mut Self`, so
/// calls chain with `?`. A rejected instruction leaves the graph untouched.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    dag: CircuitDag,
    /// Ids handed to the next `add_qubit` / `add_clbit`.
    fresh: (u32, u32),
}

macro_rules! fixed_gates {
    ($($method:ident => $gate:ident),* $(,)?) => {
        $(
            pub fn $method(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
                self.push(Instruction::gate(StandardGate::$gate, [qubit]))
            }
        )*
    };
}

macro_rules! rotations {
    ($($method:ident => $gate:ident),* $(,)?) => {
        $(
            pub fn $method(
                &mut self,
                theta: impl Into<ParameterExpression>,
                qubit: QubitId,
            ) -> IrResult<&mut Self> {
                self.push(Instruction::gate(StandardGate::$gate(theta.into()), [qubit]))
            }
        )*
    };
}

macro_rules! controlled {
    ($($method:ident => $gate:ident),* $(,)?) => {
        $(
            pub fn $method(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
                self.push(Instruction::gate(StandardGate::$gate, [control, target]))
            }
        )*
    };
}

impl Circuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dag: CircuitDag::new(),
            fresh: (0, 0),
        }
    }

    /// Qubits `0..num_qubits` and classical bits `0..num_clbits`.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        (0..num_qubits).for_each(|_| {
            circuit.add_qubit();
        });
        (0..num_clbits).for_each(|_| {
            circuit.add_clbit();
        });
        circuit
    }

    /// Adopt an existing graph. Later bits are numbered past the largest id
    /// already on it.
    pub fn from_dag(dag: CircuitDag) -> Self {
        let fresh = (
            dag.qubits().map(|q| q.0 + 1).max().unwrap_or(0),
            dag.clbits().map(|c| c.0 + 1).max().unwrap_or(0),
        );
        Self {
            name: "circuit".into(),
            dag,
            fresh,
        }
    }

    pub fn add_qubit(&mut self) -> QubitId {
        let qubit = QubitId(self.fresh.0);
        self.fresh.0 += 1;
        self.dag.add_qubit(qubit);
        qubit
    }

    pub fn add_clbit(&mut self) -> ClbitId {
        let clbit = ClbitId(self.fresh.1);
        self.fresh.1 += 1;
        self.dag.add_clbit(clbit);
        clbit
    }

    fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    fixed_gates! {
        h => H,
        x => X,
        y => Y,
        z => Z,
        s => S,
        sdg => Sdg,
        t => T,
        tdg => Tdg,
        sx => SX,
    }

    rotations! {
        rx => Rx,
        ry => Ry,
        rz => Rz,
        p => P,
    }

    controlled! {
        cx => CX,
        cy => CY,
        cz => CZ,
    }

    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::Swap, [a, b]))
    }

    pub fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CP(theta.into()), [control, target]))
    }

    pub fn ccx(&mut self, c0: QubitId, c1: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::gate(StandardGate::CCX, [c0, c1, target]))
    }

    /// Any gate, built in or custom.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    pub fn reset(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::reset(qubit))
    }

    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.push(Instruction::barrier(qubits))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.dag.num_qubits()
    }

    pub fn num_clbits(&self) -> usize {
        self.dag.num_clbits()
    }

    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    pub fn dag_mut(&mut self) -> &mut CircuitDag {
        &mut self.dag
    }

    pub fn into_dag(self) -> CircuitDag {
        self.dag
    }

    /// `h; cx` followed by measuring both qubits.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        let (a, b) = (QubitId(0), QubitId(1));
        circuit
            .h(a)?
            .cx(a, b)?
            .measure(a, ClbitId(0))?
            .measure(b, ClbitId(1))?;
        Ok(circuit)
    }

    /// A CX ladder entangling `n` qubits, each then measured.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size("ghz", n, n);
        if n > 0 {
            circuit.h(QubitId(0))?;
        }
        for i in 1..n {
            circuit.cx(QubitId(i - 1), QubitId(i))?;
        }
        for i in 0..n {
            circuit.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(circuit)
    }
}
