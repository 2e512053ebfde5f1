//! Dense statevector simulation.
//!
//! Qubit `k` in declaration order is bit `k` of the basis-state index, so
//! `|q1 q0⟩ = |10⟩` is amplitude 2.

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use std::f64::consts::{FRAC_1_SQRT_2, PI};
use tracing::debug;

use ucc_ir::{CircuitDag, Instruction, InstructionKind, ParameterExpression, QubitId, StandardGate};

use crate::error::{SimError, SimResult};

/// Largest register the simulator accepts.
pub const MAX_QUBITS: usize = 24;

type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const IM: Complex64 = Complex64::new(0.0, 1.0);

fn diag(a: Complex64, b: Complex64) -> Matrix2 {
    [[a, ZERO], [ZERO, b]]
}

/// How a gate acts: a 2x2 matrix on the last operand, conditioned on all
/// preceding operands being |1⟩, or a swap of its two operands.
enum Action {
    Controlled { num_controls: usize, matrix: Matrix2 },
    Swap,
}

fn angle(param: &ParameterExpression, gate: &StandardGate) -> SimResult<f64> {
    param
        .as_f64()
        .ok_or_else(|| SimError::SymbolicParameter(gate.name().to_string()))
}

fn rotation_x(theta: f64) -> Matrix2 {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new(0.0, -(theta / 2.0).sin());
    [[c, s], [s, c]]
}

fn rotation_y(theta: f64) -> Matrix2 {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new((theta / 2.0).sin(), 0.0);
    [[c, -s], [s, c]]
}

fn action_of(gate: &StandardGate) -> SimResult<Action> {
    let single = |matrix| Action::Controlled {
        num_controls: 0,
        matrix,
    };
    let controlled = |num_controls, matrix| Action::Controlled {
        num_controls,
        matrix,
    };
    let x: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];
    let y: Matrix2 = [[ZERO, -IM], [IM, ZERO]];
    let z = diag(ONE, -ONE);

    Ok(match gate {
        StandardGate::I => single(diag(ONE, ONE)),
        StandardGate::X => single(x),
        StandardGate::Y => single(y),
        StandardGate::Z => single(z),
        StandardGate::H => {
            let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
            single([[h, h], [h, -h]])
        }
        StandardGate::S => single(diag(ONE, IM)),
        StandardGate::Sdg => single(diag(ONE, -IM)),
        StandardGate::T => single(diag(ONE, Complex64::from_polar(1.0, PI / 4.0))),
        StandardGate::Tdg => single(diag(ONE, Complex64::from_polar(1.0, -PI / 4.0))),
        StandardGate::SX => {
            let a = Complex64::new(0.5, 0.5);
            let b = Complex64::new(0.5, -0.5);
            single([[a, b], [b, a]])
        }
        StandardGate::Rx(p) => single(rotation_x(angle(p, gate)?)),
        StandardGate::Ry(p) => single(rotation_y(angle(p, gate)?)),
        StandardGate::Rz(p) => {
            let theta = angle(p, gate)?;
            single(diag(
                Complex64::from_polar(1.0, -theta / 2.0),
                Complex64::from_polar(1.0, theta / 2.0),
            ))
        }
        StandardGate::P(p) => single(diag(ONE, Complex64::from_polar(1.0, angle(p, gate)?))),
        StandardGate::CX => controlled(1, x),
        StandardGate::CY => controlled(1, y),
        StandardGate::CZ => controlled(1, z),
        StandardGate::CP(p) => controlled(1, diag(ONE, Complex64::from_polar(1.0, angle(p, gate)?))),
        StandardGate::Swap => Action::Swap,
        StandardGate::CCX => controlled(2, x),
    })
}

/// A pure quantum state over a fixed register.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// The all-zero state |0...0⟩.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        Self::from_basis_state(num_qubits, 0)
    }

    /// The computational basis state with the given index.
    pub fn from_basis_state(num_qubits: usize, index: usize) -> SimResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(SimError::TooManyQubits {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        let size = 1usize << num_qubits;
        if index >= size {
            return Err(SimError::InvalidAmplitudes(size));
        }
        let mut amplitudes = vec![ZERO; size];
        amplitudes[index] = ONE;
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Wrap raw amplitudes. The length must be a power of two.
    ///
    /// The amplitudes are taken as given; callers normalize if they need to.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if !len.is_power_of_two() {
            return Err(SimError::InvalidAmplitudes(len));
        }
        let num_qubits = len.trailing_zeros() as usize;
        if num_qubits > MAX_QUBITS {
            return Err(SimError::TooManyQubits {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Run `dag` on |0...0⟩, global phase included.
    pub fn from_dag(dag: &CircuitDag) -> SimResult<Self> {
        let mut state = Self::new(dag.num_qubits())?;
        state.run_dag(dag)?;
        Ok(state)
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply every operation of `dag` in topological order, then multiply by
    /// `e^{i·global_phase}`.
    ///
    /// The DAG's qubits map to bit positions in declaration order.
    pub fn run_dag(&mut self, dag: &CircuitDag) -> SimResult<()> {
        if dag.num_qubits() != self.num_qubits {
            return Err(SimError::InvalidAmplitudes(self.amplitudes.len()));
        }
        let positions: FxHashMap<QubitId, usize> =
            dag.qubits().enumerate().map(|(i, q)| (q, i)).collect();

        debug!(
            num_qubits = self.num_qubits,
            num_ops = dag.num_ops(),
            "Simulating circuit"
        );

        for (_, instruction) in dag.topological_ops() {
            self.apply(instruction, &positions)?;
        }

        let phase = Complex64::from_polar(1.0, dag.global_phase());
        for amp in &mut self.amplitudes {
            *amp *= phase;
        }
        Ok(())
    }

    fn apply(
        &mut self,
        instruction: &Instruction,
        positions: &FxHashMap<QubitId, usize>,
    ) -> SimResult<()> {
        let gate = match &instruction.kind {
            InstructionKind::Gate(gate) => gate,
            InstructionKind::Barrier => return Ok(()),
            InstructionKind::Measure | InstructionKind::Reset => {
                return Err(SimError::UnsupportedInstruction(
                    instruction.name().to_string(),
                ));
            }
        };
        if gate.condition.is_some() {
            return Err(SimError::ConditionedGate(gate.name().to_string()));
        }
        let standard = gate
            .as_standard()
            .ok_or_else(|| SimError::UnsupportedInstruction(gate.name().to_string()))?;

        let bits = instruction
            .qubits
            .iter()
            .map(|q| positions.get(q).copied().ok_or(SimError::UnknownQubit(*q)))
            .collect::<SimResult<Vec<usize>>>()?;

        match action_of(standard)? {
            Action::Controlled {
                num_controls,
                matrix,
            } => {
                let control_mask = bits[..num_controls]
                    .iter()
                    .fold(0usize, |mask, &b| mask | (1 << b));
                self.apply_controlled(control_mask, bits[num_controls], &matrix);
            }
            Action::Swap => self.apply_swap(bits[0], bits[1]),
        }
        Ok(())
    }

    fn apply_controlled(&mut self, control_mask: usize, target: usize, m: &Matrix2) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & tgt_mask == 0 && i & control_mask == control_mask {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & mask1 != 0 && i & mask2 == 0 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Inner product ⟨self|other⟩.
    pub fn inner(&self, other: &Statevector) -> Complex64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum()
    }

    /// Equal up to a global phase: `|⟨self|other⟩| ≥ 1 - tol` for unit vectors.
    pub fn equiv(&self, other: &Statevector, tol: f64) -> bool {
        self.num_qubits == other.num_qubits && 1.0 - self.inner(other).norm() <= tol
    }

    /// Equal amplitude by amplitude, phase included.
    pub fn approx_eq(&self, other: &Statevector, tol: f64) -> bool {
        self.num_qubits == other.num_qubits
            && self
                .amplitudes
                .iter()
                .zip(&other.amplitudes)
                .all(|(a, b)| (a - b).norm() <= tol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucc_ir::{Circuit, ClbitId, CustomGate};

    const TOL: f64 = 1e-10;

    #[test]
    fn test_bell_amplitudes() {
        let mut circuit = Circuit::with_size("bell", 2, 0);
        circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
        let state = Statevector::from_dag(circuit.dag()).unwrap();

        let amps = state.amplitudes();
        assert!((amps[0].re - FRAC_1_SQRT_2).abs() < TOL);
        assert!((amps[3].re - FRAC_1_SQRT_2).abs() < TOL);
        assert!(amps[1].norm() < TOL);
        assert!(amps[2].norm() < TOL);
    }

    #[test]
    fn test_cx_control_is_first_operand() {
        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit.x(QubitId(1)).unwrap().cx(QubitId(1), QubitId(0)).unwrap();
        let state = Statevector::from_dag(circuit.dag()).unwrap();
        assert!((state.amplitudes()[3] - ONE).norm() < TOL);
    }

    #[test]
    fn test_global_phase_applied() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.dag_mut().set_global_phase(PI);
        let state = Statevector::from_dag(circuit.dag()).unwrap();
        assert!((state.amplitudes()[0] + ONE).norm() < TOL);

        let plain = Statevector::new(1).unwrap();
        assert!(state.equiv(&plain, TOL));
        assert!(!state.approx_eq(&plain, TOL));
    }

    #[test]
    fn test_rz_pair_is_phase_only() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit
            .h(QubitId(0))
            .unwrap()
            .rz(0.7, QubitId(0))
            .unwrap()
            .rz(-0.7, QubitId(0))
            .unwrap()
            .h(QubitId(0))
            .unwrap();
        let state = Statevector::from_dag(circuit.dag()).unwrap();
        assert!(state.approx_eq(&Statevector::new(1).unwrap(), TOL));
    }

    #[test]
    fn test_sx_squares_to_x() {
        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.sx(QubitId(0)).unwrap().sx(QubitId(0)).unwrap();
        let state = Statevector::from_dag(circuit.dag()).unwrap();
        assert!((state.amplitudes()[1] - ONE).norm() < TOL);
    }

    #[test]
    fn test_unsupported_instructions() {
        let mut circuit = Circuit::with_size("t", 1, 1);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        assert!(matches!(
            Statevector::from_dag(circuit.dag()),
            Err(SimError::UnsupportedInstruction(_))
        ));

        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.rz(ParameterExpression::symbol("a"), QubitId(0)).unwrap();
        assert!(matches!(
            Statevector::from_dag(circuit.dag()),
            Err(SimError::SymbolicParameter(_))
        ));

        let mut circuit = Circuit::with_size("t", 1, 0);
        circuit.gate(CustomGate::new("u", 1), [QubitId(0)]).unwrap();
        assert!(Statevector::from_dag(circuit.dag()).is_err());
    }

    #[test]
    fn test_barrier_is_noop() {
        let mut circuit = Circuit::with_size("t", 2, 0);
        circuit.barrier([QubitId(0), QubitId(1)]).unwrap();
        let state = Statevector::from_dag(circuit.dag()).unwrap();
        assert!(state.approx_eq(&Statevector::new(2).unwrap(), TOL));
    }

    #[test]
    fn test_constructor_limits() {
        assert!(Statevector::new(MAX_QUBITS + 1).is_err());
        assert!(Statevector::from_basis_state(2, 4).is_err());
        assert!(Statevector::from_amplitudes(vec![ONE; 3]).is_err());
        assert_eq!(
            Statevector::from_amplitudes(vec![ONE; 8]).unwrap().num_qubits(),
            3
        );
    }
}
