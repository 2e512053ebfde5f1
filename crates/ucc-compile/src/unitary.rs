//! Dense unitary matrices for the gate oracles.
//!
//! Matrices are row-major. On a multi-qubit matrix, qubit operand 0 is the
//! most significant bit of the row/column index, so for `cx` the basis order
//! is `|control target⟩`.

use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// A square complex matrix of dimension `2^k`.
#[derive(Debug, Clone, PartialEq)]
pub struct Unitary {
    dim: usize,
    data: Vec<Complex64>,
}

impl Unitary {
    /// Build a matrix from row-major data.
    ///
    /// Returns `None` unless `data` holds `dim * dim` entries.
    pub fn from_rows(dim: usize, data: Vec<Complex64>) -> Option<Self> {
        (data.len() == dim * dim).then_some(Self { dim, data })
    }

    /// The identity of dimension `dim`.
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![ZERO; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = ONE;
        }
        Self { dim, data }
    }

    /// Controlled-X with operand 0 as control.
    pub fn cx() -> Self {
        let mut m = Self::identity(4);
        m.set(2, 2, ZERO);
        m.set(3, 3, ZERO);
        m.set(2, 3, ONE);
        m.set(3, 2, ONE);
        m
    }

    /// Rotation around X: `exp(-iθX/2)`.
    pub fn rx(theta: f64) -> Self {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new(0.0, -(theta / 2.0).sin());
        Self {
            dim: 2,
            data: vec![c, s, s, c],
        }
    }

    /// Rotation around Y: `exp(-iθY/2)`.
    pub fn ry(theta: f64) -> Self {
        let c = Complex64::new((theta / 2.0).cos(), 0.0);
        let s = Complex64::new((theta / 2.0).sin(), 0.0);
        Self {
            dim: 2,
            data: vec![c, -s, s, c],
        }
    }

    /// Rotation around Z: `exp(-iθZ/2)`.
    pub fn rz(theta: f64) -> Self {
        Self {
            dim: 2,
            data: vec![
                Complex64::from_polar(1.0, -theta / 2.0),
                ZERO,
                ZERO,
                Complex64::from_polar(1.0, theta / 2.0),
            ],
        }
    }

    /// Hadamard.
    pub fn h() -> Self {
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        Self {
            dim: 2,
            data: vec![s, s, s, -s],
        }
    }

    /// Matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at row `r`, column `c`.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> Complex64 {
        self.data[r * self.dim + c]
    }

    #[inline]
    fn set(&mut self, r: usize, c: usize, value: Complex64) {
        self.data[r * self.dim + c] = value;
    }

    /// Matrix product `self · other`.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.dim, other.dim, "matrix dimensions must agree");
        let n = self.dim;
        let mut data = vec![ZERO; n * n];
        for r in 0..n {
            for k in 0..n {
                let a = self.data[r * n + k];
                if a == ZERO {
                    continue;
                }
                for c in 0..n {
                    data[r * n + c] += a * other.data[k * n + c];
                }
            }
        }
        Self { dim: n, data }
    }

    /// Conjugate transpose.
    #[must_use]
    pub fn dagger(&self) -> Self {
        let n = self.dim;
        let mut data = vec![ZERO; n * n];
        for r in 0..n {
            for c in 0..n {
                data[c * n + r] = self.data[r * n + c].conj();
            }
        }
        Self { dim: n, data }
    }

    /// Largest entry-wise distance to `other`.
    pub fn max_distance(&self, other: &Self) -> f64 {
        if self.dim != other.dim {
            return f64::INFINITY;
        }
        self.data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }

    /// Check `self · other ≈ other · self` within `tol`.
    pub fn commutes_with(&self, other: &Self, tol: f64) -> bool {
        self.dim == other.dim && self.mul(other).max_distance(&other.mul(self)) <= tol
    }

    /// If this matrix is `e^{iφ}·I` within `tol`, return `φ`.
    ///
    /// Every entry must be within `tol` of the scaled identity, and the
    /// scalar must have unit modulus within `tol`.
    pub fn scalar_identity_phase(&self, tol: f64) -> Option<f64> {
        let scalar = *self.data.first()?;
        if (scalar.norm() - 1.0).abs() > tol {
            return None;
        }
        let n = self.dim;
        for r in 0..n {
            for c in 0..n {
                let expected = if r == c { scalar } else { ZERO };
                if (self.data[r * n + c] - expected).norm() > tol {
                    return None;
                }
            }
        }
        Some(scalar.arg())
    }

    /// Lift a gate matrix onto an `num_qubits` register.
    ///
    /// `qubits[k]` is the register position of the gate's operand `k`;
    /// register position 0 is the most significant bit. Returns `None` if
    /// the operand count does not match the matrix or a position is out of
    /// range or repeated.
    pub fn embed(&self, qubits: &[usize], num_qubits: usize) -> Option<Self> {
        let k = qubits.len();
        if 1usize << k != self.dim || qubits.iter().any(|&q| q >= num_qubits) {
            return None;
        }
        let mut seen = 0usize;
        for &q in qubits {
            if seen & (1 << q) != 0 {
                return None;
            }
            seen |= 1 << q;
        }

        let bit = |q: usize| 1usize << (num_qubits - 1 - q);
        let operand_mask = qubits.iter().fold(0, |m, &q| m | bit(q));
        let local = |index: usize| {
            qubits
                .iter()
                .fold(0usize, |acc, &q| (acc << 1) | usize::from(index & bit(q) != 0))
        };

        let n = 1usize << num_qubits;
        let mut data = vec![ZERO; n * n];
        for r in 0..n {
            for c in 0..n {
                if r & !operand_mask == c & !operand_mask {
                    data[r * n + c] = self.get(local(r), local(c));
                }
            }
        }
        Some(Self { dim: n, data })
    }

    /// Normalize an angle to `(-π, π]`.
    pub fn normalize_angle(angle: f64) -> f64 {
        if !angle.is_finite() {
            return 0.0;
        }
        let a = angle.rem_euclid(2.0 * PI);
        if a > PI { a - 2.0 * PI } else { a }
    }
}
