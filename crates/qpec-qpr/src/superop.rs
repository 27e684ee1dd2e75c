//! Superoperators acting on vectorized density matrices.
//!
//! A superoperator on n qubits is a dense 4^n × 4^n complex matrix acting on
//! `vec(ρ)` in the column-stacking convention, `vec(AXB) = (Bᵀ ⊗ A) vec(X)`.
//! The channel `ρ ↦ U ρ U†` therefore has matrix `conj(U) ⊗ U`.
//!
//! Physicality (complete positivity, trace preservation) is not enforced
//! here; the representation solver's equality constraints are the only
//! structural requirement downstream code relies on.

use ndarray::Array2;
use ndarray::linalg::kron;
use num_complex::Complex64;

use qpec_ir::{Circuit, Gate, unitary};

use crate::error::{QprError, QprResult};

/// A dense superoperator (channel matrix) on n qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperOp {
    matrix: Array2<Complex64>,
    n_qubits: u32,
}

impl SuperOp {
    /// Wrap a matrix, checking that it is square with dimension 4^n, n ≥ 1.
    pub fn new(matrix: Array2<Complex64>) -> QprResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols || !is_power_of_four(rows) {
            return Err(QprError::NotSuperOpShape { rows, cols });
        }
        let n_qubits = (rows.trailing_zeros() / 2) as u32;
        Ok(Self { matrix, n_qubits })
    }

    /// The identity channel on n qubits.
    pub fn identity(n_qubits: u32) -> Self {
        let dim = 1usize << (2 * n_qubits as usize);
        Self {
            matrix: Array2::eye(dim),
            n_qubits,
        }
    }

    /// The channel `ρ ↦ U ρ U†` of a unitary matrix (dimension 2^n).
    pub fn from_unitary(u: &Array2<Complex64>) -> QprResult<Self> {
        let (rows, cols) = u.dim();
        if rows != cols || !rows.is_power_of_two() || rows < 2 {
            return Err(QprError::InvalidUnitary { rows, cols });
        }
        let conj = u.mapv(|z| z.conj());
        Self::new(kron(&conj, u))
    }

    /// The channel of an entire circuit fragment (its full unitary).
    pub fn from_circuit(circuit: &Circuit) -> QprResult<Self> {
        Self::from_unitary(&unitary::circuit_unitary(circuit))
    }

    /// Single-qubit depolarizing channel:
    /// `ρ ↦ (1−p) ρ + p/3 (XρX + YρY + ZρZ)`.
    pub fn depolarizing(p: f64) -> Self {
        let pauli = |g: Gate| {
            let u = g.unitary();
            kron(&u.mapv(|z| z.conj()), &u)
        };
        let matrix = Array2::eye(4).mapv(|z: Complex64| z * (1.0 - p))
            + (pauli(Gate::X) + pauli(Gate::Y) + pauli(Gate::Z)).mapv(|z| z * (p / 3.0));
        Self {
            matrix,
            n_qubits: 1,
        }
    }

    /// Composition `self ∘ other` (the right operand is applied first).
    pub fn compose(&self, other: &SuperOp) -> QprResult<Self> {
        if self.dim() != other.dim() {
            return Err(QprError::Dimension {
                expected: self.dim(),
                got: other.dim(),
            });
        }
        Ok(Self {
            matrix: self.matrix.dot(&other.matrix),
            n_qubits: self.n_qubits,
        })
    }

    /// Kronecker product with another superoperator.
    pub fn kron(&self, other: &SuperOp) -> Self {
        Self {
            matrix: kron(&self.matrix, &other.matrix),
            n_qubits: self.n_qubits + other.n_qubits,
        }
    }

    /// Entrywise comparison within an absolute tolerance.
    pub fn approx_eq(&self, other: &SuperOp, tol: f64) -> bool {
        self.dim() == other.dim()
            && self
                .matrix
                .iter()
                .zip(other.matrix.iter())
                .all(|(a, b)| (a - b).norm() <= tol)
    }

    /// Matrix dimension (4^n).
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of qubits this channel acts on.
    pub fn n_qubits(&self) -> u32 {
        self.n_qubits
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }
}

fn is_power_of_four(x: usize) -> bool {
    x >= 4 && x.is_power_of_two() && x.trailing_zeros() % 2 == 0
}
