//! Quantum gate types.

use std::f64::consts::FRAC_1_SQRT_2;
use std::hash::{Hash, Hasher};

use ndarray::{Array2, array};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Standard gates with known semantics.
///
/// Rotation angles are concrete `f64` values; the sampling core never
/// rebinds parameters after circuit construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Gate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::I => "id",
            Gate::X => "x",
            Gate::Y => "y",
            Gate::Z => "z",
            Gate::H => "h",
            Gate::S => "s",
            Gate::Sdg => "sdg",
            Gate::T => "t",
            Gate::Tdg => "tdg",
            Gate::Rx(_) => "rx",
            Gate::Ry(_) => "ry",
            Gate::Rz(_) => "rz",
            Gate::CX => "cx",
            Gate::CY => "cy",
            Gate::CZ => "cz",
            Gate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::I
            | Gate::X
            | Gate::Y
            | Gate::Z
            | Gate::H
            | Gate::S
            | Gate::Sdg
            | Gate::T
            | Gate::Tdg
            | Gate::Rx(_)
            | Gate::Ry(_)
            | Gate::Rz(_) => 1,
            Gate::CX | Gate::CY | Gate::CZ | Gate::Swap => 2,
        }
    }

    /// The unitary matrix of this gate.
    ///
    /// Single-qubit gates return a 2×2 matrix, two-qubit gates a 4×4 matrix
    /// in the basis ordering `|q_first q_second⟩` where `q_first` is the
    /// first operand (the control for controlled gates) and the most
    /// significant bit of the local index.
    pub fn unitary(&self) -> Array2<Complex64> {
        let c = |re: f64, im: f64| Complex64::new(re, im);
        let o = c(0.0, 0.0);
        let l = c(1.0, 0.0);
        match self {
            Gate::I => array![[l, o], [o, l]],
            Gate::X => array![[o, l], [l, o]],
            Gate::Y => array![[o, c(0.0, -1.0)], [c(0.0, 1.0), o]],
            Gate::Z => array![[l, o], [o, c(-1.0, 0.0)]],
            Gate::H => {
                let h = c(FRAC_1_SQRT_2, 0.0);
                array![[h, h], [h, -h]]
            }
            Gate::S => array![[l, o], [o, c(0.0, 1.0)]],
            Gate::Sdg => array![[l, o], [o, c(0.0, -1.0)]],
            Gate::T => array![[l, o], [o, Complex64::from_polar(1.0, std::f64::consts::FRAC_PI_4)]],
            Gate::Tdg => {
                array![[l, o], [o, Complex64::from_polar(1.0, -std::f64::consts::FRAC_PI_4)]]
            }
            Gate::Rx(theta) => {
                let (sin, cos) = (theta / 2.0).sin_cos();
                array![[c(cos, 0.0), c(0.0, -sin)], [c(0.0, -sin), c(cos, 0.0)]]
            }
            Gate::Ry(theta) => {
                let (sin, cos) = (theta / 2.0).sin_cos();
                array![[c(cos, 0.0), c(-sin, 0.0)], [c(sin, 0.0), c(cos, 0.0)]]
            }
            Gate::Rz(theta) => {
                array![
                    [Complex64::from_polar(1.0, -theta / 2.0), o],
                    [o, Complex64::from_polar(1.0, theta / 2.0)]
                ]
            }
            Gate::CX => array![
                [l, o, o, o],
                [o, l, o, o],
                [o, o, o, l],
                [o, o, l, o]
            ],
            Gate::CY => array![
                [l, o, o, o],
                [o, l, o, o],
                [o, o, o, c(0.0, -1.0)],
                [o, o, c(0.0, 1.0), o]
            ],
            Gate::CZ => array![
                [l, o, o, o],
                [o, l, o, o],
                [o, o, l, o],
                [o, o, o, c(-1.0, 0.0)]
            ],
            Gate::Swap => array![
                [l, o, o, o],
                [o, o, l, o],
                [o, l, o, o],
                [o, o, o, l]
            ],
        }
    }

    // Content key for equality and hashing. Angles are compared bitwise so
    // that equality stays consistent with the hash (0.0 vs -0.0 differ).
    fn content_key(&self) -> (u8, u64) {
        match self {
            Gate::I => (0, 0),
            Gate::X => (1, 0),
            Gate::Y => (2, 0),
            Gate::Z => (3, 0),
            Gate::H => (4, 0),
            Gate::S => (5, 0),
            Gate::Sdg => (6, 0),
            Gate::T => (7, 0),
            Gate::Tdg => (8, 0),
            Gate::Rx(t) => (9, t.to_bits()),
            Gate::Ry(t) => (10, t.to_bits()),
            Gate::Rz(t) => (11, t.to_bits()),
            Gate::CX => (12, 0),
            Gate::CY => (13, 0),
            Gate::CZ => (14, 0),
            Gate::Swap => (15, 0),
        }
    }
}

impl PartialEq for Gate {
    fn eq(&self, other: &Self) -> bool {
        self.content_key() == other.content_key()
    }
}

impl Eq for Gate {}

impl Hash for Gate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.content_key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_arity() {
        assert_eq!(Gate::H.num_qubits(), 1);
        assert_eq!(Gate::Rx(0.5).num_qubits(), 1);
        assert_eq!(Gate::CX.num_qubits(), 2);
    }

    #[test]
    fn test_unitary_dims() {
        assert_eq!(Gate::H.unitary().dim(), (2, 2));
        assert_eq!(Gate::CZ.unitary().dim(), (4, 4));
    }

    #[test]
    fn test_hadamard_is_unitary() {
        let h = Gate::H.unitary();
        let product = h.mapv(|z| z.conj()).t().dot(&h);
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product[[i, j]] - Complex64::new(expected, 0.0)).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn test_rotation_equality_is_bitwise() {
        assert_eq!(Gate::Rx(0.5), Gate::Rx(0.5));
        assert_ne!(Gate::Rx(0.5), Gate::Rx(0.25));
        assert_ne!(Gate::Rx(0.0), Gate::Rx(-0.0));
    }
}
