//! Dense unitary construction for circuits.
//!
//! Basis convention: qubit 0 is the most significant bit of a basis-state
//! index, so `|q0 q1 … q_{n-1}⟩` reads left to right. The first operand of a
//! multi-qubit gate is the most significant bit of the gate's local index,
//! matching [`Gate::unitary`](crate::Gate::unitary).

use ndarray::Array2;
use num_complex::Complex64;

use crate::circuit::Circuit;
use crate::qubit::QubitId;

/// Embed a k-qubit gate unitary into the full 2^n × 2^n matrix acting on
/// the given target qubits.
pub fn embed(gate_unitary: &Array2<Complex64>, qubits: &[QubitId], num_qubits: u32) -> Array2<Complex64> {
    let n = num_qubits as usize;
    let dim = 1usize << n;
    // bit position of qubit q within a basis index (qubit 0 is the MSB)
    let bit = |q: QubitId| n - 1 - q.0 as usize;
    // local sub-index of a basis index restricted to the target qubits
    let sub = |x: usize| -> usize {
        qubits
            .iter()
            .fold(0usize, |acc, &q| (acc << 1) | ((x >> bit(q)) & 1))
    };
    let spectator_mask: usize = {
        let mut mask = dim - 1;
        for &q in qubits {
            mask &= !(1usize << bit(q));
        }
        mask
    };

    let mut full = Array2::zeros((dim, dim));
    for row in 0..dim {
        for col in 0..dim {
            if row & spectator_mask != col & spectator_mask {
                continue;
            }
            full[[row, col]] = gate_unitary[[sub(row), sub(col)]];
        }
    }
    full
}

/// The full unitary of a circuit (gate instructions only; measurements and
/// barriers contribute nothing).
pub fn circuit_unitary(circuit: &Circuit) -> Array2<Complex64> {
    let dim = 1usize << circuit.num_qubits() as usize;
    let mut full = Array2::eye(dim);
    for instruction in circuit.instructions() {
        if let Some(gate) = instruction.as_gate() {
            let embedded = embed(&gate.unitary(), &instruction.qubits, circuit.num_qubits());
            full = embedded.dot(&full);
        }
    }
    full
}
