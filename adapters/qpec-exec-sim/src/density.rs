//! Density-matrix simulation engine.

use ndarray::Array2;
use num_complex::Complex64;
use rand::Rng;
use rustc_hash::FxHashMap;

use qpec_ir::{Gate, QubitId, unitary};

/// A density matrix representing a (possibly mixed) quantum state.
pub struct DensityMatrix {
    /// 2^n × 2^n state matrix.
    rho: Array2<Complex64>,
    /// Number of qubits.
    num_qubits: u32,
}

impl DensityMatrix {
    /// Create a new density matrix initialized to |0…0⟩⟨0…0|.
    pub fn new(num_qubits: u32) -> Self {
        let dim = 1usize << num_qubits as usize;
        let mut rho = Array2::zeros((dim, dim));
        rho[[0, 0]] = Complex64::new(1.0, 0.0);
        Self { rho, num_qubits }
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The state matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.rho
    }

    /// Apply a full-width unitary: ρ ← U ρ U†.
    pub fn apply_unitary(&mut self, u: &Array2<Complex64>) {
        let u_dag = u.mapv(|z| z.conj()).reversed_axes();
        self.rho = u.dot(&self.rho).dot(&u_dag);
    }

    /// Apply a gate to the given qubits.
    pub fn apply_gate(&mut self, gate: &Gate, qubits: &[QubitId]) {
        let embedded = unitary::embed(&gate.unitary(), qubits, self.num_qubits);
        self.apply_unitary(&embedded);
    }

    /// Apply a single-qubit depolarizing channel:
    /// ρ ← (1−p) ρ + p/3 (XρX + YρY + ZρZ).
    pub fn apply_depolarizing(&mut self, p: f64, qubit: QubitId) {
        let paulis = [Gate::X, Gate::Y, Gate::Z];
        let mut mixed: Array2<Complex64> = Array2::zeros(self.rho.raw_dim());
        for pauli in &paulis {
            let u = unitary::embed(&pauli.unitary(), &[qubit], self.num_qubits);
            let u_dag = u.mapv(|z| z.conj()).reversed_axes();
            mixed = mixed + u.dot(&self.rho).dot(&u_dag);
        }
        self.rho = self.rho.mapv(|z| z * (1.0 - p)) + mixed.mapv(|z| z * (p / 3.0));
    }

    /// Expectation value Re tr(O ρ) of a Hermitian observable matrix.
    pub fn expectation(&self, observable: &Array2<Complex64>) -> f64 {
        let dim = self.rho.nrows();
        let mut trace = Complex64::new(0.0, 0.0);
        for i in 0..dim {
            for j in 0..dim {
                trace += observable[[i, j]] * self.rho[[j, i]];
            }
        }
        trace.re
    }

    /// Computational-basis outcome probabilities (the diagonal).
    pub fn probabilities(&self) -> Vec<f64> {
        (0..self.rho.nrows()).map(|i| self.rho[[i, i]].re).collect()
    }

    /// Sample measurement counts in the computational basis.
    ///
    /// Bitstrings are keyed with qubit 0 leftmost.
    pub fn sample_counts<R: Rng>(&self, shots: u64, rng: &mut R) -> FxHashMap<String, u64> {
        let probs = self.probabilities();
        let mut counts: FxHashMap<String, u64> = FxHashMap::default();
        for _ in 0..shots {
            let u: f64 = rng.r#gen();
            let mut cumsum = 0.0;
            let mut outcome = probs.len() - 1;
            for (i, &p) in probs.iter().enumerate() {
                cumsum += p;
                if u < cumsum {
                    outcome = i;
                    break;
                }
            }
            *counts.entry(self.bitstring(outcome)).or_insert(0) += 1;
        }
        counts
    }

    fn bitstring(&self, index: usize) -> String {
        let n = self.num_qubits as usize;
        (0..n)
            .map(|q| {
                // qubit 0 is the MSB of the basis index
                if (index >> (n - 1 - q)) & 1 == 1 { '1' } else { '0' }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn z_observable() -> Array2<Complex64> {
        Gate::Z.unitary()
    }

    #[test]
    fn test_ground_state_z_expectation() {
        let dm = DensityMatrix::new(1);
        assert!((dm.expectation(&z_observable()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_x_flips_z_expectation() {
        let mut dm = DensityMatrix::new(1);
        dm.apply_gate(&Gate::X, &[QubitId(0)]);
        assert!((dm.expectation(&z_observable()) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_depolarizing_shrinks_z_expectation() {
        // ⟨Z⟩ on |0⟩ scales by 1 − 4p/3 under depolarizing.
        let p = 0.15;
        let mut dm = DensityMatrix::new(1);
        dm.apply_depolarizing(p, QubitId(0));
        let expected = 1.0 - 4.0 * p / 3.0;
        assert!((dm.expectation(&z_observable()) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_trace_preserved_under_noise() {
        let mut dm = DensityMatrix::new(2);
        dm.apply_gate(&Gate::H, &[QubitId(0)]);
        dm.apply_gate(&Gate::CX, &[QubitId(0), QubitId(1)]);
        dm.apply_depolarizing(0.3, QubitId(0));
        dm.apply_depolarizing(0.3, QubitId(1));
        let trace: f64 = dm.probabilities().iter().sum();
        assert!((trace - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_counts_sum_to_shots() {
        let mut dm = DensityMatrix::new(2);
        dm.apply_gate(&Gate::H, &[QubitId(0)]);
        let mut rng = StdRng::seed_from_u64(9);
        let counts = dm.sample_counts(512, &mut rng);
        assert_eq!(counts.values().sum::<u64>(), 512);
        // H on qubit 0 of |00⟩: only "00" and "10" can occur.
        assert!(counts.keys().all(|k| k == "00" || k == "10"));
    }
}
