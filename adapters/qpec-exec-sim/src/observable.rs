//! Observables over raw simulator results.

use ndarray::Array2;
use num_complex::Complex64;

use qpec_run::{Observable, ObservableError, RawResult};

/// A Hermitian observable given as a dense matrix.
///
/// Reduces raw density matrices via `Re tr(O ρ)`. Measurement counts carry
/// no off-diagonal information, so this observable rejects them.
#[derive(Debug, Clone)]
pub struct MatrixObservable {
    matrix: Array2<Complex64>,
}

impl MatrixObservable {
    /// Wrap an observable matrix.
    pub fn new(matrix: Array2<Complex64>) -> Self {
        Self { matrix }
    }

    /// The observable matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }
}

impl Observable for MatrixObservable {
    fn expectation(&self, result: &RawResult) -> Result<f64, ObservableError> {
        match result {
            RawResult::DensityMatrix(rho) => {
                if rho.nrows() != self.matrix.nrows() {
                    return Err(ObservableError(format!(
                        "observable dimension {} does not match state dimension {}",
                        self.matrix.nrows(),
                        rho.nrows()
                    )));
                }
                let dim = rho.nrows();
                let mut trace = Complex64::new(0.0, 0.0);
                for i in 0..dim {
                    for j in 0..dim {
                        trace += self.matrix[[i, j]] * rho[[j, i]];
                    }
                }
                Ok(trace.re)
            }
            RawResult::Counts(_) => Err(ObservableError(
                "matrix observable requires a density matrix, got counts".into(),
            )),
        }
    }
}

/// The parity observable Z⊗Z⊗…⊗Z.
///
/// Works on measurement counts (eigenvalue (−1)^parity per bitstring) and
/// on density matrices (diagonal reduction).
#[derive(Debug, Clone, Copy, Default)]
pub struct PauliZObservable;

impl PauliZObservable {
    /// Create the parity observable.
    pub fn new() -> Self {
        Self
    }
}

impl Observable for PauliZObservable {
    fn expectation(&self, result: &RawResult) -> Result<f64, ObservableError> {
        match result {
            RawResult::Counts(counts) => {
                let mut total = 0u64;
                let mut sum = 0.0;
                for (bits, &count) in counts {
                    total += count;
                    let parity = bits.chars().filter(|&c| c == '1').count();
                    let eigenvalue = if parity % 2 == 0 { 1.0 } else { -1.0 };
                    sum += eigenvalue * count as f64;
                }
                if total == 0 {
                    return Err(ObservableError("no counts recorded".into()));
                }
                Ok(sum / total as f64)
            }
            RawResult::DensityMatrix(rho) => {
                let mut sum = 0.0;
                for i in 0..rho.nrows() {
                    let eigenvalue = if (i.count_ones() % 2) == 0 { 1.0 } else { -1.0 };
                    sum += eigenvalue * rho[[i, i]].re;
                }
                Ok(sum)
            }
        }
    }
}
