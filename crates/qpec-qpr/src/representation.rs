//! Quasi-probability representations of ideal operations.

use rand::Rng;

use qpec_ir::Circuit;

use crate::error::{QprError, QprResult};
use crate::noisy::NoisyOperation;

/// Tolerance for coefficient comparison in representation equality.
pub const COEFF_TOL: f64 = 1e-9;

/// An ideal operation expressed as a signed combination of noisy ones:
///
///   G = Σ_α  η_α · O_α,    Σ_α η_α = 1
///
/// Terms are held as an explicit ordered association list — the coefficient
/// sequence, the sampling distribution, and [`sample`](Self::sample) all
/// share that fixed order, so construction from the same inputs reproduces
/// the same draws.
#[derive(Debug, Clone)]
pub struct OperationRepresentation {
    ideal: Circuit,
    terms: Vec<(NoisyOperation, f64)>,
    /// Cached one-norm γ = Σ|η_α|.
    norm: f64,
}

impl OperationRepresentation {
    /// Build a representation from an ideal fragment and its expansion.
    pub fn new(ideal: Circuit, terms: Vec<(NoisyOperation, f64)>) -> Self {
        let norm = terms.iter().map(|(_, eta)| eta.abs()).sum();
        Self { ideal, terms, norm }
    }

    /// The ideal operation this representation expands.
    pub fn ideal(&self) -> &Circuit {
        &self.ideal
    }

    /// The ordered (operation, coefficient) pairs.
    pub fn terms(&self) -> &[(NoisyOperation, f64)] {
        &self.terms
    }

    /// Number of terms in the expansion.
    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// The ordered coefficient sequence η_α.
    pub fn coeffs(&self) -> Vec<f64> {
        self.terms.iter().map(|(_, eta)| *eta).collect()
    }

    /// The one-norm γ = Σ|η_α|, cached at construction.
    ///
    /// γ = 1 exactly when no noise-correction volume is needed; larger γ
    /// means quadratically more samples for the same target precision.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// The sampling distribution p(α) = |η_α| / γ, in term order.
    pub fn distribution(&self) -> Vec<f64> {
        self.terms
            .iter()
            .map(|(_, eta)| eta.abs() / self.norm)
            .collect()
    }

    /// Draw one term α ~ p(α) from the supplied random source.
    ///
    /// Returns `(operation, sign(η_α), η_α)`. Identical seeds yield
    /// identical draw sequences. Fails with
    /// [`QprError::EmptyRepresentation`] when the expansion is empty (or
    /// degenerate with γ = 0).
    pub fn sample<R: Rng>(&self, rng: &mut R) -> QprResult<(&NoisyOperation, f64, f64)> {
        if self.terms.is_empty() || self.norm <= 0.0 {
            return Err(QprError::EmptyRepresentation);
        }
        let distribution = self.distribution();
        let alpha = sample_index(&distribution, rng);
        let (op, eta) = &self.terms[alpha];
        Ok((op, eta.signum(), *eta))
    }
}

/// Equality requires the same ideal operation and the same
/// (operation, coefficient) pairs irrespective of enumeration order, with
/// coefficients compared at [`COEFF_TOL`].
impl PartialEq for OperationRepresentation {
    fn eq(&self, other: &Self) -> bool {
        if self.ideal != other.ideal || self.terms.len() != other.terms.len() {
            return false;
        }
        self.terms.iter().all(|(op, eta)| {
            other
                .terms
                .iter()
                .any(|(other_op, other_eta)| op == other_op && (eta - other_eta).abs() <= COEFF_TOL)
        })
    }
}

/// Sample an index from a normalised probability distribution (CDF method).
fn sample_index<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let u: f64 = rng.r#gen();
    let mut cumsum = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumsum += w;
        if u < cumsum {
            return i;
        }
    }
    // Floating-point rounding: return last index.
    weights.len() - 1
}
