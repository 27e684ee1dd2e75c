//! Minimum one-norm representation solver.
//!
//! Given the channel matrix G of an ideal operation and a basis of noisy
//! operations with channel matrices {M_α}, finds real coefficients {η_α}
//! minimizing Σ|η_α| subject to `G = Σ_α η_α M_α` entrywise.
//!
//! The search is phrased as a linear program by splitting each coefficient
//! into nonnegative parts, `η_α = η_α⁺ − η_α⁻`, and minimizing
//! `Σ(η_α⁺ + η_α⁻)`. Real and imaginary parts of every matrix entry become
//! separate equality rows. An infeasible program means the ideal operation
//! is outside the span of the basis and is surfaced as
//! [`QprError::RepresentationNotFound`] — never silently approximated.

use tracing::debug;

use qpec_ir::Circuit;

use crate::error::{QprError, QprResult};
use crate::noisy::NoisyBasis;
use crate::representation::OperationRepresentation;
use crate::simplex::{LinearProgram, LpError, minimize};
use crate::superop::SuperOp;

/// Numerical tolerances for the representation solver.
///
/// `constraint_tol` bounds the allowed violation of the equality constraint
/// `G = Σ η_α M_α`; `zero_tol` is the magnitude below which a solved
/// coefficient is treated as zero and dropped from the expansion. Both
/// default to `1e-8`.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    /// Equality-constraint tolerance.
    pub constraint_tol: f64,
    /// Coefficients with |η| at or below this are dropped.
    pub zero_tol: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            constraint_tol: 1e-8,
            zero_tol: 1e-8,
        }
    }
}

impl SolverOptions {
    /// Create options with the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the equality-constraint tolerance.
    #[must_use]
    pub fn with_constraint_tol(mut self, tol: f64) -> Self {
        self.constraint_tol = tol;
        self
    }

    /// Set the zero-coefficient threshold.
    #[must_use]
    pub fn with_zero_tol(mut self, tol: f64) -> Self {
        self.zero_tol = tol;
        self
    }
}

/// Find the minimum one-norm representation of an ideal operation.
///
/// The ideal operation is given as a circuit fragment; its channel is the
/// superoperator of the fragment's unitary. Every basis element must carry
/// a channel matrix of the same dimension.
///
/// The solve is deterministic: identical inputs produce identical
/// coefficient vectors, ordered by the basis iteration order.
pub fn find_representation(
    ideal: &Circuit,
    basis: &NoisyBasis,
    options: &SolverOptions,
) -> QprResult<OperationRepresentation> {
    let target = SuperOp::from_circuit(ideal)?;
    find_representation_of_channel(ideal, &target, basis, options)
}

/// As [`find_representation`], but with an explicitly supplied target
/// channel for the ideal operation.
pub fn find_representation_of_channel(
    ideal: &Circuit,
    target: &SuperOp,
    basis: &NoisyBasis,
    options: &SolverOptions,
) -> QprResult<OperationRepresentation> {
    if basis.is_empty() {
        return Err(QprError::RepresentationNotFound);
    }
    let dim = target.dim();
    let k = basis.len();

    let mut channels = Vec::with_capacity(k);
    for op in basis.iter() {
        let channel = op
            .channel()
            .ok_or_else(|| QprError::MissingChannel(op.circuit().name().to_string()))?;
        if channel.dim() != dim {
            return Err(QprError::Dimension {
                expected: dim,
                got: channel.dim(),
            });
        }
        channels.push(channel);
    }

    // One row per real part and one per imaginary part of each matrix entry;
    // columns are η⁺ then η⁻.
    let rows = 2 * dim * dim;
    let mut a = vec![vec![0.0; 2 * k]; rows];
    let mut b = vec![0.0; rows];
    for i in 0..dim {
        for j in 0..dim {
            let re_row = 2 * (i * dim + j);
            let im_row = re_row + 1;
            b[re_row] = target.matrix()[[i, j]].re;
            b[im_row] = target.matrix()[[i, j]].im;
            for (alpha, channel) in channels.iter().enumerate() {
                let entry = channel.matrix()[[i, j]];
                a[re_row][alpha] = entry.re;
                a[re_row][k + alpha] = -entry.re;
                a[im_row][alpha] = entry.im;
                a[im_row][k + alpha] = -entry.im;
            }
        }
    }

    let lp = LinearProgram {
        a,
        b,
        c: vec![1.0; 2 * k],
    };
    let x = match minimize(&lp, options.constraint_tol) {
        Ok(x) => x,
        Err(LpError::Infeasible) => return Err(QprError::RepresentationNotFound),
        Err(err) => return Err(QprError::Solver(err.to_string())),
    };

    let mut terms = Vec::new();
    for (alpha, op) in basis.iter().enumerate() {
        let eta = x[alpha] - x[k + alpha];
        if eta.abs() > options.zero_tol {
            terms.push((op.clone(), eta));
        }
    }

    let representation = OperationRepresentation::new(ideal.clone(), terms);
    debug!(
        basis_size = k,
        n_terms = representation.num_terms(),
        gamma = representation.norm(),
        "solved quasi-probability representation"
    );
    Ok(representation)
}
