//! Dense two-phase primal simplex.
//!
//! Solves `min c·x  s.t.  A x = b, x ≥ 0` for the small dense programs the
//! representation solver produces (a few dozen rows, a handful of columns).
//! Pivot selection uses Bland's rule throughout, which makes the solve
//! deterministic for identical inputs and rules out cycling.
//!
//! This module is the swappable backend boundary: callers describe a
//! [`LinearProgram`] and consume a plain solution vector, so a different
//! LP engine can be dropped in without touching representation semantics.

use thiserror::Error;

/// A linear program in standard equality form.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    /// Constraint matrix A, row-major (`rows × cols`).
    pub a: Vec<Vec<f64>>,
    /// Right-hand side b (one entry per row).
    pub b: Vec<f64>,
    /// Objective coefficients c (one entry per column).
    pub c: Vec<f64>,
}

/// Errors from the simplex backend.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LpError {
    /// No x ≥ 0 satisfies A x = b within tolerance.
    #[error("linear program is infeasible")]
    Infeasible,

    /// The pivot loop exceeded its iteration budget.
    #[error("simplex iteration limit exceeded")]
    IterationLimit,
}

/// Minimize `c·x` subject to `A x = b`, `x ≥ 0`.
///
/// `tol` is the feasibility/pivot tolerance. Returns the optimal solution
/// vector (length `c.len()`).
pub fn minimize(lp: &LinearProgram, tol: f64) -> Result<Vec<f64>, LpError> {
    let m = lp.b.len();
    let n = lp.c.len();
    debug_assert!(lp.a.len() == m && lp.a.iter().all(|row| row.len() == n));

    // Augment with one artificial variable per row; flip rows so b ≥ 0,
    // giving the artificials an identity column set as the starting basis.
    let total = n + m;
    let mut a = vec![vec![0.0; total]; m];
    let mut b = vec![0.0; m];
    for i in 0..m {
        let flip = if lp.b[i] < 0.0 { -1.0 } else { 1.0 };
        for j in 0..n {
            a[i][j] = flip * lp.a[i][j];
        }
        b[i] = flip * lp.b[i];
        a[i][n + i] = 1.0;
    }
    let mut basis: Vec<usize> = (n..total).collect();

    // Phase 1: minimize the sum of artificials.
    let mut phase1_cost = vec![0.0; total];
    for j in n..total {
        phase1_cost[j] = 1.0;
    }
    let residual = run(&mut a, &mut b, &mut basis, &phase1_cost, total, tol)?;
    if residual > tol.max(f64::EPSILON) * (1.0 + norm_inf(&lp.b)) {
        return Err(LpError::Infeasible);
    }

    // Phase 2: minimize the original objective. Artificial columns are
    // excluded from entering; any artificial still basic sits at zero on a
    // redundant row and stays there.
    let mut phase2_cost = vec![0.0; total];
    phase2_cost[..n].copy_from_slice(&lp.c);
    run(&mut a, &mut b, &mut basis, &phase2_cost, n, tol)?;

    let mut x = vec![0.0; n];
    for (i, &var) in basis.iter().enumerate() {
        if var < n {
            x[var] = b[i];
        }
    }
    Ok(x)
}

/// Run simplex iterations until no entering column remains.
///
/// Only columns `< col_limit` may enter the basis. Returns the objective
/// value at the final vertex.
fn run(
    a: &mut [Vec<f64>],
    b: &mut [f64],
    basis: &mut [usize],
    cost: &[f64],
    col_limit: usize,
    tol: f64,
) -> Result<f64, LpError> {
    let m = b.len();
    let max_iters = 100 * (m + col_limit).max(1);

    for _ in 0..max_iters {
        // Reduced costs against the current basis.
        let entering = (0..col_limit).find(|&j| {
            if basis.contains(&j) {
                return false;
            }
            let reduced: f64 =
                cost[j] - (0..m).map(|i| cost[basis[i]] * a[i][j]).sum::<f64>();
            reduced < -tol
        });
        let Some(col) = entering else {
            let objective = (0..m).map(|i| cost[basis[i]] * b[i]).sum();
            return Ok(objective);
        };

        // Leaving row: minimum ratio, ties broken by smallest basis variable
        // (Bland).
        let mut leave: Option<(usize, f64)> = None;
        for i in 0..m {
            if a[i][col] > tol {
                let ratio = b[i] / a[i][col];
                let better = match leave {
                    None => true,
                    Some((best_row, best_ratio)) => {
                        ratio < best_ratio - tol
                            || (ratio <= best_ratio + tol && basis[i] < basis[best_row])
                    }
                };
                if better {
                    leave = Some((i, ratio));
                }
            }
        }
        // A one-norm objective over x ≥ 0 is bounded below, so a missing
        // leaving row only arises from numerical breakdown.
        let Some((row, _)) = leave else {
            return Err(LpError::IterationLimit);
        };

        pivot(a, b, basis, row, col);
    }
    Err(LpError::IterationLimit)
}

fn pivot(a: &mut [Vec<f64>], b: &mut [f64], basis: &mut [usize], row: usize, col: usize) {
    let m = b.len();
    let total = a[row].len();

    let inv = 1.0 / a[row][col];
    for j in 0..total {
        a[row][j] *= inv;
    }
    b[row] *= inv;
    a[row][col] = 1.0;

    for i in 0..m {
        if i == row {
            continue;
        }
        let factor = a[i][col];
        if factor == 0.0 {
            continue;
        }
        for j in 0..total {
            a[i][j] -= factor * a[row][j];
        }
        b[i] -= factor * b[row];
        a[i][col] = 0.0;
    }
    basis[row] = col;
}

fn norm_inf(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}
