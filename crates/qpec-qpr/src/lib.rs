//! `qpec-qpr` — quasi-probability representations over noisy bases.
//!
//! Expresses an ideal quantum operation as a signed linear combination of
//! operations implementable on a noisy device:
//!
//!   G = Σ_α  η_α · O_α,    Σ_α η_α = 1,    γ = Σ_α |η_α| ≥ 1
//!
//! The pieces:
//!
//! - [`SuperOp`] — dense channel matrices on vectorized density matrices
//! - [`NoisyOperation`] / [`NoisyBasis`] — implementable building blocks
//! - [`solver::find_representation`] — minimum one-norm decomposition via a
//!   deterministic linear program
//! - [`OperationRepresentation`] — the solved expansion, with the sampling
//!   distribution p(α) = |η_α|/γ used by the Monte-Carlo estimator
//!
//! # Quick start
//!
//! ```rust
//! use qpec_ir::{Circuit, QubitId};
//! use qpec_qpr::{NoisyBasis, NoisyOperation, SolverOptions, SuperOp, solver};
//!
//! // Ideal X, expressed over a noiseless {X, Z} basis.
//! let mut ideal = Circuit::with_size("x", 1, 0);
//! ideal.x(QubitId(0)).unwrap();
//!
//! let element = |c: Circuit| {
//!     let channel = SuperOp::from_circuit(&c).unwrap();
//!     NoisyOperation::new(c, Some(channel)).unwrap()
//! };
//! let mut x = Circuit::with_size("x", 1, 0);
//! x.x(QubitId(0)).unwrap();
//! let mut z = Circuit::with_size("z", 1, 0);
//! z.z(QubitId(0)).unwrap();
//! let basis = NoisyBasis::new([element(x), element(z)]);
//!
//! let rep = solver::find_representation(&ideal, &basis, &SolverOptions::default()).unwrap();
//! assert_eq!(rep.num_terms(), 1);
//! assert!((rep.norm() - 1.0).abs() < 1e-6);
//! ```

pub mod error;
pub mod noisy;
pub mod representation;
pub mod simplex;
pub mod solver;
pub mod superop;

pub use error::{QprError, QprResult};
pub use noisy::{NoisyBasis, NoisyOperation};
pub use representation::{COEFF_TOL, OperationRepresentation};
pub use solver::SolverOptions;
pub use superop::SuperOp;
