//! `qpec-run` — Monte-Carlo error-cancellation sampling and estimation.
//!
//! Estimates the expectation value of an observable under an idealized
//! (noise-free) process using only a noisy executor, by sampling circuit
//! realizations from quasi-probability representations and combining the
//! measured results into an unbiased estimator:
//!
//! 1. every represented operation in the circuit is replaced by a noisy
//!    fragment drawn from p(α) = |η_α|/γ,
//! 2. the realization runs on the executor,
//! 3. the measured scalar is scaled by `sign × γ_total`,
//! 4. the mean over draws converges to the ideal expectation value with
//!    statistical error `γ_total/√N`.
//!
//! The executor and observable are external collaborators behind the
//! [`Executor`] and [`Observable`] traits; draws are dispatched
//! concurrently and reproducibly (the random stream is pre-split before
//! dispatch).

pub mod error;
pub mod estimator;
pub mod executor;
pub mod sampler;

pub use error::{RunError, RunResult};
pub use estimator::{DEFAULT_PRECISION, PecData, PecEstimator};
pub use executor::{ExecutionLog, Executor, ExecutorOutput, Observable, ObservableError, RawResult};
pub use sampler::{CircuitSample, sample_circuit};
