//! `qpec-exec-sim` — density-matrix simulator executor for QPEC.
//!
//! Implements the [`qpec_run::Executor`] contract with a small dense
//! density-matrix engine and a configurable per-gate depolarizing channel,
//! so the error-cancellation loop can be exercised end to end without
//! hardware. Also provides [`MatrixObservable`] and [`PauliZObservable`]
//! for reducing raw simulator results.

pub mod density;
pub mod executor;
pub mod observable;

pub use density::DensityMatrix;
pub use executor::DensityMatrixExecutor;
pub use observable::{MatrixObservable, PauliZObservable};
