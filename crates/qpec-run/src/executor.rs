//! Executor and observable contracts.
//!
//! The estimator consumes anything implementing [`Executor`]; the same
//! object is invokable by callers outside the estimator. An executor may
//! return a ready scalar expectation value or a raw quantum result — the
//! distinction is a tagged union resolved once at the sampler boundary,
//! never by runtime type inspection inside the estimator loop.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ndarray::Array2;
use num_complex::Complex64;
use rustc_hash::FxHashMap;
use thiserror::Error;

use qpec_ir::Circuit;

use crate::error::RunResult;

/// A raw quantum result an observable can turn into a scalar.
#[derive(Debug, Clone)]
pub enum RawResult {
    /// Measurement counts keyed by bitstring, qubit 0 leftmost.
    Counts(FxHashMap<String, u64>),
    /// The final density matrix of the run.
    DensityMatrix(Array2<Complex64>),
}

/// What an executor hands back for one circuit.
#[derive(Debug, Clone)]
pub enum ExecutorOutput {
    /// A ready scalar expectation value.
    Expectation(f64),
    /// A raw result to be reduced by an [`Observable`].
    Raw(RawResult),
}

/// A backend capable of running one realized circuit.
///
/// # Contract
///
/// - `run()` is invoked once per Monte-Carlo draw and may block on
///   network/hardware latency; calls are dispatched concurrently.
/// - When the caller supplies no observable to the estimator, `run()` MUST
///   return [`ExecutorOutput::Expectation`]; raw results without an
///   observable fail the whole run.
/// - Failures surface as [`RunError::Execution`](crate::RunError::Execution)
///   with the offending circuit attached.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute one circuit realization.
    async fn run(&self, circuit: &Circuit) -> RunResult<ExecutorOutput>;
}

/// Error produced by an observable that cannot reduce a raw result.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ObservableError(pub String);

/// Anything that turns a raw quantum result into a scalar expectation value.
pub trait Observable: Send + Sync {
    /// Compute the expectation value of this observable on a raw result.
    fn expectation(&self, result: &RawResult) -> Result<f64, ObservableError>;
}

/// Append-only log of executed circuits.
///
/// Executor-side history is explicit shared state, not an implicit
/// attribute of a callable: clone the log, hand it to an executor, and read
/// it back after a run. Cloning is shallow — all clones append to the same
/// underlying list.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    inner: Arc<Mutex<Vec<Circuit>>>,
}

impl ExecutionLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one executed circuit.
    pub fn record(&self, circuit: &Circuit) {
        self.lock().push(circuit.clone());
    }

    /// Number of recorded circuits.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Snapshot of all recorded circuits, in execution-record order.
    pub fn circuits(&self) -> Vec<Circuit> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Circuit>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
