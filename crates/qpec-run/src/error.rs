//! Error types for the sampler/estimator crate.

use thiserror::Error;

use qpec_ir::Circuit;

/// Errors that can occur while estimating an error-cancelled expectation
/// value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    /// The estimator configuration is inconsistent or resolves to zero work.
    ///
    /// Raised before any executor call, so no expensive execution is wasted.
    #[error("invalid estimator configuration: {0}")]
    Configuration(String),

    /// An executor invocation failed or returned a result incompatible with
    /// the observable/expectation contract. Carries the offending circuit
    /// for diagnosis.
    #[error("executor failed on circuit '{}': {message}", .circuit.name())]
    Execution {
        /// The circuit realization the executor was invoked with.
        circuit: Box<Circuit>,
        /// Description of the failure.
        message: String,
    },

    /// Quasi-probability layer error (e.g. sampling an empty representation).
    #[error(transparent)]
    Representation(#[from] qpec_qpr::QprError),

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qpec_ir::IrError),
}

impl RunError {
    /// Build an [`RunError::Execution`] with the offending circuit attached.
    pub fn execution(circuit: &Circuit, message: impl Into<String>) -> Self {
        RunError::Execution {
            circuit: Box::new(circuit.clone()),
            message: message.into(),
        }
    }
}

/// Result type for sampler/estimator operations.
pub type RunResult<T> = Result<T, RunError>;
