//! Error types for the quasi-probability crate.

use thiserror::Error;

/// Errors produced by representation construction and solving.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QprError {
    /// Channel matrix dimension does not match the fragment's qubit count.
    #[error("channel matrix dimension {got} does not match fragment: expected {expected}")]
    Dimension {
        /// Dimension required by the fragment (4^n).
        expected: usize,
        /// Dimension of the supplied channel matrix.
        got: usize,
    },

    /// A matrix is not a valid superoperator shape (square, 4^n).
    #[error("matrix of shape {rows}x{cols} is not a 4^n superoperator")]
    NotSuperOpShape {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// A matrix is not a valid unitary shape (square, 2^n).
    #[error("matrix of shape {rows}x{cols} is not a 2^n unitary")]
    InvalidUnitary {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// A basis element carries no channel matrix, so it cannot enter the solver.
    #[error("basis element '{0}' has no channel matrix")]
    MissingChannel(String),

    /// The ideal operation is not in the span of the basis.
    #[error("no representation found: the ideal operation is outside the span of the basis")]
    RepresentationNotFound,

    /// Sampling was attempted on a representation with no terms.
    #[error("representation has no terms to sample from")]
    EmptyRepresentation,

    /// The LP backend failed for a numerical reason.
    #[error("LP solver failed: {0}")]
    Solver(String),

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qpec_ir::IrError),
}

/// Result type for quasi-probability operations.
pub type QprResult<T> = Result<T, QprError>;
