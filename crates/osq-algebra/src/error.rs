//! Error types for the semantic algebra.

use thiserror::Error;

/// Errors raised while manipulating Bloch-sphere rotations or unitary matrices.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum AlgebraError {
    /// A matrix handed to `from_matrix`/`equal_up_to_global_phase` was not unitary
    /// within the configured tolerance.
    #[error("matrix is not unitary within tolerance: {reason}")]
    NotUnitary { reason: String },

    /// A rotation axis had near-zero norm while a nonzero angle was requested.
    #[error("degenerate rotation axis with nonzero angle {angle}")]
    DegenerateAxis { angle: f64 },

    /// A parameter fell outside its expected domain (e.g. a non-finite angle).
    #[error("parameter out of domain: {0}")]
    DomainError(String),
}

pub type AlgebraResult<T> = Result<T, AlgebraError>;
