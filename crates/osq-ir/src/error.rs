//! The compiler-wide error taxonomy: each distinct failure mode gets its
//! own tag so callers can match on `kind` rather than parse a message.

use thiserror::Error;

use crate::qubit::QubitIndex;

/// Errors raised while building, validating, or transforming a circuit.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum IrError {
    /// Propagated verbatim from the external cQASM 3 reader.
    #[error("parse error: {0}")]
    Parse(String),

    /// Non-unitary matrix, degenerate axis with nonzero angle, operand out
    /// of range, or a repeated operand in a multi-qubit gate.
    #[error("invalid gate{}: {reason}", format_location(*.location))]
    InvalidGate { reason: String, location: Option<usize> },

    /// A user- or pass-supplied replacement changes the unitary beyond
    /// global phase.
    #[error(
        "replacement for '{gate_name}'{} changes the unitary beyond global phase",
        format_location(*.location)
    )]
    ReplacementMismatch { gate_name: String, location: Option<usize> },

    /// The interaction validator found operand pairs absent from connectivity.
    #[error("gate interactions not routable under connectivity: {pairs:?}")]
    UnroutableInteractions { pairs: Vec<(u32, u32)> },

    /// The primitive-gate validator found gates outside the allowed set
    /// (including anonymous gates).
    #[error("non-primitive gates present: {names:?}")]
    NonPrimitiveGates { names: Vec<String> },

    /// A router could not find a path connecting two physical qubits.
    #[error("no routing path between qubit {src} and qubit {dst}")]
    NoRoutingPath { src: u32, dst: u32 },

    /// An exporter cannot represent a specific gate in its target format.
    #[error("exporter '{exporter}' cannot represent gate '{gate_name}'{}", format_location(*.location))]
    UnsupportedGate { exporter: String, gate_name: String, location: Option<usize> },

    /// A parameter fell outside its expected domain (e.g. a non-finite angle).
    #[error("domain error: {0}")]
    Domain(String),

    /// Propagated from the semantic algebra (degenerate axis, non-unitary
    /// matrix, non-finite parameter).
    #[error(transparent)]
    Algebra(#[from] osq_algebra::AlgebraError),
}

fn format_location(location: Option<usize>) -> String {
    match location {
        Some(idx) => format!(" (statement {idx})"),
        None => String::new(),
    }
}

impl IrError {
    /// Attaches a statement index to errors that carry a `location` field.
    pub fn at(self, index: usize) -> Self {
        match self {
            IrError::InvalidGate { reason, .. } => {
                IrError::InvalidGate { reason, location: Some(index) }
            }
            IrError::ReplacementMismatch { gate_name, .. } => {
                IrError::ReplacementMismatch { gate_name, location: Some(index) }
            }
            IrError::UnsupportedGate { exporter, gate_name, .. } => {
                IrError::UnsupportedGate { exporter, gate_name, location: Some(index) }
            }
            other => other,
        }
    }

    pub fn invalid_gate(reason: impl Into<String>) -> Self {
        IrError::InvalidGate { reason: reason.into(), location: None }
    }

    pub fn duplicate_operand(qubit: QubitIndex) -> Self {
        IrError::InvalidGate {
            reason: format!("operand {qubit} repeated in multi-qubit gate"),
            location: None,
        }
    }

    pub fn operand_out_of_range(qubit: QubitIndex, num_qubits: u32) -> Self {
        IrError::InvalidGate {
            reason: format!("operand {qubit} out of range for register of size {num_qubits}"),
            location: None,
        }
    }
}

/// Result type used throughout the compiler core.
pub type IrResult<T> = Result<T, IrError>;
