//! Error types for the cQASM 3 lexer/parser/reader.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("lexer error at position {position}: {message}")]
    LexerError { position: usize, message: String },

    #[error("unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken { line: usize, expected: String, found: String },

    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),

    #[error("invalid version header: {0}")]
    InvalidVersion(String),

    #[error("undefined register: {0}")]
    UndefinedIdentifier(String),

    #[error("duplicate register declaration: {0}")]
    DuplicateDeclaration(String),

    #[error("unknown gate: {0}")]
    UnknownGate(String),

    #[error("gate '{gate}' expects {expected} qubits, got {got}")]
    WrongQubitCount { gate: String, expected: usize, got: usize },

    #[error("gate '{gate}' expects {expected} parameters, got {got}")]
    WrongParameterCount { gate: String, expected: usize, got: usize },

    #[error("index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds { register: String, index: usize, size: usize },

    #[error("could not evaluate expression to a constant")]
    NonConstantExpression,

    #[error("circuit error: {0}")]
    CircuitError(#[from] osq_ir::IrError),
}

pub type ParseResult<T> = Result<T, ParseError>;
