//! cQASM 3 frontend: text → AST ([`parser`]) → [`osq_ir::Circuit`]
//! ([`reader`]). Serialization back to text lives in `osq_ir::writer` and is
//! reached through `Circuit`'s `Display` impl — this crate only reads.
//!
//! # Example
//!
//! ```rust
//! let source = r#"
//! version 3.0;
//! qubit[2] q;
//! bit[2] b;
//! h q[0];
//! CNOT q[0], q[1];
//! b[0] = measure q[0];
//! b[1] = measure q[1];
//! "#;
//!
//! let circuit = osq_qasm3::parse(source).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.statements().len(), 4);
//! ```

mod ast;
mod error;
mod lexer;
mod parser;
mod reader;

pub use error::{ParseError, ParseResult};
pub use reader::read_str as parse;

/// Re-exports the AST types for callers that want the parsed structure
/// rather than a lowered circuit.
pub mod syntax {
    pub use crate::ast::*;
}
