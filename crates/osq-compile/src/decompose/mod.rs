//! Decomposition passes: single-qubit ABA families, the McKay pulse
//! decomposition, the two-qubit ABC factorization, and the predefined
//! `SWAP`/`CNOT` rewrites.

mod aba;
mod controlled;
mod mckay;
mod rewrite;

pub use aba::{AbaAxes, AbaDecomposer};
pub use controlled::{ControlledDecomposer, Entangling};
pub use mckay::McKayDecomposer;
pub use rewrite::{CnotToCz, SwapToCnot, SwapToCz};
