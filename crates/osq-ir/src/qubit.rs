//! Qubit and classical bit indices.
//!
//! A reference is just an index into the circuit's virtual register; there
//! is no per-qubit object identity and no register metadata survives the
//! reader (see the reader adapter in `osq-qasm3`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// An index in `[0, Q)` identifying a qubit in the circuit's virtual register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitIndex(pub u32);

impl fmt::Display for QubitIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q[{}]", self.0)
    }
}

impl From<u32> for QubitIndex {
    fn from(id: u32) -> Self {
        QubitIndex(id)
    }
}

impl From<usize> for QubitIndex {
    fn from(id: usize) -> Self {
        QubitIndex(u32::try_from(id).expect("QubitIndex overflow: exceeds u32::MAX"))
    }
}

impl QubitIndex {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An index in `[0, B)` identifying a bit in the circuit's virtual register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BitIndex(pub u32);

impl fmt::Display for BitIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b[{}]", self.0)
    }
}

impl From<u32> for BitIndex {
    fn from(id: u32) -> Self {
        BitIndex(id)
    }
}

impl From<usize> for BitIndex {
    fn from(id: usize) -> Self {
        BitIndex(u32::try_from(id).expect("BitIndex overflow: exceeds u32::MAX"))
    }
}

impl BitIndex {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_bracket_notation() {
        assert_eq!(format!("{}", QubitIndex(0)), "q[0]");
        assert_eq!(format!("{}", BitIndex(3)), "b[3]");
    }

    #[test]
    fn index_round_trips_through_usize() {
        let q: QubitIndex = 5usize.into();
        assert_eq!(q.index(), 5);
    }
}
