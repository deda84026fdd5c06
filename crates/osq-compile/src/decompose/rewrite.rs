//! Predefined rewrites for `SWAP` and `CNOT`, matched structurally (by
//! comparing the gate's matrix to the reference up to global phase) rather
//! than by catalog name, so a renamed or anonymous equivalent still rewrites.

use std::f64::consts::FRAC_PI_2;

use osq_algebra::equal_up_to_global_phase;
use osq_ir::{catalog, Decomposer, Gate, IrResult, QubitIndex, Statement};

fn two_qubit_operands(gate: &Gate) -> Option<(QubitIndex, QubitIndex)> {
    let operands = gate.operands();
    (operands.len() == 2).then(|| (operands[0], operands[1]))
}

/// Rewrites `SWAP(a, b)` into three `CNOT`s: `CNOT(a,b)·CNOT(b,a)·CNOT(a,b)`.
pub struct SwapToCnot {
    pub epsilon: f64,
}

impl SwapToCnot {
    pub fn new() -> Self {
        SwapToCnot { epsilon: catalog::EPSILON }
    }
}

impl Default for SwapToCnot {
    fn default() -> Self {
        Self::new()
    }
}

impl Decomposer for SwapToCnot {
    fn name(&self) -> &'static str {
        "SWAP2CNOT"
    }

    fn decompose(&self, gate: &Gate, _location: usize) -> IrResult<Option<Vec<Statement>>> {
        let Some((a, b)) = two_qubit_operands(gate) else { return Ok(None) };
        let reference = catalog::swap(a, b).to_matrix();
        if !equal_up_to_global_phase(&gate.to_matrix(), &reference, self.epsilon) {
            return Ok(None);
        }
        Ok(Some(vec![
            Statement::gate(catalog::cnot(a, b)),
            Statement::gate(catalog::cnot(b, a)),
            Statement::gate(catalog::cnot(a, b)),
        ]))
    }
}

/// Rewrites `SWAP(a, b)` into three `CZ`s, each `CNOT` in the
/// [`SwapToCnot`] expansion replaced by its `CZ` equivalent
/// (`Ry(−π/2)·CZ·Ry(π/2)` on whichever operand is the conceptual target).
pub struct SwapToCz {
    pub epsilon: f64,
}

impl SwapToCz {
    pub fn new() -> Self {
        SwapToCz { epsilon: catalog::EPSILON }
    }
}

impl Default for SwapToCz {
    fn default() -> Self {
        Self::new()
    }
}

impl Decomposer for SwapToCz {
    fn name(&self) -> &'static str {
        "SWAP2CZ"
    }

    fn decompose(&self, gate: &Gate, _location: usize) -> IrResult<Option<Vec<Statement>>> {
        let Some((a, b)) = two_qubit_operands(gate) else { return Ok(None) };
        let reference = catalog::swap(a, b).to_matrix();
        if !equal_up_to_global_phase(&gate.to_matrix(), &reference, self.epsilon) {
            return Ok(None);
        }
        let mut out = Vec::with_capacity(9);
        for &target in &[b, a, b] {
            out.push(Statement::gate(catalog::ry(target, FRAC_PI_2)));
            out.push(Statement::gate(catalog::cz(a, b)));
            out.push(Statement::gate(catalog::ry(target, -FRAC_PI_2)));
        }
        Ok(Some(out))
    }
}

/// Rewrites `CNOT(control, target)` into `Ry(π/2)·CZ(control,target)·Ry(−π/2)`
/// on the target qubit (matrix notation, rightmost applied first).
pub struct CnotToCz {
    pub epsilon: f64,
}

impl CnotToCz {
    pub fn new() -> Self {
        CnotToCz { epsilon: catalog::EPSILON }
    }
}

impl Default for CnotToCz {
    fn default() -> Self {
        Self::new()
    }
}

impl Decomposer for CnotToCz {
    fn name(&self) -> &'static str {
        "CNOT2CZ"
    }

    fn decompose(&self, gate: &Gate, _location: usize) -> IrResult<Option<Vec<Statement>>> {
        let Some((control, target)) = two_qubit_operands(gate) else { return Ok(None) };
        let reference = catalog::cnot(control, target).to_matrix();
        if !equal_up_to_global_phase(&gate.to_matrix(), &reference, self.epsilon) {
            return Ok(None);
        }
        Ok(Some(vec![
            Statement::gate(catalog::ry(target, FRAC_PI_2)),
            Statement::gate(catalog::cz(control, target)),
            Statement::gate(catalog::ry(target, -FRAC_PI_2)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osq_ir::semantics;

    #[test]
    fn swap_to_cnot_preserves_unitary() {
        let swap = catalog::swap(QubitIndex(0), QubitIndex(1));
        let decomposer = SwapToCnot::new();
        let replacement = decomposer.decompose(&swap, 0).unwrap().unwrap();
        assert_eq!(replacement.len(), 3);

        let original = semantics::gate_unitary(&swap, 2);
        let recomposed = semantics::circuit_unitary(&replacement, 2);
        assert!(equal_up_to_global_phase(&original, &recomposed, 1e-8));
    }

    #[test]
    fn swap_to_cz_preserves_unitary() {
        let swap = catalog::swap(QubitIndex(0), QubitIndex(1));
        let decomposer = SwapToCz::new();
        let replacement = decomposer.decompose(&swap, 0).unwrap().unwrap();

        let original = semantics::gate_unitary(&swap, 2);
        let recomposed = semantics::circuit_unitary(&replacement, 2);
        assert!(equal_up_to_global_phase(&original, &recomposed, 1e-8));
    }

    #[test]
    fn cnot_to_cz_preserves_unitary() {
        let cnot = catalog::cnot(QubitIndex(0), QubitIndex(1));
        let decomposer = CnotToCz::new();
        let replacement = decomposer.decompose(&cnot, 0).unwrap().unwrap();
        assert_eq!(replacement.len(), 3);

        let original = semantics::gate_unitary(&cnot, 2);
        let recomposed = semantics::circuit_unitary(&replacement, 2);
        assert!(equal_up_to_global_phase(&original, &recomposed, 1e-8));
    }

    #[test]
    fn applying_swap_to_cnot_twice_to_fresh_swaps_is_identity() {
        // Two independent SWAPs decomposed and recomposed must still match
        // two SWAPs applied in sequence (the identity).
        let swap = catalog::swap(QubitIndex(0), QubitIndex(1));
        let decomposer = SwapToCnot::new();
        let first = decomposer.decompose(&swap, 0).unwrap().unwrap();
        let second = decomposer.decompose(&swap, 0).unwrap().unwrap();
        let mut combined = first;
        combined.extend(second);

        let identity = semantics::circuit_unitary(&[], 2);
        let recomposed = semantics::circuit_unitary(&combined, 2);
        assert!(equal_up_to_global_phase(&identity, &recomposed, 1e-8));
    }

    #[test]
    fn non_swap_two_qubit_gate_is_untouched_by_swap_rewrite() {
        let cnot = catalog::cnot(QubitIndex(0), QubitIndex(1));
        let decomposer = SwapToCnot::new();
        assert!(decomposer.decompose(&cnot, 0).unwrap().is_none());
    }
}
