//! Embeds a gate's local matrix into the full `2^Q × 2^Q` space and
//! composes a statement list into a single unitary.
//!
//! Used to check that "unitary(P(C)) ≡ unitary(C) up to global phase" by
//! symbolic matrix composition, and by `Circuit::replace`'s
//! `ReplacementMismatchError` check. Intended for small `Q` — cost is
//! `O(4^Q · Q)` per gate.

use num_complex::Complex64;
use osq_algebra::Matrix2;

use crate::gate::Gate;
use crate::instruction::Statement;
use crate::qubit::QubitIndex;

/// Qubit `0` is the most significant bit of the basis-state index,
/// consistent with `Gate::to_matrix`'s convention for controlled gates
/// (control as the MSB of its own local matrix).
fn bit_position(qubit: usize, num_qubits: usize) -> usize {
    num_qubits - 1 - qubit
}

/// Embeds a `k`-qubit local matrix acting on `operands` into an
/// `n`-qubit space, identity elsewhere.
pub fn embed(local: &Matrix2, operands: &[QubitIndex], num_qubits: u32) -> Matrix2 {
    let n = num_qubits as usize;
    let dim = 1usize << n;
    let k = operands.len();
    let operand_positions: Vec<usize> = operands.iter().map(|q| q.index()).collect();

    let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
    for i in 0..dim {
        for j in 0..dim {
            let spectator_bits_match = (0..n).all(|qubit| {
                if operand_positions.contains(&qubit) {
                    return true;
                }
                let pos = bit_position(qubit, n);
                ((i >> pos) & 1) == ((j >> pos) & 1)
            });
            if !spectator_bits_match {
                continue;
            }

            let mut sub_i = 0usize;
            let mut sub_j = 0usize;
            for (idx, &qubit) in operand_positions.iter().enumerate() {
                let pos = bit_position(qubit, n);
                let bi = (i >> pos) & 1;
                let bj = (j >> pos) & 1;
                sub_i |= bi << (k - 1 - idx);
                sub_j |= bj << (k - 1 - idx);
            }
            data[i * dim + j] = local.get(sub_i, sub_j);
        }
    }
    Matrix2::new(dim, data)
}

/// The full-space unitary of a single gate.
pub fn gate_unitary(gate: &Gate, num_qubits: u32) -> Matrix2 {
    embed(&gate.to_matrix(), &gate.operands(), num_qubits)
}

/// Composes the unitary action of a statement list over `num_qubits`
/// qubits, in program order. Non-unitary and control statements are
/// transparent (identity) — this function evaluates the coherent quantum
/// part only; it does not model measurement outcomes or classical control.
pub fn circuit_unitary(statements: &[Statement], num_qubits: u32) -> Matrix2 {
    let mut acc = Matrix2::identity(1usize << num_qubits);
    for statement in statements {
        if let Some(gate) = statement.as_gate() {
            let u = gate_unitary(gate, num_qubits);
            acc = u.mul(&acc);
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn embed_single_qubit_gate_on_two_qubits() {
        let x = catalog::x(QubitIndex(1));
        let u = gate_unitary(&x, 2);
        assert_eq!(u.dim, 4);
        // |00> -> |01>, i.e. row 1 gets amplitude from column 0.
        assert!(u.get(1, 0).norm() > 0.9);
    }

    #[test]
    fn cnot_then_cnot_is_identity() {
        let statements = vec![
            Statement::gate(catalog::cnot(QubitIndex(0), QubitIndex(1))),
            Statement::gate(catalog::cnot(QubitIndex(0), QubitIndex(1))),
        ];
        let u = circuit_unitary(&statements, 2);
        let id = Matrix2::identity(4);
        assert!(osq_algebra::equal_up_to_global_phase(&u, &id, 1e-9));
    }

    #[test]
    fn non_gate_statements_are_transparent() {
        let statements = vec![
            Statement::gate(catalog::x(QubitIndex(0))),
            Statement::barrier(QubitIndex(0)),
            Statement::measure(QubitIndex(0), crate::qubit::BitIndex(0)),
        ];
        let u = circuit_unitary(&statements, 1);
        let x_alone = circuit_unitary(&[Statement::gate(catalog::x(QubitIndex(0)))], 1);
        assert!(osq_algebra::equal_up_to_global_phase(&u, &x_alone, 1e-9));
    }
}
