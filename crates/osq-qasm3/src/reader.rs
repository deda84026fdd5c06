//! Lowers a parsed AST [`Program`] into a populated [`osq_ir::Circuit`]:
//! register concatenation, SGMQ expansion, constant-expression evaluation,
//! and gate-modifier application.

use std::collections::HashMap;

use num_complex::Complex64;
use osq_algebra::{Axis, Matrix2};
use osq_ir::{catalog, Circuit, Gate, QubitIndex};

use crate::ast::{BitRef, Expression, GateCall, GateModifier, Program, QubitRef, Statement};
use crate::error::{ParseError, ParseResult};

/// Parses and lowers a cQASM 3 source string directly into a circuit.
pub fn read_str(source: &str) -> ParseResult<Circuit> {
    let program = crate::parser::parse(source)?;
    read(&program)
}

#[derive(Debug, Clone, Copy)]
struct Register {
    offset: u32,
    size: u32,
}

/// Lowers a parsed program into a circuit. Qubit and bit registers are
/// concatenated, in declaration order, into one flat index space each — a
/// `qubit[2] a; qubit[3] b;` program puts `b[0]` at absolute index 2.
pub fn read(program: &Program) -> ParseResult<Circuit> {
    let mut qregs: HashMap<String, Register> = HashMap::new();
    let mut bregs: HashMap<String, Register> = HashMap::new();
    let mut num_qubits = 0u32;
    let mut num_bits = 0u32;

    for statement in &program.statements {
        match statement {
            Statement::QubitDecl { name, size } => {
                if qregs.contains_key(name) {
                    return Err(ParseError::DuplicateDeclaration(name.clone()));
                }
                let size = size.unwrap_or(1);
                qregs.insert(name.clone(), Register { offset: num_qubits, size });
                num_qubits += size;
            }
            Statement::BitDecl { name, size } => {
                if bregs.contains_key(name) {
                    return Err(ParseError::DuplicateDeclaration(name.clone()));
                }
                let size = size.unwrap_or(1);
                bregs.insert(name.clone(), Register { offset: num_bits, size });
                num_bits += size;
            }
            _ => {}
        }
    }

    let mut circuit = Circuit::new("main", num_qubits, num_bits);
    for statement in &program.statements {
        lower_statement(statement, &qregs, &bregs, &mut circuit)?;
    }
    Ok(circuit)
}

fn check_index(index: u32, register: &Register, name: &str) -> ParseResult<()> {
    if index >= register.size {
        return Err(ParseError::IndexOutOfBounds {
            register: name.to_string(),
            index: index as usize,
            size: register.size as usize,
        });
    }
    Ok(())
}

fn resolve_qubit_list(qref: &QubitRef, qregs: &HashMap<String, Register>) -> ParseResult<Vec<u32>> {
    let name = qref.register_name();
    let register = *qregs.get(name).ok_or_else(|| ParseError::UndefinedIdentifier(name.to_string()))?;
    match qref {
        QubitRef::Single { index: Some(i), .. } => {
            check_index(*i, &register, name)?;
            Ok(vec![register.offset + i])
        }
        QubitRef::Single { index: None, .. } => Ok((0..register.size).map(|i| register.offset + i).collect()),
        QubitRef::Range { start, end, .. } => {
            check_index(*end, &register, name)?;
            Ok((*start..=*end).map(|i| register.offset + i).collect())
        }
    }
}

fn resolve_bit_list(bref: &BitRef, bregs: &HashMap<String, Register>) -> ParseResult<Vec<u32>> {
    let name = bref.register_name();
    let register = *bregs.get(name).ok_or_else(|| ParseError::UndefinedIdentifier(name.to_string()))?;
    match bref {
        BitRef::Single { index: Some(i), .. } => {
            check_index(*i, &register, name)?;
            Ok(vec![register.offset + i])
        }
        BitRef::Single { index: None, .. } => Ok((0..register.size).map(|i| register.offset + i).collect()),
        BitRef::Range { start, end, .. } => {
            check_index(*end, &register, name)?;
            Ok((*start..=*end).map(|i| register.offset + i).collect())
        }
    }
}

fn lower_statement(
    statement: &Statement,
    qregs: &HashMap<String, Register>,
    bregs: &HashMap<String, Register>,
    circuit: &mut Circuit,
) -> ParseResult<()> {
    match statement {
        Statement::QubitDecl { .. } | Statement::BitDecl { .. } => Ok(()),
        Statement::Gate(call) => lower_gate_call(call, qregs, circuit),
        Statement::Measure { qubits, bits } => {
            let qlist = flatten(qubits, qregs, resolve_qubit_list)?;
            let blist = flatten(bits, bregs, resolve_bit_list)?;
            if qlist.len() != blist.len() {
                return Err(ParseError::WrongQubitCount {
                    gate: "measure".into(),
                    expected: qlist.len(),
                    got: blist.len(),
                });
            }
            for (q, b) in qlist.into_iter().zip(blist) {
                circuit.measure(q, b).map_err(ParseError::from)?;
            }
            Ok(())
        }
        Statement::Reset { qubits } => {
            for q in flatten(qubits, qregs, resolve_qubit_list)? {
                circuit.reset(q).map_err(ParseError::from)?;
            }
            Ok(())
        }
        Statement::Init { qubits } => {
            for q in flatten(qubits, qregs, resolve_qubit_list)? {
                circuit.init(q).map_err(ParseError::from)?;
            }
            Ok(())
        }
        Statement::Barrier { qubits } => {
            if qubits.is_empty() {
                for q in 0..circuit.num_qubits() {
                    circuit.barrier(q).map_err(ParseError::from)?;
                }
            } else {
                for q in flatten(qubits, qregs, resolve_qubit_list)? {
                    circuit.barrier(q).map_err(ParseError::from)?;
                }
            }
            Ok(())
        }
        Statement::Wait { cycles, qubits } => {
            let value = cycles.as_f64().ok_or(ParseError::NonConstantExpression)?;
            if value < 0.0 {
                return Err(ParseError::NonConstantExpression);
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let cycles_u64 = value.round() as u64;
            for q in flatten(qubits, qregs, resolve_qubit_list)? {
                circuit.wait(q, cycles_u64).map_err(ParseError::from)?;
            }
            Ok(())
        }
        Statement::AsmDeclaration { backend_name, payload } => {
            circuit.asm(backend_name.clone(), payload.clone()).map_err(ParseError::from)?;
            Ok(())
        }
    }
}

fn flatten<T, F>(refs: &[T], registers: &HashMap<String, Register>, resolve: F) -> ParseResult<Vec<u32>>
where
    F: Fn(&T, &HashMap<String, Register>) -> ParseResult<Vec<u32>>,
{
    let mut out = Vec::new();
    for r in refs {
        out.extend(resolve(r, registers)?);
    }
    Ok(out)
}

/// Lowers one gate call, expanding SGMQ operand lists (register-wide or
/// range references broadcast across parallel gate applications) and
/// applying any `ctrl`/`negctrl`/`inv`/`pow` modifiers.
fn lower_gate_call(call: &GateCall, qregs: &HashMap<String, Register>, circuit: &mut Circuit) -> ParseResult<()> {
    let operand_lists: Vec<Vec<u32>> =
        call.qubits.iter().map(|q| resolve_qubit_list(q, qregs)).collect::<ParseResult<_>>()?;
    let reps = operand_lists.iter().map(Vec::len).filter(|&n| n > 1).max().unwrap_or(1);
    for list in &operand_lists {
        if list.len() != 1 && list.len() != reps {
            return Err(ParseError::WrongQubitCount { gate: call.name.clone(), expected: reps, got: list.len() });
        }
    }

    let params: Vec<f64> =
        call.params.iter().map(|e| e.as_f64().ok_or(ParseError::NonConstantExpression)).collect::<ParseResult<_>>()?;

    let control_count: usize = call
        .modifiers
        .iter()
        .map(|m| match m {
            GateModifier::Ctrl(c) | GateModifier::NegCtrl(c) => c.unwrap_or(1) as usize,
            GateModifier::Inv | GateModifier::Pow(_) => 0,
        })
        .sum();

    for rep in 0..reps {
        let operands: Vec<u32> =
            operand_lists.iter().map(|list| if list.len() == 1 { list[0] } else { list[rep] }).collect();
        if operands.len() < control_count {
            return Err(ParseError::WrongQubitCount {
                gate: call.name.clone(),
                expected: control_count,
                got: operands.len(),
            });
        }
        let (controls, base_operands) = operands.split_at(control_count);
        let base_gate = build_named_gate(&call.name, &params, base_operands)?;
        let gate = apply_modifiers(base_gate, &call.modifiers, controls)?;
        circuit.push_gate(gate).map_err(ParseError::from)?;
    }
    Ok(())
}

fn build_named_gate(name: &str, params: &[f64], operands: &[u32]) -> ParseResult<Gate> {
    let q = |i: usize| QubitIndex(operands[i]);
    match (name, params, operands.len()) {
        ("i" | "I", [], 1) => Ok(catalog::identity(q(0))),
        ("x" | "X", [], 1) => Ok(catalog::x(q(0))),
        ("y" | "Y", [], 1) => Ok(catalog::y(q(0))),
        ("z" | "Z", [], 1) => Ok(catalog::z(q(0))),
        ("h" | "H", [], 1) => Ok(catalog::h(q(0))),
        ("s" | "S", [], 1) => Ok(catalog::s(q(0))),
        ("sdg" | "Sdg", [], 1) => Ok(catalog::sdg(q(0))),
        ("t" | "T", [], 1) => Ok(catalog::t(q(0))),
        ("tdg" | "Tdg", [], 1) => Ok(catalog::tdg(q(0))),
        ("x90" | "X90", [], 1) => Ok(catalog::x90(q(0))),
        ("mx90" | "mX90", [], 1) => Ok(catalog::mx90(q(0))),
        ("y90" | "Y90", [], 1) => Ok(catalog::y90(q(0))),
        ("my90" | "mY90", [], 1) => Ok(catalog::my90(q(0))),
        ("rx" | "Rx", [theta], 1) => Ok(catalog::rx(q(0), *theta)),
        ("ry" | "Ry", [theta], 1) => Ok(catalog::ry(q(0), *theta)),
        ("rz" | "Rz", [theta], 1) => Ok(catalog::rz(q(0), *theta)),
        ("prx" | "PRX", [theta, phi], 1) => Ok(catalog::prx(q(0), *theta, *phi)),
        ("cnot" | "CNOT", [], 2) => Ok(catalog::cnot(q(0), q(1))),
        ("cz" | "CZ", [], 2) => Ok(catalog::cz(q(0), q(1))),
        ("cr" | "CR", [theta], 2) => Ok(catalog::cr(q(0), q(1), *theta)),
        // The writer emits CRk's angle as `theta` (not the integer `k` the
        // `Circuit::crk` builder takes), so reading it back just renames a
        // plain CR — same controlled-Rz body, matching name.
        ("crk" | "CRk", [theta], 2) => Ok(catalog::cr(q(0), q(1), *theta).with_name(Some("CRk".to_string()))),
        ("swap" | "SWAP", [], 2) => Ok(catalog::swap(q(0), q(1))),
        ("rn" | "Rn", [nx, ny, nz, angle, phase], 1) => {
            let axis = Axis::new(*nx, *ny, *nz).ok_or(ParseError::NonConstantExpression)?;
            catalog::rn(q(0), axis, *angle, *phase).map_err(ParseError::from)
        }
        _ => Err(ParseError::UnknownGate(format!("{name}/{}q/{}p", operands.len(), params.len()))),
    }
}

/// Applies a gate call's modifier chain to its base gate. `Inv` and `Pow`
/// act on the base gate only (innermost, before any control wrapping);
/// `Ctrl`/`NegCtrl` consume `extra_qubits` front-to-back in written order
/// and wrap outward, so the modifier closest to the gate name becomes the
/// innermost control.
fn apply_modifiers(gate: Gate, modifiers: &[GateModifier], extra_qubits: &[u32]) -> ParseResult<Gate> {
    let mut result = gate;
    for modifier in modifiers {
        if matches!(modifier, GateModifier::Inv) {
            result = invert_gate(&result)?;
        }
    }
    for modifier in modifiers {
        if let GateModifier::Pow(expr) = modifier {
            let exponent = expr.as_f64().ok_or(ParseError::NonConstantExpression)?;
            result = power_gate(&result, exponent)?;
        }
    }

    let mut pairs = Vec::new();
    let mut cursor = 0usize;
    for modifier in modifiers {
        match modifier {
            GateModifier::Ctrl(count) => {
                for _ in 0..count.unwrap_or(1) {
                    pairs.push((false, extra_qubits[cursor]));
                    cursor += 1;
                }
            }
            GateModifier::NegCtrl(count) => {
                for _ in 0..count.unwrap_or(1) {
                    pairs.push((true, extra_qubits[cursor]));
                    cursor += 1;
                }
            }
            GateModifier::Inv | GateModifier::Pow(_) => {}
        }
    }

    for (is_neg, qubit) in pairs.into_iter().rev() {
        result = if is_neg {
            wrap_negctrl(QubitIndex(qubit), result)?
        } else {
            Gate::controlled(QubitIndex(qubit), result, None).map_err(ParseError::from)?
        };
    }

    Ok(result)
}

/// A negative-control wrap has no `GateSemantic` variant of its own — it is
/// built directly as a `MatrixGate` with the block order reversed relative
/// to `ControlledGate` (inner matrix on the `|0⟩` block, identity on `|1⟩`).
fn wrap_negctrl(control: QubitIndex, target: Gate) -> ParseResult<Gate> {
    let inner = target.to_matrix();
    let inner_dim = inner.dim;
    let dim = inner_dim * 2;
    let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
    for i in 0..inner_dim {
        for j in 0..inner_dim {
            data[i * dim + j] = inner.get(i, j);
        }
    }
    for i in 0..inner_dim {
        data[(inner_dim + i) * dim + (inner_dim + i)] = Complex64::new(1.0, 0.0);
    }
    let mut operands = vec![control];
    operands.extend(target.operands());
    Gate::matrix(Matrix2::new(dim, data), operands, None).map_err(ParseError::from)
}

fn invert_gate(gate: &Gate) -> ParseResult<Gate> {
    let m = gate.to_matrix();
    let dim = m.dim;
    let mut data = vec![Complex64::new(0.0, 0.0); dim * dim];
    for i in 0..dim {
        for j in 0..dim {
            data[j * dim + i] = m.get(i, j).conj();
        }
    }
    Gate::matrix(Matrix2::new(dim, data), gate.operands(), None).map_err(ParseError::from)
}

/// `pow(n) @ gate` for a non-negative integer `n`, computed as `n`
/// applications of the gate's own matrix (`R(axis, θ, φ)^n` would be
/// cheaper for a bare rotation, but this also covers `Controlled`/`Matrix`
/// bodies uniformly).
fn power_gate(gate: &Gate, exponent: f64) -> ParseResult<Gate> {
    if exponent < 0.0 || exponent.fract().abs() > 1e-9 {
        return Err(ParseError::NonConstantExpression);
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = exponent.round() as u32;
    let operands = gate.operands();
    let base = gate.to_matrix();
    let mut acc = Matrix2::identity(base.dim);
    for _ in 0..n {
        acc = base.mul(&acc);
    }
    Gate::matrix(acc, operands, None).map_err(ParseError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use osq_algebra::equal_up_to_global_phase;

    #[test]
    fn lowers_bell_state_program() {
        let source = "version 3.0;\nqubit[2] q;\nbit[2] b;\nh q[0];\nCNOT q[0], q[1];\nb[0] = measure q[0];\nb[1] = measure q[1];\n";
        let circuit = read_str(source).unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_bits(), 2);
        assert_eq!(circuit.statements().len(), 4);
    }

    #[test]
    fn sgmq_broadcasts_single_qubit_gate() {
        let source = "version 3.0;\nqubit[3] q;\nh q[0:2];\n";
        let circuit = read_str(source).unwrap();
        assert_eq!(circuit.statements().len(), 3);
    }

    #[test]
    fn ctrl_modifier_builds_controlled_gate() {
        let source = "version 3.0;\nqubit[2] q;\nctrl @ x q[0], q[1];\n";
        let circuit = read_str(source).unwrap();
        let gate = circuit.statements()[0].as_gate().unwrap();
        assert!(gate.as_controlled().is_some());
        assert_eq!(gate.operands(), vec![QubitIndex(0), QubitIndex(1)]);
    }

    #[test]
    fn inv_modifier_inverts_rz_angle() {
        let source = "version 3.0;\nqubit[1] q;\ninv @ rz(0.3) q[0];\n";
        let circuit = read_str(source).unwrap();
        let gate = circuit.statements()[0].as_gate().unwrap();
        let expected = catalog::rz(QubitIndex(0), -0.3);
        assert!(equal_up_to_global_phase(&gate.to_matrix(), &expected.to_matrix(), 1e-9));
    }

    #[test]
    fn undefined_register_is_an_error() {
        let source = "version 3.0;\nqubit[1] q;\nh r[0];\n";
        assert!(read_str(source).is_err());
    }
}
