//! The circuit façade: owns the statement list and the qubit/bit
//! register sizes, and dispatches to the pass family traits in [`pass`].
//! Builder methods are thin wrappers over [`catalog`] that validate operand
//! ranges before appending to the statement list.

use std::fmt;

use rustc_hash::FxHashMap;

use osq_algebra::{equal_up_to_global_phase, Axis, Matrix2};

use crate::catalog;
use crate::connectivity::Connectivity;
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::mapping::Mapping;
use crate::pass::{Decomposer, Exporter, Mapper, Merger, Router, Validator};
use crate::qubit::{BitIndex, QubitIndex};
use crate::semantics;
use crate::instruction::Statement;
use crate::writer;

/// Tolerance used by `replace`'s unitary-equivalence check.
pub const REPLACEMENT_EPSILON: f64 = 1e-8;

/// A circuit: a fixed-size qubit/bit register plus an ordered statement
/// list. Index in the list is the sole ordering authority — there is
/// no separate dependency graph.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_bits: u32,
    statements: Vec<Statement>,
    mapping: Option<Mapping>,
}

impl Circuit {
    pub fn new(name: impl Into<String>, num_qubits: u32, num_bits: u32) -> Self {
        Circuit {
            name: name.into(),
            num_qubits,
            num_bits,
            statements: Vec::new(),
            mapping: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn statements_mut(&mut self) -> &mut Vec<Statement> {
        &mut self.statements
    }

    pub fn mapping(&self) -> Option<&Mapping> {
        self.mapping.as_ref()
    }

    fn push(&mut self, statement: Statement) -> IrResult<&mut Self> {
        statement.validate_operands(self.num_qubits)?;
        if let Some(bit) = statement.clbit_operand() {
            if bit.0 >= self.num_bits {
                return Err(IrError::invalid_gate(format!(
                    "bit {bit} out of range for register of size {}",
                    self.num_bits
                )));
            }
        }
        self.statements.push(statement);
        Ok(self)
    }

    /// Appends an already-built gate, validating its operands first. The
    /// escape hatch for gates not covered by a named builder method below
    /// (e.g. a freshly recognized `Rn`, or a reader-lowered custom matrix).
    pub fn push_gate(&mut self, gate: Gate) -> IrResult<&mut Self> {
        self.push(Statement::gate(gate))
    }

    // -- single-qubit catalog builders --------------------------------

    pub fn i(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::identity(QubitIndex(qubit))))
    }

    pub fn x(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::x(QubitIndex(qubit))))
    }

    pub fn y(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::y(QubitIndex(qubit))))
    }

    pub fn z(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::z(QubitIndex(qubit))))
    }

    pub fn h(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::h(QubitIndex(qubit))))
    }

    pub fn s(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::s(QubitIndex(qubit))))
    }

    pub fn sdg(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::sdg(QubitIndex(qubit))))
    }

    pub fn t(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::t(QubitIndex(qubit))))
    }

    pub fn tdg(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::tdg(QubitIndex(qubit))))
    }

    pub fn x90(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::x90(QubitIndex(qubit))))
    }

    pub fn mx90(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::mx90(QubitIndex(qubit))))
    }

    pub fn y90(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::y90(QubitIndex(qubit))))
    }

    pub fn my90(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::my90(QubitIndex(qubit))))
    }

    pub fn rx(&mut self, qubit: u32, theta: f64) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::rx(QubitIndex(qubit), theta)))
    }

    pub fn ry(&mut self, qubit: u32, theta: f64) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::ry(QubitIndex(qubit), theta)))
    }

    pub fn rz(&mut self, qubit: u32, theta: f64) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::rz(QubitIndex(qubit), theta)))
    }

    pub fn prx(&mut self, qubit: u32, theta: f64, phi: f64) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::prx(QubitIndex(qubit), theta, phi)))
    }

    pub fn rn(&mut self, qubit: u32, axis: Axis, angle: f64, phase: f64) -> IrResult<&mut Self> {
        let gate = catalog::rn(QubitIndex(qubit), axis, angle, phase)?;
        self.push(Statement::gate(gate))
    }

    // -- two-qubit catalog builders ------------------------------------

    pub fn cnot(&mut self, control: u32, target: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::cnot(QubitIndex(control), QubitIndex(target))))
    }

    pub fn cz(&mut self, control: u32, target: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::cz(QubitIndex(control), QubitIndex(target))))
    }

    pub fn cr(&mut self, control: u32, target: u32, theta: f64) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::cr(QubitIndex(control), QubitIndex(target), theta)))
    }

    pub fn crk(&mut self, control: u32, target: u32, k: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::crk(QubitIndex(control), QubitIndex(target), k)))
    }

    pub fn swap(&mut self, q0: u32, q1: u32) -> IrResult<&mut Self> {
        self.push(Statement::gate(catalog::swap(QubitIndex(q0), QubitIndex(q1))))
    }

    // -- non-unitary / control builders --------------------------------

    pub fn init(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::init(QubitIndex(qubit)))
    }

    pub fn reset(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::reset(QubitIndex(qubit)))
    }

    pub fn measure(&mut self, qubit: u32, bit: u32) -> IrResult<&mut Self> {
        self.push(Statement::measure(QubitIndex(qubit), BitIndex(bit)))
    }

    pub fn barrier(&mut self, qubit: u32) -> IrResult<&mut Self> {
        self.push(Statement::barrier(QubitIndex(qubit)))
    }

    pub fn wait(&mut self, qubit: u32, cycles: u64) -> IrResult<&mut Self> {
        self.push(Statement::wait(QubitIndex(qubit), cycles))
    }

    pub fn asm(&mut self, backend_name: impl Into<String>, payload: impl Into<String>) -> IrResult<&mut Self> {
        self.push(Statement::asm(backend_name, payload))
    }

    // -- passes ----------------------------------------------------------

    /// Runs a single-qubit fusion pass over the statement list.
    pub fn merge(&mut self, merger: &impl Merger) -> IrResult<&mut Self> {
        self.statements = merger.merge(&self.statements)?;
        Ok(self)
    }

    /// Runs a decomposer over every gate statement, replacing it wherever
    /// the decomposer applies. Non-gate statements pass through.
    pub fn decompose(&mut self, decomposer: &impl Decomposer) -> IrResult<&mut Self> {
        let mut rewritten = Vec::with_capacity(self.statements.len());
        for (location, statement) in self.statements.iter().enumerate() {
            match statement.as_gate() {
                Some(gate) => match decomposer.decompose(gate, location)? {
                    Some(replacement) => rewritten.extend(replacement),
                    None => rewritten.push(statement.clone()),
                },
                None => rewritten.push(statement.clone()),
            }
        }
        self.statements = rewritten;
        Ok(self)
    }

    /// Replaces every gate named `gate_identity` with the sub-circuit
    /// `builder_fn` produces from its operand list, rejecting a replacement
    /// whose composed unitary differs from the original beyond global phase
    /// (`ReplacementMismatch`). The generic ad-hoc rewrite primitive; the
    /// predefined SWAP/CNOT/CZ rewrites in `osq-compile` are ordinary
    /// `Decomposer`s instead, since they apply unconditionally rather than
    /// by name.
    pub fn replace<F>(&mut self, gate_identity: &str, builder_fn: F) -> IrResult<&mut Self>
    where
        F: Fn(&[QubitIndex]) -> Vec<Gate>,
    {
        let mut rewritten = Vec::with_capacity(self.statements.len());
        for (location, statement) in self.statements.iter().enumerate() {
            match statement.as_gate() {
                Some(gate) if gate.name.as_deref() == Some(gate_identity) => {
                    let operands = gate.operands();
                    let replacement = builder_fn(&operands);
                    let original = local_unitary(std::slice::from_ref(gate), &operands);
                    let rebuilt = local_unitary(&replacement, &operands);
                    if !equal_up_to_global_phase(&original, &rebuilt, REPLACEMENT_EPSILON) {
                        return Err(IrError::ReplacementMismatch {
                            gate_name: gate_identity.to_string(),
                            location: Some(location),
                        });
                    }
                    rewritten.extend(replacement.into_iter().map(Statement::gate));
                }
                _ => rewritten.push(statement.clone()),
            }
        }
        self.statements = rewritten;
        Ok(self)
    }

    /// Installs an initial virtual→physical mapping and rewrites every
    /// statement's operands through it, growing the register to
    /// `num_physical`.
    pub fn map(&mut self, mapper: &impl Mapper, num_physical: u32) -> IrResult<&mut Self> {
        let mapping = mapper.initial_mapping(self.num_qubits, num_physical)?;
        let as_fn = mapping.as_fn();
        self.statements = self.statements.iter().map(|s| s.map_qubits(&as_fn)).collect();
        self.num_qubits = num_physical;
        self.mapping = Some(mapping);
        Ok(self)
    }

    /// Inserts SWAPs so every two-qubit gate's operands land on adjacent
    /// physical qubits under `connectivity`, updating the live mapping as it
    /// goes. Requires a prior `map` call — routing without one
    /// assumes the trivial mapping.
    pub fn route(&mut self, router: &impl Router, connectivity: &Connectivity) -> IrResult<&mut Self> {
        let mapping = self.mapping.clone().unwrap_or_else(|| Mapping::trivial(self.num_qubits));
        let (routed, final_mapping) = router.route(&self.statements, mapping, connectivity)?;
        self.statements = routed;
        self.mapping = Some(final_mapping);
        Ok(self)
    }

    /// Runs a pure check over the finished circuit.
    pub fn validate(&self, validator: &impl Validator) -> IrResult<()> {
        validator.validate(self)
    }

    /// Produces a backend artifact.
    pub fn export<E: Exporter>(&self, exporter: &E) -> IrResult<E::Output> {
        exporter.export(self)
    }

    /// The overall unitary of the circuit's coherent (gate-only) part, used
    /// by round-trip and decomposition tests. See [`semantics::circuit_unitary`]
    /// for what it does and does not model.
    pub fn unitary(&self) -> Matrix2 {
        semantics::circuit_unitary(&self.statements, self.num_qubits)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", writer::write_cqasm3(self))
    }
}

/// Composes `gates`' local matrices over `operands`, remapped to a compact
/// `0..operands.len()` index space so gates with absolute qubit indices can
/// be compared regardless of where in the full register they sit.
fn local_unitary(gates: &[Gate], operands: &[QubitIndex]) -> Matrix2 {
    let index_of: FxHashMap<QubitIndex, u32> =
        operands.iter().enumerate().map(|(i, &q)| (q, i as u32)).collect();
    let k = operands.len() as u32;
    let mut acc = Matrix2::identity(1usize << k);
    for gate in gates {
        let remapped = gate.map_operands(|q| QubitIndex(index_of[&q]));
        let u = semantics::gate_unitary(&remapped, k);
        acc = u.mul(&acc);
    }
    acc
}
