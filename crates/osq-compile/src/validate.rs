//! Post-compilation validators: connectivity and primitive-gate-set checks.

use std::collections::BTreeSet;

use tracing::debug;

use osq_ir::{Circuit, Connectivity, IrError, IrResult, Validator};

/// Fails if any two-qubit gate's operand pair is not an edge of the
/// connectivity graph.
pub struct InteractionValidator<'a> {
    pub connectivity: &'a Connectivity,
}

impl<'a> InteractionValidator<'a> {
    pub fn new(connectivity: &'a Connectivity) -> Self {
        InteractionValidator { connectivity }
    }
}

impl Validator for InteractionValidator<'_> {
    fn validate(&self, circuit: &Circuit) -> IrResult<()> {
        let mut offending = BTreeSet::new();
        for statement in circuit.statements() {
            let Some(gate) = statement.as_gate() else { continue };
            let operands = gate.operands();
            if operands.len() != 2 {
                continue;
            }
            let (a, b) = (operands[0].0, operands[1].0);
            if !self.connectivity.is_edge(a, b) {
                offending.insert(if a < b { (a, b) } else { (b, a) });
            }
        }
        if offending.is_empty() {
            debug!("interaction validation passed");
            Ok(())
        } else {
            debug!(pairs = offending.len(), "interaction validation found unroutable pairs");
            Err(IrError::UnroutableInteractions { pairs: offending.into_iter().collect() })
        }
    }
}

/// Fails if any gate's catalog name (or the absence of one) is outside the
/// allowed primitive set. Anonymous gates always fail.
pub struct PrimitiveGateValidator {
    pub primitive_gate_set: BTreeSet<String>,
}

impl PrimitiveGateValidator {
    pub fn new(primitive_gate_set: impl IntoIterator<Item = String>) -> Self {
        PrimitiveGateValidator { primitive_gate_set: primitive_gate_set.into_iter().collect() }
    }
}

impl Validator for PrimitiveGateValidator {
    fn validate(&self, circuit: &Circuit) -> IrResult<()> {
        let mut offending = Vec::new();
        for statement in circuit.statements() {
            let Some(gate) = statement.as_gate() else { continue };
            match &gate.name {
                Some(name) if self.primitive_gate_set.contains(name) => {}
                Some(name) => offending.push(name.clone()),
                None => offending.push("<anonymous>".to_string()),
            }
        }
        if offending.is_empty() {
            debug!("primitive-gate validation passed");
            Ok(())
        } else {
            debug!(names = offending.len(), "primitive-gate validation found disallowed gates");
            Err(IrError::NonPrimitiveGates { names: offending })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osq_ir::{catalog, Circuit, Gate, QubitIndex};

    fn circuit_with(gates: Vec<Gate>) -> Circuit {
        let mut circuit = Circuit::new("test", 5, 0);
        for gate in gates {
            circuit.push_gate(gate).unwrap();
        }
        circuit
    }

    #[test]
    fn interaction_validator_reports_all_unrouted_pairs() {
        let mut adjacency = std::collections::HashMap::new();
        adjacency.insert(0, vec![1, 2]);
        adjacency.insert(1, vec![0, 2, 3]);
        adjacency.insert(2, vec![0, 1, 4]);
        adjacency.insert(3, vec![1, 4]);
        adjacency.insert(4, vec![2, 3]);
        let connectivity = Connectivity::from_adjacency(&adjacency);

        let circuit = circuit_with(vec![
            catalog::cnot(QubitIndex(0), QubitIndex(3)),
            catalog::cnot(QubitIndex(2), QubitIndex(3)),
            catalog::cnot(QubitIndex(0), QubitIndex(4)),
        ]);

        let validator = InteractionValidator::new(&connectivity);
        let err = validator.validate(&circuit).unwrap_err();
        match err {
            IrError::UnroutableInteractions { pairs } => {
                assert_eq!(pairs, vec![(0, 3), (0, 4), (2, 3)]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn interaction_validator_passes_when_every_pair_is_an_edge() {
        let connectivity = Connectivity::linear(3);
        let circuit =
            circuit_with(vec![catalog::cnot(QubitIndex(0), QubitIndex(1))]);
        let validator = InteractionValidator::new(&connectivity);
        assert!(validator.validate(&circuit).is_ok());
    }

    #[test]
    fn primitive_gate_validator_reports_names_outside_the_set() {
        let primitive_set: BTreeSet<String> =
            ["I", "X90", "mX90", "Y90", "mY90", "Rz", "CZ"].iter().map(|s| s.to_string()).collect();
        let circuit = circuit_with(vec![
            catalog::h(QubitIndex(0)),
            catalog::cnot(QubitIndex(0), QubitIndex(1)),
        ]);
        let validator = PrimitiveGateValidator::new(primitive_set);
        let err = validator.validate(&circuit).unwrap_err();
        match err {
            IrError::NonPrimitiveGates { names } => assert_eq!(names, vec!["H", "CNOT"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn primitive_gate_validator_rejects_anonymous_gates() {
        let rotation = osq_algebra::BlochRotation::from_axis(osq_algebra::Axis::X, 0.3, 0.0).unwrap();
        let circuit =
            circuit_with(vec![osq_ir::Gate::rotation(QubitIndex(0), rotation, None)]);
        let validator = PrimitiveGateValidator::new(["X90".to_string()]);
        let err = validator.validate(&circuit).unwrap_err();
        match err {
            IrError::NonPrimitiveGates { names } => assert_eq!(names, vec!["<anonymous>"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
