//! Quantify-scheduler export: lowers the IR to a flat sequence of
//! `Rxy`/`Rz`/`CNOT`/`CZ`/`Measure`/`Reset` operations with angles in
//! degrees, plus the per-qubit measurement-to-bit-index map.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use osq_ir::{Circuit, Exporter, Gate, GateSemantic, IrError, IrResult, Statement};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QuantifyOperation {
    Rxy { qubit: u32, theta_degrees: f64, phi_degrees: f64 },
    Rz { qubit: u32, theta_degrees: f64 },
    Cnot { control: u32, target: u32 },
    Cz { control: u32, target: u32 },
    Measure { qubit: u32 },
    Reset { qubit: u32 },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuantifySchedule {
    pub operations: Vec<QuantifyOperation>,
    /// For each measured qubit, the bit indices successive measurements
    /// were assigned to, in program order.
    pub measurement_map: FxHashMap<u32, Vec<u32>>,
}

impl QuantifySchedule {
    /// Serializes the schedule to the JSON form a quantify-scheduler client
    /// would submit over its own transport.
    pub fn to_json(&self) -> IrResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| IrError::Domain(format!("schedule serialization failed: {e}")))
    }
}

pub struct QuantifyExporter {
    pub epsilon: f64,
}

impl QuantifyExporter {
    pub fn new() -> Self {
        QuantifyExporter { epsilon: 1e-8 }
    }
}

impl Default for QuantifyExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for QuantifyExporter {
    type Output = QuantifySchedule;

    fn export(&self, circuit: &Circuit) -> IrResult<QuantifySchedule> {
        let mut schedule = QuantifySchedule::default();

        for (location, statement) in circuit.statements().iter().enumerate() {
            match statement {
                Statement::NonUnitary(osq_ir::NonUnitary::Init(_)) => {}
                Statement::NonUnitary(osq_ir::NonUnitary::Reset(q)) => {
                    schedule.operations.push(QuantifyOperation::Reset { qubit: q.0 });
                }
                Statement::NonUnitary(osq_ir::NonUnitary::Measure { qubit, bit }) => {
                    schedule.operations.push(QuantifyOperation::Measure { qubit: qubit.0 });
                    schedule.measurement_map.entry(qubit.0).or_default().push(bit.0);
                }
                Statement::Control(_) | Statement::AsmDeclaration { .. } => {}
                Statement::Gate(gate) => {
                    schedule.operations.push(lower_gate(gate, self.epsilon).map_err(|e| e.at(location))?);
                }
            }
        }

        Ok(schedule)
    }
}

fn lower_gate(gate: &Gate, epsilon: f64) -> IrResult<QuantifyOperation> {
    match &gate.semantic {
        GateSemantic::BlochSphereRotation(r) => {
            let axis = &r.rotation.axis;
            if axis.z.abs() < epsilon {
                let phi = axis.y.atan2(axis.x);
                Ok(QuantifyOperation::Rxy {
                    qubit: r.qubit.0,
                    theta_degrees: r.rotation.angle.to_degrees(),
                    phi_degrees: phi.to_degrees(),
                })
            } else if axis.x.abs() < epsilon && axis.y.abs() < epsilon {
                Ok(QuantifyOperation::Rz { qubit: r.qubit.0, theta_degrees: r.rotation.angle.to_degrees() })
            } else {
                Err(unsupported(gate))
            }
        }
        GateSemantic::Controlled(c) => match gate.name.as_deref() {
            Some("CNOT") => Ok(QuantifyOperation::Cnot {
                control: c.control.0,
                target: c.target_gate.operands().first().map(|q| q.0).unwrap_or(0),
            }),
            Some("CZ") => Ok(QuantifyOperation::Cz {
                control: c.control.0,
                target: c.target_gate.operands().first().map(|q| q.0).unwrap_or(0),
            }),
            _ => Err(unsupported(gate)),
        },
        GateSemantic::Matrix(_) => Err(unsupported(gate)),
    }
}

fn unsupported(gate: &Gate) -> IrError {
    IrError::UnsupportedGate {
        exporter: "Quantify".to_string(),
        gate_name: gate.name.clone().unwrap_or_else(|| "<anonymous>".to_string()),
        location: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_gate_lowers_to_rxy_in_degrees() {
        let mut circuit = Circuit::new("main", 1, 0);
        circuit.x(0).unwrap();
        let schedule = QuantifyExporter::new().export(&circuit).unwrap();
        assert_eq!(
            schedule.operations,
            vec![QuantifyOperation::Rxy { qubit: 0, theta_degrees: 180.0, phi_degrees: 0.0 }]
        );
    }

    #[test]
    fn rz_gate_lowers_to_rz() {
        let mut circuit = Circuit::new("main", 1, 0);
        circuit.rz(0, std::f64::consts::FRAC_PI_2).unwrap();
        let schedule = QuantifyExporter::new().export(&circuit).unwrap();
        assert_eq!(schedule.operations, vec![QuantifyOperation::Rz { qubit: 0, theta_degrees: 90.0 }]);
    }

    #[test]
    fn init_is_dropped_and_reset_becomes_reset() {
        let mut circuit = Circuit::new("main", 1, 0);
        circuit.init(0).unwrap().reset(0).unwrap();
        let schedule = QuantifyExporter::new().export(&circuit).unwrap();
        assert_eq!(schedule.operations, vec![QuantifyOperation::Reset { qubit: 0 }]);
    }

    #[test]
    fn measurements_populate_the_bit_map_in_order() {
        let mut circuit = Circuit::new("main", 1, 3);
        circuit.measure(0, 0).unwrap();
        circuit.measure(0, 1).unwrap();
        let schedule = QuantifyExporter::new().export(&circuit).unwrap();
        assert_eq!(schedule.measurement_map.get(&0), Some(&vec![0, 1]));
    }

    #[test]
    fn hadamard_is_unsupported() {
        let mut circuit = Circuit::new("main", 1, 0);
        circuit.h(0).unwrap();
        assert!(QuantifyExporter::new().export(&circuit).is_err());
    }

    #[test]
    fn swap_is_unsupported() {
        let mut circuit = Circuit::new("main", 2, 0);
        circuit.swap(0, 1).unwrap();
        assert!(QuantifyExporter::new().export(&circuit).is_err());
    }

    #[test]
    fn cnot_and_cz_are_supported() {
        let mut circuit = Circuit::new("main", 2, 0);
        circuit.cnot(0, 1).unwrap().cz(0, 1).unwrap();
        let schedule = QuantifyExporter::new().export(&circuit).unwrap();
        assert_eq!(
            schedule.operations,
            vec![
                QuantifyOperation::Cnot { control: 0, target: 1 },
                QuantifyOperation::Cz { control: 0, target: 1 },
            ]
        );
    }

    #[test]
    fn schedule_serializes_to_json() {
        let mut circuit = Circuit::new("main", 2, 0);
        circuit.cnot(0, 1).unwrap().measure(1, 0).unwrap();
        let schedule = QuantifyExporter::new().export(&circuit).unwrap();
        let json = schedule.to_json().unwrap();
        assert!(json.contains("Cnot"));
        assert!(json.contains("Measure"));
    }
}
