//! OpenSquirrel circuit intermediate representation.
//!
//! This crate provides the core data structures for representing quantum
//! circuits: a flat, ordered list of statements over a fixed-size qubit/bit
//! register. It forms the foundation the reader (`osq-qasm3`) lowers into
//! and the compiler passes (`osq-compile`) transform.
//!
//! # Core components
//!
//! - **Indices**: [`QubitIndex`], [`BitIndex`] — bare integers into the
//!   circuit's virtual register; there is no per-qubit object identity.
//! - **Gate semantics**: [`GateSemantic`] — every unitary statement body is a
//!   [`BlochSphereRotation`], a [`ControlledGate`], or a dense [`MatrixGate`].
//! - **Statements**: [`Statement`] — the tagged union covering gates,
//!   non-unitary instructions (init/reset/measure), control instructions
//!   (barrier/wait), and opaque backend passthroughs.
//! - **Catalog**: [`catalog`] — named-gate factories and the reverse
//!   recognizer used to re-attach a catalog name to a bare rotation.
//! - **Circuit**: [`Circuit`] — the builder/pass-dispatch façade.
//! - **Passes**: [`pass`] — the `Merger`/`Decomposer`/`Mapper`/`Router`/
//!   `Validator`/`Exporter` traits a [`Circuit`] runs.
//!
//! # Example: building a Bell state
//!
//! ```rust
//! use osq_ir::Circuit;
//!
//! let mut circuit = Circuit::new("bell_state", 2, 2);
//! circuit.h(0).unwrap().cnot(0, 1).unwrap();
//! circuit.measure(0, 0).unwrap().measure(1, 1).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.statements().len(), 4);
//! ```
//!
//! # Example: checking an anonymous rotation's unitary
//!
//! ```rust
//! use osq_ir::Circuit;
//! use osq_algebra::{equal_up_to_global_phase, Matrix2};
//!
//! let mut circuit = Circuit::new("variational", 1, 0);
//! circuit.rx(0, std::f64::consts::FRAC_PI_2).unwrap();
//!
//! let u = circuit.unitary();
//! assert!(!equal_up_to_global_phase(&u, &Matrix2::identity(2), 1e-9));
//! ```

pub mod catalog;
pub mod circuit;
pub mod connectivity;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod mapping;
pub mod pass;
pub mod qubit;
pub mod semantics;
pub mod writer;

pub use circuit::Circuit;
pub use connectivity::Connectivity;
pub use error::{IrError, IrResult};
pub use gate::{BlochSphereRotation, ControlledGate, Gate, GateAxis, GateSemantic, MatrixGate};
pub use instruction::{Control, NonUnitary, Statement};
pub use mapping::Mapping;
pub use pass::{Decomposer, Exporter, Mapper, Merger, Router, Validator};
pub use qubit::{BitIndex, QubitIndex};
