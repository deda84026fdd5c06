//! Compiler passes over the OpenSquirrel IR.
//!
//! A compilation run is a sequence of `Circuit` method calls — `merge`,
//! `decompose`, `map`, `route`, `validate`, `export` — each driven by one of
//! the pass implementations in this crate. Passes either complete fully or
//! leave the circuit untouched; there is no partial-application state to
//! clean up on failure.
//!
//! ```ignore
//! circuit
//!     .merge(&RotationMerger::new())?
//!     .decompose(&AbaDecomposer::new(AbaAxes::Zyz))?
//!     .map(&IdentityMapper, 5)?
//!     .route(&ShortestPathRouter, &connectivity)?;
//! circuit.validate(&InteractionValidator::new(&connectivity))?;
//! ```

mod decompose;
mod export;
mod map;
mod merge;
mod route;
mod validate;

pub use decompose::{AbaAxes, AbaDecomposer, CnotToCz, ControlledDecomposer, Entangling, McKayDecomposer, SwapToCnot, SwapToCz};
pub use export::{Cqasm1Exporter, QuantifyExporter, QuantifyOperation, QuantifySchedule};
pub use map::{HardcodedMapper, IdentityMapper, RandomMapper};
pub use merge::RotationMerger;
pub use route::{AStarRouter, Heuristic, ShortestPathRouter};
pub use validate::{InteractionValidator, PrimitiveGateValidator};
