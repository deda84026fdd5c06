//! The five pass family traits the circuit façade dispatches to.
//! Each family is a narrow trait rather than a shared `Pass` base class —
//! the families' inputs/outputs genuinely differ (a merger rewrites
//! statements in place, a mapper produces a [`Mapping`], a router consumes
//! one and a [`Connectivity`] and produces both), so a single `run(&mut
//! Circuit)` signature would either hide that or force every pass to reach
//! into the others' side tables.

use crate::circuit::Circuit;
use crate::connectivity::Connectivity;
use crate::error::IrResult;
use crate::gate::Gate;
use crate::instruction::Statement;
use crate::mapping::Mapping;

/// Fuses single-qubit rotations.
pub trait Merger {
    fn merge(&self, statements: &[Statement]) -> IrResult<Vec<Statement>>;
}

/// Rewrites a single gate statement into an equivalent sub-circuit, or
/// leaves it untouched. Non-gate statements never reach a decomposer
/// — the façade passes them through unchanged.
pub trait Decomposer {
    /// `Some(replacement)` if this decomposer applies to `gate`; `None` to
    /// leave it as-is. `location` is the gate's index in the original
    /// statement list, threaded through only for error context.
    fn decompose(&self, gate: &Gate, location: usize) -> IrResult<Option<Vec<Statement>>>;

    fn name(&self) -> &'static str;
}

/// Produces an initial virtual→physical mapping.
pub trait Mapper {
    fn initial_mapping(&self, num_logical: u32, num_physical: u32) -> IrResult<Mapping>;
}

/// Inserts SWAPs so every two-qubit gate's mapped operands are adjacent.
pub trait Router {
    fn route(
        &self,
        statements: &[Statement],
        mapping: Mapping,
        connectivity: &Connectivity,
    ) -> IrResult<(Vec<Statement>, Mapping)>;
}

/// A pure check over the finished circuit.
pub trait Validator {
    fn validate(&self, circuit: &Circuit) -> IrResult<()>;
}

/// Produces a backend artifact. Implementations pick their own
/// `Output` — a `String` for the cQASM writers, a structured schedule object
/// for the quantify-scheduler exporter.
pub trait Exporter {
    type Output;

    fn export(&self, circuit: &Circuit) -> IrResult<Self::Output>;
}
