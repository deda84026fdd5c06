//! Mapping-aware routing: inserts `SWAP`s so every two-qubit gate ends up
//! on an edge of the connectivity graph, updating the live mapping in step.

use tracing::debug;

use osq_ir::{catalog, Connectivity, IrError, IrResult, Mapping, Router, Statement};

fn route_with_path(
    statements: &[Statement],
    mut mapping: Mapping,
    connectivity: &Connectivity,
    path_for: impl Fn(u32, u32) -> Option<Vec<u32>>,
) -> IrResult<(Vec<Statement>, Mapping)> {
    let mut out = Vec::with_capacity(statements.len());
    let mut swaps_inserted = 0usize;

    for statement in statements {
        let operands = statement.qubit_operands();
        if operands.len() < 2 {
            out.push(statement.map_qubits(mapping.as_fn()));
            continue;
        }
        if operands.len() > 2 {
            out.push(statement.map_qubits(mapping.as_fn()));
            continue;
        }

        let (v0, v1) = (operands[0], operands[1]);
        let p0 = mapping.physical_of(v0);
        let p1 = mapping.physical_of(v1);

        if p0 == p1 {
            return Err(IrError::NoRoutingPath { src: p0, dst: p1 });
        }

        if !connectivity.is_edge(p0, p1) {
            let path = path_for(p0, p1).ok_or(IrError::NoRoutingPath { src: p0, dst: p1 })?;
            if path.len() < 2 {
                return Err(IrError::NoRoutingPath { src: p0, dst: p1 });
            }
            for window in path[..path.len() - 1].windows(2) {
                let (from, to) = (window[0], window[1]);
                out.push(Statement::gate(catalog::swap(from.into(), to.into())));
                mapping.swap_physical(from, to);
                swaps_inserted += 1;
            }
        }

        out.push(statement.map_qubits(mapping.as_fn()));
    }

    debug!(statements = statements.len(), swaps_inserted, "routing complete");
    Ok((out, mapping))
}

/// Routes each mismatched interaction along a BFS shortest path, moving the
/// first operand one `SWAP` at a time until it is adjacent to the second.
pub struct ShortestPathRouter;

impl Router for ShortestPathRouter {
    fn route(
        &self,
        statements: &[Statement],
        mapping: Mapping,
        connectivity: &Connectivity,
    ) -> IrResult<(Vec<Statement>, Mapping)> {
        route_with_path(statements, mapping, connectivity, |src, dst| {
            connectivity.shortest_path(src, dst)
        })
    }
}

/// Admissible distance used to guide the `AStarRouter` over an implicit 2D
/// grid embedding of the physical qubits (`row = index / grid_width`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    Manhattan,
    Euclidean,
    Chebyshev,
}

impl Heuristic {
    fn distance(self, a: (i64, i64), b: (i64, i64)) -> u32 {
        let dx = (a.0 - b.0).abs();
        let dy = (a.1 - b.1).abs();
        match self {
            Heuristic::Manhattan => (dx + dy) as u32,
            Heuristic::Euclidean => (((dx * dx + dy * dy) as f64).sqrt()).floor() as u32,
            Heuristic::Chebyshev => dx.max(dy) as u32,
        }
    }
}

/// Routes via A* over the connectivity graph, guided by a grid-distance
/// heuristic instead of plain BFS.
pub struct AStarRouter {
    pub grid_width: u32,
    pub heuristic: Heuristic,
}

impl AStarRouter {
    pub fn new(grid_width: u32, heuristic: Heuristic) -> Self {
        AStarRouter { grid_width, heuristic }
    }

    fn coordinates(&self, index: u32) -> (i64, i64) {
        let width = self.grid_width.max(1) as i64;
        ((index as i64) / width, (index as i64) % width)
    }
}

impl Router for AStarRouter {
    fn route(
        &self,
        statements: &[Statement],
        mapping: Mapping,
        connectivity: &Connectivity,
    ) -> IrResult<(Vec<Statement>, Mapping)> {
        route_with_path(statements, mapping, connectivity, |src, dst| {
            let target = self.coordinates(dst);
            connectivity.astar_path(src, dst, |n| self.heuristic.distance(self.coordinates(n), target))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osq_ir::QubitIndex;

    fn chain_connectivity() -> Connectivity {
        Connectivity::linear(3)
    }

    #[test]
    fn shortest_path_router_inserts_one_swap_for_a_two_hop_interaction() {
        let statements = vec![Statement::gate(catalog::cnot(QubitIndex(0), QubitIndex(2)))];
        let mapping = Mapping::trivial(3);
        let connectivity = chain_connectivity();
        let router = ShortestPathRouter;
        let (routed, final_mapping) = router.route(&statements, mapping, &connectivity).unwrap();

        assert_eq!(routed.len(), 2);
        assert!(matches!(routed[0], Statement::Gate(ref g) if g.operands() == vec![QubitIndex(0), QubitIndex(1)]));
        assert_eq!(final_mapping.physical_of(QubitIndex(0)), 1);
    }

    #[test]
    fn adjacent_interaction_needs_no_swap() {
        let statements = vec![Statement::gate(catalog::cnot(QubitIndex(0), QubitIndex(1)))];
        let mapping = Mapping::trivial(3);
        let connectivity = chain_connectivity();
        let router = ShortestPathRouter;
        let (routed, _) = router.route(&statements, mapping, &connectivity).unwrap();
        assert_eq!(routed.len(), 1);
    }

    #[test]
    fn circuit_with_no_two_qubit_gates_is_unchanged() {
        let statements = vec![Statement::gate(catalog::x(QubitIndex(0)))];
        let mapping = Mapping::trivial(3);
        let connectivity = chain_connectivity();
        let router = ShortestPathRouter;
        let (routed, _) = router.route(&statements, mapping, &connectivity).unwrap();
        assert_eq!(routed.len(), 1);
    }

    #[test]
    fn disconnected_graph_fails_with_no_routing_path() {
        let statements = vec![Statement::gate(catalog::cnot(QubitIndex(0), QubitIndex(1)))];
        let mapping = Mapping::trivial(2);
        let connectivity = Connectivity::new();
        let router = ShortestPathRouter;
        assert!(router.route(&statements, mapping, &connectivity).is_err());
    }

    #[test]
    fn astar_router_reaches_the_same_result_as_shortest_path_on_a_chain() {
        let statements = vec![Statement::gate(catalog::cnot(QubitIndex(0), QubitIndex(2)))];
        let mapping = Mapping::trivial(3);
        let connectivity = chain_connectivity();
        let router = AStarRouter::new(3, Heuristic::Manhattan);
        let (routed, _) = router.route(&statements, mapping, &connectivity).unwrap();
        assert_eq!(routed.len(), 2);
    }
}
