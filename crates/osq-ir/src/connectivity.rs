//! Connectivity graphs: the undirected graph of permitted
//! two-qubit interactions a router or validator checks against.

use std::collections::HashMap;

use petgraph::algo::astar;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::EdgeRef;

use crate::error::{IrError, IrResult};

/// `G = (V, E)` over physical qubit indices.
#[derive(Debug, Clone)]
pub struct Connectivity {
    graph: UnGraphMap<u32, ()>,
}

impl Connectivity {
    pub fn new() -> Self {
        Connectivity { graph: UnGraphMap::new() }
    }

    pub fn add_edge(&mut self, a: u32, b: u32) {
        self.graph.add_edge(a, b, ());
    }

    /// Builds a connectivity graph from an adjacency dictionary
    /// `stringified_qubit_index → [connected indices]`. A pair
    /// `(i, j)` is an edge only if `j` appears in `i`'s list *and* `i`
    /// appears in `j`'s list — a one-directional mention is not enough.
    pub fn from_adjacency(adjacency: &HashMap<u32, Vec<u32>>) -> Self {
        let mut graph = UnGraphMap::new();
        for &q in adjacency.keys() {
            graph.add_node(q);
        }
        for (&i, neighbors) in adjacency {
            for &j in neighbors {
                let mutual = adjacency.get(&j).is_some_and(|back| back.contains(&i));
                if mutual && i < j {
                    graph.add_edge(i, j, ());
                }
            }
        }
        Connectivity { graph }
    }

    /// Parses a connectivity graph from the JSON form of the adjacency
    /// dictionary `from_adjacency` expects: `{"0": [1], "1": [0, 2], ...}`.
    /// Keys are stringified indices since JSON object keys are always
    /// strings.
    pub fn from_json(source: &str) -> IrResult<Self> {
        let raw: HashMap<String, Vec<u32>> =
            serde_json::from_str(source).map_err(|e| IrError::Domain(format!("invalid connectivity JSON: {e}")))?;
        let adjacency: HashMap<u32, Vec<u32>> = raw
            .into_iter()
            .map(|(k, v)| {
                k.parse::<u32>()
                    .map(|k| (k, v))
                    .map_err(|e| IrError::Domain(format!("invalid qubit index '{k}': {e}")))
            })
            .collect::<IrResult<_>>()?;
        Ok(Self::from_adjacency(&adjacency))
    }

    /// Serializes the adjacency dictionary back to JSON, in the same shape
    /// `from_json` accepts.
    pub fn to_json(&self) -> IrResult<String> {
        let mut adjacency: HashMap<String, Vec<u32>> = HashMap::new();
        for node in self.graph.nodes() {
            adjacency.insert(node.to_string(), self.neighbors(node));
        }
        serde_json::to_string(&adjacency).map_err(|e| IrError::Domain(format!("connectivity serialization failed: {e}")))
    }

    /// A fully connected graph on `n` qubits — convenient for tests and for
    /// mappers/validators run without a hardware target.
    pub fn complete(n: u32) -> Self {
        let mut c = Connectivity::new();
        for i in 0..n {
            for j in (i + 1)..n {
                c.add_edge(i, j);
            }
        }
        c
    }

    /// A linear chain `0 — 1 — 2 — … — (n-1)`.
    pub fn linear(n: u32) -> Self {
        let mut c = Connectivity::new();
        for i in 0..n.saturating_sub(1) {
            c.add_edge(i, i + 1);
        }
        c
    }

    pub fn num_qubits(&self) -> u32 {
        self.graph.node_count() as u32
    }

    pub fn is_edge(&self, a: u32, b: u32) -> bool {
        self.graph.contains_edge(a, b)
    }

    pub fn neighbors(&self, a: u32) -> Vec<u32> {
        self.graph.neighbors(a).collect()
    }

    pub fn edges(&self) -> Vec<(u32, u32)> {
        self.graph.all_edges().map(|(a, b, ())| (a, b)).collect()
    }

    /// BFS shortest path from `src` to `dst`, inclusive of both endpoints.
    pub fn shortest_path(&self, src: u32, dst: u32) -> Option<Vec<u32>> {
        if src == dst {
            return Some(vec![src]);
        }
        let (_, path) = astar(&self.graph, src, |n| n == dst, |_| 1u32, |_| 0u32)?;
        Some(path)
    }

    /// A* shortest path using a caller-supplied admissible heuristic
    /// (Manhattan, Euclidean, or Chebyshev distance over vertex
    /// coordinates). Falls back to unweighted BFS-equivalent
    /// search when `heuristic` always returns `0`.
    pub fn astar_path(&self, src: u32, dst: u32, heuristic: impl Fn(u32) -> u32) -> Option<Vec<u32>> {
        if src == dst {
            return Some(vec![src]);
        }
        let (_, path) = astar(&self.graph, src, |n| n == dst, |_| 1u32, heuristic)?;
        Some(path)
    }

    /// Every edge incident to `a`, paired with the edge reference — used by
    /// passes that need petgraph's `EdgeRef` machinery directly rather than
    /// the plain `(u32, u32)` tuples above.
    pub fn edges_from(&self, a: u32) -> Vec<(u32, u32)> {
        self.graph.edges(a).map(|e| (e.source(), e.target())).collect()
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_requires_mutual_listing() {
        let mut adjacency = HashMap::new();
        adjacency.insert(0, vec![1]);
        adjacency.insert(1, vec![0, 2]);
        adjacency.insert(2, vec![1]);
        let c = Connectivity::from_adjacency(&adjacency);
        assert!(c.is_edge(0, 1));
        assert!(c.is_edge(1, 2));
        assert!(!c.is_edge(0, 2));
    }

    #[test]
    fn one_directional_mention_is_not_an_edge() {
        let mut adjacency = HashMap::new();
        adjacency.insert(0, vec![1]);
        adjacency.insert(1, vec![]);
        let c = Connectivity::from_adjacency(&adjacency);
        assert!(!c.is_edge(0, 1));
    }

    #[test]
    fn shortest_path_on_linear_chain() {
        let c = Connectivity::linear(5);
        let path = c.shortest_path(0, 4).unwrap();
        assert_eq!(path, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn shortest_path_none_when_disconnected() {
        let mut c = Connectivity::new();
        c.add_edge(0, 1);
        c.add_edge(2, 3);
        assert!(c.shortest_path(0, 3).is_none());
    }

    #[test]
    fn from_json_round_trips_through_to_json() {
        let source = r#"{"0": [1], "1": [0, 2], "2": [1]}"#;
        let c = Connectivity::from_json(source).unwrap();
        assert!(c.is_edge(0, 1));
        assert!(c.is_edge(1, 2));
        assert!(!c.is_edge(0, 2));

        let json = c.to_json().unwrap();
        let roundtripped = Connectivity::from_json(&json).unwrap();
        assert!(roundtripped.is_edge(0, 1));
        assert!(roundtripped.is_edge(1, 2));
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        assert!(Connectivity::from_json("not json").is_err());
    }
}
