//! Acyclicity checks run before every edge insertion or reversal.

use petgraph::algo::{has_path_connecting, tarjan_scc};
use petgraph::graph::NodeIndex;

use super::network::PGeneGraph;

/// Whether inserting `from → to` would close a cycle. A self-loop always does;
/// otherwise the edge closes a cycle exactly when `to` already reaches `from`.
pub fn would_create_cycle(graph: &PGeneGraph, from: NodeIndex, to: NodeIndex) -> bool {
    from == to || reaches(graph, to, from)
}

/// Directed reachability.
pub fn reaches(graph: &PGeneGraph, from: NodeIndex, to: NodeIndex) -> bool {
    has_path_connecting(graph, from, to, None)
}

/// Strongly connected components with more than one P-gene. Empty for a DAG.
pub fn find_cycles(graph: &PGeneGraph) -> Vec<Vec<NodeIndex>> {
    let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(graph)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|mut component| {
            component.sort_unstable();
            component
        })
        .collect();
    cycles.sort_unstable();
    cycles
}
