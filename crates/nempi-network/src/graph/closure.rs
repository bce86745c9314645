//! Reflexive transitive closure of the network.

use nalgebra::DMatrix;
use petgraph::graph::NodeIndex;
use petgraph::visit::Dfs;

use super::network::PGeneGraph;

/// T[i][j] = 1 iff j is reachable from i (every node reaches itself).
pub fn transitive_closure(graph: &PGeneGraph) -> DMatrix<f64> {
    let n = graph.node_count();
    let mut closure = DMatrix::zeros(n, n);
    for i in 0..n {
        let mut dfs = Dfs::new(graph, NodeIndex::new(i));
        while let Some(node) = dfs.next(graph) {
            closure[(i, node.index())] = 1.0;
        }
    }
    closure
}

/// Nodes reachable from `start`, itself included, in index order.
pub fn descendants(graph: &PGeneGraph, start: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut dfs = Dfs::new(graph, NodeIndex::new(start));
    while let Some(node) = dfs.next(graph) {
        out.push(node.index());
    }
    out.sort_unstable();
    out
}
