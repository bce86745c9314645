//! `petgraph` DiGraph wrapper holding the causal network over P-genes.

use std::collections::HashMap;

use nalgebra::DMatrix;
use nempi_core::constants::INDICATOR_THRESHOLD;
use nempi_core::errors::NetworkError;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{closure, dag_enforcement};
use crate::moves::EdgeMove;

/// The underlying directed graph type. Node weights are P-gene names and node
/// `i` always sits at `NodeIndex::new(i)`: nodes are never removed.
pub type PGeneGraph = DiGraph<String, ()>;

/// Serializable form of a network: P-gene names plus named edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub p_genes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

/// Directed acyclic causal network over a fixed P-gene vocabulary.
///
/// Edge i→j means perturbing i also produces the effect pattern of j.
/// Mutating methods keep the graph acyclic; [`NetworkModel::apply`] returns a new
/// value so snapshots held elsewhere are never touched.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    graph: PGeneGraph,
    index: HashMap<String, usize>,
}

impl NetworkModel {
    /// A network without edges.
    pub fn empty(p_genes: &[String]) -> Self {
        let mut graph = PGeneGraph::with_capacity(p_genes.len(), 0);
        let mut index = HashMap::with_capacity(p_genes.len());
        for name in p_genes {
            let idx = graph.add_node(name.clone());
            index.insert(name.clone(), idx.index());
        }
        Self { graph, index }
    }

    /// A random DAG: nodes are placed in a random topological order and every
    /// forward pair gets an edge with probability `edge_probability`.
    pub fn random<R: Rng>(p_genes: &[String], edge_probability: f64, rng: &mut R) -> Self {
        let mut network = Self::empty(p_genes);
        let mut order: Vec<usize> = (0..p_genes.len()).collect();
        order.shuffle(rng);
        for a in 0..order.len() {
            for b in (a + 1)..order.len() {
                if rng.gen::<f64>() < edge_probability {
                    network.graph.add_edge(
                        NodeIndex::new(order[a]),
                        NodeIndex::new(order[b]),
                        (),
                    );
                }
            }
        }
        network
    }

    /// Build from index pairs, rejecting cycles and duplicates.
    pub fn from_edges(p_genes: &[String], edges: &[(usize, usize)]) -> Result<Self, NetworkError> {
        let mut network = Self::empty(p_genes);
        for &(from, to) in edges {
            network.add_edge(from, to)?;
        }
        Ok(network)
    }

    /// Build from an adjacency matrix (entries > 0.5 are edges).
    pub fn from_adjacency(p_genes: &[String], adjacency: &DMatrix<f64>) -> Result<Self, NetworkError> {
        let n = p_genes.len();
        let mut edges = Vec::new();
        for i in 0..n.min(adjacency.nrows()) {
            for j in 0..n.min(adjacency.ncols()) {
                if adjacency[(i, j)] > INDICATOR_THRESHOLD {
                    edges.push((i, j));
                }
            }
        }
        Self::from_edges(p_genes, &edges)
    }

    /// Rebuild from a snapshot.
    pub fn from_snapshot(snapshot: &NetworkSnapshot) -> Result<Self, NetworkError> {
        let mut network = Self::empty(&snapshot.p_genes);
        for (from, to) in &snapshot.edges {
            let f = network.require(from)?;
            let t = network.require(to)?;
            network.add_edge(f, t)?;
        }
        Ok(network)
    }

    /// Named, sorted edge list.
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            p_genes: self.p_genes(),
            edges: self
                .edges()
                .into_iter()
                .map(|(f, t)| (self.name(f).to_string(), self.name(t).to_string()))
                .collect(),
        }
    }

    /// Number of P-genes.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// P-gene names in index order.
    pub fn p_genes(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .map(|i| self.graph[i].clone())
            .collect()
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.graph[NodeIndex::new(idx)]
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Direct access to the underlying graph.
    pub fn graph(&self) -> &PGeneGraph {
        &self.graph
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        from < self.len()
            && to < self.len()
            && self
                .graph
                .contains_edge(NodeIndex::new(from), NodeIndex::new(to))
    }

    /// Edges as sorted index pairs.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Add edge `from → to`. Self-loops and cycle-closing edges are rejected.
    pub fn add_edge(&mut self, from: usize, to: usize) -> Result<(), NetworkError> {
        self.check_node(from)?;
        self.check_node(to)?;
        if self.has_edge(from, to) {
            return Err(NetworkError::EdgeExists {
                from: self.name(from).to_string(),
                to: self.name(to).to_string(),
            });
        }
        let (f, t) = (NodeIndex::new(from), NodeIndex::new(to));
        if dag_enforcement::would_create_cycle(&self.graph, f, t) {
            return Err(self.cycle_rejected(from, to));
        }
        self.graph.add_edge(f, t, ());
        Ok(())
    }

    /// Remove edge `from → to`.
    pub fn remove_edge(&mut self, from: usize, to: usize) -> Result<(), NetworkError> {
        self.check_node(from)?;
        self.check_node(to)?;
        let edge = self
            .graph
            .find_edge(NodeIndex::new(from), NodeIndex::new(to))
            .ok_or_else(|| NetworkError::EdgeNotFound {
                from: self.name(from).to_string(),
                to: self.name(to).to_string(),
            })?;
        self.graph.remove_edge(edge);
        Ok(())
    }

    /// Replace `from → to` with `to → from`. If the reversed edge would close a
    /// cycle through another path, the graph is left unchanged.
    pub fn reverse_edge(&mut self, from: usize, to: usize) -> Result<(), NetworkError> {
        self.remove_edge(from, to)?;
        let (f, t) = (NodeIndex::new(from), NodeIndex::new(to));
        if dag_enforcement::would_create_cycle(&self.graph, t, f) {
            self.graph.add_edge(f, t, ());
            return Err(self.cycle_rejected(to, from));
        }
        self.graph.add_edge(t, f, ());
        Ok(())
    }

    /// Apply a move to a copy of this network.
    pub fn apply(&self, mv: &EdgeMove) -> Result<NetworkModel, NetworkError> {
        let mut next = self.clone();
        match *mv {
            EdgeMove::Add { from, to } => next.add_edge(from, to)?,
            EdgeMove::Remove { from, to } => next.remove_edge(from, to)?,
            EdgeMove::Reverse { from, to } => next.reverse_edge(from, to)?,
        }
        Ok(next)
    }

    /// 0/1 adjacency matrix.
    pub fn adjacency(&self) -> DMatrix<f64> {
        let n = self.len();
        let mut adjacency = DMatrix::zeros(n, n);
        for (f, t) in self.edges() {
            adjacency[(f, t)] = 1.0;
        }
        adjacency
    }

    /// Reflexive transitive closure T(φ).
    pub fn closure(&self) -> DMatrix<f64> {
        closure::transitive_closure(&self.graph)
    }

    /// Nodes reachable from `idx`, itself included.
    pub fn descendants(&self, idx: usize) -> Vec<usize> {
        closure::descendants(&self.graph, idx)
    }

    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Groups of P-genes that form cycles. Empty for every network built
    /// through this API.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        dag_enforcement::find_cycles(&self.graph)
            .into_iter()
            .map(|scc| scc.into_iter().map(|i| self.graph[i].clone()).collect())
            .collect()
    }

    fn require(&self, name: &str) -> Result<usize, NetworkError> {
        self.index_of(name).ok_or_else(|| NetworkError::UnknownNode {
            name: name.to_string(),
        })
    }

    fn check_node(&self, idx: usize) -> Result<(), NetworkError> {
        if idx < self.len() {
            Ok(())
        } else {
            Err(NetworkError::UnknownNode {
                name: format!("#{idx}"),
            })
        }
    }

    fn cycle_rejected(&self, from: usize, to: usize) -> NetworkError {
        NetworkError::CycleRejected {
            from: self.name(from).to_string(),
            to: self.name(to).to_string(),
        }
    }
}

impl PartialEq for NetworkModel {
    fn eq(&self, other: &Self) -> bool {
        self.p_genes() == other.p_genes() && self.edges() == other.edges()
    }
}
