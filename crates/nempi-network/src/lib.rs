//! # nempi-network
//!
//! The causal network φ over P-genes. Holds a `petgraph` DAG, rejects any edge
//! that would close a cycle, derives the reflexive transitive closure, and
//! enumerates the single-edge moves explored by structure search.

pub mod graph;
pub mod moves;

pub use graph::{NetworkModel, NetworkSnapshot};
pub use moves::{enumerate_moves, EdgeMove};
