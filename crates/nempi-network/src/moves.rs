//! Single-edge moves explored by structure search.

use serde::{Deserialize, Serialize};

use crate::graph::NetworkModel;

/// One local change to a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeMove {
    Add { from: usize, to: usize },
    Remove { from: usize, to: usize },
    Reverse { from: usize, to: usize },
}

impl EdgeMove {
    /// The edge the move acts on, as `(from, to)` before the move.
    pub fn edge(&self) -> (usize, usize) {
        match *self {
            Self::Add { from, to } | Self::Remove { from, to } | Self::Reverse { from, to } => {
                (from, to)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Reverse { .. } => "reverse",
        }
    }
}

/// All single-edge moves for `network`, in a fixed order.
///
/// Pairs are visited row-major (`from` outer, `to` inner). An existing edge
/// yields `Remove` then `Reverse`; a pair with no edge in either direction
/// yields `Add`. Moves may still be cycle-rejected when applied.
pub fn enumerate_moves(network: &NetworkModel) -> Vec<EdgeMove> {
    let n = network.len();
    let mut moves = Vec::with_capacity(n * n);
    for from in 0..n {
        for to in 0..n {
            if from == to {
                continue;
            }
            if network.has_edge(from, to) {
                moves.push(EdgeMove::Remove { from, to });
                moves.push(EdgeMove::Reverse { from, to });
            } else if !network.has_edge(to, from) {
                moves.push(EdgeMove::Add { from, to });
            }
        }
    }
    moves
}
