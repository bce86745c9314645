//! Greedy hill-climbing over DAGs for a fixed assignment Γ.

use nalgebra::DMatrix;
use nempi_core::config::SearchConfig;
use nempi_network::{enumerate_moves, EdgeMove, NetworkModel};
use nempi_observability::search_span;
use nempi_observability::tracing_setup::events;
use rayon::prelude::*;
use tracing::debug;

use crate::attachment::{Attachment, AttachmentScorer};

/// Result of one structure search call.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub network: NetworkModel,
    pub attachment: Attachment,
    pub score: f64,
    /// Accepted moves.
    pub steps: usize,
    /// Score after every accepted move. Strictly increasing.
    pub trace: Vec<f64>,
    /// Moves skipped because they would close a cycle.
    pub rejected_moves: usize,
}

/// A scored candidate network.
struct Candidate {
    index: usize,
    network: NetworkModel,
    attachment: Attachment,
}

/// Greedy single-edge structure search.
pub struct StructureSearch<'a> {
    scorer: AttachmentScorer<'a>,
    config: &'a SearchConfig,
}

impl<'a> StructureSearch<'a> {
    pub fn new(scorer: AttachmentScorer<'a>, config: &'a SearchConfig) -> Self {
        Self { scorer, config }
    }

    /// Climb from `start` until no move improves the score by more than
    /// `min_improvement` or `max_steps` moves were accepted.
    pub fn run(&self, start: &NetworkModel, gamma: &DMatrix<f64>) -> SearchOutcome {
        let _span = search_span!(start.edge_count(), self.config.parallel).entered();

        let mut network = start.clone();
        let mut attachment = self.scorer.score(&network.closure(), gamma);
        let mut trace = Vec::new();
        let mut rejected_moves = 0;

        while trace.len() < self.config.max_steps {
            let moves = enumerate_moves(&network);
            let (best, rejected) = self.best_move(&network, &moves, gamma);
            rejected_moves += rejected;

            let Some(best) = best else { break };
            let gain = best.attachment.total - attachment.total;
            if gain.is_nan() || gain <= self.config.min_improvement {
                break;
            }

            debug!(
                step = trace.len() + 1,
                kind = moves[best.index].kind(),
                from = network.name(moves[best.index].edge().0),
                to = network.name(moves[best.index].edge().1),
                score = best.attachment.total,
                "accepted move"
            );
            network = best.network;
            attachment = best.attachment;
            trace.push(attachment.total);
        }

        let score = attachment.total;
        events::search_completed(trace.len(), score, rejected_moves);
        SearchOutcome {
            network,
            attachment,
            score,
            steps: trace.len(),
            trace,
            rejected_moves,
        }
    }

    /// Score every applicable move against the same network and return the
    /// best one (highest score, then earliest move) plus the rejected count.
    fn best_move(
        &self,
        network: &NetworkModel,
        moves: &[EdgeMove],
        gamma: &DMatrix<f64>,
    ) -> (Option<Candidate>, usize) {
        let evaluate = |(index, mv): (usize, &EdgeMove)| match network.apply(mv) {
            Ok(next) => {
                let attachment = self.scorer.score(&next.closure(), gamma);
                Some(Candidate {
                    index,
                    network: next,
                    attachment,
                })
            }
            Err(err) => {
                debug!(%err, kind = mv.kind(), "move rejected");
                None
            }
        };

        let candidates: Vec<Option<Candidate>> = if self.config.parallel {
            moves.par_iter().enumerate().map(evaluate).collect()
        } else {
            moves.iter().enumerate().map(evaluate).collect()
        };

        let rejected = candidates.iter().filter(|c| c.is_none()).count();
        let best = candidates.into_iter().flatten().fold(None, |best, c| match best {
            Some(b) if !prefer(&c, &b) => Some(b),
            _ => Some(c),
        });
        (best, rejected)
    }
}

/// `a` beats `b` on a strictly higher score, or an equal score and an earlier move.
fn prefer(a: &Candidate, b: &Candidate) -> bool {
    a.attachment.total > b.attachment.total
        || (a.attachment.total == b.attachment.total && a.index < b.index)
}
