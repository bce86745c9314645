//! InferenceEngine: the search / reassign loop.
//!
//! Init → Searching → Reassigning → (Searching | Converged)

use nalgebra::DMatrix;
use nempi_core::config::{InitialNetwork, NempiConfig};
use nempi_core::errors::{InferenceError, NempiResult};
use nempi_core::{Dataset, LabeledMatrix};
use nempi_network::{NetworkModel, NetworkSnapshot};
use nempi_observability::tracing_setup::events;
use nempi_observability::{cycle_span, inference_span};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::attachment::{Attachment, AttachmentScorer};
use crate::emission::EmissionTable;
use crate::init::{self, Prepared};
use crate::propagation;
use crate::reestimate::AssignmentReestimator;
use crate::search::StructureSearch;

/// Phase of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    Init,
    Searching,
    Reassigning,
    Converged,
}

/// Attachment of one E-gene, by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EGeneAttachment {
    pub e_gene: String,
    /// `None` when the E-gene sits on the null node.
    pub p_gene: Option<String>,
    pub score: f64,
}

/// Final output of [`InferenceEngine::run`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResult {
    pub network: NetworkSnapshot,
    pub attachment: Vec<EGeneAttachment>,
    /// Γ: P-genes × samples.
    pub assignment: LabeledMatrix,
    /// Search score per cycle.
    pub score_trace: Vec<f64>,
    /// Max-abs Γ change per cycle.
    pub delta_trace: Vec<f64>,
    pub cycles: usize,
    pub converged: bool,
    /// Non-fatal diagnostics (`DegenerateLikelihood`, `NonConvergence`).
    pub warnings: Vec<InferenceError>,
}

impl InferenceResult {
    /// Rebuild the learned network.
    pub fn network_model(&self) -> NempiResult<NetworkModel> {
        Ok(NetworkModel::from_snapshot(&self.network)?)
    }

    /// Ω = T(φ)ᵀ Γ for the final network and assignment.
    pub fn propagate(&self) -> NempiResult<LabeledMatrix> {
        let network = self.network_model()?;
        Ok(propagation::propagate(&network, &self.assignment)?)
    }

    /// The P-gene with the most mass per sample (`None` for excluded samples).
    pub fn map_assignment(&self) -> Vec<Option<String>> {
        (0..self.assignment.ncols())
            .map(|s| {
                if self.assignment.column_sum(s) <= 0.0 {
                    return None;
                }
                self.assignment
                    .column_argmax(s)
                    .map(|k| self.assignment.row_names()[k].clone())
            })
            .collect()
    }
}

/// Runs perturbation inference for one dataset.
pub struct InferenceEngine {
    config: NempiConfig,
}

impl InferenceEngine {
    pub fn new(config: NempiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NempiConfig {
        &self.config
    }

    /// Infer the network, attachment and assignment for `dataset`.
    ///
    /// `prior` optionally supplies Γ₀ for unlabeled samples (P-genes × samples,
    /// aligned by name). Validation errors are returned before any cycle runs.
    pub fn run(
        &self,
        dataset: &Dataset,
        prior: Option<&LabeledMatrix>,
    ) -> NempiResult<InferenceResult> {
        self.config.validate()?;
        let prepared = init::prepare(dataset, prior, &self.config.inference)?;
        let span = inference_span!(
            dataset.n_samples(),
            prepared.p_genes.len(),
            dataset.e_genes().len()
        );
        let _guard = span.enter();

        let emission = EmissionTable::new(dataset.data().values(), &self.config.noise);
        let mut run = LoopRun::new(&self.config, &emission, prepared);

        let mut state = LoopState::Init;
        while state != LoopState::Converged {
            let next = run.advance(state);
            debug!(from = ?state, to = ?next, "state transition");
            state = next;
        }

        let result = run.finish(dataset)?;
        info!(
            cycles = result.cycles,
            converged = result.converged,
            edges = result.network.edges.len(),
            warnings = result.warnings.len(),
            "inference complete"
        );
        Ok(result)
    }
}

/// Mutable state of one run.
struct LoopRun<'a> {
    config: &'a NempiConfig,
    search: StructureSearch<'a>,
    reestimator: AssignmentReestimator<'a>,
    prepared: Prepared,
    network: NetworkModel,
    attachment: Option<Attachment>,
    gamma: DMatrix<f64>,
    cycles: usize,
    converged: bool,
    score_trace: Vec<f64>,
    delta_trace: Vec<f64>,
    degenerate: Vec<usize>,
}

impl<'a> LoopRun<'a> {
    fn new(config: &'a NempiConfig, emission: &'a EmissionTable, prepared: Prepared) -> Self {
        let scorer = AttachmentScorer::new(
            emission,
            config.inference.allow_null_attachment,
            config.search.parallel,
        );
        let network = match config.inference.initial_network {
            InitialNetwork::Empty => NetworkModel::empty(&prepared.p_genes),
            InitialNetwork::Random => {
                let mut rng = ChaCha8Rng::seed_from_u64(config.inference.seed);
                NetworkModel::random(
                    &prepared.p_genes,
                    config.inference.random_edge_probability,
                    &mut rng,
                )
            }
        };
        let gamma = prepared.gamma.clone();
        Self {
            config,
            search: StructureSearch::new(scorer, &config.search),
            reestimator: AssignmentReestimator::new(emission),
            prepared,
            network,
            attachment: None,
            gamma,
            cycles: 0,
            converged: false,
            score_trace: Vec::new(),
            delta_trace: Vec::new(),
            degenerate: Vec::new(),
        }
    }

    fn advance(&mut self, state: LoopState) -> LoopState {
        match state {
            LoopState::Init => LoopState::Searching,
            LoopState::Searching => {
                self.cycles += 1;
                let _span = cycle_span!(self.cycles).entered();
                let outcome = self.search.run(&self.network, &self.gamma);
                self.score_trace.push(outcome.score);
                self.network = outcome.network;
                self.attachment = Some(outcome.attachment);
                LoopState::Reassigning
            }
            LoopState::Reassigning => {
                let _span = cycle_span!(self.cycles).entered();
                let Some(attachment) = &self.attachment else {
                    return LoopState::Searching;
                };
                let closure = self.network.closure();
                let next =
                    self.reestimator
                        .reestimate(&closure, attachment, &self.prepared.constraints);
                let delta = (&next.gamma - &self.gamma).amax();
                self.gamma = next.gamma;
                self.delta_trace.push(delta);
                for s in next.degenerate {
                    if !self.degenerate.contains(&s) {
                        self.degenerate.push(s);
                    }
                }

                events::cycle_completed(
                    self.cycles,
                    self.score_trace.last().copied().unwrap_or(f64::NEG_INFINITY),
                    delta,
                    self.network.edge_count(),
                );

                if delta < self.config.inference.convergence_tolerance {
                    self.converged = true;
                    LoopState::Converged
                } else if self.cycles >= self.config.inference.max_iterations {
                    LoopState::Converged
                } else {
                    LoopState::Searching
                }
            }
            LoopState::Converged => LoopState::Converged,
        }
    }

    fn finish(self, dataset: &Dataset) -> NempiResult<InferenceResult> {
        let sample_ids = dataset.sample_ids();
        let mut warnings: Vec<InferenceError> = self
            .degenerate
            .iter()
            .map(|&s| {
                events::degenerate_sample(&sample_ids[s]);
                InferenceError::DegenerateLikelihood {
                    sample: sample_ids[s].clone(),
                }
            })
            .collect();
        if !self.converged {
            let last_delta = self.delta_trace.last().copied().unwrap_or(f64::INFINITY);
            events::non_convergence(self.cycles, last_delta);
            warnings.push(InferenceError::NonConvergence {
                cycles: self.cycles,
                last_delta,
            });
        }

        let attachment = match &self.attachment {
            Some(a) => dataset
                .e_genes()
                .iter()
                .zip(a.targets.iter().zip(&a.scores))
                .map(|(e, (t, &score))| EGeneAttachment {
                    e_gene: e.clone(),
                    p_gene: t.map(|k| self.prepared.p_genes[k].clone()),
                    score,
                })
                .collect(),
            None => Vec::new(),
        };

        let assignment =
            LabeledMatrix::new(self.prepared.p_genes, sample_ids.to_vec(), self.gamma)?;

        Ok(InferenceResult {
            network: self.network.snapshot(),
            attachment,
            assignment,
            score_trace: self.score_trace,
            delta_trace: self.delta_trace,
            cycles: self.cycles,
            converged: self.converged,
            warnings,
        })
    }
}
