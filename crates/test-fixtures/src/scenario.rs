//! Small hand-written screens with a known network and known perturbations.

use nalgebra::DMatrix;
use nempi_core::config::InferenceConfig;
use nempi_core::{Dataset, LabeledMatrix};
use nempi_network::{NetworkModel, NetworkSnapshot};
use serde::{Deserialize, Serialize};

/// A scenario fixture. Sample `s` perturbs `perturbed[s]`; an E-gene shows
/// `+magnitude` when its P-gene is downstream of the perturbed one and
/// `-magnitude` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub p_genes: Vec<String>,
    pub e_genes: Vec<String>,
    pub edges: Vec<(String, String)>,
    /// P-gene of every E-gene.
    pub attachment: Vec<String>,
    /// Hidden truth per sample.
    pub perturbed: Vec<String>,
    pub magnitude: f64,
}

/// Load `fixtures/scenarios/<name>.json`.
pub fn load_scenario(name: &str) -> Scenario {
    crate::load_fixture(&format!("scenarios/{name}.json"))
}

/// A linear chain `P1 -> P2 -> ... -> Pn` with `e_per_p` E-genes on every
/// P-gene and `repeats` samples per P-gene, perturbations in round-robin order.
pub fn chain_scenario(n_p_genes: usize, e_per_p: usize, repeats: usize, magnitude: f64) -> Scenario {
    let p_genes: Vec<String> = (1..=n_p_genes).map(|k| format!("P{k}")).collect();
    let edges = p_genes
        .windows(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect();
    let attachment: Vec<String> = p_genes
        .iter()
        .flat_map(|p| std::iter::repeat(p.clone()).take(e_per_p))
        .collect();
    let e_genes = (1..=attachment.len()).map(|i| format!("E{i}")).collect();
    let perturbed = (0..repeats).flat_map(|_| p_genes.iter().cloned()).collect();
    Scenario {
        name: format!("chain_{n_p_genes}"),
        description: format!("generated chain over {n_p_genes} p-genes"),
        p_genes,
        e_genes,
        edges,
        attachment,
        perturbed,
        magnitude,
    }
}

impl Scenario {
    pub fn network(&self) -> NetworkModel {
        NetworkModel::from_snapshot(&NetworkSnapshot {
            p_genes: self.p_genes.clone(),
            edges: self.edges.clone(),
        })
        .unwrap_or_else(|e| panic!("scenario {} has an invalid network: {e}", self.name))
    }

    pub fn sample_ids(&self) -> Vec<String> {
        (0..self.perturbed.len()).map(|s| format!("s{s}")).collect()
    }

    /// E-genes × samples readout.
    pub fn values(&self) -> DMatrix<f64> {
        let network = self.network();
        let closure = network.closure();
        DMatrix::from_fn(self.e_genes.len(), self.perturbed.len(), |i, s| {
            let source = self.p_index(&self.perturbed[s]);
            let target = self.p_index(&self.attachment[i]);
            if closure[(source, target)] > 0.5 {
                self.magnitude
            } else {
                -self.magnitude
            }
        })
    }

    /// The screen with every sample labeled by its true perturbation.
    pub fn labeled_dataset(&self) -> Dataset {
        let labels: Vec<&str> = self.perturbed.iter().map(String::as_str).collect();
        self.dataset(&labels)
    }

    /// The same screen with all labels hidden.
    pub fn unlabeled_dataset(&self) -> Dataset {
        self.dataset(&vec![""; self.perturbed.len()])
    }

    /// Labels given per sample; `""` hides a sample's label.
    pub fn dataset(&self, labels: &[&str]) -> Dataset {
        let config = InferenceConfig::default();
        Dataset::from_column_labels_with(&config, self.e_genes.clone(), labels, self.values())
            .and_then(|d| d.with_p_genes(self.p_genes.clone()))
            .unwrap_or_else(|e| panic!("scenario {} is malformed: {e}", self.name))
    }

    /// One-hot truth Γ.
    pub fn truth(&self) -> LabeledMatrix {
        let values = DMatrix::from_fn(self.p_genes.len(), self.perturbed.len(), |k, s| {
            if self.p_genes[k] == self.perturbed[s] {
                1.0
            } else {
                0.0
            }
        });
        LabeledMatrix::new(self.p_genes.clone(), self.sample_ids(), values)
            .unwrap_or_else(|e| panic!("scenario {} is malformed: {e}", self.name))
    }

    /// Uniform prior over all P-genes for every sample.
    pub fn uniform_prior(&self) -> LabeledMatrix {
        let n = self.p_genes.len();
        let values = DMatrix::from_element(n, self.perturbed.len(), 1.0 / n as f64);
        LabeledMatrix::new(self.p_genes.clone(), self.sample_ids(), values)
            .unwrap_or_else(|e| panic!("scenario {} is malformed: {e}", self.name))
    }

    fn p_index(&self, name: &str) -> usize {
        self.p_genes
            .iter()
            .position(|p| p == name)
            .unwrap_or_else(|| panic!("scenario {} names unknown p-gene {name}", self.name))
    }
}
