//! Tests for greedy structure search.

use nalgebra::DMatrix;
use nempi_core::config::{NoiseModel, SearchConfig};
use nempi_inference::{AttachmentScorer, EmissionTable, StructureSearch};
use nempi_network::NetworkModel;
use proptest::prelude::*;
use test_fixtures::{load_scenario, simulate, SimulationConfig};

fn sequential() -> SearchConfig {
    SearchConfig {
        parallel: false,
        ..Default::default()
    }
}

#[test]
fn recovers_chain_from_labeled_assignment() {
    let scenario = load_scenario("chain_two");
    let emission = EmissionTable::new(&scenario.values(), &NoiseModel::default());
    let config = sequential();
    let search = StructureSearch::new(AttachmentScorer::new(&emission, true, false), &config);

    let start = NetworkModel::empty(&scenario.p_genes);
    let outcome = search.run(&start, scenario.truth().values());

    assert_eq!(outcome.network, scenario.network());
    assert_eq!(outcome.steps, 1);
    assert_eq!(outcome.trace.len(), 1);
    assert_eq!(outcome.attachment.targets, vec![Some(0), Some(1)]);
    assert_eq!(outcome.score, outcome.attachment.total);
}

#[test]
fn symmetric_assignment_prefers_earliest_move() {
    // Under a uniform Γ adding P1 → P2 and P2 → P1 score the same.
    let scenario = load_scenario("chain_two");
    let emission = EmissionTable::new(&scenario.values(), &NoiseModel::default());
    let config = sequential();
    let search = StructureSearch::new(AttachmentScorer::new(&emission, true, false), &config);

    let gamma = DMatrix::from_element(2, 4, 0.5);
    let outcome = search.run(&NetworkModel::empty(&scenario.p_genes), &gamma);
    assert_eq!(outcome.network.edges(), vec![(0, 1)]);
}

#[test]
fn recovers_fork() {
    let scenario = load_scenario("fork_three");
    let emission = EmissionTable::new(&scenario.values(), &NoiseModel::default());
    let config = sequential();
    let search = StructureSearch::new(AttachmentScorer::new(&emission, true, false), &config);

    let outcome = search.run(
        &NetworkModel::empty(&scenario.p_genes),
        scenario.truth().values(),
    );
    assert_eq!(outcome.network, scenario.network());
}

#[test]
fn max_steps_caps_accepted_moves() {
    let scenario = load_scenario("fork_three");
    let emission = EmissionTable::new(&scenario.values(), &NoiseModel::default());
    let config = SearchConfig {
        max_steps: 1,
        ..sequential()
    };
    let search = StructureSearch::new(AttachmentScorer::new(&emission, true, false), &config);

    let outcome = search.run(
        &NetworkModel::empty(&scenario.p_genes),
        scenario.truth().values(),
    );
    assert_eq!(outcome.steps, 1);
    assert_eq!(outcome.network.edge_count(), 1);
}

#[test]
fn warm_start_at_optimum_accepts_nothing() {
    let scenario = load_scenario("chain_two");
    let emission = EmissionTable::new(&scenario.values(), &NoiseModel::default());
    let config = sequential();
    let search = StructureSearch::new(AttachmentScorer::new(&emission, true, false), &config);

    let outcome = search.run(&scenario.network(), scenario.truth().values());
    assert_eq!(outcome.steps, 0);
    assert!(outcome.trace.is_empty());
    assert_eq!(outcome.network, scenario.network());
}

#[test]
fn cycle_closing_moves_are_counted() {
    // From P1 → P2 → P3 the only rejected move is adding P3 → P1.
    let p_genes: Vec<String> = ["P1", "P2", "P3"].iter().map(|s| s.to_string()).collect();
    let start = NetworkModel::from_edges(&p_genes, &[(0, 1), (1, 2)]).unwrap();
    let values = DMatrix::from_element(3, 3, -1.0);
    let emission = EmissionTable::new(&values, &NoiseModel::default());
    let config = sequential();
    let search = StructureSearch::new(AttachmentScorer::new(&emission, true, false), &config);

    let outcome = search.run(&start, &DMatrix::zeros(3, 3));
    assert_eq!(outcome.steps, 0);
    assert_eq!(outcome.rejected_moves, 1);
}

#[test]
fn parallel_search_matches_sequential() {
    let data = simulate(&SimulationConfig {
        n_p_genes: 6,
        n_samples: 80,
        seed: 7,
        ..Default::default()
    });
    let emission = EmissionTable::new(data.dataset.data().values(), &NoiseModel::default());
    let start = NetworkModel::empty(&data.dataset.p_gene_vocabulary());
    let gamma = data.truth.values().clone();

    let seq_config = sequential();
    let par_config = SearchConfig::default();
    let seq = StructureSearch::new(AttachmentScorer::new(&emission, true, false), &seq_config)
        .run(&start, &gamma);
    let par = StructureSearch::new(AttachmentScorer::new(&emission, true, true), &par_config)
        .run(&start, &gamma);

    assert_eq!(seq.network, par.network);
    assert_eq!(seq.score, par.score);
    assert_eq!(seq.trace, par.trace);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn search_returns_acyclic_network_with_increasing_trace(
        seed in any::<u64>(),
        n_p_genes in 2_usize..6,
        edge_probability in 0.0_f64..0.6,
    ) {
        let data = simulate(&SimulationConfig {
            n_p_genes,
            e_genes_per_p_gene: 2,
            n_samples: 20,
            edge_probability,
            seed,
            ..Default::default()
        });
        let emission = EmissionTable::new(data.dataset.data().values(), &NoiseModel::default());
        let config = SearchConfig { max_steps: 20, ..sequential() };
        let search = StructureSearch::new(AttachmentScorer::new(&emission, true, false), &config);

        let outcome = search.run(&data.network, data.truth.values());

        prop_assert!(outcome.network.is_acyclic());
        prop_assert!(outcome.network.find_cycles().is_empty());
        prop_assert!(outcome.steps <= 20);
        for pair in outcome.trace.windows(2) {
            prop_assert!(pair[1] > pair[0]);
        }
    }
}
