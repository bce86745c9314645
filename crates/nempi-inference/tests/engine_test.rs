//! End-to-end tests for the inference loop.

use nalgebra::DMatrix;
use nempi_core::config::{InitialNetwork, NempiConfig, PriorBlend, UnlabeledInit};
use nempi_core::errors::{InferenceError, NempiError};
use nempi_core::{Dataset, LabeledMatrix};
use nempi_inference::{InferenceEngine, InferenceResult};
use test_fixtures::{load_scenario, simulate, SimulationConfig};

fn engine() -> InferenceEngine {
    nempi_observability::try_init_for_tests();
    InferenceEngine::new(NempiConfig::default())
}

// ---------------------------------------------------------------------------
// Labeled chain: the edge is recovered and labels are kept.
// ---------------------------------------------------------------------------

#[test]
fn labeled_chain_recovers_edge() {
    let scenario = load_scenario("chain_two");
    let result = engine().run(&scenario.labeled_dataset(), None).unwrap();

    assert!(result.converged);
    assert!(result.cycles <= 5);
    assert_eq!(
        result.network.edges,
        vec![("P1".to_string(), "P2".to_string())]
    );
    let truth = scenario.truth();
    for s in 0..truth.ncols() {
        let k = truth.column_argmax(s).unwrap();
        assert!(result.assignment.get(k, s) >= 0.9);
    }
    assert!(result.warnings.is_empty());
}

#[test]
fn attachment_is_reported_by_name() {
    let scenario = load_scenario("chain_two");
    let result = engine().run(&scenario.labeled_dataset(), None).unwrap();

    let pairs: Vec<(&str, Option<&str>)> = result
        .attachment
        .iter()
        .map(|a| (a.e_gene.as_str(), a.p_gene.as_deref()))
        .collect();
    assert_eq!(pairs, vec![("E1", Some("P1")), ("E2", Some("P2"))]);
}

// ---------------------------------------------------------------------------
// Unlabeled chain: Γ is learned from a uniform prior.
// ---------------------------------------------------------------------------

#[test]
fn unlabeled_chain_tracks_hidden_truth() {
    let scenario = load_scenario("chain_two");
    let prior = scenario.uniform_prior();
    let result = engine()
        .run(&scenario.unlabeled_dataset(), Some(&prior))
        .unwrap();

    let expected: Vec<Option<String>> = scenario.perturbed.iter().cloned().map(Some).collect();
    assert_eq!(result.map_assignment(), expected);

    let fit = nempi_eval::evaluate(&result.assignment, &scenario.truth()).unwrap();
    assert!(fit.roc_auc > 0.9, "roc_auc = {}", fit.roc_auc);
    assert!(result.converged);
}

#[test]
fn random_start_leaves_the_uniform_point() {
    let data = simulate(&SimulationConfig {
        unlabeled_fraction: 1.0,
        ..Default::default()
    });
    let mut config = NempiConfig::default();
    config.inference.unlabeled_init = UnlabeledInit::Random;
    config.inference.max_iterations = 8;

    let run = || {
        InferenceEngine::new(config.clone())
            .run(&data.dataset, None)
            .unwrap()
    };
    let result = run();

    // The first reassignment moves away from the random start.
    assert!(result.delta_trace[0] > config.inference.convergence_tolerance);
    assert!(result.cycles >= 2);
    for s in 0..result.assignment.ncols() {
        assert!((result.assignment.column_sum(s) - 1.0).abs() < 1e-9);
    }
    assert_eq!(result.assignment, run().assignment);
}

#[test]
fn vocabulary_can_come_from_prior_rows() {
    let scenario = load_scenario("chain_two");
    let labels = vec![""; scenario.perturbed.len()];
    let dataset = Dataset::from_column_labels(
        scenario.e_genes.clone(),
        &labels,
        scenario.values(),
        "_",
    )
    .unwrap();
    let result = engine()
        .run(&dataset, Some(&scenario.uniform_prior()))
        .unwrap();
    assert_eq!(result.assignment.row_names(), scenario.p_genes.as_slice());
}

#[test]
fn replace_blend_runs_without_prior_constraint() {
    let scenario = load_scenario("chain_two");
    let mut config = NempiConfig::default();
    config.inference.prior_blend = PriorBlend::Replace;
    let result = InferenceEngine::new(config)
        .run(&scenario.unlabeled_dataset(), Some(&scenario.uniform_prior()))
        .unwrap();
    // A uniform prior does not change the posterior.
    let expected: Vec<Option<String>> = scenario.perturbed.iter().cloned().map(Some).collect();
    assert_eq!(result.map_assignment(), expected);
}

// ---------------------------------------------------------------------------
// Termination and diagnostics.
// ---------------------------------------------------------------------------

#[test]
fn iteration_cap_records_non_convergence() {
    let scenario = load_scenario("chain_two");
    let mut config = NempiConfig::default();
    config.inference.max_iterations = 1;
    let result = InferenceEngine::new(config)
        .run(&scenario.unlabeled_dataset(), Some(&scenario.uniform_prior()))
        .unwrap();

    assert_eq!(result.cycles, 1);
    assert!(!result.converged);
    assert_eq!(result.score_trace.len(), 1);
    assert_eq!(result.delta_trace.len(), 1);
    assert!(matches!(
        result.warnings.as_slice(),
        [InferenceError::NonConvergence { cycles: 1, .. }]
    ));
}

#[test]
fn terminates_within_max_iterations_on_simulated_data() {
    let data = simulate(&SimulationConfig::default());
    let mut config = NempiConfig::default();
    config.inference.max_iterations = 6;
    let result = InferenceEngine::new(config).run(&data.dataset, None).unwrap();

    assert!(result.cycles >= 1 && result.cycles <= 6);
    assert_eq!(result.score_trace.len(), result.cycles);
    assert_eq!(result.delta_trace.len(), result.cycles);
    assert!(result.network_model().unwrap().is_acyclic());
    for s in 0..result.assignment.ncols() {
        assert!((result.assignment.column_sum(s) - 1.0).abs() < 1e-9);
    }
}

#[test]
fn excluded_samples_stay_empty() {
    let scenario = load_scenario("chain_two");
    let mut prior = scenario.uniform_prior().into_values();
    prior.column_mut(3).fill(0.0);
    let prior = LabeledMatrix::new(scenario.p_genes.clone(), scenario.sample_ids(), prior).unwrap();

    let result = engine()
        .run(&scenario.unlabeled_dataset(), Some(&prior))
        .unwrap();
    assert_eq!(result.assignment.column_sum(3), 0.0);
    assert_eq!(result.map_assignment()[3], None);
}

#[test]
fn non_finite_sample_is_reported() {
    let scenario = load_scenario("chain_two");
    let mut values = DMatrix::zeros(2, 5);
    values.columns_mut(0, 4).copy_from(&scenario.values());
    values.column_mut(4).fill(f64::NAN);
    let dataset = Dataset::from_column_labels(
        scenario.e_genes.clone(),
        &["P1", "P2", "P1", "P2", ""],
        values,
        "_",
    )
    .unwrap();

    let result = engine().run(&dataset, None).unwrap();
    assert!(result.warnings.contains(&InferenceError::DegenerateLikelihood {
        sample: "s4".to_string()
    }));
    assert_eq!(result.assignment.get(0, 4), 0.5);
    assert_eq!(
        result.network.edges,
        vec![("P1".to_string(), "P2".to_string())]
    );
    assert!(result.score_trace.iter().all(|v| v.is_finite()));
}

#[test]
fn missing_entry_does_not_stop_the_search() {
    let scenario = load_scenario("chain_two");
    let mut values = DMatrix::zeros(2, 5);
    values.columns_mut(0, 4).copy_from(&scenario.values());
    values[(0, 4)] = f64::NAN;
    values[(1, 4)] = 1.5;
    let dataset = Dataset::from_column_labels(
        scenario.e_genes.clone(),
        &["P1", "P2", "P1", "P2", ""],
        values,
        "_",
    )
    .unwrap();

    let result = engine().run(&dataset, None).unwrap();
    assert_eq!(
        result.network.edges,
        vec![("P1".to_string(), "P2".to_string())]
    );
    assert!(result.score_trace.iter().all(|v| v.is_finite()));
    assert!(result.warnings.is_empty());
}

// ---------------------------------------------------------------------------
// Validation happens before any cycle.
// ---------------------------------------------------------------------------

#[test]
fn prior_rows_must_match_label_vocabulary() {
    let scenario = load_scenario("chain_two");
    let prior = LabeledMatrix::new(
        vec!["P1".into(), "P2".into(), "P3".into()],
        scenario.sample_ids(),
        DMatrix::from_element(3, 4, 1.0 / 3.0),
    )
    .unwrap();

    let err = engine()
        .run(&scenario.labeled_dataset(), Some(&prior))
        .unwrap_err();
    assert!(matches!(
        err,
        NempiError::Inference(InferenceError::DimensionMismatch { .. })
    ));
}

#[test]
fn prior_samples_must_match_dataset() {
    let scenario = load_scenario("chain_two");
    let prior = LabeledMatrix::new(
        scenario.p_genes.clone(),
        vec!["a".into(), "b".into(), "c".into(), "d".into()],
        DMatrix::from_element(2, 4, 0.5),
    )
    .unwrap();
    let err = engine()
        .run(&scenario.unlabeled_dataset(), Some(&prior))
        .unwrap_err();
    assert!(matches!(
        err,
        NempiError::Inference(InferenceError::DimensionMismatch { .. })
    ));
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = NempiConfig::default();
    config.noise.sd = 0.0;
    let scenario = load_scenario("chain_two");
    let err = InferenceEngine::new(config)
        .run(&scenario.labeled_dataset(), None)
        .unwrap_err();
    assert!(matches!(err, NempiError::Config(_)));
}

// ---------------------------------------------------------------------------
// Determinism and serialization.
// ---------------------------------------------------------------------------

#[test]
fn random_initial_network_is_seeded() {
    let data = simulate(&SimulationConfig {
        unlabeled_fraction: 0.2,
        ..Default::default()
    });
    let mut config = NempiConfig::default();
    config.inference.initial_network = InitialNetwork::Random;
    config.inference.random_edge_probability = 0.5;
    config.inference.max_iterations = 4;

    let a = InferenceEngine::new(config.clone()).run(&data.dataset, None).unwrap();
    let b = InferenceEngine::new(config).run(&data.dataset, None).unwrap();
    assert_eq!(a.network, b.network);
    assert_eq!(a.assignment, b.assignment);
    assert_eq!(a.score_trace, b.score_trace);
}

#[test]
fn parallel_and_sequential_runs_agree() {
    let data = simulate(&SimulationConfig::default());
    let mut config = NempiConfig::default();
    config.inference.max_iterations = 4;
    let parallel = InferenceEngine::new(config.clone()).run(&data.dataset, None).unwrap();
    config.search.parallel = false;
    let sequential = InferenceEngine::new(config).run(&data.dataset, None).unwrap();

    assert_eq!(parallel.network, sequential.network);
    assert_eq!(parallel.score_trace, sequential.score_trace);
}

#[test]
fn result_roundtrips_through_json() {
    let scenario = load_scenario("chain_two");
    let result = engine().run(&scenario.labeled_dataset(), None).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let back: InferenceResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.network, result.network);
    assert_eq!(back.assignment, result.assignment);
    assert_eq!(back.cycles, result.cycles);
}

#[test]
fn result_propagates_through_learned_network() {
    let scenario = load_scenario("chain_two");
    let result = engine().run(&scenario.labeled_dataset(), None).unwrap();
    let omega = result.propagate().unwrap();
    // Sample s0 perturbs P1, which reaches P2.
    assert_eq!(omega.get(0, 0), 1.0);
    assert_eq!(omega.get(1, 0), 1.0);
    assert_eq!(omega.get(0, 1), 0.0);
    assert_eq!(omega.get(1, 1), 1.0);
}
