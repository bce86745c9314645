//! Tests for nempi-observability: subscriber setup and span macros.

use nempi_core::config::ObservabilityConfig;
use nempi_observability::tracing_setup::events;
use nempi_observability::{
    classifier_span, cycle_span, inference_span, names, search_span, try_init_for_tests,
};

#[test]
fn span_names_are_namespaced() {
    for name in [names::INFERENCE, names::CYCLE, names::SEARCH, names::CLASSIFIER] {
        assert!(name.starts_with("nempi."), "{name}");
    }
}

#[test]
fn spans_and_events_work_under_test_subscriber() {
    try_init_for_tests();
    try_init_for_tests();

    let run = inference_span!(4, 2, 2);
    let _run = run.enter();
    let cycle = cycle_span!(1);
    let _cycle = cycle.enter();
    let _search = search_span!(0, true).entered();
    let _classifier = classifier_span!("nearest_centroid", 12).entered();

    events::cycle_completed(1, -10.5, 0.2, 1);
    events::search_completed(1, -10.5, 0);
    events::degenerate_sample("s0");
    events::non_convergence(20, 0.01);
}

#[test]
fn init_from_config_is_idempotent() {
    try_init_for_tests();
    // A global subscriber is already installed, so this returns false.
    assert!(!nempi_observability::init_from_config(&ObservabilityConfig::default()));
}
