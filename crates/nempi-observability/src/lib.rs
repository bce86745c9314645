//! # nempi-observability
//!
//! Subscriber setup driven by `NEMPI_LOG` or [`ObservabilityConfig`], span
//! macros for the inference phases, and structured log events.
//!
//! [`ObservabilityConfig`]: nempi_core::config::ObservabilityConfig

pub mod tracing_setup;

pub use tracing_setup::{init_from_config, init_tracing, spans::names, try_init_for_tests};

#[doc(hidden)]
pub use tracing;
