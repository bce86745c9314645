//! Network representation: the model itself, DAG enforcement, and closure.

pub mod closure;
pub mod dag_enforcement;
pub mod network;

pub use network::{NetworkModel, NetworkSnapshot, PGeneGraph};
