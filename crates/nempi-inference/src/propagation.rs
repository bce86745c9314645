//! Propagation of an assignment through the network: Ω = T(φ)ᵀ Γ.

use nalgebra::DMatrix;
use nempi_core::errors::InferenceError;
use nempi_core::LabeledMatrix;
use nempi_network::NetworkModel;

/// Ω for a named assignment. Γ's rows must be the network's P-genes, in any
/// order; Ω follows the network's order and Γ's sample order.
pub fn propagate(
    network: &NetworkModel,
    gamma: &LabeledMatrix,
) -> Result<LabeledMatrix, InferenceError> {
    let p_genes = network.p_genes();
    let aligned = gamma.aligned_to(&p_genes, gamma.col_names())?;
    let omega = propagate_matrix(&network.closure(), aligned.values())?;
    LabeledMatrix::new(p_genes, gamma.col_names().to_vec(), omega)
}

/// Tᵀ Γ.
pub fn propagate_matrix(
    closure: &DMatrix<f64>,
    gamma: &DMatrix<f64>,
) -> Result<DMatrix<f64>, InferenceError> {
    if closure.nrows() != gamma.nrows() || !closure.is_square() {
        return Err(InferenceError::mismatch(
            "propagation",
            format!("{0}x{0} closure", gamma.nrows()),
            format!("{}x{}", closure.nrows(), closure.ncols()),
        ));
    }
    Ok(closure.tr_mul(gamma))
}
