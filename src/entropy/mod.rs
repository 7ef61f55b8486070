// src/entropy/mod.rs

//! Von Neumann entropy of (reduced) density matrices.
//!
//! `S(ρ) = -Tr(ρ log₂ ρ) = -Σᵢ λᵢ log₂ λᵢ` over the eigenvalues of `ρ`, with
//! the convention `0·log₂0 = 0`. For a single qubit `S ∈ [0, 1]` bit.

use tracing::debug;

use crate::core::constants::{EIGENVALUE_EPSILON, EIGENVALUE_TOLERANCE};
use crate::core::{DensityMatrix, EtgError, QubitId, Result};
use crate::validation::validate_state;

/// Eigenvalues of a density matrix, sorted in descending order.
///
/// The state is validated first (finite, unit trace, Hermitian). Eigenvalues
/// below `-EIGENVALUE_TOLERANCE` or above `1 + EIGENVALUE_TOLERANCE` are a
/// numerical-instability error. Within tolerance, values below
/// `EIGENVALUE_EPSILON` become exactly 0 and values above 1 become exactly 1.
pub fn eigenvalues(state: &DensityMatrix) -> Result<Vec<f64>> {
    validate_state(state, None, None)?;

    let raw: Vec<f64> = if state.dim() == 1 {
        vec![state.get(0, 0).re]
    } else {
        // Hermitian solver; eigenvalues of a Hermitian matrix are real.
        state.matrix().symmetric_eigenvalues().iter().copied().collect()
    };

    let mut values = Vec::with_capacity(raw.len());
    for lambda in raw {
        if !(-EIGENVALUE_TOLERANCE..=1.0 + EIGENVALUE_TOLERANCE).contains(&lambda) {
            return Err(EtgError::numerical(format!(
                "Eigenvalue {} of the density matrix is outside [0, 1] beyond tolerance {}",
                lambda, EIGENVALUE_TOLERANCE
            )));
        }
        let clamped = if lambda < EIGENVALUE_EPSILON {
            0.0
        } else {
            lambda.min(1.0)
        };
        if clamped != lambda && (lambda < 0.0 || lambda > 1.0) {
            debug!(lambda, clamped, "clamped eigenvalue rounding artifact");
        }
        values.push(clamped);
    }

    values.sort_by(|a, b| b.total_cmp(a));
    Ok(values)
}

/// Von Neumann entropy in bits.
pub fn von_neumann_entropy(state: &DensityMatrix) -> Result<f64> {
    let entropy = eigenvalues(state)?
        .into_iter()
        .filter(|&lambda| lambda > 0.0)
        .map(|lambda| -lambda * lambda.log2())
        .sum::<f64>();
    // A unit eigenvalue contributes -1·0 = -0.0; report +0.0 instead.
    Ok(entropy + 0.0)
}

/// Entropy of the subsystem left after tracing `traced` out of `state`.
pub fn entanglement_entropy(state: &DensityMatrix, traced: &[QubitId]) -> Result<f64> {
    von_neumann_entropy(&state.partial_trace(traced)?)
}
