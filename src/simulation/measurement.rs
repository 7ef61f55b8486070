// src/simulation/measurement.rs

//! Computational-basis shot sampling from a density matrix.
//!
//! Outcome `k` is drawn with probability `ρ[k, k]`. Sampling is driven by a
//! seeded `StdRng`, so the same state, shot count and seed always produce the
//! same counts.

use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand::rngs::StdRng;
use std::collections::BTreeMap;

use crate::core::constants::EIGENVALUE_TOLERANCE;
use crate::core::{DensityMatrix, EtgError, Result};
use crate::validation::check_trace;

/// Outcome probabilities `ρ[k, k]` for every basis state `k`.
///
/// Small negative rounding artifacts are clamped to 0; anything more negative
/// than the eigenvalue tolerance is an error.
pub fn basis_probabilities(state: &DensityMatrix) -> Result<Vec<f64>> {
    check_trace(state, None)?;
    (0..state.dim())
        .map(|k| {
            let p = state.get(k, k).re;
            if p.is_nan() || p < -EIGENVALUE_TOLERANCE {
                Err(EtgError::numerical(format!(
                    "Diagonal entry {} of the density matrix is {} and cannot be a probability",
                    k, p
                )))
            } else {
                Ok(p.max(0.0))
            }
        })
        .collect()
}

/// Draws `shots` basis outcomes from `state`.
///
/// # Arguments
/// * `state` - The state to sample.
/// * `shots` - Number of draws. Zero returns an empty map.
/// * `seed` - Seed for the `StdRng` driving the draws.
///
/// # Returns
/// * Map from basis index to the number of times it was drawn. Outcomes never
///   drawn are absent.
pub fn sample_counts(state: &DensityMatrix, shots: usize, seed: u64) -> Result<BTreeMap<usize, usize>> {
    let probabilities = basis_probabilities(state)?;
    let mut counts = BTreeMap::new();
    if shots == 0 {
        return Ok(counts);
    }

    let total: f64 = probabilities.iter().sum();
    // Last outcome with non-zero weight absorbs rounding at the top of [0, total).
    let fallback = probabilities
        .iter()
        .rposition(|&p| p > 0.0)
        .ok_or_else(|| EtgError::numerical("State has no outcome with non-zero probability"))?;

    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..shots {
        let u: f64 = StandardUniform.sample(&mut rng);
        let target = u * total;
        let mut cumulative = 0.0;
        let mut outcome = fallback;
        for (k, &p) in probabilities.iter().enumerate() {
            cumulative += p;
            if p > 0.0 && target < cumulative {
                outcome = k;
                break;
            }
        }
        *counts.entry(outcome).or_insert(0) += 1;
    }
    Ok(counts)
}
