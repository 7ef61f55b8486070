// src/sweep/mod.rs

//! Entropy curve over a range of rotation angles.
//!
//! Every angle is independent, so `sweep` evaluates them on the rayon thread
//! pool. Samples come back in the order the angles were given.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::info;

use crate::core::Result;
use crate::simulation::EntropyEngine;

/// Number of angles in a default sweep over `[0, π]`.
pub const DEFAULT_SWEEP_STEPS: usize = 50;

/// Entropy of Alice's reduced state at one rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropySample {
    /// Rotation angle in radians.
    pub theta: f64,
    /// Entanglement entropy in bits.
    pub entropy: f64,
}

/// Ordered entropy samples produced by a sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntropyCurve {
    samples: Vec<EntropySample>,
}

impl EntropyCurve {
    /// Samples in sweep order.
    pub fn samples(&self) -> &[EntropySample] {
        &self.samples
    }

    /// The sample with the largest entropy; the earliest one on ties.
    /// `None` for an empty curve.
    pub fn peak(&self) -> Option<&EntropySample> {
        self.samples.iter().fold(None, |best, sample| match best {
            Some(b) if b.entropy >= sample.entropy => Some(b),
            _ => Some(sample),
        })
    }

    /// Angles in sweep order.
    pub fn thetas(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.theta).collect()
    }

    /// Entropies in sweep order.
    pub fn entropies(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.entropy).collect()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns `true` if the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// `steps` evenly spaced values from `start` to `end`, both inclusive.
///
/// `steps == 0` gives an empty vector and `steps == 1` gives `[start]`.
pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (steps - 1) as f64;
            (0..steps)
                .map(|i| if i == steps - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Computes the entanglement entropy at every angle in `thetas`.
///
/// The first failing angle aborts the sweep with its error.
pub fn sweep(engine: &EntropyEngine, thetas: &[f64]) -> Result<EntropyCurve> {
    info!(points = thetas.len(), noise = ?engine.noise_config(), "starting entropy sweep");
    let samples = thetas
        .par_iter()
        .map(|&theta| {
            engine
                .compute_entropy(theta)
                .map(|entropy| EntropySample { theta, entropy })
        })
        .collect::<Result<Vec<_>>>()?;
    let curve = EntropyCurve { samples };
    if let Some(peak) = curve.peak() {
        info!(peak_theta = peak.theta, peak_entropy = peak.entropy, "entropy sweep complete");
    }
    Ok(curve)
}

/// Sweep over `[0, π]` with `DEFAULT_SWEEP_STEPS` angles.
pub fn default_sweep(engine: &EntropyEngine) -> Result<EntropyCurve> {
    sweep(engine, &linspace(0.0, PI, DEFAULT_SWEEP_STEPS))
}
