// src/noise/mod.rs

//! Depolarizing noise applied after each gate.
//!
//! For a gate acting on the qubit set `S` (dimension `d_S = 2^|S|`) the
//! channel is
//!
//! ```text
//! ρ' = (1 - p)·ρ + p·(Tr_S(ρ) ⊗ I_S / d_S)
//! ```
//!
//! With probability `p` the state of `S` is replaced by the maximally mixed
//! state while the marginal of every other qubit is left untouched. The map is
//! trace-preserving and Hermiticity-preserving for any `p ∈ [0, 1]`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants::DEFAULT_NOISE_PROBABILITY;
use crate::core::{DensityMatrix, EtgError, QubitId, Result};

/// Noise settings for a simulation run.
///
/// The same depolarizing probability applies to every 1-qubit and 2-qubit gate
/// in the run; there is no per-gate override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Whether the depolarizing channel runs at all. When `false` the channel
    /// is skipped entirely rather than applied with `p = 0`.
    pub enabled: bool,
    /// Depolarizing probability in `[0, 1]`.
    pub probability: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            probability: DEFAULT_NOISE_PROBABILITY,
        }
    }
}

impl NoiseConfig {
    /// Builds a validated configuration.
    pub fn new(enabled: bool, probability: f64) -> Result<Self> {
        let config = Self { enabled, probability };
        config.validate()?;
        Ok(config)
    }

    /// Noiseless configuration.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Depolarizing noise with probability `probability` after every gate.
    pub fn depolarizing(probability: f64) -> Result<Self> {
        Self::new(true, probability)
    }

    /// Rejects probabilities outside `[0, 1]`, including NaN. Checked even when
    /// noise is disabled so a bad value cannot lie dormant in a config.
    pub fn validate(&self) -> Result<()> {
        check_probability(self.probability)
    }

    /// Probability to apply after a gate, or `None` when noise is disabled.
    pub fn active_probability(&self) -> Option<f64> {
        self.enabled.then_some(self.probability)
    }
}

/// Applies the depolarizing channel with probability `probability` to
/// `qubits` of `state`, returning the new state.
///
/// An empty `qubits` slice leaves the state unchanged.
pub fn depolarize(state: &DensityMatrix, probability: f64, qubits: &[QubitId]) -> Result<DensityMatrix> {
    check_probability(probability)?;
    let total = state.num_qubits();

    // Tr_S(ρ) ⊗ I_S / d_S, with I_S/d_S placed back on exactly the qubits of S.
    let marginal = state.partial_trace(qubits)?;
    let replaced = marginal.tensor_maximally_mixed(qubits, total)?;

    debug!(probability, ?qubits, "applying depolarizing channel");
    state.mix(1.0 - probability, &replaced)
}

fn check_probability(probability: f64) -> Result<()> {
    if (0.0..=1.0).contains(&probability) {
        Ok(())
    } else {
        Err(EtgError::invalid_configuration(format!(
            "noise probability {} is outside [0, 1]",
            probability
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use num_complex::Complex;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TOL: f64 = 1e-12;

    fn c(re: f64) -> Complex<f64> {
        Complex::new(re, 0.0)
    }

    fn bell() -> Result<DensityMatrix> {
        DensityMatrix::from_state_vector(&[c(FRAC_1_SQRT_2), c(0.0), c(0.0), c(FRAC_1_SQRT_2)])
    }

    #[test]
    fn test_config_validation() {
        assert!(NoiseConfig::new(true, 0.0).is_ok());
        assert!(NoiseConfig::new(true, 1.0).is_ok());
        assert!(matches!(
            NoiseConfig::new(true, 1.5),
            Err(EtgError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            NoiseConfig::new(false, -0.1),
            Err(EtgError::InvalidConfiguration { .. })
        ));
        assert!(NoiseConfig::depolarizing(f64::NAN).is_err());
    }

    #[test]
    fn test_active_probability() -> Result<()> {
        assert_eq!(NoiseConfig::disabled().active_probability(), None);
        assert_eq!(NoiseConfig::depolarizing(0.2)?.active_probability(), Some(0.2));
        Ok(())
    }

    #[test]
    fn test_zero_probability_is_identity() -> Result<()> {
        let rho = bell()?;
        let out = depolarize(&rho, 0.0, &[QubitId(0), QubitId(1)])?;
        assert_eq!(out, rho);
        Ok(())
    }

    #[test]
    fn test_full_probability_on_all_qubits_is_maximally_mixed() -> Result<()> {
        let out = depolarize(&bell()?, 1.0, &[QubitId(0), QubitId(1)])?;
        let mixed = DensityMatrix::maximally_mixed(2)?;
        for i in 0..4 {
            for j in 0..4 {
                assert_abs_diff_eq!((out.get(i, j) - mixed.get(i, j)).norm(), 0.0, epsilon = TOL);
            }
        }
        Ok(())
    }

    #[test]
    fn test_untouched_marginal_is_preserved() -> Result<()> {
        // |q1=1, q0=0⟩ : depolarizing Alice must leave Bob in |1⟩.
        let rho = DensityMatrix::from_state_vector(&[c(0.0), c(0.0), c(1.0), c(0.0)])?;
        let out = depolarize(&rho, 0.7, &[QubitId(0)])?;
        let bob = out.partial_trace(&[QubitId(0)])?;
        assert_abs_diff_eq!(bob.get(1, 1).re, 1.0, epsilon = TOL);

        let alice = out.partial_trace(&[QubitId(1)])?;
        assert_abs_diff_eq!(alice.get(0, 0).re, 0.3 + 0.35, epsilon = TOL);
        assert_abs_diff_eq!(alice.get(1, 1).re, 0.35, epsilon = TOL);
        Ok(())
    }

    #[test]
    fn test_channel_preserves_trace_and_hermiticity() -> Result<()> {
        let rho = bell()?;
        for p in [0.05, 0.3, 0.9] {
            for qubits in [vec![QubitId(0)], vec![QubitId(1)], vec![QubitId(0), QubitId(1)]] {
                let out = depolarize(&rho, p, &qubits)?;
                assert_abs_diff_eq!(out.trace(), 1.0, epsilon = TOL);
                assert!(out.hermiticity_deviation() < TOL);
            }
        }
        Ok(())
    }

    #[test]
    fn test_rejects_bad_arguments() -> Result<()> {
        let rho = bell()?;
        assert!(matches!(
            depolarize(&rho, 1.01, &[QubitId(0)]),
            Err(EtgError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            depolarize(&rho, 0.1, &[QubitId(5)]),
            Err(EtgError::InvalidQubit { .. })
        ));
        Ok(())
    }
}
