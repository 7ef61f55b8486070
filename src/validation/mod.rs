// src/validation/mod.rs

//! Checks that a `DensityMatrix` is still a valid quantum state.
//!
//! These are run after every evolution step. A failure signals a construction
//! bug in a gate or channel, so the state is reported, never renormalized.

use tracing::warn;

use crate::core::constants::{HERMITICITY_TOLERANCE, TRACE_TOLERANCE};
use crate::core::{DensityMatrix, EtgError, Result};

/// Checks `|Tr(ρ) - 1| <= tolerance`.
///
/// # Arguments
/// * `state` - The `DensityMatrix` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to `TRACE_TOLERANCE`.
///
/// # Returns
/// * `Ok(())` if the trace is within tolerance.
/// * `Err(EtgError::NumericalInstability)` otherwise, including for a NaN trace.
pub fn check_trace(state: &DensityMatrix, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(TRACE_TOLERANCE);
    let trace = state.trace();
    let deviation = (trace - 1.0).abs();
    // Written so that a NaN deviation fails the check.
    if deviation <= effective_tolerance {
        Ok(())
    } else {
        warn!(trace, effective_tolerance, "trace drifted away from 1");
        Err(EtgError::numerical(format!(
            "Trace check failed. Tr(rho) = {} (Deviation > {})",
            trace, effective_tolerance
        )))
    }
}

/// Checks `max |ρ - ρ†| <= tolerance`.
///
/// # Arguments
/// * `state` - The `DensityMatrix` to check.
/// * `tolerance` - Allowed entry-wise deviation. Defaults to `HERMITICITY_TOLERANCE`.
pub fn check_hermiticity(state: &DensityMatrix, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(HERMITICITY_TOLERANCE);
    let deviation = state.hermiticity_deviation();
    if deviation <= effective_tolerance {
        Ok(())
    } else {
        warn!(deviation, effective_tolerance, "state is no longer Hermitian");
        Err(EtgError::numerical(format!(
            "Hermiticity check failed. max|rho - rho^dagger| = {:e} (> {})",
            deviation, effective_tolerance
        )))
    }
}

/// Checks that no entry of the state is NaN or infinite.
pub fn check_finite(state: &DensityMatrix) -> Result<()> {
    if state.is_finite() {
        Ok(())
    } else {
        warn!("state contains non-finite entries");
        Err(EtgError::numerical("State contains NaN or infinite entries"))
    }
}

/// Runs every structural check on `state`: finiteness, trace, Hermiticity.
/// Uses default tolerances unless specified.
///
/// # Arguments
/// * `state` - The `DensityMatrix` to validate.
/// * `trace_tolerance` - Optional allowed deviation of the trace from 1.0.
/// * `hermiticity_tolerance` - Optional allowed deviation from Hermiticity.
///
/// # Returns
/// * `Ok(())` if all checks pass.
/// * `Err(EtgError::NumericalInstability)` for the first failing check.
pub fn validate_state(
    state: &DensityMatrix,
    trace_tolerance: Option<f64>,
    hermiticity_tolerance: Option<f64>,
) -> Result<()> {
    check_finite(state)?;
    check_trace(state, trace_tolerance)?;
    check_hermiticity(state, hermiticity_tolerance)?;
    Ok(())
}
