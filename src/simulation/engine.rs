// src/simulation/engine.rs
use tracing::debug;

use crate::core::{DensityMatrix, EtgError, Result};
use crate::noise::{NoiseConfig, depolarize};
use crate::operations::Gate;
use crate::validation::validate_state;

/// Owns the working density matrix of one simulation run and evolves it one
/// gate at a time. (Internal visibility)
pub(crate) struct SimulationEngine {
    /// Joint state of the whole register, starting at `|0…0⟩⟨0…0|`.
    state: DensityMatrix,
    noise: NoiseConfig,
    /// `Tr(ρ)` recorded after every completed step.
    step_traces: Vec<f64>,
}

impl SimulationEngine {
    /// Initializes the engine with every qubit in `|0⟩`.
    pub(crate) fn init(num_qubits: usize, noise: NoiseConfig) -> Result<Self> {
        if num_qubits == 0 {
            return Err(EtgError::invalid_operation(
                "Cannot initialize simulation engine with zero qubits",
            ));
        }
        noise.validate()?;
        Ok(Self {
            state: DensityMatrix::zero_state(num_qubits)?,
            noise,
            step_traces: Vec::new(),
        })
    }

    // Add a crate-visible method to set the state directly for testing
    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: DensityMatrix) -> Result<()> {
        if state.num_qubits() != self.state.num_qubits() {
            return Err(EtgError::DimensionMismatch {
                expected: self.state.dim(),
                actual: state.dim(),
            });
        }
        self.state = state;
        Ok(())
    }

    /// Runs one evolution step: `ρ ← U ρ U†`, then the depolarizing channel
    /// on the gate's qubits when noise is enabled, then validation.
    ///
    /// `step` is the zero-based position of `gate` in its circuit and is only
    /// used for logging and error messages.
    pub(crate) fn apply_gate(&mut self, step: usize, gate: &Gate) -> Result<()> {
        let unitary = gate.unitary(self.state.num_qubits())?;
        let mut next = self.state.conjugate(&unitary)?;

        if let Some(probability) = self.noise.active_probability() {
            next = depolarize(&next, probability, &gate.involved_qubits())?;
        }

        validate_state(&next, None, None).map_err(|err| name_step(err, step, gate))?;

        let trace = next.trace();
        debug!(step, gate = %gate, trace, purity = next.purity(), "applied evolution step");
        self.step_traces.push(trace);
        self.state = next;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &DensityMatrix {
        &self.state
    }

    /// Consumes the engine, returning the final state and the per-step traces.
    pub(crate) fn into_parts(self) -> (DensityMatrix, Vec<f64>) {
        (self.state, self.step_traces)
    }
}

/// Prefixes a numerical failure with the step that produced it.
fn name_step(err: EtgError, step: usize, gate: &Gate) -> EtgError {
    match err {
        EtgError::NumericalInstability { message } => {
            EtgError::numerical(format!("after step {} ({}): {}", step, gate, message))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QubitId;
    use approx::assert_abs_diff_eq;
    use nalgebra::DMatrix;
    use num_complex::Complex;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_init_rejects_empty_register() {
        assert!(matches!(
            SimulationEngine::init(0, NoiseConfig::disabled()),
            Err(EtgError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn test_init_rejects_bad_noise() {
        let noise = NoiseConfig {
            enabled: true,
            probability: 2.0,
        };
        assert!(matches!(
            SimulationEngine::init(2, noise),
            Err(EtgError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_steps_record_traces() -> Result<()> {
        let mut engine = SimulationEngine::init(2, NoiseConfig::depolarizing(0.1)?)?;
        engine.apply_gate(0, &Gate::RotationY { target: QubitId(0), theta: 0.8 })?;
        engine.apply_gate(1, &Gate::ControlledNot { control: QubitId(0), target: QubitId(1) })?;
        let (state, traces) = engine.into_parts();
        assert_eq!(traces.len(), 2);
        for trace in traces {
            assert_abs_diff_eq!(trace, 1.0, epsilon = TOL);
        }
        assert!(state.purity() < 1.0);
        Ok(())
    }

    #[test]
    fn test_invalid_working_state_names_the_step() -> Result<()> {
        let mut engine = SimulationEngine::init(1, NoiseConfig::disabled())?;
        // Trace 2: an invalid state must be reported, not renormalized.
        let doubled = DensityMatrix::from_matrix(DMatrix::from_diagonal_element(2, 2, Complex::new(1.0, 0.0)))?;
        engine.set_state(doubled)?;

        let err = engine
            .apply_gate(3, &Gate::RotationY { target: QubitId(0), theta: 0.1 })
            .unwrap_err();
        match err {
            EtgError::NumericalInstability { message } => assert!(message.contains("after step 3")),
            other => panic!("unexpected error: {other}"),
        }
        assert_abs_diff_eq!(engine.state().trace(), 2.0, epsilon = TOL);
        Ok(())
    }

    #[test]
    fn test_non_finite_angle_is_reported() -> Result<()> {
        let mut engine = SimulationEngine::init(2, NoiseConfig::disabled())?;
        let result = engine.apply_gate(0, &Gate::RotationY { target: QubitId(0), theta: f64::NAN });
        assert!(matches!(result, Err(EtgError::NumericalInstability { .. })));
        Ok(())
    }
}
