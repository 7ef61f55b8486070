// src/simulation/mod.rs

//! Density-matrix simulation of `etg::circuits::Circuit`.
//!
//! `Simulator` runs an arbitrary circuit with optional depolarizing noise.
//! `EntropyEngine` is the fixed entry point the rest of the crate and its
//! callers use: θ in, entanglement entropy of Alice's reduced state out.

mod results;
pub(crate) mod engine;
pub mod measurement;

pub use results::SimulationResult;

use tracing::debug;

use crate::circuits::Circuit;
use crate::core::Result;
use crate::noise::NoiseConfig;
use engine::SimulationEngine;

/// Runs circuits from `|0…0⟩⟨0…0|`, applying the configured noise after
/// every gate.
#[derive(Debug, Clone, Copy, Default)] // Default is the noiseless simulator
pub struct Simulator {
    noise: NoiseConfig,
}

impl Simulator {
    /// Creates a simulator with the given noise settings. The settings are
    /// validated when a circuit is run.
    pub fn new(noise: NoiseConfig) -> Self {
        Self { noise }
    }

    /// Noise settings used for every run.
    pub fn noise_config(&self) -> &NoiseConfig {
        &self.noise
    }

    /// Runs a simulation of the provided circuit.
    ///
    /// # Arguments
    /// * `circuit` - The `Circuit` definition to simulate.
    ///
    /// # Returns
    /// * `Ok(SimulationResult)` with the final state and per-step traces.
    /// * `Err(EtgError)` for an invalid circuit or noise configuration, or
    ///   `NumericalInstability` naming the first step whose state failed
    ///   validation.
    pub fn run(&self, circuit: &Circuit) -> Result<SimulationResult> {
        circuit.validate()?;
        let mut engine = SimulationEngine::init(circuit.num_qubits(), self.noise)?;

        for (step, gate) in circuit.gates().iter().enumerate() {
            engine.apply_gate(step, gate)?;
        }

        let (final_state, step_traces) = engine.into_parts();
        Ok(SimulationResult::new(final_state, step_traces))
    }
}

/// Computes the entanglement entropy of the Alice–Bob state prepared by
/// `RY(θ)` on Alice followed by `CNOT(Alice → Bob)`.
///
/// The engine holds nothing but its validated noise settings, so it is `Copy`
/// and can be shared freely across threads; every call builds its own state.
#[derive(Debug, Clone, Copy, PartialEq, Default)] // Default is noiseless
pub struct EntropyEngine {
    noise: NoiseConfig,
}

impl EntropyEngine {
    /// Creates an engine, rejecting a noise probability outside `[0, 1]`.
    pub fn new(noise: NoiseConfig) -> Result<Self> {
        noise.validate()?;
        Ok(Self { noise })
    }

    /// Noise settings applied to every run.
    pub fn noise_config(&self) -> &NoiseConfig {
        &self.noise
    }

    /// Runs the Alice–Bob circuit for `theta` and returns the full result.
    pub fn simulate(&self, theta: f64) -> Result<SimulationResult> {
        Simulator::new(self.noise).run(&Circuit::alice_bob(theta))
    }

    /// Von Neumann entropy (bits) of Alice's reduced state for `theta`.
    ///
    /// Always in `[0, 1]`. Noiseless, this is `H(cos²(θ/2))`: 0 at `θ = 0`
    /// and 1 at `θ = π/2`.
    pub fn compute_entropy(&self, theta: f64) -> Result<f64> {
        let entropy = self.simulate(theta)?.entanglement_entropy()?;
        debug!(theta, entropy, "computed entanglement entropy");
        Ok(entropy)
    }
}
