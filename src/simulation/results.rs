// src/simulation/results.rs
use crate::core::{ALICE_BOB_QUBITS, BOB, DensityMatrix, EtgError, QubitId, Result};
use crate::entropy::von_neumann_entropy;
use crate::simulation::measurement;
use std::collections::BTreeMap;
use std::fmt;

/// Holds the outcome of a circuit simulation: the final joint density matrix
/// and the trace recorded after every evolution step.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    final_state: DensityMatrix,
    step_traces: Vec<f64>,
}

impl SimulationResult {
    /// (Internal visibility)
    pub(crate) fn new(final_state: DensityMatrix, step_traces: Vec<f64>) -> Self {
        Self {
            final_state,
            step_traces,
        }
    }

    /// The joint state after the last step.
    pub fn final_state(&self) -> &DensityMatrix {
        &self.final_state
    }

    /// `Tr(ρ)` after each step, in circuit order. Empty for an empty circuit.
    pub fn step_traces(&self) -> &[f64] {
        &self.step_traces
    }

    /// Reduced state after tracing `traced` out of the final state.
    pub fn reduced_state(&self, traced: &[QubitId]) -> Result<DensityMatrix> {
        self.final_state.partial_trace(traced)
    }

    /// Alice's reduced state `ρ_A = Tr_B(ρ_AB)`.
    ///
    /// Only defined for the two-qubit Alice–Bob register.
    pub fn alice_state(&self) -> Result<DensityMatrix> {
        if self.final_state.num_qubits() != ALICE_BOB_QUBITS {
            return Err(EtgError::DimensionMismatch {
                expected: 1 << ALICE_BOB_QUBITS,
                actual: self.final_state.dim(),
            });
        }
        self.reduced_state(&[BOB])
    }

    /// Von Neumann entropy of Alice's reduced state, in bits.
    pub fn entanglement_entropy(&self) -> Result<f64> {
        von_neumann_entropy(&self.alice_state()?)
    }

    /// Draws `shots` computational-basis outcomes of the full register from
    /// the final state using a `StdRng` seeded with `seed`.
    pub fn sample_counts(&self, shots: usize, seed: u64) -> Result<BTreeMap<usize, usize>> {
        measurement::sample_counts(&self.final_state, shots, seed)
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results:")?;
        writeln!(f, "  Steps: {}", self.step_traces.len())?;
        for (step, trace) in self.step_traces.iter().enumerate() {
            writeln!(f, "    step {}: Tr(rho) = {:.12}", step, trace)?;
        }
        writeln!(f, "  Purity: {:.6}", self.final_state.purity())?;
        writeln!(f, "  Final state: {}", self.final_state)
    }
}
