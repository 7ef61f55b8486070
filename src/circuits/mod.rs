// src/circuits/mod.rs

//! Ordered gate sequences on a fixed-size register.
//!
//! A `Circuit` is only a description; `crate::simulation::Simulator` evolves a
//! density matrix through it. The Alice–Bob preparation used throughout the
//! crate is available as `Circuit::alice_bob`.

use crate::core::state::{dimension_for, qubit_mask};
use crate::core::{ALICE, ALICE_BOB_QUBITS, BOB, EtgError, Result};
use crate::operations::Gate;
use std::fmt;

/// An ordered sequence of gates applied to a register of `num_qubits` qubits,
/// all starting in `|0⟩`.
#[derive(Clone, PartialEq)] // PartialEq useful for testing circuits
pub struct Circuit {
    num_qubits: usize,
    /// Application order is the order of this list.
    gates: Vec<Gate>,
}

impl Circuit {
    /// Creates a new, empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// The Alice–Bob preparation: `RY(θ)` on Alice (qubit 0) followed by a
    /// CNOT from Alice to Bob (qubit 1).
    ///
    /// From `|00⟩` this yields `cos(θ/2)|00⟩ + sin(θ/2)|11⟩`.
    pub fn alice_bob(theta: f64) -> Self {
        CircuitBuilder::new(ALICE_BOB_QUBITS)
            .add_gate(Gate::RotationY { target: ALICE, theta })
            .add_gate(Gate::ControlledNot {
                control: ALICE,
                target: BOB,
            })
            .build()
    }

    /// Appends a gate to the end of the sequence.
    ///
    /// Qubit indices are checked by `validate`, not here.
    pub fn add_gate(&mut self, gate: Gate) {
        self.gates.push(gate);
    }

    /// Appends every gate yielded by `gates`, in order.
    pub fn add_gates<I>(&mut self, gates: I)
    where
        I: IntoIterator<Item = Gate>,
    {
        self.gates.extend(gates);
    }

    /// Register size.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The gates in application order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of gates in the circuit.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns `true` if the circuit contains no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Checks that the register is non-empty and representable, and that
    /// every gate addresses distinct qubits inside it.
    pub fn validate(&self) -> Result<()> {
        if self.num_qubits == 0 {
            return Err(EtgError::invalid_configuration("a circuit needs at least one qubit"));
        }
        dimension_for(self.num_qubits)?;
        for gate in &self.gates {
            qubit_mask(&gate.involved_qubits(), self.num_qubits)?;
        }
        Ok(())
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// Method-chaining helper for constructing a `Circuit`.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Starts an empty circuit over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
        }
    }

    /// Adds a single gate. Returns `self` for chaining.
    pub fn add_gate(mut self, gate: Gate) -> Self {
        self.circuit.add_gate(gate);
        self
    }

    /// Adds every gate from an iterator. Returns `self` for chaining.
    pub fn add_gates<I>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = Gate>,
    {
        self.circuit.add_gates(gates);
        self
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "etg::Circuit[{} gates on {} qubits]", self.gates.len(), self.num_qubits)?;
        if self.gates.is_empty() || self.num_qubits == 0 {
            return Ok(());
        }

        const GATE_WIDTH: usize = 7;
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total = GATE_WIDTH - slen;
                let pre = total / 2;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre),
                    symbol,
                    H_WIRE.to_string().repeat(total - pre)
                )
            }
        }

        let rows = self.num_qubits;
        let cols = self.gates.len();
        let mut grid = vec![vec![WIRE.to_string(); cols]; rows];
        // connect[r][t]: vertical line between row r and r + 1 at time t.
        let mut connect = vec![vec![' '; cols]; rows];

        for (t, gate) in self.gates.iter().enumerate() {
            match *gate {
                Gate::RotationY { target, .. } => {
                    if let Some(row) = grid.get_mut(target.0) {
                        row[t] = format_gate("RY");
                    }
                }
                Gate::ControlledNot { control, target } => {
                    if control.0 >= rows || target.0 >= rows {
                        continue;
                    }
                    grid[control.0][t] = format_gate("@");
                    grid[target.0][t] = format_gate("X");
                    let (low, high) = (control.0.min(target.0), control.0.max(target.0));
                    for row in connect.iter_mut().take(high).skip(low) {
                        row[t] = V_WIRE;
                    }
                }
            }
        }

        let label_width = format!("Q({})", rows - 1).len() + 2;
        for r in 0..rows {
            write!(f, "{:<width$}", format!("Q({}): ", r), width = label_width)?;
            writeln!(f, "{}", grid[r].join(""))?;
            if r + 1 < rows {
                write!(f, "{}", " ".repeat(label_width))?;
                for c in &connect[r] {
                    let pre = (GATE_WIDTH - 1) / 2;
                    write!(f, "{}{}{}", " ".repeat(pre), c, " ".repeat(GATE_WIDTH - 1 - pre))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QubitId;

    #[test]
    fn test_alice_bob_circuit_layout() {
        let circuit = Circuit::alice_bob(0.4);
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(
            circuit.gates(),
            &[
                Gate::RotationY { target: QubitId(0), theta: 0.4 },
                Gate::ControlledNot { control: QubitId(0), target: QubitId(1) },
            ]
        );
        assert!(circuit.validate().is_ok());
    }

    #[test]
    fn test_builder_preserves_order() {
        let gates = [
            Gate::ControlledNot { control: QubitId(1), target: QubitId(0) },
            Gate::RotationY { target: QubitId(1), theta: 1.0 },
        ];
        let circuit = CircuitBuilder::new(2)
            .add_gate(Gate::RotationY { target: QubitId(0), theta: 0.5 })
            .add_gates(gates)
            .build();
        assert_eq!(circuit.len(), 3);
        assert_eq!(&circuit.gates()[1..], &gates);
        assert!(!circuit.is_empty());
        assert!(Circuit::new(2).is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_registers_and_gates() {
        assert!(matches!(
            Circuit::new(0).validate(),
            Err(EtgError::InvalidConfiguration { .. })
        ));

        let mut circuit = Circuit::new(2);
        circuit.add_gate(Gate::RotationY { target: QubitId(2), theta: 0.0 });
        assert!(matches!(
            circuit.validate(),
            Err(EtgError::InvalidQubit { qubit: QubitId(2), .. })
        ));

        let mut circuit = Circuit::new(2);
        circuit.add_gate(Gate::ControlledNot { control: QubitId(0), target: QubitId(0) });
        assert!(matches!(circuit.validate(), Err(EtgError::InvalidQubit { .. })));
    }

    #[test]
    fn test_display_draws_each_qubit_wire() {
        let text = Circuit::alice_bob(1.0).to_string();
        assert!(text.starts_with("etg::Circuit[2 gates on 2 qubits]"));
        assert!(text.contains("Q(0): "));
        assert!(text.contains("Q(1): "));
        assert!(text.contains("RY"));
        assert!(text.contains('@'));
        assert!(text.contains('│'));
    }
}
