//! Numeric tolerances and register constants shared across the engine.

use super::error::QubitId;

/// Allowed deviation of `Tr(ρ)` from 1 after any evolution step.
pub const TRACE_TOLERANCE: f64 = 1e-9;

/// Allowed `max |ρ - ρ†|` entry after any evolution step.
pub const HERMITICITY_TOLERANCE: f64 = 1e-9;

/// Eigenvalues may undershoot 0 or overshoot 1 by this much before the
/// reduced state is rejected.
pub const EIGENVALUE_TOLERANCE: f64 = 1e-9;

/// Eigenvalues below this are treated as exactly zero (`0·log₂0 = 0`).
pub const EIGENVALUE_EPSILON: f64 = 1e-12;

/// Depolarizing probability used when none is configured explicitly.
pub const DEFAULT_NOISE_PROBABILITY: f64 = 0.05;

/// Widest register a dense density matrix is built for. At 16 qubits the
/// matrix alone takes 64 GiB.
pub const MAX_QUBITS: usize = 16;

/// Width of the Alice–Bob register.
pub const ALICE_BOB_QUBITS: usize = 2;

/// Alice's qubit (least-significant bit).
pub const ALICE: QubitId = QubitId(0);

/// Bob's qubit.
pub const BOB: QubitId = QubitId(1);
