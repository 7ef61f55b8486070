// src/core/mod.rs

//! Core data structures and types

pub mod constants;
pub mod error;
pub mod state;

// Re-export public types for convenient access via `etg::core::TypeName`
pub use constants::{ALICE, ALICE_BOB_QUBITS, BOB, MAX_QUBITS};
pub use error::{EtgError, QubitId, Result};
pub use state::DensityMatrix;
