//! Error handling logic

use std::fmt;
use thiserror::Error;

/// Index of a logical qubit within a register.
///
/// Qubit 0 is the least-significant bit of a computational basis index, so
/// basis state `k` of an `n`-qubit register has qubit `q` set iff
/// `(k >> q) & 1 == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub usize);

impl QubitId {
    /// Bit mask selecting this qubit in a basis index.
    pub fn mask(&self) -> usize {
        1usize << self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q({})", self.0)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EtgError>;

/// Failures raised by the simulation and entropy engine.
///
/// All of them are synchronous and deterministic: the engine performs pure
/// computation, so nothing here is transient or worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EtgError {
    /// A configuration value is outside its valid domain
    /// (e.g. a depolarizing probability outside `[0, 1]`).
    #[error("Invalid Configuration: {message}")]
    InvalidConfiguration {
        /// InvalidConfiguration failure message
        message: String,
    },

    /// The working state drifted away from a valid density matrix
    /// (trace, Hermiticity or eigenvalue range beyond tolerance).
    #[error("Numerical Instability: {message}")]
    NumericalInstability {
        /// NumericalInstability failure message
        message: String,
    },

    /// A qubit index is out of range, repeated, or used as both control and target.
    #[error("Invalid Qubit ({qubit}): {message}")]
    InvalidQubit {
        /// Offending qubit
        qubit: QubitId,
        /// InvalidQubit failure message
        message: String,
    },

    /// A matrix or vector does not have the dimension the operation requires.
    #[error("Dimension Mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Required dimension
        expected: usize,
        /// Dimension that was supplied
        actual: usize,
    },

    /// An API was called with arguments it cannot act on.
    #[error("Invalid Operation: {message}")]
    InvalidOperation {
        /// InvalidOperation failure message
        message: String,
    },
}

impl EtgError {
    pub(crate) fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration { message: message.into() }
    }

    pub(crate) fn numerical(message: impl Into<String>) -> Self {
        Self::NumericalInstability { message: message.into() }
    }

    pub(crate) fn invalid_qubit(qubit: QubitId, message: impl Into<String>) -> Self {
        Self::InvalidQubit { qubit, message: message.into() }
    }

    pub(crate) fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation { message: message.into() }
    }
}
