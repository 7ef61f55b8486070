// src/operations/mod.rs

//! Gate descriptors and the unitary matrices they stand for.
//!
//! Every unitary returned here acts on the *full* register, not just the
//! qubits a gate touches. Embedding follows the crate-wide little-endian
//! convention: for an `n`-qubit register the Kronecker factor for qubit
//! `n - 1` is leftmost and the factor for qubit 0 is rightmost. A rotation on
//! Alice (qubit 0) of the two-qubit register is therefore `I₂ ⊗ RY(θ)`.

use nalgebra::DMatrix;
use num_complex::Complex;
use num_traits::{One, Zero};
use std::fmt;
use tracing::trace;

use crate::core::state::{dimension_for, qubit_mask};
use crate::core::{EtgError, QubitId, Result};

/// Dense complex operator on a register.
pub type Unitary = DMatrix<Complex<f64>>;

/// A single gate in a circuit: its kind, the qubits it acts on and, for
/// rotations, the angle.
///
/// Gates are immutable values, built fresh for every simulation run.
#[derive(Debug, Clone, Copy, PartialEq)] // f64 angle, so no Eq
pub enum Gate {
    /// Rotation about the Y axis by `theta` radians:
    /// `RY(θ) = [[cos θ/2, -sin θ/2], [sin θ/2, cos θ/2]]`.
    RotationY {
        /// Qubit being rotated.
        target: QubitId,
        /// Rotation angle in radians. Any finite value is valid.
        theta: f64,
    },

    /// Controlled-NOT: flips `target` when `control` is `|1⟩`.
    ControlledNot {
        /// Qubit whose `|1⟩` component triggers the flip.
        control: QubitId,
        /// Qubit that is flipped.
        target: QubitId,
    },
}

impl Gate {
    /// Qubits this gate acts on, in declaration order. This is also the set
    /// a noise channel following the gate is applied to.
    pub fn involved_qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::RotationY { target, .. } => vec![*target],
            Gate::ControlledNot { control, target } => vec![*control, *target],
        }
    }

    /// Short name of the gate kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Gate::RotationY { .. } => "rotation-Y",
            Gate::ControlledNot { .. } => "controlled-not",
        }
    }

    /// Full `2^n × 2^n` operator for this gate inside an `n`-qubit register.
    pub fn unitary(&self, num_qubits: usize) -> Result<Unitary> {
        trace!(gate = %self, num_qubits, "building gate unitary");
        match *self {
            Gate::RotationY { target, theta } => embed_single_qubit(&ry_matrix(theta), target, num_qubits),
            Gate::ControlledNot { control, target } => controlled_not_unitary(control, target, num_qubits),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::RotationY { target, theta } => write!(f, "RY({:.4}) on {}", theta, target),
            Gate::ControlledNot { control, target } => write!(f, "CNOT {} -> {}", control, target),
        }
    }
}

/// The 2×2 Y-rotation matrix.
pub fn ry_matrix(theta: f64) -> Unitary {
    let (sin_a, cos_a) = (theta / 2.0).sin_cos();
    DMatrix::from_row_slice(
        2,
        2,
        &[
            Complex::new(cos_a, 0.0),
            Complex::new(-sin_a, 0.0),
            Complex::new(sin_a, 0.0),
            Complex::new(cos_a, 0.0),
        ],
    )
}

/// Lifts a 2×2 operator `u` acting on `target` to the full `n`-qubit space by
/// tensoring with the identity on every other qubit.
pub fn embed_single_qubit(u: &Unitary, target: QubitId, num_qubits: usize) -> Result<Unitary> {
    if u.shape() != (2, 2) {
        return Err(EtgError::DimensionMismatch {
            expected: 2,
            actual: u.nrows().max(u.ncols()),
        });
    }
    qubit_mask(&[target], num_qubits)?;
    dimension_for(num_qubits)?;

    let identity = Unitary::identity(2, 2);
    let mut acc = Unitary::from_element(1, 1, Complex::one());
    // Highest qubit first, so qubit 0 ends up as the least-significant factor.
    for q in (0..num_qubits).rev() {
        let factor = if q == target.0 { u } else { &identity };
        acc = acc.kronecker(factor);
    }
    Ok(acc)
}

/// Full-register CNOT as a permutation matrix: basis state `k` maps to `k`
/// with the target bit flipped whenever the control bit of `k` is set.
pub fn controlled_not_unitary(control: QubitId, target: QubitId, num_qubits: usize) -> Result<Unitary> {
    if control == target {
        return Err(EtgError::invalid_qubit(
            control,
            "control and target of a controlled-not must differ",
        ));
    }
    qubit_mask(&[control, target], num_qubits)?;
    let dim = dimension_for(num_qubits)?;
    Ok(cnot_permutation(control, target, dim))
}

/// `RY(θ)` on Alice (qubit 0) in the two-qubit register: `I₂ ⊗ RY(θ)`.
pub fn rotation_y(theta: f64) -> Unitary {
    Unitary::identity(2, 2).kronecker(&ry_matrix(theta))
}

/// CNOT with Alice (qubit 0) as control and Bob (qubit 1) as target.
///
/// In little-endian order this exchanges basis states 1 (`q1=0, q0=1`) and
/// 3 (`q1=1, q0=1`).
pub fn controlled_not() -> Unitary {
    cnot_permutation(QubitId(0), QubitId(1), 4)
}

fn cnot_permutation(control: QubitId, target: QubitId, dim: usize) -> Unitary {
    let mut m = Unitary::from_element(dim, dim, Complex::zero());
    for basis in 0..dim {
        let image = if basis & control.mask() != 0 {
            basis ^ target.mask()
        } else {
            basis
        };
        m[(image, basis)] = Complex::one();
    }
    m
}
