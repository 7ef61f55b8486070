// src/core/state.rs

use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use num_traits::One;
use std::fmt;

use super::constants::MAX_QUBITS;
use super::error::{EtgError, QubitId, Result};

/// Mixed state of an `n`-qubit register, stored as a dense `2^n × 2^n`
/// complex matrix.
///
/// Basis ordering is little-endian: qubit 0 is the least-significant bit of
/// the row/column index. Every operation in the crate (gate embedding,
/// partial trace, noise) follows the same convention.
///
/// A valid density matrix is Hermitian, positive semidefinite and has unit
/// trace. Constructors do not enforce this; `crate::validation` checks it.
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct DensityMatrix {
    num_qubits: usize,
    matrix: DMatrix<Complex<f64>>,
}

impl DensityMatrix {
    /// The pure state `|0…0⟩⟨0…0|`.
    pub fn zero_state(num_qubits: usize) -> Result<Self> {
        let dim = dimension_for(num_qubits)?;
        let mut matrix = DMatrix::zeros(dim, dim);
        matrix[(0, 0)] = Complex::one();
        Ok(Self { num_qubits, matrix })
    }

    /// The maximally mixed state `I / 2^n`.
    pub fn maximally_mixed(num_qubits: usize) -> Result<Self> {
        let dim = dimension_for(num_qubits)?;
        let value = Complex::new(1.0 / dim as f64, 0.0);
        Ok(Self {
            num_qubits,
            matrix: DMatrix::from_diagonal_element(dim, dim, value),
        })
    }

    /// Builds `|ψ⟩⟨ψ|` from a state vector whose length is a power of two.
    pub fn from_state_vector(amplitudes: &[Complex<f64>]) -> Result<Self> {
        let len = amplitudes.len();
        if !len.is_power_of_two() {
            return Err(EtgError::DimensionMismatch {
                expected: len.next_power_of_two(),
                actual: len,
            });
        }
        let psi = DVector::from_column_slice(amplitudes);
        let matrix = &psi * psi.adjoint();
        Ok(Self {
            num_qubits: len.trailing_zeros() as usize,
            matrix,
        })
    }

    /// Wraps an existing square matrix with a power-of-two dimension.
    pub fn from_matrix(matrix: DMatrix<Complex<f64>>) -> Result<Self> {
        let (rows, cols) = matrix.shape();
        if rows != cols {
            return Err(EtgError::DimensionMismatch { expected: rows, actual: cols });
        }
        if !rows.is_power_of_two() {
            return Err(EtgError::DimensionMismatch {
                expected: rows.next_power_of_two(),
                actual: rows,
            });
        }
        Ok(Self {
            num_qubits: rows.trailing_zeros() as usize,
            matrix,
        })
    }

    /// Number of qubits `n` described by this state.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Matrix dimension `2^n`.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Entry `ρ[row, col]`. Panics if either index is out of range.
    pub fn get(&self, row: usize, col: usize) -> Complex<f64> {
        self.matrix[(row, col)]
    }

    /// Read-only access to the underlying matrix.
    pub fn matrix(&self) -> &DMatrix<Complex<f64>> {
        &self.matrix
    }

    /// Real part of `Tr(ρ)`. The imaginary part is covered by the
    /// Hermiticity check.
    pub fn trace(&self) -> f64 {
        self.matrix.trace().re
    }

    /// `Tr(ρ²)`: 1 for pure states, `1/d` for the maximally mixed state.
    pub fn purity(&self) -> f64 {
        (&self.matrix * &self.matrix).trace().re
    }

    /// Largest entry-wise deviation `max |ρ - ρ†|`.
    pub fn hermiticity_deviation(&self) -> f64 {
        (&self.matrix - self.matrix.adjoint())
            .iter()
            .map(|z| z.norm())
            .fold(0.0_f64, f64::max)
    }

    /// `true` when no entry is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.matrix.iter().all(|z| z.re.is_finite() && z.im.is_finite())
    }

    /// Unitary conjugation `U ρ U†`. `unitary` must act on the full register.
    pub fn conjugate(&self, unitary: &DMatrix<Complex<f64>>) -> Result<Self> {
        if unitary.shape() != self.matrix.shape() {
            return Err(EtgError::DimensionMismatch {
                expected: self.dim(),
                actual: unitary.nrows().max(unitary.ncols()),
            });
        }
        Ok(Self {
            num_qubits: self.num_qubits,
            matrix: unitary * &self.matrix * unitary.adjoint(),
        })
    }

    /// Affine combination `weight·self + (1 - weight)·other` of two states on
    /// the same register.
    pub(crate) fn mix(&self, weight: f64, other: &DensityMatrix) -> Result<Self> {
        if other.num_qubits != self.num_qubits {
            return Err(EtgError::DimensionMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        let w = Complex::new(weight, 0.0);
        let w_other = Complex::new(1.0 - weight, 0.0);
        Ok(Self {
            num_qubits: self.num_qubits,
            matrix: &self.matrix * w + &other.matrix * w_other,
        })
    }

    /// Traces out `traced`, returning the reduced state of the remaining
    /// qubits.
    ///
    /// Remaining qubits keep their relative order and are re-indexed from 0,
    /// so for two qubits tracing out qubit 1 yields
    /// `ρ_A[i, j] = Σ_k ρ[i + 2k, j + 2k]`. Tracing out every qubit yields the
    /// 1×1 matrix `[Tr ρ]`.
    pub fn partial_trace(&self, traced: &[QubitId]) -> Result<Self> {
        let mask = qubit_mask(traced, self.num_qubits)?;
        let reduced_qubits = self.num_qubits - traced.len();
        let reduced_dim = 1usize << reduced_qubits;
        let dim = self.dim();

        let mut reduced = DMatrix::zeros(reduced_dim, reduced_dim);
        for i in 0..dim {
            for j in 0..dim {
                // Only entries diagonal in the traced subsystem contribute.
                if i & mask != j & mask {
                    continue;
                }
                let ri = compress_index(i, mask, self.num_qubits);
                let rj = compress_index(j, mask, self.num_qubits);
                reduced[(ri, rj)] += self.matrix[(i, j)];
            }
        }

        Ok(Self {
            num_qubits: reduced_qubits,
            matrix: reduced,
        })
    }

    /// Inverse placement of `partial_trace`: treats `self` as the state of
    /// every qubit *not* in `mixed`, and tensors it with `I_S / d_S` on the
    /// qubits of `mixed` inside a `total_qubits` register.
    pub(crate) fn tensor_maximally_mixed(&self, mixed: &[QubitId], total_qubits: usize) -> Result<Self> {
        let mask = qubit_mask(mixed, total_qubits)?;
        if self.num_qubits + mixed.len() != total_qubits {
            return Err(EtgError::DimensionMismatch {
                expected: 1usize << (total_qubits - mixed.len()),
                actual: self.dim(),
            });
        }
        let dim = dimension_for(total_qubits)?;
        let scale = Complex::new(1.0 / (1usize << mixed.len()) as f64, 0.0);

        let mut full = DMatrix::zeros(dim, dim);
        for i in 0..dim {
            for j in 0..dim {
                if i & mask != j & mask {
                    continue;
                }
                let ri = compress_index(i, mask, total_qubits);
                let rj = compress_index(j, mask, total_qubits);
                full[(i, j)] = self.matrix[(ri, rj)] * scale;
            }
        }

        Ok(Self {
            num_qubits: total_qubits,
            matrix: full,
        })
    }
}

impl fmt::Display for DensityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DensityMatrix({} qubits)[", self.num_qubits)?;
        for row in self.matrix.row_iter() {
            write!(f, "  ")?;
            for (j, c) in row.iter().enumerate() {
                write!(f, "{}{:.4}", if j > 0 { ", " } else { "" }, c)?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}

/// `2^n` for registers of at most `MAX_QUBITS` qubits whose `2^n × 2^n`
/// complex matrix fits in an allocation.
pub(crate) fn dimension_for(num_qubits: usize) -> Result<usize> {
    let too_large = || {
        EtgError::invalid_operation(format!(
            "Register of {} qubits is too large for a dense density matrix (max {})",
            num_qubits, MAX_QUBITS
        ))
    };
    if num_qubits > MAX_QUBITS {
        return Err(too_large());
    }
    let dim = 1usize << num_qubits;
    dim.checked_mul(dim)
        .and_then(|entries| entries.checked_mul(size_of::<Complex<f64>>()))
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .map(|_| dim)
        .ok_or_else(too_large)
}

/// Validates a set of distinct, in-range qubits and returns their bit mask.
pub(crate) fn qubit_mask(qubits: &[QubitId], num_qubits: usize) -> Result<usize> {
    let mut mask = 0usize;
    for &qubit in qubits {
        if qubit.0 >= num_qubits {
            return Err(EtgError::invalid_qubit(
                qubit,
                format!("index out of range for a {}-qubit register", num_qubits),
            ));
        }
        if mask & qubit.mask() != 0 {
            return Err(EtgError::invalid_qubit(qubit, "listed more than once"));
        }
        mask |= qubit.mask();
    }
    Ok(mask)
}

/// Packs the bits of `index` that are *not* in `mask` into a dense index over
/// the remaining qubits, preserving their order.
fn compress_index(index: usize, mask: usize, num_qubits: usize) -> usize {
    let mut packed = 0usize;
    let mut shift = 0;
    for q in 0..num_qubits {
        let bit = 1usize << q;
        if mask & bit == 0 {
            if index & bit != 0 {
                packed |= 1 << shift;
            }
            shift += 1;
        }
    }
    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TOL: f64 = 1e-12;

    fn c(re: f64) -> Complex<f64> {
        Complex::new(re, 0.0)
    }

    #[test]
    fn test_zero_state_is_pure() -> Result<()> {
        let rho = DensityMatrix::zero_state(2)?;
        assert_eq!(rho.num_qubits(), 2);
        assert_eq!(rho.dim(), 4);
        assert_abs_diff_eq!(rho.trace(), 1.0, epsilon = TOL);
        assert_abs_diff_eq!(rho.purity(), 1.0, epsilon = TOL);
        assert_eq!(rho.get(0, 0), c(1.0));
        Ok(())
    }

    #[test]
    fn test_maximally_mixed_purity() -> Result<()> {
        let rho = DensityMatrix::maximally_mixed(2)?;
        assert_abs_diff_eq!(rho.trace(), 1.0, epsilon = TOL);
        assert_abs_diff_eq!(rho.purity(), 0.25, epsilon = TOL);
        Ok(())
    }

    #[test]
    fn test_from_state_vector_rejects_non_power_of_two() {
        let err = DensityMatrix::from_state_vector(&[c(1.0), c(0.0), c(0.0)]).unwrap_err();
        assert_eq!(err, EtgError::DimensionMismatch { expected: 4, actual: 3 });
    }

    #[test]
    fn test_partial_trace_of_bell_state_is_maximally_mixed() -> Result<()> {
        let bell = DensityMatrix::from_state_vector(&[c(FRAC_1_SQRT_2), c(0.0), c(0.0), c(FRAC_1_SQRT_2)])?;
        let alice = bell.partial_trace(&[QubitId(1)])?;
        assert_eq!(alice.num_qubits(), 1);
        assert_abs_diff_eq!(alice.get(0, 0).re, 0.5, epsilon = TOL);
        assert_abs_diff_eq!(alice.get(1, 1).re, 0.5, epsilon = TOL);
        assert_abs_diff_eq!(alice.get(0, 1).norm(), 0.0, epsilon = TOL);
        Ok(())
    }

    #[test]
    fn test_partial_trace_follows_little_endian_order() -> Result<()> {
        // Basis index 1 = qubit 0 set, qubit 1 clear.
        let rho = DensityMatrix::from_state_vector(&[c(0.0), c(1.0), c(0.0), c(0.0)])?;

        let alice = rho.partial_trace(&[QubitId(1)])?;
        assert_abs_diff_eq!(alice.get(1, 1).re, 1.0, epsilon = TOL);

        let bob = rho.partial_trace(&[QubitId(0)])?;
        assert_abs_diff_eq!(bob.get(0, 0).re, 1.0, epsilon = TOL);
        Ok(())
    }

    #[test]
    fn test_partial_trace_over_everything_is_scalar_trace() -> Result<()> {
        let rho = DensityMatrix::maximally_mixed(2)?;
        let scalar = rho.partial_trace(&[QubitId(0), QubitId(1)])?;
        assert_eq!(scalar.dim(), 1);
        assert_abs_diff_eq!(scalar.get(0, 0).re, 1.0, epsilon = TOL);
        Ok(())
    }

    #[test]
    fn test_partial_trace_rejects_bad_qubits() -> Result<()> {
        let rho = DensityMatrix::zero_state(2)?;
        assert!(matches!(
            rho.partial_trace(&[QubitId(2)]),
            Err(EtgError::InvalidQubit { qubit: QubitId(2), .. })
        ));
        assert!(matches!(
            rho.partial_trace(&[QubitId(1), QubitId(1)]),
            Err(EtgError::InvalidQubit { qubit: QubitId(1), .. })
        ));
        Ok(())
    }

    #[test]
    fn test_tensor_maximally_mixed_keeps_marginal() -> Result<()> {
        // Alice in |1⟩, Bob replaced by I/2.
        let alice = DensityMatrix::from_state_vector(&[c(0.0), c(1.0)])?;
        let full = alice.tensor_maximally_mixed(&[QubitId(1)], 2)?;
        assert_abs_diff_eq!(full.trace(), 1.0, epsilon = TOL);
        assert_abs_diff_eq!(full.get(1, 1).re, 0.5, epsilon = TOL);
        assert_abs_diff_eq!(full.get(3, 3).re, 0.5, epsilon = TOL);
        assert_eq!(full.partial_trace(&[QubitId(1)])?, alice);
        Ok(())
    }

    #[test]
    fn test_oversized_registers_are_rejected() {
        for n in [MAX_QUBITS + 1, 31, 64, usize::MAX] {
            assert!(matches!(
                DensityMatrix::zero_state(n),
                Err(EtgError::InvalidOperation { .. })
            ));
        }
        assert_eq!(dimension_for(3).ok(), Some(8));
    }

    #[test]
    fn test_conjugate_rejects_wrong_dimension() -> Result<()> {
        let rho = DensityMatrix::zero_state(2)?;
        let u = DMatrix::<Complex<f64>>::identity(2, 2);
        assert!(matches!(rho.conjugate(&u), Err(EtgError::DimensionMismatch { .. })));
        Ok(())
    }
}
