// src/lib.rs

//! `etg` - Entanglement entropy of a parameterized two-qubit Alice–Bob state
//!
//! A rotation `RY(θ)` on Alice followed by `CNOT(Alice → Bob)` prepares
//! `cos(θ/2)|00⟩ + sin(θ/2)|11⟩`. The crate evolves this as a density matrix,
//! optionally with depolarizing noise after each gate, traces out Bob and
//! returns the von Neumann entropy of Alice's reduced state in bits.
//!
//! Qubit 0 (Alice) is the least-significant bit of every basis index.

pub mod core;
pub mod operations;
pub mod circuits;
pub mod noise;
pub mod simulation;
pub mod validation;
pub mod entropy;
pub mod sweep;
pub mod geometry;

// Re-export the most common types for easier top-level use
pub use crate::core::{ALICE, BOB, DensityMatrix, EtgError, QubitId, Result};
pub use operations::Gate;
pub use circuits::{Circuit, CircuitBuilder};
pub use noise::NoiseConfig;
pub use simulation::{EntropyEngine, SimulationResult, Simulator};
pub use entropy::{eigenvalues, von_neumann_entropy};
pub use sweep::{EntropyCurve, EntropySample, linspace, sweep};
pub use geometry::{SurfaceGrid, SurfacePoint, ThroatMapping, hyperboloid};

// Example 1: Boundary values of the noiseless engine
// θ = 0 leaves the register in |00⟩ (no entanglement); θ = π/2 prepares a
// Bell state, so Alice alone holds exactly one bit of entropy.
/// ```
/// use etg::{EntropyEngine, NoiseConfig, EtgError};
/// use std::f64::consts::PI;
///
/// let engine = EntropyEngine::new(NoiseConfig::disabled())?;
///
/// let product = engine.compute_entropy(0.0)?;
/// let bell = engine.compute_entropy(PI / 2.0)?;
/// println!("S(0) = {product:.6}, S(pi/2) = {bell:.6}");
///
/// assert!(product.abs() < 1e-6);
/// assert!((bell - 1.0).abs() < 1e-6);
/// # Ok::<(), EtgError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Noisy run with diagnostics
// Depolarizing noise after each gate keeps the trace at 1 while mixing the
// state; the intermediate result exposes both.
/// ```
/// use etg::{EntropyEngine, NoiseConfig, EtgError};
/// use std::f64::consts::PI;
///
/// let engine = EntropyEngine::new(NoiseConfig::depolarizing(0.05)?)?;
/// let result = engine.simulate(PI / 3.0)?;
/// println!("{}", result);
///
/// for trace in result.step_traces() {
///     assert!((trace - 1.0).abs() < 1e-9);
/// }
/// assert!(result.final_state().purity() < 1.0);
///
/// let entropy = result.entanglement_entropy()?;
/// assert!((0.0..=1.0).contains(&entropy));
/// # Ok::<(), EtgError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 3: Sweep and throat geometry
/// ```
/// use etg::{EntropyEngine, EtgError, SurfaceGrid, ThroatMapping, hyperboloid, linspace, sweep};
/// use std::f64::consts::PI;
///
/// let curve = sweep(&EntropyEngine::default(), &linspace(0.0, PI, 21))?;
/// let peak = curve.peak().copied().ok_or(EtgError::InvalidOperation {
///     message: "empty sweep".to_string(),
/// })?;
/// assert!((peak.theta - PI / 2.0).abs() < 1e-12);
///
/// let surface = hyperboloid(peak.entropy, &ThroatMapping::default(), &SurfaceGrid::default())?;
/// assert_eq!(surface.len(), 50 * 30);
/// # Ok::<(), EtgError>(())
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
