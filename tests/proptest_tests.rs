//! Property-based tests for etg using proptest
//!
//! Checks the physical invariants of the entropy engine over random angles
//! and noise levels.

use proptest::prelude::*;
use std::f64::consts::PI;

use etg::{EntropyEngine, NoiseConfig, QubitId, eigenvalues, linspace};

fn engine(p: f64) -> EntropyEngine {
    EntropyEngine::new(NoiseConfig::depolarizing(p).unwrap()).unwrap()
}

proptest! {
    /// Property: entropy of a single qubit lies in [0, 1]
    #[test]
    fn entropy_is_bounded(theta in -10.0f64..10.0, p in 0.0f64..=1.0) {
        let s = engine(p).compute_entropy(theta).unwrap();
        prop_assert!((0.0..=1.0 + 1e-12).contains(&s), "S = {} out of range", s);
    }

    /// Property: every evolution step keeps Tr(ρ) = 1
    #[test]
    fn trace_is_preserved(theta in -2.0 * PI..2.0 * PI, p in 0.0f64..=1.0) {
        let result = engine(p).simulate(theta).unwrap();
        for trace in result.step_traces() {
            prop_assert!((trace - 1.0).abs() <= 1e-9, "Tr = {}", trace);
        }
    }

    /// Property: S(θ) = S(π - θ)
    #[test]
    fn entropy_is_symmetric(theta in 0.0f64..PI, p in 0.0f64..0.5) {
        let engine = engine(p);
        let a = engine.compute_entropy(theta).unwrap();
        let b = engine.compute_entropy(PI - theta).unwrap();
        prop_assert!((a - b).abs() < 1e-6, "S({}) = {} but S(pi - theta) = {}", theta, a, b);
    }

    /// Property: S(θ + 2π) = S(θ)
    #[test]
    fn entropy_is_periodic(theta in 0.05f64..(PI - 0.05), p in 0.0f64..0.5) {
        let engine = engine(p);
        let a = engine.compute_entropy(theta).unwrap();
        let b = engine.compute_entropy(theta + 2.0 * PI).unwrap();
        prop_assert!((a - b).abs() < 1e-9);
    }

    /// Property: reduced eigenvalues lie in [0, 1] and sum to 1
    #[test]
    fn reduced_spectrum_is_a_distribution(theta in 0.0f64..PI, p in 0.0f64..=0.5) {
        let alice = engine(p).simulate(theta).unwrap().alice_state().unwrap();
        let spectrum = eigenvalues(&alice).unwrap();
        prop_assert_eq!(spectrum.len(), 2);
        prop_assert!(spectrum[0] >= spectrum[1]);
        for lambda in &spectrum {
            prop_assert!((0.0..=1.0).contains(lambda));
        }
        prop_assert!((spectrum.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    /// Property: the two halves of a pure state have equal entropy
    #[test]
    fn pure_state_halves_match(theta in -PI..PI) {
        let result = EntropyEngine::default().simulate(theta).unwrap();
        let alice = etg::von_neumann_entropy(&result.reduced_state(&[QubitId(1)]).unwrap()).unwrap();
        let bob = etg::von_neumann_entropy(&result.reduced_state(&[QubitId(0)]).unwrap()).unwrap();
        prop_assert!((alice - bob).abs() < 1e-6);
    }

    /// Property: linspace yields `steps` values with exact endpoints
    #[test]
    fn linspace_endpoints(start in -5.0f64..5.0, end in -5.0f64..5.0, steps in 2usize..200) {
        let xs = linspace(start, end, steps);
        prop_assert_eq!(xs.len(), steps);
        prop_assert_eq!(xs[0], start);
        prop_assert_eq!(xs[steps - 1], end);
    }
}
