// src/geometry/mod.rs

//! Maps an entanglement entropy to a wormhole-throat surface.
//!
//! The throat radius grows linearly with entropy, `r = base + scale·S`, and
//! the surface is the hyperboloid of one sheet
//!
//! ```text
//! x = r·cosh(v)·cos(u)
//! y = r·cosh(v)·sin(u)
//! z = sinh(v)
//! ```
//!
//! sampled on `u ∈ [0, 2π]` and `v ∈ [-extent, extent]`. Rendering is left
//! to the caller.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::core::{EtgError, Result};
use crate::sweep::linspace;

/// Linear map from entropy to throat radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThroatMapping {
    /// Radius at zero entropy.
    pub base_radius: f64,
    /// Radius gained per bit of entropy.
    pub scale: f64,
}

impl Default for ThroatMapping {
    fn default() -> Self {
        Self {
            base_radius: 0.2,
            scale: 0.8,
        }
    }
}

impl ThroatMapping {
    /// Rejects a non-finite base radius or scale.
    pub fn validate(&self) -> Result<()> {
        if self.base_radius.is_finite() && self.scale.is_finite() {
            Ok(())
        } else {
            Err(EtgError::invalid_configuration(format!(
                "throat mapping must be finite (base_radius = {}, scale = {})",
                self.base_radius, self.scale
            )))
        }
    }

    /// `base_radius + scale · entropy`.
    pub fn throat_radius(&self, entropy: f64) -> f64 {
        self.base_radius + self.scale * entropy
    }
}

/// Sampling density of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGrid {
    /// Samples of `u` over `[0, 2π]`.
    pub angular_samples: usize,
    /// Samples of `v` over `[-depth_extent, depth_extent]`.
    pub depth_samples: usize,
    /// Half-length of the throat along its axis; `v` spans `[-depth_extent, depth_extent]`.
    pub depth_extent: f64,
}

impl Default for SurfaceGrid {
    fn default() -> Self {
        Self {
            angular_samples: 50,
            depth_samples: 30,
            depth_extent: 1.5,
        }
    }
}

impl SurfaceGrid {
    /// Rejects empty axes and a negative or non-finite depth extent.
    pub fn validate(&self) -> Result<()> {
        if self.angular_samples == 0 || self.depth_samples == 0 {
            return Err(EtgError::invalid_configuration(format!(
                "surface grid needs at least one sample per axis (got {} x {})",
                self.angular_samples, self.depth_samples
            )));
        }
        if !self.depth_extent.is_finite() || self.depth_extent < 0.0 {
            return Err(EtgError::invalid_configuration(format!(
                "depth extent must be finite and non-negative, got {}",
                self.depth_extent
            )));
        }
        Ok(())
    }

    /// Total number of points the grid produces.
    pub fn len(&self) -> usize {
        self.angular_samples * self.depth_samples
    }

    /// Returns `true` if the grid produces no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One point of the throat surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePoint {
    /// `r·cosh(v)·cos(u)`
    pub x: f64,
    /// `r·cosh(v)·sin(u)`
    pub y: f64,
    /// `sinh(v)`, the position along the throat axis.
    pub z: f64,
}

/// Samples the throat surface for `entropy`.
///
/// Points are ordered with `v` as the outer loop and `u` as the inner loop,
/// the same row-major order as a `meshgrid(u, v)`.
///
/// # Errors
/// * `InvalidOperation` if `entropy` is NaN or infinite.
/// * `InvalidConfiguration` for an invalid mapping or grid.
pub fn hyperboloid(entropy: f64, mapping: &ThroatMapping, grid: &SurfaceGrid) -> Result<Vec<SurfacePoint>> {
    if !entropy.is_finite() {
        return Err(EtgError::invalid_operation(format!(
            "cannot build a throat surface for entropy {}",
            entropy
        )));
    }
    mapping.validate()?;
    grid.validate()?;

    let radius = mapping.throat_radius(entropy);
    let us = linspace(0.0, 2.0 * PI, grid.angular_samples);
    let vs = linspace(-grid.depth_extent, grid.depth_extent, grid.depth_samples);

    let mut points = Vec::with_capacity(grid.len());
    for &v in &vs {
        let ring = radius * v.cosh();
        let z = v.sinh();
        for &u in &us {
            let (sin_u, cos_u) = u.sin_cos();
            points.push(SurfacePoint {
                x: ring * cos_u,
                y: ring * sin_u,
                z,
            });
        }
    }
    Ok(points)
}
