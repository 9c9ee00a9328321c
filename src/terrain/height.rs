//! Noise-based height field — the single elevation ground truth.
//!
//! Terrain meshing, vegetation placement, and flight collision all read the
//! same `height_at`, so every consumer observes identical elevations.

use glam::Vec2;

use crate::core::types::Result;
use crate::core::Error;
use crate::math::FractalNoise;

/// Hard ceiling on FBM octaves; each octave doubles sampling cost.
pub const MAX_OCTAVES: u32 = 8;

/// Parameters controlling the height field
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HeightParams {
    pub seed: u32,
    pub scale: f32,         // Horizontal scale (larger = smoother)
    pub height_scale: f32,  // Vertical scale (max elevation)
    pub octaves: u32,       // FBM octaves (detail levels)
    pub persistence: f32,   // FBM persistence (0.5 typical)
    pub lacunarity: f32,    // FBM lacunarity (2.0 typical)
    pub sharpness: f32,     // Power applied to FBM; >1 sharpens peaks, flattens valleys
    pub water_level: f32,   // Elevation of the water plane
    pub basin_center: Vec2, // Lake/valley center
    pub basin_radius: f32,  // Full-strength carve radius
    pub basin_falloff: f32, // Transition band beyond the radius
    pub basin_floor: f32,   // Elevation blended toward inside the basin
    pub floor_clamp: f32,   // Absolute elevation floor
}

impl Default for HeightParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 600.0,
            height_scale: 300.0,
            octaves: 5,
            persistence: 0.5,
            lacunarity: 2.0,
            sharpness: 2.2,
            water_level: 20.0,
            basin_center: Vec2::ZERO,
            basin_radius: 500.0,
            basin_falloff: 150.0,
            basin_floor: -20.0,
            floor_clamp: -40.0,
        }
    }
}

impl HeightParams {
    /// Check parameter ranges before building a field.
    pub fn validate(&self) -> Result<()> {
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(Error::Config(format!(
                "octaves must be in 1..={}, got {}", MAX_OCTAVES, self.octaves
            )));
        }
        if self.scale <= 0.0 || self.height_scale <= 0.0 {
            return Err(Error::Config("scale and height_scale must be positive".into()));
        }
        if self.sharpness < 1.0 {
            return Err(Error::Config(format!(
                "sharpness must be >= 1.0, got {}", self.sharpness
            )));
        }
        if self.basin_radius < 0.0 || self.basin_falloff < 0.0 {
            return Err(Error::Config("basin radius/falloff must be non-negative".into()));
        }
        if self.basin_floor < self.floor_clamp {
            return Err(Error::Config(format!(
                "basin_floor {} below floor_clamp {}", self.basin_floor, self.floor_clamp
            )));
        }
        Ok(())
    }
}

/// Procedural height field using fractal Brownian motion with basin carving
pub struct HeightField {
    params: HeightParams,
    noise: FractalNoise,
}

impl HeightField {
    /// Create a new height field with the given parameters
    pub fn new(params: HeightParams) -> Self {
        let noise = FractalNoise::new(
            params.seed,
            params.octaves,
            params.persistence,
            params.lacunarity,
        );
        Self { params, noise }
    }

    /// Get height field parameters
    pub fn params(&self) -> &HeightParams {
        &self.params
    }

    /// Get terrain elevation at world position (x, z)
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let nx = x / self.params.scale;
        let nz = z / self.params.scale;

        // FBM in [0, 1], sharpened and scaled to elevation
        let n = self.noise.get(nx, nz);
        let mut h = n.powf(self.params.sharpness) * self.params.height_scale;

        // Radial basin carve: full strength at the center, fading out
        // quadratically across the transition band
        let dist = Vec2::new(x, z).distance(self.params.basin_center);
        let reach = self.params.basin_radius + self.params.basin_falloff;
        if dist < reach {
            let t = dist / reach;
            let weight = 1.0 - t * t;
            h += (self.params.basin_floor - h) * weight;
        }

        h.clamp(self.params.floor_clamp, self.params.height_scale)
    }

    /// Estimate terrain slope at (x, z) using central differences
    pub fn slope_at(&self, x: f32, z: f32) -> f32 {
        let eps = 0.5;
        let h_xp = self.height_at(x + eps, z);
        let h_xn = self.height_at(x - eps, z);
        let h_zp = self.height_at(x, z + eps);
        let h_zn = self.height_at(x, z - eps);

        let dx = (h_xp - h_xn) / (2.0 * eps);
        let dz = (h_zp - h_zn) / (2.0 * eps);
        (dx * dx + dz * dz).sqrt()
    }

    /// Get min/max elevation bounds in an XZ region via corner + center samples
    pub fn height_bounds(&self, min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> (f32, f32) {
        let heights = [
            self.height_at(min_x, min_z),
            self.height_at(max_x, min_z),
            self.height_at(min_x, max_z),
            self.height_at(max_x, max_z),
            self.height_at((min_x + max_x) / 2.0, (min_z + max_z) / 2.0),
        ];

        let min_h = heights.iter().copied().fold(f32::INFINITY, f32::min);
        let max_h = heights.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        (min_h, max_h)
    }
}
