//! Rejection-sampled vegetation placement.
//!
//! One uniform draw per slot, accepted or rejected against the height-band
//! and slope rules. Rejected slots stay in the buffer as zero-scale
//! degenerates so the instance buffer keeps a fixed size. No spatial
//! guarantee beyond independent uniform sampling; clustering and gaps are
//! expected.

use bytemuck::{Pod, Zeroable};

use crate::core::types::Result;
use crate::core::Error;
use crate::math::SimpleRng;
use crate::terrain::height::HeightField;

/// Hard ceiling on instances per scatter pass.
pub const MAX_INSTANCES: u32 = 100_000;

/// Placement rules for one vegetation layer
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ScatterParams {
    pub count: u32,            // Instance buffer size (accepted + degenerate)
    pub half_extent: f32,      // Draws span [-half_extent, half_extent] on X and Z
    pub min_height: f32,       // Exclusive lower elevation bound
    pub max_height: f32,       // Exclusive upper elevation bound
    pub max_slope: f32,        // Reject placements on steeper ground
    pub scale_range: [f32; 2], // Uniform scale variation (min, max)
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            count: 500,
            half_extent: 1000.0,
            min_height: 26.0,
            max_height: 140.0,
            max_slope: 0.8,
            scale_range: [0.8, 1.3],
        }
    }
}

impl ScatterParams {
    pub fn validate(&self) -> Result<()> {
        if self.count > MAX_INSTANCES {
            return Err(Error::Config(format!(
                "instance count capped at {}", MAX_INSTANCES
            )));
        }
        if self.half_extent <= 0.0 {
            return Err(Error::Config("half_extent must be positive".into()));
        }
        if self.min_height >= self.max_height {
            return Err(Error::Config(format!(
                "empty height band [{}, {}]", self.min_height, self.max_height
            )));
        }
        if self.scale_range[0] <= 0.0 || self.scale_range[0] > self.scale_range[1] {
            return Err(Error::Config("scale_range must be ordered and positive".into()));
        }
        Ok(())
    }
}

/// One instanced-vegetation transform, laid out for instance-buffer upload.
/// A zero scale marks a rejected (degenerate) slot.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct VegetationInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub rotation_y: f32,
}

impl VegetationInstance {
    pub fn degenerate() -> Self {
        Self::zeroed()
    }

    pub fn is_degenerate(&self) -> bool {
        self.scale == 0.0
    }
}

/// Scatters vegetation instances by rejection sampling against the height
/// field
pub struct VegetationScatterer {
    rng: SimpleRng,
    params: ScatterParams,
}

impl VegetationScatterer {
    pub fn new(seed: u64, params: ScatterParams) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            params,
        }
    }

    pub fn params(&self) -> &ScatterParams {
        &self.params
    }

    /// Fill the instance buffer. Exactly `count` slots come back; slots whose
    /// draw failed the placement predicate are degenerate.
    pub fn scatter(&mut self, field: &HeightField) -> Vec<VegetationInstance> {
        let extent = self.params.half_extent;
        let [scale_min, scale_max] = self.params.scale_range;

        (0..self.params.count)
            .map(|_| {
                let x = self.rng.range(-extent, extent);
                let z = self.rng.range(-extent, extent);

                let h = field.height_at(x, z);
                if h <= self.params.min_height || h >= self.params.max_height {
                    return VegetationInstance::degenerate();
                }
                if field.slope_at(x, z) > self.params.max_slope {
                    return VegetationInstance::degenerate();
                }

                VegetationInstance {
                    position: [x, h, z],
                    scale: self.rng.range(scale_min, scale_max),
                    rotation_y: self.rng.range(0.0, std::f32::consts::TAU),
                }
            })
            .collect()
    }
}
