//! Scene configuration: one serializable struct covering every generator.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::types::Result;
use crate::core::Error;
use crate::flight::FlightParams;
use crate::terrain::{BiomeThresholds, HeightParams, MeshParams};
use crate::tree::{TreeParams, TreeStyle};
use crate::vegetation::ScatterParams;

/// Hard ceiling on trees per scene; each one is a full recursive build.
pub const MAX_TREES: u32 = 4096;

/// Tree placement and styling for a scene
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeScatterConfig {
    /// Anchor slots drawn by the scatterer (accepted + degenerate)
    pub count: u32,
    /// Style preset; switching (e.g. to a winter variant) regenerates the
    /// whole scene
    pub style: TreeStyle,
    /// Explicit params override; wins over `style` when set
    pub params: Option<TreeParams>,
    /// Placement height band
    pub min_height: f32,
    pub max_height: f32,
    /// Trees avoid steep ground
    pub max_slope: f32,
    /// Whole-tree scale variation
    pub scale_range: [f32; 2],
}

impl Default for TreeScatterConfig {
    fn default() -> Self {
        Self {
            count: 64,
            style: TreeStyle::Oak,
            params: None,
            min_height: 26.0,
            max_height: 120.0,
            max_slope: 0.6,
            scale_range: [0.8, 1.2],
        }
    }
}

impl TreeScatterConfig {
    /// Resolve the effective tree parameters.
    pub fn tree_params(&self) -> TreeParams {
        self.params
            .clone()
            .unwrap_or_else(|| TreeParams::from_style(self.style))
    }

    pub fn validate(&self) -> Result<()> {
        if self.count > MAX_TREES {
            return Err(Error::Config(format!("tree count capped at {}", MAX_TREES)));
        }
        if self.min_height >= self.max_height {
            return Err(Error::Config(format!(
                "empty tree height band [{}, {}]", self.min_height, self.max_height
            )));
        }
        if self.scale_range[0] <= 0.0 || self.scale_range[0] > self.scale_range[1] {
            return Err(Error::Config("tree scale_range must be ordered and positive".into()));
        }
        self.tree_params().validate()
    }
}

/// Full configuration for one generated scene
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Session seed; every generator derives its own stream from this
    pub seed: u32,
    pub height: HeightParams,
    pub thresholds: BiomeThresholds,
    pub mesh: MeshParams,
    pub vegetation: ScatterParams,
    pub trees: TreeScatterConfig,
    pub flight: FlightParams,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            height: HeightParams::default(),
            thresholds: BiomeThresholds::default(),
            mesh: MeshParams::default(),
            vegetation: ScatterParams::default(),
            trees: TreeScatterConfig::default(),
            flight: FlightParams::default(),
        }
    }
}

impl SceneConfig {
    /// Load a config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save the config as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Validate every sub-config and cross-config consistency.
    ///
    /// The water plane elevation appears in the height field, the biome
    /// thresholds, and the flight floor; they must agree or trees float and
    /// the flying body clips inconsistently.
    pub fn validate(&self) -> Result<()> {
        self.height.validate()?;
        self.thresholds.validate()?;
        self.mesh.validate()?;
        self.vegetation.validate()?;
        self.trees.validate()?;
        self.flight.validate()?;

        if self.thresholds.water_level != self.height.water_level {
            return Err(Error::Config(format!(
                "biome water_level {} disagrees with height water_level {}",
                self.thresholds.water_level, self.height.water_level
            )));
        }
        if self.flight.water_level != self.height.water_level {
            return Err(Error::Config(format!(
                "flight water_level {} disagrees with height water_level {}",
                self.flight.water_level, self.height.water_level
            )));
        }
        Ok(())
    }
}
