//! Elevation-banded biome classification and vertex coloring.
//!
//! Classification is a pure function of elevation so that every consumer
//! agrees on the band at a given point. Visual variation (boundary dithering,
//! per-vertex tint) lives in [`BiomePainter`] and never feeds back into the
//! classification used for placement rules.

use noise::{NoiseFn, Perlin};

use crate::core::types::Result;
use crate::core::Error;

/// Biome bands, ordered from most to least aquatic
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Biome {
    Water,
    Shore,
    Meadow,
    Rock,
    Snow,
}

impl Biome {
    /// Band index, increasing with elevation (Water = 0 .. Snow = 4)
    pub fn band_index(&self) -> u8 {
        match self {
            Biome::Water => 0,
            Biome::Shore => 1,
            Biome::Meadow => 2,
            Biome::Rock => 3,
            Biome::Snow => 4,
        }
    }

    /// Classify an elevation into a band. Pure and monotonic: a higher
    /// elevation never maps to a more aquatic band.
    pub fn classify(elevation: f32, thresholds: &BiomeThresholds) -> Biome {
        if elevation < thresholds.water_level {
            Biome::Water
        } else if elevation < thresholds.water_level + thresholds.shore_band {
            Biome::Shore
        } else if elevation >= thresholds.snow_line {
            Biome::Snow
        } else if elevation >= thresholds.rock_line {
            Biome::Rock
        } else {
            Biome::Meadow
        }
    }

    /// Base surface color for this band (linear RGB)
    pub fn surface_color(&self) -> [f32; 3] {
        match self {
            Biome::Water => [0.12, 0.31, 0.59],  // Lakebed blue
            Biome::Shore => [0.93, 0.84, 0.69],  // Wet sand
            Biome::Meadow => [0.30, 0.58, 0.25], // Grass and forest floor
            Biome::Rock => [0.47, 0.47, 0.47],   // Bare stone
            Biome::Snow => [0.94, 0.97, 1.0],    // Snow cap
        }
    }

    /// The next band down toward water, used for boundary color mixing
    pub fn lower_neighbor(&self) -> Biome {
        match self {
            Biome::Water => Biome::Water,
            Biome::Shore => Biome::Water,
            Biome::Meadow => Biome::Shore,
            Biome::Rock => Biome::Meadow,
            Biome::Snow => Biome::Rock,
        }
    }
}

/// Elevation thresholds separating the biome bands
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BiomeThresholds {
    pub water_level: f32, // Below this is underwater
    pub shore_band: f32,  // Width of the shore strip above the waterline
    pub rock_line: f32,   // Above this grass gives way to stone
    pub snow_line: f32,   // Above this everything is snow
}

impl Default for BiomeThresholds {
    fn default() -> Self {
        Self {
            water_level: 20.0,
            shore_band: 4.0,
            rock_line: 140.0,
            snow_line: 220.0,
        }
    }
}

impl BiomeThresholds {
    /// Thresholds must be strictly increasing in elevation.
    pub fn validate(&self) -> Result<()> {
        if self.shore_band <= 0.0 {
            return Err(Error::Config("shore_band must be positive".into()));
        }
        let shore_top = self.water_level + self.shore_band;
        if self.rock_line <= shore_top || self.snow_line <= self.rock_line {
            return Err(Error::Config(format!(
                "biome thresholds not increasing: shore top {}, rock {}, snow {}",
                shore_top, self.rock_line, self.snow_line
            )));
        }
        Ok(())
    }
}

/// Per-vertex coloring with low-amplitude boundary dithering.
pub struct BiomePainter {
    thresholds: BiomeThresholds,
    dither: Perlin,
    dither_amplitude: f32, // Elevation jitter near band boundaries (meters)
    dither_scale: f32,     // Spatial frequency of the dither field
}

impl BiomePainter {
    pub fn new(seed: u32, thresholds: BiomeThresholds) -> Self {
        Self {
            thresholds,
            dither: Perlin::new(seed.wrapping_add(1000)),
            dither_amplitude: 4.0,
            dither_scale: 0.05,
        }
    }

    pub fn thresholds(&self) -> &BiomeThresholds {
        &self.thresholds
    }

    /// Classify without dithering — the placement-rule view of the world.
    pub fn classify(&self, elevation: f32) -> Biome {
        Biome::classify(elevation, &self.thresholds)
    }

    /// Dither field value in [-1, 1] at a world position.
    fn dither_at(&self, x: f32, z: f32) -> f32 {
        self.dither.get([
            (x * self.dither_scale) as f64,
            (z * self.dither_scale) as f64,
        ]) as f32
    }

    /// Vertex color at a world position: classification with elevation
    /// dithered near boundaries, blended toward the lower band, plus a
    /// small brightness tint
    pub fn color_at(&self, x: f32, z: f32, elevation: f32) -> [f32; 3] {
        let d = self.dither_at(x, z);

        // Jitter elevation so band edges break up, but never re-classify
        // underwater terrain as land or vice versa
        let jittered = if elevation >= self.thresholds.water_level {
            (elevation + d * self.dither_amplitude).max(self.thresholds.water_level)
        } else {
            elevation
        };

        let biome = Biome::classify(jittered, &self.thresholds);
        let base = biome.surface_color();
        let neighbor = biome.lower_neighbor().surface_color();

        // Blend a little toward the lower band where the dither dips
        let mix = (0.5 - d * 0.5).clamp(0.0, 1.0) * 0.25;
        let tint = 1.0 + d * 0.06;

        let mut color = [0.0f32; 3];
        for i in 0..3 {
            let blended = base[i] + (neighbor[i] - base[i]) * mix;
            color[i] = (blended * tint).clamp(0.0, 1.0);
        }
        color
    }
}
