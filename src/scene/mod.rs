//! Scene assembly — builds every generated structure in one synchronous
//! batch.
//!
//! Generation is pure data production: the resulting [`Scene`] holds the
//! terrain grid, instance transforms, and tree skeletons for the rendering
//! collaborator to submit, with no render-graph state mixed in. A parameter
//! change (season, seed) regenerates the whole scene wholesale; there is no
//! incremental-update path.

pub mod config;

pub use config::{SceneConfig, TreeScatterConfig, MAX_TREES};

use std::time::Instant;

use glam::Vec3;
use rayon::prelude::*;

use crate::core::types::Result;
use crate::flight::FlightBody;
use crate::terrain::{BiomePainter, HeightField, TerrainMesh, TerrainMeshBuilder};
use crate::tree::{TreeGenerator, TreeSkeleton};
use crate::vegetation::{ScatterParams, VegetationInstance, VegetationScatterer};

/// One tree placed into world space
pub struct PlacedTree {
    pub position: Vec3,
    pub rotation_y: f32,
    pub scale: f32,
    pub skeleton: TreeSkeleton,
}

/// Everything the rendering collaborator needs for one session
pub struct Scene {
    pub terrain: TerrainMesh,
    pub vegetation: Vec<VegetationInstance>,
    pub trees: Vec<PlacedTree>,
    pub water_level: f32,
}

/// Orchestrates scene generation: terrain mesh, vegetation, trees
pub struct ScenePipeline {
    config: SceneConfig,
    field: HeightField,
    painter: BiomePainter,
}

impl ScenePipeline {
    /// Create a pipeline from a validated configuration
    pub fn new(config: SceneConfig) -> Result<Self> {
        config.validate()?;
        let field = HeightField::new(config.height.clone());
        let painter = BiomePainter::new(config.seed, config.thresholds.clone());
        Ok(Self {
            config,
            field,
            painter,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The shared elevation ground truth
    pub fn field(&self) -> &HeightField {
        &self.field
    }

    /// Get terrain elevation at a world position (delegates to the field)
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.field.height_at(x, z)
    }

    /// Build the whole scene from scratch. Blocks until every structure is
    /// produced; any previous scene is simply dropped by the caller.
    pub fn regenerate(&self) -> Scene {
        let seed = self.config.seed;
        log::info!("Generating scene (seed {})...", seed);

        let start = Instant::now();
        let terrain =
            TerrainMeshBuilder::new(self.config.mesh.clone()).build(&self.field, &self.painter);
        log::info!(
            "Terrain: {} vertices, {} triangles in {:.1}ms",
            terrain.vertex_count(),
            terrain.triangle_count(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        let start = Instant::now();
        let mut scatterer = VegetationScatterer::new(
            seed as u64 ^ 0x5eed_0001,
            self.config.vegetation.clone(),
        );
        let vegetation = scatterer.scatter(&self.field);
        let placed = vegetation.iter().filter(|i| !i.is_degenerate()).count();
        log::info!(
            "Vegetation: {} of {} slots placed in {:.1}ms",
            placed,
            vegetation.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        let start = Instant::now();
        let trees = self.generate_trees();
        let segments: usize = trees.iter().map(|t| t.skeleton.segment_count()).sum();
        let clusters: usize = trees.iter().map(|t| t.skeleton.leaf_cluster_count()).sum();
        log::info!(
            "Trees: {} placed, {} segments, {} leaf clusters in {:.1}ms",
            trees.len(),
            segments,
            clusters,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Scene {
            terrain,
            vegetation,
            trees,
            water_level: self.config.height.water_level,
        }
    }

    /// Scatter tree anchors, then grow a skeleton per accepted anchor.
    /// Each slot gets its own seed stream so the pass parallelizes without
    /// changing the result.
    fn generate_trees(&self) -> Vec<PlacedTree> {
        let tree_config = &self.config.trees;
        let anchor_params = ScatterParams {
            count: tree_config.count,
            half_extent: self.config.vegetation.half_extent,
            min_height: tree_config.min_height,
            max_height: tree_config.max_height,
            max_slope: tree_config.max_slope,
            scale_range: tree_config.scale_range,
        };

        let mut anchor_scatterer =
            VegetationScatterer::new(self.config.seed as u64 ^ 0x5eed_0002, anchor_params);
        let anchors = anchor_scatterer.scatter(&self.field);
        let params = tree_config.tree_params();

        anchors
            .into_par_iter()
            .enumerate()
            .filter(|(_, anchor)| !anchor.is_degenerate())
            .map(|(slot, anchor)| {
                let seed = (self.config.seed as u64).wrapping_add(slot as u64 * 7919);
                let skeleton = TreeGenerator::new(seed, params.clone()).generate();
                PlacedTree {
                    position: Vec3::from(anchor.position),
                    rotation_y: anchor.rotation_y,
                    scale: anchor.scale,
                    skeleton,
                }
            })
            .collect()
    }

    /// Spawn the flight body above the basin, looking across the scene
    pub fn spawn_flight(&self) -> FlightBody {
        let center = self.config.height.basin_center;
        let floor = self
            .height_at(center.x, center.y)
            .max(self.config.height.water_level);
        let start = Vec3::new(center.x, floor + 80.0, center.y);
        FlightBody::new(self.config.flight.clone(), start)
    }
}
