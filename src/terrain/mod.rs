//! Terrain generation: height field, biome classification, mesh building

pub mod height;
pub mod biome;
pub mod mesh;

pub use biome::{Biome, BiomePainter, BiomeThresholds};
pub use height::{HeightField, HeightParams};
pub use mesh::{MeshParams, TerrainMesh, TerrainMeshBuilder, TerrainVertex};
