//! Terrain mesh builder — samples the height field over a grid and emits a
//! renderable surface (positions + colors + normals).
//!
//! Normals need neighbor elevations, so they are accumulated from triangle
//! faces only after the whole grid is populated, never per vertex in
//! isolation.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rayon::prelude::*;

use crate::core::types::Result;
use crate::core::Error;
use crate::terrain::biome::BiomePainter;
use crate::terrain::height::HeightField;

/// Hard ceiling on grid resolution per axis; the build is a one-shot
/// synchronous batch that blocks startup.
pub const MAX_GRID_RES: u32 = 2048;

/// World extents and grid resolution for the terrain surface
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MeshParams {
    pub width: f32,  // World-space X extent, centered on the origin
    pub depth: f32,  // World-space Z extent, centered on the origin
    pub res_x: u32,  // Vertices along X
    pub res_z: u32,  // Vertices along Z
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            width: 2000.0,
            depth: 2000.0,
            res_x: 129,
            res_z: 129,
        }
    }
}

impl MeshParams {
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0.0 || self.depth <= 0.0 {
            return Err(Error::Config("mesh extents must be positive".into()));
        }
        if self.res_x < 2 || self.res_z < 2 {
            return Err(Error::Config("grid resolution must be at least 2".into()));
        }
        if self.res_x > MAX_GRID_RES || self.res_z > MAX_GRID_RES {
            return Err(Error::Config(format!(
                "grid resolution capped at {} per axis", MAX_GRID_RES
            )));
        }
        Ok(())
    }
}

/// One terrain grid vertex, laid out for direct vertex-buffer upload
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

/// Renderable terrain surface
pub struct TerrainMesh {
    pub vertices: Vec<TerrainVertex>,
    pub indices: Vec<u32>,
    pub res_x: u32,
    pub res_z: u32,
}

impl TerrainMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Builds a terrain surface from the height field and biome painter
pub struct TerrainMeshBuilder {
    params: MeshParams,
}

impl TerrainMeshBuilder {
    pub fn new(params: MeshParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MeshParams {
        &self.params
    }

    /// World-space position of grid vertex (ix, iz) on the XZ plane.
    fn grid_pos(&self, ix: u32, iz: u32) -> (f32, f32) {
        let fx = ix as f32 / (self.params.res_x - 1) as f32;
        let fz = iz as f32 / (self.params.res_z - 1) as f32;
        (
            (fx - 0.5) * self.params.width,
            (fz - 0.5) * self.params.depth,
        )
    }

    /// Sample the full grid and emit the displaced, colored, lit surface.
    ///
    /// Basin interior vertices end up below the water plane; they still get
    /// geometry. The water surface is a separate plane drawn over them, not
    /// a hole in the terrain.
    pub fn build(&self, field: &HeightField, painter: &BiomePainter) -> TerrainMesh {
        let res_x = self.params.res_x;
        let res_z = self.params.res_z;

        // Pass 1: displace and color every vertex. Rows are independent
        // because the height function is pure.
        let rows: Vec<Vec<TerrainVertex>> = (0..res_z)
            .into_par_iter()
            .map(|iz| {
                (0..res_x)
                    .map(|ix| {
                        let (x, z) = self.grid_pos(ix, iz);
                        let h = field.height_at(x, z);
                        TerrainVertex {
                            position: [x, h, z],
                            normal: [0.0; 3],
                            color: painter.color_at(x, z, h),
                        }
                    })
                    .collect()
            })
            .collect();
        let mut vertices: Vec<TerrainVertex> = rows.into_iter().flatten().collect();

        // Pass 2: two triangles per grid cell
        let mut indices = Vec::with_capacity(((res_x - 1) * (res_z - 1) * 6) as usize);
        for iz in 0..res_z - 1 {
            for ix in 0..res_x - 1 {
                let a = iz * res_x + ix;
                let b = a + 1;
                let c = a + res_x;
                let d = c + 1;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        // Pass 3: face normals accumulated per vertex, then normalized.
        // Runs after the whole grid exists so every face sees final
        // elevations.
        let mut accum = vec![Vec3::ZERO; vertices.len()];
        for tri in indices.chunks_exact(3) {
            let p0 = Vec3::from(vertices[tri[0] as usize].position);
            let p1 = Vec3::from(vertices[tri[1] as usize].position);
            let p2 = Vec3::from(vertices[tri[2] as usize].position);
            let face = (p1 - p0).cross(p2 - p0);
            accum[tri[0] as usize] += face;
            accum[tri[1] as usize] += face;
            accum[tri[2] as usize] += face;
        }
        for (vertex, n) in vertices.iter_mut().zip(accum) {
            let normal = if n.length_squared() > 0.0 {
                n.normalize()
            } else {
                Vec3::Y
            };
            vertex.normal = normal.to_array();
        }

        TerrainMesh {
            vertices,
            indices,
            res_x,
            res_z,
        }
    }
}
