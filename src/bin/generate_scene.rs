//! Scene generator binary — pre-generates a full scene to disk for an
//! external renderer to consume.
//!
//! Usage: cargo run --release --bin generate_scene -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>  Load scene config from JSON (default: built-in)
//!   --seed <SEED>    Override the session seed
//!   --name <NAME>    Scene name / output directory (default: "scene")
//!
//! Output structure:
//!   assets/scenes/<name>/
//!     manifest.json       # Config echo + per-structure stats
//!     terrain.vtx         # TerrainVertex array, tightly packed
//!     terrain.idx         # u32 triangle indices
//!     vegetation.bin      # VegetationInstance array, tightly packed
//!     trees.json          # Placed trees with segments + leaf clusters

use std::path::PathBuf;
use std::time::Instant;

use serde_json::json;

use aloft::scene::{SceneConfig, ScenePipeline};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    let args: Vec<String> = std::env::args().collect();
    let name = parse_str_arg(&args, "--name").unwrap_or_else(|| "scene".to_string());

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => SceneConfig::from_file(&path).unwrap_or_else(|err| {
            eprintln!("Failed to load config {}: {}", path, err);
            std::process::exit(1);
        }),
        None => SceneConfig::default(),
    };
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.seed = seed;
    }

    let output_dir = PathBuf::from(format!("assets/scenes/{}", name));

    println!("=== Aloft Scene Generator ===");
    println!("Scene: {}", name);
    println!("Seed:  {}", config.seed);
    println!("Grid:  {}x{} over {}m x {}m",
        config.mesh.res_x, config.mesh.res_z, config.mesh.width, config.mesh.depth);
    println!("Output: {}", output_dir.display());
    println!();

    let pipeline = match ScenePipeline::new(config.clone()) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            eprintln!("Invalid config: {}", err);
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let scene = pipeline.regenerate();
    let generate_secs = start.elapsed().as_secs_f64();

    std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");

    // Renderer-facing buffers go out as tightly packed binary
    let vertex_bytes: &[u8] = bytemuck::cast_slice(&scene.terrain.vertices);
    let index_bytes: &[u8] = bytemuck::cast_slice(&scene.terrain.indices);
    let instance_bytes: &[u8] = bytemuck::cast_slice(&scene.vegetation);
    std::fs::write(output_dir.join("terrain.vtx"), vertex_bytes)
        .expect("Failed to write terrain vertices");
    std::fs::write(output_dir.join("terrain.idx"), index_bytes)
        .expect("Failed to write terrain indices");
    std::fs::write(output_dir.join("vegetation.bin"), instance_bytes)
        .expect("Failed to write vegetation instances");

    // Tree skeletons are small and hierarchical; JSON keeps them inspectable
    let trees: Vec<_> = scene
        .trees
        .iter()
        .map(|tree| {
            json!({
                "position": tree.position.to_array(),
                "rotation_y": tree.rotation_y,
                "scale": tree.scale,
                "segments": tree.skeleton.segments.iter().map(|seg| json!({
                    "start": seg.start.to_array(),
                    "end": seg.end.to_array(),
                    "start_radius": seg.start_radius,
                    "end_radius": seg.end_radius,
                })).collect::<Vec<_>>(),
                "leaf_clusters": tree.skeleton.leaf_clusters.iter().map(|cluster| json!({
                    "base_position": cluster.base_position.to_array(),
                    "leaves": cluster.leaves.iter().map(|leaf| json!({
                        "offset": leaf.offset.to_array(),
                        "rotation_y": leaf.rotation_y,
                        "sway_frequency": leaf.sway_frequency,
                        "sway_phase": leaf.sway_phase,
                        "color": leaf.color,
                    })).collect::<Vec<_>>(),
                })).collect::<Vec<_>>(),
            })
        })
        .collect();
    std::fs::write(
        output_dir.join("trees.json"),
        serde_json::to_string(&trees).expect("Failed to serialize trees"),
    )
    .expect("Failed to write trees");

    let placed = scene.vegetation.iter().filter(|i| !i.is_degenerate()).count();
    let segments: usize = scene.trees.iter().map(|t| t.skeleton.segment_count()).sum();

    let manifest = json!({
        "name": name,
        "version": 1,
        "config": config,
        "water_level": scene.water_level,
        "terrain": {
            "vertices": scene.terrain.vertex_count(),
            "triangles": scene.terrain.triangle_count(),
            "vertex_bytes": vertex_bytes.len(),
            "index_bytes": index_bytes.len(),
        },
        "vegetation": {
            "slots": scene.vegetation.len(),
            "placed": placed,
        },
        "trees": {
            "count": scene.trees.len(),
            "segments": segments,
        },
    });
    std::fs::write(
        output_dir.join("manifest.json"),
        serde_json::to_string_pretty(&manifest).expect("Failed to serialize manifest"),
    )
    .expect("Failed to write manifest");

    println!();
    println!("=== Generation Complete ===");
    println!("Time:       {:.2}s", generate_secs);
    println!("Terrain:    {} vertices, {} triangles ({:.1} KB)",
        scene.terrain.vertex_count(), scene.terrain.triangle_count(),
        (vertex_bytes.len() + index_bytes.len()) as f64 / 1024.0);
    println!("Vegetation: {} of {} slots placed", placed, scene.vegetation.len());
    println!("Trees:      {} with {} segments", scene.trees.len(), segments);
    println!("Output:     {}", output_dir.display());
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.clone())
}
