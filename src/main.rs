//! Headless scenery demo — generates a scene and flies a scripted body
//! over it for a fixed number of ticks.
//!
//! Usage: cargo run --release -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>  Load scene config from JSON (default: built-in)
//!   --seed <SEED>    Override the session seed
//!   --ticks <N>      Simulation ticks to run (default: 600)
//!   --winter         Switch tree style to the bare winter variant

use aloft::core::time::FrameTimer;
use aloft::flight::{ControlInput, FlightEvent};
use aloft::scene::{SceneConfig, ScenePipeline};
use aloft::tree::TreeStyle;

fn main() {
    aloft::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let ticks = parse_usize_arg(&args, "--ticks").unwrap_or(600);

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => match SceneConfig::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load config {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => SceneConfig::default(),
    };
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        config.seed = seed;
    }
    if args.iter().any(|a| a == "--winter") {
        config.trees.style = match config.trees.style {
            TreeStyle::Willow | TreeStyle::WinterWillow => TreeStyle::WinterWillow,
            _ => TreeStyle::WinterOak,
        };
        config.trees.params = None;
    }

    println!("=== Aloft Scenery Demo ===");
    println!("Seed:  {}", config.seed);
    println!("Grid:  {}x{}", config.mesh.res_x, config.mesh.res_z);
    println!("Trees: {} ({:?})", config.trees.count, config.trees.style);
    println!("Ticks: {}", ticks);
    println!();

    let pipeline = match ScenePipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            eprintln!("Invalid config: {}", err);
            std::process::exit(1);
        }
    };

    let scene = pipeline.regenerate();
    let mut body = pipeline.spawn_flight();

    // Scripted control: gentle dive into a long banked circuit. Enough to
    // exercise speed pickup, the banked turn, and terrain recovery.
    let mut timer = FrameTimer::new();
    let mut collisions = 0u32;
    let dt = 1.0 / 60.0;
    for tick in 0..ticks {
        timer.tick();
        let t = tick as f32 * dt;
        let input = if t < 3.0 {
            ControlInput::new(0.0, -0.6)
        } else {
            ControlInput::new(0.7, (t * 0.5).sin() * 0.3)
        };
        if body.update(input, dt, pipeline.field()) == FlightEvent::Collided {
            collisions += 1;
        }
        if tick % 120 == 0 {
            let state = body.state();
            log::info!(
                "tick {:4}: pos ({:7.1}, {:6.1}, {:7.1}) speed {:4.1} yaw {:5.2}",
                tick, state.position.x, state.position.y, state.position.z,
                state.speed, state.yaw
            );
        }
    }

    let segments: usize = scene.trees.iter().map(|t| t.skeleton.segment_count()).sum();
    let placed = scene.vegetation.iter().filter(|i| !i.is_degenerate()).count();

    println!();
    println!("=== Demo Complete ===");
    println!("Terrain:    {} vertices, {} triangles",
        scene.terrain.vertex_count(), scene.terrain.triangle_count());
    println!("Vegetation: {} of {} slots placed", placed, scene.vegetation.len());
    println!("Trees:      {} ({} branch segments)", scene.trees.len(), segments);
    println!("Flight:     {} ticks, {} terrain recoveries", ticks, collisions);
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.clone())
}
