//! Aloft - procedural scenery and flight-toy generation core
//!
//! Deterministic generators that turn scalar noise fields into renderable
//! geometry (a terrain height field with biome-colored mesh, scattered
//! vegetation transforms, and recursive tree skeletons), plus a minimal
//! flight model that reads the same height field as its floor constraint.
//! Rendering is an external collaborator: everything here is plain data.

pub mod core;
pub mod math;
pub mod terrain;
pub mod vegetation;
pub mod tree;
pub mod flight;
pub mod scene;
