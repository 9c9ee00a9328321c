//! Vegetation placement over the height field

pub mod scatter;

pub use scatter::{ScatterParams, VegetationInstance, VegetationScatterer};
