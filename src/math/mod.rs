//! Math utilities: deterministic noise and generation RNG

pub mod noise;
pub mod rng;

pub use noise::{FractalNoise, ValueNoise};
pub use rng::SimpleRng;
