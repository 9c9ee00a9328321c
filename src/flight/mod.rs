//! Forward-flight physics over the height field

pub mod body;

pub use body::{ControlInput, FlightBody, FlightEvent, FlightParams, FlightState};
