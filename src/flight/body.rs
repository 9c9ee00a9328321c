//! Banked-turn flight model with height-field floor collision.
//!
//! One body, mutated in place by the single tick loop. Collision is a
//! normal, repeatedly occurring state correction, not an error: the body is
//! snapped above the obstruction and pitched up to break the dive, every
//! tick the condition holds.

use glam::Vec3;

use crate::core::types::Result;
use crate::core::Error;
use crate::terrain::height::HeightField;

/// Normalized control input, each axis in [-1, 1]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlInput {
    pub x: f32,
    pub y: f32,
}

impl ControlInput {
    pub const NEUTRAL: Self = Self { x: 0.0, y: 0.0 };

    /// Clamp raw pointer coordinates into the control range
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }
}

/// Gains and limits for the flight model
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FlightParams {
    pub pitch_gain: f32,     // input.y to target pitch (radians)
    pub roll_gain: f32,      // input.x to target roll (radians)
    pub response: f32,       // Exponential smoothing rate toward targets (1/s)
    pub turn_rate: f32,      // Roll to yaw rate (banked turn)
    pub speed_gain: f32,     // Pitch to speed change (dive gains, climb bleeds)
    pub min_speed: f32,
    pub max_speed: f32,
    pub clearance: f32,      // Minimum height kept above ground or water
    pub recovery_pitch: f32, // Climbing pitch forced on collision
    pub water_level: f32,    // The water plane is a floor too
}

impl Default for FlightParams {
    fn default() -> Self {
        Self {
            pitch_gain: 0.6,
            roll_gain: 0.9,
            response: 4.0,
            turn_rate: 1.2,
            speed_gain: 30.0,
            min_speed: 20.0,
            max_speed: 90.0,
            clearance: 2.0,
            recovery_pitch: 0.35,
            water_level: 20.0,
        }
    }
}

impl FlightParams {
    pub fn validate(&self) -> Result<()> {
        if self.min_speed <= 0.0 || self.min_speed >= self.max_speed {
            return Err(Error::Config(format!(
                "speed range [{}, {}] invalid", self.min_speed, self.max_speed
            )));
        }
        if self.clearance <= 0.0 {
            return Err(Error::Config("clearance must be positive".into()));
        }
        if self.recovery_pitch <= 0.0 {
            return Err(Error::Config("recovery_pitch must be a climbing angle".into()));
        }
        if self.response <= 0.0 {
            return Err(Error::Config("response must be positive".into()));
        }
        Ok(())
    }
}

/// Mutable simulation state. Created once per session, reset in place on
/// collision, never destroyed and recreated.
#[derive(Clone, Copy, Debug)]
pub struct FlightState {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
    pub speed: f32,
}

/// Outcome of one tick: collision is momentary and already resolved when it
/// is reported
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightEvent {
    Flying,
    Collided,
}

/// Flight body integrating the banked-turn model each tick
pub struct FlightBody {
    params: FlightParams,
    state: FlightState,
}

impl FlightBody {
    /// Create a body at a start position, cruising level
    pub fn new(params: FlightParams, start: Vec3) -> Self {
        let cruise = (params.min_speed + params.max_speed) * 0.5;
        Self {
            params,
            state: FlightState {
                position: start,
                pitch: 0.0,
                yaw: 0.0,
                roll: 0.0,
                speed: cruise,
            },
        }
    }

    pub fn params(&self) -> &FlightParams {
        &self.params
    }

    pub fn state(&self) -> &FlightState {
        &self.state
    }

    /// Forward unit vector from yaw-then-pitch. Roll never feeds into the
    /// heading, so banking alone does not skid the flight path.
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.state.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.state.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch)
    }

    /// Advance one tick. Queries the height field as the floor constraint;
    /// a body driven below `max(height, water_level) + clearance` is snapped
    /// up and pitched into a climb.
    pub fn update(&mut self, input: ControlInput, dt: f32, field: &HeightField) -> FlightEvent {
        let state = &mut self.state;

        // Smoothly approach target attitude from the control input
        let blend = 1.0 - (-self.params.response * dt).exp();
        let target_pitch = input.y * self.params.pitch_gain;
        let target_roll = -input.x * self.params.roll_gain;
        state.pitch += (target_pitch - state.pitch) * blend;
        state.roll += (target_roll - state.roll) * blend;

        // Banked turn: roll drives yaw rate
        state.yaw += -state.roll * self.params.turn_rate * dt;

        // Diving gains speed, climbing bleeds it
        state.speed = (state.speed - state.pitch.sin() * self.params.speed_gain * dt)
            .clamp(self.params.min_speed, self.params.max_speed);

        let forward = self.forward();
        self.state.position += forward * self.state.speed * dt;

        // Floor constraint from the shared height function
        let state = &mut self.state;
        let ground = field.height_at(state.position.x, state.position.z);
        let floor = ground.max(self.params.water_level);
        if state.position.y < floor + self.params.clearance {
            state.position.y = floor + self.params.clearance;
            state.pitch = self.params.recovery_pitch;
            return FlightEvent::Collided;
        }

        FlightEvent::Flying
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::height::HeightParams;

    const DT: f32 = 1.0 / 60.0;

    fn field() -> HeightField {
        HeightField::new(HeightParams::default())
    }

    fn body_at(position: Vec3) -> FlightBody {
        FlightBody::new(FlightParams::default(), position)
    }

    #[test]
    fn test_flight_params_validation() {
        assert!(FlightParams::default().validate().is_ok());
        assert!(FlightParams { min_speed: 100.0, max_speed: 50.0, ..Default::default() }
            .validate()
            .is_err());
        assert!(FlightParams { recovery_pitch: -0.1, ..Default::default() }
            .validate()
            .is_err());
        assert!(FlightParams { clearance: 0.0, ..Default::default() }
            .validate()
            .is_err());
    }

    #[test]
    fn test_below_ground_resolved_in_one_tick() {
        let field = field();
        let x = 800.0;
        let z = 800.0;
        let ground = field.height_at(x, z);

        let mut body = body_at(Vec3::new(x, ground - 10.0, z));
        let event = body.update(ControlInput::NEUTRAL, DT, &field);

        assert_eq!(event, FlightEvent::Collided);
        let state = body.state();
        let floor = field
            .height_at(state.position.x, state.position.z)
            .max(body.params().water_level);
        assert!(state.position.y > floor);
        assert!(state.pitch > 0.0, "recovery must force a climb");
    }

    #[test]
    fn test_water_is_a_floor_too() {
        let field = field();
        // Basin center: terrain is below the water plane there
        let ground = field.height_at(0.0, 0.0);
        let water = FlightParams::default().water_level;
        assert!(ground < water);

        let mut body = body_at(Vec3::new(0.0, ground + 1.0, 0.0));
        body.update(ControlInput::NEUTRAL, DT, &field);

        assert!(body.state().position.y > water);
    }

    #[test]
    fn test_repeated_dive_bounces() {
        let field = field();
        let mut body = body_at(Vec3::new(500.0, 120.0, 500.0));

        // Hold full dive; the body must keep bouncing, never stuck below
        let dive = ControlInput::new(0.0, -1.0);
        let mut collisions = 0;
        for _ in 0..600 {
            if body.update(dive, DT, &field) == FlightEvent::Collided {
                collisions += 1;
            }
            let state = body.state();
            let floor = field
                .height_at(state.position.x, state.position.z)
                .max(body.params().water_level);
            assert!(state.position.y > floor, "body stuck below the floor");
        }
        assert!(collisions > 0, "a sustained dive must hit the ground");
    }

    #[test]
    fn test_pitch_approaches_target() {
        let field = field();
        let mut body = body_at(Vec3::new(0.0, 500.0, 0.0));
        let params = body.params().clone();

        // Hold full climb high above terrain; pitch converges to the gain
        let climb = ControlInput::new(0.0, 1.0);
        for _ in 0..300 {
            body.update(climb, DT, &field);
        }
        assert!((body.state().pitch - params.pitch_gain).abs() < 0.01);
    }

    #[test]
    fn test_banked_turn_changes_yaw() {
        let field = field();
        let mut body = body_at(Vec3::new(0.0, 500.0, 0.0));

        let bank = ControlInput::new(1.0, 0.2);
        for _ in 0..120 {
            body.update(bank, DT, &field);
        }
        // input.x = 1 rolls negative; yaw rate = -roll * k is positive
        assert!(body.state().roll < 0.0);
        assert!(body.state().yaw > 0.0);
    }

    #[test]
    fn test_speed_clamped() {
        let field = field();
        let params = FlightParams::default();

        let mut diver = body_at(Vec3::new(0.0, 3000.0, 0.0));
        // Point far above terrain and dive: speed saturates at max.
        // Height is clamped to height_scale, so 3000 gives a long fall.
        for _ in 0..2000 {
            diver.update(ControlInput::new(0.0, -1.0), DT, &field);
            if diver.state().position.y < 400.0 {
                break;
            }
        }
        assert!(diver.state().speed <= params.max_speed);
        assert!(diver.state().speed > params.min_speed);

        let mut climber = body_at(Vec3::new(0.0, 500.0, 0.0));
        for _ in 0..2000 {
            climber.update(ControlInput::new(0.0, 1.0), DT, &field);
        }
        assert_eq!(climber.state().speed, params.min_speed);
    }

    #[test]
    fn test_forward_is_unit_and_ignores_roll() {
        let field = field();
        let mut body = body_at(Vec3::new(0.0, 500.0, 0.0));

        let before = body.forward();
        assert!((before.length() - 1.0).abs() < 1e-5);

        // Rolling hard for one tick barely moves pitch/yaw; forward must not
        // pick up a roll component directly
        body.update(ControlInput::new(1.0, 0.0), DT, &field);
        let after = body.forward();
        assert!((after.length() - 1.0).abs() < 1e-5);
        assert!(before.dot(after) > 0.99);
    }

    #[test]
    fn test_update_deterministic() {
        let field = field();
        let mut a = body_at(Vec3::new(100.0, 200.0, 100.0));
        let mut b = body_at(Vec3::new(100.0, 200.0, 100.0));

        let input = ControlInput::new(0.3, -0.2);
        for _ in 0..100 {
            a.update(input, DT, &field);
            b.update(input, DT, &field);
        }
        assert_eq!(a.state().position, b.state().position);
        assert_eq!(a.state().yaw, b.state().yaw);
    }
}
