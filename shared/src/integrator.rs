use crate::{
    actor::ActorState,
    config::{ActorConfig, RelayConfig},
};

/// The physics collaborator that moves a body between controller steps.
///
/// Implementations apply gravity/contacts and advance position. They must not touch the
/// grounded flag: the relay recomputes it from the ground probe right after integrating.
pub trait Integrator {
    fn integrate(&self, state: &mut ActorState, config: &ActorConfig, dt: f32);
}

/// Leaves the body exactly where it is.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrozenIntegrator;

impl Integrator for FrozenIntegrator {
    fn integrate(&self, _state: &mut ActorState, _config: &ActorConfig, _dt: f32) {}
}

/// Free flight: gravity plus position integration, no contacts.
#[derive(Clone, Copy, Debug)]
pub struct BallisticIntegrator {
    /// Positive magnitude, applied along -Y.
    pub gravity: f32,
    /// Negative; downward speed never exceeds this.
    pub terminal_fall_speed: f32,
}

impl BallisticIntegrator {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            gravity: config.gravity,
            terminal_fall_speed: config.terminal_fall_speed,
        }
    }
}

impl Integrator for BallisticIntegrator {
    fn integrate(&self, state: &mut ActorState, _config: &ActorConfig, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        // Semi-implicit Euler: v(t+dt) = v(t) - g*dt, then x(t+dt) = x(t) + v(t+dt)*dt
        state.velocity.y = advance_vertical_velocity(
            state.velocity.y,
            self.gravity,
            self.terminal_fall_speed,
            dt,
        );
        state.position += state.velocity * dt;
    }
}

/// Applies gravity to a vertical velocity, clamped to the terminal fall speed.
#[inline]
pub fn advance_vertical_velocity(vy: f32, gravity: f32, terminal_fall_speed: f32, dt: f32) -> f32 {
    let next = vy - gravity.max(0.0) * dt;
    if next < terminal_fall_speed {
        // A body already falling faster than terminal keeps its speed.
        terminal_fall_speed.min(vy)
    } else {
        next
    }
}
