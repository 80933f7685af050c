//! Authoritative actor body and its per-tick controller step.
//!
//! An [`ActorBody`] only ever lives on the authority. The step works on a scratch copy of
//! the state and commits it in one assignment, so a step either happens completely or not
//! at all.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::{
    config::ActorConfig, ground::GroundProbe, integrator::Integrator, intent::Intent,
};

/// Identifier of a simulated actor.
pub type ActorId = u64;

/// Simulation state of one actor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    pub position: Point2<f32>,
    pub velocity: Vector2<f32>,
    pub grounded: bool,
}

impl ActorState {
    pub fn at_rest(position: Point2<f32>) -> Self {
        Self {
            position,
            velocity: Vector2::zeros(),
            grounded: false,
        }
    }
}

/// Intent queued for the next step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PendingIntent {
    /// Already clamped to [-1, 1].
    pub horizontal: f32,
    pub jump_queued: bool,
}

impl PendingIntent {
    /// Latest horizontal overwrites; jump requests accumulate until consumed.
    pub fn merge(&mut self, intent: Intent) {
        self.horizontal = intent.clamped_horizontal();
        self.jump_queued |= intent.jump;
    }
}

/// Authoritative simulation body of one actor.
#[derive(Clone, Debug)]
pub struct ActorBody {
    config: ActorConfig,
    state: ActorState,
    pending: PendingIntent,
    tick: u32,
}

impl ActorBody {
    pub fn new(config: ActorConfig, position: Point2<f32>) -> Self {
        Self {
            config,
            state: ActorState::at_rest(position),
            pending: PendingIntent::default(),
            tick: 0,
        }
    }

    /// Restores a body from persisted parts (e.g. database rows).
    pub fn from_parts(
        config: ActorConfig,
        state: ActorState,
        pending: PendingIntent,
        tick: u32,
    ) -> Self {
        Self {
            config,
            state,
            pending,
            tick,
        }
    }

    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    pub fn state(&self) -> &ActorState {
        &self.state
    }

    pub fn pending(&self) -> &PendingIntent {
        &self.pending
    }

    /// Number of completed steps.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn apply_intent(&mut self, intent: Intent) {
        self.pending.merge(intent);
    }

    /// Drops any queued input so the actor coasts to a stop on its next step.
    pub fn clear_intent(&mut self) {
        self.pending = PendingIntent::default();
    }

    /// Runs one fixed step and returns the committed state.
    ///
    /// Order:
    /// 0. the integrator advances the body with the previously committed velocity;
    /// 1. grounded is recomputed from the probe;
    /// 2. horizontal velocity follows the pending axis, vertical is left alone;
    /// 3. a queued jump is consumed and overrides vertical velocity only if grounded.
    pub fn step(
        &mut self,
        ground: &dyn GroundProbe,
        integrator: &dyn Integrator,
        dt: f32,
    ) -> ActorState {
        let dt = dt.max(0.0);
        let mut next = self.state;
        let mut pending = self.pending;

        // 0) External physics catches up to the start of this tick.
        integrator.integrate(&mut next, &self.config, dt);

        // 1) Grounded must be known before velocity changes: jump eligibility depends on it.
        let probe_center = next.position + self.config.probe_offset();
        next.grounded =
            ground.overlaps_ground(probe_center, self.config.probe_radius, self.config.ground_layers);

        // 2) Horizontal follows intent.
        next.velocity.x = pending.horizontal * self.config.move_speed;

        // 3) Jump resolution. Launch speed is exact, never additive.
        if pending.jump_queued {
            if next.grounded {
                pending.jump_queued = false;
                next.velocity.y = self.config.jump_speed;
            } else {
                log::trace!("jump held over: actor airborne");
            }
        }

        self.state = next;
        self.pending = pending;
        self.tick = self.tick.wrapping_add(1);
        next
    }
}
