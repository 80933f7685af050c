use crate::types::*;
use motion_relay::{ActorConfig, ActorState, LayerMask};
use spacetimedb::*;

/// Authoritative actor state, replicated to every subscriber.
///
/// Only the simulation tick writes the motion fields (`position`, `velocity`, `grounded`,
/// `tick`). Clients never write this table; they send intents through `submit_intent`.
#[table(name = actor, public)]
pub struct Actor {
    #[primary_key]
    #[auto_inc]
    pub id: u64,

    /// Identity allowed to submit intents for this actor.
    #[index(btree)]
    pub controller: Identity,

    pub position: DbVec2,
    pub velocity: DbVec2,
    pub grounded: bool,

    /// Number of completed simulation steps; observers keep the highest one they saw.
    pub tick: u32,

    pub move_speed: f32,
    pub jump_speed: f32,
    pub probe_offset: DbVec2,
    pub probe_radius: f32,
    /// `SurfaceLayer` bits counted as ground.
    pub ground_layers: u32,
    pub capsule_radius: f32,
    pub capsule_half_height: f32,
}

impl Actor {
    pub fn config(&self) -> ActorConfig {
        ActorConfig {
            move_speed: self.move_speed,
            jump_speed: self.jump_speed,
            probe_offset: self.probe_offset.into(),
            probe_radius: self.probe_radius,
            ground_layers: LayerMask::new(self.ground_layers),
            capsule_radius: self.capsule_radius,
            capsule_half_height: self.capsule_half_height,
        }
    }

    pub fn state(&self) -> ActorState {
        ActorState {
            position: self.position.into(),
            velocity: self.velocity.into(),
            grounded: self.grounded,
        }
    }

    pub fn set_state(&mut self, state: &ActorState) {
        self.position = state.position.into();
        self.velocity = state.velocity.into();
        self.grounded = state.grounded;
    }
}
