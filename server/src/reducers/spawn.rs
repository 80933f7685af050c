use crate::{schema::*, types::DbVec2};
use motion_relay::{ActorConfig, RelayError};
use spacetimedb::{ReducerContext, Table};

/// Spawn an actor at `(x, y)` controlled by the caller.
///
/// Each identity controls at most one actor. Tunables come from `ActorConfig::default()`
/// and are fixed for the actor's lifetime.
#[spacetimedb::reducer]
pub fn spawn_actor(ctx: &ReducerContext, x: f32, y: f32) -> Result<(), String> {
    if let Some(existing) = ctx.db.actor().controller().filter(&ctx.sender).next() {
        return Err(RelayError::AlreadyExists {
            actor_id: existing.id,
        }
        .to_string());
    }
    if !(x.is_finite() && y.is_finite()) {
        return Err(RelayError::InvalidConfig("spawn position must be finite".into()).to_string());
    }

    let config = ActorConfig::default();
    config.validate().map_err(|e| e.to_string())?;

    let actor = ctx.db.actor().insert(Actor {
        id: 0,
        controller: ctx.sender,
        position: DbVec2::new(x, y),
        velocity: DbVec2::ZERO,
        grounded: false,
        tick: 0,
        move_speed: config.move_speed,
        jump_speed: config.jump_speed,
        probe_offset: config.probe_offset.into(),
        probe_radius: config.probe_radius,
        ground_layers: config.ground_layers.bits,
        capsule_radius: config.capsule_radius,
        capsule_half_height: config.capsule_half_height,
    });
    ctx.db.pending_intent().insert(PendingIntent::neutral(actor.id));

    log::info!("Spawned actor {} for {:?}", actor.id, ctx.sender);
    Ok(())
}

/// Despawn an actor. Only its controller (or the module itself) may do so.
#[spacetimedb::reducer]
pub fn despawn_actor(ctx: &ReducerContext, actor_id: u64) -> Result<(), String> {
    let Some(actor) = ctx.db.actor().id().find(actor_id) else {
        return Err(RelayError::NotFound { actor_id }.to_string());
    };
    if actor.controller != ctx.sender && ctx.sender != ctx.identity() {
        return Err(RelayError::Unauthorized {
            actor_id,
            operation: "despawn_actor",
        }
        .to_string());
    }

    remove_actor(ctx, actor_id);
    Ok(())
}

/// Delete an actor and its queued intent.
pub(crate) fn remove_actor(ctx: &ReducerContext, actor_id: u64) {
    ctx.db.pending_intent().actor_id().delete(actor_id);
    if ctx.db.actor().id().delete(actor_id) {
        log::info!("Despawned actor {actor_id}");
    }
}
