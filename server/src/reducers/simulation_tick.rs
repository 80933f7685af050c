//! Simulation tick: the authoritative fixed-rate step for every actor.
//!
//! Each invocation reads the actor rows and their queued intents, runs the shared
//! `ActorBody` step against the cached Rapier world, and writes the committed state back.
//! The `actor` table is the replication channel: subscribers see the new rows once the
//! reducer commits, never a half-applied step.

use crate::{
    reducers::submit_intent::upsert_pending_intent,
    schema::{actor, pending_intent, relay_settings, Actor, PendingIntent, RelaySettings},
    utils::{get_fixed_delta_time, get_variable_delta_time},
    world::static_query_world,
};
use motion_relay::{ActorBody, KinematicIntegrator};
use spacetimedb::{ReducerContext, ScheduleAt, Table, TimeDuration, Timestamp};

#[spacetimedb::table(
    name = simulation_tick_timer,
    scheduled(simulation_tick_reducer)
)]
pub struct SimulationTickTimer {
    #[primary_key]
    #[auto_inc]
    pub scheduled_id: u64,
    pub scheduled_at: ScheduleAt,
    pub last_tick: Timestamp,
}

pub fn init_simulation_tick(ctx: &ReducerContext, settings: &RelaySettings) {
    let interval = TimeDuration::from_micros((1_000_000.0 / settings.tick_rate_hz) as i64);
    ctx.db.simulation_tick_timer().scheduled_id().delete(1);
    ctx.db.simulation_tick_timer().insert(SimulationTickTimer {
        scheduled_id: 1,
        scheduled_at: ScheduleAt::Interval(interval),
        last_tick: ctx.timestamp,
    });
}

#[spacetimedb::reducer]
fn simulation_tick_reducer(
    ctx: &ReducerContext,
    mut timer: SimulationTickTimer,
) -> Result<(), String> {
    // Only the module identity may invoke scheduled reducers.
    if ctx.sender != ctx.identity() {
        return Err("`simulation_tick_reducer` may not be invoked by clients.".into());
    }

    let Some(settings) = ctx.db.relay_settings().id().find(1) else {
        return Err("`simulation_tick_reducer` couldn't find relay settings.".into());
    };
    let config = settings.relay_config();
    config.validate().map_err(|e| e.to_string())?;

    let fixed_dt =
        get_fixed_delta_time(timer.scheduled_at.clone()).unwrap_or(1.0 / settings.tick_rate_hz);
    if let Some(real_dt) = get_variable_delta_time(ctx.timestamp, timer.last_tick) {
        if real_dt > settings.max_delta_seconds {
            log::warn!("Simulation tick late by {real_dt}s; backlog dropped");
        }
    }

    let world = static_query_world(ctx);
    let integrator = KinematicIntegrator::new(world.clone(), &config)
        .with_controller(settings.character_controller());

    let mut actors: Vec<Actor> = ctx.db.actor().iter().collect();
    actors.sort_by_key(|actor| actor.id);

    for mut actor in actors {
        let mut pending = ctx
            .db
            .pending_intent()
            .actor_id()
            .find(actor.id)
            .unwrap_or_else(|| PendingIntent::neutral(actor.id));

        let mut body =
            ActorBody::from_parts(actor.config(), actor.state(), pending.queued(), actor.tick);
        let state = body.step(world.as_ref(), &integrator, fixed_dt);

        actor.set_state(&state);
        actor.tick = body.tick();
        pending.set_queued(body.pending());

        ctx.db.actor().id().update(actor);
        upsert_pending_intent(ctx, pending);
    }

    timer.last_tick = ctx.timestamp;
    ctx.db.simulation_tick_timer().scheduled_id().update(timer);
    Ok(())
}
