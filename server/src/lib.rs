mod reducers {
    mod connection;
    pub mod simulation_tick;
    pub mod spawn;
    pub mod submit_intent;
}
pub mod schema;
pub mod types;
mod utils;
mod world;

use crate::schema::*;
use motion_relay::constants::{DEFAULT_TICK_HZ, GRAVITY, TERMINAL_FALL_SPEED};
use reducers::simulation_tick::init_simulation_tick;
use spacetimedb::*;

#[reducer(init)]
pub fn init(ctx: &ReducerContext) {
    ctx.db.relay_settings().id().delete(1);
    let settings = ctx.db.relay_settings().insert(RelaySettings {
        id: 1,
        tick_rate_hz: DEFAULT_TICK_HZ,
        max_delta_seconds: 0.25,
        gravity: GRAVITY,
        terminal_fall_speed: TERMINAL_FALL_SPEED,
        offset: 0.01,
        max_slope_climb_deg: 45.0,
        min_slope_slide_deg: 30.0,
        slide: true,
        normal_nudge_factor: 1.0e-4,
    });
    world::seed_default_level(ctx);
    init_simulation_tick(ctx, &settings);
}
