//! Connection lifecycle reducers.
//!
//! Connecting does nothing beyond logging; actors are created by `spawn_actor`. A
//! disconnecting client's actors are despawned so stale input never drives them.

use crate::schema::*;
use spacetimedb::ReducerContext;

#[spacetimedb::reducer(client_connected)]
pub fn identity_connected(ctx: &ReducerContext) {
    log::info!("Client connected: {:?}", ctx.sender);
}

#[spacetimedb::reducer(client_disconnected)]
pub fn identity_disconnected(ctx: &ReducerContext) {
    log::info!("Client disconnected: {:?}", ctx.sender);

    let owned: Vec<u64> = ctx
        .db
        .actor()
        .controller()
        .filter(&ctx.sender)
        .map(|actor| actor.id)
        .collect();

    for actor_id in owned {
        super::spawn::remove_actor(ctx, actor_id);
    }
}
