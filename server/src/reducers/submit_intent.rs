use crate::schema::*;
use motion_relay::{Intent, PendingIntent as QueuedIntent, RelayError, SequenceGate};
use spacetimedb::{ReducerContext, Table};

/// Queue an intent for the caller's actor.
///
/// The caller's identity must be the actor's controller. Intents whose `seq` is not newer
/// than the last accepted one are dropped without error (duplicates, late arrivals).
/// Nothing is simulated here: the next `simulation_tick_reducer` consumes the intent.
#[spacetimedb::reducer]
pub fn submit_intent(
    ctx: &ReducerContext,
    actor_id: u64,
    seq: u16,
    horizontal: f32,
    jump: bool,
) -> Result<(), String> {
    let Some(actor) = ctx.db.actor().id().find(actor_id) else {
        return Err(RelayError::NotFound { actor_id }.to_string());
    };
    if actor.controller != ctx.sender {
        log::warn!("{:?} tried to drive actor {actor_id}", ctx.sender);
        return Err(RelayError::Unauthorized {
            actor_id,
            operation: "submit_intent",
        }
        .to_string());
    }

    let mut row = ctx
        .db
        .pending_intent()
        .actor_id()
        .find(actor_id)
        .unwrap_or_else(|| PendingIntent::neutral(actor_id));

    let mut gate = SequenceGate::resume(row.last_seq);
    if !gate.accept(seq) {
        log::debug!("Stale intent {seq} for actor {actor_id} dropped");
        return Ok(());
    }

    let mut queued: QueuedIntent = row.queued();
    queued.merge(Intent::new(horizontal, jump));
    row.set_queued(&queued);
    row.last_seq = gate.last_accepted();

    upsert_pending_intent(ctx, row);
    Ok(())
}

pub(crate) fn upsert_pending_intent(ctx: &ReducerContext, row: PendingIntent) {
    if ctx.db.pending_intent().actor_id().find(row.actor_id).is_some() {
        ctx.db.pending_intent().actor_id().update(row);
    } else {
        ctx.db.pending_intent().insert(row);
    }
}
