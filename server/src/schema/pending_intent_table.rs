use motion_relay::PendingIntent as QueuedIntent;
use spacetimedb::*;

/// Intent queued for an actor's next simulation step.
///
/// Private: only the module reads it. One row per live actor, keyed by `actor_id`.
#[table(name = pending_intent)]
pub struct PendingIntent {
    #[primary_key]
    pub actor_id: u64,

    /// Clamped horizontal axis in [-1, 1].
    pub horizontal: f32,
    /// Set by any accepted jump press, cleared when a grounded step consumes it.
    pub jump_queued: bool,

    /// Last accepted intent sequence number from the controller.
    pub last_seq: Option<u16>,
}

impl PendingIntent {
    pub fn neutral(actor_id: u64) -> Self {
        Self {
            actor_id,
            horizontal: 0.0,
            jump_queued: false,
            last_seq: None,
        }
    }

    pub fn queued(&self) -> QueuedIntent {
        QueuedIntent {
            horizontal: self.horizontal,
            jump_queued: self.jump_queued,
        }
    }

    pub fn set_queued(&mut self, queued: &QueuedIntent) {
        self.horizontal = queued.horizontal;
        self.jump_queued = queued.jump_queued;
    }
}
