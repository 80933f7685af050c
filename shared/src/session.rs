use crate::{ActorId, PeerId};

/// Connection/session lifecycle changes reported by the host's transport layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    PeerConnected(PeerId),
    /// The peer is gone; any intent it queued is stale.
    PeerDisconnected(PeerId),
    /// The host removed the actor (despawn, level change).
    ActorDespawned(ActorId),
}

/// Observer registered with the session/transport layer.
pub trait SessionObserver {
    fn on_state_changed(&mut self, event: SessionEvent);
}
