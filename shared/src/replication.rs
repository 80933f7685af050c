//! Authority → observer state replication.

use std::collections::HashMap;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::{ActorId, actor::ActorState};

/// State of one actor after a completed step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub actor_id: ActorId,
    /// Number of steps the authority has completed for this actor.
    pub tick: u32,
    pub position: Point2<f32>,
    pub velocity: Vector2<f32>,
    pub grounded: bool,
}

impl ActorSnapshot {
    pub fn new(actor_id: ActorId, tick: u32, state: &ActorState) -> Self {
        Self {
            actor_id,
            tick,
            position: state.position,
            velocity: state.velocity,
            grounded: state.grounded,
        }
    }

    pub fn state(&self) -> ActorState {
        ActorState {
            position: self.position,
            velocity: self.velocity,
            grounded: self.grounded,
        }
    }

    /// Is `self` newer than `other`? Ticks wrap; anything up to half the range ahead is newer.
    pub fn is_newer_than(&self, other: &ActorSnapshot) -> bool {
        let delta = self.tick.wrapping_sub(other.tick);
        delta != 0 && delta <= u32::MAX / 2
    }
}

/// Outbound replication channel.
pub trait ReplicationSink {
    /// Publishes a committed snapshot. Must not block.
    fn publish(&mut self, snapshot: ActorSnapshot);

    /// The actor no longer exists on the authority.
    fn retract(&mut self, actor_id: ActorId) {
        let _ = actor_id;
    }
}

/// Keeps every published snapshot; handy for hosts that batch snapshots per tick.
#[derive(Debug, Default)]
pub struct SnapshotLog {
    pub published: Vec<ActorSnapshot>,
    pub retracted: Vec<ActorId>,
}

impl ReplicationSink for SnapshotLog {
    fn publish(&mut self, snapshot: ActorSnapshot) {
        self.published.push(snapshot);
    }

    fn retract(&mut self, actor_id: ActorId) {
        self.retracted.push(actor_id);
    }
}

/// Message carried by [`snapshot_channel`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReplicationEvent {
    Updated(ActorSnapshot),
    Removed(ActorId),
}

/// Sending half of a replication channel.
#[derive(Clone, Debug)]
pub struct SnapshotSender {
    tx: Sender<ReplicationEvent>,
}

impl ReplicationSink for SnapshotSender {
    fn publish(&mut self, snapshot: ActorSnapshot) {
        if self.tx.send(ReplicationEvent::Updated(snapshot)).is_err() {
            log::warn!(
                "replication receiver dropped; snapshot for actor {} discarded",
                snapshot.actor_id
            );
        }
    }

    fn retract(&mut self, actor_id: ActorId) {
        if self.tx.send(ReplicationEvent::Removed(actor_id)).is_err() {
            log::warn!("replication receiver dropped; removal of actor {actor_id} discarded");
        }
    }
}

/// Unbounded replication channel. Publishing never blocks the authority's tick.
pub fn snapshot_channel() -> (SnapshotSender, Receiver<ReplicationEvent>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (SnapshotSender { tx }, rx)
}

/// Observer-side, read-only view of replicated actors.
#[derive(Debug, Default)]
pub struct ReplicaView {
    actors: HashMap<ActorId, ActorSnapshot>,
}

impl ReplicaView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `snapshot` unless an equal or newer one is already held.
    /// Returns whether the view changed.
    pub fn apply(&mut self, snapshot: ActorSnapshot) -> bool {
        match self.actors.get(&snapshot.actor_id) {
            Some(current) if !snapshot.is_newer_than(current) => false,
            _ => {
                self.actors.insert(snapshot.actor_id, snapshot);
                true
            }
        }
    }

    pub fn apply_event(&mut self, event: ReplicationEvent) -> bool {
        match event {
            ReplicationEvent::Updated(snapshot) => self.apply(snapshot),
            ReplicationEvent::Removed(actor_id) => self.actors.remove(&actor_id).is_some(),
        }
    }

    /// Applies everything currently queued on `rx` without blocking.
    /// Returns the number of events that changed the view.
    pub fn drain(&mut self, rx: &Receiver<ReplicationEvent>) -> usize {
        let mut changed = 0;
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    if self.apply_event(event) {
                        changed += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    pub fn get(&self, actor_id: ActorId) -> Option<&ActorSnapshot> {
        self.actors.get(&actor_id)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
