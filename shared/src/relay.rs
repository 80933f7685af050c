//! The authoritative motion relay.
//!
//! One `MotionRelay` runs per process. On the authority it owns every actor's
//! [`ActorBody`], applies intents and steps the simulation; on observers it only tracks
//! who controls which actor, forwards the local controller's intents and keeps the latest
//! replicated snapshots.

use std::{collections::HashMap, time::Duration};

use nalgebra::Point2;

use crate::{
    actor::{ActorBody, ActorId},
    authority::{AuthorityToken, PeerId, Role},
    config::{ActorConfig, RelayConfig},
    error::RelayError,
    ground::GroundProbe,
    integrator::Integrator,
    intent::{Intent, IntentMessage},
    replication::{ActorSnapshot, ReplicationSink},
    sequence::{IntentSeq, SequenceGate},
    session::{SessionEvent, SessionObserver},
    ticker::FixedTicker,
    transport::IntentSink,
};

/// Authority-side record of one actor.
struct AuthoritativeActor {
    controller: PeerId,
    body: ActorBody,
    gate: SequenceGate,
}

/// Observer-side record of one actor.
struct ReplicaActor {
    controller: PeerId,
    latest: Option<ActorSnapshot>,
}

enum ActorSlot {
    Authoritative(AuthoritativeActor),
    Replica(ReplicaActor),
}

impl ActorSlot {
    fn controller(&self) -> PeerId {
        match self {
            ActorSlot::Authoritative(a) => a.controller,
            ActorSlot::Replica(r) => r.controller,
        }
    }
}

/// Physics collaborators the authority steps actors with.
pub struct Physics {
    pub ground: Box<dyn GroundProbe>,
    pub integrator: Box<dyn Integrator>,
}

impl Physics {
    pub fn new(ground: impl GroundProbe + 'static, integrator: impl Integrator + 'static) -> Self {
        Self {
            ground: Box::new(ground),
            integrator: Box::new(integrator),
        }
    }
}

pub struct MotionRelay {
    local_peer: PeerId,
    authority: Option<AuthorityToken>,
    physics: Option<Physics>,
    actors: HashMap<ActorId, ActorSlot>,
    next_seq: HashMap<ActorId, IntentSeq>,
    intents_out: Box<dyn IntentSink>,
    replication: Box<dyn ReplicationSink>,
    ticker: FixedTicker,
}

impl MotionRelay {
    /// Creates the authoritative relay. This is the only way to obtain authority.
    pub fn authority(
        local_peer: PeerId,
        config: &RelayConfig,
        physics: Physics,
        replication: impl ReplicationSink + 'static,
    ) -> Result<Self, RelayError> {
        config.validate()?;
        log::info!("motion relay started as authority (peer {local_peer})");
        Ok(Self {
            local_peer,
            authority: Some(AuthorityToken::grant()),
            physics: Some(physics),
            actors: HashMap::new(),
            next_seq: HashMap::new(),
            intents_out: Box::new(crate::transport::NullSink),
            replication: Box::new(replication),
            ticker: FixedTicker::new(config),
        })
    }

    /// Creates an observer relay that forwards local intents through `intents_out`.
    pub fn observer(
        local_peer: PeerId,
        config: &RelayConfig,
        intents_out: impl IntentSink + 'static,
    ) -> Result<Self, RelayError> {
        config.validate()?;
        log::info!("motion relay started as observer (peer {local_peer})");
        Ok(Self {
            local_peer,
            authority: None,
            physics: None,
            actors: HashMap::new(),
            next_seq: HashMap::new(),
            intents_out: Box::new(intents_out),
            replication: Box::new(crate::replication::SnapshotLog::default()),
            ticker: FixedTicker::new(config),
        })
    }

    pub fn role(&self) -> Role {
        if self.authority.is_some() {
            Role::Authority
        } else {
            Role::Observer
        }
    }

    pub fn local_peer(&self) -> PeerId {
        self.local_peer
    }

    pub fn contains(&self, actor_id: ActorId) -> bool {
        self.actors.contains_key(&actor_id)
    }

    pub fn controller_of(&self, actor_id: ActorId) -> Result<PeerId, RelayError> {
        self.slot(actor_id).map(ActorSlot::controller)
    }

    fn slot(&self, actor_id: ActorId) -> Result<&ActorSlot, RelayError> {
        self.actors
            .get(&actor_id)
            .ok_or(RelayError::NotFound { actor_id })
    }

    fn require_authority(
        &self,
        actor_id: ActorId,
        operation: &'static str,
    ) -> Result<&AuthorityToken, RelayError> {
        self.authority
            .as_ref()
            .ok_or_else(|| RelayError::unauthorized(actor_id, operation))
    }

    fn authoritative_mut(
        &mut self,
        actor_id: ActorId,
        operation: &'static str,
    ) -> Result<&mut AuthoritativeActor, RelayError> {
        self.require_authority(actor_id, operation)?;
        match self.actors.get_mut(&actor_id) {
            Some(ActorSlot::Authoritative(actor)) => Ok(actor),
            // An authority never stores replicas, but do not trust that blindly.
            Some(ActorSlot::Replica(_)) => Err(RelayError::unauthorized(actor_id, operation)),
            None => Err(RelayError::NotFound { actor_id }),
        }
    }

    /// Spawns an actor on the authority and publishes its initial state.
    pub fn spawn_actor(
        &mut self,
        actor_id: ActorId,
        controller: PeerId,
        config: ActorConfig,
        position: Point2<f32>,
    ) -> Result<ActorSnapshot, RelayError> {
        self.require_authority(actor_id, "spawn_actor")?;
        config.validate()?;
        if self.actors.contains_key(&actor_id) {
            return Err(RelayError::AlreadyExists { actor_id });
        }

        let body = ActorBody::new(config, position);
        let snapshot = ActorSnapshot::new(actor_id, body.tick(), body.state());
        self.actors.insert(
            actor_id,
            ActorSlot::Authoritative(AuthoritativeActor {
                controller,
                body,
                gate: SequenceGate::default(),
            }),
        );
        log::info!("spawned actor {actor_id} controlled by peer {controller}");
        self.replication.publish(snapshot);
        Ok(snapshot)
    }

    /// Registers a replicated actor on an observer.
    pub fn track_actor(&mut self, actor_id: ActorId, controller: PeerId) -> Result<(), RelayError> {
        if self.authority.is_some() {
            return Err(RelayError::unauthorized(actor_id, "track_actor"));
        }
        if self.actors.contains_key(&actor_id) {
            return Err(RelayError::AlreadyExists { actor_id });
        }
        self.actors.insert(
            actor_id,
            ActorSlot::Replica(ReplicaActor {
                controller,
                latest: None,
            }),
        );
        log::debug!("tracking actor {actor_id} controlled by peer {controller}");
        Ok(())
    }

    /// Removes an actor. On the authority, observers are told through replication.
    pub fn despawn_actor(&mut self, actor_id: ActorId) -> Result<(), RelayError> {
        let slot = self
            .actors
            .remove(&actor_id)
            .ok_or(RelayError::NotFound { actor_id })?;
        self.next_seq.remove(&actor_id);
        if let ActorSlot::Authoritative(_) = slot {
            self.replication.retract(actor_id);
        }
        log::info!("despawned actor {actor_id}");
        Ok(())
    }

    /// Sends the local controller's intent toward the authority.
    ///
    /// Only the actor's controller may submit. On an observer this only forwards; on an
    /// authority that also controls the actor the intent is applied directly.
    pub fn submit_intent(&mut self, actor_id: ActorId, intent: Intent) -> Result<(), RelayError> {
        let controller = self.controller_of(actor_id)?;
        if controller != self.local_peer {
            return Err(RelayError::unauthorized(actor_id, "submit_intent"));
        }

        let seq = self.next_seq.entry(actor_id).or_insert(0);
        let message = IntentMessage {
            actor_id,
            sender: self.local_peer,
            seq: *seq,
            intent,
        };
        *seq = seq.wrapping_add(1);

        if self.authority.is_some() {
            self.receive_intent(message).map(|_| ())
        } else {
            self.intents_out.send(message);
            Ok(())
        }
    }

    /// Authority-side inbound path for intents arriving from the transport.
    ///
    /// Returns `Ok(false)` when the message was a duplicate or arrived out of order.
    pub fn receive_intent(&mut self, message: IntentMessage) -> Result<bool, RelayError> {
        let actor_id = message.actor_id;
        let actor = self.authoritative_mut(actor_id, "receive_intent")?;

        if actor.controller != message.sender {
            log::warn!(
                "peer {} tried to drive actor {actor_id} owned by peer {}",
                message.sender,
                actor.controller
            );
            return Err(RelayError::unauthorized(actor_id, "receive_intent"));
        }

        if !actor.gate.accept(message.seq) {
            log::debug!("stale intent {} for actor {actor_id} dropped", message.seq);
            return Ok(false);
        }

        self.apply_intent(actor_id, message.intent)?;
        Ok(true)
    }

    /// Queues `intent` for the actor's next step. Authority only.
    pub fn apply_intent(&mut self, actor_id: ActorId, intent: Intent) -> Result<(), RelayError> {
        let actor = self.authoritative_mut(actor_id, "apply_intent")?;
        actor.body.apply_intent(intent);
        Ok(())
    }

    /// Runs one fixed step for one actor and publishes the result. Authority only.
    pub fn simulation_step(
        &mut self,
        actor_id: ActorId,
        dt: f32,
    ) -> Result<ActorSnapshot, RelayError> {
        self.require_authority(actor_id, "simulation_step")?;
        let physics = self
            .physics
            .as_ref()
            .ok_or_else(|| RelayError::unauthorized(actor_id, "simulation_step"))?;

        let actor = match self.actors.get_mut(&actor_id) {
            Some(ActorSlot::Authoritative(actor)) => actor,
            Some(ActorSlot::Replica(_)) => {
                return Err(RelayError::unauthorized(actor_id, "simulation_step"));
            }
            None => return Err(RelayError::NotFound { actor_id }),
        };

        let state = actor
            .body
            .step(physics.ground.as_ref(), physics.integrator.as_ref(), dt);
        let snapshot = ActorSnapshot::new(actor_id, actor.body.tick(), &state);
        self.replication.publish(snapshot);
        Ok(snapshot)
    }

    /// Steps every actor once, in ascending id order.
    pub fn step_all(&mut self, dt: f32) -> Result<Vec<ActorSnapshot>, RelayError> {
        if self.authority.is_none() {
            return Err(RelayError::NotAuthority {
                operation: "step_all",
            });
        }
        let mut ids: Vec<ActorId> = self.actors.keys().copied().collect();
        ids.sort_unstable();

        ids.into_iter()
            .map(|actor_id| self.simulation_step(actor_id, dt))
            .collect()
    }

    /// Feeds wall-clock time to the fixed ticker and runs every step that became due.
    /// Returns the number of fixed steps executed.
    pub fn advance(&mut self, elapsed: Duration) -> Result<u32, RelayError> {
        if self.authority.is_none() {
            return Err(RelayError::NotAuthority {
                operation: "advance",
            });
        }
        let due = self.ticker.accumulate(elapsed);
        let dt = self.ticker.step_seconds();
        for _ in 0..due {
            self.step_all(dt)?;
        }
        Ok(due)
    }

    /// Latest committed state of an actor (authority) or latest replicated state (observer).
    pub fn snapshot(&self, actor_id: ActorId) -> Result<Option<ActorSnapshot>, RelayError> {
        match self.slot(actor_id)? {
            ActorSlot::Authoritative(actor) => Ok(Some(ActorSnapshot::new(
                actor_id,
                actor.body.tick(),
                actor.body.state(),
            ))),
            ActorSlot::Replica(replica) => Ok(replica.latest),
        }
    }

    /// Observer-side: stores a replicated snapshot if it is newer than the one held.
    pub fn receive_snapshot(&mut self, snapshot: ActorSnapshot) -> Result<bool, RelayError> {
        let actor_id = snapshot.actor_id;
        match self.actors.get_mut(&actor_id) {
            Some(ActorSlot::Replica(replica)) => {
                let newer = replica
                    .latest
                    .as_ref()
                    .is_none_or(|current| snapshot.is_newer_than(current));
                if newer {
                    replica.latest = Some(snapshot);
                }
                Ok(newer)
            }
            // The authority's own state is the source of truth; never overwrite it.
            Some(ActorSlot::Authoritative(_)) => {
                Err(RelayError::unauthorized(actor_id, "receive_snapshot"))
            }
            None => Err(RelayError::NotFound { actor_id }),
        }
    }

    pub fn actor_ids(&self) -> Vec<ActorId> {
        let mut ids: Vec<ActorId> = self.actors.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl SessionObserver for MotionRelay {
    fn on_state_changed(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::PeerConnected(peer) => {
                log::info!("peer {peer} connected");
            }
            SessionEvent::PeerDisconnected(peer) => {
                log::info!("peer {peer} disconnected");
                for slot in self.actors.values_mut() {
                    if let ActorSlot::Authoritative(actor) = slot {
                        if actor.controller == peer {
                            // Stale input must not keep driving the actor.
                            actor.body.clear_intent();
                            actor.gate.reset();
                        }
                    }
                }
            }
            SessionEvent::ActorDespawned(actor_id) => {
                if self.despawn_actor(actor_id).is_err() {
                    log::debug!("despawn of unknown actor {actor_id} ignored");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ground::{FlatGround, NoGround},
        integrator::{BallisticIntegrator, FrozenIntegrator},
        replication::SnapshotLog,
        transport::intent_channel,
    };
    use std::{cell::Cell, rc::Rc};

    const SERVER: PeerId = 1;
    const CLIENT: PeerId = 2;
    const OTHER: PeerId = 3;

    /// Ground that tests can switch on and off between steps.
    #[derive(Clone, Default)]
    struct Switch(Rc<Cell<bool>>);

    impl GroundProbe for Switch {
        fn overlaps_ground(
            &self,
            _center: Point2<f32>,
            _radius: f32,
            _layers: crate::bitmask_flags::LayerMask,
        ) -> bool {
            self.0.get()
        }
    }

    fn actor_config() -> ActorConfig {
        ActorConfig {
            move_speed: 6.0,
            jump_speed: 12.0,
            ..ActorConfig::default()
        }
    }

    fn authority_with(ground: impl GroundProbe + 'static) -> MotionRelay {
        let mut relay = MotionRelay::authority(
            SERVER,
            &RelayConfig::default(),
            Physics::new(ground, FrozenIntegrator),
            SnapshotLog::default(),
        )
        .unwrap();
        relay
            .spawn_actor(7, CLIENT, actor_config(), Point2::new(0.0, 0.5))
            .unwrap();
        relay
    }

    fn message(seq: IntentSeq, horizontal: f32, jump: bool) -> IntentMessage {
        IntentMessage {
            actor_id: 7,
            sender: CLIENT,
            seq,
            intent: Intent::new(horizontal, jump),
        }
    }

    #[test]
    fn clamps_horizontal_intent() {
        let mut relay = authority_with(NoGround);
        relay.apply_intent(7, Intent::new(2.0, false)).unwrap();
        let snapshot = relay.simulation_step(7, 0.02).unwrap();
        assert_eq!(snapshot.velocity.x, 6.0);
    }

    #[test]
    fn last_sample_wins_before_step() {
        let mut relay = authority_with(NoGround);
        relay.receive_intent(message(0, 0.5, false)).unwrap();
        relay.receive_intent(message(1, -0.3, false)).unwrap();
        let snapshot = relay.simulation_step(7, 0.02).unwrap();
        assert!((snapshot.velocity.x - (-0.3 * 6.0)).abs() < 1.0e-6);
    }

    #[test]
    fn queued_jump_persists_until_grounded() {
        let ground = Switch::default();
        let config = RelayConfig::default();
        let mut relay = MotionRelay::authority(
            SERVER,
            &config,
            Physics::new(ground.clone(), BallisticIntegrator::from_config(&config)),
            SnapshotLog::default(),
        )
        .unwrap();
        relay
            .spawn_actor(7, CLIENT, actor_config(), Point2::new(0.0, 5.0))
            .unwrap();

        relay.apply_intent(7, Intent::new(0.0, true)).unwrap();
        relay.apply_intent(7, Intent::new(0.0, false)).unwrap();
        for _ in 0..3 {
            let snapshot = relay.simulation_step(7, 0.02).unwrap();
            assert!(!snapshot.grounded);
            assert!(snapshot.velocity.y < 0.0);
        }

        ground.0.set(true);
        let snapshot = relay.simulation_step(7, 0.02).unwrap();
        assert!(snapshot.grounded);
        assert_eq!(snapshot.velocity.y, 12.0);

        // Consumed: gravity acts on the next grounded step instead of a second jump.
        let snapshot = relay.simulation_step(7, 0.02).unwrap();
        assert!(snapshot.velocity.y < 12.0);
    }

    #[test]
    fn observer_cannot_apply_intent() {
        let mut relay =
            MotionRelay::observer(CLIENT, &RelayConfig::default(), crate::transport::NullSink)
                .unwrap();
        relay.track_actor(7, CLIENT).unwrap();

        let err = relay.apply_intent(7, Intent::new(1.0, true)).unwrap_err();
        assert_eq!(
            err,
            RelayError::Unauthorized {
                actor_id: 7,
                operation: "apply_intent"
            }
        );
        assert!(relay.simulation_step(7, 0.02).is_err());
        assert_eq!(relay.snapshot(7).unwrap(), None);
    }

    #[test]
    fn unknown_actor_is_not_found() {
        let mut relay = authority_with(NoGround);
        assert_eq!(
            relay.submit_intent(404, Intent::new(1.0, false)),
            Err(RelayError::NotFound { actor_id: 404 })
        );
        assert_eq!(
            relay.apply_intent(404, Intent::new(1.0, false)),
            Err(RelayError::NotFound { actor_id: 404 })
        );
    }

    #[test]
    fn only_the_controller_may_submit() {
        // The authority is not the controller of actor 7.
        let mut relay = authority_with(NoGround);
        assert!(matches!(
            relay.submit_intent(7, Intent::new(1.0, false)),
            Err(RelayError::Unauthorized { .. })
        ));

        let forged = IntentMessage {
            sender: OTHER,
            ..message(0, 1.0, false)
        };
        assert!(relay.receive_intent(forged).is_err());
        let snapshot = relay.simulation_step(7, 0.02).unwrap();
        assert_eq!(snapshot.velocity.x, 0.0);
    }

    #[test]
    fn stale_intents_are_dropped() {
        let mut relay = authority_with(NoGround);
        assert_eq!(relay.receive_intent(message(5, 0.2, false)), Ok(true));
        assert_eq!(relay.receive_intent(message(4, 1.0, false)), Ok(false));
        assert_eq!(relay.receive_intent(message(5, 1.0, false)), Ok(false));

        let snapshot = relay.simulation_step(7, 0.02).unwrap();
        assert!((snapshot.velocity.x - 1.2).abs() < 1.0e-6);
    }

    #[test]
    fn observer_forwards_without_local_effect() {
        let (tx, rx) = intent_channel();
        let mut relay = MotionRelay::observer(CLIENT, &RelayConfig::default(), tx).unwrap();
        relay.track_actor(7, CLIENT).unwrap();

        relay.submit_intent(7, Intent::new(0.5, true)).unwrap();
        relay.submit_intent(7, Intent::new(-0.5, false)).unwrap();

        let sent: Vec<IntentMessage> = rx.try_iter().collect();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].seq, 0);
        assert_eq!(sent[1].seq, 1);
        assert_eq!(sent[0].sender, CLIENT);
        assert_eq!(relay.snapshot(7).unwrap(), None);
    }

    #[test]
    fn host_controller_applies_locally() {
        let mut relay = MotionRelay::authority(
            SERVER,
            &RelayConfig::default(),
            Physics::new(FlatGround::new(0.0), FrozenIntegrator),
            SnapshotLog::default(),
        )
        .unwrap();
        relay
            .spawn_actor(1, SERVER, actor_config(), Point2::new(0.0, 0.5))
            .unwrap();

        relay.submit_intent(1, Intent::new(1.0, true)).unwrap();
        let snapshot = relay.simulation_step(1, 0.02).unwrap();
        assert_eq!(snapshot.velocity.x, 6.0);
        assert_eq!(snapshot.velocity.y, 12.0);
        assert!(snapshot.grounded);
    }

    #[test]
    fn duplicate_spawn_is_rejected() {
        let mut relay = authority_with(NoGround);
        assert_eq!(
            relay.spawn_actor(7, CLIENT, actor_config(), Point2::origin()),
            Err(RelayError::AlreadyExists { actor_id: 7 })
        );
    }

    #[test]
    fn invalid_actor_config_is_rejected() {
        let mut relay = authority_with(NoGround);
        let config = ActorConfig {
            probe_radius: -1.0,
            ..actor_config()
        };
        assert!(matches!(
            relay.spawn_actor(8, CLIENT, config, Point2::origin()),
            Err(RelayError::InvalidConfig(_))
        ));
        assert!(!relay.contains(8));
    }

    #[test]
    fn disconnect_clears_pending_intent() {
        let mut relay = authority_with(FlatGround::new(0.0));
        relay.receive_intent(message(0, 1.0, true)).unwrap();

        relay.on_state_changed(SessionEvent::PeerDisconnected(CLIENT));
        let snapshot = relay.simulation_step(7, 0.02).unwrap();
        assert_eq!(snapshot.velocity.x, 0.0);
        assert_eq!(snapshot.velocity.y, 0.0);

        // A reconnecting controller starts a fresh sequence.
        assert_eq!(relay.receive_intent(message(0, 0.5, false)), Ok(true));
    }

    #[test]
    fn despawn_event_removes_actor() {
        let mut relay = authority_with(NoGround);
        relay.on_state_changed(SessionEvent::ActorDespawned(7));
        assert!(!relay.contains(7));
        assert_eq!(
            relay.simulation_step(7, 0.02),
            Err(RelayError::NotFound { actor_id: 7 })
        );
    }

    #[test]
    fn observer_cannot_step_the_whole_relay() {
        let mut relay =
            MotionRelay::observer(CLIENT, &RelayConfig::default(), crate::transport::NullSink)
                .unwrap();
        assert_eq!(
            relay.step_all(0.02),
            Err(RelayError::NotAuthority {
                operation: "step_all"
            })
        );
        assert_eq!(
            relay.advance(Duration::from_millis(100)),
            Err(RelayError::NotAuthority { operation: "advance" })
        );
    }

    #[test]
    fn unrepresentable_tick_rate_is_rejected_at_construction() {
        let config = RelayConfig {
            tick_rate_hz: 1.0e-30,
            ..RelayConfig::default()
        };
        assert!(matches!(
            MotionRelay::observer(CLIENT, &config, crate::transport::NullSink),
            Err(RelayError::InvalidConfig(_))
        ));
        assert!(matches!(
            MotionRelay::authority(
                SERVER,
                &config,
                Physics::new(NoGround, FrozenIntegrator),
                SnapshotLog::default(),
            ),
            Err(RelayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn advance_runs_due_fixed_steps() {
        let mut relay = authority_with(NoGround);
        relay.apply_intent(7, Intent::new(1.0, false)).unwrap();
        let steps = relay.advance(Duration::from_millis(45)).unwrap();
        assert_eq!(steps, 2);
        assert_eq!(relay.snapshot(7).unwrap().unwrap().tick, 2);
    }

    #[test]
    fn observer_keeps_newest_snapshot() {
        let mut relay =
            MotionRelay::observer(CLIENT, &RelayConfig::default(), crate::transport::NullSink)
                .unwrap();
        relay.track_actor(7, CLIENT).unwrap();

        let mut authority = authority_with(NoGround);
        let first = authority.simulation_step(7, 0.02).unwrap();
        let second = authority.simulation_step(7, 0.02).unwrap();

        assert_eq!(relay.receive_snapshot(second), Ok(true));
        assert_eq!(relay.receive_snapshot(first), Ok(false));
        assert_eq!(relay.snapshot(7).unwrap(), Some(second));
    }
}
