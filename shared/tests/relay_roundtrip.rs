use std::sync::Arc;

use motion_relay::{
    ActorConfig, ColliderShapeDef, Intent, IntentSampler, KinematicIntegrator, MotionRelay,
    Physics, RelayConfig, ReplicaView, StaticQueryWorld, SurfaceLayer, LayerMask,
    WorldStaticDef, intent_channel, snapshot_channel,
};
use nalgebra::{Point2, Vector2};

const SERVER: u64 = 1;
const CLIENT: u64 = 2;
const ACTOR: u64 = 10;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn floor_level() -> Arc<StaticQueryWorld> {
    Arc::new(StaticQueryWorld::build(vec![WorldStaticDef {
        id: 1,
        translation: Vector2::new(0.0, -0.5),
        rotation: 0.0,
        shape: ColliderShapeDef::Cuboid {
            half_extents: Vector2::new(50.0, 0.5),
        },
        layers: LayerMask::from_flags(&[SurfaceLayer::Ground]),
    }]))
}

fn actor_config() -> ActorConfig {
    ActorConfig {
        move_speed: 6.0,
        jump_speed: 12.0,
        ..ActorConfig::default()
    }
}

#[test]
fn controller_intent_reaches_observer_as_snapshot() {
    init_logging();
    let config = RelayConfig::default();
    let world = floor_level();

    let (snapshot_tx, snapshot_rx) = snapshot_channel();
    let mut server = MotionRelay::authority(
        SERVER,
        &config,
        Physics::new(world.clone(), KinematicIntegrator::new(world, &config)),
        snapshot_tx,
    )
    .unwrap();

    let (intent_tx, intent_rx) = intent_channel();
    let mut client = MotionRelay::observer(CLIENT, &config, intent_tx).unwrap();

    // Capsule bottom rests on the floor surface at y = 0.
    server
        .spawn_actor(ACTOR, CLIENT, actor_config(), Point2::new(0.0, 0.5))
        .unwrap();
    client.track_actor(ACTOR, CLIENT).unwrap();

    let mut sampler = IntentSampler::new();
    sampler.sample(1.0, true);
    client
        .submit_intent(ACTOR, sampler.take().unwrap())
        .unwrap();

    for message in intent_rx.try_iter() {
        assert!(server.receive_intent(message).unwrap());
    }
    let dt = config.fixed_dt().as_secs_f32();
    let stepped = server.simulation_step(ACTOR, dt).unwrap();
    assert!(stepped.grounded);
    assert!((stepped.velocity.x - 6.0).abs() < 1.0e-5);
    assert!((stepped.velocity.y - 12.0).abs() < 1.0e-5);

    let mut view = ReplicaView::new();
    // Spawn plus one step.
    assert_eq!(view.drain(&snapshot_rx), 2);
    let replicated = *view.get(ACTOR).unwrap();
    assert_eq!(replicated, stepped);
    assert!(client.receive_snapshot(replicated).unwrap());
    assert_eq!(client.snapshot(ACTOR).unwrap(), Some(stepped));
}

#[test]
fn observer_never_simulates() {
    init_logging();
    let config = RelayConfig::default();
    let (intent_tx, intent_rx) = intent_channel();
    let mut client = MotionRelay::observer(CLIENT, &config, intent_tx).unwrap();
    client.track_actor(ACTOR, CLIENT).unwrap();

    assert!(client.apply_intent(ACTOR, Intent::new(1.0, false)).is_err());
    assert!(client.step_all(0.02).is_err());
    assert!(client.advance(config.fixed_dt()).is_err());
    assert_eq!(intent_rx.try_iter().count(), 0);
}

#[test]
fn despawn_is_replicated() {
    init_logging();
    let config = RelayConfig::default();
    let world = floor_level();
    let (snapshot_tx, snapshot_rx) = snapshot_channel();
    let mut server = MotionRelay::authority(
        SERVER,
        &config,
        Physics::new(world.clone(), KinematicIntegrator::new(world, &config)),
        snapshot_tx,
    )
    .unwrap();

    server
        .spawn_actor(ACTOR, CLIENT, actor_config(), Point2::new(0.0, 0.5))
        .unwrap();
    let mut view = ReplicaView::new();
    view.drain(&snapshot_rx);
    assert_eq!(view.len(), 1);

    server.despawn_actor(ACTOR).unwrap();
    view.drain(&snapshot_rx);
    assert!(view.is_empty());
}
