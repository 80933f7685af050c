//! Rapier-based query world for immutable 2D level geometry.
//!
//! Used by the authority (library host or SpacetimeDB module) to:
//! - answer ground probes against colliders tagged with surface layers, and
//! - integrate actors with Rapier's `KinematicCharacterController`.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: no dynamics are stepped; statics never move after construction.

// Re-export Rapier so hosts can build definitions without depending on `rapier2d` directly.
pub use rapier2d;

use std::sync::Arc;

use nalgebra::Point2;
use rapier2d::control::KinematicCharacterController;
use rapier2d::prelude::*;

use crate::{
    actor::ActorState,
    bitmask_flags::LayerMask,
    config::{ActorConfig, RelayConfig},
    ground::GroundProbe,
    integrator::{Integrator, advance_vertical_velocity},
};

/// Canonical, schema-agnostic definition of an immutable level collider.
///
/// Conventions
/// - Units are world units (meters).
/// - Rotation is an angle in radians (counter-clockwise).
/// - For planes, the normal is `rotation * +Y`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u64,
    pub translation: Vector<f32>,
    pub rotation: f32,
    pub shape: ColliderShapeDef,
    /// Surface classification stored in the collider's `user_data`.
    pub layers: LayerMask,
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite half-plane; solid on the side opposite its normal.
    Plane { offset_along_normal: f32 },
    /// Oriented box with given half-extents.
    Cuboid { half_extents: Vector<f32> },
    Ball { radius: f32 },
    /// Y-aligned capsule.
    CapsuleY { radius: f32, half_height: f32 },
    /// Box with rounded corners.
    RoundCuboid {
        half_extents: Vector<f32>,
        border_radius: f32,
    },
}

/// In-memory Rapier structures needed for scene queries and KCC against a static world.
pub struct StaticQueryWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl StaticQueryWorld {
    /// Build a query world from a list of static collider definitions.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for def in defs.into_iter() {
            let iso = Isometry::new(def.translation, def.rotation);
            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            let collider = collider_from_def(&def);
            colliders.insert_with_parent(collider, rb_handle, &mut bodies);
        }

        // Collision detection only (no dynamics): updates the broad-phase BVH and narrow-phase.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();

        let hooks = ();
        let events = ();
        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &hooks,
            &events,
        );

        log::debug!("static query world built with {} colliders", colliders.len());

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        }
    }

    /// Create a borrowed `QueryPipeline` view for scene queries and KCC.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl GroundProbe for StaticQueryWorld {
    fn overlaps_ground(&self, center: Point2<f32>, radius: f32, layers: LayerMask) -> bool {
        let is_ground =
            |_handle: ColliderHandle, collider: &Collider| surface_layers(collider).intersects(layers);
        let pipeline = self.query_pipeline(QueryFilter::default().predicate(&is_ground));

        let probe = Ball::new(radius.max(0.0));
        let probe_pos = Isometry::translation(center.x, center.y);
        pipeline.intersect_shape(probe_pos, &probe).next().is_some()
    }
}

/// Surface layers stored on a collider built by [`collider_from_def`].
pub fn surface_layers(collider: &Collider) -> LayerMask {
    LayerMask::new(collider.user_data as u32)
}

/// Build a Rapier collider from a `WorldStaticDef`.
///
/// The pose lives on the parent rigid-body, so the collider has an identity local transform
/// (planes excepted, which carry their offset along the normal).
pub fn collider_from_def(def: &WorldStaticDef) -> Collider {
    let builder = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // Local +Y is the normal before the parent rotation is applied.
            let unit_n = Vector::y_axis();
            ColliderBuilder::halfspace(unit_n).translation(unit_n.into_inner() * *offset_along_normal)
        }
        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y)
        }
        ColliderShapeDef::Ball { radius } => ColliderBuilder::ball(*radius),
        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),
        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => ColliderBuilder::round_cuboid(half_extents.x, half_extents.y, *border_radius),
    };

    builder.user_data(def.layers.bits as u128).build()
}

/// Rapier KCC integration against a [`StaticQueryWorld`].
///
/// Applies gravity, sweeps the actor capsule along `velocity * dt` with slide, and cancels
/// downward velocity once the controller reports ground contact.
pub struct KinematicIntegrator {
    world: Arc<StaticQueryWorld>,
    controller: KinematicCharacterController,
    gravity: f32,
    terminal_fall_speed: f32,
}

impl KinematicIntegrator {
    pub fn new(world: Arc<StaticQueryWorld>, config: &RelayConfig) -> Self {
        Self {
            world,
            controller: KinematicCharacterController::default(),
            gravity: config.gravity,
            terminal_fall_speed: config.terminal_fall_speed,
        }
    }

    pub fn with_controller(mut self, controller: KinematicCharacterController) -> Self {
        self.controller = controller;
        self
    }
}

impl Integrator for KinematicIntegrator {
    fn integrate(&self, state: &mut ActorState, config: &ActorConfig, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        state.velocity.y =
            advance_vertical_velocity(state.velocity.y, self.gravity, self.terminal_fall_speed, dt);
        let desired = state.velocity * dt;

        let pipeline = self.world.query_pipeline(QueryFilter::default());
        let shape = Capsule::new_y(config.capsule_half_height, config.capsule_radius);
        let position = Isometry::translation(state.position.x, state.position.y);

        let corrected =
            self.controller
                .move_shape(dt, &pipeline, &shape, &position, desired, |_| {});

        state.position += corrected.translation;
        if corrected.grounded && state.velocity.y < 0.0 {
            state.velocity.y = 0.0;
        }
    }
}
