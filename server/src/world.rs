//! World geometry loader and Rapier query-world cache.
//!
//! Reads immutable `world_static` rows, converts them to the shared schema-agnostic
//! definitions and caches the resulting [`StaticQueryWorld`] for ground probes and the
//! kinematic controller.
//!
//! World statics are treated as immutable: the world is built once and reused every
//! tick. Definitions are sorted by `id` inside [`StaticQueryWorld::build`].

use crate::schema::{world_static, WorldStatic};
use crate::types::ColliderShape;
use motion_relay::{ColliderShapeDef, LayerMask, StaticQueryWorld, WorldStaticDef};
use spacetimedb::{ReducerContext, Table};
use std::sync::{Arc, OnceLock};

static STATIC_QUERY_WORLD: OnceLock<Arc<StaticQueryWorld>> = OnceLock::new();

/// Return the cached query world, building it from `world_static` on first use.
pub fn static_query_world(ctx: &ReducerContext) -> Arc<StaticQueryWorld> {
    STATIC_QUERY_WORLD
        .get_or_init(|| {
            let defs: Vec<WorldStaticDef> = ctx.db.world_static().iter().map(row_to_def).collect();
            log::info!("building static query world from {} colliders", defs.len());
            Arc::new(StaticQueryWorld::build(defs))
        })
        .clone()
}

/// Seed the level with a single wide floor whose top surface is at y = 0.
pub fn seed_default_level(ctx: &ReducerContext) {
    if ctx.db.world_static().iter().next().is_some() {
        return;
    }
    ctx.db.world_static().insert(WorldStatic {
        id: 0,
        translation: crate::types::DbVec2::new(0.0, -0.5),
        rotation: 0.0,
        shape: ColliderShape::Cuboid(crate::types::DbVec2::new(100.0, 0.5)),
        layers: LayerMask::ground().bits,
    });
}

fn row_to_def(row: WorldStatic) -> WorldStaticDef {
    let shape = match row.shape {
        ColliderShape::Plane(offset_along_normal) => ColliderShapeDef::Plane {
            offset_along_normal,
        },
        ColliderShape::Cuboid(he) => ColliderShapeDef::Cuboid {
            half_extents: he.into(),
        },
        ColliderShape::Ball(radius) => ColliderShapeDef::Ball { radius },
        ColliderShape::Capsule(dim) => ColliderShapeDef::CapsuleY {
            radius: dim.radius,
            half_height: dim.half_height,
        },
        ColliderShape::RoundCuboid(rc) => ColliderShapeDef::RoundCuboid {
            half_extents: rc.half_extents.into(),
            border_radius: rc.border_radius,
        },
    };

    WorldStaticDef {
        id: row.id,
        translation: row.translation.into(),
        rotation: row.rotation,
        shape,
        layers: LayerMask::new(row.layers),
    }
}
