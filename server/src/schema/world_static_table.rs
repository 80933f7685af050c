use crate::types::*;
use spacetimedb::*;

/// Static collider rows used to build the immutable level geometry.
///
/// The server reads these rows into an in-memory Rapier query world once, and reuses it
/// every tick for ground probes and the kinematic character controller.
#[table(name = world_static, public)]
pub struct WorldStatic {
    #[primary_key]
    #[auto_inc]
    pub id: u64,

    pub translation: DbVec2,
    /// Counter-clockwise rotation (radians).
    pub rotation: f32,

    pub shape: ColliderShape,

    /// `SurfaceLayer` bits of this surface.
    pub layers: u32,
}
