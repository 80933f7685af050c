/// Capsule dimensions for collider definitions.
///
/// Semantics:
/// - `radius`: radius of the round caps.
/// - `half_height`: half of the straight segment along local +Y.
/// - Total capsule height = `2*half_height + 2*radius`.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbCapsule {
    pub radius: f32,
    pub half_height: f32,
}

/// Rounded-box parameters.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbRoundCuboid {
    pub half_extents: super::DbVec2,
    pub border_radius: f32,
}

/// Collider shape used by world statics.
///
/// Shapes are combined with the row's `translation` and `rotation`.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Infinite half-plane. `f32` is the offset along the normal `rotation * +Y`.
    Plane(f32),
    /// Oriented box defined by local half-extents (hx, hy).
    Cuboid(super::DbVec2),
    /// Circle with the given radius (meters).
    Ball(f32),
    /// Y-aligned capsule.
    Capsule(DbCapsule),
    /// Box with rounded corners.
    RoundCuboid(DbRoundCuboid),
}
