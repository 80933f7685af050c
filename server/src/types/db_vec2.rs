use nalgebra::{Point2, Vector2};

/// A 2D vector in world space (meters).
///
/// Semantics:
/// - Used for positions, velocities and half-extents.
/// - This is a data type only; math lives in `motion_relay`.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub struct DbVec2 {
    /// X axis (horizontal)
    pub x: f32,
    /// Y axis (up-down)
    pub y: f32,
}

impl Default for DbVec2 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl DbVec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<DbVec2> for Point2<f32> {
    fn from(v: DbVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<DbVec2> for Vector2<f32> {
    fn from(v: DbVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Point2<f32>> for DbVec2 {
    fn from(p: Point2<f32>) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Vector2<f32>> for DbVec2 {
    fn from(v: Vector2<f32>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<DbVec2> for [f32; 2] {
    fn from(v: DbVec2) -> Self {
        [v.x, v.y]
    }
}

impl From<[f32; 2]> for DbVec2 {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}
