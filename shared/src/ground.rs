use std::sync::Arc;

use nalgebra::Point2;

use crate::bitmask_flags::LayerMask;

/// Ground classification supplied by the physics collaborator.
///
/// Implementations must be synchronous and bounded: the authority calls this once per
/// actor per simulation step.
pub trait GroundProbe {
    /// Does a circle at `center` with `radius` overlap any surface in `layers`?
    fn overlaps_ground(&self, center: Point2<f32>, radius: f32, layers: LayerMask) -> bool;
}

impl<T: GroundProbe + ?Sized> GroundProbe for Arc<T> {
    fn overlaps_ground(&self, center: Point2<f32>, radius: f32, layers: LayerMask) -> bool {
        (**self).overlaps_ground(center, radius, layers)
    }
}

impl<T: GroundProbe + ?Sized> GroundProbe for &T {
    fn overlaps_ground(&self, center: Point2<f32>, radius: f32, layers: LayerMask) -> bool {
        (**self).overlaps_ground(center, radius, layers)
    }
}

/// An infinite horizontal floor at `height`, tagged with `layers`.
#[derive(Clone, Copy, Debug)]
pub struct FlatGround {
    pub height: f32,
    pub layers: LayerMask,
}

impl FlatGround {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            layers: LayerMask::ground(),
        }
    }
}

impl GroundProbe for FlatGround {
    fn overlaps_ground(&self, center: Point2<f32>, radius: f32, layers: LayerMask) -> bool {
        self.layers.intersects(layers) && center.y - radius <= self.height
    }
}

/// No ground anywhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGround;

impl GroundProbe for NoGround {
    fn overlaps_ground(&self, _center: Point2<f32>, _radius: f32, _layers: LayerMask) -> bool {
        false
    }
}
