use num_traits::{One, PrimInt};
use serde::{Deserialize, Serialize};

/// Trait implemented by flag enums declared with [`define_bitmask_flags!`].
///
/// The enum's discriminant (via `#[repr(u8)]`) determines the bit index.
/// You choose the backing integer type via the associated `Storage`.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitmask container.
///
/// Physics-side colliders store the raw bits (e.g. in Rapier `user_data`); actors keep a
/// typed mask describing which surfaces count as ground for them.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn from_flags<U: FlagBitmask<Storage = T> + Copy>(tags: &[U]) -> Self {
        let mut flags = Self::new(T::zero());
        flags.add_many(tags);
        flags
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits | tag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits & !tag.mask();
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, tag: U) -> bool {
        (self.bits & tag.mask()) != T::zero()
    }

    pub fn add_many<U: FlagBitmask<Storage = T> + Copy>(&mut self, tags: &[U]) {
        for &tag in tags {
            self.add(tag);
        }
    }

    /// True when any bit is shared with `other`.
    pub fn intersects(&self, other: Self) -> bool {
        (self.bits & other.bits) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }

    pub fn clear(&mut self) {
        self.bits = T::zero();
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
#[macro_export]
macro_rules! define_bitmask_flags {
    ($name:ident, $storage:ty, { $($variant:ident),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_bitmask_flags!(SurfaceLayer, u32, {
    Ground,
    Platform,
    Wall,
    Hazard,
});

/// Set of [`SurfaceLayer`]s.
pub type LayerMask = BitmaskFlags<u32>;

impl LayerMask {
    /// Mask matching only [`SurfaceLayer::Ground`].
    pub fn ground() -> Self {
        Self::from_flags(&[SurfaceLayer::Ground])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_map_to_distinct_bits() {
        assert_eq!(SurfaceLayer::Ground.mask(), 0b0001);
        assert_eq!(SurfaceLayer::Platform.mask(), 0b0010);
        assert_eq!(SurfaceLayer::Hazard.mask(), 0b1000);
    }

    #[test]
    fn intersects_requires_a_shared_layer() {
        let walkable = LayerMask::from_flags(&[SurfaceLayer::Ground, SurfaceLayer::Platform]);
        let wall = LayerMask::from_flags(&[SurfaceLayer::Wall]);

        assert!(walkable.intersects(LayerMask::ground()));
        assert!(!walkable.intersects(wall));
        assert!(!LayerMask::default().intersects(walkable));
    }

    #[test]
    fn add_and_remove_toggle_single_layers() {
        let mut mask = LayerMask::ground();
        mask.add(SurfaceLayer::Hazard);
        assert!(mask.has(SurfaceLayer::Hazard));

        mask.remove(SurfaceLayer::Ground);
        assert!(!mask.has(SurfaceLayer::Ground));
        assert!(mask.has(SurfaceLayer::Hazard));

        mask.clear();
        assert!(mask.is_empty());
    }
}
