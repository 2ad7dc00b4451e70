//! Composite value storage.
//!
//! Composite values (vectors, quaternions, Euler triples) are handles to
//! shared component storage: cloning a handle does not copy the components,
//! it produces another view of the same storage. This is what makes slot
//! identity stable under in-place updates — a consumer holding a clone of a
//! bound slot's `Vec3` observes every `copy_from` applied to that slot.
//!
//! The shape mirrors how signals share their value cell: an `Arc` around a
//! lock, with `Clone` sharing state rather than duplicating it.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Shared fixed-size component storage.
#[derive(Clone)]
struct Storage<const N: usize> {
    data: Arc<RwLock<[f64; N]>>,
}

impl<const N: usize> Storage<N> {
    fn new(data: [f64; N]) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    fn to_array(&self) -> [f64; N] {
        *self.data.read()
    }

    fn get(&self, i: usize) -> f64 {
        self.data.read()[i]
    }

    fn store(&self, data: [f64; N]) {
        *self.data.write() = data;
    }

    /// Copy `other`'s components into this storage, preserving identity.
    fn copy_from(&self, other: &Self) {
        // Read fully before writing so copying a handle onto itself is fine.
        let src = other.to_array();
        self.store(src);
    }

    fn same_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

macro_rules! composite_common {
    ($name:ident, $n:literal) => {
        impl $name {
            /// Components as a plain array snapshot.
            pub fn to_array(&self) -> [f64; $n] {
                self.storage.to_array()
            }

            /// Copy `other`'s components into this value in place.
            ///
            /// The storage identity of `self` is preserved: every clone of
            /// `self` observes the new components.
            pub fn copy_from(&self, other: &Self) {
                self.storage.copy_from(&other.storage);
            }

            /// Whether two handles view the same underlying storage.
            pub fn same_storage(&self, other: &Self) -> bool {
                self.storage.same_storage(&other.storage)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.to_array() == other.to_array()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name))
                    .field(&self.to_array())
                    .finish()
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.to_array().serialize(serializer)
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let data = <[f64; $n]>::deserialize(deserializer)?;
                Ok(Self {
                    storage: Storage::new(data),
                })
            }
        }
    };
}

/// A two-component vector value.
#[derive(Clone)]
pub struct Vec2 {
    storage: Storage<2>,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            storage: Storage::new([x, y]),
        }
    }

    pub fn x(&self) -> f64 {
        self.storage.get(0)
    }

    pub fn y(&self) -> f64 {
        self.storage.get(1)
    }

    /// Overwrite the components in place.
    pub fn set(&self, x: f64, y: f64) {
        self.storage.store([x, y]);
    }
}

impl Default for Vec2 {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

composite_common!(Vec2, 2);

/// A three-component vector value.
#[derive(Clone)]
pub struct Vec3 {
    storage: Storage<3>,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            storage: Storage::new([x, y, z]),
        }
    }

    pub fn x(&self) -> f64 {
        self.storage.get(0)
    }

    pub fn y(&self) -> f64 {
        self.storage.get(1)
    }

    pub fn z(&self) -> f64 {
        self.storage.get(2)
    }

    pub fn set(&self, x: f64, y: f64, z: f64) {
        self.storage.store([x, y, z]);
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

composite_common!(Vec3, 3);

/// A quaternion value. Identity is `(0, 0, 0, 1)`.
#[derive(Clone)]
pub struct Quat {
    storage: Storage<4>,
}

impl Quat {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self {
            storage: Storage::new([x, y, z, w]),
        }
    }

    pub fn x(&self) -> f64 {
        self.storage.get(0)
    }

    pub fn y(&self) -> f64 {
        self.storage.get(1)
    }

    pub fn z(&self) -> f64 {
        self.storage.get(2)
    }

    pub fn w(&self) -> f64 {
        self.storage.get(3)
    }

    pub fn set(&self, x: f64, y: f64, z: f64, w: f64) {
        self.storage.store([x, y, z, w]);
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

composite_common!(Quat, 4);

/// An Euler-angle triple, in radians.
#[derive(Clone)]
pub struct Euler {
    storage: Storage<3>,
}

impl Euler {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            storage: Storage::new([x, y, z]),
        }
    }

    pub fn x(&self) -> f64 {
        self.storage.get(0)
    }

    pub fn y(&self) -> f64 {
        self.storage.get(1)
    }

    pub fn z(&self) -> f64 {
        self.storage.get(2)
    }

    pub fn set(&self, x: f64, y: f64, z: f64) {
        self.storage.store([x, y, z]);
    }
}

impl Default for Euler {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

composite_common!(Euler, 3);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_shares_storage() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = a.clone();

        a.set(4.0, 5.0, 6.0);
        assert_eq!(b.to_array(), [4.0, 5.0, 6.0]);
        assert!(a.same_storage(&b));
    }

    #[test]
    fn copy_from_preserves_identity() {
        let target = Vec3::new(0.0, 0.0, 0.0);
        let view = target.clone();
        let produced = Vec3::new(7.0, 8.0, 9.0);

        target.copy_from(&produced);

        // The components moved, the storage did not.
        assert_eq!(view.to_array(), [7.0, 8.0, 9.0]);
        assert!(target.same_storage(&view));
        assert!(!target.same_storage(&produced));
    }

    #[test]
    fn copy_from_self_is_harmless() {
        let v = Vec2::new(1.0, 2.0);
        let same = v.clone();
        v.copy_from(&same);
        assert_eq!(v.to_array(), [1.0, 2.0]);
    }

    #[test]
    fn equality_is_by_components() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(1.0, 2.0);
        assert_eq!(a, b);
        assert!(!a.same_storage(&b));
    }

    #[test]
    fn quat_identity_default() {
        let q = Quat::default();
        assert_eq!(q.to_array(), [0.0, 0.0, 0.0, 1.0]);
    }
}
