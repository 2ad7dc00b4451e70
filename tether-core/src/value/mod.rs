//! Slot Values
//!
//! This module defines the values that bound node slots hold.
//!
//! # Scalars and composites
//!
//! A [`Value`] is either a scalar (`Bool`, `Int`, `Float`, `Text`) or a
//! composite (`Vec2`, `Vec3`, `Quat`, `Euler`). The distinction matters to
//! the property-binding consumer: composite values expose an in-place
//! [`Value::copy_from`] capability, so updating a slot that already holds a
//! composite of the produced kind preserves the slot's storage identity.
//! Consumers elsewhere (a renderer holding the slot's vector, for example)
//! keep observing the slot through their existing handle across updates.
//!
//! Whether an update copies or replaces is an explicit capability check on
//! the value kinds involved — see [`Value::copy_from`].

mod composite;

pub use composite::{Euler, Quat, Vec2, Vec3};

/// The kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Vec2,
    Vec3,
    Quat,
    Euler,
}

/// The content of a bound slot.
///
/// Cloning a scalar value copies it; cloning a composite value produces
/// another handle to the same storage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Vec2(Vec2),
    Vec3(Vec3),
    Quat(Quat),
    Euler(Euler),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Quat(_) => ValueKind::Quat,
            Value::Euler(_) => ValueKind::Euler,
        }
    }

    /// Whether this value exposes in-place copy semantics.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Value::Vec2(_) | Value::Vec3(_) | Value::Quat(_) | Value::Euler(_)
        )
    }

    /// Copy `other` into this value in place, if both are composites of the
    /// same kind. Returns whether the copy was applied.
    ///
    /// On success the storage identity of `self` is preserved. Scalar
    /// values and kind mismatches return `false`; the caller replaces the
    /// slot instead.
    pub fn copy_from(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Vec2(dst), Value::Vec2(src)) => {
                dst.copy_from(src);
                true
            }
            (Value::Vec3(dst), Value::Vec3(src)) => {
                dst.copy_from(src);
                true
            }
            (Value::Quat(dst), Value::Quat(src)) => {
                dst.copy_from(src);
                true
            }
            (Value::Euler(dst), Value::Euler(src)) => {
                dst.copy_from(src);
                true
            }
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn vec2(&self) -> Option<Vec2> {
        match self {
            Value::Vec2(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn vec3(&self) -> Option<Vec3> {
        match self {
            Value::Vec3(v) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn quat(&self) -> Option<Quat> {
        match self {
            Value::Quat(q) => Some(q.clone()),
            _ => None,
        }
    }

    pub fn euler(&self) -> Option<Euler> {
        match self {
            Value::Euler(e) => Some(e.clone()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Value::Vec2(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vec3(v)
    }
}

impl From<Quat> for Value {
    fn from(v: Quat) -> Self {
        Value::Quat(v)
    }
}

impl From<Euler> for Value {
    fn from(v: Euler) -> Self {
        Value::Euler(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_from_same_composite_kind() {
        let slot = Value::Vec3(Vec3::new(0.0, 0.0, 0.0));
        let produced = Value::Vec3(Vec3::new(1.0, 2.0, 3.0));

        assert!(slot.copy_from(&produced));
        assert_eq!(slot.vec3().map(|v| v.to_array()), Some([1.0, 2.0, 3.0]));
    }

    #[test]
    fn copy_from_rejects_kind_mismatch() {
        let slot = Value::Vec3(Vec3::default());
        assert!(!slot.copy_from(&Value::Vec2(Vec2::default())));
        assert!(!slot.copy_from(&Value::Float(1.0)));
    }

    #[test]
    fn copy_from_rejects_scalars() {
        let slot = Value::Float(1.0);
        assert!(!slot.copy_from(&Value::Float(2.0)));
        assert_eq!(slot.as_f64(), Some(1.0));
    }

    #[test]
    fn scalar_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(7).as_i64(), Some(7));
        assert_eq!(Value::Int(7).as_f64(), Some(7.0));
        assert_eq!(Value::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::Float(1.5).as_i64(), None);
    }

    #[test]
    fn composite_clone_through_value_shares_storage() {
        let v = Vec3::new(1.0, 0.0, 0.0);
        let value = Value::Vec3(v.clone());
        let out = value.vec3().unwrap();

        out.set(9.0, 9.0, 9.0);
        assert_eq!(v.to_array(), [9.0, 9.0, 9.0]);
    }

    #[test]
    fn kinds() {
        assert_eq!(Value::Bool(false).kind(), ValueKind::Bool);
        assert_eq!(Value::Vec2(Vec2::default()).kind(), ValueKind::Vec2);
        assert!(Value::Quat(Quat::default()).is_composite());
        assert!(!Value::Int(0).is_composite());
    }
}
