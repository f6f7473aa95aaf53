use std::rc::Rc;

use crate::foundation::core::{BezPath, Point, Rect, Vec2};

/// Ownership and duplication contract for scalar payloads stored in a [`crate::Node`].
pub trait Payload: Sized {
    /// Produce an independent duplicate, or `None` when the payload cannot be duplicated.
    ///
    /// A `None` makes [`crate::Node::copy`] share the payload between original and copy.
    fn duplicate(&self) -> Option<Self>;

    /// Whether the payload counts as a present value.
    fn is_present(&self) -> bool {
        true
    }
}

macro_rules! cloneable_payload {
    ($($t:ty),* $(,)?) => {
        $(
            impl Payload for $t {
                fn duplicate(&self) -> Option<Self> {
                    Some(self.clone())
                }
            }
        )*
    };
}

cloneable_payload!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
    Point, Rect, Vec2,
);

impl Payload for serde_json::Value {
    fn duplicate(&self) -> Option<Self> {
        Some(self.clone())
    }

    fn is_present(&self) -> bool {
        !self.is_null()
    }
}

/// Wrapper for payloads that must never be duplicated (handles, caches, external resources).
///
/// Copies of a node holding an `Opaque` share the same payload.
#[derive(Debug, PartialEq)]
pub struct Opaque<T>(pub T);

impl<T> Payload for Opaque<T> {
    fn duplicate(&self) -> Option<Self> {
        None
    }
}

/// Scalar type of path-only trees. It has no values, so a [`crate::PathNode`] can only ever hold
/// path recordings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NoScalar {}

impl Payload for NoScalar {
    fn duplicate(&self) -> Option<Self> {
        match *self {}
    }
}

/// Value slot of a node.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub enum Value<T> {
    /// No value.
    Empty,
    /// Arbitrary scalar payload.
    Scalar(Rc<T>),
    /// Recorded vector path. Stays `Path` even when the recording is empty.
    Path(BezPath),
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T> Value<T> {
    /// Scalar payload, if any.
    pub fn scalar(&self) -> Option<&T> {
        match self {
            Self::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Path recording, if any.
    pub fn path(&self) -> Option<&BezPath> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Mutable path recording, if any.
    pub fn path_mut(&mut self) -> Option<&mut BezPath> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// True for path-recording slots, empty or not.
    pub fn is_path_kind(&self) -> bool {
        matches!(self, Self::Path(_))
    }

    /// Empty slot of the same kind.
    pub fn blank(&self) -> Self {
        if self.is_path_kind() {
            Self::Path(BezPath::new())
        } else {
            Self::Empty
        }
    }

    pub(crate) fn shares_with(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn summary(&self) -> Option<String>
    where
        T: std::fmt::Debug,
    {
        match self {
            Self::Empty => None,
            Self::Scalar(v) => Some(format!("{v:?}")),
            Self::Path(p) if p.elements().is_empty() => None,
            Self::Path(p) => Some(format!("{}mvs", p.elements().len())),
        }
    }
}

impl<T: Payload> Value<T> {
    /// Value presence: scalars defer to [`Payload::is_present`], paths need at least one command.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Empty => false,
            Self::Scalar(v) => v.is_present(),
            Self::Path(p) => !p.elements().is_empty(),
        }
    }

    /// Duplicate the slot. The flag is true when the payload had to be shared.
    pub(crate) fn duplicate(&self) -> (Self, bool) {
        match self {
            Self::Empty => (Self::Empty, false),
            Self::Path(p) => (Self::Path(p.clone()), false),
            Self::Scalar(v) => match v.duplicate() {
                Some(dup) => (Self::Scalar(Rc::new(dup)), false),
                None => (Self::Scalar(Rc::clone(v)), true),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/value.rs"]
mod tests;
