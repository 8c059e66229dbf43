//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a handle type (and therefore a group) within an arena.
///
/// Handle types are declared by the embedding program in the arena
/// descriptor. `HandleTypeId(0)` is reserved: it never names a group and
/// is the type carried by [`Handle::INVALID`](crate::Handle::INVALID).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct HandleTypeId(pub u32);

impl HandleTypeId {
    /// The reserved, always-invalid handle type.
    pub const INVALID: Self = Self(0);

    /// Whether this is the reserved type `0`.
    pub const fn is_reserved(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for HandleTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for HandleTypeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
