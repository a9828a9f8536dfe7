//! Arena identifiers for type entities.

use std::fmt;

/// Index of a [`TypeEntity`](super::TypeEntity) inside an
/// [`EntityGraph`](super::EntityGraph) arena.
///
/// Inheritance edges are resolved to `EntityId`s once when the graph is
/// built, so the resolver never chases names through maps while walking.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create a new EntityId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<u32> for EntityId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}
