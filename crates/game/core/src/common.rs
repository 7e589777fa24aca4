use std::fmt;

use crate::Vec2;

/// Unique identifier for any entity in a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something an enemy can aggro on: who it is and where it was last sensed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub id: EntityId,
    pub position: Vec2,
}

impl Target {
    pub fn new(id: EntityId, position: Vec2) -> Self {
        Self { id, position }
    }
}
