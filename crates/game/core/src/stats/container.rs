//! Flat stat storage.

use super::StatKind;

/// One `f32` per [`StatKind`].
///
/// Used both as the base values an actor is spawned with and as the
/// accumulated result of applying modifiers on top of them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatContainer {
    pub health: f32,
    pub mana: f32,
    pub stamina: f32,
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
}

impl StatContainer {
    pub fn new(
        health: f32,
        mana: f32,
        stamina: f32,
        attack: f32,
        defense: f32,
        speed: f32,
    ) -> Self {
        Self {
            health,
            mana,
            stamina,
            attack,
            defense,
            speed,
        }
    }

    pub fn get(&self, kind: StatKind) -> f32 {
        match kind {
            StatKind::Health => self.health,
            StatKind::Mana => self.mana,
            StatKind::Stamina => self.stamina,
            StatKind::Attack => self.attack,
            StatKind::Defense => self.defense,
            StatKind::Speed => self.speed,
        }
    }

    pub fn get_mut(&mut self, kind: StatKind) -> &mut f32 {
        match kind {
            StatKind::Health => &mut self.health,
            StatKind::Mana => &mut self.mana,
            StatKind::Stamina => &mut self.stamina,
            StatKind::Attack => &mut self.attack,
            StatKind::Defense => &mut self.defense,
            StatKind::Speed => &mut self.speed,
        }
    }

    pub fn set(&mut self, kind: StatKind, value: f32) {
        *self.get_mut(kind) = value;
    }

    /// Sets one stat (builder pattern).
    #[must_use]
    pub fn with(mut self, kind: StatKind, value: f32) -> Self {
        self.set(kind, value);
        self
    }
}
