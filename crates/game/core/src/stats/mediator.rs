//! Base stats plus an ordered modifier list.

use super::{CacheMediator, StatContainer, StatKind, StatModifier};

/// Owns an actor's base stats and the modifiers applied on top of them.
///
/// Modifiers are applied strictly in insertion order, so `Multiply` and
/// `Override` see the result of every modifier added before them. Every
/// mutating method marks the cache dirty; callers never need to invalidate
/// by hand.
#[derive(Clone, Debug)]
pub struct StatMediator {
    base: StatContainer,
    modifiers: Vec<StatModifier>,
    cache: CacheMediator<StatContainer, StatModifier>,
}

impl StatMediator {
    pub fn new(base: StatContainer) -> Self {
        Self {
            base,
            modifiers: Vec::new(),
            cache: CacheMediator::new(base),
        }
    }

    pub fn base(&self) -> &StatContainer {
        &self.base
    }

    pub fn modifiers(&self) -> &[StatModifier] {
        &self.modifiers
    }

    pub fn add_modifier(&mut self, modifier: StatModifier) {
        self.modifiers.push(modifier);
        self.cache.invalidate();
    }

    /// Removes the first modifier equal to `modifier`.
    pub fn remove_modifier(&mut self, modifier: &StatModifier) -> bool {
        match self.modifiers.iter().position(|m| m == modifier) {
            Some(index) => {
                self.modifiers.remove(index);
                self.cache.invalidate();
                true
            }
            None => {
                tracing::trace!(?modifier, "modifier not present");
                false
            }
        }
    }

    pub fn clear_modifiers(&mut self) {
        self.modifiers.clear();
        self.cache.invalidate();
    }

    /// Clears the list and re-adds every modifier from `modifiers`.
    ///
    /// This is the "recompute from scratch" pass run when the set of active
    /// sources (equipment, buffs) changes wholesale.
    pub fn replace_modifiers(&mut self, modifiers: impl IntoIterator<Item = StatModifier>) {
        self.modifiers.clear();
        self.modifiers.extend(modifiers);
        self.cache.invalidate();
    }

    pub fn set_base(&mut self, kind: StatKind, value: f32) {
        self.base.set(kind, value);
        self.cache.invalidate();
    }

    /// Accumulated stats: base with every modifier applied.
    pub fn get(&mut self) -> &StatContainer {
        self.cache.get(&self.base, &self.modifiers)
    }

    pub fn value(&mut self, kind: StatKind) -> f32 {
        self.get().get(kind)
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn is_dirty(&self) -> bool {
        self.cache.is_dirty()
    }

    pub fn recompute_count(&self) -> u64 {
        self.cache.recompute_count()
    }
}

impl Default for StatMediator {
    fn default() -> Self {
        Self::new(StatContainer::default())
    }
}
