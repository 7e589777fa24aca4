//! Stat modifiers.

use super::{Accumulator, StatContainer, StatKind};

/// How a modifier combines with the running value of its stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ModifierOp {
    /// `value += amount`
    Add,
    /// `value *= amount`
    Multiply,
    /// `value = amount`
    Override,
}

/// A single `(stat, op, value)` adjustment.
///
/// Modifiers are plain values: two modifiers with the same fields are the
/// same modifier, which is what [`StatMediator::remove_modifier`] relies on.
///
/// [`StatMediator::remove_modifier`]: super::StatMediator::remove_modifier
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: StatKind,
    pub op: ModifierOp,
    pub value: f32,
}

impl StatModifier {
    pub fn new(stat: StatKind, op: ModifierOp, value: f32) -> Self {
        Self { stat, op, value }
    }

    pub fn add(stat: StatKind, value: f32) -> Self {
        Self::new(stat, ModifierOp::Add, value)
    }

    pub fn multiply(stat: StatKind, factor: f32) -> Self {
        Self::new(stat, ModifierOp::Multiply, factor)
    }

    pub fn override_with(stat: StatKind, value: f32) -> Self {
        Self::new(stat, ModifierOp::Override, value)
    }

    /// The modifier that undoes this one.
    ///
    /// `None` for `Override` (the previous value is lost) and for
    /// `Multiply` by zero.
    pub fn inverse(&self) -> Option<Self> {
        match self.op {
            ModifierOp::Add => Some(Self::add(self.stat, -self.value)),
            ModifierOp::Multiply if self.value != 0.0 => {
                Some(Self::multiply(self.stat, 1.0 / self.value))
            }
            ModifierOp::Multiply | ModifierOp::Override => None,
        }
    }

    pub fn is_reversible(&self) -> bool {
        self.inverse().is_some()
    }

    /// Applies this modifier to a single running value.
    pub fn apply_to(&self, value: f32) -> f32 {
        match self.op {
            ModifierOp::Add => value + self.value,
            ModifierOp::Multiply => value * self.value,
            ModifierOp::Override => self.value,
        }
    }
}

impl Accumulator<StatModifier> for StatContainer {
    fn apply(&mut self, modifier: &StatModifier) {
        let slot = self.get_mut(modifier.stat);
        *slot = modifier.apply_to(*slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_inverse_restores_value() {
        let mut stats = StatContainer::default().with(StatKind::Attack, 10.0);
        let buff = StatModifier::add(StatKind::Attack, 5.0);

        stats.apply(&buff);
        assert_eq!(stats.attack, 15.0);

        stats.apply(&buff.inverse().unwrap());
        assert_eq!(stats.attack, 10.0);
    }

    #[test]
    fn multiply_inverse_restores_value() {
        let mut stats = StatContainer::default().with(StatKind::Speed, 4.0);
        let slow = StatModifier::multiply(StatKind::Speed, 0.5);

        stats.apply(&slow);
        stats.apply(&slow.inverse().unwrap());

        assert_eq!(stats.speed, 4.0);
    }

    #[test]
    fn irreversible_ops_have_no_inverse() {
        assert_eq!(StatModifier::override_with(StatKind::Health, 1.0).inverse(), None);
        assert_eq!(StatModifier::multiply(StatKind::Health, 0.0).inverse(), None);
    }

    #[test]
    fn only_the_targeted_stat_changes() {
        let base = StatContainer::new(100.0, 50.0, 30.0, 10.0, 5.0, 1.0);
        let mut stats = base;

        stats.apply(&StatModifier::override_with(StatKind::Defense, 0.0));

        assert_eq!(stats.defense, 0.0);
        assert_eq!(stats.with(StatKind::Defense, 5.0), base);
    }
}
