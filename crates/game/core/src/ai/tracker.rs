//! Target tracking.

use crate::Vec2;

/// Remembers where a chased target was last seen.
pub trait TargetTracker {
    /// Feeds the current observation. `None` means the target is not
    /// visible this tick.
    fn observe(&mut self, position: Option<Vec2>, now: f32);

    /// Where to head for, if the memory is still fresh at `now`.
    fn last_known(&self, now: f32) -> Option<Vec2>;

    /// Drops all memory.
    fn forget(&mut self);
}

/// Keeps the last seen position for `memory` seconds after losing sight.
///
/// A memory of zero forgets as soon as the target disappears.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LastKnownTracker {
    memory: f32,
    last: Option<(Vec2, f32)>,
}

impl LastKnownTracker {
    pub fn new(memory: f32) -> Self {
        Self {
            memory: memory.max(0.0),
            last: None,
        }
    }

    pub fn memory(&self) -> f32 {
        self.memory
    }
}

impl TargetTracker for LastKnownTracker {
    fn observe(&mut self, position: Option<Vec2>, now: f32) {
        match position {
            Some(position) => self.last = Some((position, now)),
            None if self.memory <= 0.0 => self.last = None,
            None => {}
        }
    }

    fn last_known(&self, now: f32) -> Option<Vec2> {
        self.last
            .filter(|(_, seen_at)| now - seen_at <= self.memory)
            .map(|(position, _)| position)
    }

    fn forget(&mut self) {
        self.last = None;
    }
}
