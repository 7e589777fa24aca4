//! The scripted player enemies react to.

use std::collections::VecDeque;

use game_core::{EntityId, Target, Vec2};

use crate::scenario::PlayerSetup;

/// A player that walks a fixed list of waypoints and soaks up hits.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub position: Vec2,
    waypoints: VecDeque<Vec2>,
    speed: f32,
    health: f32,
}

impl Player {
    pub fn new(setup: &PlayerSetup) -> Self {
        Self {
            position: setup.start,
            waypoints: setup.waypoints.iter().copied().collect(),
            speed: setup.speed,
            health: setup.health,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn remaining_waypoints(&self) -> usize {
        self.waypoints.len()
    }

    /// What perception sees; a dead player is invisible.
    pub fn target(&self) -> Option<Target> {
        self.is_alive()
            .then(|| Target::new(EntityId::PLAYER, self.position))
    }

    /// Walks towards the next waypoint for `dt` seconds, carrying leftover
    /// distance over to the following one.
    pub fn advance(&mut self, dt: f32) {
        if !self.is_alive() {
            return;
        }
        let mut budget = self.speed * dt;
        while budget > 0.0 {
            let Some(&next) = self.waypoints.front() else {
                break;
            };
            let gap = self.position.distance(next);
            if gap <= budget {
                self.position = next;
                self.waypoints.pop_front();
                budget -= gap;
            } else {
                self.position = self.position.move_towards(next, budget);
                break;
            }
        }
    }

    /// Applies a hit and returns the health left.
    pub fn take_hit(&mut self, amount: f32) -> f32 {
        self.health = (self.health - amount.max(0.0)).max(0.0);
        self.health
    }

    /// Teleports the player and drops the rest of the script.
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.waypoints.clear();
    }
}
