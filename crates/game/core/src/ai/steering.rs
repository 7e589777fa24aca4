//! Obstacle-aware steering.
//!
//! [`ContextSteering`] samples a fixed ring of directions around the agent
//! and scores each one twice: how much it points at the destination
//! (interest) and how much it points into nearby obstacles (danger). The
//! direction with the best `interest * (1 - danger)` wins.

use std::f32::consts::TAU;

use crate::Vec2;

/// World query used by strategies that need to route around obstacles.
pub trait Steering {
    /// Unit direction to move from `from` toward `to`, or zero when no
    /// direction makes progress.
    fn direction(&self, from: Vec2, to: Vec2) -> Vec2;
}

/// Circular blocker.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub center: Vec2,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Interest/danger context steering over `resolution` evenly spaced
/// directions.
#[derive(Clone, Debug)]
pub struct ContextSteering {
    directions: Vec<Vec2>,
    obstacles: Vec<Obstacle>,
    /// Obstacles further than this (from their edge) are ignored.
    look_ahead: f32,
    agent_radius: f32,
}

impl ContextSteering {
    pub const DEFAULT_RESOLUTION: usize = 16;
    pub const DEFAULT_LOOK_AHEAD: f32 = 4.0;
    pub const DEFAULT_AGENT_RADIUS: f32 = 0.5;

    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self::with_resolution(obstacles, Self::DEFAULT_RESOLUTION)
    }

    /// Uses `resolution` sample directions (at least 4).
    pub fn with_resolution(obstacles: Vec<Obstacle>, resolution: usize) -> Self {
        let resolution = resolution.max(4);
        let directions = (0..resolution)
            .map(|i| Vec2::from_angle(TAU * i as f32 / resolution as f32))
            .collect();
        Self {
            directions,
            obstacles,
            look_ahead: Self::DEFAULT_LOOK_AHEAD,
            agent_radius: Self::DEFAULT_AGENT_RADIUS,
        }
    }

    #[must_use]
    pub fn look_ahead(mut self, look_ahead: f32) -> Self {
        self.look_ahead = look_ahead.max(f32::EPSILON);
        self
    }

    #[must_use]
    pub fn agent_radius(mut self, agent_radius: f32) -> Self {
        self.agent_radius = agent_radius.max(0.0);
        self
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    fn danger(&self, from: Vec2, direction: Vec2) -> f32 {
        self.obstacles
            .iter()
            .filter_map(|obstacle| {
                let offset = obstacle.center - from;
                let gap = offset.length() - obstacle.radius - self.agent_radius;
                if gap > self.look_ahead {
                    return None;
                }
                let proximity = 1.0 - gap.max(0.0) / self.look_ahead;
                let alignment = direction.dot(offset.normalize_or_zero()).max(0.0);
                Some(alignment * proximity)
            })
            .fold(0.0, f32::max)
    }
}

impl Steering for ContextSteering {
    fn direction(&self, from: Vec2, to: Vec2) -> Vec2 {
        let desired = (to - from).normalize_or_zero();
        if desired == Vec2::ZERO {
            return Vec2::ZERO;
        }

        let mut best = (0.0, Vec2::ZERO);
        for &direction in &self.directions {
            let interest = direction.dot(desired).max(0.0);
            if interest <= 0.0 {
                continue;
            }
            let score = interest * (1.0 - self.danger(from, direction));
            if score > best.0 {
                best = (score, direction);
            }
        }
        best.1
    }
}
