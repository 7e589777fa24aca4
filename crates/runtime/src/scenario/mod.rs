//! Scenario files.
//!
//! A scenario describes one encounter: where the player starts and walks,
//! which obstacles block the arena, which enemy templates exist and where
//! each enemy spawns. Scenarios are RON files:
//!
//! ```ron
//! (
//!     name: "corridor",
//!     player: (start: (x: 10.0, y: 0.0), waypoints: [(x: 1.0, y: 0.0)]),
//!     obstacles: [(center: (x: 5.0, y: 0.5), radius: 0.75)],
//!     templates: [(name: "grunt", stats: (health: 20.0, attack: 3.0, speed: 1.0))],
//!     spawns: [(template: "grunt", position: (x: 0.0, y: 0.0))],
//! )
//! ```

use std::collections::HashSet;
use std::path::Path;

use game_core::{EnemyTemplate, Obstacle, Vec2};
use serde::{Deserialize, Serialize};

use crate::api::{Result, RuntimeError};

/// Player placement and scripted path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub start: Vec2,
    /// Points the player walks through in order, then stops.
    #[serde(default)]
    pub waypoints: Vec<Vec2>,
    #[serde(default = "PlayerSetup::default_speed")]
    pub speed: f32,
    #[serde(default = "PlayerSetup::default_health")]
    pub health: f32,
}

impl PlayerSetup {
    pub const DEFAULT_SPEED: f32 = 4.0;
    pub const DEFAULT_HEALTH: f32 = 100.0;

    fn default_speed() -> f32 {
        Self::DEFAULT_SPEED
    }

    fn default_health() -> f32 {
        Self::DEFAULT_HEALTH
    }

    pub fn at(start: Vec2) -> Self {
        Self {
            start,
            waypoints: Vec::new(),
            speed: Self::DEFAULT_SPEED,
            health: Self::DEFAULT_HEALTH,
        }
    }
}

/// One enemy to spawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spawn {
    /// Name of an entry in [`Scenario::templates`].
    pub template: String,
    pub position: Vec2,
    /// Overrides the runtime seed for this enemy's random behaviour.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Spawn {
    pub fn new(template: impl Into<String>, position: Vec2) -> Self {
        Self {
            template: template.into(),
            position,
            seed: None,
        }
    }
}

/// A complete encounter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub player: PlayerSetup,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    pub templates: Vec<EnemyTemplate>,
    pub spawns: Vec<Spawn>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, player: PlayerSetup) -> Self {
        Self {
            name: name.into(),
            player,
            obstacles: Vec::new(),
            templates: Vec::new(),
            spawns: Vec::new(),
        }
    }

    /// Adds a template (builder pattern).
    pub fn with_template(mut self, template: EnemyTemplate) -> Self {
        self.templates.push(template);
        self
    }

    /// Adds a spawn (builder pattern).
    pub fn with_spawn(mut self, spawn: Spawn) -> Self {
        self.spawns.push(spawn);
        self
    }

    /// Adds an obstacle (builder pattern).
    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn template(&self, name: &str) -> Option<&EnemyTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// Checks cross references the type system cannot: template names are
    /// unique and every spawn names an existing template.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for template in &self.templates {
            if !names.insert(template.name.as_str()) {
                return Err(RuntimeError::InvalidScenario(format!(
                    "enemy template `{}` defined twice",
                    template.name
                )));
            }
        }

        if let Some(spawn) = self.spawns.iter().find(|s| !names.contains(s.template.as_str())) {
            return Err(RuntimeError::UnknownTemplate {
                template: spawn.template.clone(),
            });
        }

        if !(self.player.speed >= 0.0) {
            return Err(RuntimeError::InvalidScenario(format!(
                "player speed must be non-negative, got {}",
                self.player.speed
            )));
        }
        Ok(())
    }

    /// Parses and validates a scenario from RON text.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let scenario: Scenario = ron::from_str(source).map_err(RuntimeError::ScenarioParse)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load scenario from a RON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeError::ScenarioIo {
            path: path.to_path_buf(),
            source,
        })?;

        let scenario = Self::from_ron_str(&content)?;
        tracing::info!(
            name = %scenario.name,
            templates = scenario.templates.len(),
            spawns = scenario.spawns.len(),
            "scenario loaded"
        );
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use game_core::StatContainer;

    use super::*;

    const CORRIDOR: &str = r#"(
        name: "corridor",
        player: (start: (x: 10.0, y: 0.0), waypoints: [(x: 1.0, y: 0.0)]),
        obstacles: [(center: (x: 5.0, y: 0.5), radius: 0.75)],
        templates: [(name: "grunt", stats: (health: 20.0, attack: 3.0, speed: 1.0))],
        spawns: [(template: "grunt", position: (x: 0.0, y: 0.0))],
    )"#;

    #[test]
    fn parses_with_defaults() {
        let scenario = Scenario::from_ron_str(CORRIDOR).unwrap();

        assert_eq!(scenario.player.speed, PlayerSetup::DEFAULT_SPEED);
        assert_eq!(scenario.player.waypoints, [Vec2::new(1.0, 0.0)]);
        assert_eq!(scenario.obstacles.len(), 1);
        assert_eq!(scenario.spawns[0].seed, None);
        assert_eq!(scenario.template("grunt").map(|t| t.stats.health), Some(20.0));
    }

    #[test]
    fn unknown_template_is_rejected() {
        let scenario = Scenario::new("broken", PlayerSetup::at(Vec2::ZERO))
            .with_spawn(Spawn::new("ghost", Vec2::ZERO));

        let err = scenario.validate().unwrap_err();

        assert!(matches!(err, RuntimeError::UnknownTemplate { template } if template == "ghost"));
    }

    #[test]
    fn duplicate_templates_are_rejected() {
        let template = EnemyTemplate::new("grunt", StatContainer::default());
        let scenario = Scenario::new("dupes", PlayerSetup::at(Vec2::ZERO))
            .with_template(template.clone())
            .with_template(template);

        assert!(matches!(scenario.validate(), Err(RuntimeError::InvalidScenario(_))));
    }

    #[test]
    fn malformed_ron_reports_parse_error() {
        let err = Scenario::from_ron_str("(name: ").unwrap_err();
        assert!(matches!(err, RuntimeError::ScenarioParse(_)));
    }
}
