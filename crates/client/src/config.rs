//! Headless client configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use runtime::RuntimeConfig;

/// Configuration required to run a scenario from the command line.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub scenario_path: PathBuf,
    pub frames: u32,
    pub frame_dt: f32,
    pub runtime: RuntimeConfig,
    pub log_dir: Option<PathBuf>,
    pub session_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scenario_path: PathBuf::from(Self::DEFAULT_SCENARIO),
            frames: 600,
            frame_dt: 1.0 / 60.0,
            runtime: RuntimeConfig::default(),
            log_dir: None,
            session_id: None,
        }
    }
}

impl ClientConfig {
    pub const DEFAULT_SCENARIO: &'static str = "scenarios/corridor.ron";

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SCENARIO_PATH` - Scenario RON file (default: `scenarios/corridor.ron`)
    /// - `FRAMES` - Frames to simulate (default: 600)
    /// - `FRAME_DT` - Seconds per rendered frame (default: 1/60)
    /// - `FIXED_DT` - Seconds per physics step (default: 0.02)
    /// - `MAX_PHYSICS_STEPS` - Physics steps allowed per frame (default: 8)
    /// - `SIM_SEED` - Base seed for random behaviours (default: 0)
    /// - `HIT_RADIUS` - How close to the aimed point the player must be to
    ///   take a hit (default: 0.5)
    /// - `LOG_DIR` - Directory for log files (default: platform-specific)
    /// - `SESSION_ID` - Log subdirectory name (default: auto-generated)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but reads through `lookup`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("SCENARIO_PATH") {
            config.scenario_path = PathBuf::from(path);
        }
        if let Some(frames) = read_env::<u32>(&lookup, "FRAMES") {
            config.frames = frames;
        }
        if let Some(dt) = read_env::<f32>(&lookup, "FRAME_DT") {
            config.frame_dt = dt;
        }
        if let Some(dt) = read_env::<f32>(&lookup, "FIXED_DT") {
            config.runtime.fixed_dt = dt;
        }
        if let Some(steps) = read_env::<u32>(&lookup, "MAX_PHYSICS_STEPS") {
            config.runtime.max_physics_steps = steps.max(1);
        }
        if let Some(seed) = read_env::<u64>(&lookup, "SIM_SEED") {
            config.runtime.seed = seed;
        }
        if let Some(radius) = read_env::<f32>(&lookup, "HIT_RADIUS") {
            config.runtime.hit_radius = radius;
        }

        config.log_dir = lookup("LOG_DIR").map(PathBuf::from);
        config.session_id = lookup("SESSION_ID");

        config
    }
}

fn read_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(config(&[]), ClientConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = config(&[
            ("SCENARIO_PATH", "arena.ron"),
            ("FRAMES", "120"),
            ("FIXED_DT", "0.01"),
            ("MAX_PHYSICS_STEPS", "0"),
            ("SIM_SEED", "9"),
            ("HIT_RADIUS", "0.75"),
        ]);

        assert_eq!(config.scenario_path, PathBuf::from("arena.ron"));
        assert_eq!(config.frames, 120);
        assert_eq!(config.runtime.fixed_dt, 0.01);
        assert_eq!(config.runtime.max_physics_steps, 1);
        assert_eq!(config.runtime.seed, 9);
        assert_eq!(config.runtime.hit_radius, 0.75);
    }

    #[test]
    fn unparsable_values_are_ignored() {
        let config = config(&[("FRAMES", "lots")]);
        assert_eq!(config.frames, ClientConfig::default().frames);
    }
}
