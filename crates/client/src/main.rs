//! Headless encounter runner.
//!
//! Loads a scenario, drives it for a fixed number of frames and prints what
//! the enemies did. Configuration comes from the environment (and `.env`);
//! see [`config::ClientConfig::from_env`].
//!
//! ```bash
//! SCENARIO_PATH=scenarios/corridor.ron FRAMES=900 RUST_LOG=debug \
//!     cargo run -p enemy-ai-client
//! ```
mod config;
mod logging;
mod report;

use std::rc::Rc;

use anyhow::{Context, Result};
use event_bus::BusRegistry;
use runtime::{Runtime, Scenario};

use config::ClientConfig;
use report::Watch;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(config.log_dir.as_deref(), config.session_id.as_deref())?;

    tracing::info!(?config, "starting headless run");

    let scenario = Scenario::load_from_file(&config.scenario_path)
        .with_context(|| format!("loading {}", config.scenario_path.display()))?;
    let name = scenario.name.clone();

    let bus = Rc::new(BusRegistry::new());
    let watch = Watch::register(&bus);

    let mut runtime = Runtime::builder()
        .config(config.runtime.clone())
        .scenario(scenario)
        .bus(Rc::clone(&bus))
        .build()
        .context("building runtime")?;

    for _ in 0..config.frames {
        runtime.tick(config.frame_dt)?;
        if !runtime.player().is_alive() {
            tracing::info!(frame = runtime.frame(), "player died");
            break;
        }
    }

    let frames = runtime.frame();
    let health = runtime.player().health();
    let report = watch.unregister(&bus);
    runtime.shutdown();

    println!("scenario:          {name}");
    println!("frames simulated:  {frames}");
    println!("player health:     {health:.1}");
    println!("{report}");

    tracing::info!("headless run complete");
    Ok(())
}
