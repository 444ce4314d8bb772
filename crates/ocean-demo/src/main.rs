//! Ocean demo: Gerstner-wave water over procedural heightfield terrain.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p ocean-demo -- --preset 2 --skybox 1`.
//!
//! Controls: Space toggles the fly camera (WASD/QE to move, mouse to look,
//! Shift to boost), 1-4 switch terrain presets, F1-F4 switch skyboxes,
//! Escape quits.

use clap::Parser;
use ocean_config::{CliArgs, Config};
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(Config::default_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    ocean_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    info!("Config directory: {}", config_dir.display());

    if let Err(e) = ocean_app::run(config) {
        error!("{e}");
        std::process::exit(1);
    }
}
