//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Ocean demo command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "ocean-demo", about = "Gerstner-wave ocean over procedural terrain")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Terrain preset index to start with.
    #[arg(long)]
    pub preset: Option<usize>,

    /// Skybox preset index to start with.
    #[arg(long)]
    pub skybox: Option<usize>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Port for the HTTP tuning server.
    #[arg(long)]
    pub tuning_port: Option<u16>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(preset) = args.preset {
            self.scene.terrain_preset = preset;
        }
        if let Some(skybox) = args.skybox {
            self.scene.skybox_preset = skybox;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(port) = args.tuning_port {
            self.debug.tuning_port = port;
        }
    }
}
