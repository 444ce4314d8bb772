//! Configuration for the ocean demo.
//!
//! Settings persist to disk as a RON file in the platform config directory.
//! CLI arguments override whatever was loaded, and unknown or missing fields
//! fall back to defaults so old config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CameraConfig, Config, DebugConfig, SceneConfig, WindowConfig};
pub use error::ConfigError;
