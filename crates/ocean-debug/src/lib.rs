//! HTTP tuning API for the running demo.
//!
//! The server thread never mutates the scene. It reads the [`TuningState`]
//! snapshot the frame loop publishes and forwards parameter changes through a
//! [`ParamSender`](ocean_scene::ParamSender).

pub mod server;

pub use server::{TuningServer, TuningServerError};

#[cfg(test)]
mod tests;

use ocean_scene::SceneParams;

/// Port used when neither the config nor the environment names one.
pub const DEFAULT_TUNING_PORT: u16 = 9999;

/// Environment variable overriding the configured tuning port.
pub const TUNING_PORT_ENV: &str = "OCEAN_TUNING_PORT";

/// Snapshot shared between the frame loop and the tuning server.
/// Written once per frame, read by the server on request.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct TuningState {
    pub frame_count: u64,
    pub frame_time_ms: f64,
    pub fps: f64,
    pub window_width: u32,
    pub window_height: u32,
    pub uptime_seconds: f64,
    pub fly_camera_enabled: bool,
    pub quit_requested: bool,
    /// Served separately on `/params`.
    #[serde(skip)]
    pub params: SceneParams,
}

/// Tuning port from `OCEAN_TUNING_PORT`, falling back to `configured`.
pub fn get_tuning_port(configured: u16) -> u16 {
    parse_port(std::env::var(TUNING_PORT_ENV).ok().as_deref()).unwrap_or(configured)
}

fn parse_port(value: Option<&str>) -> Option<u16> {
    value.and_then(|s| s.trim().parse().ok())
}
