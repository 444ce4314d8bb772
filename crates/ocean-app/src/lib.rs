//! Application shell for the ocean demo: window, input, frame clock and the
//! glue between the tuning API, the scene parameters and the renderer.

pub mod app;
pub mod assets;
pub mod error;
pub mod frame_clock;

pub use app::{OceanApp, run, shortcut_updates, window_attributes_from_config};
pub use assets::{SKYBOX_FACE_SIZE, initial_camera, initial_params, load_scene_assets};
pub use error::AppError;
pub use frame_clock::{FrameClock, MAX_FRAME_TIME};
