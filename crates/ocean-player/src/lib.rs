//! Fly-through camera controller for the ocean demo.

mod fly_camera;

pub use fly_camera::{FlyCamera, FlyInput, FlyToggle, MAX_PITCH_SIN};
