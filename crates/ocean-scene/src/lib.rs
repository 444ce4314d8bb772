//! Tunable scene state for the ocean demo.
//!
//! [`SceneParams`] is the single parameter bag the renderer reads every frame.
//! It is only mutated on the render thread, through [`SceneParams::apply_update`];
//! other threads submit [`ParamUpdate`]s through a [`ParamSender`] and the
//! frame loop drains them from the matching [`ParamQueue`].

mod error;
mod params;
mod presets;
mod skybox;
mod update;

pub use error::{SceneError, SkyboxError};
pub use params::{CameraTuning, LightParams, OceanOptics, OceanSurfaceState, SceneParams, TerrainParams};
pub use presets::{SKYBOX_PRESETS, SkyboxPreset, TERRAIN_PRESETS, TerrainPreset};
pub use skybox::{CUBE_FACE_NAMES, SkyboxFaces, cube_face_direction};
pub use update::{ParamQueue, ParamSender, ParamUpdate, param_channel};
