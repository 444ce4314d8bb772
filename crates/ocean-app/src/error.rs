use std::path::PathBuf;

use ocean_render::{RenderContextError, RenderError};
use ocean_scene::{SceneError, SkyboxError};
use ocean_terrain::HeightmapError;

/// Anything that stops the demo from starting.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] RenderContextError),

    #[error("heightmap for preset '{preset}': {source}")]
    Heightmap {
        preset: &'static str,
        #[source]
        source: HeightmapError,
    },

    #[error("skybox '{preset}': {source}")]
    Skybox {
        preset: &'static str,
        #[source]
        source: SkyboxError,
    },

    #[error("failed to load terrain texture {}: {source}", path.display())]
    TerrainTexture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid startup preset: {0}")]
    Scene(#[from] SceneError),

    #[error("renderer initialization failed: {0}")]
    Render(#[from] RenderError),
}
