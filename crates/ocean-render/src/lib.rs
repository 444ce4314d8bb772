//! wgpu rendering for the terrain + water scene: device and surface setup,
//! textures, shaders, pipelines and the pre-pass / main / water frame sequence.

pub mod buffer;
pub mod camera;
pub mod capture;
pub mod depth;
pub mod gpu;
pub mod orchestrator;
pub mod pass;
pub mod pipelines;
pub mod shader;
pub mod texture;
pub mod uniforms;

#[cfg(test)]
mod test_util;

pub use buffer::{MeshBuffer, VertexPositionNormalUv};
pub use camera::Camera;
pub use capture::OffscreenCapture;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use orchestrator::{
    AlbedoImage, FRAME_SEQUENCE, FramePass, PassTarget, RenderError, SceneAssets, SceneRenderer,
};
pub use pass::{DepthAttachmentConfig, FrameEncoder, HAZE, RenderPassBuilder};
pub use pipelines::{SceneLayouts, ScenePipelines};
pub use shader::{OCEAN_SHADER, SKY_SHADER, ShaderError, ShaderLibrary, TERRAIN_SHADER};
pub use texture::{ManagedTexture, TextureError, TextureManager, mip_level_count};
pub use uniforms::{FrameUniform, ModelUniform, OceanUniform, TerrainUniform};
