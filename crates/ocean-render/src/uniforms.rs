//! GPU uniform blocks and their construction from scene state.
//!
//! Every block is rebuilt and uploaded every frame; nothing tracks changes.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use ocean_scene::SceneParams;
use ocean_waves::SEA_LEVEL;

use crate::camera::Camera;

/// Camera and lighting shared by all passes. Group 0, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    /// Used by the sky to rebuild view rays.
    pub inv_view_proj: [[f32; 4]; 4],
    /// Camera position (xyz), elapsed time in seconds (w).
    pub camera_pos: [f32; 4],
    /// Near, far, target width, target height.
    pub depth_params: [f32; 4],
    pub ambient_color: [f32; 4],
    /// Light color (rgb) and intensity (w).
    pub light_color: [f32; 4],
    pub light_position: [f32; 4],
}

impl FrameUniform {
    pub fn new(camera: &Camera, params: &SceneParams, time: f32, target_size: (u32, u32)) -> Self {
        let view_proj = camera.view_projection_matrix();
        let light = &params.light;
        let position = camera.translation();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            inv_view_proj: view_proj.inverse().to_cols_array_2d(),
            camera_pos: [position.x, position.y, position.z, time],
            depth_params: [
                camera.near,
                camera.far,
                target_size.0.max(1) as f32,
                target_size.1.max(1) as f32,
            ],
            ambient_color: extend(light.ambient_color, 1.0),
            light_color: extend(light.light_color, light.light_intensity),
            light_position: extend(light.light_position, 1.0),
        }
    }
}

/// Per-tile model transform. Group 1, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
}

impl ModelUniform {
    pub fn new(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
        }
    }
}

/// Heightfield mapping and terrain material. Group 2, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainUniform {
    /// min_x, min_z, max_x, max_z.
    pub bounds: [f32; 4],
    /// Height scale, height offset, normal sample offset, unused.
    pub shape: [f32; 4],
    /// Tint (rgb) and specular exponent (w).
    pub color: [f32; 4],
    /// Specular strength (x).
    pub material: [f32; 4],
}

impl TerrainUniform {
    pub fn new(params: &SceneParams) -> Self {
        let terrain = &params.terrain;
        let shape = &terrain.shape;
        let b = shape.bounds;
        Self {
            bounds: [b.min_x, b.min_z, b.max_x, b.max_z],
            shape: [shape.height_scale, shape.height_offset, shape.sample_offset, 0.0],
            color: extend(terrain.color, terrain.specular_exponent),
            material: [terrain.specular_strength, 0.0, 0.0, 0.0],
        }
    }
}

/// Wave set, coast attenuation and water optics. Group 3, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct OceanUniform {
    /// Frequency, speed, width, height per wave.
    pub waves: [[f32; 4]; 4],
    /// Unit direction (xy) per wave.
    pub directions: [[f32; 4]; 4],
    /// Coast offset, coast exponent, wave scale, sea level.
    pub coast: [f32; 4],
    /// Shallow color (rgb) and murkiness (w).
    pub color_shallow: [f32; 4],
    /// Deep color (rgb) and fake refraction strength (w).
    pub color_deep: [f32; 4],
    /// Fresnel bias, scale, power.
    pub fresnel: [f32; 4],
    /// Detail animation speed and scale.
    pub detail: [f32; 4],
}

impl OceanUniform {
    pub fn new(params: &SceneParams) -> Self {
        let field = &params.ocean.waves;
        let optics = &params.ocean.optics;
        let waves = field
            .waves
            .map(|w| [w.frequency, w.speed, w.width, w.height]);
        let directions = field.waves.map(|w| {
            let d = w.direction();
            [d.x, d.y, 0.0, 0.0]
        });
        Self {
            waves,
            directions,
            coast: [
                field.coast_offset,
                field.coast_exponent,
                field.wave_scale,
                SEA_LEVEL,
            ],
            color_shallow: extend(optics.color_shallow, optics.murkiness),
            color_deep: extend(optics.color_deep, optics.fake_refraction),
            fresnel: [
                optics.fresnel_bias,
                optics.fresnel_scale,
                optics.fresnel_power,
                0.0,
            ],
            detail: [optics.detail_anim_speed, optics.detail_scale, 0.0, 0.0],
        }
    }
}

fn extend(rgb: [f32; 3], w: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], w]
}
