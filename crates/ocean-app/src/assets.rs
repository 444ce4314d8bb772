//! CPU-side scene assets and the startup parameter state, built from config
//! before any window or GPU exists.

use std::path::Path;

use ocean_config::Config;
use ocean_render::{AlbedoImage, Camera, SceneAssets};
use ocean_scene::{SKYBOX_PRESETS, SceneParams, SkyboxFaces, TERRAIN_PRESETS};
use tracing::{debug, info};

use crate::error::AppError;

/// Edge length of generated skybox faces.
pub const SKYBOX_FACE_SIZE: u32 = 256;

/// Generates or loads one heightmap per terrain preset and one environment per
/// skybox preset. Any failure is fatal; nothing falls back to a default.
pub fn load_scene_assets(config: &Config) -> Result<SceneAssets, AppError> {
    let scene = &config.scene;

    let mut heightmaps = Vec::with_capacity(TERRAIN_PRESETS.len());
    for preset in &TERRAIN_PRESETS {
        let map = preset
            .build_heightmap(scene.heightmap_resolution, scene.heightmap_dir.as_deref())
            .map_err(|source| AppError::Heightmap {
                preset: preset.name,
                source,
            })?;
        debug!(
            "Heightmap '{}' ready ({}x{})",
            preset.name,
            map.width(),
            map.height()
        );
        heightmaps.push(map);
    }

    let mut skyboxes = Vec::with_capacity(SKYBOX_PRESETS.len());
    for preset in &SKYBOX_PRESETS {
        let faces = match &scene.skybox_dir {
            Some(dir) => SkyboxFaces::load_dir(&dir.join(preset.name)).map_err(|source| {
                AppError::Skybox {
                    preset: preset.name,
                    source,
                }
            })?,
            None => SkyboxFaces::procedural(preset, SKYBOX_FACE_SIZE),
        };
        skyboxes.push(faces);
    }

    let terrain_albedo = match &scene.terrain_texture {
        Some(path) => Some(load_albedo(path)?),
        None => None,
    };

    info!(
        "Loaded {} heightmaps and {} skyboxes",
        heightmaps.len(),
        skyboxes.len()
    );

    Ok(SceneAssets {
        heightmaps,
        skyboxes,
        terrain_albedo,
        grid_resolution: scene.grid_resolution,
    })
}

fn load_albedo(path: &Path) -> Result<AlbedoImage, AppError> {
    let image = image::open(path)
        .map_err(|source| AppError::TerrainTexture {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok(AlbedoImage {
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// Parameter state at startup: defaults, then the configured presets and
/// camera speeds.
pub fn initial_params(config: &Config) -> Result<SceneParams, AppError> {
    let mut params = SceneParams::default();
    params.apply_preset(config.scene.terrain_preset)?;
    params.apply_skybox(config.scene.skybox_preset)?;
    params.camera.translation_speed = config.camera.translation_speed;
    params.camera.rotation_speed = config.camera.rotation_speed;
    Ok(params)
}

/// Render camera with the configured lens. The view is set by the fly camera.
pub fn initial_camera(config: &Config, width: u32, height: u32) -> Camera {
    let mut camera = Camera {
        fov_y: config.camera.fov_y,
        near: config.camera.near,
        far: config.camera.far,
        ..Camera::default()
    };
    camera.set_aspect_ratio(width as f32, height as f32);
    camera
}
