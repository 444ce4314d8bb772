//! Built-in terrain and skybox presets.

use std::path::Path;

use ocean_terrain::{FbmParams, Heightmap, HeightmapError};

use crate::{SceneError, SceneParams};

/// A terrain shape: which heightmap to use plus how the sea reacts to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainPreset {
    pub name: &'static str,
    pub seed: u32,
    /// Noise-space size of the map.
    pub frequency: f64,
    /// Noise-space origin of the map.
    pub offset: [f64; 2],
    pub height_scale: f32,
    pub coast_offset: f32,
    pub coast_exponent: f32,
    pub wave_scale: f32,
}

pub const TERRAIN_PRESETS: [TerrainPreset; 4] = [
    TerrainPreset {
        name: "archipelago",
        seed: 7,
        frequency: 2.0,
        offset: [0.0, 0.0],
        height_scale: 1.5,
        coast_offset: 0.05,
        coast_exponent: 0.6,
        wave_scale: 1.0,
    },
    TerrainPreset {
        name: "lagoon",
        seed: 21,
        frequency: 1.0,
        offset: [-1.0, 0.0],
        height_scale: 1.0,
        coast_offset: 0.1,
        coast_exponent: 1.0,
        wave_scale: 0.6,
    },
    TerrainPreset {
        name: "highlands",
        seed: 3,
        frequency: 1.5,
        offset: [0.0, -1.0],
        height_scale: 2.4,
        coast_offset: 0.02,
        coast_exponent: 0.4,
        wave_scale: 1.4,
    },
    TerrainPreset {
        name: "open-sea",
        seed: 11,
        frequency: 0.8,
        offset: [-1.0, -1.0],
        height_scale: 0.8,
        coast_offset: 0.0,
        coast_exponent: 0.3,
        wave_scale: 1.8,
    },
];

impl TerrainPreset {
    pub fn fbm_params(&self) -> FbmParams {
        FbmParams {
            seed: self.seed,
            frequency: self.frequency,
            offset: self.offset,
            ..Default::default()
        }
    }

    /// Builds this preset's heightmap.
    ///
    /// With `image_dir` set the map is read from `<image_dir>/<name>.png` and a
    /// missing or unreadable file is an error. Otherwise it is generated.
    pub fn build_heightmap(
        &self,
        resolution: u32,
        image_dir: Option<&Path>,
    ) -> Result<Heightmap, HeightmapError> {
        match image_dir {
            Some(dir) => Heightmap::from_image(&dir.join(format!("{}.png", self.name))),
            None => Heightmap::from_fbm(resolution, resolution, &self.fbm_params()),
        }
    }
}

/// Colour palette for a procedural sky.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyboxPreset {
    pub name: &'static str,
    pub zenith: [f32; 3],
    pub horizon: [f32; 3],
    pub ground: [f32; 3],
    /// Direction toward the sun (need not be normalised).
    pub sun_direction: [f32; 3],
    pub sun_color: [f32; 3],
    /// Angular radius of the sun disc in radians.
    pub sun_radius: f32,
}

pub const SKYBOX_PRESETS: [SkyboxPreset; 4] = [
    SkyboxPreset {
        name: "day",
        zenith: [0.20, 0.45, 0.85],
        horizon: [0.70, 0.85, 0.95],
        ground: [0.35, 0.40, 0.45],
        sun_direction: [0.4, 0.6, -0.3],
        sun_color: [1.0, 0.97, 0.85],
        sun_radius: 0.03,
    },
    SkyboxPreset {
        name: "sunset",
        zenith: [0.25, 0.20, 0.45],
        horizon: [0.98, 0.55, 0.30],
        ground: [0.20, 0.15, 0.18],
        sun_direction: [0.8, 0.08, -0.5],
        sun_color: [1.0, 0.75, 0.45],
        sun_radius: 0.05,
    },
    SkyboxPreset {
        name: "overcast",
        zenith: [0.55, 0.58, 0.62],
        horizon: [0.75, 0.77, 0.80],
        ground: [0.40, 0.42, 0.44],
        sun_direction: [0.0, 1.0, 0.0],
        sun_color: [0.78, 0.80, 0.82],
        sun_radius: 0.0,
    },
    SkyboxPreset {
        name: "night",
        zenith: [0.01, 0.02, 0.06],
        horizon: [0.05, 0.08, 0.15],
        ground: [0.01, 0.01, 0.02],
        sun_direction: [-0.3, 0.5, 0.6],
        sun_color: [0.85, 0.88, 0.95],
        sun_radius: 0.02,
    },
];

impl SceneParams {
    /// Switches to terrain preset `id`.
    ///
    /// Sets the active heightmap, height scale and the three coast/wave shape
    /// values together. Wave oscillators, optics and height offset are kept.
    pub fn apply_preset(&mut self, id: usize) -> Result<(), SceneError> {
        let preset = TERRAIN_PRESETS.get(id).ok_or(SceneError::UnknownPreset {
            id,
            count: TERRAIN_PRESETS.len(),
        })?;

        self.terrain_preset = id;
        self.terrain.shape.height_scale = preset.height_scale;
        self.ocean.waves.coast_offset = preset.coast_offset;
        self.ocean.waves.coast_exponent = preset.coast_exponent;
        self.ocean.waves.wave_scale = preset.wave_scale;
        tracing::info!(preset = preset.name, "applied terrain preset");
        Ok(())
    }

    /// Switches the environment cubemap used by the sky and water reflections.
    pub fn apply_skybox(&mut self, id: usize) -> Result<(), SceneError> {
        let preset = SKYBOX_PRESETS.get(id).ok_or(SceneError::UnknownSkybox {
            id,
            count: SKYBOX_PRESETS.len(),
        })?;
        self.skybox_preset = id;
        tracing::info!(skybox = preset.name, "applied skybox preset");
        Ok(())
    }

    pub fn active_terrain_preset(&self) -> Option<&'static TerrainPreset> {
        TERRAIN_PRESETS.get(self.terrain_preset)
    }
}
