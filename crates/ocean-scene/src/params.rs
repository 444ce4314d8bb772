use ocean_terrain::HeightfieldParams;
use ocean_waves::WaveField;
use serde::{Deserialize, Serialize};

/// Terrain placement and surface look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    pub shape: HeightfieldParams,
    /// Tint multiplied with the albedo texture.
    pub color: [f32; 3],
    pub specular_exponent: f32,
    pub specular_strength: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            shape: HeightfieldParams::default(),
            color: [0.76, 0.70, 0.50],
            specular_exponent: 16.0,
            specular_strength: 0.1,
        }
    }
}

/// Water shading controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanOptics {
    pub color_shallow: [f32; 3],
    pub color_deep: [f32; 3],
    /// How fast the water loses transparency with view-ray depth.
    pub murkiness: f32,
    /// Screen-space distortion strength of the refracted scene.
    pub fake_refraction: f32,
    pub fresnel_bias: f32,
    pub fresnel_scale: f32,
    pub fresnel_power: f32,
    /// Scroll speed of the ripple detail layered on the wave normal.
    pub detail_anim_speed: f32,
    /// Spatial frequency of the ripple detail.
    pub detail_scale: f32,
}

impl Default for OceanOptics {
    fn default() -> Self {
        Self {
            color_shallow: [0.10, 0.55, 0.60],
            color_deep: [0.02, 0.12, 0.25],
            murkiness: 0.8,
            fake_refraction: 0.02,
            fresnel_bias: 0.02,
            fresnel_scale: 0.98,
            fresnel_power: 5.0,
            detail_anim_speed: 0.3,
            detail_scale: 4.0,
        }
    }
}

/// Everything that drives the water: the wave field plus its optics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanSurfaceState {
    pub waves: WaveField,
    pub optics: OceanOptics,
}

/// A single point light shared by terrain and water.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightParams {
    pub ambient_color: [f32; 3],
    pub light_color: [f32; 3],
    pub light_position: [f32; 3],
    pub light_intensity: f32,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            ambient_color: [0.25, 0.25, 0.30],
            light_color: [1.0, 0.95, 0.85],
            light_position: [40.0, 60.0, -30.0],
            light_intensity: 1.0,
        }
    }
}

/// Fly-camera speeds exposed for live tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub translation_speed: f32,
    pub rotation_speed: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            translation_speed: 20.0,
            rotation_speed: 0.5,
        }
    }
}

/// All tunable scene state, uploaded to the GPU every frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    pub terrain: TerrainParams,
    pub ocean: OceanSurfaceState,
    pub light: LightParams,
    pub camera: CameraTuning,
    /// Index into [`TERRAIN_PRESETS`](crate::TERRAIN_PRESETS); also selects the heightmap.
    pub terrain_preset: usize,
    /// Index into [`SKYBOX_PRESETS`](crate::SKYBOX_PRESETS).
    pub skybox_preset: usize,
}
