//! Parameter update protocol.
//!
//! Producers (keyboard shortcuts, the HTTP tuning server) never touch
//! [`SceneParams`] directly. They send [`ParamUpdate`]s, and the frame loop
//! applies everything queued once per frame before updating the scene.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use ocean_terrain::HeightfieldBounds;
use ocean_waves::{GerstnerWave, WAVE_COUNT};
use serde::{Deserialize, Serialize};

use crate::{SceneError, SceneParams};

/// One change to the scene. JSON form: `{"param": "height_scale", "value": 2.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "param", content = "value", rename_all = "snake_case")]
pub enum ParamUpdate {
    Bounds(HeightfieldBounds),
    HeightScale(f32),
    HeightOffset(f32),
    SampleOffset(f32),
    TerrainColor([f32; 3]),
    TerrainSpecularExponent(f32),
    TerrainSpecularStrength(f32),

    Wave { index: usize, wave: GerstnerWave },
    CoastOffset(f32),
    CoastExponent(f32),
    WaveScale(f32),

    ColorShallow([f32; 3]),
    ColorDeep([f32; 3]),
    Murkiness(f32),
    FakeRefraction(f32),
    FresnelBias(f32),
    FresnelScale(f32),
    FresnelPower(f32),
    DetailAnimSpeed(f32),
    DetailScale(f32),

    AmbientColor([f32; 3]),
    LightColor([f32; 3]),
    LightPosition([f32; 3]),
    LightIntensity(f32),

    TranslationSpeed(f32),
    RotationSpeed(f32),

    ApplyPreset(usize),
    ApplySkybox(usize),
}

impl SceneParams {
    /// Applies one update. Rejected updates leave the scene unchanged.
    pub fn apply_update(&mut self, update: ParamUpdate) -> Result<(), SceneError> {
        use ParamUpdate::*;

        let terrain = &mut self.terrain;
        let waves = &mut self.ocean.waves;
        let optics = &mut self.ocean.optics;
        let light = &mut self.light;

        match update {
            Bounds(b) => terrain.shape.bounds = b,
            HeightScale(v) => terrain.shape.height_scale = v,
            HeightOffset(v) => terrain.shape.height_offset = v,
            SampleOffset(v) => terrain.shape.sample_offset = v,
            TerrainColor(c) => terrain.color = c,
            TerrainSpecularExponent(v) => terrain.specular_exponent = v,
            TerrainSpecularStrength(v) => terrain.specular_strength = v,

            Wave { index, wave } => {
                let slot = waves.waves.get_mut(index).ok_or(SceneError::WaveIndex {
                    index,
                    count: WAVE_COUNT,
                })?;
                *slot = wave;
            }
            CoastOffset(v) => waves.coast_offset = v,
            CoastExponent(v) => waves.coast_exponent = v,
            WaveScale(v) => waves.wave_scale = v,

            ColorShallow(c) => optics.color_shallow = c,
            ColorDeep(c) => optics.color_deep = c,
            Murkiness(v) => optics.murkiness = v,
            FakeRefraction(v) => optics.fake_refraction = v,
            FresnelBias(v) => optics.fresnel_bias = v,
            FresnelScale(v) => optics.fresnel_scale = v,
            FresnelPower(v) => optics.fresnel_power = v,
            DetailAnimSpeed(v) => optics.detail_anim_speed = v,
            DetailScale(v) => optics.detail_scale = v,

            AmbientColor(c) => light.ambient_color = c,
            LightColor(c) => light.light_color = c,
            LightPosition(p) => light.light_position = p,
            LightIntensity(v) => light.light_intensity = v,

            TranslationSpeed(v) => self.camera.translation_speed = v,
            RotationSpeed(v) => self.camera.rotation_speed = v,

            ApplyPreset(id) => self.apply_preset(id)?,
            ApplySkybox(id) => self.apply_skybox(id)?,
        }
        Ok(())
    }
}

/// Producer half of the update queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ParamSender {
    tx: Sender<ParamUpdate>,
}

impl ParamSender {
    /// Queues an update. Returns `false` once the render loop has gone away.
    pub fn send(&self, update: ParamUpdate) -> bool {
        self.tx.send(update).is_ok()
    }
}

/// Consumer half, owned by the frame loop.
#[derive(Debug)]
pub struct ParamQueue {
    rx: Receiver<ParamUpdate>,
}

/// Creates a connected sender/queue pair.
pub fn param_channel() -> (ParamSender, ParamQueue) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (ParamSender { tx }, ParamQueue { rx })
}

impl ParamQueue {
    /// Applies every pending update in arrival order and returns how many
    /// were accepted. Rejected ones are logged and dropped.
    pub fn drain_into(&self, params: &mut SceneParams) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(update) => match params.apply_update(update) {
                    Ok(()) => applied += 1,
                    Err(err) => tracing::warn!("dropping parameter update: {err}"),
                },
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        applied
    }
}
