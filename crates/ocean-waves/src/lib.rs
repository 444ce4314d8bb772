//! Gerstner wave synthesis for the ocean surface.
//!
//! Four directional waves are summed on top of a flat sea at y = 0. Each
//! wave moves vertices along its direction as well as up and down, which
//! sharpens crests and flattens troughs. Near the shore the whole sum is
//! faded out by a coast mask driven by how deep the terrain lies below the
//! water at that point.
//!
//! The GPU ocean vertex stage evaluates the same sum; [`WaveField::evaluate`]
//! is the reference used for CPU queries and tests.

use glam::{Vec2, Vec3};
use ocean_terrain::HeightfieldSampler;
use serde::{Deserialize, Serialize};

/// Height of the undisturbed water plane.
pub const SEA_LEVEL: f32 = 0.0;

/// Number of summed waves.
pub const WAVE_COUNT: usize = 4;

/// One directional Gerstner oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GerstnerWave {
    /// Spatial frequency (radians per world unit).
    pub frequency: f32,
    /// Phase speed (radians per second).
    pub speed: f32,
    /// Horizontal displacement amplitude.
    pub width: f32,
    /// Vertical displacement amplitude.
    pub height: f32,
    /// Travel direction as an angle around +Y, measured from +X toward +Z.
    pub direction_angle: f32,
}

impl Default for GerstnerWave {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            speed: 1.0,
            width: 0.0,
            height: 0.0,
            direction_angle: 0.0,
        }
    }
}

impl GerstnerWave {
    /// Unit XZ direction.
    pub fn direction(&self) -> Vec2 {
        let (sin, cos) = self.direction_angle.sin_cos();
        Vec2::new(cos, sin)
    }

    pub fn phase(&self, xz: Vec2, time: f32) -> f32 {
        self.frequency * self.direction().dot(xz) + self.speed * time
    }
}

/// Result of evaluating the wave field at one XZ position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveSample {
    /// Displaced surface point in world space.
    pub position: Vec3,
    pub normal: Vec3,
    /// Coast attenuation that was applied, in `[0, 1]`.
    pub attenuation: f32,
}

/// The 4 waves plus the coast mask controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveField {
    pub waves: [GerstnerWave; WAVE_COUNT],
    /// Depth below sea level at which waves start to appear.
    pub coast_offset: f32,
    /// Shapes how quickly waves grow past `coast_offset`.
    pub coast_exponent: f32,
    /// Global multiplier on every wave.
    pub wave_scale: f32,
}

impl Default for WaveField {
    fn default() -> Self {
        Self {
            waves: [
                GerstnerWave {
                    frequency: 0.6,
                    speed: 1.1,
                    width: 0.25,
                    height: 0.12,
                    direction_angle: 0.3,
                },
                GerstnerWave {
                    frequency: 1.1,
                    speed: 1.5,
                    width: 0.15,
                    height: 0.07,
                    direction_angle: 1.9,
                },
                GerstnerWave {
                    frequency: 2.3,
                    speed: 2.2,
                    width: 0.08,
                    height: 0.035,
                    direction_angle: -0.8,
                },
                GerstnerWave {
                    frequency: 3.7,
                    speed: 2.9,
                    width: 0.04,
                    height: 0.02,
                    direction_angle: 2.7,
                },
            ],
            coast_offset: 0.05,
            coast_exponent: 0.6,
            wave_scale: 1.0,
        }
    }
}

/// `clamp01(depth - offset) ^ exponent`.
///
/// Zero on land and in shallows up to `offset`, growing to one a unit of
/// water deeper. For `exponent >= 0` the result always stays in `[0, 1]`.
/// An exponent of zero disables attenuation everywhere, land included.
pub fn coast_attenuation(depth: f32, offset: f32, exponent: f32) -> f32 {
    let d = (depth - offset).clamp(0.0, 1.0);
    if d <= 0.0 {
        // pow(0, 0) is 1; the water shader takes the same branch
        return if exponent == 0.0 { 1.0 } else { 0.0 };
    }
    d.powf(exponent)
}

impl WaveField {
    /// Attenuation for terrain `depth` below sea level.
    pub fn attenuation(&self, depth: f32) -> f32 {
        coast_attenuation(depth, self.coast_offset, self.coast_exponent)
    }

    /// Displaced position and analytic normal at `xz`.
    ///
    /// `depth` is how far the terrain lies below sea level at the same point.
    pub fn evaluate(&self, xz: Vec2, time: f32, depth: f32) -> WaveSample {
        let attenuation = self.attenuation(depth);
        let k = self.wave_scale * attenuation;

        let mut position = Vec3::new(xz.x, SEA_LEVEL, xz.y);
        let mut dpdx = Vec3::X;
        let mut dpdz = Vec3::Z;

        for wave in &self.waves {
            let d = wave.direction();
            let phase = wave.phase(xz, time);
            let (sin, cos) = phase.sin_cos();
            let wa = k * wave.width;
            let ha = k * wave.height;
            let f = wave.frequency;

            position.x += wa * d.x * cos;
            position.y += ha * sin;
            position.z += wa * d.y * cos;

            dpdx += Vec3::new(
                -wa * f * d.x * d.x * sin,
                ha * f * d.x * cos,
                -wa * f * d.x * d.y * sin,
            );
            dpdz += Vec3::new(
                -wa * f * d.x * d.y * sin,
                ha * f * d.y * cos,
                -wa * f * d.y * d.y * sin,
            );
        }

        let normal = dpdz.cross(dpdx).try_normalize().unwrap_or(Vec3::Y);

        WaveSample {
            position,
            normal,
            attenuation,
        }
    }

    /// [`evaluate`](Self::evaluate) with the depth taken from the terrain.
    pub fn evaluate_over(
        &self,
        terrain: &HeightfieldSampler<'_>,
        xz: Vec2,
        time: f32,
    ) -> WaveSample {
        self.evaluate(xz, time, terrain.depth(xz.x, xz.y) + SEA_LEVEL)
    }

    /// Largest vertical displacement any point can reach.
    pub fn max_height(&self) -> f32 {
        self.wave_scale.abs() * self.waves.iter().map(|w| w.height.abs()).sum::<f32>()
    }

    /// Largest horizontal displacement any point can reach.
    pub fn max_width(&self) -> f32 {
        self.wave_scale.abs() * self.waves.iter().map(|w| w.width.abs()).sum::<f32>()
    }
}
