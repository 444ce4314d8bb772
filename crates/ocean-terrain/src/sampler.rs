use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{HeightfieldBounds, Heightmap};

/// How a heightmap is placed in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightfieldParams {
    pub bounds: HeightfieldBounds,
    /// Multiplies raw samples (which lie in `[-0.5, 0.5]`).
    pub height_scale: f32,
    /// Added after scaling; sea level is y = 0.
    pub height_offset: f32,
    /// World-space step used for finite-difference normals.
    pub sample_offset: f32,
}

impl Default for HeightfieldParams {
    fn default() -> Self {
        Self {
            bounds: HeightfieldBounds::default(),
            height_scale: 1.5,
            height_offset: -0.7,
            sample_offset: 0.1,
        }
    }
}

/// Height and surface normal at a world XZ position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightSample {
    pub height: f32,
    pub normal: Vec3,
}

/// World XZ -> terrain height queries against a borrowed heightmap.
#[derive(Debug, Clone, Copy)]
pub struct HeightfieldSampler<'a> {
    map: &'a Heightmap,
    params: HeightfieldParams,
}

impl<'a> HeightfieldSampler<'a> {
    pub fn new(map: &'a Heightmap, params: HeightfieldParams) -> Self {
        Self { map, params }
    }

    pub fn params(&self) -> &HeightfieldParams {
        &self.params
    }

    /// Terrain height at world `(x, z)`. Positions outside the bounds take
    /// the nearest edge value.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let uv = self.params.bounds.world_to_uv(Vec2::new(x, z));
        self.params.height_offset + self.params.height_scale * self.map.sample_bilinear(uv.x, uv.y)
    }

    /// Normal from central differences `sample_offset` apart along X and Z.
    pub fn normal(&self, x: f32, z: f32) -> Vec3 {
        let off = self.params.sample_offset;
        let h_left = self.height(x - off, z);
        let h_right = self.height(x + off, z);
        let h_back = self.height(x, z - off);
        let h_front = self.height(x, z + off);

        let tangent = Vec3::new(2.0 * off, h_right - h_left, 0.0);
        let bitangent = Vec3::new(0.0, h_front - h_back, 2.0 * off);
        bitangent.cross(tangent).try_normalize().unwrap_or(Vec3::Y)
    }

    pub fn sample(&self, x: f32, z: f32) -> HeightSample {
        HeightSample {
            height: self.height(x, z),
            normal: self.normal(x, z),
        }
    }

    /// Depth of the terrain below sea level (negative above water).
    pub fn depth(&self, x: f32, z: f32) -> f32 {
        -self.height(x, z)
    }
}
