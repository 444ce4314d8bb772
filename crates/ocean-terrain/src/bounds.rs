use glam::Vec2;
use serde::{Deserialize, Serialize};

/// World-space XZ rectangle the heightmap is stretched over.
///
/// `max_x > min_x` and `max_z > min_z` are expected but not checked; a
/// degenerate rectangle produces non-finite texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct HeightfieldBounds {
    pub min_x: f32,
    pub min_z: f32,
    pub max_x: f32,
    pub max_z: f32,
}

impl Default for HeightfieldBounds {
    /// Covers the 2x2 block of 10-unit tiles centred on the origin.
    fn default() -> Self {
        Self {
            min_x: -10.0,
            min_z: -10.0,
            max_x: 10.0,
            max_z: 10.0,
        }
    }
}

impl HeightfieldBounds {
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.min_x, self.min_z)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.max_x, self.max_z)
    }

    pub fn size(&self) -> Vec2 {
        self.max() - self.min()
    }

    /// Maps a world XZ position to heightmap UV. Outside positions fall outside `[0, 1]`.
    pub fn world_to_uv(&self, xz: Vec2) -> Vec2 {
        (xz - self.min()) / self.size()
    }
}

impl From<[f32; 4]> for HeightfieldBounds {
    fn from([min_x, min_z, max_x, max_z]: [f32; 4]) -> Self {
        Self {
            min_x,
            min_z,
            max_x,
            max_z,
        }
    }
}

impl From<HeightfieldBounds> for [f32; 4] {
    fn from(b: HeightfieldBounds) -> Self {
        [b.min_x, b.min_z, b.max_x, b.max_z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_uv_corners_and_center() {
        let b = HeightfieldBounds::default();
        assert_eq!(b.world_to_uv(Vec2::new(-10.0, -10.0)), Vec2::ZERO);
        assert_eq!(b.world_to_uv(Vec2::new(10.0, 10.0)), Vec2::ONE);
        assert_eq!(b.world_to_uv(Vec2::ZERO), Vec2::splat(0.5));
    }

    #[test]
    fn test_asymmetric_bounds() {
        let b = HeightfieldBounds::from([0.0, -4.0, 8.0, 4.0]);
        assert_eq!(b.world_to_uv(Vec2::new(2.0, 0.0)), Vec2::new(0.25, 0.5));
    }

    #[test]
    fn test_array_form() {
        let b = HeightfieldBounds::default();
        let arr: [f32; 4] = b.into();
        assert_eq!(arr, [-10.0, -10.0, 10.0, 10.0]);
        assert_eq!(HeightfieldBounds::from(arr), b);
    }
}
