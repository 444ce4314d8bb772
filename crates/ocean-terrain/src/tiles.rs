use glam::{Mat4, Vec3};

/// World size of one grid tile.
pub const TILE_SCALE: f32 = 10.0;

/// Where a unit grid tile is placed in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub translation: Vec3,
    pub scale: f32,
}

impl TilePlacement {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// 2x2 block of tiles covering `[-10, 10]` on X and Z.
pub const TERRAIN_TILES: [TilePlacement; 4] = [
    TilePlacement {
        translation: Vec3::new(0.0, 0.0, 0.0),
        scale: TILE_SCALE,
    },
    TilePlacement {
        translation: Vec3::new(-TILE_SCALE, 0.0, 0.0),
        scale: TILE_SCALE,
    },
    TilePlacement {
        translation: Vec3::new(0.0, 0.0, -TILE_SCALE),
        scale: TILE_SCALE,
    },
    TilePlacement {
        translation: Vec3::new(-TILE_SCALE, 0.0, -TILE_SCALE),
        scale: TILE_SCALE,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeightfieldBounds;

    #[test]
    fn test_tiles_cover_default_bounds() {
        let bounds = HeightfieldBounds::default();
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for tile in TERRAIN_TILES {
            let m = tile.model_matrix();
            for corner in [Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)] {
                let p = m.transform_point3(corner);
                min = min.min(p);
                max = max.max(p);
            }
        }
        assert_eq!((min.x, min.z), (bounds.min_x, bounds.min_z));
        assert_eq!((max.x, max.z), (bounds.max_x, bounds.max_z));
    }

    #[test]
    fn test_model_matrix_scales_then_translates() {
        let m = TERRAIN_TILES[1].model_matrix();
        assert_eq!(m.transform_point3(Vec3::new(0.5, 0.0, 0.5)), Vec3::new(-5.0, 0.0, 5.0));
    }
}
