use glam::{Vec2, Vec3};

/// One vertex of the unit grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridVertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// Integer grid coordinates, so tiling textures repeat once per cell.
    pub uv: Vec2,
}

/// Flat `columns x rows` vertex grid spanning the unit square on XZ.
///
/// Terrain and ocean share this mesh; their vertex shaders displace it.
#[derive(Debug, Clone)]
pub struct GridMesh {
    pub columns: u32,
    pub rows: u32,
    pub vertices: Vec<GridVertex>,
    pub indices: Vec<u32>,
}

impl GridMesh {
    /// Builds the grid. Fewer than two vertices per side is bumped to two.
    pub fn new(columns: u32, rows: u32) -> Self {
        let columns = columns.max(2);
        let rows = rows.max(2);
        let scale = Vec2::new(1.0 / (columns - 1) as f32, 1.0 / (rows - 1) as f32);

        let mut vertices = Vec::with_capacity((columns * rows) as usize);
        let mut indices = Vec::with_capacity(((columns - 1) * (rows - 1) * 6) as usize);

        for j in 0..rows {
            for i in 0..columns {
                vertices.push(GridVertex {
                    position: Vec3::new(i as f32 * scale.x, 0.0, j as f32 * scale.y),
                    normal: Vec3::Y,
                    uv: Vec2::new(i as f32, j as f32),
                });

                if i > 0 && j > 0 {
                    let top_right = j * columns + i;
                    let top_left = top_right - 1;
                    let bottom_right = top_right - columns;
                    let bottom_left = bottom_right - 1;

                    indices.extend_from_slice(&[bottom_left, bottom_right, top_left]);
                    indices.extend_from_slice(&[bottom_right, top_left, top_right]);
                }
            }
        }

        Self {
            columns,
            rows,
            vertices,
            indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let grid = GridMesh::new(128, 128);
        assert_eq!(grid.vertices.len(), 128 * 128);
        assert_eq!(grid.indices.len(), 127 * 127 * 6);
    }

    #[test]
    fn test_spans_unit_square() {
        let grid = GridMesh::new(5, 3);
        assert_eq!(grid.vertices[0].position, Vec3::ZERO);
        let last = grid.vertices.last().unwrap();
        assert_eq!(last.position, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(last.uv, Vec2::new(4.0, 2.0));
        assert!(grid.vertices.iter().all(|v| v.normal == Vec3::Y));
    }

    #[test]
    fn test_indices_in_range() {
        let grid = GridMesh::new(7, 4);
        let n = grid.vertices.len() as u32;
        assert!(grid.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_first_quad_layout() {
        let grid = GridMesh::new(3, 3);
        assert_eq!(&grid.indices[..6], &[0, 1, 3, 1, 3, 4]);
    }

    #[test]
    fn test_degenerate_request_clamped() {
        let grid = GridMesh::new(0, 1);
        assert_eq!((grid.columns, grid.rows), (2, 2));
        assert_eq!(grid.indices.len(), 6);
    }
}
