//! Vertex and index buffers.

use bytemuck::{Pod, Zeroable};
use ocean_terrain::GridMesh;
use wgpu::util::DeviceExt;

/// Vertex and index buffers of one mesh, drawn with a single indexed call.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn new(device: &wgpu::Device, label: &str, vertices: &[u8], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: vertices,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Uploads a terrain/ocean grid.
    pub fn from_grid(device: &wgpu::Device, label: &str, grid: &GridMesh) -> Self {
        let vertices = VertexPositionNormalUv::from_grid(grid);
        Self::new(device, label, bytemuck::cast_slice(&vertices), &grid.indices)
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Interleaved position, normal and UV.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct VertexPositionNormalUv {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl VertexPositionNormalUv {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexPositionNormalUv>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    pub fn from_grid(grid: &GridMesh) -> Vec<Self> {
        grid.vertices
            .iter()
            .map(|v| Self {
                position: v.position.to_array(),
                normal: v.normal.to_array(),
                uv: v.uv.to_array(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_stride_is_32_bytes() {
        assert_eq!(std::mem::size_of::<VertexPositionNormalUv>(), 32);
        assert_eq!(VertexPositionNormalUv::layout().array_stride, 32);
    }

    #[test]
    fn test_layout_offsets() {
        let layout = VertexPositionNormalUv::layout();
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        assert_eq!(layout.attributes[2].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn test_grid_conversion_keeps_order() {
        let grid = GridMesh::new(3, 2);
        let vertices = VertexPositionNormalUv::from_grid(&grid);
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[5].position, [1.0, 0.0, 1.0]);
        assert_eq!(vertices[4].uv, [1.0, 1.0]);
        assert_eq!(vertices[0].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_grid_upload() {
        let Some((device, _queue)) = crate::test_util::create_test_device_queue() else {
            return;
        };
        let grid = GridMesh::new(4, 4);
        let mesh = MeshBuffer::from_grid(&device, "grid", &grid);
        assert_eq!(mesh.index_count, 54);
        assert_eq!(mesh.vertex_buffer.size(), 16 * 32);
    }
}
