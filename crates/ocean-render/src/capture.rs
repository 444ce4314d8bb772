//! Offscreen color + depth target written by the pre-pass.

use crate::depth::DepthBuffer;

/// Color and depth of the opaque scene, readable as textures by later passes.
pub struct OffscreenCapture {
    pub color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth: DepthBuffer,
    format: wgpu::TextureFormat,
}

impl OffscreenCapture {
    /// Creates a capture matching the surface `format` and size.
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let (color, color_view) = create_color(device, format, width, height);
        Self {
            color,
            color_view,
            depth: DepthBuffer::new(device, "capture-depth", width, height),
            format,
        }
    }

    /// Reallocates both attachments. Returns `false` when the size is unchanged.
    ///
    /// Bind groups referencing the old views must be rebuilt by the caller.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        if !self.depth.resize(device, width, height) {
            return false;
        }
        let (color, color_view) = create_color(device, self.format, width, height);
        self.color = color;
        self.color_view = color_view;
        log::debug!("Offscreen capture resized to {width}x{height}");
        true
    }

    pub fn size(&self) -> (u32, u32) {
        (self.depth.width(), self.depth.height())
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

fn create_color(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("capture-color"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}
