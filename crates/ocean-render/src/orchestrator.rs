//! Per-frame pass sequencing for the terrain + water scene.
//!
//! Every frame runs the same three passes in order:
//!
//! 1. [`FramePass::Prepass`] draws terrain and sky into the offscreen capture.
//! 2. [`FramePass::MainOpaque`] draws the identical opaque scene to the surface.
//! 3. [`FramePass::Water`] blends the ocean over the surface while sampling
//!    the capture's color and depth.
//!
//! [`SceneRenderer`] owns every GPU resource these passes touch.

use std::path::Path;
use std::sync::Arc;

use ocean_scene::{SceneParams, SkyboxFaces};
use ocean_terrain::{GridMesh, Heightmap, TERRAIN_TILES};
use wgpu::util::DeviceExt;

use crate::buffer::MeshBuffer;
use crate::camera::Camera;
use crate::capture::OffscreenCapture;
use crate::depth::DepthBuffer;
use crate::pass::RenderPassBuilder;
use crate::pipelines::{SceneLayouts, ScenePipelines};
use crate::shader::{ShaderError, ShaderLibrary};
use crate::texture::{ManagedTexture, TextureError, TextureManager};
use crate::uniforms::{FrameUniform, ModelUniform, OceanUniform, TerrainUniform};

/// One step of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePass {
    Prepass,
    MainOpaque,
    Water,
}

/// Fixed order in which the passes are encoded.
pub const FRAME_SEQUENCE: [FramePass; 3] =
    [FramePass::Prepass, FramePass::MainOpaque, FramePass::Water];

/// Color/depth pair a pass renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassTarget {
    /// Offscreen capture color + capture depth.
    Capture,
    /// Surface color + main depth buffer.
    Surface,
}

impl FramePass {
    pub fn target(self) -> PassTarget {
        match self {
            FramePass::Prepass => PassTarget::Capture,
            FramePass::MainOpaque | FramePass::Water => PassTarget::Surface,
        }
    }

    pub fn writes_capture(self) -> bool {
        self.target() == PassTarget::Capture
    }

    pub fn reads_capture(self) -> bool {
        self == FramePass::Water
    }

    /// Whether the pass clears its targets or draws over what is there.
    pub fn clears(self) -> bool {
        self != FramePass::Water
    }

    pub fn label(self) -> &'static str {
        match self {
            FramePass::Prepass => "prepass",
            FramePass::MainOpaque => "main-opaque-pass",
            FramePass::Water => "water-pass",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("scene assets contain no {kind}")]
    MissingAssets { kind: &'static str },
}

/// RGBA8 terrain albedo image.
#[derive(Debug, Clone)]
pub struct AlbedoImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// CPU-side inputs uploaded once when the renderer is created.
#[derive(Debug, Clone)]
pub struct SceneAssets {
    /// One heightmap per terrain preset, indexed by preset id.
    pub heightmaps: Vec<Heightmap>,
    /// One environment per skybox preset, indexed by preset id.
    pub skyboxes: Vec<SkyboxFaces>,
    /// Tiled over the terrain; `None` binds the default texture.
    pub terrain_albedo: Option<AlbedoImage>,
    /// Vertices per side of the shared terrain/water grid.
    pub grid_resolution: u32,
}

struct TileBinding {
    _buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Owns the GPU resources of the scene and encodes the frame's passes.
pub struct SceneRenderer {
    textures: TextureManager,
    layouts: SceneLayouts,
    pipelines: ScenePipelines,

    grid: MeshBuffer,
    tiles: Vec<TileBinding>,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    terrain_buffer: wgpu::Buffer,
    ocean_buffer: wgpu::Buffer,

    heightmaps: Vec<Arc<ManagedTexture>>,
    skyboxes: Vec<Arc<ManagedTexture>>,
    albedo: Arc<ManagedTexture>,
    bound_preset: usize,
    bound_skybox: usize,
    terrain_bind_group: wgpu::BindGroup,
    sky_bind_group: wgpu::BindGroup,
    water_bind_group: wgpu::BindGroup,

    capture: OffscreenCapture,
    main_depth: DepthBuffer,
    color_format: wgpu::TextureFormat,
    size: (u32, u32),
}

impl SceneRenderer {
    /// Uploads `assets` and builds pipelines and render targets.
    ///
    /// `color_format` must match the view later passed to [`Self::encode`].
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        size: (u32, u32),
        assets: &SceneAssets,
        shader_dir: Option<&Path>,
        params: &SceneParams,
    ) -> Result<Self, RenderError> {
        if assets.heightmaps.is_empty() {
            return Err(RenderError::MissingAssets { kind: "heightmaps" });
        }
        if assets.skyboxes.is_empty() {
            return Err(RenderError::MissingAssets { kind: "skyboxes" });
        }

        let mut shaders = ShaderLibrary::new();
        if let Some(dir) = shader_dir {
            shaders = shaders.with_shader_dir(dir);
        }
        let layouts = SceneLayouts::new(device);
        let pipelines = ScenePipelines::new(device, &mut shaders, &layouts, color_format)?;

        let mut textures = TextureManager::new(device, queue);
        let heightmaps = assets
            .heightmaps
            .iter()
            .enumerate()
            .map(|(i, map)| textures.create_heightmap(device, queue, &format!("heightmap-{i}"), map))
            .collect::<Result<Vec<_>, _>>()?;
        let skyboxes = assets
            .skyboxes
            .iter()
            .enumerate()
            .map(|(i, faces)| textures.create_cubemap(device, queue, &format!("skybox-{i}"), faces, true))
            .collect::<Result<Vec<_>, _>>()?;
        let albedo = match &assets.terrain_albedo {
            Some(image) => textures.create_texture(
                device,
                queue,
                "terrain-albedo",
                &image.rgba,
                image.width,
                image.height,
                wgpu::TextureFormat::Rgba8UnormSrgb,
                true,
            )?,
            None => textures.default_texture(),
        };

        let grid = GridMesh::new(assets.grid_resolution, assets.grid_resolution);
        let grid = MeshBuffer::from_grid(device, "grid", &grid);

        let tiles = TERRAIN_TILES
            .iter()
            .enumerate()
            .map(|(i, tile)| {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("tile-{i}-model")),
                    contents: bytemuck::bytes_of(&ModelUniform::new(tile.model_matrix())),
                    usage: wgpu::BufferUsages::UNIFORM,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("tile-{i}-bind-group")),
                    layout: &layouts.model,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                TileBinding {
                    _buffer: buffer,
                    bind_group,
                }
            })
            .collect();

        let frame_buffer = uniform_buffer::<FrameUniform>(device, "frame-uniform");
        let terrain_buffer = uniform_buffer::<TerrainUniform>(device, "terrain-uniform");
        let ocean_buffer = uniform_buffer::<OceanUniform>(device, "ocean-uniform");

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &layouts.frame,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let capture = OffscreenCapture::new(device, color_format, size.0, size.1);
        let main_depth = DepthBuffer::new(device, "main-depth", size.0, size.1);

        let bound_preset = params.terrain_preset.min(heightmaps.len() - 1);
        let bound_skybox = params.skybox_preset.min(skyboxes.len() - 1);

        let terrain_bind_group = create_terrain_bind_group(
            device,
            &layouts,
            &textures,
            &terrain_buffer,
            &heightmaps[bound_preset],
            &albedo,
        );
        let sky_bind_group =
            create_sky_bind_group(device, &layouts, &textures, &skyboxes[bound_skybox]);
        let water_bind_group = create_water_bind_group(
            device,
            &layouts,
            &textures,
            &ocean_buffer,
            &capture,
            &skyboxes[bound_skybox],
        );

        log::info!(
            "Scene renderer ready: {}x{} {:?}, {} shader modules, {} heightmaps, {} skyboxes, grid {}",
            size.0,
            size.1,
            color_format,
            shaders.len(),
            heightmaps.len(),
            skyboxes.len(),
            assets.grid_resolution
        );

        Ok(Self {
            textures,
            layouts,
            pipelines,
            grid,
            tiles,
            frame_buffer,
            frame_bind_group,
            terrain_buffer,
            ocean_buffer,
            heightmaps,
            skyboxes,
            albedo,
            bound_preset,
            bound_skybox,
            terrain_bind_group,
            sky_bind_group,
            water_bind_group,
            capture,
            main_depth,
            color_format,
            size: (size.0.max(1), size.1.max(1)),
        })
    }

    /// Uploads all uniforms and rebinds the heightmap and cubemap selected by
    /// `params`.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        params: &SceneParams,
        camera: &Camera,
        time: f32,
    ) {
        if params.terrain_preset != self.bound_preset {
            match self.heightmaps.get(params.terrain_preset) {
                Some(heightmap) => {
                    self.terrain_bind_group = create_terrain_bind_group(
                        device,
                        &self.layouts,
                        &self.textures,
                        &self.terrain_buffer,
                        heightmap,
                        &self.albedo,
                    );
                    self.bound_preset = params.terrain_preset;
                    log::debug!("Bound heightmap {}", self.bound_preset);
                }
                None => log::warn!("No heightmap for terrain preset {}", params.terrain_preset),
            }
        }

        if params.skybox_preset != self.bound_skybox {
            match self.skyboxes.get(params.skybox_preset) {
                Some(_) => {
                    self.bound_skybox = params.skybox_preset;
                    self.rebuild_environment_bindings(device);
                    log::debug!("Bound skybox {}", self.bound_skybox);
                }
                None => log::warn!("No cubemap for skybox preset {}", params.skybox_preset),
            }
        }

        let frame = FrameUniform::new(camera, params, time, self.size);
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));
        queue.write_buffer(
            &self.terrain_buffer,
            0,
            bytemuck::bytes_of(&TerrainUniform::new(params)),
        );
        queue.write_buffer(
            &self.ocean_buffer,
            0,
            bytemuck::bytes_of(&OceanUniform::new(params)),
        );
    }

    /// Recreates the capture and main depth buffer at the new size and
    /// rebuilds the bind group that samples them.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let size = (width, height);
        if size == self.size {
            return;
        }
        self.capture.resize(device, size.0, size.1);
        self.main_depth.resize(device, size.0, size.1);
        self.size = size;
        self.rebuild_environment_bindings(device);
        log::info!("Scene targets resized to {}x{}", size.0, size.1);
    }

    /// Encodes [`FRAME_SEQUENCE`] into `encoder`, presenting to `surface_view`.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, surface_view: &wgpu::TextureView) {
        for pass in FRAME_SEQUENCE {
            self.encode_pass(pass, encoder, surface_view);
        }
    }

    /// Encodes a single pass of the sequence.
    pub fn encode_pass(
        &self,
        pass: FramePass,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
    ) {
        let (color_view, depth) = match pass.target() {
            PassTarget::Capture => (&self.capture.color_view, &self.capture.depth),
            PassTarget::Surface => (surface_view, &self.main_depth),
        };

        let mut builder = RenderPassBuilder::new()
            .label(pass.label())
            .depth(depth.view.clone(), DepthBuffer::CLEAR_VALUE);
        if !pass.clears() {
            builder = builder.load_existing();
        }

        let mut render_pass = builder.begin(encoder, color_view);
        match pass {
            FramePass::Prepass | FramePass::MainOpaque => self.draw_opaque(&mut render_pass),
            FramePass::Water => self.draw_water(&mut render_pass),
        }
    }

    /// Terrain tiles followed by the sky; shared by the pre-pass and the main pass.
    fn draw_opaque(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipelines.terrain);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        render_pass.set_bind_group(2, &self.terrain_bind_group, &[]);
        self.grid.bind(render_pass);
        for tile in &self.tiles {
            render_pass.set_bind_group(1, &tile.bind_group, &[]);
            self.grid.draw(render_pass);
        }

        render_pass.set_pipeline(&self.pipelines.sky);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        render_pass.set_bind_group(1, &self.sky_bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }

    fn draw_water(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipelines.water);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        render_pass.set_bind_group(2, &self.terrain_bind_group, &[]);
        render_pass.set_bind_group(3, &self.water_bind_group, &[]);
        self.grid.bind(render_pass);
        for tile in &self.tiles {
            render_pass.set_bind_group(1, &tile.bind_group, &[]);
            self.grid.draw(render_pass);
        }
    }

    fn rebuild_environment_bindings(&mut self, device: &wgpu::Device) {
        let cubemap = &self.skyboxes[self.bound_skybox];
        self.sky_bind_group = create_sky_bind_group(device, &self.layouts, &self.textures, cubemap);
        self.water_bind_group = create_water_bind_group(
            device,
            &self.layouts,
            &self.textures,
            &self.ocean_buffer,
            &self.capture,
            cubemap,
        );
    }

    pub fn capture(&self) -> &OffscreenCapture {
        &self.capture
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    pub fn bound_presets(&self) -> (usize, usize) {
        (self.bound_preset, self.bound_skybox)
    }
}

fn uniform_buffer<T>(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<T>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_terrain_bind_group(
    device: &wgpu::Device,
    layouts: &SceneLayouts,
    textures: &TextureManager,
    terrain_buffer: &wgpu::Buffer,
    heightmap: &ManagedTexture,
    albedo: &ManagedTexture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("terrain-bind-group"),
        layout: &layouts.terrain,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: terrain_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&heightmap.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&albedo.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(textures.sampler_linear()),
            },
        ],
    })
}

fn create_sky_bind_group(
    device: &wgpu::Device,
    layouts: &SceneLayouts,
    textures: &TextureManager,
    cubemap: &ManagedTexture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("sky-bind-group"),
        layout: &layouts.sky,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&cubemap.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(textures.sampler_linear_clamp()),
            },
        ],
    })
}

fn create_water_bind_group(
    device: &wgpu::Device,
    layouts: &SceneLayouts,
    textures: &TextureManager,
    ocean_buffer: &wgpu::Buffer,
    capture: &OffscreenCapture,
    cubemap: &ManagedTexture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("water-bind-group"),
        layout: &layouts.water,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: ocean_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&capture.color_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&capture.depth.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::TextureView(&cubemap.view),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: wgpu::BindingResource::Sampler(textures.sampler_linear_clamp()),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::create_test_device_queue;
    use glam::Vec3;
    use ocean_scene::{SKYBOX_PRESETS, TERRAIN_PRESETS};

    const SIZE: u32 = 64;
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    #[test]
    fn test_sequence_order() {
        assert_eq!(
            FRAME_SEQUENCE,
            [FramePass::Prepass, FramePass::MainOpaque, FramePass::Water]
        );
    }

    #[test]
    fn test_only_prepass_writes_capture() {
        let writers: Vec<_> = FRAME_SEQUENCE
            .iter()
            .filter(|p| p.writes_capture())
            .collect();
        assert_eq!(writers, vec![&FramePass::Prepass]);
    }

    #[test]
    fn test_only_water_reads_capture_and_loads() {
        let readers: Vec<_> = FRAME_SEQUENCE
            .iter()
            .filter(|p| p.reads_capture())
            .collect();
        assert_eq!(readers, vec![&FramePass::Water]);
        assert!(!FramePass::Water.clears());
        assert!(FramePass::Prepass.clears() && FramePass::MainOpaque.clears());
        assert_eq!(FramePass::Water.target(), PassTarget::Surface);
    }

    #[test]
    fn test_capture_written_before_read() {
        let write = FRAME_SEQUENCE.iter().position(|p| p.writes_capture());
        let read = FRAME_SEQUENCE.iter().position(|p| p.reads_capture());
        assert!(write < read);
    }

    fn test_assets() -> SceneAssets {
        let heightmaps = TERRAIN_PRESETS
            .iter()
            .map(|preset| preset.build_heightmap(33, None).unwrap())
            .collect();
        let skyboxes = SKYBOX_PRESETS
            .iter()
            .map(|preset| SkyboxFaces::procedural(preset, 8))
            .collect();
        SceneAssets {
            heightmaps,
            skyboxes,
            terrain_albedo: None,
            grid_resolution: 16,
        }
    }

    fn test_camera() -> Camera {
        let mut camera = Camera::default();
        camera.look_at(Vec3::new(0.0, 12.0, 18.0), Vec3::new(0.0, -1.0, 0.0));
        camera
    }

    fn target_texture(device: &wgpu::Device) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test-surface"),
            size: wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    fn read_back(device: &wgpu::Device, queue: &wgpu::Queue, texture: &wgpu::Texture) -> Vec<u8> {
        // 64 texels * 4 bytes is already a multiple of COPY_BYTES_PER_ROW_ALIGNMENT
        let bytes_per_row = SIZE * 4;
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback"),
            size: (bytes_per_row * SIZE) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("readback-encoder"),
        });
        encoder.copy_texture_to_buffer(
            texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(SIZE),
                },
            },
            wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
        );
        queue.submit([encoder.finish()]);

        let slice = buffer.slice(..);
        slice.map_async(wgpu::MapMode::Read, |_| {});
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .unwrap();
        let data = slice.get_mapped_range().to_vec();
        buffer.unmap();
        data
    }

    fn renderer(device: &wgpu::Device, queue: &wgpu::Queue) -> SceneRenderer {
        let params = SceneParams::default();
        let mut renderer = SceneRenderer::new(
            device,
            queue,
            FORMAT,
            (SIZE, SIZE),
            &test_assets(),
            None,
            &params,
        )
        .unwrap();
        renderer.prepare(device, queue, &params, &test_camera(), 1.25);
        renderer
    }

    #[test]
    fn test_prepass_matches_main_opaque() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let renderer = renderer(&device, &queue);
        let surface = target_texture(&device);
        let surface_view = surface.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("test-frame"),
        });
        renderer.encode_pass(FramePass::Prepass, &mut encoder, &surface_view);
        renderer.encode_pass(FramePass::MainOpaque, &mut encoder, &surface_view);
        queue.submit([encoder.finish()]);

        let captured = read_back(&device, &queue, &renderer.capture().color);
        let presented = read_back(&device, &queue, &surface);
        assert_eq!(captured.len(), presented.len());
        assert!(captured == presented, "pre-pass and main pass images differ");
        // something other than a single clear color was drawn
        assert!(captured.chunks(4).any(|px| px != &captured[0..4]));
    }

    #[test]
    fn test_full_frame_and_rebinding() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut renderer = renderer(&device, &queue);
        let surface = target_texture(&device);
        let surface_view = surface.create_view(&wgpu::TextureViewDescriptor::default());

        let mut params = SceneParams::default();
        params.apply_preset(2).unwrap();
        params.apply_skybox(1).unwrap();
        renderer.prepare(&device, &queue, &params, &test_camera(), 3.0);
        assert_eq!(renderer.bound_presets(), (2, 1));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("test-frame"),
        });
        renderer.encode(&mut encoder, &surface_view);
        queue.submit([encoder.finish()]);
        let pixels = read_back(&device, &queue, &surface);
        assert_eq!(pixels.len(), (SIZE * SIZE * 4) as usize);
    }

    #[test]
    fn test_resize_recreates_targets() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut renderer = renderer(&device, &queue);
        renderer.resize(&device, 96, 48);
        assert_eq!(renderer.size(), (96, 48));
        assert_eq!(renderer.capture().size(), (96, 48));
        renderer.resize(&device, 0, 0);
        assert_eq!(renderer.size(), (96, 48));
        assert_eq!(renderer.capture().size(), (96, 48));
    }

    fn differing_pixels(a: &[u8], b: &[u8]) -> usize {
        a.chunks(4).zip(b.chunks(4)).filter(|(x, y)| x != y).count()
    }

    fn render_full_frame(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera: &Camera,
    ) -> (Vec<u8>, Vec<u8>) {
        let mut renderer = renderer(device, queue);
        renderer.prepare(device, queue, &SceneParams::default(), camera, 1.25);
        let surface = target_texture(device);
        let surface_view = surface.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("test-frame"),
        });
        renderer.encode(&mut encoder, &surface_view);
        queue.submit([encoder.finish()]);
        (
            read_back(device, queue, &renderer.capture().color),
            read_back(device, queue, &surface),
        )
    }

    #[test]
    fn test_water_changes_frame_only_where_visible() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let (captured, presented) = render_full_frame(&device, &queue, &test_camera());
        assert!(differing_pixels(&captured, &presented) > 0);

        let mut sky_camera = Camera::default();
        sky_camera.look_at(Vec3::new(0.0, 12.0, 18.0), Vec3::new(0.0, 100.0, 17.0));
        let (captured, presented) = render_full_frame(&device, &queue, &sky_camera);
        assert_eq!(differing_pixels(&captured, &presented), 0);
    }

    #[test]
    fn test_missing_assets_rejected() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut assets = test_assets();
        assets.skyboxes.clear();
        let result = SceneRenderer::new(
            &device,
            &queue,
            FORMAT,
            (SIZE, SIZE),
            &assets,
            None,
            &SceneParams::default(),
        );
        assert!(matches!(
            result,
            Err(RenderError::MissingAssets { kind: "skyboxes" })
        ));
    }
}
