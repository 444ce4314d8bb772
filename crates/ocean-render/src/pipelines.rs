//! Terrain, sky and water render pipelines.
//!
//! Bind groups:
//! - Group 0: frame uniform (all pipelines)
//! - Group 1: model uniform (terrain, water) or cubemap + sampler (sky)
//! - Group 2: terrain uniform, heightmap, albedo + sampler (terrain, water)
//! - Group 3: ocean uniform, captured color + depth, cubemap, sampler (water)

use std::num::NonZeroU64;

use crate::buffer::VertexPositionNormalUv;
use crate::depth::DepthBuffer;
use crate::shader::{OCEAN_SHADER, SKY_SHADER, ShaderError, ShaderLibrary, TERRAIN_SHADER};
use crate::uniforms::{FrameUniform, ModelUniform, OceanUniform, TerrainUniform};

/// Bind group layouts shared between the pipelines.
pub struct SceneLayouts {
    pub frame: wgpu::BindGroupLayout,
    pub model: wgpu::BindGroupLayout,
    pub terrain: wgpu::BindGroupLayout,
    pub sky: wgpu::BindGroupLayout,
    pub water: wgpu::BindGroupLayout,
}

impl SceneLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame-bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                std::mem::size_of::<FrameUniform>(),
            )],
        });

        let model = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model-bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX,
                std::mem::size_of::<ModelUniform>(),
            )],
        });

        let terrain = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("terrain-bgl"),
            entries: &[
                uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    std::mem::size_of::<TerrainUniform>(),
                ),
                // heightmap, read with textureLoad from both stages
                texture_entry(
                    1,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    wgpu::TextureSampleType::Float { filterable: false },
                    wgpu::TextureViewDimension::D2,
                ),
                texture_entry(
                    2,
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu::TextureSampleType::Float { filterable: true },
                    wgpu::TextureViewDimension::D2,
                ),
                sampler_entry(3),
            ],
        });

        let sky = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sky-bgl"),
            entries: &[
                texture_entry(
                    0,
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu::TextureSampleType::Float { filterable: true },
                    wgpu::TextureViewDimension::Cube,
                ),
                sampler_entry(1),
            ],
        });

        let water = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("water-bgl"),
            entries: &[
                uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    std::mem::size_of::<OceanUniform>(),
                ),
                texture_entry(
                    1,
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu::TextureSampleType::Float { filterable: true },
                    wgpu::TextureViewDimension::D2,
                ),
                // unfilterable float so depth can be loaded on every backend
                texture_entry(
                    2,
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu::TextureSampleType::Float { filterable: false },
                    wgpu::TextureViewDimension::D2,
                ),
                texture_entry(
                    3,
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu::TextureSampleType::Float { filterable: true },
                    wgpu::TextureViewDimension::Cube,
                ),
                sampler_entry(4),
            ],
        });

        Self {
            frame,
            model,
            terrain,
            sky,
            water,
        }
    }
}

/// The three pipelines drawn each frame.
pub struct ScenePipelines {
    /// Opaque heightfield tiles; writes depth.
    pub terrain: wgpu::RenderPipeline,
    /// Far-plane fill; `Equal` depth test, no depth write.
    pub sky: wgpu::RenderPipeline,
    /// Alpha-blended water tiles; tests but does not write depth.
    pub water: wgpu::RenderPipeline,
}

impl ScenePipelines {
    pub fn new(
        device: &wgpu::Device,
        shaders: &mut ShaderLibrary,
        layouts: &SceneLayouts,
        color_format: wgpu::TextureFormat,
    ) -> Result<Self, ShaderError> {
        let terrain_shader = shaders.load_composed(device, "terrain", TERRAIN_SHADER)?;
        let sky_shader = shaders.load_composed(device, "sky", SKY_SHADER)?;
        let ocean_shader = shaders.load_composed(device, "ocean", OCEAN_SHADER)?;

        let terrain_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("terrain-pipeline-layout"),
            bind_group_layouts: &[&layouts.frame, &layouts.model, &layouts.terrain],
            immediate_size: 0,
        });
        let sky_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sky-pipeline-layout"),
            bind_group_layouts: &[&layouts.frame, &layouts.sky],
            immediate_size: 0,
        });
        let water_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("water-pipeline-layout"),
            bind_group_layouts: &[
                &layouts.frame,
                &layouts.model,
                &layouts.terrain,
                &layouts.water,
            ],
            immediate_size: 0,
        });

        let mesh_layout = [VertexPositionNormalUv::layout()];

        let terrain = create_pipeline(
            device,
            PipelineDesc {
                label: "terrain-pipeline",
                layout: &terrain_layout,
                shader: &terrain_shader,
                buffers: &mesh_layout,
                color_format,
                blend: None,
                depth_write: true,
                depth_compare: DepthBuffer::COMPARE_FUNCTION,
            },
        );

        let sky = create_pipeline(
            device,
            PipelineDesc {
                label: "sky-pipeline",
                layout: &sky_layout,
                shader: &sky_shader,
                buffers: &[],
                color_format,
                blend: None,
                depth_write: false,
                depth_compare: DepthBuffer::FAR_PLANE_COMPARE,
            },
        );

        let water = create_pipeline(
            device,
            PipelineDesc {
                label: "water-pipeline",
                layout: &water_layout,
                shader: &ocean_shader,
                buffers: &mesh_layout,
                color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: false,
                depth_compare: DepthBuffer::COMPARE_FUNCTION,
            },
        );

        Ok(Self {
            terrain,
            sky,
            water,
        })
    }
}

struct PipelineDesc<'a> {
    label: &'static str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
}

fn create_pipeline(device: &wgpu::Device, desc: PipelineDesc<'_>) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: desc.buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // tiles are seen from above and below the waterline
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: desc.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.color_format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    size: usize,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

fn texture_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    sample_type: wgpu::TextureSampleType,
    view_dimension: wgpu::TextureViewDimension,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Texture {
            sample_type,
            view_dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}
