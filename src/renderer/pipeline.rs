use crate::texture::CanvasTexture;

/// Pipeline drawing the canvas texture over the whole surface.
#[derive(Debug)]
pub struct BlitPipeline
{
        pub render_pipeline: wgpu::RenderPipeline,
        pub bind_group_layout: wgpu::BindGroupLayout,
}

impl BlitPipeline
{
        pub fn new(
                device: &wgpu::Device,
                format: wgpu::TextureFormat,
        ) -> Self
        {
                let bind_group_layout = CanvasTexture::new_bind_group_layout(device);

                let render_pipeline = Self::render_pipeline(device, format, &bind_group_layout);

                Self {
                        render_pipeline,
                        bind_group_layout,
                }
        }

        /// Loads the shader module data from the `wgsl` file.
        fn load_shader_module(device: &wgpu::Device) -> wgpu::ShaderModule
        {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some("Blit Shader"),
                        source: wgpu::ShaderSource::Wgsl(include_str!("blit.wgsl").into()),
                })
        }

        fn render_pipeline(
                device: &wgpu::Device,
                format: wgpu::TextureFormat,
                bind_group_layout: &wgpu::BindGroupLayout,
        ) -> wgpu::RenderPipeline
        {
                let shader = Self::load_shader_module(device);

                let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                        label: Some("Blit Pipeline Layout"),
                        bind_group_layouts: &[bind_group_layout],
                        push_constant_ranges: &[],
                });

                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some("Blit Pipeline"),
                        layout: Some(&layout),
                        vertex: wgpu::VertexState {
                                module: &shader,
                                entry_point: Some("vs_main"),
                                // Vertices are generated from the vertex index.
                                buffers: &[],
                                compilation_options: wgpu::PipelineCompilationOptions::default(),
                        },
                        fragment: Some(wgpu::FragmentState {
                                module: &shader,
                                entry_point: Some("fs_main"),
                                targets: &[Some(wgpu::ColorTargetState {
                                        format,
                                        blend: Some(wgpu::BlendState::REPLACE),
                                        write_mask: wgpu::ColorWrites::ALL,
                                })],
                                compilation_options: wgpu::PipelineCompilationOptions::default(),
                        }),
                        primitive: wgpu::PrimitiveState {
                                topology: wgpu::PrimitiveTopology::TriangleList,
                                strip_index_format: None,
                                front_face: wgpu::FrontFace::Ccw,
                                cull_mode: None,
                                polygon_mode: wgpu::PolygonMode::Fill,
                                conservative: false,
                                unclipped_depth: false,
                        },
                        depth_stencil: None,
                        multisample: wgpu::MultisampleState::default(),
                        multiview: None,
                        cache: None,
                })
        }
}
