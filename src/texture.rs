/// GPU copy of the software canvas, rewritten every frame.
#[derive(Debug)]
pub struct CanvasTexture
{
        pub texture: wgpu::Texture,
        pub view: wgpu::TextureView,
        pub sampler: wgpu::Sampler,
        pub bind_group: wgpu::BindGroup,
        pub size: (u32, u32),
}

impl CanvasTexture
{
        pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

        pub fn new(
                device: &wgpu::Device,
                layout: &wgpu::BindGroupLayout,
                width: u32,
                height: u32,
        ) -> Self
        {
                let size = wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                };

                let texture = device.create_texture(&wgpu::TextureDescriptor {
                        label: Some("canvas_texture"),
                        size,
                        mip_level_count: 1,
                        sample_count: 1,
                        dimension: wgpu::TextureDimension::D2,
                        format: Self::FORMAT,
                        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                        view_formats: &[],
                });

                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

                // Default sampler state: clamped, nearest filtering.
                let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                        label: Some("canvas_sampler"),
                        ..Default::default()
                });

                let bind_group = Self::new_canvas_bind_group(device, layout, &view, &sampler);

                Self {
                        texture,
                        view,
                        sampler,
                        bind_group,
                        size: (width, height),
                }
        }

        /// Uploads tightly packed RGBA8 rows covering the whole texture.
        pub fn write(
                &self,
                queue: &wgpu::Queue,
                rgba: &[u8],
        )
        {
                let (width, height) = self.size;

                queue.write_texture(
                        wgpu::TexelCopyTextureInfo {
                                aspect: wgpu::TextureAspect::All,
                                texture: &self.texture,
                                mip_level: 0,
                                origin: wgpu::Origin3d::ZERO,
                        },
                        rgba,
                        wgpu::TexelCopyBufferLayout {
                                offset: 0,
                                bytes_per_row: Some(4 * width),
                                rows_per_image: Some(height),
                        },
                        wgpu::Extent3d {
                                width,
                                height,
                                depth_or_array_layers: 1,
                        },
                );
        }

        pub fn new_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout
        {
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                        entries: &[
                                wgpu::BindGroupLayoutEntry {
                                        binding: 0,
                                        visibility: wgpu::ShaderStages::FRAGMENT,
                                        ty: wgpu::BindingType::Texture {
                                                multisampled: false,
                                                view_dimension: wgpu::TextureViewDimension::D2,
                                                sample_type: wgpu::TextureSampleType::Float {
                                                        filterable: true,
                                                },
                                        },
                                        count: None,
                                },
                                wgpu::BindGroupLayoutEntry {
                                        binding: 1,
                                        visibility: wgpu::ShaderStages::FRAGMENT,
                                        ty: wgpu::BindingType::Sampler(
                                                wgpu::SamplerBindingType::Filtering,
                                        ),
                                        count: None,
                                },
                        ],
                        label: Some("canvas_bind_group_layout"),
                })
        }

        fn new_canvas_bind_group(
                device: &wgpu::Device,
                layout: &wgpu::BindGroupLayout,
                view: &wgpu::TextureView,
                sampler: &wgpu::Sampler,
        ) -> wgpu::BindGroup
        {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                        layout,
                        entries: &[
                                wgpu::BindGroupEntry {
                                        binding: 0,
                                        resource: wgpu::BindingResource::TextureView(view),
                                },
                                wgpu::BindGroupEntry {
                                        binding: 1,
                                        resource: wgpu::BindingResource::Sampler(sampler),
                                },
                        ],
                        label: Some("canvas_bind_group"),
                })
        }
}
