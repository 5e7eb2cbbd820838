//! Drawing.
//!
//! Scripts draw into a software [`canvas::Canvas`]. On the desktop the
//! finished canvas is uploaded into a texture once per frame and stretched
//! over the window surface by the [`pipeline::BlitPipeline`].

pub mod canvas;
pub mod pipeline;
pub mod surface;

use std::sync::Arc;

use crate::{
        renderer::{
                canvas::Canvas,
                pipeline::BlitPipeline,
                surface::{Frame, SurfaceManager},
        },
        texture::CanvasTexture,
};

/// `wgpu` internals for presenting into one window.
#[derive(Debug)]
pub struct Renderer
{
        pub device: wgpu::Device,
        pub queue: wgpu::Queue,
        pub surface: SurfaceManager,
        pub pipeline: BlitPipeline,
        /// Created lazily and recreated when the canvas size changes.
        pub texture: Option<CanvasTexture>,
}

impl Renderer
{
        /// Creates the surface, adapter, device and queue for `window`.
        pub fn new(window: Arc<winit::window::Window>) -> anyhow::Result<Self>
        {
                let instance = Self::instance();

                let surface = instance.create_surface(window.clone())?;

                let adapter = pollster::block_on(Self::adapter(&instance, &surface))?;

                Self::log_adapter(&adapter);

                let (device, queue) = pollster::block_on(Self::device_queue(&adapter))?;

                let surface = SurfaceManager::new(surface, &window, &adapter, &device)?;

                let pipeline = BlitPipeline::new(&device, surface.format());

                Ok(Self {
                        device,
                        queue,
                        surface,
                        pipeline,
                        texture: None,
                })
        }

        /// Largest surface or texture side the device accepts.
        pub fn max_dimension(&self) -> u32
        {
                self.device.limits().max_texture_dimension_2d
        }

        pub fn clamp_size(
                &self,
                width: u32,
                height: u32,
        ) -> (u32, u32)
        {
                clamp_to_limit((width, height), self.max_dimension())
        }

        pub fn resize(
                &mut self,
                width: u32,
                height: u32,
        )
        {
                let (width, height) = self.clamp_size(width, height);

                self.surface.resize(&self.device, width, height);
        }

        /// Uploads `canvas` and draws it over the whole surface.
        pub fn present(
                &mut self,
                canvas: &Canvas,
        ) -> anyhow::Result<()>
        {
                // Minimized windows report a zero size.
                if canvas.width() == 0 || canvas.height() == 0
                {
                        return Ok(());
                }

                if self.clamp_size(canvas.width(), canvas.height()) != canvas.size()
                {
                        log::debug!(
                                "Canvas {}x{} exceeds the device limit of {}, frame skipped.",
                                canvas.width(),
                                canvas.height(),
                                self.max_dimension()
                        );

                        return Ok(());
                }

                let (output, view) = match self.surface.acquire_frame(&self.device)?
                {
                        Frame::Ready(output, view) => (output, view),
                        Frame::Skipped => return Ok(()),
                };

                self.ensure_texture(canvas.size());

                let Some(texture) = self.texture.as_ref()
                else
                {
                        return Ok(());
                };

                texture.write(&self.queue, canvas.pixels());

                let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("Main Render Encoder"),
                });

                {
                        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                                label: Some("Canvas Pass"),
                                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                        view: &view,
                                        resolve_target: None,
                                        ops: wgpu::Operations {
                                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                                store: wgpu::StoreOp::Store,
                                        },
                                })],
                                depth_stencil_attachment: None,
                                timestamp_writes: None,
                                occlusion_query_set: None,
                        });

                        pass.set_pipeline(&self.pipeline.render_pipeline);
                        pass.set_bind_group(0, &texture.bind_group, &[]);
                        pass.draw(0..3, 0..1);
                }

                self.queue.submit(std::iter::once(encoder.finish()));

                output.present();

                Ok(())
        }

        fn ensure_texture(
                &mut self,
                size: (u32, u32),
        )
        {
                if self.texture.as_ref().is_some_and(|t| t.size == size)
                {
                        return;
                }

                log::debug!("Creating canvas texture {}x{}.", size.0, size.1);

                self.texture = Some(CanvasTexture::new(
                        &self.device,
                        &self.pipeline.bind_group_layout,
                        size.0,
                        size.1,
                ));
        }

        fn instance() -> wgpu::Instance
        {
                wgpu::Instance::new(&wgpu::InstanceDescriptor {
                        backends: wgpu::Backends::PRIMARY,
                        ..Default::default()
                })
        }

        async fn adapter(
                instance: &wgpu::Instance,
                surface: &wgpu::Surface<'static>,
        ) -> anyhow::Result<wgpu::Adapter>
        {
                let adapter = instance
                        .request_adapter(&wgpu::RequestAdapterOptions {
                                power_preference: wgpu::PowerPreference::LowPower,
                                compatible_surface: Some(surface),
                                force_fallback_adapter: false,
                        })
                        .await
                        .map_err(|e| anyhow::anyhow!(e))?;

                Ok(adapter)
        }

        async fn device_queue(
                adapter: &wgpu::Adapter
        ) -> anyhow::Result<(wgpu::Device, wgpu::Queue), wgpu::RequestDeviceError>
        {
                adapter.request_device(&wgpu::DeviceDescriptor {
                        label: Some("device_queue"),
                        required_features: wgpu::Features::default(),
                        required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                                .using_resolution(adapter.limits()),
                        memory_hints: wgpu::MemoryHints::Performance,
                        trace: wgpu::Trace::Off,
                })
                .await
        }

        fn log_adapter(adapter: &wgpu::Adapter)
        {
                let info = adapter.get_info();

                log::info!("Adapter: {} ({:?}, {:?})", info.name, info.backend, info.device_type);
        }
}

fn clamp_to_limit(
        size: (u32, u32),
        max: u32,
) -> (u32, u32)
{
        (size.0.min(max), size.1.min(max))
}
