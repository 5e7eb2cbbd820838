use std::sync::Arc;

/// Outcome of [`SurfaceManager::acquire_frame`].
pub enum Frame
{
        Ready(wgpu::SurfaceTexture, wgpu::TextureView),
        /// The surface was lost or outdated and has been reconfigured. Nothing
        /// is drawn this frame.
        Skipped,
}

#[derive(Debug)]
pub struct SurfaceManager
{
        pub surface: wgpu::Surface<'static>,
        pub configuration: wgpu::SurfaceConfiguration,
        pub capabilities: wgpu::SurfaceCapabilities,
}

impl SurfaceManager
{
        pub fn new(
                surface: wgpu::Surface<'static>,
                window: &Arc<winit::window::Window>,
                adapter: &wgpu::Adapter,
                device: &wgpu::Device,
        ) -> anyhow::Result<Self>
        {
                let size = window.inner_size();

                let capabilities = surface.get_capabilities(adapter);

                let format = Self::texture_format(&capabilities)?;

                let alpha_mode = capabilities
                        .alpha_modes
                        .first()
                        .copied()
                        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

                let configuration = wgpu::SurfaceConfiguration {
                        // RENDER_ATTACHMENT is guaranteed to be supported.
                        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                        format,
                        width: size.width.max(1),
                        height: size.height.max(1),
                        present_mode: wgpu::PresentMode::Fifo, // vsync
                        desired_maximum_frame_latency: 2,
                        alpha_mode,
                        view_formats: vec![],
                };

                surface.configure(device, &configuration);

                Ok(Self {
                        surface,
                        configuration,
                        capabilities,
                })
        }

        pub fn format(&self) -> wgpu::TextureFormat
        {
                self.configuration.format
        }

        /// Zero sized windows (minimized) keep the previous configuration.
        pub fn resize(
                &mut self,
                device: &wgpu::Device,
                width: u32,
                height: u32,
        )
        {
                if width > 0 && height > 0
                {
                        self.configuration.width = width;
                        self.configuration.height = height;
                        self.surface.configure(device, &self.configuration);
                }
        }

        pub fn acquire_frame(
                &self,
                device: &wgpu::Device,
        ) -> anyhow::Result<Frame>
        {
                let output = match self.surface.get_current_texture()
                {
                        Ok(output) => output,
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) =>
                        {
                                log::debug!("Surface lost or outdated, reconfiguring.");

                                self.surface.configure(device, &self.configuration);

                                return Ok(Frame::Skipped);
                        }
                        Err(wgpu::SurfaceError::Timeout) =>
                        {
                                log::warn!("Timed out acquiring the next frame.");

                                return Ok(Frame::Skipped);
                        }
                        Err(e) => anyhow::bail!(e),
                };

                let view = output
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default());

                Ok(Frame::Ready(output, view))
        }

        fn texture_format(
                capabilities: &wgpu::SurfaceCapabilities
        ) -> anyhow::Result<wgpu::TextureFormat>
        {
                capabilities
                        .formats
                        .iter()
                        .find(|f| f.is_srgb())
                        .or_else(|| capabilities.formats.first())
                        .copied()
                        .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats."))
        }
}
