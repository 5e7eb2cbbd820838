use std::{sync::Arc, time::Duration};

use winit::{
        application::ApplicationHandler,
        dpi::{PhysicalPosition, PhysicalSize},
        event::{ElementState, KeyEvent, MouseButton, StartCause, WindowEvent},
        event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
        keyboard::PhysicalKey,
        platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
        window::{Window, WindowId},
};

use crate::{
        platform::{Platform, PlatformEvent, WindowSettings},
        renderer::{Renderer, canvas::Canvas},
};

/// How many pumps `open` waits for the window to appear.
const OPEN_ATTEMPTS: usize = 100;

/// winit window presented through wgpu.
///
/// The event loop runs in pump mode: the runtime owns the frame loop and
/// drains native events once per iteration instead of handing control to
/// winit.
#[derive(Debug, Default)]
pub struct WinitPlatform
{
        event_loop: Option<EventLoop<()>>,
        app: DesktopApp,
        renderer: Option<Renderer>,
        size: (u32, u32),
        position: (i32, i32),
}

/// Receives winit callbacks during a pump.
#[derive(Debug, Default)]
struct DesktopApp
{
        /// Window to create on the next callback.
        pending: Option<WindowSettings>,
        window: Option<Arc<Window>>,
        error: Option<anyhow::Error>,
        events: Vec<PlatformEvent>,
}

impl WinitPlatform
{
        pub fn new() -> Self
        {
                Self::default()
        }

        fn apply_size(
                &mut self,
                width: u32,
                height: u32,
        )
        {
                self.size = (width, height);

                if let Some(renderer) = self.renderer.as_mut()
                {
                        renderer.resize(width, height);
                }
        }

        fn pump(&mut self) -> bool
        {
                let Some(event_loop) = self.event_loop.as_mut()
                else
                {
                        return false;
                };

                let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.app);

                matches!(status, PumpStatus::Exit(_))
        }
}

impl DesktopApp
{
        fn create_window(
                &mut self,
                event_loop: &ActiveEventLoop,
        )
        {
                let Some(settings) = self.pending.take()
                else
                {
                        return;
                };

                let mut attributes = Window::default_attributes()
                        .with_title(settings.title.clone())
                        .with_inner_size(PhysicalSize::new(settings.width, settings.height))
                        .with_resizable(false);

                let centered = Self::centered(event_loop, &settings);

                if let Some((x, y)) = placement(settings.x, settings.y, centered)
                {
                        attributes = attributes.with_position(PhysicalPosition::new(x, y));
                }

                match event_loop.create_window(attributes)
                {
                        Ok(window) => self.window = Some(Arc::new(window)),
                        Err(e) => self.error = Some(anyhow::anyhow!(e)),
                }
        }

        /// Top-left corner that centers the window on the primary monitor.
        fn centered(
                event_loop: &ActiveEventLoop,
                settings: &WindowSettings,
        ) -> Option<(i32, i32)>
        {
                let monitor = event_loop
                        .primary_monitor()
                        .or_else(|| event_loop.available_monitors().next())?;

                let origin = monitor.position();

                let size = monitor.size();

                let x = origin.x + (size.width as i32 - settings.width as i32) / 2;

                let y = origin.y + (size.height as i32 - settings.height as i32) / 2;

                Some((x, y))
        }

        fn mouse_button(button: MouseButton) -> u32
        {
                match button
                {
                        MouseButton::Left => 1,
                        MouseButton::Middle => 2,
                        MouseButton::Right => 3,
                        MouseButton::Back => 4,
                        MouseButton::Forward => 5,
                        MouseButton::Other(n) => u32::from(n),
                }
        }
}

impl ApplicationHandler for DesktopApp
{
        fn new_events(
                &mut self,
                event_loop: &ActiveEventLoop,
                _cause: StartCause,
        )
        {
                self.create_window(event_loop);
        }

        fn resumed(
                &mut self,
                event_loop: &ActiveEventLoop,
        )
        {
                self.create_window(event_loop);
        }

        fn window_event(
                &mut self,
                _event_loop: &ActiveEventLoop,
                _id: WindowId,
                event: WindowEvent,
        )
        {
                let event = match event
                {
                        WindowEvent::CloseRequested | WindowEvent::Destroyed => PlatformEvent::Quit,
                        WindowEvent::KeyboardInput {
                                event:
                                        KeyEvent {
                                                physical_key: PhysicalKey::Code(code),
                                                state,
                                                repeat: false,
                                                ..
                                        },
                                ..
                        } => PlatformEvent::Key {
                                code,
                                pressed: state == ElementState::Pressed,
                        },
                        WindowEvent::MouseInput {
                                state,
                                button,
                                ..
                        } => PlatformEvent::MouseButton {
                                button: Self::mouse_button(button),
                                pressed: state == ElementState::Pressed,
                        },
                        WindowEvent::CursorMoved {
                                position,
                                ..
                        } => PlatformEvent::MouseMoved {
                                x: position.x as i32,
                                y: position.y as i32,
                        },
                        WindowEvent::Resized(size) => PlatformEvent::Resized {
                                width: size.width,
                                height: size.height,
                        },
                        WindowEvent::Moved(position) => PlatformEvent::Moved {
                                x: position.x,
                                y: position.y,
                        },
                        WindowEvent::Focused(false) => PlatformEvent::FocusLost,
                        _ => return,
                };

                self.events.push(event);
        }
}

impl Platform for WinitPlatform
{
        fn name(&self) -> &'static str
        {
                "winit"
        }

        fn open(
                &mut self,
                settings: &WindowSettings,
        ) -> anyhow::Result<()>
        {
                if self.event_loop.is_some()
                {
                        anyhow::bail!("Window is already open.");
                }

                let event_loop = EventLoop::new()?;

                event_loop.set_control_flow(ControlFlow::Poll);

                self.event_loop = Some(event_loop);

                self.app.pending = Some(settings.clone());

                for _ in 0..OPEN_ATTEMPTS
                {
                        if self.app.window.is_some() || self.app.error.is_some()
                        {
                                break;
                        }

                        if self.pump()
                        {
                                break;
                        }
                }

                if let Some(e) = self.app.error.take()
                {
                        self.close();

                        return Err(e);
                }

                let Some(window) = self.app.window.clone()
                else
                {
                        self.close();

                        anyhow::bail!("The event loop never produced a window.");
                };

                let renderer = match Renderer::new(window.clone())
                {
                        Ok(renderer) => renderer,
                        Err(e) =>
                        {
                                self.close();

                                return Err(e);
                        }
                };

                let inner = window.inner_size();

                self.size = (inner.width, inner.height);

                self.position = window
                        .outer_position()
                        .map(|p| (p.x, p.y))
                        .unwrap_or((settings.x.unwrap_or(0), settings.y.unwrap_or(0)));

                self.renderer = Some(renderer);

                // Events raised while the window was being created describe
                // the initial geometry, already captured above.
                self.app.events.clear();

                log::info!("Window '{}' opened at {}x{}.", settings.title, self.size.0, self.size.1);

                Ok(())
        }

        fn is_open(&self) -> bool
        {
                self.app.window.is_some()
        }

        fn window_size(&self) -> (u32, u32)
        {
                self.size
        }

        fn set_window_size(
                &mut self,
                width: u32,
                height: u32,
        )
        {
                let (width, height) = self
                        .renderer
                        .as_ref()
                        .map_or((width, height), |r| r.clamp_size(width, height));

                let Some(window) = self.app.window.as_ref()
                else
                {
                        return;
                };

                let applied = window.request_inner_size(PhysicalSize::new(width, height));

                let (width, height) = size_after_request(self.size, applied);

                if (width, height) != self.size
                {
                        self.apply_size(width, height);
                }
        }

        fn window_position(&self) -> (i32, i32)
        {
                self.position
        }

        fn set_window_position(
                &mut self,
                x: i32,
                y: i32,
        )
        {
                let Some(window) = self.app.window.as_ref()
                else
                {
                        return;
                };

                window.set_outer_position(PhysicalPosition::new(x, y));

                self.position = (x, y);
        }

        fn poll_events(&mut self) -> Vec<PlatformEvent>
        {
                let exited = self.pump();

                let mut events = std::mem::take(&mut self.app.events);

                for event in &events
                {
                        match *event
                        {
                                PlatformEvent::Resized {
                                        width,
                                        height,
                                } => self.apply_size(width, height),
                                PlatformEvent::Moved {
                                        x,
                                        y,
                                } => self.position = (x, y),
                                _ =>
                                {}
                        }
                }

                if exited
                {
                        events.push(PlatformEvent::Quit);
                }

                events
        }

        fn present(
                &mut self,
                canvas: &Canvas,
        ) -> anyhow::Result<()>
        {
                match self.renderer.as_mut()
                {
                        Some(renderer) => renderer.present(canvas),
                        None => Ok(()),
                }
        }

        fn close(&mut self)
        {
                if self.renderer.take().is_some()
                {
                        log::debug!("Renderer released.");
                }

                if self.app.window.take().is_some()
                {
                        log::debug!("Window destroyed.");
                }

                self.app.pending = None;
                self.app.events.clear();

                if self.event_loop.take().is_some()
                {
                        log::debug!("Event loop released.");
                }
        }
}

/// Top-left corner for a new window. Each missing axis falls back to the
/// centered one.
fn placement(
        x: Option<i32>,
        y: Option<i32>,
        centered: Option<(i32, i32)>,
) -> Option<(i32, i32)>
{
        let x = x.or(centered.map(|(x, _)| x))?;
        let y = y.or(centered.map(|(_, y)| y))?;

        Some((x, y))
}

/// Size reported after `request_inner_size`: the size the window system
/// applied right away, or the current one until `Resized` arrives.
fn size_after_request(
        current: (u32, u32),
        applied: Option<PhysicalSize<u32>>,
) -> (u32, u32)
{
        applied.map_or(current, |size| (size.width, size.height))
}
