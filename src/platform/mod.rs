//! Windowing backends.
//!
//! [`Platform`] is the seam between the runtime and the windowing library:
//! it owns the window and whatever presents frames into it, and turns native
//! events into [`PlatformEvent`]s. Two implementations exist:
//!
//! - [`desktop::WinitPlatform`]: a winit window presented through wgpu.
//! - [`headless::HeadlessPlatform`]: no window at all; events are scripted
//!   ahead of time and presented frames are recorded. Used by tests and by
//!   `headless = true` in the config.

pub mod desktop;
pub mod headless;

use winit::keyboard::KeyCode;

use crate::{config::Config, renderer::canvas::Canvas};

/// Largest window side in pixels, the 2D texture limit every wgpu backend
/// guarantees. Larger requests are clamped to it.
pub const MAX_WINDOW_DIMENSION: u32 = 8192;

/// Clamps a requested window side into `1..=MAX_WINDOW_DIMENSION`.
pub fn window_dimension(requested: i32) -> u32
{
        requested.clamp(1, MAX_WINDOW_DIMENSION as i32) as u32
}

/// Window parameters passed to [`Platform::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings
{
        pub title: String,
        pub width: u32,
        pub height: u32,
        /// `None` centers the window horizontally.
        pub x: Option<i32>,
        /// `None` centers the window vertically.
        pub y: Option<i32>,
}

impl WindowSettings
{
        pub fn from_config(config: &Config) -> Self
        {
                Self {
                        title: config.window.title.clone(),
                        width: config.window.width,
                        height: config.window.height,
                        x: None,
                        y: None,
                }
        }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent
{
        Quit,
        Key
        {
                code: KeyCode,
                pressed: bool,
        },
        MouseButton
        {
                button: u32,
                pressed: bool,
        },
        MouseMoved
        {
                x: i32,
                y: i32,
        },
        Resized
        {
                width: u32,
                height: u32,
        },
        Moved
        {
                x: i32,
                y: i32,
        },
        FocusLost,
}

pub trait Platform
{
        fn name(&self) -> &'static str;

        /// Creates the window and its presenter. Called at most once.
        fn open(
                &mut self,
                settings: &WindowSettings,
        ) -> anyhow::Result<()>;

        fn is_open(&self) -> bool;

        fn window_size(&self) -> (u32, u32);

        fn set_window_size(
                &mut self,
                width: u32,
                height: u32,
        );

        fn window_position(&self) -> (i32, i32);

        fn set_window_position(
                &mut self,
                x: i32,
                y: i32,
        );

        /// Drains every pending native event.
        fn poll_events(&mut self) -> Vec<PlatformEvent>;

        /// Shows the finished frame.
        fn present(
                &mut self,
                canvas: &Canvas,
        ) -> anyhow::Result<()>;

        /// Releases the presenter, then the window, then the windowing
        /// subsystem. Safe to call more than once.
        fn close(&mut self);
}

/// Picks the backend the config asks for.
pub fn create(config: &Config) -> Box<dyn Platform>
{
        if config.engine.headless
        {
                log::info!("Running headless, no window will be created.");

                return Box::new(headless::HeadlessPlatform::new().0);
        }

        Box::new(desktop::WinitPlatform::new())
}
