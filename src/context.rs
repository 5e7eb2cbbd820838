//! State shared by the frame loop and every binding.

use std::{cell::RefCell, rc::Rc};

use derivative::Derivative;

use crate::{
        audio::AudioSystem,
        color::Color,
        error::EngineError,
        input::InputState,
        platform::{Platform, PlatformEvent, WindowSettings},
        renderer::canvas::Canvas,
};

pub type SharedContext = Rc<RefCell<EngineContext>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState
{
        /// `Luma.Start` has not succeeded yet.
        NotStarted,
        Running,
        Stopped,
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct EngineContext
{
        #[derivative(Debug = "ignore")]
        pub platform: Box<dyn Platform>,

        /// `None` once audio has been shut down.
        pub audio: Option<Rc<RefCell<AudioSystem>>>,

        /// Frame being drawn.
        #[derivative(Debug = "ignore")]
        pub canvas: Canvas,

        pub input: InputState,

        pub background: Color,

        pub draw_color: Color,

        pub state: LoopState,

        pub quit_requested: bool,

        /// Whether images may be decoded right now.
        pub images_ready: bool,

        /// Defaults for omitted `Luma.Start` arguments.
        pub defaults: WindowSettings,

        /// First fatal error raised by a binding, if any.
        pub fatal: Option<EngineError>,
}

impl EngineContext
{
        pub fn new(
                platform: Box<dyn Platform>,
                audio: Option<AudioSystem>,
                defaults: WindowSettings,
        ) -> Self
        {
                Self {
                        platform,
                        audio: audio.map(|a| Rc::new(RefCell::new(a))),
                        canvas: Canvas::new(0, 0),
                        input: InputState::new(),
                        background: Color::BLACK,
                        draw_color: Color::WHITE,
                        state: LoopState::NotStarted,
                        quit_requested: false,
                        images_ready: true,
                        defaults,
                        fatal: None,
                }
        }

        pub fn shared(self) -> SharedContext
        {
                Rc::new(RefCell::new(self))
        }

        /// Drawing and window calls are ignored until this is true.
        pub fn window_ready(&self) -> bool
        {
                self.state == LoopState::Running && self.platform.is_open()
        }

        pub fn audio_ready(&self) -> bool
        {
                self.audio.as_ref().is_some_and(|a| a.borrow().is_open())
        }

        /// Latches `err` and returns the Lua error that unwinds the current
        /// script call. Only the first fatal error is kept.
        pub fn fatal(
                &mut self,
                err: EngineError,
        ) -> mlua::Error
        {
                let message = err.to_string();

                log::error!("{message}");

                if self.fatal.is_none()
                {
                        self.fatal = Some(err);
                }

                mlua::Error::RuntimeError(message)
        }

        /// Opens the window and moves the loop to `Running`.
        pub fn start(
                &mut self,
                settings: &WindowSettings,
        ) -> Result<(), EngineError>
        {
                self.platform
                        .open(settings)
                        .map_err(|e| EngineError::init("window", e))?;

                let (width, height) = self.platform.window_size();

                self.canvas.resize(width, height);
                self.canvas.clear(self.background);
                self.input = InputState::new();
                self.state = LoopState::Running;

                log::info!("Started on the {} platform.", self.platform.name());

                Ok(())
        }

        /// Drains pending native events into the input snapshot.
        pub fn poll_events(&mut self)
        {
                if !self.platform.is_open()
                {
                        return;
                }

                for event in self.platform.poll_events()
                {
                        if event == PlatformEvent::Quit
                        {
                                log::debug!("Quit requested.");

                                self.quit_requested = true;
                        }

                        self.input.apply(&event);
                }
        }

        /// Matches the canvas to the window and fills it with the background.
        pub fn begin_frame(&mut self)
        {
                let size = self.platform.window_size();

                if self.canvas.size() != size
                {
                        self.canvas.resize(size.0, size.1);
                }

                self.canvas.clear(self.background);
        }

        pub fn present(&mut self) -> anyhow::Result<()>
        {
                self.platform.present(&self.canvas)
        }

        pub fn set_window_size(
                &mut self,
                width: u32,
                height: u32,
        )
        {
                self.platform.set_window_size(width, height);
        }
}
