//! Lifecycle and frame loop.
//!
//! # Example
//!
//! ```no_run
//! use luma::{config::Config, engine::{EngineBuilder, EngineRunner}};
//!
//! let config = Config::new();
//!
//! let engine = EngineBuilder::new(config.clone()).build().unwrap();
//!
//! EngineRunner::new(engine, config.script.entry).run().unwrap();
//! ```
//!
//! Startup creates the Lua host and registers the `Luma` table, then runs
//! the entry script once. If the script opened a window with `Luma.Start`
//! the frame loop runs until a quit event is seen:
//!
//! 1. drain native events into the input snapshot,
//! 2. call `update(dt)`,
//! 3. clear to the background colour,
//! 4. call `render()`,
//! 5. present.
//!
//! A quit event is only acted on at the top of the next iteration, so the
//! frame in which it arrives is still drawn.

use std::path::{Path, PathBuf};

use instant::Instant;

use crate::{
        audio::AudioSystem,
        config::Config,
        context::{EngineContext, LoopState, SharedContext},
        error::EngineError,
        platform::{self, Platform, WindowSettings},
        script::ScriptHost,
};

/// The runtime: shared context plus the Lua host driving it.
///
/// To construct [`Engine`], use [`EngineBuilder`]. Dropping the engine tears
/// everything down if [`Engine::teardown`] has not run yet.
#[derive(Debug)]
pub struct Engine
{
        ctx: SharedContext,

        /// `None` once torn down.
        host: Option<ScriptHost>,

        frames: u64,
}

impl Engine
{
        pub fn context(&self) -> &SharedContext
        {
                &self.ctx
        }

        pub fn host(&self) -> Option<&ScriptHost>
        {
                self.host.as_ref()
        }

        pub fn state(&self) -> LoopState
        {
                self.ctx.borrow().state
        }

        /// Completed frame loop iterations.
        pub fn frames(&self) -> u64
        {
                self.frames
        }

        /// Runs the entry script, then the frame loop if a window was opened.
        pub fn run_file(
                &mut self,
                path: &Path,
        ) -> Result<(), EngineError>
        {
                log::info!("Running '{}'.", path.display());

                let loaded = self.script()?.exec_file(path);

                self.after_load(loaded)
        }

        /// Like [`Engine::run_file`] with the script given as text.
        pub fn run_source(
                &mut self,
                name: &str,
                source: &str,
        ) -> Result<(), EngineError>
        {
                let loaded = self.script()?.exec(name, source);

                self.after_load(loaded)
        }

        fn script(&self) -> Result<&ScriptHost, EngineError>
        {
                self.host
                        .as_ref()
                        .ok_or_else(|| EngineError::Script(String::from("engine already torn down")))
        }

        fn after_load(
                &mut self,
                loaded: Result<(), EngineError>,
        ) -> Result<(), EngineError>
        {
                // A fatal error takes precedence over the Lua error it caused.
                self.check_fatal()?;

                loaded?;

                if self.state() != LoopState::Running
                {
                        log::info!("No window was started, nothing to run.");

                        return Ok(());
                }

                self.run_loop()
        }

        fn run_loop(&mut self) -> Result<(), EngineError>
        {
                let mut last = Instant::now();

                loop
                {
                        let now = Instant::now();

                        let dt = now.duration_since(last).as_secs_f64();

                        last = now;

                        if !self.frame(dt)?
                        {
                                break;
                        }
                }

                log::info!("Frame loop stopped after {} frame(s).", self.frames);

                Ok(())
        }

        /// One loop iteration. Returns `false` without doing anything when a
        /// quit was requested during an earlier iteration.
        pub fn frame(
                &mut self,
                dt: f64,
        ) -> Result<bool, EngineError>
        {
                {
                        let mut ctx = self.ctx.borrow_mut();

                        if ctx.state != LoopState::Running
                        {
                                return Ok(false);
                        }

                        if ctx.quit_requested
                        {
                                ctx.state = LoopState::Stopped;

                                return Ok(false);
                        }

                        ctx.poll_events();
                }

                self.script()?.call_entry("update", dt);

                self.check_fatal()?;

                self.ctx.borrow_mut().begin_frame();

                self.script()?.call_entry("render", ());

                self.check_fatal()?;

                if let Err(e) = self.ctx.borrow_mut().present()
                {
                        log::error!("Present failed: {e}");
                }

                self.frames += 1;

                Ok(true)
        }

        fn check_fatal(&self) -> Result<(), EngineError>
        {
                match self.ctx.borrow_mut().fatal.take()
                {
                        Some(err) => Err(err),
                        None => Ok(()),
                }
        }

        /// Releases everything in dependency order. Safe to call twice.
        ///
        /// Unreachable handles are finalized first while their subsystems
        /// still exist. Then the renderer, window and event loop go, then
        /// images and audio, and the Lua state last. Handles still alive at
        /// that point find their subsystems gone and release nothing.
        pub fn teardown(&mut self)
        {
                let Some(host) = self.host.as_ref()
                else
                {
                        return;
                };

                log::debug!("Tearing down.");

                host.collect_garbage();

                let audio = {
                        let mut ctx = self.ctx.borrow_mut();

                        ctx.platform.close();

                        ctx.images_ready = false;

                        if ctx.state == LoopState::Running
                        {
                                ctx.state = LoopState::Stopped;
                        }

                        ctx.audio.take()
                };

                if let Some(audio) = audio
                {
                        audio.borrow_mut().shutdown();
                }

                self.host = None;

                log::debug!("Teardown complete.");
        }
}

impl Drop for Engine
{
        fn drop(&mut self)
        {
                self.teardown();
        }
}

/// Prepares the subsystems an [`Engine`] needs.
///
/// The platform and audio system default to what the config asks for and
/// can be replaced, which is how tests run the engine headless.
#[derive(Debug)]
pub struct EngineBuilder
{
        config: Config,
        platform: Option<PlatformSlot>,
        audio: Option<AudioSystem>,
}

/// Boxed platform with a `Debug` impl, so the builder can derive it.
struct PlatformSlot(Box<dyn Platform>);

impl std::fmt::Debug for PlatformSlot
{
        fn fmt(
                &self,
                f: &mut std::fmt::Formatter<'_>,
        ) -> std::fmt::Result
        {
                write!(f, "PlatformSlot({})", self.0.name())
        }
}

impl EngineBuilder
{
        pub fn new(config: Config) -> Self
        {
                Self {
                        config,
                        platform: None,
                        audio: None,
                }
        }

        pub fn with_platform(
                mut self,
                platform: Box<dyn Platform>,
        ) -> Self
        {
                self.platform = Some(PlatformSlot(platform));

                self
        }

        pub fn with_audio(
                mut self,
                audio: AudioSystem,
        ) -> Self
        {
                self.audio = Some(audio);

                self
        }

        /// Initialises audio and the Lua host. The window is opened later by
        /// the script through `Luma.Start`.
        pub fn build(self) -> Result<Engine, EngineError>
        {
                self.config.validate()?;

                let platform = match self.platform
                {
                        Some(PlatformSlot(platform)) => platform,
                        None => platform::create(&self.config),
                };

                let audio = match self.audio
                {
                        Some(audio) => audio,
                        None if self.config.engine.headless => AudioSystem::silent(self.config.audio.channels),
                        None => AudioSystem::from_config(&self.config.audio)?,
                };

                let defaults = WindowSettings::from_config(&self.config);

                let ctx = EngineContext::new(platform, Some(audio), defaults).shared();

                let host = ScriptHost::new(&ctx)?;

                Ok(Engine {
                        ctx,
                        host: Some(host),
                        frames: 0,
                })
        }
}

/// Runs an engine's entry script to completion and tears it down.
#[derive(Debug)]
pub struct EngineRunner
{
        pub engine: Engine,
        pub entry: PathBuf,
}

impl EngineRunner
{
        pub fn new(
                engine: Engine,
                entry: impl Into<PathBuf>,
        ) -> Self
        {
                Self {
                        engine,
                        entry: entry.into(),
                }
        }

        /// Teardown runs whether or not the script failed.
        pub fn run(mut self) -> anyhow::Result<()>
        {
                let result = self.engine.run_file(&self.entry);

                self.engine.teardown();

                Ok(result?)
        }
}
