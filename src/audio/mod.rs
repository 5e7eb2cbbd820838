//! Sound decoding and the channel mixer.
//!
//! Every live sound owns one channel from a fixed [`pool::ChannelPool`],
//! held through a [`ChannelLease`] that hands the channel back when it is
//! released or dropped, whichever comes first.

pub mod backend;
pub mod pool;

use std::{
        cell::RefCell,
        fs::File,
        io::BufReader,
        path::Path,
        rc::{Rc, Weak},
        sync::Arc,
        time::Duration,
};

use rodio::{Decoder, Source};

use crate::{
        audio::{
                backend::{AudioBackend, RodioBackend, SilentBackend},
                pool::ChannelPool,
        },
        config::AudioConfig,
        error::EngineError,
};

/// Number of mixer channels, as many as SDL_mixer allocates by default.
pub const MAX_CHANNELS: usize = 8;

/// A fully decoded sample, interleaved `f32` frames.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundData
{
        channels: u16,
        sample_rate: u32,
        samples: Arc<Vec<f32>>,
}

impl SoundData
{
        pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError>
        {
                let path = path.as_ref();

                let file = File::open(path).map_err(|e| EngineError::decode("Sound", path, e))?;

                let decoder = Decoder::new(BufReader::new(file))
                        .map_err(|e| EngineError::decode("Sound", path, e))?;

                let channels = decoder.channels();

                let sample_rate = decoder.sample_rate();

                let samples: Vec<f32> = decoder.collect();

                log::debug!(
                        "Decoded '{}': {} samples, {} channel(s) at {} Hz.",
                        path.display(),
                        samples.len(),
                        channels,
                        sample_rate
                );

                Ok(Self::from_samples(channels, sample_rate, samples))
        }

        pub fn from_samples(
                channels: u16,
                sample_rate: u32,
                samples: Vec<f32>,
        ) -> Self
        {
                Self {
                        channels: channels.max(1),
                        sample_rate: sample_rate.max(1),
                        samples: Arc::new(samples),
                }
        }

        pub fn channels(&self) -> u16
        {
                self.channels
        }

        pub fn sample_rate(&self) -> u32
        {
                self.sample_rate
        }

        pub fn samples(&self) -> &[f32]
        {
                &self.samples
        }

        pub fn duration(&self) -> Duration
        {
                let frames = self.samples.len() as f64 / f64::from(self.channels);

                Duration::from_secs_f64(frames / f64::from(self.sample_rate))
        }
}

/// The mixer: channel bookkeeping plus the backend that makes noise.
#[derive(Debug)]
pub struct AudioSystem
{
        pool: ChannelPool,
        backend: Box<dyn AudioBackend>,
        open: bool,
}

impl AudioSystem
{
        pub fn new(
                backend: Box<dyn AudioBackend>,
                channels: usize,
        ) -> Self
        {
                log::info!("Audio backend '{}' with {} channel(s).", backend.name(), channels);

                Self {
                        pool: ChannelPool::new(channels),
                        backend,
                        open: true,
                }
        }

        /// Opens the device the config asks for.
        pub fn from_config(config: &AudioConfig) -> Result<Self, EngineError>
        {
                if !config.enabled
                {
                        return Ok(Self::silent(config.channels));
                }

                let backend = RodioBackend::new(config.channels)
                        .map_err(|e| EngineError::init("audio", e))?;

                Ok(Self::new(Box::new(backend), config.channels))
        }

        pub fn silent(channels: usize) -> Self
        {
                Self::new(Box::new(SilentBackend::new(channels)), channels)
        }

        pub fn is_open(&self) -> bool
        {
                self.open
        }

        pub fn backend_name(&self) -> &'static str
        {
                self.backend.name()
        }

        pub fn pool(&self) -> &ChannelPool
        {
                &self.pool
        }

        pub fn reserve(&mut self) -> Result<usize, EngineError>
        {
                self.pool.reserve().ok_or(EngineError::ChannelsExhausted {
                        capacity: self.pool.capacity(),
                })
        }

        /// Silences `channel` and returns it to the pool.
        pub fn release(
                &mut self,
                channel: usize,
        )
        {
                if self.open
                {
                        self.backend.stop(channel);
                }

                self.pool.release(channel);
        }

        pub fn play(
                &mut self,
                channel: usize,
                sound: &SoundData,
        )
        {
                if self.open
                {
                        self.backend.play(channel, sound);
                }
        }

        pub fn pause(
                &mut self,
                channel: usize,
        )
        {
                if self.open
                {
                        self.backend.pause(channel);
                }
        }

        pub fn resume(
                &mut self,
                channel: usize,
        )
        {
                if self.open
                {
                        self.backend.resume(channel);
                }
        }

        pub fn stop(
                &mut self,
                channel: usize,
        )
        {
                if self.open
                {
                        self.backend.stop(channel);
                }
        }

        pub fn is_playing(
                &self,
                channel: usize,
        ) -> bool
        {
                self.open && self.backend.is_playing(channel)
        }

        pub fn is_paused(
                &self,
                channel: usize,
        ) -> bool
        {
                self.open && self.backend.is_paused(channel)
        }

        /// Stops everything and closes the device. Later calls are no-ops.
        pub fn shutdown(&mut self)
        {
                if !self.open
                {
                        return;
                }

                self.backend.shutdown();
                self.pool.release_all();
                self.open = false;

                log::debug!("Audio shut down.");
        }
}

/// A channel owned by one sound.
///
/// Dropping the lease releases the channel. After the mixer itself is gone
/// the lease does nothing.
#[derive(Debug)]
pub struct ChannelLease
{
        channel: usize,
        audio: Weak<RefCell<AudioSystem>>,
        released: bool,
}

impl ChannelLease
{
        pub fn acquire(audio: &Rc<RefCell<AudioSystem>>) -> Result<Self, EngineError>
        {
                let channel = audio.borrow_mut().reserve()?;

                Ok(Self {
                        channel,
                        audio: Rc::downgrade(audio),
                        released: false,
                })
        }

        pub fn channel(&self) -> usize
        {
                self.channel
        }

        pub fn is_released(&self) -> bool
        {
                self.released
        }

        /// Runs `f` against the mixer while the lease is live.
        pub fn with_audio<R>(
                &self,
                f: impl FnOnce(&mut AudioSystem, usize) -> R,
        ) -> Option<R>
        {
                if self.released
                {
                        return None;
                }

                let audio = self.audio.upgrade()?;

                let mut audio = audio.try_borrow_mut().ok()?;

                Some(f(&mut audio, self.channel))
        }

        pub fn release(&mut self)
        {
                if self.released
                {
                        return;
                }

                self.released = true;

                let Some(audio) = self.audio.upgrade()
                else
                {
                        return;
                };

                match audio.try_borrow_mut()
                {
                        Ok(mut audio) => audio.release(self.channel),
                        Err(_) => log::warn!("Mixer busy, channel {} not released.", self.channel),
                }
        }
}

impl Drop for ChannelLease
{
        fn drop(&mut self)
        {
                self.release();
        }
}
