use std::time::Duration;

use instant::Instant;
use rodio::{OutputStream, OutputStreamBuilder, Sink, buffer::SamplesBuffer};

use crate::audio::SoundData;

/// Plays decoded sounds on numbered channels.
pub trait AudioBackend: std::fmt::Debug
{
        fn name(&self) -> &'static str;

        /// Starts `sound` from the beginning, replacing whatever the channel
        /// was playing.
        fn play(
                &mut self,
                channel: usize,
                sound: &SoundData,
        );

        fn pause(
                &mut self,
                channel: usize,
        );

        fn resume(
                &mut self,
                channel: usize,
        );

        fn stop(
                &mut self,
                channel: usize,
        );

        /// Audible right now: started, not paused and not finished.
        fn is_playing(
                &self,
                channel: usize,
        ) -> bool;

        fn is_paused(
                &self,
                channel: usize,
        ) -> bool;

        /// Stops every channel and closes the output device.
        fn shutdown(&mut self);
}

/// Output through the default audio device, one `Sink` per channel.
pub struct RodioBackend
{
        stream: Option<OutputStream>,
        sinks: Vec<Option<Sink>>,
}

impl std::fmt::Debug for RodioBackend
{
        fn fmt(
                &self,
                f: &mut std::fmt::Formatter<'_>,
        ) -> std::fmt::Result
        {
                f.debug_struct("RodioBackend")
                        .field("open", &self.stream.is_some())
                        .field("channels", &self.sinks.len())
                        .finish()
        }
}

impl RodioBackend
{
        pub fn new(channels: usize) -> anyhow::Result<Self>
        {
                let mut stream = OutputStreamBuilder::open_default_stream()?;

                // The stream logs to stderr when dropped unless told otherwise.
                stream.log_on_drop(false);

                Ok(Self {
                        stream: Some(stream),
                        sinks: (0..channels).map(|_| None).collect(),
                })
        }

        fn sink(
                &self,
                channel: usize,
        ) -> Option<&Sink>
        {
                self.sinks.get(channel).and_then(Option::as_ref)
        }
}

impl AudioBackend for RodioBackend
{
        fn name(&self) -> &'static str
        {
                "rodio"
        }

        fn play(
                &mut self,
                channel: usize,
                sound: &SoundData,
        )
        {
                let Some(stream) = self.stream.as_ref()
                else
                {
                        return;
                };

                let Some(slot) = self.sinks.get_mut(channel)
                else
                {
                        return;
                };

                if let Some(old) = slot.take()
                {
                        old.stop();
                }

                let sink = Sink::connect_new(stream.mixer());

                sink.append(SamplesBuffer::new(
                        sound.channels(),
                        sound.sample_rate(),
                        sound.samples().to_vec(),
                ));

                *slot = Some(sink);
        }

        fn pause(
                &mut self,
                channel: usize,
        )
        {
                if let Some(sink) = self.sink(channel)
                {
                        sink.pause();
                }
        }

        fn resume(
                &mut self,
                channel: usize,
        )
        {
                if let Some(sink) = self.sink(channel)
                {
                        sink.play();
                }
        }

        fn stop(
                &mut self,
                channel: usize,
        )
        {
                if let Some(sink) = self.sinks.get_mut(channel).and_then(Option::take)
                {
                        sink.stop();
                }
        }

        fn is_playing(
                &self,
                channel: usize,
        ) -> bool
        {
                self.sink(channel)
                        .map(|s| !s.is_paused() && !s.empty())
                        .unwrap_or(false)
        }

        fn is_paused(
                &self,
                channel: usize,
        ) -> bool
        {
                self.sink(channel).map(|s| s.is_paused()).unwrap_or(false)
        }

        fn shutdown(&mut self)
        {
                for sink in self.sinks.iter_mut().filter_map(Option::take)
                {
                        sink.stop();
                }

                self.stream = None;
        }
}

#[derive(Debug, Clone, Copy)]
struct SilentChannel
{
        length: Duration,
        /// Playback time accumulated before the current run.
        played: Duration,
        /// Set while the channel is running.
        resumed_at: Option<Instant>,
}

impl SilentChannel
{
        fn position(&self) -> Duration
        {
                self.played + self.resumed_at.map(|t| t.elapsed()).unwrap_or_default()
        }

        fn finished(&self) -> bool
        {
                self.position() >= self.length
        }
}

/// Keeps time for each channel without an output device.
///
/// Used when audio is disabled in the config and by tests.
#[derive(Debug)]
pub struct SilentBackend
{
        channels: Vec<Option<SilentChannel>>,
}

impl SilentBackend
{
        pub fn new(channels: usize) -> Self
        {
                Self {
                        channels: vec![None; channels],
                }
        }

        fn channel(
                &self,
                channel: usize,
        ) -> Option<&SilentChannel>
        {
                self.channels.get(channel).and_then(Option::as_ref)
        }
}

impl AudioBackend for SilentBackend
{
        fn name(&self) -> &'static str
        {
                "silent"
        }

        fn play(
                &mut self,
                channel: usize,
                sound: &SoundData,
        )
        {
                if let Some(slot) = self.channels.get_mut(channel)
                {
                        *slot = Some(SilentChannel {
                                length: sound.duration(),
                                played: Duration::ZERO,
                                resumed_at: Some(Instant::now()),
                        });
                }
        }

        fn pause(
                &mut self,
                channel: usize,
        )
        {
                if let Some(Some(state)) = self.channels.get_mut(channel)
                {
                        if let Some(start) = state.resumed_at.take()
                        {
                                state.played += start.elapsed();
                        }
                }
        }

        fn resume(
                &mut self,
                channel: usize,
        )
        {
                if let Some(Some(state)) = self.channels.get_mut(channel)
                {
                        if state.resumed_at.is_none()
                        {
                                state.resumed_at = Some(Instant::now());
                        }
                }
        }

        fn stop(
                &mut self,
                channel: usize,
        )
        {
                if let Some(slot) = self.channels.get_mut(channel)
                {
                        *slot = None;
                }
        }

        fn is_playing(
                &self,
                channel: usize,
        ) -> bool
        {
                self.channel(channel)
                        .map(|s| s.resumed_at.is_some() && !s.finished())
                        .unwrap_or(false)
        }

        fn is_paused(
                &self,
                channel: usize,
        ) -> bool
        {
                self.channel(channel)
                        .map(|s| s.resumed_at.is_none() && !s.finished())
                        .unwrap_or(false)
        }

        fn shutdown(&mut self)
        {
                self.channels.fill(None);
        }
}
