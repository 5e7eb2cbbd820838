#![allow(dead_code)]

use std::path::{Path, PathBuf};

use luma::{
        audio::AudioSystem,
        config::Config,
        engine::{Engine, EngineBuilder},
        platform::headless::{HeadlessPlatform, HeadlessProbe},
};
use mlua::FromLua;

pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 48;

pub fn test_config(channels: usize) -> Config
{
        let mut config = Config::default();

        config.engine.headless = true;
        config.engine.show_start_message = false;
        config.engine.show_exit_message = false;
        config.audio.channels = channels;
        config.window.title = String::from("Test");
        config.window.width = WIDTH;
        config.window.height = HEIGHT;

        config
}

/// Headless engine with a silent mixer of `channels` channels.
pub fn engine_with_channels(channels: usize) -> (Engine, HeadlessProbe)
{
        let (platform, probe) = HeadlessPlatform::new();

        let engine = EngineBuilder::new(test_config(channels))
                .with_platform(Box::new(platform))
                .with_audio(AudioSystem::silent(channels))
                .build()
                .unwrap();

        (engine, probe)
}

pub fn engine() -> (Engine, HeadlessProbe)
{
        engine_with_channels(8)
}

pub fn global<T: FromLua>(
        engine: &Engine,
        name: &str,
) -> T
{
        engine.host().unwrap().lua().globals().get(name).unwrap()
}

pub fn set_global(
        engine: &Engine,
        name: &str,
        value: &str,
)
{
        engine.host().unwrap().lua().globals().set(name, value).unwrap();
}

pub fn write_png(
        dir: &Path,
        name: &str,
        width: u32,
        height: u32,
        rgba: [u8; 4],
) -> PathBuf
{
        let path = dir.join(name);

        image::RgbaImage::from_pixel(width, height, image::Rgba(rgba))
                .save(&path)
                .unwrap();

        path
}

/// 16-bit mono PCM at 8 kHz.
pub fn write_wav(
        dir: &Path,
        name: &str,
        seconds: f32,
) -> PathBuf
{
        let rate: u32 = 8000;
        let frames = (rate as f32 * seconds) as u32;
        let data_len = frames * 2;

        let mut bytes = Vec::new();

        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&rate.to_le_bytes());
        bytes.extend_from_slice(&(rate * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());

        for i in 0..frames
        {
                let sample = ((i as f32 * 0.05).sin() * 8000.0) as i16;

                bytes.extend_from_slice(&sample.to_le_bytes());
        }

        let path = dir.join(name);

        std::fs::write(&path, bytes).unwrap();

        path
}
