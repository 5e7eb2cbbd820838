use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{audio::MAX_CHANNELS, platform::MAX_WINDOW_DIMENSION};

/// File looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "luma.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config
{
        pub script: ScriptConfig,
        pub window: WindowConfig,
        pub audio: AudioConfig,
        pub engine: EngineConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptConfig
{
        /// Lua file executed once at startup.
        pub entry: PathBuf,
}

/// Defaults used by `Luma.Start` for omitted arguments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig
{
        pub title: String,
        pub width: u32,
        pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig
{
        pub enabled: bool,
        pub channels: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig
{
        /// Run without a window or audio device.
        pub headless: bool,
        pub show_start_message: bool,
        pub show_exit_message: bool,
}

impl Default for Config
{
        fn default() -> Self
        {
                Self {
                        script: ScriptConfig::default(),
                        window: WindowConfig::default(),
                        audio: AudioConfig::default(),
                        engine: EngineConfig::default(),
                }
        }
}

impl Default for ScriptConfig
{
        fn default() -> Self
        {
                Self {
                        entry: PathBuf::from("main.lua"),
                }
        }
}

impl Default for WindowConfig
{
        fn default() -> Self
        {
                Self {
                        title: String::from("Luma"),
                        width: 800,
                        height: 600,
                }
        }
}

impl Default for AudioConfig
{
        fn default() -> Self
        {
                Self {
                        enabled: true,
                        channels: MAX_CHANNELS,
                }
        }
}

impl Default for EngineConfig
{
        fn default() -> Self
        {
                Self {
                        headless: false,
                        show_start_message: true,
                        show_exit_message: true,
                }
        }
}

impl Config
{
        pub fn new() -> Self
        {
                Self::default()
        }

        /// Reads [`CONFIG_FILE`] from the working directory.
        pub fn from_file() -> anyhow::Result<Self>
        {
                Self::from_path(CONFIG_FILE)
        }

        pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self>
        {
                let text = std::fs::read_to_string(path.as_ref())?;

                Self::from_toml(&text)
        }

        pub fn from_toml(text: &str) -> anyhow::Result<Self>
        {
                let config: Config = toml::from_str(text)?;

                config.validate()?;

                Ok(config)
        }

        pub fn validate(&self) -> Result<(), crate::error::EngineError>
        {
                if self.audio.channels == 0 || self.audio.channels > MAX_CHANNELS
                {
                        return Err(crate::error::EngineError::Config(format!(
                                "audio.channels must be within 1..={MAX_CHANNELS}, got {}",
                                self.audio.channels
                        )));
                }

                if self.window.width == 0 || self.window.height == 0
                {
                        return Err(crate::error::EngineError::Config(String::from(
                                "window.width and window.height must be non-zero",
                        )));
                }

                if self.window.width > MAX_WINDOW_DIMENSION || self.window.height > MAX_WINDOW_DIMENSION
                {
                        return Err(crate::error::EngineError::Config(format!(
                                "window.width and window.height must be at most {MAX_WINDOW_DIMENSION}"
                        )));
                }

                Ok(())
        }
}

#[cfg(test)]
mod tests
{
        use super::*;

        #[test]
        fn empty_file_gives_defaults()
        {
                let config = Config::from_toml("").unwrap();

                assert_eq!(config.script.entry, PathBuf::from("main.lua"));
                assert_eq!(config.window.title, "Luma");
                assert_eq!((config.window.width, config.window.height), (800, 600));
                assert_eq!(config.audio.channels, MAX_CHANNELS);
                assert!(!config.engine.headless);
        }

        #[test]
        fn partial_sections_keep_other_defaults()
        {
                let config = Config::from_toml(
                        r#"
                        [window]
                        title = "Pong"

                        [engine]
                        headless = true
                        "#,
                )
                .unwrap();

                assert_eq!(config.window.title, "Pong");
                assert_eq!(config.window.width, 800);
                assert!(config.engine.headless);
                assert!(config.engine.show_exit_message);
        }

        #[test]
        fn rejects_channel_count_above_pool_size()
        {
                let err = Config::from_toml("[audio]\nchannels = 64\n").unwrap_err();

                assert!(err.to_string().contains("audio.channels"));
        }

        #[test]
        fn rejects_window_larger_than_the_canvas_limit()
        {
                let err = Config::from_toml("[window]\nwidth = 100000\n").unwrap_err();

                assert!(err.to_string().contains("at most 8192"));
        }
}
