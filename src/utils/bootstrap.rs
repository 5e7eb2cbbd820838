use crate::config::Config;

pub fn show_start_message(config: &Config)
{
        if !config.engine.show_start_message
        {
                return;
        }

        let luma_string = r#"

    ░██         ░██    ░██ ░███     ░███    ░███
    ░██         ░██    ░██ ░████   ░████   ░██░██
    ░██         ░██    ░██ ░██░██ ░██░██  ░██  ░██
    ░██         ░██    ░██ ░██ ░████ ░██ ░█████████
    ░██         ░██    ░██ ░██  ░██  ░██ ░██    ░██
    ░██          ░██  ░██  ░██       ░██ ░██    ░██
    ░██████████   ░██████  ░██       ░██ ░██    ░██

 Lua scripted 2D runtime built with winit, wgpu and Rust.

            "#;

        log::info!("{luma_string}")
}

/// `RUST_LOG` picks the verbosity, `info` when unset.
pub fn config_logging()
{
        let env = env_logger::Env::default().default_filter_or("info");

        if env_logger::Builder::from_env(env).try_init().is_err()
        {
                log::debug!("Logger already initialised.");
        }
}

/// Reads `luma.toml`, falling back to the defaults.
pub fn create_config() -> Config
{
        Config::from_file().unwrap_or_else(|err| {
                log::warn!("Failed to load config: {err}, falling back to default");

                Config::default()
        })
}
