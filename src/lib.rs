pub mod audio;
pub mod color;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod resource;
pub mod script;
pub mod texture;
pub mod utils;

use crate::{
        config::Config,
        engine::{EngineBuilder, EngineRunner},
        utils::{bootstrap, exit::show_exit_message},
};

/// Loads the config, runs the entry script and tears everything down.
///
/// The first command line argument, if any, replaces the configured entry
/// script.
pub fn run_luma() -> anyhow::Result<()>
{
        bootstrap::config_logging();

        let mut config = bootstrap::create_config();

        if let Some(entry) = std::env::args().nth(1)
        {
                config.script.entry = entry.into();
        }

        bootstrap::show_start_message(&config);

        run_with(&config)?;

        show_exit_message(&config);

        Ok(())
}

/// Runs `config.script.entry` with the subsystems the config asks for.
pub fn run_with(config: &Config) -> anyhow::Result<()>
{
        let engine = EngineBuilder::new(config.clone()).build()?;

        EngineRunner::new(engine, &config.script.entry).run()
}
