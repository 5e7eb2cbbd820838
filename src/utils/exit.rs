use colored::*;

use crate::{config::Config, utils::random::get_random_u128};

const MESSAGES: [(&str, &str); 8] = [
        ("Luma has gone dark.", "yellow"),
        ("Luma's last frame has been presented.", "cyan"),
        ("Luma faded to black.", "magenta"),
        ("Luma closed its window on the world.", "blue"),
        ("Luma's update loop returned for the last time.", "green"),
        ("Luma's channels fell silent.", "purple"),
        ("Luma collected its own garbage.", "bright yellow"),
        ("Luma ran out of frames.", "bright cyan"),
];

/// A random coloured farewell, empty when disabled in the config.
pub fn get_exit_message(config: &Config) -> String
{
        if !config.engine.show_exit_message
        {
                return String::new();
        }

        let choice = get_random_u128(MESSAGES.len() as u128).unwrap_or_else(|err| {
                log::debug!("No randomness available: {err}");

                0
        });

        let Some((message, color)) = MESSAGES.get(choice as usize)
        else
        {
                return String::new();
        };

        match *color
        {
                "yellow" => message.yellow().to_string(),
                "cyan" => message.cyan().to_string(),
                "magenta" => message.magenta().to_string(),
                "blue" => message.blue().to_string(),
                "green" => message.green().to_string(),
                "purple" => message.purple().to_string(),
                "bright yellow" => message.bright_yellow().to_string(),
                "bright cyan" => message.bright_cyan().to_string(),
                _ => message.to_string(),
        }
}

pub fn show_exit_message(config: &Config)
{
        let msg = get_exit_message(config);

        if !msg.is_empty()
        {
                log::info!("{msg}");
        }
}
