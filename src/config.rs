//! Runtime configuration read from the environment (and `.env` via `dotenv`).

use std::env;

use thiserror::Error;

/// Errors raised while reading the bot configuration.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Settings the bot needs at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Discord bot token.
    pub discord_token: String,
    /// Prefix for text commands (slash commands are always registered).
    pub prefix: String,
    /// Path or name of the `yt-dlp` executable.
    pub ytdlp_path: String,
    /// Volume every new playback manager starts with, in percent.
    pub default_volume: u8,
}

impl BotConfig {
    pub const DEFAULT_PREFIX: &'static str = "!";
    pub const DEFAULT_YTDLP: &'static str = "yt-dlp";
    pub const DEFAULT_VOLUME: u8 = 50;

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let prefix = lookup("COMMAND_PREFIX").unwrap_or_else(|| Self::DEFAULT_PREFIX.to_string());
        let ytdlp_path = lookup("YTDLP_PATH").unwrap_or_else(|| Self::DEFAULT_YTDLP.to_string());

        let default_volume = match lookup("DEFAULT_VOLUME") {
            Some(value) => value
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|volume| *volume <= 100)
                .ok_or(ConfigError::Invalid {
                    name: "DEFAULT_VOLUME",
                    value,
                })?,
            None => Self::DEFAULT_VOLUME,
        };

        Ok(Self {
            discord_token,
            prefix,
            ytdlp_path,
            default_volume,
        })
    }
}
