// src/config.rs
//! Environment-backed configuration.
//!
//! All settings come from the process environment, with an optional `.env`
//! file (loaded via `dotenv`) standing in as the config file. Required keys:
//!
//! - `TWITCH_APP_ID` / `TWITCH_APP_SECRET`: Helix app credentials
//! - `TWITCH_USERNAMES`: comma-separated logins to watch
//! - `TELEGRAM_BOT_TOKEN`: Bot API token
//! - `TELEGRAM_CHAT_ID`: destination chat (i64)
//!
//! `GOLIVE_POLL_SECONDS` is optional and defaults to 60.

use std::time::Duration;

use crate::error::Error;

pub const DEFAULT_POLL_SECONDS: u64 = 60;

#[derive(Debug, Clone)]
pub struct TwitchConfig {
    pub app_id: String,
    pub app_secret: String,
    /// Configured logins, lowercased and deduplicated, in configuration order.
    pub usernames: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub twitch: TwitchConfig,
    pub telegram: TelegramConfig,
    pub poll_interval: Duration,
}

impl AppConfig {
    /// Loads configuration from `.env` (if present) and the process
    /// environment. Any missing or malformed required key is a fatal
    /// `Error::Config`.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), but reading keys through the
    /// given lookup. Tests use this to avoid touching the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_id = required(&lookup, "TWITCH_APP_ID")?;
        let app_secret = required(&lookup, "TWITCH_APP_SECRET")?;

        let usernames = normalize_usernames(&required(&lookup, "TWITCH_USERNAMES")?);
        if usernames.is_empty() {
            return Err(Error::Config(
                "TWITCH_USERNAMES does not contain any usernames".into(),
            ));
        }

        let bot_token = required(&lookup, "TELEGRAM_BOT_TOKEN")?;
        let chat_id_raw = required(&lookup, "TELEGRAM_CHAT_ID")?;
        let chat_id = chat_id_raw.trim().parse::<i64>().map_err(|e| {
            Error::Config(format!("TELEGRAM_CHAT_ID '{chat_id_raw}' is not an integer: {e}"))
        })?;

        let poll_seconds = match lookup("GOLIVE_POLL_SECONDS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                Error::Config(format!("GOLIVE_POLL_SECONDS '{raw}' is not a number: {e}"))
            })?,
            None => DEFAULT_POLL_SECONDS,
        };
        if poll_seconds == 0 {
            return Err(Error::Config("GOLIVE_POLL_SECONDS must be nonzero".into()));
        }

        Ok(Self {
            twitch: TwitchConfig {
                app_id,
                app_secret,
                usernames,
            },
            telegram: TelegramConfig { bot_token, chat_id },
            poll_interval: Duration::from_secs(poll_seconds),
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, Error>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) if !val.trim().is_empty() => Ok(val),
        Some(_) => Err(Error::Config(format!("required key {key} is empty"))),
        None => Err(Error::Config(format!("missing required key {key}"))),
    }
}

/// Lowercases, trims and deduplicates the comma-separated login list,
/// preserving first-occurrence order. Twitch logins are case-insensitive, so
/// the lowercased form is the canonical account key everywhere else in the
/// crate.
fn normalize_usernames(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let login = part.trim().to_lowercase();
        if login.is_empty() || out.iter().any(|seen| seen == &login) {
            continue;
        }
        out.push(login);
    }
    out
}
