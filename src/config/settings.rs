//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};
use crate::models::EventDefaults;

/// Main application configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub bot: BotConfig,
    pub roster: RosterConfig,
    pub storage: StorageConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BotConfig {
    pub token: String,
    /// Chats where commands are accepted
    pub allowed_chat_ids: Vec<i64>,
}

/// Game defaults and command syntax
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RosterConfig {
    pub hourly_rate: u32,
    pub duration_hours: u32,
    pub capacity: u32,
    /// Local time zone used to decide what "today" is
    pub utc_offset_hours: i32,
    pub price_token_prefix: String,
    pub hours_token_prefix: String,
    pub capacity_token_prefix: String,
}

/// Where the event store snapshot lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Redis,
}

/// Snapshot persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub file_path: String,
    pub redis_url: String,
    pub redis_key: String,
    pub flush_interval_seconds: u64,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub translations_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; empty disables file logging
    pub directory: String,
    pub json: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("ROSTERBUDDY")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("bot.allowed_chat_ids")
                    .with_list_parse_key("i18n.supported_languages"),
            )
            .set_override_option("bot.token", std::env::var("BOT_TOKEN").ok())?
            .set_override_option("bot.allowed_chat_ids", legacy_allowed_chat_ids())?
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::RosterBuddyError> {
        super::validation::validate_settings(self)
    }
}

impl RosterConfig {
    pub fn event_defaults(&self) -> EventDefaults {
        EventDefaults {
            hourly_rate: self.hourly_rate,
            duration_hours: self.duration_hours,
            capacity: self.capacity,
        }
    }
}

/// `ALLOWED_CHAT_IDS=1,2,3` as used by earlier deployments
fn legacy_allowed_chat_ids() -> Option<Vec<i64>> {
    let raw = std::env::var("ALLOWED_CHAT_IDS").ok()?;
    let ids: Vec<i64> = raw
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            allowed_chat_ids: vec![],
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        let defaults = EventDefaults::default();
        Self {
            hourly_rate: defaults.hourly_rate,
            duration_hours: defaults.duration_hours,
            capacity: defaults.capacity,
            utc_offset_hours: 3,
            price_token_prefix: "₽".to_string(),
            hours_token_prefix: "ч.".to_string(),
            capacity_token_prefix: "max.".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            file_path: "chats_data.json".to_string(),
            redis_url: "redis://localhost:6379".to_string(),
            redis_key: "rosterbuddy:chats".to_string(),
            flush_interval_seconds: 10,
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_language: "ru".to_string(),
            supported_languages: vec!["ru".to_string(), "en".to_string()],
            translations_dir: "translations".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: String::new(),
            json: false,
        }
    }
}
