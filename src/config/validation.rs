//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{RosterBuddyError, Result};
use super::{Settings, StorageBackend};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_roster_config(&settings.roster)?;
    validate_storage_config(&settings.storage)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(RosterBuddyError::Config(
            "Bot token is required".to_string()
        ));
    }

    if config.allowed_chat_ids.is_empty() {
        return Err(RosterBuddyError::Config(
            "At least one allowed chat ID must be configured".to_string()
        ));
    }

    Ok(())
}

/// Validate game defaults and token syntax
fn validate_roster_config(config: &super::RosterConfig) -> Result<()> {
    if config.hourly_rate == 0 || config.duration_hours == 0 || config.capacity == 0 {
        return Err(RosterBuddyError::Config(
            "Default hourly rate, duration and capacity must be greater than 0".to_string()
        ));
    }

    if !(-23..=23).contains(&config.utc_offset_hours) {
        return Err(RosterBuddyError::Config(
            format!("UTC offset out of range: {}", config.utc_offset_hours)
        ));
    }

    let prefixes = [
        &config.price_token_prefix,
        &config.hours_token_prefix,
        &config.capacity_token_prefix,
    ];
    if prefixes.iter().any(|p| p.is_empty()) {
        return Err(RosterBuddyError::Config(
            "Override token prefixes must not be empty".to_string()
        ));
    }

    Ok(())
}

/// Validate snapshot storage configuration
fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    match config.backend {
        StorageBackend::File if config.file_path.is_empty() => {
            return Err(RosterBuddyError::Config(
                "Storage file path is required".to_string()
            ));
        }
        StorageBackend::Redis if config.redis_url.is_empty() || config.redis_key.is_empty() => {
            return Err(RosterBuddyError::Config(
                "Redis URL and key are required for the redis backend".to_string()
            ));
        }
        _ => {}
    }

    if config.flush_interval_seconds == 0 {
        return Err(RosterBuddyError::Config(
            "Flush interval must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(RosterBuddyError::Config(
            "Default language is required".to_string()
        ));
    }

    if config.supported_languages.is_empty() {
        return Err(RosterBuddyError::Config(
            "At least one supported language is required".to_string()
        ));
    }

    if !config.supported_languages.contains(&config.default_language) {
        return Err(RosterBuddyError::Config(
            "Default language must be in supported languages list".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(RosterBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(RosterBuddyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
