//! Translation loader and i18n management
//!
//! This module provides translation loading, language detection and message
//! formatting for bot replies and roster labels.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use serde_json::{Value, Map};
use tokio::fs;
use tracing::{info, warn, error, debug};
use crate::utils::errors::{RosterBuddyError, Result};
use crate::config::I18nConfig;

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    /// Loaded translations by language code
    translations: HashMap<String, Map<String, Value>>,
    /// Default language code
    default_language: String,
    /// Supported language codes
    supported_languages: Vec<String>,
    translations_dir: PathBuf,
}

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

impl I18n {
    /// Create a new I18n instance
    pub fn new(config: &I18nConfig) -> Self {
        Self {
            translations: HashMap::new(),
            default_language: config.default_language.clone(),
            supported_languages: config.supported_languages.clone(),
            translations_dir: PathBuf::from(&config.translations_dir),
        }
    }

    /// Load all translation files from the translations directory
    pub async fn load_translations(&mut self) -> Result<()> {
        let translations_dir = self.translations_dir.clone();

        let supported_languages = self.supported_languages.clone();
        for lang_code in &supported_languages {
            let file_path = translations_dir.join(format!("{}.json", lang_code));

            if file_path.exists() {
                match self.load_language_file(&file_path, lang_code).await {
                    Ok(_) => info!("Loaded translations for language: {}", lang_code),
                    Err(e) => {
                        error!("Failed to load translations for {}: {}", lang_code, e);
                        if lang_code == &self.default_language {
                            return Err(RosterBuddyError::Config(
                                format!("Failed to load default language translations: {}", e)
                            ));
                        }
                    }
                }
            } else {
                warn!("Translation file not found: {}", file_path.display());
                if lang_code == &self.default_language {
                    return Err(RosterBuddyError::Config(
                        format!("Default language translation file not found: {}", file_path.display())
                    ));
                }
            }
        }

        Ok(())
    }

    /// Load a single language file
    async fn load_language_file(&mut self, file_path: &Path, lang_code: &str) -> Result<()> {
        let content = fs::read_to_string(file_path).await?;
        let translations: Value = serde_json::from_str(&content)?;

        if let Value::Object(map) = translations {
            debug!("Loaded {} top-level translation keys for {}", map.len(), lang_code);
            self.translations.insert(lang_code.to_string(), map);
        } else {
            return Err(RosterBuddyError::Config(
                format!("Invalid translation file format for {}", lang_code)
            ));
        }

        Ok(())
    }

    /// Get a translated message
    pub fn t(&self, key: &str, lang: &str, params: Option<&TranslationParams>) -> String {
        let effective_lang = self.get_effective_language(lang);

        let translation = self
            .get_translation_value(key, effective_lang)
            .or_else(|| self.get_translation_value(key, &self.default_language));

        match translation {
            Some(text) => self.format_message(text, params),
            None => {
                warn!("Translation key '{}' not found in any language", key);
                key.to_string()
            }
        }
    }

    /// Check if a language is supported
    pub fn is_language_supported(&self, lang: &str) -> bool {
        self.supported_languages.iter().any(|l| l == lang)
    }

    /// Get the effective language (fallback to default if not supported)
    fn get_effective_language<'a>(&'a self, lang: &'a str) -> &'a str {
        if self.is_language_supported(lang) && self.translations.contains_key(lang) {
            lang
        } else {
            &self.default_language
        }
    }

    /// Get translation text from nested JSON structure
    fn get_translation_value(&self, key: &str, lang: &str) -> Option<&str> {
        let mut current = self.translations.get(lang)?;

        // Support nested keys like "errors.author_only"
        let mut parts = key.split('.').peekable();
        while let Some(part) = parts.next() {
            let value = current.get(part)?;
            if parts.peek().is_none() {
                return value.as_str();
            }
            current = value.as_object()?;
        }

        None
    }

    /// Format message with parameters
    fn format_message(&self, template: &str, params: Option<&TranslationParams>) -> String {
        if let Some(params) = params {
            let mut result = template.to_string();
            for (key, value) in params {
                let placeholder = format!("{{{}}}", key);
                result = result.replace(&placeholder, value);
            }
            result
        } else {
            template.to_string()
        }
    }

    /// Get supported languages
    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    /// Get default language
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Detect user language from Telegram language code
    pub fn detect_user_language(&self, telegram_lang: Option<&str>) -> String {
        if let Some(lang) = telegram_lang {
            // Extract language code from locale (e.g., "en-US" -> "en")
            let lang_code = lang.split('-').next().unwrap_or(lang);

            if self.is_language_supported(lang_code) {
                return lang_code.to_string();
            }
        }

        self.default_language.clone()
    }

    /// All leaf keys of a loaded language, dotted
    pub fn keys(&self, lang: &str) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(map) = self.translations.get(lang) {
            collect_keys(map, "", &mut keys);
        }
        keys.sort();
        keys
    }
}

fn collect_keys(obj: &Map<String, Value>, prefix: &str, keys: &mut Vec<String>) {
    for (name, value) in obj {
        let key = if prefix.is_empty() { name.clone() } else { format!("{}.{}", prefix, name) };
        match value {
            Value::Object(nested) => collect_keys(nested, &key, keys),
            _ => keys.push(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> I18nConfig {
        I18nConfig {
            default_language: "ru".to_string(),
            supported_languages: vec!["ru".to_string(), "en".to_string()],
            translations_dir: "translations".to_string(),
        }
    }

    async fn loaded() -> I18n {
        let mut i18n = I18n::new(&create_test_config());
        i18n.load_translations().await.expect("shipped translations load");
        i18n
    }

    #[test]
    fn test_language_detection() {
        let i18n = I18n::new(&create_test_config());

        assert_eq!(i18n.detect_user_language(Some("en-US")), "en");
        assert_eq!(i18n.detect_user_language(Some("ru")), "ru");
        assert_eq!(i18n.detect_user_language(Some("fr")), "ru"); // fallback
        assert_eq!(i18n.detect_user_language(None), "ru"); // fallback
    }

    #[test]
    fn test_message_formatting() {
        let i18n = I18n::new(&create_test_config());

        let mut params = HashMap::new();
        params.insert("name".to_string(), "John".to_string());

        let result = i18n.format_message("Now you are {name}", Some(&params));
        assert_eq!(result, "Now you are John");
    }

    #[tokio::test]
    async fn test_shipped_languages_have_same_keys() {
        let i18n = loaded().await;
        let ru = i18n.keys("ru");
        assert!(!ru.is_empty());
        assert_eq!(ru, i18n.keys("en"));
    }

    #[tokio::test]
    async fn test_lookup_and_fallback() {
        let i18n = loaded().await;

        assert_eq!(i18n.t("events.deleted", "en", None), "Game deleted!");
        // unsupported language falls back to the default
        assert_eq!(i18n.t("events.deleted", "fr", None), i18n.t("events.deleted", "ru", None));
        // unknown keys are returned as-is
        assert_eq!(i18n.t("no.such.key", "en", None), "no.such.key");
    }

    #[tokio::test]
    async fn test_missing_default_language_file_fails() {
        let mut config = create_test_config();
        config.translations_dir = "does-not-exist".to_string();
        let mut i18n = I18n::new(&config);
        assert!(i18n.load_translations().await.is_err());
    }
}
