//! Configuration file parser for ~/.config/lenta/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged, since they are usually typos.
use crate::theme::ThemeVariant;
use crate::util::DateLocale;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Locale for long-form dates in the detail overlay ("ru" or "en").
    pub date_locale: String,

    /// Entrance stagger between list entries, in milliseconds.
    pub stagger_ms: u64,

    /// Section title used when the articles file is a bare array.
    pub default_title: String,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,

    /// Engagement API; when `base_url` is unset actions are only logged.
    pub api: ApiConfig,
}

/// `[api]` table.
///
/// Custom Debug impl masks `token` so it never reaches logs or error output.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    /// Bearer token (alternative to the LENTA_API_TOKEN env var).
    /// Env var takes precedence over config file.
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            date_locale: "ru".to_string(),
            stagger_ms: 100,
            default_title: "Статьи".to_string(),
            keybindings: HashMap::new(),
            api: ApiConfig::default(),
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Top-level keys, for unknown-key warnings.
const KNOWN_KEYS: [&str; 6] = [
    "theme",
    "date_locale",
    "stagger_ms",
    "default_title",
    "keybindings",
    "api",
];

const KNOWN_API_KEYS: [&str; 2] = ["base_url", "token"];

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            warn_unknown_keys(&raw);
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            date_locale = %config.date_locale,
            api = config.api.base_url.is_some(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Theme variant, falling back to dark for unknown names.
    pub fn theme_variant(&self) -> ThemeVariant {
        ThemeVariant::from_str_name(&self.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %self.theme, "Unknown theme, using dark");
            ThemeVariant::Dark
        })
    }

    /// Date locale, falling back to `ru` for unknown names.
    pub fn date_locale(&self) -> DateLocale {
        DateLocale::from_str_name(&self.date_locale).unwrap_or_else(|| {
            tracing::warn!(date_locale = %self.date_locale, "Unknown date locale, using ru");
            DateLocale::default()
        })
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    /// API token: `LENTA_API_TOKEN` if set, else `[api] token`.
    pub fn api_token(&self) -> Option<String> {
        std::env::var("LENTA_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.api.token.clone())
    }
}

fn warn_unknown_keys(raw: &toml::Table) {
    for key in raw.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            tracing::warn!(key = %key, "Unknown key in config file, ignoring");
        }
    }
    if let Some(toml::Value::Table(api)) = raw.get("api") {
        for key in api.keys() {
            if !KNOWN_API_KEYS.contains(&key.as_str()) {
                tracing::warn!(key = %key, "Unknown key in [api] config table, ignoring");
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("lenta_config_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.date_locale(), DateLocale::Ru);
        assert_eq!(config.stagger(), Duration::from_millis(100));
        assert!(config.keybindings.is_empty());
        assert!(config.api.base_url.is_none());
        assert!(config.api.token.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/lenta_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let path = write_config("whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.stagger_ms, 100);
        cleanup(&path);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let path = write_config("partial", "theme = \"light\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme_variant(), ThemeVariant::Light);
        assert_eq!(config.date_locale, "ru");
        cleanup(&path);
    }

    #[test]
    fn test_full_config() {
        let content = r#"
theme = "light"
date_locale = "en"
stagger_ms = 40
default_title = "Popular"

[keybindings]
quit = "Ctrl+q"
like = "space"

[api]
base_url = "https://api.example.com"
token = "test-token-123"
"#;
        let path = write_config("full", content);
        let config = Config::load(&path).unwrap();

        assert_eq!(config.theme_variant(), ThemeVariant::Light);
        assert_eq!(config.date_locale(), DateLocale::En);
        assert_eq!(config.stagger(), Duration::from_millis(40));
        assert_eq!(config.default_title, "Popular");
        assert_eq!(config.keybindings.get("like").map(String::as_str), Some("space"));
        assert_eq!(config.api.base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.api.token.as_deref(), Some("test-token-123"));
        cleanup(&path);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        cleanup(&path);
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let path = write_config("wrongtype", "stagger_ms = \"fast\"\n");
        assert!(Config::load(&path).is_err());
        cleanup(&path);
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let path = write_config(
            "unknown",
            "theme = \"dark\"\ntotally_fake_key = 1\n[api]\nbase_ulr = \"typo\"\n",
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        assert!(config.api.base_url.is_none());
        cleanup(&path);
    }

    #[test]
    fn test_unknown_names_fall_back() {
        let config = Config {
            theme: "neon".to_string(),
            date_locale: "de".to_string(),
            ..Config::default()
        };
        assert_eq!(config.theme_variant(), ThemeVariant::Dark);
        assert_eq!(config.date_locale(), DateLocale::Ru);
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        cleanup(&path);
    }

    #[test]
    fn test_debug_masks_api_token() {
        let mut config = Config::default();
        config.api.token = Some("super-secret-token-12345".to_string());

        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super-secret-token-12345"));
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[test]
    fn test_debug_shows_none_when_no_token() {
        let debug_output = format!("{:?}", Config::default());
        assert!(!debug_output.contains("[REDACTED]"));
    }
}
