//! Rune configuration system
//!
//! Centralized settings for a Rune application, loaded from `rune.toml`
//! with environment variable overrides. The resulting structs are handed
//! explicitly to the services that need them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RuneConfig {
    /// Image loading settings
    pub images: ImageConfig,
    /// Fonts registered at startup
    pub fonts: FontsConfig,
    /// Main window settings
    pub window: WindowConfig,
}

/// Image source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    /// Cache remote images in memory (default: true)
    pub caching_enabled: bool,
    /// How long a cached image stays valid, in seconds (default: one day)
    pub cache_validity_secs: u64,
    /// Per-request timeout for remote images
    pub request_timeout_secs: u64,
    /// User agent sent with remote image requests
    pub user_agent: String,
    /// Upper bound on cached images
    pub max_cache_entries: usize,
}

/// A single font file and the alias views refer to it by
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FontEntry {
    pub file: PathBuf,
    pub alias: Option<String>,
}

/// Font configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FontsConfig {
    pub entries: Vec<FontEntry>,
}

/// Main window configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            caching_enabled: true,
            cache_validity_secs: 24 * 60 * 60,
            request_timeout_secs: 30,
            user_agent: format!("rune/{}", env!("CARGO_PKG_VERSION")),
            max_cache_entries: 256,
        }
    }
}

impl ImageConfig {
    pub fn cache_validity(&self) -> Duration {
        Duration::from_secs(self.cache_validity_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Rune".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl RuneConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the rune.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize the configuration back to TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from the default location (rune.toml in the current directory)
    /// or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        match Self::load_from_file("rune.toml") {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable rune.toml, using defaults");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary key lookup.
    pub fn merge_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // Image settings
        if let Some(val) = lookup("RUNE_IMAGE_CACHING") {
            self.images.caching_enabled = parse_flag(&val);
        }
        if let Some(secs) = lookup("RUNE_IMAGE_CACHE_VALIDITY_SECS").and_then(|v| v.parse().ok()) {
            self.images.cache_validity_secs = secs;
        }
        if let Some(secs) = lookup("RUNE_HTTP_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.images.request_timeout_secs = secs;
        }
        if let Some(agent) = lookup("RUNE_USER_AGENT") {
            self.images.user_agent = agent;
        }

        // Window settings
        if let Some(title) = lookup("RUNE_WINDOW_TITLE") {
            self.window.title = title;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from rune.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RuneConfig::default();
        assert!(config.images.caching_enabled);
        assert_eq!(config.images.cache_validity(), Duration::from_secs(86_400));
        assert!(config.fonts.entries.is_empty());
        assert_eq!(config.window.title, "Rune");
    }

    #[test]
    fn test_toml_serialization() {
        let config = RuneConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = RuneConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed = RuneConfig::from_toml_str(
            r#"
            [images]
            caching_enabled = false

            [[fonts.entries]]
            file = "OpenSans-Regular.ttf"
            alias = "OpenSansRegular"
            "#,
        )
        .unwrap();

        assert!(!parsed.images.caching_enabled);
        assert_eq!(parsed.images.request_timeout_secs, 30);
        assert_eq!(parsed.fonts.entries.len(), 1);
        assert_eq!(parsed.fonts.entries[0].alias.as_deref(), Some("OpenSansRegular"));
        assert_eq!(parsed.window.width, 1024);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rune.toml");
        std::fs::write(&path, "[window]\ntitle = \"Gallery\"\n").unwrap();

        let config = RuneConfig::load_from_file(&path).unwrap();
        assert_eq!(config.window.title, "Gallery");

        let missing = RuneConfig::load_from_file(dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = RuneConfig::from_toml_str("[images\ncaching_enabled = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_merge_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RUNE_IMAGE_CACHING", "false"),
            ("RUNE_IMAGE_CACHE_VALIDITY_SECS", "60"),
            ("RUNE_HTTP_TIMEOUT_SECS", "not-a-number"),
            ("RUNE_WINDOW_TITLE", "Override"),
        ]
        .into_iter()
        .collect();

        let mut config = RuneConfig::default();
        config.merge_with(|key| vars.get(key).map(|v| v.to_string()));

        assert!(!config.images.caching_enabled);
        assert_eq!(config.images.cache_validity_secs, 60);
        assert_eq!(config.images.request_timeout_secs, 30);
        assert_eq!(config.window.title, "Override");
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("RUNE_USER_AGENT", "rune-test-agent");
        }

        let mut config = RuneConfig::default();
        config.merge_with_env();
        assert_eq!(config.images.user_agent, "rune-test-agent");

        unsafe {
            std::env::remove_var("RUNE_USER_AGENT");
        }
    }
}
