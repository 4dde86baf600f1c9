use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_embed::RustEmbed;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "staffgate.toml";

#[derive(RustEmbed)]
#[folder = "assets/"]
struct EmbeddedConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("embedded default config `{0}` is missing")]
    MissingEmbedded(&'static str),
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
    pub navigation: NavigationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            navigation: NavigationConfig::default(),
        }
    }
}

/// How long a success notice stays up before the screen moves on.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    pub sign_in_redirect_ms: u64,
    pub sign_up_redirect_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            sign_in_redirect_ms: 1600,
            sign_up_redirect_ms: 800,
        }
    }
}

impl NavigationConfig {
    pub fn immediate() -> Self {
        Self {
            sign_in_redirect_ms: 0,
            sign_up_redirect_ms: 0,
        }
    }

    pub fn sign_in_redirect(&self) -> Duration {
        Duration::from_millis(self.sign_in_redirect_ms)
    }

    pub fn sign_up_redirect(&self) -> Duration {
        Duration::from_millis(self.sign_up_redirect_ms)
    }
}

impl AppConfig {
    /// The configuration shipped inside the binary.
    pub fn embedded() -> Result<Self, ConfigError> {
        let file = EmbeddedConfig::get(DEFAULT_CONFIG_FILE)
            .ok_or(ConfigError::MissingEmbedded(DEFAULT_CONFIG_FILE))?;
        Self::from_toml_str(std::str::from_utf8(&file.data)?)
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_defaults() {
        let config = AppConfig::embedded().expect("embedded config parses");
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.navigation.sign_in_redirect(),
            Duration::from_millis(1600)
        );
    }

    #[test]
    fn partial_config_keeps_remaining_defaults() {
        let config = AppConfig::from_toml_str("[navigation]\nsign_up_redirect_ms = 50\n")
            .expect("partial config parses");
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.navigation.sign_in_redirect_ms, 1600);
        assert_eq!(config.navigation.sign_up_redirect_ms, 50);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = AppConfig::from_toml_str("theme = \"dark\"\n").expect_err("unknown key");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = AppConfig::from_path("/nonexistent/staffgate.toml").expect_err("missing");
        assert!(error.to_string().contains("/nonexistent/staffgate.toml"));
    }
}
