#[cfg(test)]
mod tests;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::chunking::{SectionMarkers, WindowConfig};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub ollama: OllamaConfig,
    pub window: WindowSettings,
    pub markers: MarkerSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            window: WindowSettings::default(),
            markers: MarkerSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub batch_size: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            model: "bge-m3:latest".to_string(),
            batch_size: 16,
        }
    }
}

/// Fixed-window chunking parameters as they appear in the config file.
/// Validation happens when they are turned into a [`WindowConfig`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WindowSettings {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            chunk_size: 350,
            overlap: 50,
        }
    }
}

impl WindowSettings {
    #[inline]
    pub fn to_window_config(&self) -> Result<WindowConfig, ConfigError> {
        WindowConfig::new(self.chunk_size, self.overlap)
    }
}

/// Section marker tokens. Localization lives here: English documents use
/// `Chapter`/`Article` prefixes with empty suffixes, Korean regulatory text
/// uses `제`/`장` and `제`/`조` pairs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarkerSettings {
    pub chapter_prefix: String,
    pub chapter_suffix: String,
    pub article_prefix: String,
    pub article_suffix: String,
    /// Provenance label for text that precedes any marker.
    pub fallback_label: String,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            chapter_prefix: "Chapter".to_string(),
            chapter_suffix: String::new(),
            article_prefix: "Article".to_string(),
            article_suffix: String::new(),
            fallback_label: "document".to_string(),
        }
    }
}

impl MarkerSettings {
    #[inline]
    pub fn to_markers(&self) -> Result<SectionMarkers, ConfigError> {
        SectionMarkers::from_tokens(
            &self.chapter_prefix,
            &self.chapter_suffix,
            &self.article_prefix,
            &self.article_suffix,
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid batch size: {0} (must be between 1 and 1000)")]
    InvalidBatchSize(u32),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid chunk size: {0} (must be positive)")]
    InvalidChunkSize(usize),
    #[error("Invalid overlap: {overlap} (must be smaller than chunk size {chunk_size})")]
    OverlapTooLarge { overlap: usize, chunk_size: usize },
    #[error("Invalid section marker pattern: {0}")]
    InvalidMarkerPattern(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Load `config.toml` from the given directory, falling back to defaults
    /// when no file exists yet.
    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join("config.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ollama.validate()?;
        self.window.to_window_config()?;
        self.markers.to_markers()?;
        Ok(())
    }
}

impl OllamaConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocol != "http" && self.protocol != "https" {
            return Err(ConfigError::InvalidProtocol(self.protocol.clone()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidModel(self.model.clone()));
        }

        if self.batch_size == 0 || self.batch_size > 1000 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }

        self.ollama_url()?;

        Ok(())
    }

    #[inline]
    pub fn ollama_url(&self) -> Result<Url, ConfigError> {
        let url_str = format!("{}://{}:{}", self.protocol, self.host, self.port);
        Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))
    }
}

/// Configuration directory for this tool, under the platform config root.
#[inline]
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("reg-rag"))
        .ok_or(ConfigError::DirectoryError)
}
