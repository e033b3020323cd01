#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Evon Configuration
//!
//! Settings for a generator run:
//! - handler and event naming suffixes
//! - output file name and show-only mode
//! - build tags passed through to the program loader
//! - log level
//!
//! Configuration is stored in TOML. Every section and key is optional; missing
//! values take their defaults.

use std::path::{Path, PathBuf};

use logging::Level;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up next to the package being generated for.
pub const DIR_CONFIG_FILE: &str = "evon.toml";

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
    /// A value is present but unusable
    #[error("Invalid config value for `{key}`: {reason}")]
    Invalid {
        /// Dotted key of the offending value
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Handler and event naming
    pub naming: NamingConfig,
    /// Output settings
    pub output: OutputConfig,
    /// Program loader settings
    pub loader: LoaderConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Naming convention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Required suffix of annotated type names
    pub handler_suffix: String,
    /// Suffix of generated dispatcher type names
    pub event_suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self { Self { handler_suffix: "Handler".into(), event_suffix: "Event".into() } }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Generated file name, relative to the package directory
    pub file: String,
    /// Only report detected handler types
    pub show: bool,
}

impl Default for OutputConfig {
    fn default() -> Self { Self { file: "evon_gen.go".into(), show: false } }
}

/// Loader configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Build tags the program graph was loaded with
    pub tags: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, info, warn, off)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: Level::Warn.as_str().to_string() } }
}

impl LoggingConfig {
    /// The parsed log level.
    pub fn level(&self) -> Result<Level, ConfigError> {
        self.level
            .parse()
            .map_err(|reason| ConfigError::Invalid { key: "logging.level", reason })
    }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `<dir>/evon.toml` if it exists, defaults otherwise.
    pub fn load_for_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ConfigError> {
        let path = dir.as_ref().join(DIR_CONFIG_FILE);
        if path.is_file() {
            logging::info("config", &format!("using {}", path.display()));
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/evon/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("evon");
        Ok(config_dir.join("config.toml"))
    }

    /// Check values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.naming.handler_suffix.is_empty() {
            return Err(ConfigError::Invalid {
                key: "naming.handler_suffix",
                reason: "must not be empty".into(),
            });
        }
        let file = Path::new(&self.output.file);
        if self.output.file.is_empty() || file.file_name() != Some(file.as_os_str()) {
            return Err(ConfigError::Invalid {
                key: "output.file",
                reason: format!("`{}` is not a plain file name", self.output.file),
            });
        }
        self.logging.level()?;
        Ok(())
    }
}
