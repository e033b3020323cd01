#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Collection of utilities for the `evon` command.

use std::path::Path;

use config::{Config, ConfigError};
use logging::Level;
use pipeline::PipelineError;
use thiserror::Error;

/// Errors that end an `evon` run before or during the pipeline.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The pipeline failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Required suffix of handler type names
    pub handler_suffix: Option<String>,
    /// Suffix of generated type names
    pub event_suffix: Option<String>,
    /// Output file name
    pub out: Option<String>,
    /// Loader build tags
    pub tags: Option<Vec<String>>,
    /// Show-only mode
    pub show: bool,
}

impl Overrides {
    /// Apply the overrides to `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(suffix) = &self.handler_suffix {
            config.naming.handler_suffix = suffix.clone();
        }
        if let Some(suffix) = &self.event_suffix {
            config.naming.event_suffix = suffix.clone();
        }
        if let Some(out) = &self.out {
            config.output.file = out.clone();
        }
        if let Some(tags) = &self.tags {
            config.loader.tags = tags.clone();
        }
        config.output.show |= self.show;
    }
}

/// Load the configuration: the explicit file if given, else `<dir>/evon.toml`,
/// else defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<Config> {
    let config = match explicit {
        Some(path) => Config::from_file(path)?,
        None => Config::load_for_dir(dir)?,
    };
    Ok(config)
}

/// The effective log level: each `-v` is one step more verbose than the
/// configured level.
pub fn log_level(config: &Config, verbose: u8) -> Result<Level> {
    let configured = config.logging.level()?;
    Ok(match (configured, verbose) {
        (level, 0) => level,
        (Level::Trace, _) | (Level::Info, _) | (_, 2..) => Level::Trace,
        (Level::Warn, 1) | (Level::Off, 1) => Level::Info,
    })
}
