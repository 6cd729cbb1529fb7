//! Configuration for the phonomap tools.
//!
//! Settings resolve in three layers, later ones winning: the embedded
//! `defaults/phonomap.default.toml`, then a `phonomap.toml` (the working
//! directory copy if present, or the file named by `--config`), then the
//! `--symbol-sets`, `--converters` and `--json` flags.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use config::ConfigError as Error;

const DEFAULT_TOML: &str = include_str!("../defaults/phonomap.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct PhonomapConfig {
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

/// Where definition files are read from.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    pub symbol_sets: PathBuf,
    pub converters: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// A `tracing` filter directive such as `info` or `phonomap=debug`
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub json: bool,
}

/// Builds a [`PhonomapConfig`] one layer at a time, starting from the
/// embedded defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

fn toml_file(path: &Path, required: bool) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml).required(required)
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Layer a `phonomap.toml` named on the command line. Building fails if
    /// it doesn't exist.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self.builder.add_source(toml_file(path.as_ref(), true));
        self
    }

    /// Layer the `phonomap.toml` picked up from the working directory, when
    /// there is one.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self.builder.add_source(toml_file(path.as_ref(), false));
        self
    }

    /// Set one key from a command line flag, e.g. `paths.symbol_sets` for
    /// `--symbol-sets`. Overrides win over every file layer.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<PhonomapConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<PhonomapConfig, ConfigError> {
    Loader::new().build()
}
