//! Podgen Configuration System
//!
//! Loads the `podgen.toml` project configuration and layers environment
//! overrides on top of it.
//!
//! # Configuration Hierarchy
//!
//! Later sources override earlier ones:
//! 1. Project config (`podgen.toml`, found by walking up from a directory)
//! 2. Environment variables (`PODGEN_*`)
//! 3. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use podgen_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("{:?}", config.platforms());
//! ```

pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "podgen.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use loader::{Config, ConfigLoader};
pub use project::{GenerateConfig, ProjectConfig};
