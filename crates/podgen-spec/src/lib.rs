//! Podgen manifest model
//!
//! Podspec manifest tree, Apple platforms and architectures, and the
//! platform-conditional attribute algebra ([`AttrSet`]) the generator is
//! built on.

pub mod attr_set;
pub mod platform;
pub mod spec;

pub use attr_set::{AttrSet, Monoid, MultiPlatform};
pub use platform::{Arch, Platform};
pub use spec::PodSpec;

use std::path::PathBuf;

/// Manifest loading errors
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("Failed to read podspec at {path}: {error}")]
    ReadError {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to parse podspec: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Podspec is missing a name")]
    MissingName,
}

impl SpecError {
    /// Create a read error with path context
    pub fn read(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            error,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
