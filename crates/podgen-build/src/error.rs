/// BUILD generation error types
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("No platform selected for generation")]
    NoPlatforms,

    #[error("Podspec error: {0}")]
    Spec(#[from] podgen_spec::SpecError),

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl BuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }
}
