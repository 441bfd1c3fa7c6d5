//! Configuration Loader
//!
//! Handles loading configuration and applying environment overrides.

use crate::project::ProjectConfig;
use crate::{ConfigResult, CONFIG_FILE_NAME};
use std::env;
use std::path::{Path, PathBuf};

/// Default platform when none is configured
pub const DEFAULT_PLATFORM: &str = "ios";

/// Default label prefix of other pods
pub const DEFAULT_DEPS_PREFIX: &str = "//Pods";

/// Configuration loader
///
/// Loads configuration with the following precedence:
/// 1. Project config (podgen.toml) - lowest priority
/// 2. Environment variables (PODGEN_*) - overrides project
/// 3. CLI flags - highest priority (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader;

/// Loaded configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Project configuration, environment overrides applied
    pub project: ProjectConfig,

    /// Project root directory (where podgen.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find podgen.toml. Without one, the
    /// defaults are used.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        let project_config = self.apply_env_overrides(project_config)?;

        Ok(Config {
            project: project_config,
            project_root,
        })
    }

    /// Load configuration from a specific config file
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let project_config = self.apply_env_overrides(project_config)?;

        Ok(Config {
            project: project_config,
            project_root: config_path.parent().map(|p| p.to_path_buf()),
        })
    }

    /// Find project configuration by walking up directory tree
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.exists() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Apply environment variable overrides to project config
    ///
    /// - PODGEN_PLATFORMS: comma separated platform names
    /// - PODGEN_DEPS_PREFIX: label prefix of other pods
    /// - PODGEN_LINK_DYNAMIC: true/1/yes links frameworks dynamically
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(platforms) = env::var("PODGEN_PLATFORMS") {
            let platforms: Vec<String> = platforms
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            config.generate_mut().platforms = Some(platforms);
        }

        if let Ok(prefix) = env::var("PODGEN_DEPS_PREFIX") {
            config.generate_mut().deps_prefix = Some(prefix);
        }

        if let Ok(link_dynamic) = env::var("PODGEN_LINK_DYNAMIC") {
            let link_dynamic = matches!(link_dynamic.to_lowercase().as_str(), "true" | "1" | "yes");
            config.generate_mut().link_dynamic = Some(link_dynamic);
        }

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Platforms to generate for
    pub fn platforms(&self) -> Vec<String> {
        self.project
            .generate
            .as_ref()
            .and_then(|g| g.platforms.clone())
            .unwrap_or_else(|| vec![DEFAULT_PLATFORM.to_string()])
    }

    /// Explicitly selected subspecs, empty for the defaults
    pub fn subspecs(&self) -> Vec<String> {
        self.project
            .generate
            .as_ref()
            .and_then(|g| g.subspecs.clone())
            .unwrap_or_default()
    }

    pub fn deps_prefix(&self) -> &str {
        self.project
            .generate
            .as_ref()
            .and_then(|g| g.deps_prefix.as_deref())
            .unwrap_or(DEFAULT_DEPS_PREFIX)
    }

    pub fn link_dynamic(&self) -> bool {
        self.project
            .generate
            .as_ref()
            .and_then(|g| g.link_dynamic)
            .unwrap_or(false)
    }

    pub fn verify_sources(&self) -> bool {
        self.project
            .generate
            .as_ref()
            .and_then(|g| g.verify_sources)
            .unwrap_or(false)
    }

    /// Raw user option lines
    pub fn user_options(&self) -> &[String] {
        self.project
            .generate
            .as_ref()
            .map(|g| g.user_options.as_slice())
            .unwrap_or_default()
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a podgen.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}
