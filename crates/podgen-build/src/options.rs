//! Generation options

use crate::error::{BuildError, BuildResult};
use crate::transform::UserOption;
use podgen_spec::Platform;
use std::path::{Component, Path, PathBuf};

/// Label prefix under which sibling pods are generated
pub const DEFAULT_DEPS_PREFIX: &str = "//Pods";

/// Immutable configuration for one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    /// Platforms to generate targets for, in output order
    pub platforms: Vec<Platform>,
    /// Explicitly requested subspecs; empty means the podspec defaults
    pub subspecs: Vec<String>,
    /// Directory the podspec's file patterns are relative to
    pub pod_root: PathBuf,
    /// Prefix of dependency labels
    pub deps_prefix: String,
    /// Build frameworks as dynamic unless the podspec says otherwise
    pub link_dynamic: bool,
    /// Resolve source globs on disk and warn when they match nothing
    pub verify_sources: bool,
    /// Target transforms applied after construction
    pub user_options: Vec<UserOption>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            platforms: vec![Platform::Ios],
            subspecs: Vec::new(),
            pod_root: PathBuf::from("."),
            deps_prefix: DEFAULT_DEPS_PREFIX.to_string(),
            link_dynamic: false,
            verify_sources: false,
            user_options: Vec::new(),
        }
    }
}

impl BuildOptions {
    /// Create options with the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set platforms
    pub fn with_platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = platforms;
        self
    }

    /// Set platforms from their names (`ios`, `osx`/`macos`, `tvos`, `watchos`)
    pub fn with_platform_names<S: AsRef<str>>(mut self, names: &[S]) -> BuildResult<Self> {
        let mut platforms = Vec::new();
        for name in names {
            let platform: Platform = name
                .as_ref()
                .parse()
                .map_err(|_| BuildError::UnknownPlatform(name.as_ref().to_string()))?;
            if !platforms.contains(&platform) {
                platforms.push(platform);
            }
        }
        if platforms.is_empty() {
            return Err(BuildError::NoPlatforms);
        }
        self.platforms = platforms;
        Ok(self)
    }

    /// Set requested subspecs
    pub fn with_subspecs(mut self, subspecs: Vec<String>) -> Self {
        self.subspecs = subspecs;
        self
    }

    /// Set pod root
    pub fn with_pod_root(mut self, pod_root: impl Into<PathBuf>) -> Self {
        self.pod_root = pod_root.into();
        self
    }

    /// Set dependency label prefix
    pub fn with_deps_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.deps_prefix = prefix.into();
        self
    }

    /// Set default linkage
    pub fn with_link_dynamic(mut self, link_dynamic: bool) -> Self {
        self.link_dynamic = link_dynamic;
        self
    }

    /// Enable disk verification of source globs
    pub fn with_verify_sources(mut self, verify: bool) -> Self {
        self.verify_sources = verify;
        self
    }

    /// Set user transforms
    pub fn with_user_options(mut self, user_options: Vec<UserOption>) -> Self {
        self.user_options = user_options;
        self
    }

    /// Whether target names carry a platform suffix
    pub fn is_multi_platform(&self) -> bool {
        self.platforms.len() > 1
    }

    /// Absolute form of a pattern relative to the pod root
    pub fn absolute_path(&self, pattern: &str) -> String {
        self.pod_root.join(pattern).to_string_lossy().into_owned()
    }

    /// Path relative to the pod root, or an empty string when `path` lies
    /// outside of it. `.` components are ignored on both sides, so a root of
    /// `.` accepts the relative paths the matcher returns for it.
    pub fn relative_path(&self, path: &str) -> String {
        without_cur_dir(Path::new(path))
            .strip_prefix(without_cur_dir(&self.pod_root))
            .map(|relative| relative.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}
