//! Matching file patterns against the disk

use std::collections::HashMap;
use tracing::debug;

/// Expands one file pattern into the paths it matches.
///
/// Implementations are synchronous and return absolute paths, or nothing
/// when the pattern matches no file. Result order is whatever the
/// implementation produces; callers that keep "first match" semantics rely
/// on it as-is.
pub trait PatternMatcher: Send + Sync {
    fn match_pattern(&self, pattern: &str) -> Vec<String>;
}

/// Matcher backed by the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskMatcher;

impl PatternMatcher for DiskMatcher {
    fn match_pattern(&self, pattern: &str) -> Vec<String> {
        match glob::glob(pattern) {
            Ok(paths) => paths
                .filter_map(|entry| entry.ok())
                .map(|path| path.to_string_lossy().into_owned())
                .collect(),
            Err(e) => {
                debug!("Invalid pattern '{}': {}", pattern, e);
                Vec::new()
            }
        }
    }
}

/// Matcher answering from a fixed table, for dry runs and tests
#[derive(Debug, Clone, Default)]
pub struct FixedMatcher {
    matches: HashMap<String, Vec<String>>,
}

impl FixedMatcher {
    /// Create a matcher that matches nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the paths a pattern expands to, in discovery order
    pub fn with_match(mut self, pattern: impl Into<String>, paths: &[&str]) -> Self {
        self.matches
            .insert(pattern.into(), paths.iter().map(|p| p.to_string()).collect());
        self
    }
}

impl PatternMatcher for FixedMatcher {
    fn match_pattern(&self, pattern: &str) -> Vec<String> {
        self.matches.get(pattern).cloned().unwrap_or_default()
    }
}
