//! Project Configuration (podgen.toml)
//!
//! Project-level generation defaults stored in `podgen.toml`.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Platform names accepted in `generate.platforms`
pub const KNOWN_PLATFORMS: [&str; 5] = ["ios", "osx", "macos", "tvos", "watchos"];

/// Project configuration from podgen.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Generation settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate: Option<GenerateConfig>,
}

/// `[generate]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GenerateConfig {
    /// Platforms to generate targets for (default: ios)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,

    /// Subspecs to include (default: the default subspecs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subspecs: Option<Vec<String>>,

    /// Label prefix of other pods (default: "//Pods")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deps_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_dynamic: Option<bool>,

    /// Warn about source patterns that match nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_sources: Option<bool>,

    /// Target transforms, `<target>.<key> <op> <values>`
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub user_options: Vec<String>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let Some(generate) = &self.generate else {
            return Ok(());
        };

        if let Some(platforms) = &generate.platforms {
            if platforms.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "generate.platforms".to_string(),
                    reason: "at least one platform is required".to_string(),
                });
            }
            for platform in platforms {
                if !is_known_platform(platform) {
                    return Err(ConfigError::InvalidValue {
                        field: "generate.platforms".to_string(),
                        reason: format!("unknown platform '{}'", platform),
                    });
                }
            }
        }

        if generate.deps_prefix.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::InvalidValue {
                field: "generate.deps_prefix".to_string(),
                reason: "prefix cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// The `[generate]` section, or an empty one
    pub fn generate(&self) -> GenerateConfig {
        self.generate.clone().unwrap_or_default()
    }

    /// Mutable `[generate]` section, created on first use
    pub fn generate_mut(&mut self) -> &mut GenerateConfig {
        self.generate.get_or_insert_with(GenerateConfig::default)
    }
}

fn is_known_platform(name: &str) -> bool {
    KNOWN_PLATFORMS.contains(&name.to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_minimal_project_config() {
        let config: ProjectConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.generate(), GenerateConfig::default());
    }

    #[test]
    fn test_parse_full_project_config() {
        let toml = r#"
[generate]
platforms = ["ios", "macos"]
subspecs = ["Core"]
deps_prefix = "//Vendor"
link_dynamic = true
verify_sources = false
user_options = ["Kit.sdk_frameworks += UIKit"]
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        let generate = config.generate();
        assert_eq!(generate.platforms, Some(vec!["ios".to_string(), "macos".to_string()]));
        assert_eq!(generate.deps_prefix.as_deref(), Some("//Vendor"));
        assert_eq!(generate.link_dynamic, Some(true));
        assert_eq!(generate.user_options, vec!["Kit.sdk_frameworks += UIKit"]);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(toml::from_str::<ProjectConfig>("[generate]\nplatform = [\"ios\"]\n").is_err());
        assert!(toml::from_str::<ProjectConfig>("[package]\nname = \"x\"\n").is_err());
    }

    #[rstest]
    #[case("[generate]\nplatforms = []\n")]
    #[case("[generate]\nplatforms = [\"android\"]\n")]
    #[case("[generate]\ndeps_prefix = \"\"\n")]
    fn test_invalid_values(#[case] toml: &str) {
        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_generate_mut_creates_section() {
        let mut config = ProjectConfig::default();
        config.generate_mut().link_dynamic = Some(true);
        assert_eq!(config.generate().link_dynamic, Some(true));
    }
}
