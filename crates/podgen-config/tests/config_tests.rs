//! Configuration loading and precedence tests

use podgen_config::{ConfigError, ConfigLoader, ProjectConfig};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join("podgen.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}

// ============================================================================
// Config Loading Tests
// ============================================================================

#[test]
#[serial]
fn test_load_full_config() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[generate]
platforms = ["ios", "osx"]
subspecs = ["Core", "UI"]
deps_prefix = "//Vendor/Pods"
link_dynamic = true
verify_sources = true
user_options = [
    "Kit.sdk_frameworks += UIKit",
    "Kit.testonly = true",
]
"#,
    );

    let config = ConfigLoader::new().load_from_directory(temp_dir.path()).unwrap();

    assert!(config.is_project());
    assert_eq!(config.platforms(), vec!["ios", "osx"]);
    assert_eq!(config.subspecs(), vec!["Core", "UI"]);
    assert_eq!(config.deps_prefix(), "//Vendor/Pods");
    assert!(config.link_dynamic());
    assert!(config.verify_sources());
    assert_eq!(
        config.user_options(),
        &["Kit.sdk_frameworks += UIKit".to_string(), "Kit.testonly = true".to_string()]
    );
}

#[test]
#[serial]
fn test_load_with_empty_config() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "");

    let config = ConfigLoader::new().load_from_directory(temp_dir.path()).unwrap();

    // Empty config is valid, every field has a default
    assert!(config.is_project());
    assert_eq!(config.platforms(), vec!["ios"]);
    assert_eq!(config.deps_prefix(), "//Pods");
}

#[test]
#[serial]
fn test_nearest_config_wins() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[generate]\ndeps_prefix = \"//Outer\"\n");
    let inner = temp_dir.path().join("inner");
    fs::create_dir(&inner).unwrap();
    create_config_file(&inner, "[generate]\ndeps_prefix = \"//Inner\"\n");

    let config = ConfigLoader::new().load_from_directory(&inner).unwrap();
    assert_eq!(config.deps_prefix(), "//Inner");
}

#[test]
#[serial]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[generate]\nsubspecs = [\"Core\"]\n");

    let config = ConfigLoader::new().load_from_file(&path).unwrap();
    assert_eq!(config.subspecs(), vec!["Core"]);
    assert_eq!(config.project_root(), Some(temp_dir.path()));
}

// ============================================================================
// Error Tests
// ============================================================================

#[test]
fn test_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = ProjectConfig::load_from_file(&temp_dir.path().join("podgen.toml"));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_invalid_toml() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[generate\nplatforms = ");

    let result = ProjectConfig::load_from_file(&path);
    assert!(matches!(result, Err(ConfigError::TomlParseError { .. })));
}

#[test]
fn test_unknown_field() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[generate]\nlink_static = true\n");

    let error = ProjectConfig::load_from_file(&path).unwrap_err();
    assert!(error.to_string().contains("link_static"));
}

#[test]
fn test_unknown_platform() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[generate]\nplatforms = [\"ios\", \"linux\"]\n");

    let error = ProjectConfig::load_from_file(&path).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Invalid value for 'generate.platforms': unknown platform 'linux'"
    );
}

// ============================================================================
// Precedence Tests
// ============================================================================

#[test]
#[serial]
fn test_env_platforms_override_project() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[generate]\nplatforms = [\"ios\"]\n");

    env::set_var("PODGEN_PLATFORMS", "osx,watchos");
    let config = ConfigLoader::new().load_from_directory(temp_dir.path());
    env::remove_var("PODGEN_PLATFORMS");

    assert_eq!(config.unwrap().platforms(), vec!["osx", "watchos"]);
}

#[test]
#[serial]
fn test_env_link_dynamic_false_values() {
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[generate]\nlink_dynamic = true\n");

    env::set_var("PODGEN_LINK_DYNAMIC", "off");
    let config = ConfigLoader::new().load_from_directory(temp_dir.path());
    env::remove_var("PODGEN_LINK_DYNAMIC");

    assert!(!config.unwrap().link_dynamic());
}

#[test]
#[serial]
fn test_env_without_project_file() {
    let temp_dir = TempDir::new().unwrap();

    env::set_var("PODGEN_DEPS_PREFIX", "@pods//");
    let config = ConfigLoader::new().load_from_directory(temp_dir.path());
    env::remove_var("PODGEN_DEPS_PREFIX");

    let config = config.unwrap();
    assert!(!config.is_project());
    assert_eq!(config.deps_prefix(), "@pods//");
}
