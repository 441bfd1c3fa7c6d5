//! Generate command - podspec to BUILD file

use anyhow::{Context, Result};
use colored::Colorize;
use podgen_build::{parse_user_options, BuildFile, BuildOptions, DiskMatcher};
use podgen_config::{Config, ConfigLoader};
use podgen_spec::PodSpec;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Generate command arguments
#[derive(Default)]
pub struct GenerateArgs {
    /// Path to the JSON podspec
    pub podspec: PathBuf,
    /// Platforms from the command line, empty for the configured ones
    pub platforms: Vec<String>,
    /// Subspecs from the command line, empty for the configured ones
    pub subspecs: Vec<String>,
    pub deps_prefix: Option<String>,
    pub pod_root: Option<PathBuf>,
    /// Applied after the configured user options
    pub user_options: Vec<String>,
    pub link_dynamic: bool,
    pub verify_sources: bool,
    /// Output file, stdout when absent
    pub output: Option<PathBuf>,
    /// Directory podgen.toml is searched from
    pub project_dir: PathBuf,
}

/// Run the generate command
pub fn run(args: GenerateArgs) -> Result<()> {
    let spec = PodSpec::from_file(&args.podspec)
        .with_context(|| format!("Failed to load podspec {}", args.podspec.display()))?;

    let config = ConfigLoader::new()
        .load_from_directory(&args.project_dir)
        .context("Failed to load podgen.toml")?;
    if let Some(root) = config.project_root() {
        debug!("Using configuration from {}", root.display());
    }

    let options = build_options(&args, &config)?;
    let pod_root = std::fs::canonicalize(&options.pod_root)
        .with_context(|| format!("Invalid pod root {}", options.pod_root.display()))?;
    debug!("Resolving podspec paths under {}", pod_root.display());
    let options = options.with_pod_root(pod_root);
    let build_file = BuildFile::generate(&spec, &options, &DiskMatcher);

    match &args.output {
        Some(path) => {
            build_file
                .write_to(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{} {} ({} targets)",
                "Generated".green().bold(),
                path.display(),
                build_file.targets().len()
            );
        }
        None => print!("{}", build_file.compile()),
    }
    Ok(())
}

/// Merge flags over configuration: flags win, user options accumulate
fn build_options(args: &GenerateArgs, config: &Config) -> Result<BuildOptions> {
    let platforms = if args.platforms.is_empty() {
        config.platforms()
    } else {
        args.platforms.clone()
    };
    let subspecs = if args.subspecs.is_empty() {
        config.subspecs()
    } else {
        args.subspecs.clone()
    };
    let deps_prefix = args
        .deps_prefix
        .clone()
        .unwrap_or_else(|| config.deps_prefix().to_string());
    let pod_root = args
        .pod_root
        .clone()
        .unwrap_or_else(|| podspec_dir(&args.podspec));

    let user_options: Vec<String> = config
        .user_options()
        .iter()
        .chain(args.user_options.iter())
        .cloned()
        .collect();

    let options = BuildOptions::new()
        .with_platform_names(&platforms)
        .context("Invalid platform selection")?
        .with_subspecs(subspecs)
        .with_deps_prefix(deps_prefix)
        .with_pod_root(pod_root)
        .with_link_dynamic(args.link_dynamic || config.link_dynamic())
        .with_verify_sources(args.verify_sources || config.verify_sources())
        .with_user_options(parse_user_options(&user_options));
    Ok(options)
}

fn podspec_dir(podspec: &Path) -> PathBuf {
    match podspec.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podgen_build::Platform;

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        let generate = config.project.generate_mut();
        generate.platforms = Some(vec!["osx".to_string()]);
        generate.deps_prefix = Some("//Config".to_string());
        generate.user_options = vec!["Kit.testonly = true".to_string()];

        let args = GenerateArgs {
            podspec: PathBuf::from("pods/Kit/Kit.podspec.json"),
            platforms: vec!["ios".to_string(), "tvos".to_string()],
            user_options: vec!["Kit.link_dynamic = true".to_string()],
            ..Default::default()
        };
        let options = build_options(&args, &config).unwrap();

        assert_eq!(options.platforms, vec![Platform::Ios, Platform::Tvos]);
        assert_eq!(options.deps_prefix, "//Config");
        assert_eq!(options.pod_root, PathBuf::from("pods/Kit"));
        let keys: Vec<&str> = options.user_options.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["testonly", "link_dynamic"]);
    }

    #[test]
    fn test_config_used_without_flags() {
        let mut config = Config::default();
        config.project.generate_mut().subspecs = Some(vec!["Core".to_string()]);

        let args = GenerateArgs {
            podspec: PathBuf::from("Kit.podspec.json"),
            ..Default::default()
        };
        let options = build_options(&args, &config).unwrap();

        assert_eq!(options.platforms, vec![Platform::Ios]);
        assert_eq!(options.subspecs, vec!["Core"]);
        assert_eq!(options.deps_prefix, "//Pods");
        assert_eq!(options.pod_root, PathBuf::from("."));
    }

    #[test]
    fn test_unknown_platform_flag() {
        let args = GenerateArgs {
            platforms: vec!["android".to_string()],
            ..Default::default()
        };
        assert!(build_options(&args, &Config::default()).is_err());
    }
}
