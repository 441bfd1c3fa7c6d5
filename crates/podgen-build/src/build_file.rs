//! BUILD file assembly
//!
//! Every platform is analyzed independently and in parallel. Its results are
//! patched in order, then turned into targets: info plists, the framework,
//! resource bundles with their plists, and framework imports sorted by name.
//! Platforms are concatenated in the order they were requested.

use crate::analyzer::{Analyzer, AnalyzerResults};
use crate::compiler::StarlarkCompiler;
use crate::error::{BuildError, BuildResult};
use crate::matcher::PatternMatcher;
use crate::options::BuildOptions;
use crate::patch::Patch;
use crate::starlark::StarlarkNode;
use crate::target_name::TargetName;
use crate::targets::{
    AppleFramework, BazelTarget, ConfigSetting, FrameworkImport, InfoPlist, ResourceBundle, Target,
};
use crate::transform::apply_user_options;
use podgen_spec::{Arch, PodSpec};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Generated BUILD file contents
#[derive(Debug, Clone, PartialEq)]
pub struct BuildFile {
    config_settings: Vec<ConfigSetting>,
    targets: Vec<Target>,
}

impl BuildFile {
    /// Generate targets for every requested platform
    pub fn generate(spec: &PodSpec, options: &BuildOptions, matcher: &dyn PatternMatcher) -> Self {
        Self::generate_with_patches(spec, options, matcher, &[])
    }

    /// Generate targets, patching each platform's results before
    /// construction
    pub fn generate_with_patches(
        spec: &PodSpec,
        options: &BuildOptions,
        matcher: &dyn PatternMatcher,
        patches: &[Box<dyn Patch>],
    ) -> Self {
        let subspecs = spec.selected_subspecs(&options.subspecs);
        info!(
            "Generating {} for {} platform(s), subspecs: [{}]",
            spec.name,
            options.platforms.len(),
            subspecs
                .iter()
                .map(|s| s.full_name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let per_platform: Vec<Vec<Target>> = options
            .platforms
            .par_iter()
            .map(|&platform| {
                let mut analyzer = Analyzer::new(platform, spec, &subspecs, options, matcher);
                for patch in patches {
                    analyzer.patch(patch.as_ref());
                }
                let target_name = TargetName::new(platform, options);
                platform_targets(&analyzer.into_results(), options, &target_name)
            })
            .collect();

        let mut targets: Vec<Target> = per_platform.into_iter().flatten().collect();
        apply_user_options(&mut targets, &options.user_options);

        let config_settings = config_settings(&targets);
        debug!(
            "Generated {} targets and {} config settings",
            targets.len(),
            config_settings.len()
        );

        Self {
            config_settings,
            targets,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn config_settings(&self) -> &[ConfigSetting] {
        &self.config_settings
    }

    /// Loads, config settings, then targets, separated by blank lines
    pub fn to_starlark(&self) -> StarlarkNode {
        let loads: BTreeSet<String> = self
            .targets
            .iter()
            .filter_map(|target| target.load_node())
            .chain(self.config_settings.iter().filter_map(|c| c.load_node()))
            .collect();

        let mut blocks = vec![StarlarkNode::Lines(
            loads.into_iter().map(StarlarkNode::Raw).collect(),
        )];
        blocks.extend(self.config_settings.iter().map(BazelTarget::to_starlark));
        blocks.extend(self.targets.iter().map(BazelTarget::to_starlark));

        let mut lines = Vec::with_capacity(blocks.len() * 2);
        for block in blocks.into_iter().filter(|block| !block.is_empty()) {
            if !lines.is_empty() {
                lines.push(StarlarkNode::Raw(String::new()));
            }
            lines.push(block);
        }
        StarlarkNode::Lines(lines)
    }

    /// Render the BUILD file text
    pub fn compile(&self) -> String {
        StarlarkCompiler::new().run(&self.to_starlark())
    }

    /// Render and write the BUILD file
    pub fn write_to(&self, path: &Path) -> BuildResult<()> {
        fs::write(path, self.compile()).map_err(|e| BuildError::io(path, e))?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

/// Targets of one platform, in output order
fn platform_targets(
    results: &AnalyzerResults,
    options: &BuildOptions,
    target_name: &TargetName,
) -> Vec<Target> {
    let pod_name = &results.base.name;

    let bundles: Vec<ResourceBundle> = results
        .resources
        .resource_bundles
        .iter()
        .map(|bundle| ResourceBundle::new(pod_name, bundle, target_name))
        .collect();

    let mut imports: Vec<FrameworkImport> = results
        .vendored_deps
        .frameworks
        .iter()
        .map(|framework| FrameworkImport::new(pod_name, framework, target_name))
        .collect();
    imports.sort_by(|a, b| a.name.cmp(&b.name));

    let conditional_deps: BTreeMap<String, Vec<Arch>> = imports
        .iter()
        .map(|import| (import.name.clone(), import.archs.clone()))
        .collect();
    let local_deps = bundles.iter().map(|bundle| format!(":{}", bundle.name)).collect();

    let mut framework = AppleFramework::new(results, options, target_name, local_deps, conditional_deps);

    let mut targets = Vec::new();
    if framework.needs_info_plist() {
        let plist = InfoPlist::for_framework(&framework, &results.base);
        framework.add_info_plist(plist.name.clone());
        targets.push(Target::from(plist));
    }
    targets.push(Target::from(framework));

    for mut bundle in bundles {
        let plist = InfoPlist::for_bundle(&bundle, &results.base);
        bundle.add_info_plist(plist.name.clone());
        targets.push(Target::from(bundle));
        targets.push(Target::from(plist));
    }
    targets.extend(imports.into_iter().map(Target::from));
    targets
}

/// `release` and `debug`, then one setting per architecture a framework
/// links conditionally on
fn config_settings(targets: &[Target]) -> Vec<ConfigSetting> {
    let archs: BTreeSet<Arch> = targets
        .iter()
        .filter_map(|target| match target {
            Target::AppleFramework(framework) => Some(framework),
            _ => None,
        })
        .flat_map(|framework| framework.conditional_deps.values().flatten().copied())
        .collect();

    let mut settings = vec![ConfigSetting::release(), ConfigSetting::debug()];
    settings.extend(archs.into_iter().map(ConfigSetting::arch));
    settings
}
