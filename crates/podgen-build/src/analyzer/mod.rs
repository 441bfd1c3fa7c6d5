//! Per-platform podspec analysis
//!
//! An [`Analyzer`] runs every attribute analyzer once for one platform. Each
//! reads its attribute from the root spec, combines it with the selected
//! subspecs, restricts it to the platform and normalizes it into a result
//! record. The records are only changed afterwards through [`Patch`]es.

pub mod base;
pub mod build_settings;
pub mod pod_deps;
pub mod resources;
pub mod sdk_deps;
pub mod sources;
pub mod vendored_deps;

pub use base::BaseInfo;
pub use build_settings::BuildSettingsInfo;
pub use pod_deps::PodDepsInfo;
pub use resources::{BundleInfo, ResourcesInfo};
pub use sdk_deps::SdkDepsInfo;
pub use sources::SourcesInfo;
pub use vendored_deps::{VendoredDepsInfo, VendoredFramework};

use crate::matcher::PatternMatcher;
use crate::options::BuildOptions;
use crate::patch::Patch;
use podgen_spec::{AttrSet, Monoid, Platform, PodSpec};
use tracing::debug;

/// Everything the target constructors read for one platform
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerResults {
    pub base: BaseInfo,
    pub sources: SourcesInfo,
    pub resources: ResourcesInfo,
    pub sdk_deps: SdkDepsInfo,
    pub vendored_deps: VendoredDepsInfo,
    pub pod_deps: PodDepsInfo,
    pub build_settings: BuildSettingsInfo,
}

/// Read-only inputs shared by the attribute analyzers
#[derive(Clone, Copy)]
pub struct AnalyzerContext<'a> {
    pub platform: Platform,
    pub spec: &'a PodSpec,
    pub subspecs: &'a [&'a PodSpec],
    pub options: &'a BuildOptions,
    pub matcher: &'a dyn PatternMatcher,
}

impl<'a> AnalyzerContext<'a> {
    /// Attribute of the root spec combined with every selected subspec, on
    /// this platform
    pub fn collect<T>(&self, attribute: impl Fn(&PodSpec) -> &AttrSet<T>) -> T
    where
        T: Clone + Default + Monoid,
    {
        self.spec
            .collect_attribute(self.subspecs, attribute)
            .platform(self.platform)
            .unwrap_or_default()
    }

    /// The root spec followed by every selected subspec
    pub fn units(&self) -> impl Iterator<Item = &'a PodSpec> + 'a {
        std::iter::once(self.spec).chain(self.subspecs.iter().copied())
    }

    /// Match a pod-relative pattern on disk, returning pod-relative paths
    pub fn match_relative(&self, pattern: &str) -> Vec<String> {
        self.matcher
            .match_pattern(&self.options.absolute_path(pattern))
            .iter()
            .map(|path| self.options.relative_path(path))
            .filter(|path| !path.is_empty())
            .collect()
    }
}

/// Analysis of one podspec for one platform
pub struct Analyzer {
    platform: Platform,
    results: AnalyzerResults,
}

impl Analyzer {
    /// Run every attribute analyzer for `platform`
    pub fn new(
        platform: Platform,
        spec: &PodSpec,
        subspecs: &[&PodSpec],
        options: &BuildOptions,
        matcher: &dyn PatternMatcher,
    ) -> Self {
        let context = AnalyzerContext {
            platform,
            spec,
            subspecs,
            options,
            matcher,
        };
        debug!(
            "Analyzing {} for {} with {} subspecs",
            spec.name,
            platform,
            subspecs.len()
        );

        let results = AnalyzerResults {
            base: base::analyze(&context),
            sources: sources::analyze(&context),
            resources: resources::analyze(&context),
            sdk_deps: sdk_deps::analyze(&context),
            vendored_deps: vendored_deps::analyze(&context),
            pod_deps: pod_deps::analyze(&context),
            build_settings: build_settings::analyze(&context),
        };

        Self { platform, results }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Apply a patch to the result records
    pub fn patch(&mut self, patch: &dyn Patch) {
        patch.apply(&mut self.results);
    }

    pub fn results(&self) -> &AnalyzerResults {
        &self.results
    }

    pub fn into_results(self) -> AnalyzerResults {
        self.results
    }
}
