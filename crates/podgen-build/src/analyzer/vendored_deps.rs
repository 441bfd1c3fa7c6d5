//! Vendored frameworks and static libraries

use super::sdk_deps::dedup;
use super::AnalyzerContext;
use podgen_spec::{Arch, Platform};
use tracing::debug;

const XCFRAMEWORK_EXTENSION: &str = ".xcframework";

/// A prebuilt framework shipped with the pod
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendoredFramework {
    /// Pod-relative path of the `.framework` or `.xcframework` directory
    pub path: String,
    /// Architectures the framework can be linked for on this platform
    pub archs: Vec<Arch>,
}

impl VendoredFramework {
    pub fn is_xcframework(&self) -> bool {
        self.path.ends_with(XCFRAMEWORK_EXTENSION)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VendoredDepsInfo {
    pub frameworks: Vec<VendoredFramework>,
    pub libraries: Vec<String>,
}

pub fn analyze(context: &AnalyzerContext<'_>) -> VendoredDepsInfo {
    let framework_paths = resolve(context, context.collect(|s| &s.vendored_frameworks));
    let libraries = resolve(context, context.collect(|s| &s.vendored_libraries));

    let frameworks = framework_paths
        .into_iter()
        .map(|path| {
            let archs = framework_archs(context, &path);
            VendoredFramework { path, archs }
        })
        .collect();

    VendoredDepsInfo {
        frameworks,
        libraries,
    }
}

/// Wildcard patterns are expanded on disk; literal paths are kept as written
fn resolve(context: &AnalyzerContext<'_>, patterns: Vec<String>) -> Vec<String> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if pattern.contains('*') {
            let mut matched = context.match_relative(&pattern);
            if matched.is_empty() {
                debug!("Vendored pattern '{}' matched nothing", pattern);
            }
            matched.sort();
            paths.extend(matched);
        } else {
            paths.push(pattern.trim_end_matches('/').to_string());
        }
    }
    dedup(paths)
}

/// Architectures of a framework on the analyzed platform.
///
/// An xcframework lists its slices as subdirectories named like
/// `ios-arm64_x86_64-simulator`; slices of other platforms are ignored. A
/// plain framework is assumed to cover every architecture of the platform.
fn framework_archs(context: &AnalyzerContext<'_>, path: &str) -> Vec<Arch> {
    let platform = context.platform;
    if !path.ends_with(XCFRAMEWORK_EXTENSION) {
        return platform.archs().to_vec();
    }

    let slices = context
        .matcher
        .match_pattern(&format!("{}/*", context.options.absolute_path(path)));
    let found: Vec<Arch> = slices
        .iter()
        .filter_map(|slice| {
            let identifier = slice.trim_end_matches('/').rsplit('/').next()?;
            Arch::parse_slice_identifier(identifier)
        })
        .filter(|(slice_platform, _)| *slice_platform == platform)
        .flat_map(|(_, archs)| archs)
        .collect();

    ordered_archs(platform, &found)
}

/// `archs` deduplicated, in the platform's declaration order
fn ordered_archs(platform: Platform, archs: &[Arch]) -> Vec<Arch> {
    platform
        .archs()
        .iter()
        .filter(|arch| archs.contains(arch))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::FixedMatcher;
    use crate::options::BuildOptions;
    use podgen_spec::PodSpec;

    const PODSPEC: &str = r#"{
        "name": "Kit",
        "vendored_frameworks": ["Vendor/*.xcframework", "Vendor/Legacy.framework"],
        "vendored_libraries": "Vendor/libkit.a"
    }"#;

    fn matcher() -> FixedMatcher {
        FixedMatcher::new()
            .with_match("/pod/Vendor/*.xcframework", &["/pod/Vendor/Bin.xcframework"])
            .with_match(
                "/pod/Vendor/Bin.xcframework/*",
                &[
                    "/pod/Vendor/Bin.xcframework/Info.plist",
                    "/pod/Vendor/Bin.xcframework/ios-arm64",
                    "/pod/Vendor/Bin.xcframework/ios-arm64_x86_64-simulator",
                    "/pod/Vendor/Bin.xcframework/ios-arm64_x86_64-maccatalyst",
                    "/pod/Vendor/Bin.xcframework/macos-arm64_x86_64",
                ],
            )
    }

    fn analyze_for(platform: Platform) -> VendoredDepsInfo {
        let spec = PodSpec::from_json_str(PODSPEC).unwrap();
        let options = BuildOptions::new().with_pod_root("/pod");
        let matcher = matcher();
        let context = AnalyzerContext {
            platform,
            spec: &spec,
            subspecs: &[],
            options: &options,
            matcher: &matcher,
        };
        analyze(&context)
    }

    #[test]
    fn test_xcframework_slices_give_platform_archs() {
        let info = analyze_for(Platform::Ios);
        assert_eq!(info.frameworks.len(), 2);
        assert_eq!(info.frameworks[0].path, "Vendor/Bin.xcframework");
        assert!(info.frameworks[0].is_xcframework());
        assert_eq!(
            info.frameworks[0].archs,
            vec![Arch::IosArm64, Arch::IosSimArm64, Arch::IosX86_64]
        );
        assert_eq!(info.libraries, vec!["Vendor/libkit.a"]);
    }

    #[test]
    fn test_plain_framework_covers_every_arch() {
        let info = analyze_for(Platform::Osx);
        assert_eq!(info.frameworks[0].archs, vec![Arch::DarwinArm64, Arch::DarwinX86_64]);
        assert_eq!(info.frameworks[1].path, "Vendor/Legacy.framework");
        assert!(!info.frameworks[1].is_xcframework());
        assert_eq!(info.frameworks[1].archs, Platform::Osx.archs().to_vec());
    }

    #[test]
    fn test_missing_slices_give_no_archs() {
        let info = analyze_for(Platform::Tvos);
        assert!(info.frameworks[0].archs.is_empty());
    }
}
