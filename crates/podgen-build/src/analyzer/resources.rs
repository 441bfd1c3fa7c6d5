//! Resources, precompiled bundles and resource bundles

use super::AnalyzerContext;
use crate::glob::{expand_pattern, Glob};
use crate::starlark::{StarlarkNode, ToStarlark};
use std::collections::HashMap;
use tracing::debug;

const BUNDLE_EXTENSION: &str = ".bundle";

/// Directory-like resource containers matched as a whole
const CONTAINER_EXTENSIONS: [&str; 2] = [".xcassets", ".xcdatamodeld"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleInfo {
    pub name: String,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourcesInfo {
    /// Resource patterns, rewritten for Bazel globs
    pub resources: Vec<String>,
    /// Prebuilt `.bundle` directories found on disk, pod-relative
    pub precompiled_bundles: Vec<String>,
    /// Named resource bundles, sorted by name
    pub resource_bundles: Vec<BundleInfo>,
}

impl ResourcesInfo {
    /// Resources and precompiled bundles as one `data` value
    pub fn pack_data(&self) -> StarlarkNode {
        pack_resources(&self.resources, &self.precompiled_bundles)
    }
}

/// `glob([...]) + [...]`: wildcard patterns are globbed, plain paths and
/// `extra` are listed as they are
pub fn pack_resources(patterns: &[String], extra: &[String]) -> StarlarkNode {
    let (globbed, plain): (Vec<String>, Vec<String>) =
        patterns.iter().cloned().partition(|p| p.contains('*'));
    let plain: Vec<String> = plain.into_iter().chain(extra.iter().cloned()).collect();

    StarlarkNode::concat(
        Glob::from_patterns(globbed, Vec::new()).to_starlark(),
        plain.to_starlark(),
    )
}

pub fn analyze(context: &AnalyzerContext<'_>) -> ResourcesInfo {
    let patterns = context.collect(|s| &s.resources);
    let resources = rewrite_patterns(&patterns);
    let precompiled_bundles = find_bundles(context, &patterns);

    let mut resource_bundles: Vec<BundleInfo> = context
        .collect(|s| &s.resource_bundles)
        .into_iter()
        .map(|(name, patterns)| BundleInfo {
            name,
            resources: rewrite_patterns(&patterns),
        })
        .collect();
    resource_bundles.sort_by(|a, b| a.name.cmp(&b.name));

    ResourcesInfo {
        resources,
        precompiled_bundles,
        resource_bundles,
    }
}

/// Rewrite resource patterns for Bazel; `.bundle` patterns are left out.
///
/// Containers become recursive globs and a terminal `*` matches recursively.
/// Rewriting a rewritten pattern changes nothing.
pub fn rewrite_patterns(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .filter(|pattern| !pattern.ends_with(BUNDLE_EXTENSION))
        .flat_map(|pattern| {
            let mut expanded: Vec<String> = expand_pattern(pattern, &[])
                .iter()
                .map(|p| rewrite_pattern(p))
                .collect();
            expanded.sort();
            expanded
        })
        .collect()
}

fn rewrite_pattern(pattern: &str) -> String {
    let (parent, last) = match pattern.rsplit_once('/') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, pattern),
    };

    let last = if CONTAINER_EXTENSIONS.iter().any(|ext| last.ends_with(ext)) {
        format!("{}/**", last)
    } else if last.is_empty() || last == "*" {
        "**".to_string()
    } else {
        last.to_string()
    };

    match parent {
        Some(parent) => format!("{}/{}", parent, last),
        None => last,
    }
}

/// Resolve `.bundle` patterns on disk, keeping the first match per bundle
/// name, in matcher order
fn find_bundles(context: &AnalyzerContext<'_>, patterns: &[String]) -> Vec<String> {
    let mut by_name: HashMap<String, String> = HashMap::new();
    for pattern in patterns.iter().filter(|p| p.ends_with(BUNDLE_EXTENSION)) {
        for path in context.match_relative(pattern) {
            let name = path.rsplit('/').next().unwrap_or(&path).to_string();
            if by_name.contains_key(&name) {
                debug!("duplicate bundle {}. Will use first matched.", name);
            } else {
                by_name.insert(name, path);
            }
        }
    }
    let mut bundles: Vec<String> = by_name.into_values().collect();
    bundles.sort();
    bundles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::StarlarkCompiler;
    use crate::matcher::FixedMatcher;
    use crate::options::BuildOptions;
    use podgen_spec::{Platform, PodSpec};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case("Assets.xcassets", "Assets.xcassets/**")]
    #[case("Res/Model.xcdatamodeld", "Res/Model.xcdatamodeld/**")]
    #[case("Res/*", "Res/**")]
    #[case("Res/", "Res/**")]
    #[case("Res/icon.png", "Res/icon.png")]
    #[case("Res/**", "Res/**")]
    fn test_rewrite_pattern(#[case] pattern: &str, #[case] expected: &str) {
        assert_eq!(rewrite_pattern(pattern), expected);
        assert_eq!(rewrite_pattern(expected), expected);
    }

    #[test]
    fn test_rewrite_patterns_expands_braces_and_skips_bundles() {
        let patterns = strings(&["Res/*.{png,jpg}", "Res/Foo.bundle", "Images.xcassets"]);
        assert_eq!(
            rewrite_patterns(&patterns),
            strings(&["Res/*.jpg", "Res/*.png", "Images.xcassets/**"])
        );
    }

    #[test]
    fn test_duplicate_bundles_keep_first_match() {
        let spec = PodSpec::from_json_str(
            r#"{ "name": "Kit", "resources": ["**/*.bundle", "Assets/*"] }"#,
        )
        .unwrap();
        let options = BuildOptions::new().with_pod_root("/pod");
        let matcher = FixedMatcher::new().with_match(
            "/pod/**/*.bundle",
            &["/pod/b/Foo.bundle", "/pod/a/Foo.bundle", "/pod/a/Bar.bundle", "/outside/Baz.bundle"],
        );
        let context = AnalyzerContext {
            platform: Platform::Ios,
            spec: &spec,
            subspecs: &[],
            options: &options,
            matcher: &matcher,
        };

        let info = analyze(&context);
        assert_eq!(info.precompiled_bundles, strings(&["a/Bar.bundle", "b/Foo.bundle"]));
        assert_eq!(info.resources, strings(&["Assets/**"]));
    }

    #[test]
    fn test_resource_bundles_sorted_by_name() {
        let spec = PodSpec::from_json_str(
            r#"{ "name": "Kit", "resource_bundles": { "Zeta": "Z/*", "Alpha": ["A/Images.xcassets"] } }"#,
        )
        .unwrap();
        let options = BuildOptions::new();
        let matcher = FixedMatcher::new();
        let context = AnalyzerContext {
            platform: Platform::Ios,
            spec: &spec,
            subspecs: &[],
            options: &options,
            matcher: &matcher,
        };

        let info = analyze(&context);
        assert_eq!(
            info.resource_bundles,
            vec![
                BundleInfo {
                    name: "Alpha".to_string(),
                    resources: strings(&["A/Images.xcassets/**"]),
                },
                BundleInfo {
                    name: "Zeta".to_string(),
                    resources: strings(&["Z/**"]),
                },
            ]
        );
    }

    #[test]
    fn test_pack_data() {
        let info = ResourcesInfo {
            resources: strings(&["Res/**", "Res/Config.plist"]),
            precompiled_bundles: strings(&["Prebuilt.bundle"]),
            resource_bundles: Vec::new(),
        };
        assert_eq!(
            StarlarkCompiler::new().compile(&info.pack_data(), 0),
            "glob(\n    [\n        \"Res/**\",\n    ],\n) + [\n    \"Res/Config.plist\",\n    \"Prebuilt.bundle\",\n]"
        );
        assert_eq!(ResourcesInfo::default().pack_data(), StarlarkNode::Empty);
    }
}
