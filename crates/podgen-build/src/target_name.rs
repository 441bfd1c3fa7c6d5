//! Target naming and dependency labels

use crate::options::BuildOptions;
use podgen_spec::Platform;

/// Names targets for one platform pipeline.
///
/// When several platforms are generated into the same BUILD file every
/// target name carries the platform suffix (`Foo_iOS`, `Foo_macOS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetName {
    platform: Platform,
    suffixed: bool,
}

impl TargetName {
    pub fn new(platform: Platform, options: &BuildOptions) -> Self {
        Self {
            platform,
            suffixed: options.is_multi_platform(),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Target name for `base`, suffixed when needed
    pub fn apply(&self, base: &str) -> String {
        let base = bazel_label(base);
        if self.suffixed {
            format!("{}_{}", base, self.platform.target_suffix())
        } else {
            base
        }
    }

    /// Primary framework target of a pod
    pub fn framework(&self, pod_name: &str) -> String {
        self.apply(pod_name)
    }

    /// Resource bundle target of a pod
    pub fn resource_bundle(&self, pod_name: &str, bundle_name: &str) -> String {
        self.apply(&format!("{}_{}_Bundle", pod_name, bundle_name))
    }

    /// Import target of a vendored framework, named after its file stem
    pub fn framework_import(&self, pod_name: &str, path: &str) -> String {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let stem = file_name.split('.').next().unwrap_or(file_name);
        self.apply(&format!("{}_{}_VendoredFramework", pod_name, stem))
    }

    /// Plist target owned by another target
    pub fn info_plist(owner: &str) -> String {
        format!("{}_InfoPlist", owner)
    }

    /// Whether `name` was produced by [`TargetName::apply`] from `base` for
    /// any platform
    pub fn matches(name: &str, base: &str) -> bool {
        name == base
            || Platform::ALL.iter().any(|p| {
                name.strip_suffix(p.target_suffix())
                    .and_then(|rest| rest.strip_suffix('_'))
                    == Some(base)
            })
    }

    /// Label of a podspec dependency.
    ///
    /// A subspec of the pod itself (`Foo/Core` inside `Foo`) maps to a
    /// same-package label that is dropped unless it carries the configured
    /// prefix, since the subspec is compiled into this pod's own framework.
    /// Any other pod, including a subspec of it, maps to that pod's package.
    pub fn dependency_label(&self, dependency: &str, pod_name: &str, options: &BuildOptions) -> Option<String> {
        let (root, rest) = match dependency.split_once('/') {
            Some((root, rest)) => (root, Some(rest)),
            None => (dependency, None),
        };

        if root == pod_name {
            let label = match rest {
                Some(rest) => format!(":{}_{}", pod_name, rest.replace('/', "_")),
                None => format!(":{}", pod_name),
            };
            return label.starts_with(&options.deps_prefix).then_some(label);
        }

        let root = bazel_label(root);
        let label = if self.suffixed {
            format!(
                "{}/{}:{}_{}",
                options.deps_prefix,
                root,
                root,
                self.platform.target_suffix()
            )
        } else {
            format!("{}/{}", options.deps_prefix, root)
        };
        Some(label)
    }
}

/// Replace characters Bazel does not accept in target names
pub fn bazel_label(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn single() -> (TargetName, BuildOptions) {
        let options = BuildOptions::new();
        (TargetName::new(Platform::Ios, &options), options)
    }

    fn multi() -> (TargetName, BuildOptions) {
        let options = BuildOptions::new().with_platforms(vec![Platform::Ios, Platform::Osx]);
        (TargetName::new(Platform::Osx, &options), options)
    }

    #[test]
    fn test_names() {
        let (name, _) = single();
        assert_eq!(name.framework("Kit"), "Kit");
        assert_eq!(name.resource_bundle("Kit", "Assets"), "Kit_Assets_Bundle");
        assert_eq!(
            name.framework_import("Kit", "Vendor/Bin.xcframework"),
            "Kit_Bin_VendoredFramework"
        );
        assert_eq!(TargetName::info_plist("Kit"), "Kit_InfoPlist");

        let (name, _) = multi();
        assert_eq!(name.framework("Kit"), "Kit_macOS");
    }

    #[test]
    fn test_matches() {
        assert!(TargetName::matches("Kit", "Kit"));
        assert!(TargetName::matches("Kit_iOS", "Kit"));
        assert!(!TargetName::matches("Kit_Assets_Bundle", "Kit"));
    }

    #[rstest]
    #[case("SnapKit", Some("//Pods/SnapKit"))]
    #[case("Firebase/Core", Some("//Pods/Firebase"))]
    #[case("Kit/Core", None)]
    #[case("Kit", None)]
    fn test_dependency_label(#[case] dependency: &str, #[case] expected: Option<&str>) {
        let (name, options) = single();
        assert_eq!(
            name.dependency_label(dependency, "Kit", &options).as_deref(),
            expected
        );
    }

    #[test]
    fn test_dependency_label_with_platform_suffix() {
        let (name, options) = multi();
        assert_eq!(
            name.dependency_label("SnapKit", "Kit", &options).as_deref(),
            Some("//Pods/SnapKit:SnapKit_macOS")
        );
    }

    #[test]
    fn test_same_package_prefix_keeps_subspec_label() {
        let options = BuildOptions::new().with_deps_prefix(":");
        let name = TargetName::new(Platform::Ios, &options);
        assert_eq!(
            name.dependency_label("Kit/Core/Sub", "Kit", &options).as_deref(),
            Some(":Kit_Core_Sub")
        );
    }

    #[test]
    fn test_bazel_label() {
        assert_eq!(bazel_label("Foo+Bar Baz"), "Foo_Bar_Baz");
        assert_eq!(bazel_label("Foo-1.0"), "Foo-1.0");
    }
}
