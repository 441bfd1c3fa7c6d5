//! Prebuilt framework imports from rules_apple

use super::{load_statement, BazelTarget};
use crate::analyzer::VendoredFramework;
use crate::glob::Glob;
use crate::starlark::{Arg, StarlarkNode, ToStarlark};
use crate::target_name::TargetName;
use crate::transform::UserConfigurable;
use podgen_spec::Arch;

const RULE_FILE: &str = "@build_bazel_rules_apple//apple:apple.bzl";

#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkImport {
    pub name: String,
    /// Pod-relative framework directory
    pub path: String,
    pub is_xcframework: bool,
    pub link_dynamic: bool,
    pub archs: Vec<Arch>,
}

impl FrameworkImport {
    /// Import of a vendored framework; imports link statically unless
    /// overridden
    pub fn new(pod_name: &str, framework: &VendoredFramework, target_name: &TargetName) -> Self {
        Self {
            name: target_name.framework_import(pod_name, &framework.path),
            path: framework.path.clone(),
            is_xcframework: framework.is_xcframework(),
            link_dynamic: false,
            archs: framework.archs.clone(),
        }
    }

    pub fn rule(&self) -> &'static str {
        match (self.is_xcframework, self.link_dynamic) {
            (false, false) => "apple_static_framework_import",
            (false, true) => "apple_dynamic_framework_import",
            (true, false) => "apple_static_xcframework_import",
            (true, true) => "apple_dynamic_xcframework_import",
        }
    }
}

impl BazelTarget for FrameworkImport {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_node(&self) -> Option<String> {
        Some(load_statement(RULE_FILE, self.rule()))
    }

    fn to_starlark(&self) -> StarlarkNode {
        let imports_key = if self.is_xcframework {
            "xcframework_imports"
        } else {
            "framework_imports"
        };
        let imports = Glob::from_patterns(vec![format!("{}/**", self.path)], Vec::new());

        StarlarkNode::call(
            self.rule(),
            vec![
                Arg::named("name", &self.name),
                Arg::named(imports_key, imports.to_starlark()),
                Arg::named("visibility", vec!["//visibility:public"]),
            ],
        )
    }
}

impl UserConfigurable for FrameworkImport {
    fn add(&mut self, _key: &str, _value: &str) {}

    fn delete(&mut self, _key: &str, _value: &str) {}

    fn replace(&mut self, key: &str, value: &str) {
        if key == "link_dynamic" {
            if let Ok(value) = value.parse() {
                self.link_dynamic = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::StarlarkCompiler;
    use crate::options::BuildOptions;
    use podgen_spec::Platform;
    use pretty_assertions::assert_eq;

    fn import(path: &str) -> FrameworkImport {
        let options = BuildOptions::new();
        let framework = VendoredFramework {
            path: path.to_string(),
            archs: vec![Arch::IosArm64],
        };
        FrameworkImport::new("Kit", &framework, &TargetName::new(Platform::Ios, &options))
    }

    #[test]
    fn test_rule_selection() {
        let mut target = import("Vendor/Bin.xcframework");
        assert_eq!(target.rule(), "apple_static_xcframework_import");
        target.replace("link_dynamic", "true");
        assert_eq!(target.rule(), "apple_dynamic_xcframework_import");
        target.replace("link_dynamic", "maybe");
        assert!(target.link_dynamic);
        assert_eq!(import("Vendor/Old.framework").rule(), "apple_static_framework_import");
    }

    #[test]
    fn test_render() {
        let target = import("Vendor/Old.framework");
        assert_eq!(
            target.load_node().as_deref(),
            Some("load(\"@build_bazel_rules_apple//apple:apple.bzl\", \"apple_static_framework_import\")")
        );
        assert_eq!(
            StarlarkCompiler::new().compile(&target.to_starlark(), 0),
            "apple_static_framework_import(\n    name = \"Kit_Old_VendoredFramework\",\n    framework_imports = glob(\n        [\n            \"Vendor/Old.framework/**\",\n        ],\n    ),\n    visibility = [\n        \"//visibility:public\",\n    ],\n)"
        );
    }
}
