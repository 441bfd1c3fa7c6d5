//! `apple_framework` from rules_ios

use super::{load_statement, BazelTarget};
use crate::analyzer::AnalyzerResults;
use crate::glob::Glob;
use crate::options::BuildOptions;
use crate::starlark::{Arg, StarlarkNode, ToStarlark, DEFAULT_CONDITION};
use crate::target_name::TargetName;
use crate::transform::UserConfigurable;
use podgen_spec::Arch;
use std::collections::{BTreeMap, BTreeSet};

const RULE_FILE: &str = "@build_bazel_rules_ios//rules:framework.bzl";
const RULE: &str = "apple_framework";

/// Framework compiled from the pod's sources
#[derive(Debug, Clone, PartialEq)]
pub struct AppleFramework {
    pub name: String,
    pub module_name: String,
    pub bundle_id: String,
    pub swift_version: Option<String>,
    pub link_dynamic: bool,
    pub testonly: bool,
    /// Plist target names, without the leading `:`
    pub infoplists: Vec<String>,
    pub platforms: BTreeMap<String, String>,
    pub srcs: Glob,
    pub public_headers: Glob,
    pub private_headers: Glob,
    pub data: StarlarkNode,
    pub deps: Vec<String>,
    /// Import target name to the architectures it is linked for
    pub conditional_deps: BTreeMap<String, Vec<Arch>>,
    pub vendored_static_libraries: Vec<String>,
    pub sdk_dylibs: Vec<String>,
    pub sdk_frameworks: Vec<String>,
    pub weak_sdk_frameworks: Vec<String>,
    pub objc_copts: Vec<String>,
    pub swift_copts: Vec<String>,
    pub linkopts: Vec<String>,
    pub xcconfig: BTreeMap<String, String>,
}

impl AppleFramework {
    /// Build the framework target from one platform's results.
    ///
    /// `local_deps` are labels of targets generated next to it, such as
    /// resource bundles.
    pub fn new(
        results: &AnalyzerResults,
        options: &BuildOptions,
        target_name: &TargetName,
        local_deps: Vec<String>,
        conditional_deps: BTreeMap<String, Vec<Arch>>,
    ) -> Self {
        let base = &results.base;
        let pod_deps = results
            .pod_deps
            .dependencies
            .iter()
            .filter_map(|dep| target_name.dependency_label(dep, &base.name, options));

        Self {
            name: target_name.framework(&base.name),
            module_name: base.module_name.clone(),
            bundle_id: base.bundle_id(),
            swift_version: base.swift_version.clone(),
            link_dynamic: results.sources.link_dynamic,
            testonly: results.sdk_deps.testonly,
            infoplists: Vec::new(),
            platforms: base.platforms.clone(),
            srcs: results.sources.source_files.clone(),
            public_headers: results.sources.public_headers.clone(),
            private_headers: results.sources.private_headers.clone(),
            data: results.resources.pack_data(),
            deps: local_deps.into_iter().chain(pod_deps).collect(),
            conditional_deps,
            vendored_static_libraries: results.vendored_deps.libraries.clone(),
            sdk_dylibs: results.sdk_deps.sdk_dylibs.clone(),
            sdk_frameworks: results.sdk_deps.sdk_frameworks.clone(),
            weak_sdk_frameworks: results.sdk_deps.weak_sdk_frameworks.clone(),
            objc_copts: results.build_settings.objc_copts.clone(),
            swift_copts: results.build_settings.swift_copts.clone(),
            linkopts: results.build_settings.linkopts.clone(),
            xcconfig: results.build_settings.xcconfig.clone(),
        }
    }

    /// Attach a plist target
    pub fn add_info_plist(&mut self, name: impl Into<String>) {
        self.infoplists.push(name.into());
    }

    /// A dynamic framework carries its own Info.plist
    pub fn needs_info_plist(&self) -> bool {
        self.link_dynamic
    }

    /// Sorted unconditional deps followed by a `select` over architectures
    fn deps_node(&self) -> StarlarkNode {
        let unconditional: BTreeSet<&String> = self.deps.iter().collect();
        let unconditional: Vec<&String> = unconditional.into_iter().collect();

        let mut by_condition: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, archs) in &self.conditional_deps {
            for arch in archs {
                by_condition
                    .entry(format!(":{}", arch.as_str()))
                    .or_default()
                    .push(format!(":{}", name));
            }
        }
        if by_condition.is_empty() {
            return unconditional.to_starlark();
        }

        let mut branches: Vec<(String, StarlarkNode)> = by_condition
            .into_iter()
            .map(|(condition, mut labels)| {
                labels.sort();
                (condition, StarlarkNode::List(labels.iter().map(ToStarlark::to_starlark).collect()))
            })
            .collect();
        branches.push((DEFAULT_CONDITION.to_string(), StarlarkNode::List(Vec::new())));

        StarlarkNode::concat(unconditional.to_starlark(), StarlarkNode::select(branches))
    }

    fn objc_defines() -> StarlarkNode {
        StarlarkNode::concat(
            vec!["COCOAPODS=1"].to_starlark(),
            StarlarkNode::select(vec![
                (":release".to_string(), vec!["POD_CONFIGURATION_RELEASE=1"].to_starlark()),
                (
                    DEFAULT_CONDITION.to_string(),
                    vec!["POD_CONFIGURATION_DEBUG=1", "DEBUG=1"].to_starlark(),
                ),
            ]),
        )
    }

    fn swift_defines() -> StarlarkNode {
        StarlarkNode::concat(
            vec!["COCOAPODS"].to_starlark(),
            StarlarkNode::select(vec![
                (":release".to_string(), StarlarkNode::List(Vec::new())),
                (DEFAULT_CONDITION.to_string(), vec!["DEBUG"].to_starlark()),
            ]),
        )
    }
}

impl BazelTarget for AppleFramework {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_node(&self) -> Option<String> {
        Some(load_statement(RULE_FILE, RULE))
    }

    fn to_starlark(&self) -> StarlarkNode {
        let infoplists: Vec<String> = self.infoplists.iter().map(|name| format!(":{}", name)).collect();

        StarlarkNode::call(
            RULE,
            vec![
                Arg::named("name", &self.name),
                Arg::named("module_name", &self.module_name),
                Arg::named("bundle_id", &self.bundle_id),
                Arg::named("swift_version", &self.swift_version),
                Arg::named("link_dynamic", self.link_dynamic),
                Arg::named("testonly", self.testonly),
                Arg::named("infoplists", infoplists),
                Arg::named("platforms", &self.platforms),
                Arg::named("srcs", self.srcs.to_starlark()),
                Arg::named("public_headers", self.public_headers.to_starlark()),
                Arg::named("private_headers", self.private_headers.to_starlark()),
                Arg::named("data", &self.data),
                Arg::named("deps", self.deps_node()),
                Arg::named("vendored_static_libraries", &self.vendored_static_libraries),
                Arg::named("objc_defines", Self::objc_defines()),
                Arg::named("swift_defines", Self::swift_defines()),
                Arg::named("sdk_dylibs", &self.sdk_dylibs),
                Arg::named("sdk_frameworks", &self.sdk_frameworks),
                Arg::named("weak_sdk_frameworks", &self.weak_sdk_frameworks),
                Arg::named("objc_copts", &self.objc_copts),
                Arg::named("swift_copts", &self.swift_copts),
                Arg::named("linkopts", &self.linkopts),
                Arg::named("xcconfig", &self.xcconfig),
                Arg::named("visibility", vec!["//visibility:public"]),
            ],
        )
    }
}

impl UserConfigurable for AppleFramework {
    fn add(&mut self, key: &str, value: &str) {
        let value = value.to_string();
        match key {
            "sdk_dylibs" => self.sdk_dylibs.push(value),
            "sdk_frameworks" => self.sdk_frameworks.push(value),
            "weak_sdk_frameworks" => self.weak_sdk_frameworks.push(value),
            "deps" => self.deps.push(value),
            _ => {}
        }
    }

    fn delete(&mut self, key: &str, value: &str) {
        match key {
            "sdk_dylibs" => self.sdk_dylibs.retain(|v| v != value),
            "sdk_frameworks" => self.sdk_frameworks.retain(|v| v != value),
            "weak_sdk_frameworks" => self.weak_sdk_frameworks.retain(|v| v != value),
            "deps" => {
                self.deps.retain(|v| v != value);
                let name = value.strip_prefix(':').unwrap_or(value);
                self.conditional_deps.remove(name);
            }
            _ => {}
        }
    }

    fn replace(&mut self, key: &str, value: &str) {
        let Ok(value) = value.parse::<bool>() else {
            return;
        };
        match key {
            "testonly" => self.testonly = value,
            "link_dynamic" => self.link_dynamic = value,
            _ => {}
        }
    }
}
