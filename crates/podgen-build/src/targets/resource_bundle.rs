//! Named resource bundles

use super::{load_statement, BazelTarget};
use crate::analyzer::resources::pack_resources;
use crate::analyzer::BundleInfo;
use crate::starlark::{Arg, StarlarkNode};
use crate::target_name::TargetName;
use crate::transform::UserConfigurable;

const RULE_FILE: &str = "@build_bazel_rules_ios//rules:precompiled_apple_resource_bundle.bzl";
const RULE: &str = "precompiled_apple_resource_bundle";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBundle {
    pub name: String,
    pub bundle_name: String,
    pub bundle_id: String,
    pub resources: Vec<String>,
    pub infoplists: Vec<String>,
}

impl ResourceBundle {
    pub fn new(pod_name: &str, bundle: &BundleInfo, target_name: &TargetName) -> Self {
        Self {
            name: target_name.resource_bundle(pod_name, &bundle.name),
            bundle_name: bundle.name.clone(),
            bundle_id: format!("org.cocoapods.{}", bundle.name),
            resources: bundle.resources.clone(),
            infoplists: Vec::new(),
        }
    }

    pub fn add_info_plist(&mut self, name: impl Into<String>) {
        self.infoplists.push(name.into());
    }
}

impl BazelTarget for ResourceBundle {
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
                Arg::named("bundle_name", &self.bundle_name),
                Arg::named("bundle_id", &self.bundle_id),
                Arg::named("resources", pack_resources(&self.resources, &[])),
                Arg::named("infoplists", infoplists),
                Arg::named("visibility", vec!["//visibility:public"]),
            ],
        )
    }
}

impl UserConfigurable for ResourceBundle {
    fn add(&mut self, key: &str, value: &str) {
        if key == "resources" {
            self.resources.push(value.to_string());
        }
    }

    fn delete(&mut self, key: &str, value: &str) {
        if key == "resources" {
            self.resources.retain(|r| r != value);
        }
    }

    fn replace(&mut self, _key: &str, _value: &str) {}
}
