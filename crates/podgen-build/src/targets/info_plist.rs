//! Info.plist files written at build time

use super::{load_statement, AppleFramework, BazelTarget, ResourceBundle};
use crate::analyzer::BaseInfo;
use crate::starlark::{Arg, StarlarkNode};
use crate::target_name::TargetName;

const RULE_FILE: &str = "@bazel_skylib//rules:write_file.bzl";
const RULE: &str = "write_file";

const DEFAULT_VERSION: &str = "1.0";

const HEADER: [&str; 4] = [
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    r#"<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">"#,
    r#"<plist version="1.0">"#,
    "<dict>",
];

const FOOTER: [&str; 2] = ["</dict>", "</plist>"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPlist {
    pub name: String,
    /// Plist keys and string values, in output order
    pub entries: Vec<(String, String)>,
}

impl InfoPlist {
    pub fn for_framework(framework: &AppleFramework, base: &BaseInfo) -> Self {
        let mut entries = vec![
            entry("CFBundleExecutable", &framework.module_name),
            entry("CFBundleIdentifier", &framework.bundle_id),
            entry("CFBundleName", &framework.module_name),
            entry("CFBundlePackageType", "FMWK"),
        ];
        entries.extend(version_entries(base));
        Self {
            name: TargetName::info_plist(&framework.name),
            entries,
        }
    }

    pub fn for_bundle(bundle: &ResourceBundle, base: &BaseInfo) -> Self {
        let mut entries = vec![
            entry("CFBundleIdentifier", &bundle.bundle_id),
            entry("CFBundleName", &bundle.bundle_name),
            entry("CFBundlePackageType", "BNDL"),
        ];
        entries.extend(version_entries(base));
        Self {
            name: TargetName::info_plist(&bundle.name),
            entries,
        }
    }

    fn content(&self) -> Vec<String> {
        let body = self.entries.iter().flat_map(|(key, value)| {
            [
                format!("<key>{}</key>", escape(key)),
                format!("<string>{}</string>", escape(value)),
            ]
        });
        HEADER
            .iter()
            .map(|line| line.to_string())
            .chain(body)
            .chain(FOOTER.iter().map(|line| line.to_string()))
            .collect()
    }
}

fn entry(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

fn version_entries(base: &BaseInfo) -> Vec<(String, String)> {
    let mut entries = vec![
        entry(
            "CFBundleShortVersionString",
            base.version.as_deref().unwrap_or(DEFAULT_VERSION),
        ),
        entry("CFBundleVersion", "1"),
    ];
    if let Some(target) = base.deployment_target() {
        entries.push(entry("MinimumOSVersion", target));
    }
    entries
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl BazelTarget for InfoPlist {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_node(&self) -> Option<String> {
        Some(load_statement(RULE_FILE, RULE))
    }

    fn to_starlark(&self) -> StarlarkNode {
        StarlarkNode::call(
            RULE,
            vec![
                Arg::named("name", &self.name),
                Arg::named("out", format!("{}.plist", self.name)),
                Arg::named("content", self.content()),
            ],
        )
    }
}
