//! Pod identity: names, swift version and deployment target

use super::AnalyzerContext;
use podgen_spec::Platform;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseInfo {
    pub name: String,
    pub module_name: String,
    pub version: Option<String>,
    pub swift_version: Option<String>,
    pub platform: Platform,
    /// Bazel platform name to minimum OS version
    pub platforms: BTreeMap<String, String>,
}

impl BaseInfo {
    pub fn bundle_id(&self) -> String {
        format!("org.cocoapods.{}", self.name)
    }

    pub fn deployment_target(&self) -> Option<&str> {
        self.platforms.get(self.platform.bazel_name()).map(String::as_str)
    }
}

pub fn analyze(context: &AnalyzerContext<'_>) -> BaseInfo {
    let spec = context.spec;
    let platform = context.platform;

    let module_name = spec
        .module_name
        .clone()
        .unwrap_or_else(|| module_identifier(&spec.name));

    let platforms = spec
        .deployment_targets
        .get(&platform)
        .map(|target| BTreeMap::from([(platform.bazel_name().to_string(), target.clone())]))
        .unwrap_or_default();

    BaseInfo {
        name: spec.name.clone(),
        module_name,
        version: spec.version.clone(),
        swift_version: highest_version(&spec.swift_versions),
        platform,
        platforms,
    }
}

/// Pod name turned into a valid module identifier
pub fn module_identifier(name: &str) -> String {
    let identifier: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if identifier.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", identifier)
    } else {
        identifier
    }
}

/// Highest dotted version, compared numerically component by component
pub fn highest_version(versions: &[String]) -> Option<String> {
    versions
        .iter()
        .max_by_key(|version| {
            version
                .split('.')
                .map(|part| part.trim().parse::<u32>().unwrap_or(0))
                .collect::<Vec<_>>()
        })
        .cloned()
}
