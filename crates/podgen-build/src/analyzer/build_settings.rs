//! Compiler and linker settings from `compiler_flags` and xcconfig

use super::AnalyzerContext;
use std::collections::BTreeMap;

const INHERITED: &str = "$(inherited)";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildSettingsInfo {
    pub objc_copts: Vec<String>,
    pub swift_copts: Vec<String>,
    pub linkopts: Vec<String>,
    /// xcconfig keys not lifted into flags
    pub xcconfig: BTreeMap<String, String>,
}

pub fn analyze(context: &AnalyzerContext<'_>) -> BuildSettingsInfo {
    let mut objc_copts: Vec<String> = context
        .collect(|s| &s.compiler_flags)
        .iter()
        .flat_map(|flags| split_flags(flags))
        .collect();

    let mut xcconfig = context.collect(|s| &s.pod_target_xcconfig);
    xcconfig.extend(context.collect(|s| &s.xcconfig));

    let mut take = |key: &str| -> Vec<String> {
        xcconfig
            .remove(key)
            .map(|value| split_flags(&value))
            .unwrap_or_default()
    };
    objc_copts.extend(take("OTHER_CFLAGS"));
    let swift_copts = take("OTHER_SWIFT_FLAGS");
    let linkopts = take("OTHER_LDFLAGS");

    BuildSettingsInfo {
        objc_copts,
        swift_copts,
        linkopts,
        xcconfig,
    }
}

fn split_flags(value: &str) -> Vec<String> {
    value
        .split_whitespace()
        .filter(|flag| *flag != INHERITED)
        .map(str::to_string)
        .collect()
}
