//! System frameworks and libraries

use super::AnalyzerContext;

const TEST_FRAMEWORK: &str = "XCTest";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SdkDepsInfo {
    pub sdk_frameworks: Vec<String>,
    pub weak_sdk_frameworks: Vec<String>,
    pub sdk_dylibs: Vec<String>,
    /// Linking XCTest makes the framework usable from tests only
    pub testonly: bool,
}

pub fn analyze(context: &AnalyzerContext<'_>) -> SdkDepsInfo {
    let sdk_frameworks = dedup(context.collect(|s| &s.frameworks));
    let weak_sdk_frameworks = dedup(context.collect(|s| &s.weak_frameworks));
    let sdk_dylibs = dedup(context.collect(|s| &s.libraries));

    let testonly = sdk_frameworks
        .iter()
        .chain(&weak_sdk_frameworks)
        .any(|framework| framework == TEST_FRAMEWORK);

    SdkDepsInfo {
        sdk_frameworks,
        weak_sdk_frameworks,
        sdk_dylibs,
        testonly,
    }
}

/// Drop repeated values, keeping first occurrences in order
pub(crate) fn dedup(values: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}
