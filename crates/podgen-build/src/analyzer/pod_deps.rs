//! Dependencies on other pods

use super::sdk_deps::dedup;
use super::AnalyzerContext;

/// Dependency names as written in the podspec; labels are derived when the
/// framework target is built
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PodDepsInfo {
    pub dependencies: Vec<String>,
}

pub fn analyze(context: &AnalyzerContext<'_>) -> PodDepsInfo {
    PodDepsInfo {
        dependencies: dedup(context.collect(|s| &s.dependencies)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::FixedMatcher;
    use crate::options::BuildOptions;
    use podgen_spec::{Platform, PodSpec};

    #[test]
    fn test_dependencies_are_collected_per_platform() {
        let spec = PodSpec::from_json_str(
            r#"{
                "name": "Kit",
                "dependencies": { "Alamofire": [] },
                "osx": { "dependencies": { "Sparkle": [] } },
                "subspecs": [{ "name": "UI", "dependencies": { "Alamofire": [], "Kit/Core": [] } }]
            }"#,
        )
        .unwrap();
        let subspecs = spec.selected_subspecs(&["UI".to_string()]);
        let options = BuildOptions::new();
        let matcher = FixedMatcher::new();
        let context = AnalyzerContext {
            platform: Platform::Ios,
            spec: &spec,
            subspecs: &subspecs,
            options: &options,
            matcher: &matcher,
        };
        assert_eq!(analyze(&context).dependencies, vec!["Alamofire", "Kit/Core"]);

        let osx = AnalyzerContext {
            platform: Platform::Osx,
            ..context
        };
        assert_eq!(
            analyze(&osx).dependencies,
            vec!["Alamofire", "Sparkle", "Kit/Core"]
        );
    }
}
