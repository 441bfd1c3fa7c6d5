//! Source and header globs

use super::AnalyzerContext;
use crate::glob::{expand_pattern, Glob, GlobEntry};
use podgen_spec::{AttrSet, Platform, PodSpec};
use tracing::warn;

/// Implementation file extensions compiled into a framework
pub const SOURCE_EXTENSIONS: &[&str] = &["m", "mm", "c", "cc", "cpp", "cxx", "swift", "s", "S"];

/// Header file extensions
pub const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx"];

#[derive(Debug, Clone, PartialEq)]
pub struct SourcesInfo {
    pub source_files: Glob,
    pub public_headers: Glob,
    pub private_headers: Glob,
    pub link_dynamic: bool,
}

pub fn analyze(context: &AnalyzerContext<'_>) -> SourcesInfo {
    let source_types: Vec<&str> = SOURCE_EXTENSIONS
        .iter()
        .chain(HEADER_EXTENSIONS)
        .copied()
        .collect();

    let source_files = units_glob(context, |s| &s.source_files, &source_types, true);
    let private_headers = units_glob(context, |s| &s.private_header_files, HEADER_EXTENSIONS, false);

    let declared_public = context.collect(|s| &s.public_header_files);
    let public_headers = if declared_public.is_empty() {
        units_glob(context, |s| &s.source_files, HEADER_EXTENSIONS, true)
    } else {
        units_glob(context, |s| &s.public_header_files, HEADER_EXTENSIONS, false)
    };

    if context.options.verify_sources && !source_files.is_empty() {
        let resolved = source_files.resolve_set(context.options, context.matcher);
        if resolved.is_empty() {
            warn!(
                "Source files of {} match nothing on disk for {}",
                context.spec.name, context.platform
            );
        }
    }

    let link_dynamic = context.options.link_dynamic && context.spec.static_framework != Some(true);

    SourcesInfo {
        source_files,
        public_headers,
        private_headers,
        link_dynamic,
    }
}

/// One nested glob per unit, each with its own excludes, simplified.
///
/// Every subspec's patterns are excluded by the root's `exclude_files` and
/// its own; `private_header_files` are excluded too when requested.
fn units_glob(
    context: &AnalyzerContext<'_>,
    attribute: impl Fn(&PodSpec) -> &AttrSet<Vec<String>>,
    file_types: &[&str],
    exclude_private: bool,
) -> Glob {
    let platform = context.platform;
    let root_excludes = platform_values(context.spec, |s| &s.exclude_files, platform);

    let include = context
        .units()
        .map(|unit| {
            let patterns = platform_values(unit, &attribute, platform);
            let mut excludes = root_excludes.clone();
            if !std::ptr::eq(unit, context.spec) {
                excludes.extend(platform_values(unit, |s| &s.exclude_files, platform));
            }
            if exclude_private {
                excludes.extend(platform_values(unit, |s| &s.private_header_files, platform));
            }
            GlobEntry::Nested(Glob::new(
                vec![expand_all(&patterns, file_types)],
                vec![expand_all(&excludes, file_types)],
            ))
        })
        .collect();

    Glob::new(include, Vec::new()).simplify()
}

fn platform_values(
    spec: &PodSpec,
    attribute: impl Fn(&PodSpec) -> &AttrSet<Vec<String>>,
    platform: Platform,
) -> Vec<String> {
    attribute(spec).platform(platform).unwrap_or_default()
}

fn expand_all(patterns: &[String], file_types: &[&str]) -> GlobEntry {
    GlobEntry::files(
        patterns
            .iter()
            .flat_map(|pattern| expand_pattern(pattern, file_types)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::FixedMatcher;
    use crate::options::BuildOptions;
    use podgen_spec::PodSpec;
    use pretty_assertions::assert_eq;

    const PODSPEC: &str = r#"{
        "name": "Kit",
        "source_files": "Sources/Root/*.{h,m}",
        "exclude_files": "Sources/**/Legacy.m",
        "subspecs": [
            {
                "name": "Core",
                "source_files": "Sources/Core",
                "exclude_files": "Sources/Core/Skip.m",
                "private_header_files": "Sources/Core/Internal.h"
            },
            { "name": "Headers", "public_header_files": "Sources/Public/*.h" }
        ]
    }"#;

    fn analyze_with(spec: &PodSpec, names: &[&str], options: &BuildOptions) -> SourcesInfo {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let subspecs = spec.selected_subspecs(&names);
        let matcher = FixedMatcher::new();
        let context = AnalyzerContext {
            platform: Platform::Ios,
            spec,
            subspecs: &subspecs,
            options,
            matcher: &matcher,
        };
        analyze(&context)
    }

    fn files(patterns: &[&str]) -> GlobEntry {
        GlobEntry::files(patterns.iter().copied())
    }

    #[test]
    fn test_units_keep_their_excludes() {
        let spec = PodSpec::from_json_str(PODSPEC).unwrap();
        let info = analyze_with(&spec, &["Core"], &BuildOptions::new());

        let root = Glob::new(
            vec![files(&["Sources/Root/*.h", "Sources/Root/*.m"])],
            vec![files(&["Sources/**/Legacy.m"])],
        );
        assert_eq!(info.source_files.include.len(), 2);
        assert_eq!(info.source_files.include[0], GlobEntry::Nested(root));

        let GlobEntry::Nested(core) = &info.source_files.include[1] else {
            panic!("expected a nested glob");
        };
        let GlobEntry::Files(patterns) = &core.include[0] else {
            panic!("expected a file set");
        };
        assert_eq!(patterns.len(), SOURCE_EXTENSIONS.len() + HEADER_EXTENSIONS.len());
        assert!(patterns.contains("Sources/Core/**/*.m"));
        assert!(patterns.contains("Sources/Core/**/*.h"));
        assert_eq!(
            core.exclude,
            vec![files(&[
                "Sources/**/Legacy.m",
                "Sources/Core/Internal.h",
                "Sources/Core/Skip.m",
            ])]
        );
    }

    #[test]
    fn test_public_headers_default_to_source_headers() {
        let spec = PodSpec::from_json_str(PODSPEC).unwrap();
        let info = analyze_with(&spec, &["Core"], &BuildOptions::new());

        // The root unit has no header excludes left and collapses into a set
        assert_eq!(info.public_headers.include.len(), 2);
        let GlobEntry::Nested(core) = &info.public_headers.include[0] else {
            panic!("expected a nested glob");
        };
        assert_eq!(core.exclude, vec![files(&["Sources/Core/Internal.h"])]);
        assert_eq!(info.public_headers.include[1], files(&["Sources/Root/*.h"]));
        assert_eq!(
            info.private_headers,
            Glob::new(vec![files(&["Sources/Core/Internal.h"])], vec![])
        );
    }

    #[test]
    fn test_declared_public_headers_win() {
        let spec = PodSpec::from_json_str(PODSPEC).unwrap();
        let info = analyze_with(&spec, &["Headers"], &BuildOptions::new());

        assert_eq!(
            info.public_headers,
            Glob::new(vec![files(&["Sources/Public/*.h"])], vec![])
        );
    }

    #[test]
    fn test_link_dynamic() {
        let spec = PodSpec::from_json_str(PODSPEC).unwrap();
        let options = BuildOptions::new().with_link_dynamic(true);
        assert!(analyze_with(&spec, &[], &options).link_dynamic);
        assert!(!analyze_with(&spec, &[], &BuildOptions::new()).link_dynamic);

        let static_spec = PodSpec::from_json_str(r#"{ "name": "Kit", "static_framework": true }"#).unwrap();
        assert!(!analyze_with(&static_spec, &[], &options).link_dynamic);
    }
}
