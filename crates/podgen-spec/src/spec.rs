//! Podspec manifest tree (JSON podspec format)

use crate::attr_set::{AttrSet, Monoid, MultiPlatform};
use crate::platform::Platform;
use crate::{Result, SpecError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::warn;

/// A podspec or one of its subspecs.
///
/// Every attribute that the podspec format allows inside a platform
/// dictionary (`"ios": {...}`) is an [`AttrSet`]. Subspecs inherit from their
/// parent; the generator merges the two with [`PodSpec::collect_attribute`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PodSpec {
    /// Short name (`Core` for the subspec `Foo/Core`)
    pub name: String,
    /// Slash-separated path from the root (`Foo/Core`)
    pub full_name: String,
    pub version: Option<String>,
    pub module_name: Option<String>,
    pub swift_versions: Vec<String>,
    /// Minimum deployment target per declared platform
    pub deployment_targets: BTreeMap<Platform, String>,
    pub static_framework: Option<bool>,

    pub source_files: AttrSet<Vec<String>>,
    pub exclude_files: AttrSet<Vec<String>>,
    pub public_header_files: AttrSet<Vec<String>>,
    pub private_header_files: AttrSet<Vec<String>>,
    pub resources: AttrSet<Vec<String>>,
    pub resource_bundles: AttrSet<BTreeMap<String, Vec<String>>>,
    pub frameworks: AttrSet<Vec<String>>,
    pub weak_frameworks: AttrSet<Vec<String>>,
    pub libraries: AttrSet<Vec<String>>,
    pub vendored_frameworks: AttrSet<Vec<String>>,
    pub vendored_libraries: AttrSet<Vec<String>>,
    pub compiler_flags: AttrSet<Vec<String>>,
    pub dependencies: AttrSet<Vec<String>>,
    pub pod_target_xcconfig: AttrSet<BTreeMap<String, String>>,
    pub xcconfig: AttrSet<BTreeMap<String, String>>,

    pub default_subspecs: Vec<String>,
    pub subspecs: Vec<PodSpec>,
}

impl PodSpec {
    /// Parse a JSON podspec
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawSpec = serde_json::from_str(content)?;
        if raw.name.trim().is_empty() {
            return Err(SpecError::MissingName);
        }
        Ok(Self::from_raw(raw, None))
    }

    /// Load a JSON podspec from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SpecError::read(path, e))?;
        Self::from_json_str(&content)
    }

    fn from_raw(raw: RawSpec, parent: Option<&str>) -> Self {
        let full_name = match parent {
            Some(parent) => format!("{}/{}", parent, raw.name),
            None => raw.name.clone(),
        };

        let platforms = &raw.platforms;
        let attrs = &raw.attributes;
        let per_platform = |f: &dyn Fn(&RawAttributes) -> Option<Vec<String>>| {
            let root = f(attrs);
            let overrides = MultiPlatform::from_fn(|p| raw.platform_attributes(p).and_then(f));
            AttrSet::with_platform_overrides(root, overrides)
        };
        let per_platform_map = |f: &dyn Fn(&RawAttributes) -> Option<BTreeMap<String, String>>| {
            let root = f(attrs);
            let overrides = MultiPlatform::from_fn(|p| raw.platform_attributes(p).and_then(f));
            AttrSet::with_platform_overrides(root, overrides)
        };

        let resource_bundles = {
            let bundles = |a: &RawAttributes| {
                a.resource_bundles.as_ref().map(|bundles| {
                    bundles
                        .iter()
                        .map(|(name, patterns)| (name.clone(), patterns.to_vec()))
                        .collect::<BTreeMap<_, _>>()
                })
            };
            let overrides = MultiPlatform::from_fn(|p| raw.platform_attributes(p).and_then(bundles));
            AttrSet::with_platform_overrides(bundles(attrs), overrides)
        };

        let spec = PodSpec {
            name: raw.name.clone(),
            full_name: full_name.clone(),
            version: raw.version.clone(),
            module_name: raw.module_name.clone(),
            swift_versions: raw
                .swift_versions
                .as_ref()
                .or(raw.swift_version.as_ref())
                .map(StringOrList::to_vec)
                .unwrap_or_default(),
            deployment_targets: platforms
                .iter()
                .filter_map(|(key, target)| {
                    let platform = key.parse::<Platform>().ok()?;
                    Some((platform, target.clone().unwrap_or_default()))
                })
                .collect(),
            static_framework: raw.static_framework,

            source_files: per_platform(&|a| a.source_files.as_ref().map(StringOrList::to_vec)),
            exclude_files: per_platform(&|a| a.exclude_files.as_ref().map(StringOrList::to_vec)),
            public_header_files: per_platform(&|a| {
                a.public_header_files.as_ref().map(StringOrList::to_vec)
            }),
            private_header_files: per_platform(&|a| {
                a.private_header_files.as_ref().map(StringOrList::to_vec)
            }),
            resources: per_platform(&|a| {
                a.resources
                    .as_ref()
                    .or(a.resource.as_ref())
                    .map(StringOrList::to_vec)
            }),
            resource_bundles,
            frameworks: per_platform(&|a| {
                a.frameworks.as_ref().or(a.framework.as_ref()).map(StringOrList::to_vec)
            }),
            weak_frameworks: per_platform(&|a| {
                a.weak_frameworks
                    .as_ref()
                    .or(a.weak_framework.as_ref())
                    .map(StringOrList::to_vec)
            }),
            libraries: per_platform(&|a| {
                a.libraries.as_ref().or(a.library.as_ref()).map(StringOrList::to_vec)
            }),
            vendored_frameworks: per_platform(&|a| {
                a.vendored_frameworks.as_ref().map(StringOrList::to_vec)
            }),
            vendored_libraries: per_platform(&|a| {
                a.vendored_libraries.as_ref().map(StringOrList::to_vec)
            }),
            compiler_flags: per_platform(&|a| a.compiler_flags.as_ref().map(StringOrList::to_vec)),
            dependencies: per_platform(&|a| {
                a.dependencies.as_ref().map(|deps| deps.keys().cloned().collect())
            }),
            pod_target_xcconfig: per_platform_map(&|a| a.pod_target_xcconfig.clone()),
            xcconfig: per_platform_map(&|a| a.xcconfig.clone()),

            default_subspecs: raw
                .default_subspecs
                .as_ref()
                .map(StringOrList::to_vec)
                .unwrap_or_default(),
            subspecs: Vec::new(),
        };

        PodSpec {
            subspecs: raw
                .subspecs
                .into_iter()
                .map(|sub| Self::from_raw(sub, Some(&full_name)))
                .collect(),
            ..spec
        }
    }

    /// Name of the root pod (`Foo` for `Foo/Core/Sub`)
    pub fn root_name(&self) -> &str {
        self.full_name.split('/').next().unwrap_or(&self.full_name)
    }

    /// Combine the root value of an attribute with every subspec's value
    pub fn collect_attribute<T: Clone + Monoid>(
        &self,
        subspecs: &[&PodSpec],
        attribute: impl Fn(&PodSpec) -> &AttrSet<T>,
    ) -> AttrSet<T> {
        subspecs
            .iter()
            .fold(attribute(self).clone(), |acc, sub| acc.combine(attribute(sub).clone()))
    }

    /// Find a nested subspec by name: `Core`, `Foo/Core` or `Core/Sub`
    pub fn find_subspec(&self, name: &str) -> Option<&PodSpec> {
        let root = format!("{}/", self.full_name);
        let relative = name.strip_prefix(&root).unwrap_or(name);
        let mut current = self;
        for component in relative.split('/') {
            current = current.subspecs.iter().find(|s| s.name == component)?;
        }
        Some(current)
    }

    /// Subspecs selected for generation, in discovery order.
    ///
    /// With no explicit names the podspec's `default_subspecs` are used, or
    /// every top-level subspec when none are declared. A selected subspec
    /// pulls in its own defaults and any sibling subspec it depends on.
    pub fn selected_subspecs(&self, names: &[String]) -> Vec<&PodSpec> {
        let requested: Vec<String> = if !names.is_empty() {
            names.to_vec()
        } else if !self.default_subspecs.is_empty() {
            self.default_subspecs.clone()
        } else {
            self.subspecs.iter().map(|s| s.name.clone()).collect()
        };

        let mut selected = Vec::new();
        let mut visited = HashSet::new();

        for name in &requested {
            match self.find_subspec(name) {
                Some(sub) => self.visit_subspec(sub, &mut visited, &mut selected),
                None => warn!("Unknown subspec '{}' in {}", name, self.name),
            }
        }
        for dep in self.internal_dependencies(self) {
            if let Some(sub) = self.find_subspec(&dep) {
                self.visit_subspec(sub, &mut visited, &mut selected);
            }
        }

        selected
    }

    fn visit_subspec<'a>(
        &'a self,
        sub: &'a PodSpec,
        visited: &mut HashSet<String>,
        selected: &mut Vec<&'a PodSpec>,
    ) {
        if !visited.insert(sub.full_name.clone()) {
            return;
        }
        selected.push(sub);

        let nested: Vec<&PodSpec> = if sub.default_subspecs.is_empty() {
            sub.subspecs.iter().collect()
        } else {
            sub.default_subspecs
                .iter()
                .filter_map(|name| sub.subspecs.iter().find(|s| &s.name == name))
                .collect()
        };
        for child in nested {
            self.visit_subspec(child, visited, selected);
        }

        for dep in self.internal_dependencies(sub) {
            if let Some(target) = self.find_subspec(&dep) {
                self.visit_subspec(target, visited, selected);
            }
        }
    }

    /// Dependencies of `spec`, on any platform, that point inside this pod
    fn internal_dependencies(&self, spec: &PodSpec) -> Vec<String> {
        let prefix = format!("{}/", self.root_name());
        let mut names = Vec::new();
        for platform in Platform::ALL {
            for dep in spec.dependencies.platform(platform).unwrap_or_default() {
                if dep.starts_with(&prefix) && !names.contains(&dep) {
                    names.push(dep);
                }
            }
        }
        names
    }
}

/// A podspec value that may be a single string or a list of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn to_vec(&self) -> Vec<String> {
        match self {
            StringOrList::One(value) => vec![value.clone()],
            StringOrList::Many(values) => values.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAttributes {
    source_files: Option<StringOrList>,
    exclude_files: Option<StringOrList>,
    public_header_files: Option<StringOrList>,
    private_header_files: Option<StringOrList>,
    resources: Option<StringOrList>,
    resource: Option<StringOrList>,
    resource_bundles: Option<BTreeMap<String, StringOrList>>,
    frameworks: Option<StringOrList>,
    framework: Option<StringOrList>,
    weak_frameworks: Option<StringOrList>,
    weak_framework: Option<StringOrList>,
    libraries: Option<StringOrList>,
    library: Option<StringOrList>,
    vendored_frameworks: Option<StringOrList>,
    vendored_libraries: Option<StringOrList>,
    compiler_flags: Option<StringOrList>,
    dependencies: Option<BTreeMap<String, serde_json::Value>>,
    pod_target_xcconfig: Option<BTreeMap<String, String>>,
    xcconfig: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSpec {
    name: String,
    version: Option<String>,
    module_name: Option<String>,
    swift_version: Option<StringOrList>,
    swift_versions: Option<StringOrList>,
    platforms: BTreeMap<String, Option<String>>,
    static_framework: Option<bool>,
    default_subspecs: Option<StringOrList>,
    subspecs: Vec<RawSpec>,
    ios: Option<RawAttributes>,
    #[serde(alias = "macos")]
    osx: Option<RawAttributes>,
    tvos: Option<RawAttributes>,
    watchos: Option<RawAttributes>,
    #[serde(flatten)]
    attributes: RawAttributes,
}

impl RawSpec {
    fn platform_attributes(&self, platform: Platform) -> Option<&RawAttributes> {
        match platform {
            Platform::Ios => self.ios.as_ref(),
            Platform::Osx => self.osx.as_ref(),
            Platform::Tvos => self.tvos.as_ref(),
            Platform::Watchos => self.watchos.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_or_list() {
        let spec = PodSpec::from_json_str(
            r#"{"name": "Foo", "source_files": "Sources/*.swift", "frameworks": ["UIKit", "Foundation"]}"#,
        )
        .unwrap();
        assert_eq!(
            spec.source_files,
            AttrSet::basic(vec!["Sources/*.swift".to_string()])
        );
        assert_eq!(
            spec.frameworks.platform(Platform::Ios),
            Some(vec!["UIKit".to_string(), "Foundation".to_string()])
        );
    }

    #[test]
    fn test_missing_name_is_rejected() {
        assert!(matches!(
            PodSpec::from_json_str(r#"{"version": "1.0"}"#),
            Err(SpecError::MissingName)
        ));
    }

    #[test]
    fn test_root_name_of_nested_subspec() {
        let spec = PodSpec::from_json_str(
            r#"{"name": "Foo", "subspecs": [{"name": "Core", "subspecs": [{"name": "Sub"}]}]}"#,
        )
        .unwrap();
        let sub = spec.find_subspec("Foo/Core/Sub").unwrap();
        assert_eq!(sub.full_name, "Foo/Core/Sub");
        assert_eq!(sub.root_name(), "Foo");
    }
}
