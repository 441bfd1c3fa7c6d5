//! Native `config_setting` targets used as `select` conditions

use super::BazelTarget;
use crate::starlark::{Arg, StarlarkNode};
use podgen_spec::Arch;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSetting {
    pub name: String,
    pub values: BTreeMap<String, String>,
}

impl ConfigSetting {
    pub fn new(name: impl Into<String>, key: &str, value: &str) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::from([(key.to_string(), value.to_string())]),
        }
    }

    /// Optimized builds
    pub fn release() -> Self {
        Self::new("release", "compilation_mode", "opt")
    }

    /// Debug builds
    pub fn debug() -> Self {
        Self::new("debug", "compilation_mode", "dbg")
    }

    /// Builds for one CPU, named after it
    pub fn arch(arch: Arch) -> Self {
        Self::new(arch.as_str(), "cpu", arch.as_str())
    }
}

impl BazelTarget for ConfigSetting {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_node(&self) -> Option<String> {
        None
    }

    fn to_starlark(&self) -> StarlarkNode {
        StarlarkNode::call(
            "config_setting",
            vec![Arg::named("name", &self.name), Arg::named("values", &self.values)],
        )
    }
}
