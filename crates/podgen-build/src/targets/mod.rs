//! Bazel targets emitted into a BUILD file

pub mod apple_framework;
pub mod config_setting;
pub mod framework_import;
pub mod info_plist;
pub mod resource_bundle;

pub use apple_framework::AppleFramework;
pub use config_setting::ConfigSetting;
pub use framework_import::FrameworkImport;
pub use info_plist::InfoPlist;
pub use resource_bundle::ResourceBundle;

use crate::starlark::StarlarkNode;
use crate::transform::UserConfigurable;

/// A rule invocation in a BUILD file
pub trait BazelTarget {
    fn name(&self) -> &str;

    /// `load(...)` statement the rule needs, if it is not native
    fn load_node(&self) -> Option<String>;

    fn to_starlark(&self) -> StarlarkNode;
}

/// `load("<file>", "<symbol>")`
pub fn load_statement(file: &str, symbol: &str) -> String {
    format!("load(\"{}\", \"{}\")", file, symbol)
}

/// Every kind of target the generator emits
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    AppleFramework(AppleFramework),
    FrameworkImport(FrameworkImport),
    ResourceBundle(ResourceBundle),
    InfoPlist(InfoPlist),
    ConfigSetting(ConfigSetting),
}

impl Target {
    /// The target as a transform receiver, for kinds that accept user options
    pub fn as_configurable_mut(&mut self) -> Option<&mut dyn UserConfigurable> {
        match self {
            Target::AppleFramework(target) => Some(target),
            Target::FrameworkImport(target) => Some(target),
            Target::ResourceBundle(target) => Some(target),
            Target::InfoPlist(_) | Target::ConfigSetting(_) => None,
        }
    }

    fn inner(&self) -> &dyn BazelTarget {
        match self {
            Target::AppleFramework(target) => target,
            Target::FrameworkImport(target) => target,
            Target::ResourceBundle(target) => target,
            Target::InfoPlist(target) => target,
            Target::ConfigSetting(target) => target,
        }
    }
}

impl BazelTarget for Target {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn load_node(&self) -> Option<String> {
        self.inner().load_node()
    }

    fn to_starlark(&self) -> StarlarkNode {
        self.inner().to_starlark()
    }
}

impl From<AppleFramework> for Target {
    fn from(target: AppleFramework) -> Self {
        Target::AppleFramework(target)
    }
}

impl From<FrameworkImport> for Target {
    fn from(target: FrameworkImport) -> Self {
        Target::FrameworkImport(target)
    }
}

impl From<ResourceBundle> for Target {
    fn from(target: ResourceBundle) -> Self {
        Target::ResourceBundle(target)
    }
}

impl From<InfoPlist> for Target {
    fn from(target: InfoPlist) -> Self {
        Target::InfoPlist(target)
    }
}

impl From<ConfigSetting> for Target {
    fn from(target: ConfigSetting) -> Self {
        Target::ConfigSetting(target)
    }
}
