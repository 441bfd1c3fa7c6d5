//! Apple platforms and CPU architectures recognized by the generator

use std::fmt;
use std::str::FromStr;

/// Apple platform a podspec can declare attributes for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Ios,
    Osx,
    Tvos,
    Watchos,
}

impl Platform {
    /// Every recognized platform, in rendering order
    pub const ALL: [Platform; 4] = [Platform::Ios, Platform::Osx, Platform::Tvos, Platform::Watchos];

    /// Key used by the podspec format
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Osx => "osx",
            Self::Tvos => "tvos",
            Self::Watchos => "watchos",
        }
    }

    /// Platform name understood by rules_apple (`platforms = {...}`)
    pub fn bazel_name(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Osx => "macos",
            Self::Tvos => "tvos",
            Self::Watchos => "watchos",
        }
    }

    /// Suffix appended to target names when generating for several platforms
    pub fn target_suffix(&self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Osx => "macOS",
            Self::Tvos => "tvOS",
            Self::Watchos => "watchOS",
        }
    }

    /// Architectures Bazel can build for this platform
    pub fn archs(&self) -> &'static [Arch] {
        match self {
            Self::Ios => &[Arch::IosArm64, Arch::IosSimArm64, Arch::IosX86_64],
            Self::Osx => &[Arch::DarwinArm64, Arch::DarwinX86_64],
            Self::Tvos => &[Arch::TvosArm64, Arch::TvosSimArm64, Arch::TvosX86_64],
            Self::Watchos => &[
                Arch::WatchosArm64_32,
                Arch::WatchosArmv7k,
                Arch::WatchosArm64,
                Arch::WatchosX86_64,
            ],
        }
    }

    /// Platform token used in `.xcframework` slice identifiers
    fn slice_token(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Osx => "macos",
            Self::Tvos => "tvos",
            Self::Watchos => "watchos",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "osx" | "macos" => Ok(Self::Osx),
            "tvos" => Ok(Self::Tvos),
            "watchos" => Ok(Self::Watchos),
            other => Err(format!("Unknown platform: {}", other)),
        }
    }
}

/// CPU architecture, named by its Bazel `--cpu` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arch {
    IosArm64,
    IosSimArm64,
    IosX86_64,
    DarwinArm64,
    DarwinX86_64,
    TvosArm64,
    TvosSimArm64,
    TvosX86_64,
    WatchosArm64_32,
    WatchosArmv7k,
    WatchosArm64,
    WatchosX86_64,
}

/// Architecture tokens that may appear in a slice identifier, longest first
const SLICE_ARCH_TOKENS: [&str; 8] = [
    "arm64_32", "arm64e", "armv7k", "armv7s", "x86_64", "arm64", "armv7", "i386",
];

impl Arch {
    /// Bazel cpu value, also used as the `config_setting` name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IosArm64 => "ios_arm64",
            Self::IosSimArm64 => "ios_sim_arm64",
            Self::IosX86_64 => "ios_x86_64",
            Self::DarwinArm64 => "darwin_arm64",
            Self::DarwinX86_64 => "darwin_x86_64",
            Self::TvosArm64 => "tvos_arm64",
            Self::TvosSimArm64 => "tvos_sim_arm64",
            Self::TvosX86_64 => "tvos_x86_64",
            Self::WatchosArm64_32 => "watchos_arm64_32",
            Self::WatchosArmv7k => "watchos_armv7k",
            Self::WatchosArm64 => "watchos_arm64",
            Self::WatchosX86_64 => "watchos_x86_64",
        }
    }

    /// Map a slice architecture token to a Bazel architecture
    pub fn from_slice_token(platform: Platform, token: &str, simulator: bool) -> Option<Arch> {
        let arch = match (platform, token, simulator) {
            (Platform::Ios, "arm64", false) => Self::IosArm64,
            (Platform::Ios, "arm64", true) => Self::IosSimArm64,
            (Platform::Ios, "x86_64", true) => Self::IosX86_64,
            (Platform::Osx, "arm64", _) => Self::DarwinArm64,
            (Platform::Osx, "x86_64", _) => Self::DarwinX86_64,
            (Platform::Tvos, "arm64", false) => Self::TvosArm64,
            (Platform::Tvos, "arm64", true) => Self::TvosSimArm64,
            (Platform::Tvos, "x86_64", true) => Self::TvosX86_64,
            (Platform::Watchos, "arm64_32", false) => Self::WatchosArm64_32,
            (Platform::Watchos, "armv7k", false) => Self::WatchosArmv7k,
            (Platform::Watchos, "arm64", true) => Self::WatchosArm64,
            (Platform::Watchos, "x86_64", true) => Self::WatchosX86_64,
            _ => return None,
        };
        Some(arch)
    }

    /// Parse an `.xcframework` slice directory name such as
    /// `ios-arm64_x86_64-simulator` into its platform and architectures.
    ///
    /// Variants other than `simulator` (e.g. `maccatalyst`) are not
    /// buildable by the generated targets and yield `None`.
    pub fn parse_slice_identifier(identifier: &str) -> Option<(Platform, Vec<Arch>)> {
        let mut parts = identifier.splitn(3, '-');
        let platform_token = parts.next()?;
        let arch_part = parts.next()?;
        let simulator = match parts.next() {
            None => false,
            Some("simulator") => true,
            Some(_) => return None,
        };

        let platform = Platform::ALL
            .into_iter()
            .find(|p| p.slice_token() == platform_token)?;

        let mut archs = Vec::new();
        let mut rest = arch_part;
        while !rest.is_empty() {
            let token = SLICE_ARCH_TOKENS.iter().find(|t| {
                rest.starts_with(*t)
                    && (rest.len() == t.len() || rest[t.len()..].starts_with('_'))
            })?;
            if let Some(arch) = Arch::from_slice_token(platform, token, simulator) {
                if !archs.contains(&arch) {
                    archs.push(arch);
                }
            }
            rest = rest[token.len()..].trim_start_matches('_');
        }

        Some((platform, archs))
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_from_str() {
        assert_eq!("ios".parse::<Platform>(), Ok(Platform::Ios));
        assert_eq!("macos".parse::<Platform>(), Ok(Platform::Osx));
        assert_eq!("OSX".parse::<Platform>(), Ok(Platform::Osx));
        assert!("android".parse::<Platform>().is_err());
    }

    #[test]
    fn test_parse_device_slice() {
        let (platform, archs) = Arch::parse_slice_identifier("ios-arm64").unwrap();
        assert_eq!(platform, Platform::Ios);
        assert_eq!(archs, vec![Arch::IosArm64]);
    }

    #[test]
    fn test_parse_simulator_slice() {
        let (platform, archs) =
            Arch::parse_slice_identifier("ios-arm64_x86_64-simulator").unwrap();
        assert_eq!(platform, Platform::Ios);
        assert_eq!(archs, vec![Arch::IosSimArm64, Arch::IosX86_64]);
    }

    #[test]
    fn test_parse_watchos_underscore_arch() {
        let (_, archs) = Arch::parse_slice_identifier("watchos-arm64_32_armv7k").unwrap();
        assert_eq!(archs, vec![Arch::WatchosArm64_32, Arch::WatchosArmv7k]);
    }

    #[test]
    fn test_parse_unsupported_variant() {
        assert!(Arch::parse_slice_identifier("ios-arm64_x86_64-maccatalyst").is_none());
        assert!(Arch::parse_slice_identifier("Info.plist").is_none());
    }

    #[test]
    fn test_device_only_archs_skip_simulator_tokens() {
        // armv7 device slices are not part of the Bazel arch set
        let (_, archs) = Arch::parse_slice_identifier("ios-arm64_armv7").unwrap();
        assert_eq!(archs, vec![Arch::IosArm64]);
    }
}
