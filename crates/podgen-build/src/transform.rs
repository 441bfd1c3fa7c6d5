//! User-supplied target transforms
//!
//! Each option has the form `<target>.<key> <op> <values>`, where `op` is
//! `+=` (add), `-=` (delete) or `=` (override) and `values` is a comma
//! separated list. Keys a target does not recognize are ignored.

use crate::target_name::TargetName;
use crate::targets::{BazelTarget, Target};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// How an option changes a target attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOp {
    Add,
    Delete,
    Override,
}

impl TransformOp {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+=",
            Self::Delete => "-=",
            Self::Override => "=",
        }
    }
}

/// One parsed user option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOption {
    pub target: String,
    pub key: String,
    pub op: TransformOp,
    pub values: Vec<String>,
}

impl FromStr for UserOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lhs, op, rhs) = [TransformOp::Add, TransformOp::Delete]
            .into_iter()
            .find_map(|op| s.split_once(op.as_str()).map(|(l, r)| (l, op, r)))
            .or_else(|| s.split_once('=').map(|(l, r)| (l, TransformOp::Override, r)))
            .ok_or_else(|| format!("missing operator in '{}'", s))?;

        let (target, key) = lhs
            .trim()
            .rsplit_once('.')
            .ok_or_else(|| format!("expected <target>.<key> in '{}'", s))?;
        let (target, key) = (target.trim(), key.trim());
        if target.is_empty() || key.is_empty() {
            return Err(format!("expected <target>.<key> in '{}'", s));
        }

        let values: Vec<String> = rhs
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        if values.is_empty() {
            return Err(format!("no value in '{}'", s));
        }

        Ok(Self {
            target: target.to_string(),
            key: key.to_string(),
            op,
            values,
        })
    }
}

impl fmt::Display for UserOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} {} {}",
            self.target,
            self.key,
            self.op.as_str(),
            self.values.join(", ")
        )
    }
}

/// Parse option lines, skipping the ones that do not parse
pub fn parse_user_options<S: AsRef<str>>(lines: &[S]) -> Vec<UserOption> {
    lines
        .iter()
        .filter_map(|line| match line.as_ref().parse::<UserOption>() {
            Ok(option) => Some(option),
            Err(e) => {
                warn!("Ignoring user option: {}", e);
                None
            }
        })
        .collect()
}

/// A target whose attributes user options can change
pub trait UserConfigurable {
    fn add(&mut self, key: &str, value: &str);
    fn delete(&mut self, key: &str, value: &str);
    fn replace(&mut self, key: &str, value: &str);
}

/// Apply every option, in order, to the targets it names.
///
/// An option names a target by its exact name or by the name without the
/// platform suffix, so `Kit.testonly = true` reaches `Kit_iOS` and `Kit_macOS`.
pub fn apply_user_options(targets: &mut [Target], options: &[UserOption]) {
    for option in options {
        let mut matched = false;
        for target in targets.iter_mut() {
            if !TargetName::matches(target.name(), &option.target) {
                continue;
            }
            let Some(configurable) = target.as_configurable_mut() else {
                continue;
            };
            matched = true;
            for value in &option.values {
                match option.op {
                    TransformOp::Add => configurable.add(&option.key, value),
                    TransformOp::Delete => configurable.delete(&option.key, value),
                    TransformOp::Override => configurable.replace(&option.key, value),
                }
            }
        }
        if !matched {
            debug!("User option '{}' matches no configurable target", option);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Kit.sdk_frameworks += UIKit, CoreData", TransformOp::Add, vec!["UIKit", "CoreData"])]
    #[case("Kit.deps -= //Pods/Old", TransformOp::Delete, vec!["//Pods/Old"])]
    #[case("Kit.testonly = true", TransformOp::Override, vec!["true"])]
    #[case("Kit.link_dynamic=false", TransformOp::Override, vec!["false"])]
    fn test_parse(#[case] line: &str, #[case] op: TransformOp, #[case] values: Vec<&str>) {
        let option: UserOption = line.parse().unwrap();
        assert_eq!(option.target, "Kit");
        assert_eq!(option.op, op);
        assert_eq!(option.values, values);
    }

    #[test]
    fn test_parse_dotted_target_name() {
        let option: UserOption = "Kit.Extras_iOS.deps += //Pods/A.B".parse().unwrap();
        assert_eq!(option.target, "Kit.Extras_iOS");
        assert_eq!(option.key, "deps");
        assert_eq!(option.values, vec!["//Pods/A.B"]);
    }

    #[rstest]
    #[case("Kit.sdk_frameworks UIKit")]
    #[case("sdk_frameworks += UIKit")]
    #[case("Kit.sdk_frameworks += ")]
    #[case(".key = value")]
    fn test_parse_errors(#[case] line: &str) {
        assert!(line.parse::<UserOption>().is_err());
    }

    #[test]
    fn test_parse_user_options_skips_invalid_lines() {
        let options = parse_user_options(&["Kit.deps += //Pods/A", "garbage"]);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].to_string(), "Kit.deps += //Pods/A");
    }
}
