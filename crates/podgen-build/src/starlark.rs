//! Starlark syntax tree
//!
//! Everything the generator emits is first converted into a [`StarlarkNode`]
//! through [`ToStarlark`] and rendered by
//! [`StarlarkCompiler`](crate::compiler::StarlarkCompiler). Conversion never
//! fails: absent or empty values become [`StarlarkNode::Empty`] so callers can
//! drop the attribute entirely.

use podgen_spec::{AttrSet, Platform};
use std::collections::BTreeMap;

/// A node of generated Starlark
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StarlarkNode {
    /// Nothing; dropped wherever it is optional
    Empty,
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<StarlarkNode>),
    /// Mapping rendered in the order the entries are given
    Dict(Vec<(String, StarlarkNode)>),
    Call {
        name: String,
        args: Vec<Arg>,
    },
    /// Binary expression such as `lhs + rhs`
    Expr {
        lhs: Box<StarlarkNode>,
        op: String,
        rhs: Box<StarlarkNode>,
    },
    /// A statement emitted verbatim
    Raw(String),
    Lines(Vec<StarlarkNode>),
}

/// Function call argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Positional(StarlarkNode),
    Named(String, StarlarkNode),
}

impl Arg {
    pub fn named(name: impl Into<String>, value: impl ToStarlark) -> Self {
        Arg::Named(name.into(), value.to_starlark())
    }

    pub fn positional(value: impl ToStarlark) -> Self {
        Arg::Positional(value.to_starlark())
    }
}

impl StarlarkNode {
    /// Whether the node renders to nothing meaningful
    pub fn is_empty(&self) -> bool {
        match self {
            StarlarkNode::Empty => true,
            StarlarkNode::Str(value) => value.is_empty(),
            StarlarkNode::List(values) => values.is_empty(),
            StarlarkNode::Dict(entries) => entries.is_empty(),
            StarlarkNode::Lines(lines) => lines.iter().all(StarlarkNode::is_empty),
            StarlarkNode::Int(_)
            | StarlarkNode::Bool(_)
            | StarlarkNode::Call { .. }
            | StarlarkNode::Expr { .. }
            | StarlarkNode::Raw(_) => false,
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Arg>) -> Self {
        StarlarkNode::Call {
            name: name.into(),
            args,
        }
    }

    pub fn expr(lhs: StarlarkNode, op: impl Into<String>, rhs: StarlarkNode) -> Self {
        StarlarkNode::Expr {
            lhs: Box::new(lhs),
            op: op.into(),
            rhs: Box::new(rhs),
        }
    }

    /// `lhs + rhs`, collapsing to the non-empty side when one side is empty
    pub fn concat(lhs: StarlarkNode, rhs: StarlarkNode) -> Self {
        match (lhs.is_empty(), rhs.is_empty()) {
            (true, true) => StarlarkNode::Empty,
            (true, false) => rhs,
            (false, true) => lhs,
            (false, false) => StarlarkNode::expr(lhs, "+", rhs),
        }
    }

    /// `select({...})` over the given branches, in order
    pub fn select(branches: Vec<(String, StarlarkNode)>) -> Self {
        StarlarkNode::call("select", vec![Arg::Positional(StarlarkNode::Dict(branches))])
    }
}

/// The default branch key of a `select`
pub const DEFAULT_CONDITION: &str = "//conditions:default";

/// Conversion into a Starlark node
pub trait ToStarlark {
    fn to_starlark(&self) -> StarlarkNode;
}

impl<T: ToStarlark + ?Sized> ToStarlark for &T {
    fn to_starlark(&self) -> StarlarkNode {
        (**self).to_starlark()
    }
}

impl ToStarlark for StarlarkNode {
    fn to_starlark(&self) -> StarlarkNode {
        self.clone()
    }
}

impl ToStarlark for str {
    fn to_starlark(&self) -> StarlarkNode {
        StarlarkNode::Str(self.to_string())
    }
}

impl ToStarlark for String {
    fn to_starlark(&self) -> StarlarkNode {
        StarlarkNode::Str(self.clone())
    }
}

impl ToStarlark for bool {
    fn to_starlark(&self) -> StarlarkNode {
        StarlarkNode::Bool(*self)
    }
}

impl ToStarlark for i64 {
    fn to_starlark(&self) -> StarlarkNode {
        StarlarkNode::Int(*self)
    }
}

impl<T: ToStarlark> ToStarlark for Option<T> {
    fn to_starlark(&self) -> StarlarkNode {
        match self {
            Some(value) => value.to_starlark(),
            None => StarlarkNode::Empty,
        }
    }
}

impl<T: ToStarlark> ToStarlark for [T] {
    fn to_starlark(&self) -> StarlarkNode {
        if self.is_empty() {
            return StarlarkNode::Empty;
        }
        StarlarkNode::List(self.iter().map(ToStarlark::to_starlark).collect())
    }
}

impl<T: ToStarlark> ToStarlark for Vec<T> {
    fn to_starlark(&self) -> StarlarkNode {
        self.as_slice().to_starlark()
    }
}

impl<T: ToStarlark> ToStarlark for BTreeMap<String, T> {
    fn to_starlark(&self) -> StarlarkNode {
        if self.is_empty() {
            return StarlarkNode::Empty;
        }
        StarlarkNode::Dict(
            self.iter()
                .map(|(key, value)| (key.clone(), value.to_starlark()))
                .collect(),
        )
    }
}

/// Constraint label Bazel uses for a platform's operating system
fn platform_condition(platform: Platform) -> String {
    format!("@platforms//os:{}", platform.bazel_name())
}

/// A basic value renders as itself; per-platform values render as a
/// `select` keyed by operating system with an empty default branch.
impl<T: ToStarlark> ToStarlark for AttrSet<Vec<T>> {
    fn to_starlark(&self) -> StarlarkNode {
        match self {
            AttrSet::Basic(value) => value.to_starlark(),
            AttrSet::Multi(values) => {
                let mut branches: Vec<(String, StarlarkNode)> = Platform::ALL
                    .into_iter()
                    .filter_map(|platform| {
                        let value = values.get(platform)?;
                        Some((platform_condition(platform), value.to_starlark()))
                    })
                    .filter(|(_, node)| !node.is_empty())
                    .collect();
                if branches.is_empty() {
                    return StarlarkNode::Empty;
                }
                branches.push((DEFAULT_CONDITION.to_string(), StarlarkNode::List(Vec::new())));
                StarlarkNode::select(branches)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podgen_spec::MultiPlatform;

    #[test]
    fn test_empty_collections_become_empty_node() {
        assert_eq!(Vec::<String>::new().to_starlark(), StarlarkNode::Empty);
        assert_eq!(BTreeMap::<String, String>::new().to_starlark(), StarlarkNode::Empty);
        assert_eq!(None::<String>.to_starlark(), StarlarkNode::Empty);
    }

    #[test]
    fn test_concat_drops_empty_sides() {
        let list = vec!["a".to_string()].to_starlark();
        assert_eq!(StarlarkNode::concat(StarlarkNode::Empty, list.clone()), list);
        assert_eq!(StarlarkNode::concat(list.clone(), StarlarkNode::Empty), list);
        assert_eq!(
            StarlarkNode::concat(StarlarkNode::Empty, StarlarkNode::Empty),
            StarlarkNode::Empty
        );
        assert!(matches!(
            StarlarkNode::concat(list.clone(), list),
            StarlarkNode::Expr { .. }
        ));
    }

    #[test]
    fn test_is_empty() {
        assert!(StarlarkNode::Str(String::new()).is_empty());
        assert!(StarlarkNode::Lines(vec![StarlarkNode::Empty]).is_empty());
        assert!(!StarlarkNode::Bool(false).is_empty());
        assert!(!StarlarkNode::Int(0).is_empty());
        assert!(!StarlarkNode::call("f", vec![]).is_empty());
    }

    #[test]
    fn test_basic_attr_set_renders_value() {
        let attr = AttrSet::basic(vec!["COCOAPODS".to_string()]);
        assert_eq!(
            attr.to_starlark(),
            StarlarkNode::List(vec![StarlarkNode::Str("COCOAPODS".to_string())])
        );
    }

    #[test]
    fn test_multi_attr_set_renders_select() {
        let attr = AttrSet::multi(MultiPlatform {
            ios: Some(vec!["UIKit".to_string()]),
            osx: Some(Vec::new()),
            ..Default::default()
        });
        assert_eq!(
            attr.to_starlark(),
            StarlarkNode::select(vec![
                (
                    "@platforms//os:ios".to_string(),
                    StarlarkNode::List(vec![StarlarkNode::Str("UIKit".to_string())])
                ),
                (DEFAULT_CONDITION.to_string(), StarlarkNode::List(vec![])),
            ])
        );
    }
}
