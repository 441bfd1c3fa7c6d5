//! Platform-conditional attribute values
//!
//! A podspec attribute either applies to every platform or carries a value per
//! platform. [`AttrSet`] models both shapes and combines them with
//! [`AttrSet::combine`], which is associative and has [`AttrSet::empty`] as its
//! identity. Combining two basic values stays basic; a per-platform operand
//! promotes both sides so that
//! `a.combine(b).platform(p) == a.platform(p) ⊕ b.platform(p)` for every `p`.

use crate::platform::Platform;
use std::collections::BTreeMap;

/// A value with an identity and an associative combination
pub trait Monoid: Sized {
    /// The identity element
    fn empty() -> Self;

    /// Associative combination, `self` first
    fn combine(self, other: Self) -> Self;
}

impl<T> Monoid for Vec<T> {
    fn empty() -> Self {
        Vec::new()
    }

    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

/// Merge by key; on conflicting keys the right-hand value wins
impl<K: Ord, V> Monoid for BTreeMap<K, V> {
    fn empty() -> Self {
        BTreeMap::new()
    }

    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

/// Last non-empty string wins
impl Monoid for String {
    fn empty() -> Self {
        String::new()
    }

    fn combine(self, other: Self) -> Self {
        if other.is_empty() {
            self
        } else {
            other
        }
    }
}

/// Last `Some` wins
impl<T> Monoid for Option<T> {
    fn empty() -> Self {
        None
    }

    fn combine(self, other: Self) -> Self {
        other.or(self)
    }
}

fn combine_optional<T: Monoid>(lhs: Option<T>, rhs: Option<T>) -> Option<T> {
    match (lhs, rhs) {
        (None, None) => None,
        (Some(l), None) => Some(l),
        (None, Some(r)) => Some(r),
        (Some(l), Some(r)) => Some(l.combine(r)),
    }
}

/// One optional value per recognized platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPlatform<T> {
    pub ios: Option<T>,
    pub osx: Option<T>,
    pub tvos: Option<T>,
    pub watchos: Option<T>,
}

impl<T> MultiPlatform<T> {
    /// Build a value for every platform from a function
    pub fn from_fn(mut f: impl FnMut(Platform) -> Option<T>) -> Self {
        Self {
            ios: f(Platform::Ios),
            osx: f(Platform::Osx),
            tvos: f(Platform::Tvos),
            watchos: f(Platform::Watchos),
        }
    }

    /// Value for a platform, if present
    pub fn get(&self, platform: Platform) -> Option<&T> {
        match platform {
            Platform::Ios => self.ios.as_ref(),
            Platform::Osx => self.osx.as_ref(),
            Platform::Tvos => self.tvos.as_ref(),
            Platform::Watchos => self.watchos.as_ref(),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> MultiPlatform<U> {
        MultiPlatform {
            ios: self.ios.map(&mut f),
            osx: self.osx.map(&mut f),
            tvos: self.tvos.map(&mut f),
            watchos: self.watchos.map(&mut f),
        }
    }

    /// Whether no platform carries a value
    pub fn is_empty(&self) -> bool {
        self.ios.is_none() && self.osx.is_none() && self.tvos.is_none() && self.watchos.is_none()
    }
}

impl<T> Default for MultiPlatform<T> {
    fn default() -> Self {
        Self {
            ios: None,
            osx: None,
            tvos: None,
            watchos: None,
        }
    }
}

/// An attribute that is either shared by all platforms or set per platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrSet<T> {
    /// One value applied to every platform
    Basic(Option<T>),
    /// A value per platform
    Multi(MultiPlatform<T>),
}

impl<T> Default for AttrSet<T> {
    fn default() -> Self {
        AttrSet::Basic(None)
    }
}

impl<T> AttrSet<T> {
    /// The identity: no value on any platform
    pub fn empty() -> Self {
        AttrSet::Basic(None)
    }

    /// A value shared by every platform
    pub fn basic(value: T) -> Self {
        AttrSet::Basic(Some(value))
    }

    /// Per-platform values
    pub fn multi(values: MultiPlatform<T>) -> Self {
        AttrSet::Multi(values)
    }

    /// Whether the attribute has no value on any platform
    pub fn is_empty(&self) -> bool {
        match self {
            AttrSet::Basic(value) => value.is_none(),
            AttrSet::Multi(values) => values.is_empty(),
        }
    }

    /// Transform the contained values, keeping the basic/multi shape
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> AttrSet<U> {
        match self {
            AttrSet::Basic(value) => AttrSet::Basic(value.map(f)),
            AttrSet::Multi(values) => AttrSet::Multi(values.map(&mut f)),
        }
    }
}

impl<T: Clone> AttrSet<T> {
    /// Value for a platform: the platform value if set, else the basic value
    pub fn platform(&self, platform: Platform) -> Option<T> {
        match self {
            AttrSet::Basic(value) => value.clone(),
            AttrSet::Multi(values) => values.get(platform).cloned(),
        }
    }
}

impl<T: Clone + Monoid> AttrSet<T> {
    /// A root value extended by platform-specific values.
    ///
    /// Platforms without an override inherit the root value; platforms with
    /// one get `root ⊕ override`.
    pub fn with_platform_overrides(root: Option<T>, overrides: MultiPlatform<T>) -> Self {
        if overrides.is_empty() {
            return AttrSet::Basic(root);
        }
        let mut overrides = overrides;
        AttrSet::Multi(MultiPlatform::from_fn(|platform| {
            let value = match platform {
                Platform::Ios => overrides.ios.take(),
                Platform::Osx => overrides.osx.take(),
                Platform::Tvos => overrides.tvos.take(),
                Platform::Watchos => overrides.watchos.take(),
            };
            combine_optional(root.clone(), value)
        }))
    }

    /// Combine two attribute sets, `self` first
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (AttrSet::Basic(lhs), AttrSet::Basic(rhs)) => AttrSet::Basic(combine_optional(lhs, rhs)),
            (lhs, rhs) => AttrSet::Multi(MultiPlatform::from_fn(|platform| {
                combine_optional(lhs.platform(platform), rhs.platform(platform))
            })),
        }
    }
}

impl<T: Clone + Monoid> Monoid for AttrSet<T> {
    fn empty() -> Self {
        AttrSet::empty()
    }

    fn combine(self, other: Self) -> Self {
        AttrSet::combine(self, other)
    }
}
