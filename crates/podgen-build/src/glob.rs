//! Glob pattern algebra
//!
//! A [`Glob`] is a tree of include and exclude entries. Leaves are ordered
//! sets of file patterns; inner nodes are nested globs, which is how an
//! exclude is scoped to the patterns it was declared next to. Globs are
//! rendered lazily as Bazel `glob(...)` calls and only resolved against the
//! disk for the optional source check.

use crate::matcher::PatternMatcher;
use crate::options::BuildOptions;
use crate::starlark::{Arg, StarlarkNode, ToStarlark};
use podgen_spec::Monoid;
use std::collections::BTreeSet;

/// Ordered set of file patterns
pub type FileSet = BTreeSet<String>;

/// One include or exclude entry of a glob
#[derive(Debug, Clone)]
pub enum GlobEntry {
    Files(FileSet),
    Nested(Glob),
}

/// Bazel glob with nested include and exclude entries
#[derive(Debug, Clone)]
pub struct Glob {
    pub include: Vec<GlobEntry>,
    pub exclude: Vec<GlobEntry>,
    /// Whether directories are left out of the matches (Bazel's default)
    pub exclude_directories: bool,
}

impl Default for Glob {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            exclude_directories: true,
        }
    }
}

/// Two empty entries are equal whatever their shape
impl PartialEq for GlobEntry {
    fn eq(&self, other: &Self) -> bool {
        if self.is_empty() && other.is_empty() {
            return true;
        }
        match (self, other) {
            (GlobEntry::Files(lhs), GlobEntry::Files(rhs)) => lhs == rhs,
            (GlobEntry::Nested(lhs), GlobEntry::Nested(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.include == other.include
            && self.exclude == other.exclude
            && self.exclude_directories == other.exclude_directories
    }
}

impl GlobEntry {
    /// Entry holding the given patterns
    pub fn files<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GlobEntry::Files(patterns.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            GlobEntry::Files(files) => files.is_empty(),
            GlobEntry::Nested(glob) => glob.is_empty(),
        }
    }

    pub fn simplify(&self) -> GlobEntry {
        match self {
            GlobEntry::Files(files) => GlobEntry::Files(files.clone()),
            GlobEntry::Nested(glob) => glob.simplify_entry(),
        }
    }

    fn resolve_set(&self, options: &BuildOptions, matcher: &dyn PatternMatcher) -> FileSet {
        match self {
            GlobEntry::Files(patterns) => patterns
                .iter()
                .flat_map(|pattern| matcher.match_pattern(&options.absolute_path(pattern)))
                .collect(),
            GlobEntry::Nested(glob) => glob.resolve_set(options, matcher),
        }
    }
}

impl ToStarlark for GlobEntry {
    fn to_starlark(&self) -> StarlarkNode {
        match self {
            GlobEntry::Files(files) => files.iter().collect::<Vec<_>>().to_starlark(),
            GlobEntry::Nested(glob) => glob.to_starlark(),
        }
    }
}

fn entries_empty(entries: &[GlobEntry]) -> bool {
    entries.iter().all(GlobEntry::is_empty)
}

fn simplify_entries(entries: &[GlobEntry]) -> Vec<GlobEntry> {
    entries
        .iter()
        .map(GlobEntry::simplify)
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn entries_to_starlark(entries: &[GlobEntry]) -> StarlarkNode {
    entries
        .iter()
        .map(ToStarlark::to_starlark)
        .fold(StarlarkNode::Empty, StarlarkNode::concat)
}

impl Glob {
    /// Glob over raw entries, without simplification
    pub fn new(include: Vec<GlobEntry>, exclude: Vec<GlobEntry>) -> Self {
        Self {
            include,
            exclude,
            ..Self::default()
        }
    }

    /// Glob over plain pattern lists
    pub fn from_patterns<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = String>,
        E: IntoIterator<Item = String>,
    {
        let include = GlobEntry::files(include);
        let exclude = GlobEntry::files(exclude);
        Self::new(
            vec![include].into_iter().filter(|e| !e.is_empty()).collect(),
            vec![exclude].into_iter().filter(|e| !e.is_empty()).collect(),
        )
    }

    /// Keep directories in the matches
    pub fn with_directories(mut self) -> Self {
        self.exclude_directories = false;
        self
    }

    /// Empty when nothing is included or everything included is excluded
    pub fn is_empty(&self) -> bool {
        entries_empty(&self.include) || self.include == self.exclude
    }

    pub fn has_excludes(&self) -> bool {
        !entries_empty(&self.exclude)
    }

    /// Normal form of the glob; `g.simplify().simplify() == g.simplify()`
    pub fn simplify(&self) -> Glob {
        match self.simplify_entry() {
            GlobEntry::Nested(glob) => glob,
            GlobEntry::Files(files) => Glob {
                include: vec![GlobEntry::Files(files)]
                    .into_iter()
                    .filter(|e| !e.is_empty())
                    .collect(),
                exclude: Vec::new(),
                exclude_directories: self.exclude_directories,
            },
        }
    }

    fn simplify_entry(&self) -> GlobEntry {
        let include = simplify_entries(&self.include);
        let exclude = simplify_entries(&self.exclude);

        // Flattening would widen the scope of the excludes
        if !exclude.is_empty() {
            return GlobEntry::Nested(Glob {
                include,
                exclude,
                exclude_directories: self.exclude_directories,
            });
        }

        let mut files = FileSet::new();
        let mut globs = Vec::new();
        for entry in include {
            match entry {
                GlobEntry::Files(patterns) => files.extend(patterns),
                nested @ GlobEntry::Nested(_) => globs.push(nested),
            }
        }

        if globs.is_empty() && self.exclude_directories {
            return GlobEntry::Files(files);
        }
        if !files.is_empty() {
            globs.push(GlobEntry::Files(files));
        }
        GlobEntry::Nested(Glob {
            include: globs,
            exclude: Vec::new(),
            exclude_directories: self.exclude_directories,
        })
    }

    /// Union of two globs.
    ///
    /// # Panics
    ///
    /// When either operand has excludes: the union of two scoped excludes
    /// cannot be expressed as one glob without changing what it matches.
    pub fn combine(self, other: Glob) -> Glob {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        if self.has_excludes() || other.has_excludes() {
            panic!("cannot combine globs with excludes: {:?} and {:?}", self, other);
        }
        let mut include = self.include;
        include.extend(other.include);
        Glob {
            include,
            exclude: Vec::new(),
            exclude_directories: self.exclude_directories && other.exclude_directories,
        }
    }

    /// Files on disk matched by the glob, relative paths resolved against
    /// the pod root
    pub fn resolve_set(&self, options: &BuildOptions, matcher: &dyn PatternMatcher) -> FileSet {
        let include: FileSet = self
            .include
            .iter()
            .flat_map(|entry| entry.resolve_set(options, matcher))
            .collect();
        let exclude: FileSet = self
            .exclude
            .iter()
            .flat_map(|entry| entry.resolve_set(options, matcher))
            .collect();
        include.difference(&exclude).cloned().collect()
    }
}

impl Monoid for Glob {
    fn empty() -> Self {
        Glob::default()
    }

    fn combine(self, other: Self) -> Self {
        Glob::combine(self, other)
    }
}

impl ToStarlark for Glob {
    fn to_starlark(&self) -> StarlarkNode {
        if self.is_empty() {
            return StarlarkNode::Empty;
        }
        let mut args = vec![Arg::Positional(entries_to_starlark(&self.include))];
        if self.has_excludes() {
            args.push(Arg::Named("exclude".to_string(), entries_to_starlark(&self.exclude)));
        }
        if !self.exclude_directories {
            args.push(Arg::named("exclude_directories", 0i64));
        }
        StarlarkNode::call("glob", args)
    }
}

/// Expand `{a,b}` alternatives; Bazel globs do not support them
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0;
    let mut close = None;
    let mut splits = Vec::new();
    for (index, c) in pattern[open..].char_indices() {
        let index = open + index;
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(index);
                    break;
                }
            }
            ',' if depth == 1 => splits.push(index),
            _ => {}
        }
    }
    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let mut bounds = vec![open];
    bounds.extend(splits);
    bounds.push(close);

    let mut expanded = Vec::new();
    for window in bounds.windows(2) {
        let alternative = &pattern[window[0] + 1..window[1]];
        for candidate in expand_braces(&format!("{}{}{}", prefix, alternative, suffix)) {
            if !expanded.contains(&candidate) {
                expanded.push(candidate);
            }
        }
    }
    expanded
}

/// Expand a manifest pattern into Bazel patterns for the given extensions.
///
/// Directory patterns get `/**/*.<ext>` appended, open-ended file names get
/// `.<ext>`, and patterns naming another extension are dropped. With no
/// extensions the brace-expanded patterns are returned unchanged.
pub fn expand_pattern(pattern: &str, file_types: &[&str]) -> Vec<String> {
    let mut expanded = Vec::new();
    for candidate in expand_braces(pattern) {
        for typed in with_file_types(&candidate, file_types) {
            if !expanded.contains(&typed) {
                expanded.push(typed);
            }
        }
    }
    expanded
}

fn with_file_types(pattern: &str, file_types: &[&str]) -> Vec<String> {
    if file_types.is_empty() {
        return vec![pattern.to_string()];
    }
    let pattern = pattern.trim_end_matches('/');
    let last = pattern.rsplit('/').next().unwrap_or(pattern);

    if last == "**" {
        return file_types.iter().map(|ext| format!("{}/*.{}", pattern, ext)).collect();
    }
    if let Some(base) = pattern.strip_suffix(".*").filter(|_| last.len() > 2) {
        return file_types.iter().map(|ext| format!("{}.{}", base, ext)).collect();
    }
    if last.ends_with('*') {
        return file_types.iter().map(|ext| format!("{}.{}", pattern, ext)).collect();
    }
    match last.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => {
            if file_types.contains(&extension) {
                vec![pattern.to_string()]
            } else {
                Vec::new()
            }
        }
        _ => file_types
            .iter()
            .map(|ext| format!("{}/**/*.{}", pattern, ext))
            .collect(),
    }
}
