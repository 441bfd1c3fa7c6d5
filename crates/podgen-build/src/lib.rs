//! Bazel BUILD file generation for podspecs
//!
//! Provides the generation pipeline:
//! - Glob pattern algebra with scoped excludes
//! - Per-platform podspec analysis and result patches
//! - Bazel targets for rules_ios and rules_apple
//! - User transforms of generated targets
//! - Starlark syntax tree and deterministic rendering

pub mod analyzer;
pub mod build_file;
pub mod compiler;
pub mod error;
pub mod glob;
pub mod matcher;
pub mod options;
pub mod patch;
pub mod starlark;
pub mod target_name;
pub mod targets;
pub mod transform;

// Re-export main types
pub use analyzer::{Analyzer, AnalyzerResults};
pub use build_file::BuildFile;
pub use compiler::StarlarkCompiler;
pub use error::{BuildError, BuildResult};
pub use glob::{Glob, GlobEntry};
pub use matcher::{DiskMatcher, FixedMatcher, PatternMatcher};
pub use options::BuildOptions;
pub use patch::Patch;
pub use starlark::{Arg, StarlarkNode, ToStarlark};
pub use target_name::TargetName;
pub use targets::{BazelTarget, Target};
pub use transform::{parse_user_options, UserConfigurable, UserOption};

// Re-export podgen-spec types for convenience
pub use podgen_spec::{Platform, PodSpec};
