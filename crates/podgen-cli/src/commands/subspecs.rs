//! Subspecs command - list the subspecs a podspec declares

use anyhow::{Context, Result};
use podgen_spec::PodSpec;
use std::path::PathBuf;

pub struct SubspecsArgs {
    pub podspec: PathBuf,
    /// Output as a JSON array
    pub json: bool,
}

pub fn run(args: SubspecsArgs) -> Result<()> {
    let spec = PodSpec::from_file(&args.podspec)
        .with_context(|| format!("Failed to load podspec {}", args.podspec.display()))?;

    let names = subspec_names(&spec);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for name in names {
            println!("{}", name);
        }
    }
    Ok(())
}

/// Full names of every nested subspec, depth first
fn subspec_names(spec: &PodSpec) -> Vec<String> {
    spec.subspecs
        .iter()
        .flat_map(|subspec| {
            std::iter::once(subspec.full_name.clone()).chain(subspec_names(subspec))
        })
        .collect()
}
