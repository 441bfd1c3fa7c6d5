use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

mod commands;

/// Bazel BUILD file generator for CocoaPods podspecs.
///
/// Reads a JSON podspec and writes a BUILD file with rules_ios and
/// rules_apple targets for the selected platforms and subspecs.
///
/// EXAMPLES:
///     podgen generate Kit.podspec.json                    Print the BUILD file
///     podgen generate Kit.podspec.json -o BUILD.bazel     Write the BUILD file
///     podgen subspecs Kit.podspec.json                    List subspecs
///
/// ENVIRONMENT VARIABLES:
///     PODGEN_PLATFORMS      Comma separated platforms (overrides podgen.toml)
///     PODGEN_DEPS_PREFIX    Label prefix of other pods
///     PODGEN_LINK_DYNAMIC   Set to 'true' to link frameworks dynamically
///     RUST_LOG              Log filter, e.g. 'podgen_build=debug'
#[derive(Parser)]
#[command(name = "podgen")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a BUILD file from a podspec
    ///
    /// Flags override podgen.toml and PODGEN_* variables.
    ///
    /// EXAMPLES:
    ///     podgen generate Kit.podspec.json --platform ios --platform osx
    ///     podgen generate Kit.podspec.json --subspec Core --deps-prefix //Vendor
    ///     podgen generate Kit.podspec.json --user-option "Kit.testonly = true"
    #[command(visible_alias = "g")]
    Generate {
        /// Path to the JSON podspec
        podspec: PathBuf,
        /// Platform to generate targets for (repeatable)
        #[arg(long = "platform", short = 'p')]
        platforms: Vec<String>,
        /// Subspec to include (repeatable)
        #[arg(long = "subspec", short = 's')]
        subspecs: Vec<String>,
        /// Label prefix of other pods
        #[arg(long)]
        deps_prefix: Option<String>,
        /// Directory podspec paths are relative to (default: podspec directory)
        #[arg(long)]
        pod_root: Option<PathBuf>,
        /// Target transform, `<target>.<key> <op> <values>` (repeatable)
        #[arg(long = "user-option", short = 'u')]
        user_options: Vec<String>,
        /// Link frameworks dynamically
        #[arg(long)]
        link_dynamic: bool,
        /// Warn about source patterns that match no file
        #[arg(long)]
        verify_sources: bool,
        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Verbose logging
        #[arg(long, short = 'v')]
        verbose: bool,
    },

    /// List the subspecs of a podspec
    ///
    /// EXAMPLES:
    ///     podgen subspecs Kit.podspec.json
    ///     podgen subspecs Kit.podspec.json --json
    Subspecs {
        /// Path to the JSON podspec
        podspec: PathBuf,
        /// Output as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     podgen completions bash > ~/.bash_completions/podgen.bash
    ///     podgen completions zsh > ~/.zfunc/_podgen
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Logs go to stderr so a BUILD file printed to stdout stays clean
fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("podgen_build=debug,podgen_spec=debug,podgen_cli=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            podspec,
            platforms,
            subspecs,
            deps_prefix,
            pod_root,
            user_options,
            link_dynamic,
            verify_sources,
            output,
            verbose,
        } => {
            setup_tracing(verbose);
            let args = commands::generate::GenerateArgs {
                podspec,
                platforms,
                subspecs,
                deps_prefix,
                pod_root,
                user_options,
                link_dynamic,
                verify_sources,
                output,
                project_dir: std::env::current_dir()?,
            };
            commands::generate::run(args)?;
        }
        Commands::Subspecs { podspec, json } => {
            setup_tracing(false);
            commands::subspecs::run(commands::subspecs::SubspecsArgs { podspec, json })?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}
