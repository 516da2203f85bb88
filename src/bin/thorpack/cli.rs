//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;

use thorpack::core::language::CppStandard;
use thorpack::util::shell::ColorChoice;

/// thorpack - build and package the ThorsSerializer / ThorsMongo suite
#[derive(Parser)]
#[command(name = "thorpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (streams toolchain output)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the pinned third-party dependencies
    Deps(DepsArgs),

    /// Resolve dependencies and print the configure invocation
    Plan(PlanArgs),

    /// Check that the C++ compiler supports C++20
    Validate(ValidateArgs),

    /// Check out the package sources
    Fetch(FetchArgs),

    /// Run the full pipeline: resolve, configure, build, install
    Package(PackageArgs),

    /// Show the recipe and the consumption manifest
    Info(InfoArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Where dependency roots come from.
#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Explicit install root for a dependency (repeatable)
    #[arg(long = "dep", value_name = "NAME=ROOT", value_parser = parse_dep)]
    pub deps: Vec<(String, PathBuf)>,

    /// Directory holding `<name>-<version>` installs
    #[arg(long, value_name = "DIR", env = "THORPACK_PREFIX")]
    pub prefix: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct ToolchainArgs {
    /// C++ compiler to use
    #[arg(long, value_name = "PATH")]
    pub cxx: Option<PathBuf>,

    /// C++ standard to build with (e.g. 20, c++23)
    #[arg(long, value_name = "STD")]
    pub cppstd: Option<CppStandard>,
}

#[derive(Args, Debug, Default)]
pub struct BuildFlags {
    /// Build static archives instead of shared libraries
    #[arg(long = "static")]
    pub static_libs: bool,

    /// Build without position-independent code
    #[arg(long)]
    pub no_fpic: bool,

    /// Build the debug profile
    #[arg(long)]
    pub debug: bool,

    /// Number of parallel make jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct DepsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    #[command(flatten)]
    pub toolchain: ToolchainArgs,

    #[command(flatten)]
    pub build: BuildFlags,

    /// Install prefix (defaults to .thorpack/package)
    #[arg(long, value_name = "DIR")]
    pub package_root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub toolchain: ToolchainArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct FetchArgs {
    /// Checkout directory (defaults to .thorpack/source)
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Repository URL (defaults to the upstream repository)
    #[arg(long)]
    pub url: Option<String>,

    /// Git branch
    #[arg(long, conflicts_with_all = ["tag", "rev"])]
    pub branch: Option<String>,

    /// Git tag
    #[arg(long, conflicts_with = "rev")]
    pub tag: Option<String>,

    /// Git revision
    #[arg(long)]
    pub rev: Option<String>,
}

#[derive(Args)]
pub struct PackageArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    #[command(flatten)]
    pub toolchain: ToolchainArgs,

    #[command(flatten)]
    pub build: BuildFlags,

    /// Source tree containing `configure` (defaults to .thorpack/source)
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Build directory (defaults to .thorpack/build)
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Install prefix (defaults to .thorpack/package)
    #[arg(long, value_name = "DIR")]
    pub package_root: Option<PathBuf>,

    /// make executable
    #[arg(long, value_name = "PATH")]
    pub make: Option<PathBuf>,

    /// Verify the installed tree against the manifest
    #[arg(long)]
    pub strict: bool,

    /// Remove the build directory before configuring
    #[arg(long)]
    pub clean: bool,

    /// Output the manifest as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Package root to describe (defaults to .thorpack/package)
    #[arg(long, value_name = "DIR")]
    pub package_root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Parse `NAME=ROOT`.
fn parse_dep(s: &str) -> Result<(String, PathBuf), String> {
    let (name, root) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=ROOT, got `{}`", s))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing dependency name in `{}`", s));
    }
    if root.is_empty() {
        return Err(format!("missing root for `{}`", name));
    }

    Ok((name.to_string(), PathBuf::from(root)))
}
