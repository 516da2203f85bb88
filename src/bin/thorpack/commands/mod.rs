//! Command implementations

pub mod completions;
pub mod deps;
pub mod fetch;
pub mod info;
pub mod package;
pub mod plan;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::{BuildFlags, ResolveArgs, ToolchainArgs};
use thorpack::core::dependency::DependencySet;
use thorpack::core::recipe::BuildOptions;
use thorpack::core::variant::Profile;
use thorpack::ops::resolve::{ChainResolver, PrefixResolver, StaticResolver};
use thorpack::util::config::{Config, ToolchainSettings};
use thorpack::util::fs::absolutize;
use thorpack::util::shell::Shell;
use thorpack::util::GlobalContext;

/// Explicit roots from `--dep`, then `[dependencies]`, then the prefix.
pub fn resolver(
    ctx: &GlobalContext,
    config: &Config,
    args: &ResolveArgs,
    shell: &Shell,
) -> ChainResolver {
    let required = DependencySet::required();
    for (name, _) in &args.deps {
        if required.get(name).is_none() {
            shell.warn(format!("`{}` is not a dependency of this package; ignoring", name));
        }
    }

    let cwd = ctx.cwd();
    let mut chain = ChainResolver::new();

    let mut cli = StaticResolver::new();
    cli.extend(
        args.deps
            .iter()
            .map(|(name, root)| (name.clone(), absolutize(cwd, root))),
    );
    if !cli.is_empty() {
        chain = chain.push(cli);
    }

    let mut configured = StaticResolver::new();
    configured.extend(
        config
            .dependencies
            .iter()
            .map(|(name, root)| (name.clone(), absolutize(cwd, root))),
    );
    if !configured.is_empty() {
        chain = chain.push(configured);
    }

    if let Some(prefix) = args.prefix.as_ref().or(config.resolver.prefix.as_ref()) {
        chain = chain.push(PrefixResolver::new(absolutize(cwd, prefix)));
    }

    chain
}

/// Toolchain settings with CLI overrides applied.
pub fn toolchain_settings(config: &Config, args: &ToolchainArgs) -> ToolchainSettings {
    let mut settings = config.toolchain.clone();
    if args.cxx.is_some() {
        settings.cxx = args.cxx.clone();
    }
    if args.cppstd.is_some() {
        settings.cppstd = args.cppstd;
    }
    settings
}

/// Build options: CLI flags over config over defaults.
pub fn build_options(config: &Config, flags: &BuildFlags) -> Result<BuildOptions> {
    let mut options = config.build_options()?;
    if flags.static_libs {
        options.shared = false;
    }
    if flags.no_fpic {
        options.fpic = false;
    }
    if flags.debug {
        options.profile = Profile::Debug;
    }
    if flags.jobs.is_some() {
        options.jobs = flags.jobs;
    }
    Ok(options)
}

/// An explicit directory, or the context default, made absolute.
pub fn dir_or(ctx: &GlobalContext, explicit: Option<&Path>, default: PathBuf) -> PathBuf {
    match explicit {
        Some(dir) => absolutize(ctx.cwd(), dir),
        None => default,
    }
}
