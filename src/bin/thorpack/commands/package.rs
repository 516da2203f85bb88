//! `thorpack package` command

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::cli::PackageArgs;
use crate::GlobalOptions;
use thorpack::builder::toolchain::detect_toolchain;
use thorpack::core::dependency::DependencySet;
use thorpack::ops::package::{PackageOptions, Pipeline};
use thorpack::util::fs::remove_dir_all_if_exists;
use thorpack::util::process::{find_make, SystemRunner};
use thorpack::util::GlobalContext;

pub fn execute(args: PackageArgs, global: &GlobalOptions) -> Result<()> {
    let shell = global.shell(args.json);
    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();

    let source_dir = super::dir_or(&ctx, args.source.as_deref(), ctx.source_dir());
    if !source_dir.join("configure").is_file() {
        bail!(
            "no `configure` script in {}\n\
             \n\
             Run `thorpack fetch` first or pass --source <DIR>.",
            source_dir.display()
        );
    }

    let make = args
        .make
        .clone()
        .or_else(|| config.toolchain.make.clone())
        .or_else(find_make)
        .unwrap_or_else(|| PathBuf::from("make"));

    let resolver = super::resolver(&ctx, &config, &args.resolve, &shell);
    let toolchain = detect_toolchain(&super::toolchain_settings(&config, &args.toolchain))?;

    let opts = PackageOptions {
        source_dir,
        build_dir: super::dir_or(&ctx, args.build_dir.as_deref(), ctx.build_dir()),
        package_root: super::dir_or(&ctx, args.package_root.as_deref(), ctx.package_dir()),
        make,
        build: super::build_options(&config, &args.build)?,
        strict: args.strict || config.strict(),
    };

    if args.clean {
        remove_dir_all_if_exists(&opts.build_dir)?;
    }

    let runner = SystemRunner::new(shell.is_verbose());
    let result = Pipeline::new(&shell, &resolver, &toolchain, &runner)
        .run(&DependencySet::required(), &opts)?;

    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "fingerprint": result.plan.invocation.fingerprint(),
            "manifest": result.manifest,
        }));
    }

    Ok(())
}
