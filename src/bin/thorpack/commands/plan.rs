//! `thorpack plan` command
//!
//! Resolves dependencies, validates the compiler and prints the configure
//! invocation without running any toolchain step.

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::PlanArgs;
use crate::GlobalOptions;
use thorpack::builder::toolchain::detect_toolchain;
use thorpack::core::dependency::DependencySet;
use thorpack::ops::package::{PackageOptions, Pipeline};
use thorpack::util::process::SystemRunner;
use thorpack::util::GlobalContext;

pub fn execute(args: PlanArgs, global: &GlobalOptions) -> Result<()> {
    let shell = global.shell(args.json);
    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();

    let resolver = super::resolver(&ctx, &config, &args.resolve, &shell);
    let toolchain = detect_toolchain(&super::toolchain_settings(&config, &args.toolchain))?;

    let opts = PackageOptions {
        source_dir: ctx.source_dir(),
        build_dir: ctx.build_dir(),
        package_root: super::dir_or(&ctx, args.package_root.as_deref(), ctx.package_dir()),
        make: PathBuf::from("make"),
        build: super::build_options(&config, &args.build)?,
        strict: config.strict(),
    };

    let runner = SystemRunner::default();
    let plan = Pipeline::new(&shell, &resolver, &toolchain, &runner)
        .plan(&DependencySet::required(), &opts)?;

    let fingerprint = plan.invocation.fingerprint();

    if shell.is_json() {
        let dependencies: serde_json::Map<String, serde_json::Value> = plan
            .resolved
            .iter()
            .filter_map(|dep| {
                dep.resolved_root()
                    .map(|root| (dep.name().to_string(), root.display().to_string().into()))
            })
            .collect();
        let env: serde_json::Map<String, serde_json::Value> = plan
            .invocation
            .env
            .iter()
            .map(|(key, value)| (key.clone(), value.clone().into()))
            .collect();

        shell.json_event(&serde_json::json!({
            "standard": plan.standard.generation(),
            "dependencies": dependencies,
            "args": plan.invocation.args,
            "env": env,
            "fingerprint": fingerprint,
        }));
        return Ok(());
    }

    shell.note(format!("C++{} toolchain, fingerprint {}", plan.standard.generation(), fingerprint));
    for (key, value) in &plan.invocation.env {
        println!("{}={}", key, value);
    }
    for arg in &plan.invocation.args {
        println!("{}", arg);
    }

    Ok(())
}
