//! `thorpack info` command
//!
//! Prints the recipe and the manifest a consumer would receive for a
//! package root. The manifest is static; nothing is read from disk.

use anyhow::Result;

use crate::cli::InfoArgs;
use crate::GlobalOptions;
use thorpack::core::library::LogicalLibrary;
use thorpack::core::manifest::PackageManifest;
use thorpack::core::recipe::PackageRecipe;
use thorpack::util::GlobalContext;

pub fn execute(args: InfoArgs, global: &GlobalOptions) -> Result<()> {
    let shell = global.shell(args.json);
    let ctx = GlobalContext::new()?;

    let recipe = PackageRecipe::thors_mongo();
    let root = super::dir_or(&ctx, args.package_root.as_deref(), ctx.package_dir());
    let manifest = PackageManifest::for_root(&root);

    if shell.is_json() {
        shell.json_event(&serde_json::json!({
            "recipe": recipe,
            "manifest": manifest,
        }));
        return Ok(());
    }

    println!("{}", recipe.reference());
    println!("  {}", recipe.description);
    println!("  license:  {}", recipe.license);
    println!("  homepage: {}", recipe.homepage);
    println!("  topics:   {}", recipe.topics.join(", "));
    println!();

    println!("Libraries:");
    for lib in LogicalLibrary::ALL {
        println!("  {:<14} {}", lib.base_name(), lib.description());
    }
    println!();

    println!("Manifest ({}):", manifest.root().display());
    for name in manifest.libraries() {
        println!("  lib      {}", name);
    }
    for dir in manifest.lib_dirs() {
        println!("  libdir   {}", dir.display());
    }
    for dir in manifest.search_include_dirs() {
        println!("  include  {}", dir.display());
    }

    Ok(())
}
