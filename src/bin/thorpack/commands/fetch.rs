//! `thorpack fetch` command

use anyhow::{Context, Result};
use url::Url;

use crate::cli::FetchArgs;
use crate::GlobalOptions;
use thorpack::core::recipe::PackageRecipe;
use thorpack::ops::source::{GitReference, SourceCheckout};
use thorpack::util::shell::Status;
use thorpack::util::GlobalContext;

pub fn execute(args: FetchArgs, global: &GlobalOptions) -> Result<()> {
    let shell = global.shell(false);
    let ctx = GlobalContext::new()?;
    let recipe = PackageRecipe::thors_mongo();

    let url = match args.url {
        Some(url) => Url::parse(&url).with_context(|| format!("invalid repository URL: {}", url))?,
        None => recipe.source_url()?,
    };
    let dest = super::dir_or(&ctx, args.dest.as_deref(), ctx.source_dir());
    let reference = GitReference::from_options(args.branch, args.tag, args.rev);

    shell.status(Status::Fetching, format!("{} from {}", recipe.reference(), url));
    let checkout = SourceCheckout::new(url, reference, dest);
    let commit = checkout.fetch()?;

    shell.status(
        Status::Fetched,
        format!("{} at {}", checkout.dest().display(), commit),
    );

    Ok(())
}
