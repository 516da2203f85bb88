//! thorpack CLI - packages the ThorsSerializer / ThorsMongo suite

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use thorpack::core::errors::PackageError;
use thorpack::util::diagnostic;
use thorpack::util::shell::{ColorChoice, Shell};

/// Flags shared by every subcommand.
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbose: bool,
    pub color: ColorChoice,
}

impl GlobalOptions {
    /// A shell for one command; `json` switches to machine-readable output.
    pub fn shell(&self, json: bool) -> Shell {
        Shell::from_flags(self.quiet, self.verbose, self.color, json)
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("thorpack=debug")
    } else if cli.quiet {
        EnvFilter::new("thorpack=error")
    } else {
        EnvFilter::new("thorpack=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global = GlobalOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color: cli.color,
    };

    if let Err(e) = run(cli.command, &global) {
        report(&e, &global);
        std::process::exit(1);
    }
}

fn run(command: Commands, global: &GlobalOptions) -> Result<()> {
    match command {
        Commands::Deps(args) => commands::deps::execute(args, global),
        Commands::Plan(args) => commands::plan::execute(args, global),
        Commands::Validate(args) => commands::validate::execute(args, global),
        Commands::Fetch(args) => commands::fetch::execute(args, global),
        Commands::Package(args) => commands::package::execute(args, global),
        Commands::Info(args) => commands::info::execute(args, global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

fn report(err: &anyhow::Error, global: &GlobalOptions) {
    let color = global.shell(false).use_color();
    match err.downcast_ref::<PackageError>() {
        Some(package_err) => diagnostic::emit(&package_err.to_diagnostic(), color),
        None => eprintln!("error: {:#}", err),
    }
}
