mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::New {
            catalog,
            root,
            params,
            skip_existing,
            dry_run,
            no_hooks,
            hook,
            manifest,
            interactive,
        } => commands::new::run(
            catalog,
            root,
            params,
            skip_existing,
            dry_run,
            no_hooks,
            hook,
            manifest,
            interactive,
        ),
        Commands::Check { catalog, params } => commands::check::run(catalog, params),
        Commands::Capture {
            dir,
            output,
            name,
            exclude,
        } => commands::capture::run(dir, output, name, exclude),
        Commands::Verify {
            catalog,
            root,
            params,
        } => commands::verify::run(catalog, root, params),
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env("SCAFFOLDER_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("scaffolder=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
