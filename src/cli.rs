use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "scaffolder",
    about = "Materialize a project skeleton from a template catalog",
    version
)]
pub struct Cli {
    /// Log engine activity to stderr (or set SCAFFOLDER_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a new project from a catalog
    New {
        /// Catalog file (.toml, or .json)
        catalog: String,

        /// Target root directory; must not exist yet
        root: String,

        /// Set parameter values (can be repeated: -p key=value)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Allow an existing root and leave files already in it untouched
        #[arg(long)]
        skip_existing: bool,

        /// Show what would be created without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Skip the post-scaffold command
        #[arg(long)]
        no_hooks: bool,

        /// Post-scaffold command to run in the new root, replacing the catalog's
        #[arg(long, value_name = "COMMAND", conflicts_with = "no_hooks")]
        hook: Option<String>,

        /// Write the creation manifest as JSON to this file
        #[arg(long, value_name = "FILE")]
        manifest: Option<String>,

        /// Prompt for catalog parameters that were not given with -p
        #[arg(short, long)]
        interactive: bool,
    },

    /// Validate a catalog without writing anything
    Check {
        /// Catalog file to check
        catalog: String,

        /// Parameter values to check against (can be repeated)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Build a catalog from an existing directory tree
    Capture {
        /// Directory to capture
        dir: String,

        /// Write the catalog here instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Catalog name (default: the directory name)
        #[arg(long)]
        name: Option<String>,

        /// Extra glob patterns to leave out (can be repeated)
        #[arg(long, value_name = "GLOB")]
        exclude: Vec<String>,
    },

    /// Compare an existing tree with what a catalog would produce
    Verify {
        /// Catalog file
        catalog: String,

        /// Root of the tree to compare
        root: String,

        /// Parameter values (can be repeated: -p key=value)
        #[arg(short = 'p', long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },
}
