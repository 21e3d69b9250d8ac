use clap::{Parser, Subcommand};
use clap_complete::Shell;
use pkgkit::ManagerKind;

#[derive(Parser)]
#[command(name = "confix")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Install the packages listed in your package file", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Package file to use instead of the default location
    #[arg(short, long, global = true, value_name = "FILE")]
    pub file: Option<String>,

    /// Package manager to use instead of detecting one
    #[arg(short, long, global = true, env = "CONFIX_MANAGER", value_name = "MANAGER")]
    pub manager: Option<ManagerKind>,

    /// Parallel jobs for installed checks (installs always run one at a time)
    #[arg(short, long, global = true, default_value_t = 1, value_name = "JOBS")]
    pub jobs: usize,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Install every listed package that is missing (default)
    Sync(SyncArgs),

    /// Show whether a package is installed
    Check {
        /// Package name
        name: String,
    },

    /// Install packages and add them to the package file
    Install {
        /// Package names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Sort the package file alphabetically
    Sort,

    /// Show installed, missing and unavailable packages without installing
    Status,

    /// Show the package manager and package file that would be used
    Detect,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Default)]
pub struct SyncArgs {
    /// Print one JSON object per package instead of styled output
    #[arg(long)]
    pub json: bool,
}
