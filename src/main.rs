mod cli;
mod commands;
mod config;
mod jsonc;
mod paths;
mod progress;
#[cfg(test)]
mod testing;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, SyncArgs};
use config::{ConfigError, PackageFile};
use declarative::ReconcileOptions;
use pkgkit::{CommandBackend, Environment, ManagerKind, SystemEnv};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

/// Global context for the application
pub struct Context {
    pub env: Arc<dyn Environment>,
    /// Value of `--file`, before expansion
    pub file: Option<String>,
    /// Forced package manager, skipping detection
    pub manager: Option<ManagerKind>,
    pub jobs: usize,
    pub quiet: bool,
}

impl Context {
    /// Locate the package file for this run
    pub fn package_file(&self) -> Result<PackageFile, ConfigError> {
        PackageFile::locate(self.env.as_ref(), self.file.as_deref())
    }

    /// Pick the package manager backend for this run
    pub fn backend(&self) -> pkgkit::Result<CommandBackend> {
        pkgkit::select_backend(Arc::clone(&self.env), self.manager)
    }

    pub fn options(&self) -> ReconcileOptions {
        ReconcileOptions {
            jobs: self.jobs.max(1),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        env: Arc::new(SystemEnv),
        file: cli.file,
        manager: cli.manager,
        jobs: cli.jobs,
        quiet: cli.quiet,
    };

    ExitCode::from(exit_status(run(&ctx, cli.command)))
}

/// Report a failed run and map it to the process exit status
///
/// Per-package failures are part of a finished run and still exit 0; only
/// errors that stop the run exit 1.
fn exit_status(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            ui::error(&format!("{e:#}"));
            if let Some(cause) = e.chain().find_map(|c| c.downcast_ref::<pkgkit::Error>()) {
                ui::dim(cause.category().advice());
            }
            1
        }
    }
}

fn run(ctx: &Context, command: Option<Command>) -> Result<()> {
    match command.unwrap_or(Command::Sync(SyncArgs::default())) {
        Command::Sync(args) => commands::sync::run(ctx, &args),
        Command::Check { name } => commands::check::run(ctx, &name),
        Command::Install { names } => commands::install::run(ctx, &names),
        Command::Sort => commands::sort::run(ctx),
        Command::Status => commands::status::run(ctx),
        Command::Detect => commands::detect::run(ctx),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "confix", &mut io::stdout());
            Ok(())
        }
    }
}
