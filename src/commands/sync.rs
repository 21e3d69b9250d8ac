use anyhow::Result;
use declarative::{PackageReport, Reconciler};
use pkgkit::ManagerBackend;

use crate::Context;
use crate::cli::SyncArgs;
use crate::paths;
use crate::progress::{JsonProgress, TerminalProgress};
use crate::ui;

pub fn run(ctx: &Context, args: &SyncArgs) -> Result<()> {
    reconcile(ctx, args.json)?;
    Ok(())
}

/// Load the package list and install whatever is missing
///
/// The package file is loaded before a backend is selected, so a broken
/// file never reaches the package manager.
fn reconcile(ctx: &Context, json: bool) -> Result<Vec<PackageReport>> {
    let file = ctx.package_file()?;
    let list = file.load()?;

    // Captured installs keep package manager chatter out of the JSON stream
    let backend = ctx.backend()?.with_captured_install(json);
    let reconciler = Reconciler::new(&backend).with_options(ctx.options());

    if json {
        return Ok(reconciler.reconcile(&list, &mut JsonProgress)?);
    }

    if !ctx.quiet {
        ui::header("Syncing packages");
        ui::kv("File", &paths::display_path(ctx.env.as_ref(), file.path()));
        ui::kv("Manager", backend.kind().display_name());
        println!();
    }
    let reports = reconciler.reconcile(&list, &mut TerminalProgress::new(ctx.quiet))?;
    Ok(reports)
}
