use anyhow::Result;
use declarative::{PackageReport, Reconciler};
use pkgkit::ManagerBackend;

use crate::Context;
use crate::paths;
use crate::progress::TerminalProgress;
use crate::ui;

pub fn run(ctx: &Context, names: &[String]) -> Result<()> {
    install(ctx, names)?;
    Ok(())
}

/// Install each package and add the successful ones to the package file
///
/// The file is rewritten after every newly installed package, so an
/// interrupted run keeps what it already installed.
fn install(ctx: &Context, names: &[String]) -> Result<Vec<PackageReport>> {
    let mut file = ctx.package_file()?;
    let mut list = file.load()?;
    let backend = ctx.backend()?;

    if !ctx.quiet {
        ui::header("Installing packages");
        ui::kv("File", &paths::display_path(ctx.env.as_ref(), file.path()));
        ui::kv("Manager", backend.kind().display_name());
        println!();
    }

    let before = list.len();
    let reports = Reconciler::new(&backend).install_and_remember(
        &mut list,
        names,
        &mut file,
        &mut TerminalProgress::new(ctx.quiet),
    )?;

    let added = list.len() - before;
    if added > 0 && !ctx.quiet {
        ui::info(&format!(
            "Added {added} package(s) to {}",
            paths::display_path(ctx.env.as_ref(), file.path())
        ));
    }
    Ok(reports)
}
