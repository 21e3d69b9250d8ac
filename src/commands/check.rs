use anyhow::Result;
use colored::Colorize;
use declarative::Reconciler;

use crate::Context;

pub fn run(ctx: &Context, name: &str) -> Result<()> {
    let installed = is_installed(ctx, name)?;
    if installed {
        println!("{} {} is installed", "✓".green(), name.bold());
    } else {
        println!("{} {} is not installed", "○".yellow(), name.bold());
    }
    Ok(())
}

/// Ask the backend about one package; the package file is not consulted
fn is_installed(ctx: &Context, name: &str) -> Result<bool> {
    let backend = ctx.backend()?;
    Ok(Reconciler::new(&backend).is_installed(name)?)
}
