use anyhow::Result;

use crate::Context;
use crate::config::PackageFile;
use crate::paths;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let file = ctx.package_file()?;
    let shown = paths::display_path(ctx.env.as_ref(), file.path());

    if sort_file(&file)? {
        ui::success(&format!("Sorted {shown}"));
    } else if !ctx.quiet {
        ui::info(&format!("{shown} is already sorted"));
    }
    Ok(())
}

/// Sort the package file in place, writing only when the order changed
fn sort_file(file: &PackageFile) -> Result<bool> {
    let mut list = file.load()?;
    let changed = declarative::sort_list(&mut list);
    if changed {
        file.save(&list)?;
    }
    Ok(changed)
}
