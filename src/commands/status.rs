use anyhow::Result;
use colored::Colorize;
use declarative::{PackageState, Reconciler};
use pkgkit::ManagerBackend;

use crate::Context;
use crate::paths;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let file = ctx.package_file()?;
    let list = file.load()?;
    let backend = ctx.backend()?;

    let states = Reconciler::new(&backend)
        .with_options(ctx.options())
        .plan(&list)?;

    ui::header("Package Status");
    ui::kv("File", &paths::display_path(ctx.env.as_ref(), file.path()));
    ui::kv("Manager", backend.kind().display_name());
    println!();

    for (name, state) in &states {
        ui::state(name, *state);
    }

    let counts = StateCounts::from_states(&states);
    println!();
    println!(
        "  {} total, {} installed, {} missing, {} not available",
        states.len().to_string().bold(),
        counts.installed.to_string().green(),
        if counts.missing > 0 {
            counts.missing.to_string().yellow()
        } else {
            counts.missing.to_string().dimmed()
        },
        if counts.unavailable > 0 {
            counts.unavailable.to_string().red()
        } else {
            counts.unavailable.to_string().dimmed()
        },
    );
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct StateCounts {
    installed: usize,
    missing: usize,
    unavailable: usize,
}

impl StateCounts {
    fn from_states(states: &[(String, PackageState)]) -> Self {
        let mut counts = Self::default();
        for (_, state) in states {
            match state {
                PackageState::Installed => counts.installed += 1,
                PackageState::Missing => counts.missing += 1,
                PackageState::Unavailable => counts.unavailable += 1,
            }
        }
        counts
    }
}
