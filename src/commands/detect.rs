use anyhow::Result;
use colored::Colorize;
use pkgkit::{ManagerBackend, ManagerKind};

use crate::Context;
use crate::config::{ConfigError, ConfigFormat};
use crate::paths;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    ui::header("Environment");

    let env = ctx.env.as_ref();
    match paths::resolve_package_file(env, ctx.file.as_deref()) {
        Ok(resolved) => {
            let format = ConfigFormat::from_path(&resolved.path);
            ui::kv(
                "Package file",
                &format!(
                    "{} {}",
                    paths::display_path(env, &resolved.path),
                    format!("({}, from {})", format.name(), resolved.source).dimmed()
                ),
            );
            if !resolved.path.is_file() {
                ui::warn("Package file does not exist");
            }
        }
        Err(ConfigError::NotFound { candidates }) => {
            ui::kv("Package file", &"not found".yellow().to_string());
            for candidate in &candidates {
                ui::dim(&format!("  looked for {}", paths::display_path(env, candidate)));
            }
        }
        Err(e) => return Err(e.into()),
    }

    let available: Vec<ManagerKind> = ManagerKind::DETECTION_ORDER
        .into_iter()
        .filter(|kind| env.command_exists(kind.binary()))
        .collect();
    if !available.is_empty() {
        let ids: Vec<&str> = available.iter().map(ManagerKind::id).collect();
        ui::kv("Found", &ids.join(", "));
    }

    let backend = ctx.backend()?;
    let how = if ctx.manager.is_some() { "forced" } else { "detected" };
    ui::kv(
        "Manager",
        &format!(
            "{} {}",
            backend.kind().display_name().bold(),
            format!("({how})").dimmed()
        ),
    );
    backend.ensure_usable()?;
    Ok(())
}
