//! Package manager detection and backend selection.

use crate::backend::command::CommandBackend;
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::manager::ManagerKind;
use std::sync::Arc;

/// Detect the package manager to use on this host.
///
/// Walks [`ManagerKind::DETECTION_ORDER`] and returns the first manager whose
/// binary is on `PATH`. AUR helpers come before pacman so AUR packages work.
pub fn detect(env: &dyn Environment) -> Option<ManagerKind> {
    let found = ManagerKind::DETECTION_ORDER
        .into_iter()
        .find(|kind| env.command_exists(kind.binary()));

    match found {
        Some(kind) => log::debug!("Detected package manager: {}", kind.id()),
        None => log::debug!("No supported package manager detected"),
    }
    found
}

/// Build the backend for this run.
///
/// A `forced` manager skips detection entirely; whether its binary exists is
/// checked later through [`crate::ManagerBackend::ensure_usable`].
pub fn select_backend(env: Arc<dyn Environment>, forced: Option<ManagerKind>) -> Result<CommandBackend> {
    let kind = match forced {
        Some(kind) => {
            log::debug!("Using forced package manager: {}", kind.id());
            kind
        }
        None => detect(env.as_ref()).ok_or_else(|| Error::NoManagerDetected {
            tried: ManagerKind::DETECTION_ORDER
                .iter()
                .map(ManagerKind::binary)
                .collect::<Vec<_>>()
                .join(", "),
        })?,
    };
    Ok(CommandBackend::new(kind, env))
}
