//! Provider traits for reconciliation
//!
//! These traits allow the declarative crate to be used without depending on
//! a specific terminal UI or config file format.

use crate::package_list::PackageList;
use crate::types::{InstallOutcome, ReconcileSummary};
use anyhow::Result;

/// Progress callback for reconciliation
///
/// Implement this trait to receive progress updates during a run.
pub trait ProgressCallback {
    /// Called once before the first package, with the number of packages
    fn on_start(&mut self, total: usize);

    /// Called when a package starts reconciling
    fn on_package_start(&mut self, name: &str);

    /// Called when a package finishes, with its outcome
    fn on_package_complete(&mut self, name: &str, outcome: &InstallOutcome);

    /// Called once after the last package
    fn on_complete(&mut self, summary: &ReconcileSummary);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_start(&mut self, _total: usize) {}
    fn on_package_start(&mut self, _name: &str) {}
    fn on_package_complete(&mut self, _name: &str, _outcome: &InstallOutcome) {}
    fn on_complete(&mut self, _summary: &ReconcileSummary) {}
}

/// Persistence target for the package list
///
/// The reconciler calls `save` after every successful install that added a
/// name, so an interrupted run leaves the stored list consistent with the
/// installs completed so far.
pub trait PackageStore {
    fn save(&mut self, list: &PackageList) -> Result<()>;
}

/// In-memory store that records every saved snapshot
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub snapshots: Vec<PackageList>,
}

#[cfg(test)]
impl PackageStore for MemoryStore {
    fn save(&mut self, list: &PackageList) -> Result<()> {
        self.snapshots.push(list.clone());
        Ok(())
    }
}
