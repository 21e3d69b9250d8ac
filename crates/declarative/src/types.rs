//! Core types for declarative package reconciliation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of reconciling a single package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InstallOutcome {
    /// Package was already present, nothing done
    AlreadyInstalled,
    /// Package was installed by this run
    Installed,
    /// Install was attempted and failed
    InstallFailed { reason: String },
    /// Package does not exist in any configured repository
    NotAvailable,
}

impl InstallOutcome {
    /// Check if the outcome represents a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::InstallFailed { .. } | Self::NotAvailable)
    }

    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlreadyInstalled => "already installed",
            Self::Installed => "installed",
            Self::InstallFailed { .. } => "failed",
            Self::NotAvailable => "not available",
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstallFailed { reason } => write!(f, "failed: {reason}"),
            other => f.write_str(other.label()),
        }
    }
}

/// One entry of the outcome stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: InstallOutcome,
}

impl PackageReport {
    pub fn new(name: impl Into<String>, outcome: InstallOutcome) -> Self {
        Self {
            name: name.into(),
            outcome,
        }
    }
}

/// Installed state of a package, as seen without changing anything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageState {
    /// Present on the system
    Installed,
    /// Absent and installable (or not checkable)
    Missing,
    /// Absent and the backend reports it does not exist upstream
    Unavailable,
}

/// Summary of reconciliation results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    pub already_installed: usize,
    pub installed: usize,
    pub failed: usize,
    pub not_available: usize,
}

impl ReconcileSummary {
    /// Build a summary from a finished outcome stream
    pub fn from_reports(reports: &[PackageReport]) -> Self {
        let mut summary = Self::default();
        for report in reports {
            summary.add_outcome(&report.outcome);
        }
        summary
    }

    /// Total number of packages processed
    pub fn total(&self) -> usize {
        self.already_installed + self.installed + self.failed + self.not_available
    }

    /// Check if every package ended up installed
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.not_available == 0
    }

    /// Add an outcome to the summary
    pub fn add_outcome(&mut self, outcome: &InstallOutcome) {
        match outcome {
            InstallOutcome::AlreadyInstalled => self.already_installed += 1,
            InstallOutcome::Installed => self.installed += 1,
            InstallOutcome::InstallFailed { .. } => self.failed += 1,
            InstallOutcome::NotAvailable => self.not_available += 1,
        }
    }
}

/// Options for reconciliation
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Number of parallel jobs for installed-state queries
    ///
    /// Installs always run one at a time.
    pub jobs: usize,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self { jobs: 1 }
    }
}
