//! Progress reporting for reconciliation runs

use crate::ui;
use declarative::{InstallOutcome, PackageReport, ProgressCallback, ReconcileSummary};

/// Styled per-package output for interactive use
pub struct TerminalProgress {
    quiet: bool,
    total: usize,
    current: usize,
}

impl TerminalProgress {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            total: 0,
            current: 0,
        }
    }
}

impl ProgressCallback for TerminalProgress {
    fn on_start(&mut self, total: usize) {
        self.total = total;
        self.current = 0;
        if total == 0 && !self.quiet {
            ui::info("Package list is empty");
        }
    }

    fn on_package_start(&mut self, name: &str) {
        self.current += 1;
        if !self.quiet {
            ui::step(self.current, self.total, name);
        }
    }

    fn on_package_complete(&mut self, name: &str, outcome: &InstallOutcome) {
        // Failures are always shown
        if !self.quiet || outcome.is_failure() {
            ui::outcome(name, outcome);
        }
    }

    fn on_complete(&mut self, summary: &ReconcileSummary) {
        if !self.quiet && summary.total() > 0 {
            println!();
            ui::summary(summary);
        }
    }
}

/// One JSON object per package on stdout
pub struct JsonProgress;

impl ProgressCallback for JsonProgress {
    fn on_start(&mut self, _total: usize) {}

    fn on_package_start(&mut self, _name: &str) {}

    fn on_package_complete(&mut self, name: &str, outcome: &InstallOutcome) {
        let report = PackageReport::new(name, outcome.clone());
        match serde_json::to_string(&report) {
            Ok(line) => println!("{line}"),
            Err(e) => log::error!("Could not serialize result for {name}: {e}"),
        }
    }

    fn on_complete(&mut self, _summary: &ReconcileSummary) {}
}
