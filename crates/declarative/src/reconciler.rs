//! Reconciliation engine - converges installed packages to the desired list

use crate::context::{PackageStore, ProgressCallback};
use crate::error::{ReconcileError, Result};
use crate::package_list::PackageList;
use crate::types::{InstallOutcome, PackageReport, PackageState, ReconcileOptions, ReconcileSummary};
use pkgkit::ManagerBackend;
use rayon::prelude::*;

/// Drives one backend over a package list
pub struct Reconciler<'a> {
    backend: &'a dyn ManagerBackend,
    options: ReconcileOptions,
}

impl<'a> Reconciler<'a> {
    pub fn new(backend: &'a dyn ManagerBackend) -> Self {
        Self {
            backend,
            options: ReconcileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    /// Install every package in `list` that is not installed yet
    ///
    /// Each package is processed in list order. A package that fails to
    /// install is recorded and the run continues; only a backend that cannot
    /// be invoked at all aborts the run.
    pub fn reconcile<P: ProgressCallback>(
        &self,
        list: &PackageList,
        progress: &mut P,
    ) -> Result<Vec<PackageReport>> {
        self.ensure_usable()?;

        let names: Vec<&str> = list.iter().collect();
        let mut prechecked = self.precheck_installed(&names)?.map(Vec::into_iter);

        progress.on_start(names.len());
        let mut reports = Vec::with_capacity(names.len());
        for name in &names {
            progress.on_package_start(name);
            let installed = prechecked.as_mut().and_then(Iterator::next);
            let outcome = self.reconcile_package(name, installed)?;
            progress.on_package_complete(name, &outcome);
            reports.push(PackageReport::new(*name, outcome));
        }

        progress.on_complete(&ReconcileSummary::from_reports(&reports));
        Ok(reports)
    }

    /// Install the named packages and remember each newly installed one
    ///
    /// After every `Installed` outcome the name is appended to `list` (unless
    /// already present) and the list is saved through `store` right away.
    pub fn install_and_remember<P, S>(
        &self,
        list: &mut PackageList,
        names: &[String],
        store: &mut S,
        progress: &mut P,
    ) -> Result<Vec<PackageReport>>
    where
        P: ProgressCallback,
        S: PackageStore,
    {
        self.ensure_usable()?;

        progress.on_start(names.len());
        let mut reports = Vec::with_capacity(names.len());
        for name in names {
            progress.on_package_start(name);
            let outcome = self.reconcile_package(name, None)?;

            if outcome == InstallOutcome::Installed && list.insert(name.as_str()) {
                log::debug!("Remembering {name}");
                store.save(list).map_err(ReconcileError::Persist)?;
            }

            progress.on_package_complete(name, &outcome);
            reports.push(PackageReport::new(name.as_str(), outcome));
        }

        progress.on_complete(&ReconcileSummary::from_reports(&reports));
        Ok(reports)
    }

    /// Report what `reconcile` would do, without installing anything
    pub fn plan(&self, list: &PackageList) -> Result<Vec<(String, PackageState)>> {
        self.ensure_usable()?;

        let names: Vec<&str> = list.iter().collect();
        let mut prechecked = self.precheck_installed(&names)?.map(Vec::into_iter);

        let mut states = Vec::with_capacity(names.len());
        for name in &names {
            let installed = match prechecked.as_mut().and_then(Iterator::next) {
                Some(checked) => checked,
                None => self.query(name, self.backend.is_installed(name))?,
            };

            // Unknown installed state shows as missing
            let state = if installed.unwrap_or(false) {
                PackageState::Installed
            } else if self.backend.supports_availability_check()
                && !self.query(name, self.backend.is_available(name))?.unwrap_or(true)
            {
                PackageState::Unavailable
            } else {
                PackageState::Missing
            };
            states.push((name.to_string(), state));
        }
        Ok(states)
    }

    /// Check whether a single package is installed
    pub fn is_installed(&self, name: &str) -> Result<bool> {
        self.ensure_usable()?;
        match self.backend.is_installed(name) {
            Ok(installed) => Ok(installed),
            Err(e) if e.is_fatal() => Err(self.unavailable(e)),
            Err(source) => Err(ReconcileError::Query {
                name: name.to_string(),
                source,
            }),
        }
    }

    fn ensure_usable(&self) -> Result<()> {
        self.backend.ensure_usable().map_err(|e| self.unavailable(e))
    }

    /// Decide and apply the outcome for one package
    ///
    /// `installed` carries a precomputed installed check when available.
    fn reconcile_package(
        &self,
        name: &str,
        installed: Option<pkgkit::Result<bool>>,
    ) -> Result<InstallOutcome> {
        let installed = match installed {
            Some(checked) => checked,
            None => self.query(name, self.backend.is_installed(name))?,
        };
        let installed = match installed {
            Ok(installed) => installed,
            Err(e) => {
                return Ok(InstallOutcome::InstallFailed {
                    reason: format!("could not query installed state of {name}: {e}"),
                });
            }
        };

        if installed {
            log::info!("{name} is already installed");
            return Ok(InstallOutcome::AlreadyInstalled);
        }

        if self.backend.supports_availability_check() {
            // Unknown availability: let the install decide
            if let Ok(false) = self.query(name, self.backend.is_available(name))? {
                log::warn!("{name} is not available from {}", self.backend.kind());
                return Ok(InstallOutcome::NotAvailable);
            }
        }

        log::info!("Installing {name}");
        match self.backend.install(name) {
            Ok(()) => Ok(InstallOutcome::Installed),
            Err(e) if e.is_fatal() => Err(self.unavailable(e)),
            Err(e) if e.is_not_found() => {
                log::warn!("{name}: {e}");
                Ok(InstallOutcome::NotAvailable)
            }
            Err(e) => {
                log::warn!("{name}: {e}");
                Ok(InstallOutcome::InstallFailed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Classify a read-only query result
    ///
    /// Fatal errors abort the run; any other error is handed back to the
    /// caller as the per-package answer.
    fn query(&self, name: &str, result: pkgkit::Result<bool>) -> Result<pkgkit::Result<bool>> {
        match result {
            Err(e) if e.is_fatal() => Err(self.unavailable(e)),
            Err(e) => {
                log::warn!("Query for {name} failed: {e}");
                Ok(Err(e))
            }
            answer => Ok(answer),
        }
    }

    /// Run installed checks on a thread pool when more than one job is allowed
    fn precheck_installed(&self, names: &[&str]) -> Result<Option<Vec<pkgkit::Result<bool>>>> {
        if self.options.jobs <= 1 || names.len() <= 1 {
            return Ok(None);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .build()
            .map_err(|e| ReconcileError::ThreadPool(e.to_string()))?;

        let results: Vec<pkgkit::Result<bool>> =
            pool.install(|| names.par_iter().map(|name| self.backend.is_installed(name)).collect());

        let mut installed = Vec::with_capacity(results.len());
        for (name, result) in names.iter().zip(results) {
            installed.push(self.query(name, result)?);
        }
        Ok(Some(installed))
    }

    fn unavailable(&self, source: pkgkit::Error) -> ReconcileError {
        ReconcileError::BackendUnavailable {
            manager: self.backend.kind().display_name().to_string(),
            source,
        }
    }
}

/// Sort the list in place, returning whether the order changed
pub fn sort_list(list: &mut PackageList) -> bool {
    list.sort()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{MemoryStore, NoProgress};
    use pkgkit::ManagerKind;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// In-memory package manager
    #[derive(Default)]
    struct FakeBackend {
        installed: Mutex<HashSet<String>>,
        /// Packages that exist upstream; `None` disables the availability check
        repository: Option<HashSet<String>>,
        /// Installs that fail with the given error message
        broken: HashMap<String, String>,
        /// Installed queries that fail with the given error message
        unreadable: HashMap<String, String>,
        /// Never records installs, so every query says "not installed"
        forgetful: bool,
        missing_binary: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn with_installed(names: &[&str]) -> Self {
            Self {
                installed: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
                ..Self::default()
            }
        }

        fn with_repository(mut self, names: &[&str]) -> Self {
            self.repository = Some(names.iter().map(|n| n.to_string()).collect());
            self
        }

        fn with_broken(mut self, name: &str, message: &str) -> Self {
            self.broken.insert(name.to_string(), message.to_string());
            self
        }

        fn with_unreadable(mut self, name: &str, message: &str) -> Self {
            self.unreadable.insert(name.to_string(), message.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl ManagerBackend for FakeBackend {
        fn kind(&self) -> ManagerKind {
            ManagerKind::Pacman
        }

        fn ensure_usable(&self) -> pkgkit::Result<()> {
            if self.missing_binary {
                return Err(pkgkit::Error::ManagerNotFound {
                    program: "pacman".into(),
                });
            }
            Ok(())
        }

        fn is_installed(&self, name: &str) -> pkgkit::Result<bool> {
            self.record(format!("query {name}"));
            if let Some(message) = self.unreadable.get(name) {
                return Err(pkgkit::Error::CommandFailed {
                    message: message.clone(),
                    stderr: String::new(),
                });
            }
            Ok(self.installed.lock().unwrap().contains(name))
        }

        fn supports_availability_check(&self) -> bool {
            self.repository.is_some()
        }

        fn is_available(&self, name: &str) -> pkgkit::Result<bool> {
            self.record(format!("available {name}"));
            Ok(self.repository.as_ref().is_none_or(|repo| repo.contains(name)))
        }

        fn install(&self, name: &str) -> pkgkit::Result<()> {
            self.record(format!("install {name}"));
            if let Some(message) = self.broken.get(name) {
                return Err(pkgkit::Error::CommandFailed {
                    message: message.clone(),
                    stderr: String::new(),
                });
            }
            if !self.forgetful {
                self.installed.lock().unwrap().insert(name.to_string());
            }
            Ok(())
        }
    }

    fn outcomes(reports: &[PackageReport]) -> Vec<(&str, &InstallOutcome)> {
        reports.iter().map(|r| (r.name.as_str(), &r.outcome)).collect()
    }

    #[test]
    fn test_installs_only_missing_packages() {
        let backend = FakeBackend::with_installed(&["git"]).with_repository(&["git", "curl"]);
        let list = PackageList::from_names(["git", "curl"]);

        let reports = Reconciler::new(&backend).reconcile(&list, &mut NoProgress).unwrap();

        assert_eq!(
            outcomes(&reports),
            vec![
                ("git", &InstallOutcome::AlreadyInstalled),
                ("curl", &InstallOutcome::Installed),
            ]
        );
        assert_eq!(
            backend.calls(),
            vec!["query git", "query curl", "available curl", "install curl"]
        );
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let backend = FakeBackend::default();
        let list = PackageList::from_names(["git", "curl", "htop"]);
        let reconciler = Reconciler::new(&backend);

        let first = reconciler.reconcile(&list, &mut NoProgress).unwrap();
        assert!(first.iter().all(|r| r.outcome == InstallOutcome::Installed));

        let second = reconciler.reconcile(&list, &mut NoProgress).unwrap();
        assert_eq!(second.len(), 3);
        assert!(second.iter().all(|r| r.outcome == InstallOutcome::AlreadyInstalled));
    }

    #[test]
    fn test_failure_does_not_abort_remaining_packages() {
        let backend = FakeBackend::default().with_broken("b", "pacman failed for b with exit code 1");
        let list = PackageList::from_names(["a", "b", "c"]);

        let reports = Reconciler::new(&backend).reconcile(&list, &mut NoProgress).unwrap();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].outcome, InstallOutcome::Installed);
        assert_eq!(
            reports[1].outcome,
            InstallOutcome::InstallFailed {
                reason: "pacman failed for b with exit code 1".into()
            }
        );
        assert_eq!(reports[2].outcome, InstallOutcome::Installed);
        assert!(backend.calls().contains(&"install c".to_string()));
    }

    #[test]
    fn test_unavailable_package_skips_install() {
        let backend = FakeBackend::default().with_repository(&["git"]);
        let list = PackageList::from_names(["not-a-package", "git"]);

        let reports = Reconciler::new(&backend).reconcile(&list, &mut NoProgress).unwrap();

        assert_eq!(reports[0].outcome, InstallOutcome::NotAvailable);
        assert_eq!(reports[1].outcome, InstallOutcome::Installed);
        assert!(!backend.calls().contains(&"install not-a-package".to_string()));
    }

    #[test]
    fn test_no_availability_check_attempts_install() {
        let backend = FakeBackend::default();
        let list = PackageList::from_names(["git"]);

        Reconciler::new(&backend).reconcile(&list, &mut NoProgress).unwrap();

        assert_eq!(backend.calls(), vec!["query git", "install git"]);
    }

    #[test]
    fn test_not_found_install_error_is_not_available() {
        struct NotFoundBackend;

        impl ManagerBackend for NotFoundBackend {
            fn kind(&self) -> ManagerKind {
                ManagerKind::Zypper
            }
            fn ensure_usable(&self) -> pkgkit::Result<()> {
                Ok(())
            }
            fn is_installed(&self, _name: &str) -> pkgkit::Result<bool> {
                Ok(false)
            }
            fn install(&self, name: &str) -> pkgkit::Result<()> {
                Err(pkgkit::Error::NotFound { name: name.into() })
            }
        }

        let list = PackageList::from_names(["ghost"]);
        let reports = Reconciler::new(&NotFoundBackend).reconcile(&list, &mut NoProgress).unwrap();
        assert_eq!(reports[0].outcome, InstallOutcome::NotAvailable);
    }

    #[test]
    fn test_missing_manager_aborts_before_any_package() {
        let backend = FakeBackend {
            missing_binary: true,
            ..FakeBackend::default()
        };
        let list = PackageList::from_names(["git"]);

        let err = Reconciler::new(&backend).reconcile(&list, &mut NoProgress).unwrap_err();

        assert!(matches!(err, ReconcileError::BackendUnavailable { .. }));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_fatal_install_error_aborts_run() {
        struct VanishingBackend;

        impl ManagerBackend for VanishingBackend {
            fn kind(&self) -> ManagerKind {
                ManagerKind::Apt
            }
            fn ensure_usable(&self) -> pkgkit::Result<()> {
                Ok(())
            }
            fn is_installed(&self, _name: &str) -> pkgkit::Result<bool> {
                Ok(false)
            }
            fn install(&self, _name: &str) -> pkgkit::Result<()> {
                Err(pkgkit::Error::ManagerNotFound {
                    program: "sudo".into(),
                })
            }
        }

        let list = PackageList::from_names(["git", "curl"]);
        let err = Reconciler::new(&VanishingBackend)
            .reconcile(&list, &mut NoProgress)
            .unwrap_err();
        assert_eq!(err.to_string(), "APT is unusable: package manager not found: sudo");
    }

    #[test]
    fn test_parallel_precheck_matches_sequential() {
        let list = PackageList::from_names(["a", "b", "c", "d", "e"]);

        let sequential_backend = FakeBackend::with_installed(&["b", "d"]);
        let sequential = Reconciler::new(&sequential_backend)
            .reconcile(&list, &mut NoProgress)
            .unwrap();

        let parallel_backend = FakeBackend::with_installed(&["b", "d"]);
        let parallel = Reconciler::new(&parallel_backend)
            .with_options(ReconcileOptions { jobs: 4 })
            .reconcile(&list, &mut NoProgress)
            .unwrap();

        assert_eq!(sequential, parallel);
        let installs: Vec<String> = parallel_backend
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("install"))
            .collect();
        assert_eq!(installs, vec!["install a", "install c", "install e"]);
    }

    #[test]
    fn test_failed_installed_query_is_install_failed_at_any_job_count() {
        let list = PackageList::from_names(["a", "b", "c"]);
        let run = |jobs: usize| {
            let backend = FakeBackend::default().with_unreadable("b", "database is locked");
            let reports = Reconciler::new(&backend)
                .with_options(ReconcileOptions { jobs })
                .reconcile(&list, &mut NoProgress)
                .unwrap();
            let installs: Vec<String> = backend
                .calls()
                .into_iter()
                .filter(|c| c.starts_with("install"))
                .collect();
            (reports, installs)
        };

        let (serial, serial_installs) = run(1);
        let (parallel, parallel_installs) = run(4);

        assert_eq!(serial, parallel);
        assert_eq!(serial_installs, parallel_installs);
        assert_eq!(parallel_installs, vec!["install a", "install c"]);
        match &parallel[1].outcome {
            InstallOutcome::InstallFailed { reason } => {
                assert_eq!(reason, "could not query installed state of b: database is locked");
            }
            other => panic!("expected InstallFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_availability_still_attempts_install() {
        struct UnsureBackend;

        impl ManagerBackend for UnsureBackend {
            fn kind(&self) -> ManagerKind {
                ManagerKind::Dnf
            }
            fn ensure_usable(&self) -> pkgkit::Result<()> {
                Ok(())
            }
            fn is_installed(&self, _name: &str) -> pkgkit::Result<bool> {
                Ok(false)
            }
            fn supports_availability_check(&self) -> bool {
                true
            }
            fn is_available(&self, _name: &str) -> pkgkit::Result<bool> {
                Err(pkgkit::Error::Network {
                    message: "Could not resolve host".into(),
                })
            }
            fn install(&self, _name: &str) -> pkgkit::Result<()> {
                Ok(())
            }
        }

        let list = PackageList::from_names(["htop"]);
        let reports = Reconciler::new(&UnsureBackend).reconcile(&list, &mut NoProgress).unwrap();
        assert_eq!(reports[0].outcome, InstallOutcome::Installed);

        let plan = Reconciler::new(&UnsureBackend).plan(&list).unwrap();
        assert_eq!(plan, vec![("htop".to_string(), PackageState::Missing)]);
    }

    #[test]
    fn test_install_and_remember_appends_and_persists_each_success() {
        let backend = FakeBackend::with_installed(&["git"]).with_broken("bad", "exit code 1");
        let mut list = PackageList::from_names(["git"]);
        let mut store = MemoryStore::default();
        let names: Vec<String> = ["git", "curl", "bad", "htop"].iter().map(|s| s.to_string()).collect();

        let reports = Reconciler::new(&backend)
            .install_and_remember(&mut list, &names, &mut store, &mut NoProgress)
            .unwrap();

        assert_eq!(reports.len(), 4);
        assert_eq!(list.names(), ["git", "curl", "htop"]);
        assert_eq!(store.snapshots.len(), 2);
        assert_eq!(store.snapshots[0].names(), ["git", "curl"]);
        assert_eq!(store.snapshots[1].names(), ["git", "curl", "htop"]);
    }

    #[test]
    fn test_install_and_remember_never_duplicates() {
        // Backend always reports "not installed", so every request reinstalls
        let backend = FakeBackend {
            forgetful: true,
            ..FakeBackend::default()
        };
        let mut list = PackageList::new();
        let mut store = MemoryStore::default();
        let reconciler = Reconciler::new(&backend);

        for _ in 0..5 {
            let names = vec!["neovim".to_string(), "neovim".to_string()];
            reconciler
                .install_and_remember(&mut list, &names, &mut store, &mut NoProgress)
                .unwrap();
        }

        assert_eq!(list.names(), ["neovim"]);
        assert_eq!(store.snapshots.len(), 1);
        assert!(store.snapshots.iter().all(|s| s.len() == 1));
    }

    #[test]
    fn test_install_and_remember_persist_failure_is_fatal() {
        struct FailingStore;

        impl PackageStore for FailingStore {
            fn save(&mut self, _list: &PackageList) -> anyhow::Result<()> {
                anyhow::bail!("disk full")
            }
        }

        let backend = FakeBackend::default();
        let mut list = PackageList::new();
        let names = vec!["git".to_string(), "curl".to_string()];

        let err = Reconciler::new(&backend)
            .install_and_remember(&mut list, &names, &mut FailingStore, &mut NoProgress)
            .unwrap_err();

        assert!(matches!(err, ReconcileError::Persist(_)));
        assert!(!backend.calls().contains(&"install curl".to_string()));
    }

    #[test]
    fn test_plan_does_not_install() {
        let backend = FakeBackend::with_installed(&["git"]).with_repository(&["git", "curl"]);
        let list = PackageList::from_names(["git", "curl", "nope"]);

        let plan = Reconciler::new(&backend).plan(&list).unwrap();

        assert_eq!(
            plan,
            vec![
                ("git".to_string(), PackageState::Installed),
                ("curl".to_string(), PackageState::Missing),
                ("nope".to_string(), PackageState::Unavailable),
            ]
        );
        assert!(backend.calls().iter().all(|c| !c.starts_with("install")));
    }

    #[test]
    fn test_progress_callbacks() {
        #[derive(Default)]
        struct Recorder {
            events: Vec<String>,
        }

        impl ProgressCallback for Recorder {
            fn on_start(&mut self, total: usize) {
                self.events.push(format!("start {total}"));
            }
            fn on_package_start(&mut self, name: &str) {
                self.events.push(format!("begin {name}"));
            }
            fn on_package_complete(&mut self, name: &str, outcome: &InstallOutcome) {
                self.events.push(format!("end {name} {}", outcome.label()));
            }
            fn on_complete(&mut self, summary: &ReconcileSummary) {
                self.events.push(format!("done {}", summary.total()));
            }
        }

        let backend = FakeBackend::with_installed(&["git"]);
        let list = PackageList::from_names(["git", "curl"]);
        let mut recorder = Recorder::default();

        Reconciler::new(&backend).reconcile(&list, &mut recorder).unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "start 2",
                "begin git",
                "end git already installed",
                "begin curl",
                "end curl installed",
                "done 2",
            ]
        );
    }

    #[test]
    fn test_is_installed_single_package() {
        let backend = FakeBackend::with_installed(&["git"]);
        let reconciler = Reconciler::new(&backend);
        assert!(reconciler.is_installed("git").unwrap());
        assert!(!reconciler.is_installed("curl").unwrap());
        assert!(backend.calls().iter().all(|c| c.starts_with("query")));
    }

    #[test]
    fn test_sort_list() {
        let mut list = PackageList::from_names(["zsh", "git"]);
        assert!(sort_list(&mut list));
        assert!(!sort_list(&mut list));
        assert_eq!(list.names(), ["git", "zsh"]);
    }
}
