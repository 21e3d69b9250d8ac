//! # Declarative
//!
//! Converges the set of installed packages to a declared package list.
//!
//! The desired state is a [`PackageList`]; the current state comes from a
//! [`pkgkit::ManagerBackend`]. The [`Reconciler`] walks the list in order,
//! installs what is missing and records one [`InstallOutcome`] per package.
//!
//! ## Core Concepts
//!
//! - **PackageList**: Ordered, duplicate-free list of package names
//! - **InstallOutcome**: What happened to one package during a run
//! - **Reconciler**: Applies a list through a backend, one install at a time
//! - **PackageStore**: Where newly remembered packages get persisted
//!
//! ## Example
//!
//! ```no_run
//! use declarative::{NoProgress, PackageList, Reconciler};
//! use pkgkit::{SystemEnv, select_backend};
//! use std::sync::Arc;
//!
//! let backend = select_backend(Arc::new(SystemEnv), None)?;
//! let list = PackageList::from_names(["git", "curl"]);
//!
//! let reports = Reconciler::new(&backend).reconcile(&list, &mut NoProgress)?;
//! for report in &reports {
//!     println!("{}: {}", report.name, report.outcome);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Provider Traits
//!
//! - [`ProgressCallback`]: Receives progress updates
//! - [`PackageStore`]: Persists the list after `install_and_remember` adds a name
//!
//! This allows the crate to be used without hard dependencies on a
//! terminal UI or a config file format.

pub mod context;
pub mod error;
pub mod package_list;
pub mod reconciler;
pub mod types;

// Re-export main types at crate root
pub use context::{NoProgress, PackageStore, ProgressCallback};
pub use error::{ReconcileError, Result};
pub use package_list::PackageList;
pub use reconciler::{Reconciler, sort_list};
pub use types::{
    InstallOutcome, PackageReport, PackageState, ReconcileOptions, ReconcileSummary,
};
