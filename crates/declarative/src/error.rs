//! Error types for reconciliation

use thiserror::Error;

/// Errors that abort a whole reconciliation run
///
/// Per-package failures never show up here; they are recorded as
/// [`crate::InstallOutcome`] values instead.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The package manager cannot be invoked at all
    #[error("{manager} is unusable: {source}")]
    BackendUnavailable {
        manager: String,
        #[source]
        source: pkgkit::Error,
    },

    /// A read-only query for one package failed
    #[error("failed to query {name}")]
    Query {
        name: String,
        #[source]
        source: pkgkit::Error,
    },

    /// Writing the package list back failed
    #[error("failed to save package list")]
    Persist(#[source] anyhow::Error),

    /// Worker pool for parallel queries could not be built
    #[error("failed to create thread pool: {0}")]
    ThreadPool(String),
}

/// Result type for reconciliation
pub type Result<T> = std::result::Result<T, ReconcileError>;
