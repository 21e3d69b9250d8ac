//! Backend abstraction for package manager operations.
//!
//! The [`ManagerBackend`] trait is the only surface the reconciler sees,
//! allowing for different implementations (subprocess CLI, in-memory fakes
//! for testing).

pub mod command;

use crate::error::Result;
use crate::manager::ManagerKind;

/// Backend trait for one native package manager.
///
/// Implementations must treat `is_installed` and `is_available` as read-only
/// queries; only `install` changes the system.
pub trait ManagerBackend: Send + Sync {
    /// Which package manager this backend drives.
    fn kind(&self) -> ManagerKind;

    /// Check that the package manager can be invoked at all.
    ///
    /// Errors from here are fatal for the whole run.
    fn ensure_usable(&self) -> Result<()>;

    /// Check if a package is installed locally.
    fn is_installed(&self, name: &str) -> Result<bool>;

    /// Whether [`ManagerBackend::is_available`] performs a real lookup.
    fn supports_availability_check(&self) -> bool {
        false
    }

    /// Check if a package exists in any configured repository.
    ///
    /// `Ok(false)` means the repositories definitely lack the package. A
    /// lookup that failed for another reason is an error, not `false`.
    /// Backends without an availability check assume every package exists
    /// and let `install` decide.
    fn is_available(&self, _name: &str) -> Result<bool> {
        Ok(true)
    }

    /// Install a package.
    ///
    /// Installing an already-installed package must succeed without changes.
    fn install(&self, name: &str) -> Result<()>;
}

impl<B: ManagerBackend + ?Sized> ManagerBackend for Box<B> {
    fn kind(&self) -> ManagerKind {
        (**self).kind()
    }

    fn ensure_usable(&self) -> Result<()> {
        (**self).ensure_usable()
    }

    fn is_installed(&self, name: &str) -> Result<bool> {
        (**self).is_installed(name)
    }

    fn supports_availability_check(&self) -> bool {
        (**self).supports_availability_check()
    }

    fn is_available(&self, name: &str) -> Result<bool> {
        (**self).is_available(name)
    }

    fn install(&self, name: &str) -> Result<()> {
        (**self).install(name)
    }
}
