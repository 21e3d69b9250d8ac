//! # pkgkit
//!
//! Pure Rust library for driving native package managers.
//!
//! This crate provides functionality for:
//! - Detecting which package manager a host uses (yay, pacman, apt, dnf, ...)
//! - Checking whether a package is installed or available upstream
//! - Installing packages and classifying failures
//!
//! All process spawning and environment lookups go through the
//! [`Environment`] capability, so backends can be exercised in tests without
//! touching the host.
//!
//! ## Example
//!
//! ```no_run
//! use pkgkit::{ManagerBackend, SystemEnv, select_backend};
//! use std::sync::Arc;
//!
//! let backend = select_backend(Arc::new(SystemEnv), None).expect("no package manager");
//! backend.ensure_usable().expect("package manager not runnable");
//!
//! if !backend.is_installed("git").unwrap() {
//!     backend.install("git").expect("install failed");
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod detect;
pub mod env;
pub mod error;
pub mod manager;

pub use backend::{ManagerBackend, command::CommandBackend};
pub use detect::{detect, select_backend};
pub use env::{CommandOutput, CommandSpec, Environment, SystemEnv};
pub use error::{Error, ErrorCategory, Result};
pub use manager::{InstalledCheck, ManagerKind};
