//! Error types for package manager operations.
//!
//! Errors are categorized so callers can tell a package that does not exist
//! apart from a package manager that cannot be run at all. Each error type
//! includes contextual information to help users understand what went wrong.

use thiserror::Error;

/// Categories of package manager errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (mirror unreachable, download failed)
    Network,
    /// Package not found in any configured repository
    NotFound,
    /// Permission denied (may need sudo)
    Permission,
    /// The package manager itself is missing or cannot be executed
    ManagerNotFound,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Whether this category means the backend as a whole is unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ManagerNotFound)
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and mirror configuration",
            Self::NotFound => "Verify the package name or enable the repository providing it",
            Self::Permission => "Make sure sudo is configured for your user",
            Self::ManagerNotFound => "Install a supported package manager or pass --manager",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Errors that can occur while talking to a package manager.
#[derive(Debug, Error)]
pub enum Error {
    /// Network-related error reported by the package manager
    #[error("network error: {message}")]
    Network {
        /// Detailed error message from the failed operation
        message: String,
    },

    /// Package not found in any configured repository
    #[error("package not found: {name}")]
    NotFound {
        /// Name of the package that could not be found
        name: String,
    },

    /// Permission denied
    #[error("permission denied: {message}")]
    Permission {
        /// Details about what permission was denied
        message: String,
    },

    /// No usable package manager binary
    #[error("package manager not found: {program}")]
    ManagerNotFound {
        /// Binary that could not be located or executed
        program: String,
    },

    /// Detection found none of the supported package managers
    #[error("no supported package manager found (looked for: {tried})")]
    NoManagerDetected {
        /// Comma-separated list of binaries that were looked up
        tried: String,
    },

    /// The package manager process could not be started
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// Binary that failed to start
        program: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Command ran but reported failure
    #[error("{message}")]
    CommandFailed {
        /// Description of what command failed
        message: String,
        /// Standard error output from the failed command (empty when not captured)
        stderr: String,
    },

    /// Unrecognised package manager name
    #[error("unknown package manager: {0}")]
    UnknownManager(String),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Network { .. } => ErrorCategory::Network,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Permission { .. } => ErrorCategory::Permission,
            Error::ManagerNotFound { .. } | Error::NoManagerDetected { .. } | Error::Spawn { .. } => {
                ErrorCategory::ManagerNotFound
            }
            _ => ErrorCategory::Other,
        }
    }

    /// Whether this error means the backend cannot be used at all.
    pub fn is_fatal(&self) -> bool {
        self.category().is_fatal()
    }

    /// Whether this error means the package does not exist upstream.
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    /// Map a spawn failure to the right variant.
    ///
    /// A missing executable is reported as [`Error::ManagerNotFound`] so the
    /// caller aborts instead of recording a per-package failure.
    pub fn from_spawn(program: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::ManagerNotFound {
                program: program.to_string(),
            }
        } else {
            Error::Spawn {
                program: program.to_string(),
                source,
            }
        }
    }

    /// Create an error from a failed command's exit code.
    pub fn from_exit(program: &str, code: Option<i32>, package_name: &str) -> Self {
        let message = match code {
            Some(code) => format!("{program} failed for {package_name} with exit code {code}"),
            None => format!("{program} for {package_name} was terminated by a signal"),
        };
        Error::CommandFailed {
            message,
            stderr: String::new(),
        }
    }

    /// Create an error from captured package manager output.
    ///
    /// Analyzes stderr to categorize the error appropriately.
    pub fn from_output(program: &str, stderr: &str, code: Option<i32>, package_name: &str) -> Self {
        let stderr_lower = stderr.to_lowercase();

        // Not found errors
        if stderr_lower.contains("target not found")
            || stderr_lower.contains("unable to locate package")
            || stderr_lower.contains("has no installation candidate")
            || stderr_lower.contains("no match for argument")
            || stderr_lower.contains("no package")
            || stderr_lower.contains("no matching packages")
            || stderr_lower.contains("was not found")
            || stderr_lower.contains("not found in package names")
            || stderr_lower.contains("no provider of")
            || stderr_lower.contains("no available formula")
            || stderr_lower.contains("no formulae or casks found")
            || stderr_lower.contains("port not found")
            || stderr_lower.contains("no packages available to install")
        {
            return Error::NotFound {
                name: package_name.to_string(),
            };
        }

        // Network errors
        if stderr_lower.contains("could not resolve")
            || stderr_lower.contains("failed retrieving file")
            || stderr_lower.contains("failed to fetch")
            || stderr_lower.contains("connection refused")
            || stderr_lower.contains("timed out")
            || stderr_lower.contains("temporary failure in name resolution")
        {
            return Error::Network {
                message: stderr.trim().to_string(),
            };
        }

        // Permission errors
        if stderr_lower.contains("permission denied")
            || stderr_lower.contains("you need to be root")
            || stderr_lower.contains("are you root")
            || stderr_lower.contains("a password is required")
            || stderr_lower.contains("operation not permitted")
        {
            return Error::Permission {
                message: stderr.trim().to_string(),
            };
        }

        match Error::from_exit(program, code, package_name) {
            Error::CommandFailed { message, .. } => Error::CommandFailed {
                message,
                stderr: stderr.trim().to_string(),
            },
            other => other,
        }
    }
}

/// Result type for package manager operations.
pub type Result<T> = std::result::Result<T, Error>;
