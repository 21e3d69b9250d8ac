//! Subprocess backend: drives a package manager through its CLI.

use crate::backend::ManagerBackend;
use crate::env::{CommandOutput, CommandSpec, Environment};
use crate::error::{Error, Result};
use crate::manager::{InstalledCheck, ManagerKind};
use std::sync::Arc;

/// Backend that executes real package manager commands.
pub struct CommandBackend {
    kind: ManagerKind,
    env: Arc<dyn Environment>,
    /// Capture install output instead of attaching it to the terminal
    capture_install: bool,
}

impl CommandBackend {
    /// Create a backend for `kind` running commands through `env`.
    pub fn new(kind: ManagerKind, env: Arc<dyn Environment>) -> Self {
        Self {
            kind,
            env,
            capture_install: false,
        }
    }

    /// Capture install output so failures can be classified from stderr.
    ///
    /// Interactive installs (the default) show progress and let `sudo`
    /// prompt for a password, but only report the exit code on failure.
    pub fn with_captured_install(mut self, capture: bool) -> Self {
        self.capture_install = capture;
        self
    }

    /// Run a query command and capture its output.
    fn run_captured(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        log::debug!("{}: {}", self.kind.id(), spec);
        self.env
            .output(spec)
            .map_err(|e| Error::from_spawn(&spec.program, e))
    }
}

impl ManagerBackend for CommandBackend {
    fn kind(&self) -> ManagerKind {
        self.kind
    }

    fn ensure_usable(&self) -> Result<()> {
        let binary = self.kind.binary();
        if !self.env.command_exists(binary) {
            return Err(Error::ManagerNotFound {
                program: binary.to_string(),
            });
        }
        if self.kind.requires_sudo() && !self.env.command_exists("sudo") {
            return Err(Error::ManagerNotFound {
                program: "sudo".to_string(),
            });
        }
        Ok(())
    }

    fn is_installed(&self, name: &str) -> Result<bool> {
        let output = self.run_captured(&self.kind.installed_query(name))?;
        let installed = match self.kind.installed_check() {
            InstalledCheck::ExitStatus => output.success(),
            InstalledCheck::ListsName => {
                output.success()
                    && output
                        .stdout_str()
                        .lines()
                        .any(|line| line.split_whitespace().next() == Some(name))
            }
            InstalledCheck::StatusPrefix(status) => {
                output.success() && output.stdout_str().trim_start().starts_with(status)
            }
        };
        log::trace!("{name} installed: {installed}");
        Ok(installed)
    }

    fn supports_availability_check(&self) -> bool {
        self.kind.availability_query("").is_some()
    }

    /// Ask the repositories for `name`.
    ///
    /// Only a failure whose stderr says the package does not exist counts as
    /// unavailable. Any other failure is returned as a non-fatal error.
    fn is_available(&self, name: &str) -> Result<bool> {
        let Some(spec) = self.kind.availability_query(name) else {
            return Ok(true);
        };
        let output = self.run_captured(&spec)?;
        if output.success() {
            return Ok(true);
        }
        let err = Error::from_output(&spec.program, &output.stderr_str(), output.code, name);
        if err.is_not_found() {
            return Ok(false);
        }
        Err(err)
    }

    fn install(&self, name: &str) -> Result<()> {
        let spec = self.kind.install_command(name);
        let binary = self.kind.binary();

        if self.capture_install {
            let output = self.run_captured(&spec)?;
            if output.success() {
                return Ok(());
            }
            return Err(Error::from_output(binary, &output.stderr_str(), output.code, name));
        }

        log::debug!("{}: {}", self.kind.id(), spec);
        let output = self
            .env
            .status(&spec)
            .map_err(|e| Error::from_spawn(&spec.program, e))?;
        if output.success() {
            Ok(())
        } else {
            Err(Error::from_exit(binary, output.code, name))
        }
    }
}
