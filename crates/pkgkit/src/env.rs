//! Host environment capability.
//!
//! Everything that touches process-wide state (environment variables, the
//! home directory, `PATH` lookups, spawning processes) goes through the
//! [`Environment`] trait. Backends and config resolution receive it as a
//! parameter, so tests can substitute a scripted implementation.

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// A program invocation: executable plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: String,
    /// Arguments passed verbatim
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a spec for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args.iter().map(OsStr::new));
        cmd
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Output from a finished command
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: Vec<u8>,
    /// Captured standard error
    pub stderr: Vec<u8>,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

impl CommandOutput {
    /// Output of a command that exited with `code` and printed nothing.
    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }

    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Get stdout as a string
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a string
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}

/// Access to process-wide host state.
pub trait Environment: Send + Sync {
    /// Look up an environment variable.
    fn var(&self, key: &str) -> Option<String>;

    /// The current user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Whether an executable named `program` is on `PATH`.
    fn command_exists(&self, program: &str) -> bool;

    /// Run a command, capturing stdout and stderr.
    fn output(&self, cmd: &CommandSpec) -> io::Result<CommandOutput>;

    /// Run a command attached to the terminal.
    ///
    /// The returned output only carries the exit code.
    fn status(&self, cmd: &CommandSpec) -> io::Result<CommandOutput>;
}

/// The real host environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl Environment for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn command_exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    fn output(&self, cmd: &CommandSpec) -> io::Result<CommandOutput> {
        log::debug!("Running (captured): {cmd}");
        cmd.to_command()
            .stdin(Stdio::null())
            .output()
            .map(CommandOutput::from)
    }

    fn status(&self, cmd: &CommandSpec) -> io::Result<CommandOutput> {
        log::debug!("Running: {cmd}");
        let status = cmd
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(CommandOutput {
            code: status.code(),
            ..CommandOutput::default()
        })
    }
}
