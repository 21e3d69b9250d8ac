//! Scripted environment for command tests

use pkgkit::{CommandOutput, CommandSpec, Environment};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Environment with fixed variables, a fake `PATH` and canned command results
///
/// Commands without a scripted response exit with code 1.
#[derive(Default)]
pub struct ScriptedEnv {
    home: Option<PathBuf>,
    vars: HashMap<String, String>,
    binaries: HashSet<String>,
    responses: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn home(mut self, home: &Path) -> Self {
        self.home = Some(home.to_path_buf());
        self
    }

    pub fn var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn binaries(mut self, names: &[&str]) -> Self {
        self.binaries.extend(names.iter().map(|n| n.to_string()));
        self
    }

    pub fn respond(self, command: &str, code: i32) -> Self {
        self.respond_with(command, CommandOutput::with_code(code))
    }

    /// Script a command that exits 0 and prints `stdout`
    pub fn prints(self, command: &str, stdout: &str) -> Self {
        self.respond_with(
            command,
            CommandOutput {
                code: Some(0),
                stdout: stdout.as_bytes().to_vec(),
                stderr: Vec::new(),
            },
        )
    }

    /// Script a command that exits 1 and writes `stderr`
    pub fn fails(self, command: &str, stderr: &str) -> Self {
        self.respond_with(
            command,
            CommandOutput {
                code: Some(1),
                stdout: Vec::new(),
                stderr: stderr.as_bytes().to_vec(),
            },
        )
    }

    pub fn respond_with(mut self, command: &str, output: CommandOutput) -> Self {
        self.responses.insert(command.to_string(), output);
        self
    }

    /// Every command line run so far, plus `which <bin>` for each lookup
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        let line = spec.to_string();
        self.calls.lock().unwrap().push(line.clone());
        Ok(self
            .responses
            .get(&line)
            .cloned()
            .unwrap_or_else(|| CommandOutput::with_code(1)))
    }
}

impl Environment for ScriptedEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home.clone()
    }

    fn command_exists(&self, program: &str) -> bool {
        self.calls.lock().unwrap().push(format!("which {program}"));
        self.binaries.contains(program)
    }

    fn output(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        self.answer(spec)
    }

    fn status(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
        self.answer(spec)
    }
}
