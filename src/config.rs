//! Package file loading and saving
//!
//! The package file is a JSON object with a single `"packages"` array of
//! package names. Files ending in `.jsonc` may carry `//` and `/* */`
//! comments; those are stripped on load and lost on save.

use crate::jsonc::{self, CommentError};
use crate::paths::{self, ResolvedPath};
use declarative::{PackageList, PackageStore};
use pkgkit::Environment;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level key holding the package names
const PACKAGES_KEY: &str = "packages";

/// Errors from locating, reading or writing the package file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no package file found (looked for {})", join_paths(.candidates))]
    NotFound { candidates: Vec<PathBuf> },

    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("could not read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid comment in {}", .path.display())]
    Comment {
        path: PathBuf,
        #[source]
        source: CommentError,
    },

    #[error("{} has no \"packages\" array", .path.display())]
    MissingPackages { path: PathBuf },

    #[error("invalid entry at index {index} in {}: {reason}", .path.display())]
    InvalidEntry {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("could not write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Syntax of a package file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    /// JSON with `//` and `/* */` comments
    Jsonc,
}

impl ConfigFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("jsonc") => Self::Jsonc,
            _ => Self::Json,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Jsonc => "JSONC",
        }
    }
}

#[derive(Serialize)]
struct Document<'a> {
    packages: &'a PackageList,
}

/// A package file on disk
#[derive(Debug, Clone)]
pub struct PackageFile {
    path: PathBuf,
    format: ConfigFormat,
}

impl PackageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = ConfigFormat::from_path(&path);
        Self { path, format }
    }

    /// Resolve the package file location and wrap it
    pub fn locate(env: &dyn Environment, override_path: Option<&str>) -> Result<Self, ConfigError> {
        let ResolvedPath { path, .. } = paths::resolve_package_file(env, override_path)?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the package list
    pub fn load(&self) -> Result<PackageList, ConfigError> {
        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        self.parse(&content)
    }

    /// Validate package file content
    pub fn parse(&self, content: &str) -> Result<PackageList, ConfigError> {
        let json = match self.format {
            ConfigFormat::Json => content.to_string(),
            ConfigFormat::Jsonc => {
                jsonc::strip_comments(content).map_err(|source| ConfigError::Comment {
                    path: self.path.clone(),
                    source,
                })?
            }
        };

        let value: Value = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let entries = value
            .get(PACKAGES_KEY)
            .and_then(Value::as_array)
            .ok_or_else(|| ConfigError::MissingPackages {
                path: self.path.clone(),
            })?;

        let mut names = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let name = entry.as_str().ok_or_else(|| ConfigError::InvalidEntry {
                path: self.path.clone(),
                index,
                reason: format!("expected a string, found {entry}"),
            })?;
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidEntry {
                    path: self.path.clone(),
                    index,
                    reason: "package name is empty".to_string(),
                });
            }
            names.push(name.to_string());
        }

        let total = names.len();
        let list = PackageList::from_names(names);
        if list.len() < total {
            log::warn!(
                "{} lists {} duplicate package(s); keeping the first occurrence",
                self.path.display(),
                total - list.len()
            );
        }
        log::debug!("Loaded {} packages from {}", list.len(), self.path.display());
        Ok(list)
    }

    /// Write the package list back, replacing the file atomically
    ///
    /// Output is pretty JSON with a trailing newline. Comments in a JSONC
    /// file do not survive.
    pub fn save(&self, list: &PackageList) -> Result<(), ConfigError> {
        if self.format == ConfigFormat::Jsonc {
            log::warn!(
                "Saving {} drops any comments it contained",
                self.path.display()
            );
        }

        let write_err = |source: io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        let mut content = serde_json::to_string_pretty(&Document { packages: list })
            .map_err(|e| write_err(io::Error::other(e)))?;
        content.push('\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        log::debug!("Saved {} packages to {}", list.len(), self.path.display());
        Ok(())
    }
}

impl PackageStore for PackageFile {
    fn save(&mut self, list: &PackageList) -> anyhow::Result<()> {
        PackageFile::save(&*self, list)?;
        Ok(())
    }
}
