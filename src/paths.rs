//! Package file location resolution
//!
//! # Resolution Priority
//!
//! 1. `--file` command line value
//! 2. `CONFIX_PACKAGES_PATH` environment variable (empty counts as unset)
//! 3. `~/.config/confix/packages.json`, if it exists
//! 4. `~/.config/confix/packages.jsonc`, if it exists
//!
//! Override values get `~` and `$VAR` expansion. All lookups go through the
//! [`Environment`] capability so resolution can be tested without touching
//! the real process environment.

use crate::config::ConfigError;
use pkgkit::Environment;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable for package file override
pub const ENV_PACKAGES_PATH: &str = "CONFIX_PACKAGES_PATH";

/// File names tried inside the config directory, in order
const DEFAULT_FILE_NAMES: [&str; 2] = ["packages.json", "packages.jsonc"];

/// Where a resolved package file path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Flag,
    EnvVar,
    Default,
}

impl fmt::Display for PathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => f.write_str("--file"),
            Self::EnvVar => f.write_str(ENV_PACKAGES_PATH),
            Self::Default => f.write_str("default location"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub source: PathSource,
}

/// Get the confix config directory (`~/.config/confix`)
pub fn config_dir(env: &dyn Environment) -> Result<PathBuf, ConfigError> {
    let home = env.home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".config").join("confix"))
}

/// Default package file candidates, in lookup order
pub fn default_candidates(env: &dyn Environment) -> Result<Vec<PathBuf>, ConfigError> {
    let dir = config_dir(env)?;
    Ok(DEFAULT_FILE_NAMES.iter().map(|name| dir.join(name)).collect())
}

/// Resolve the package file to use
///
/// Only the default candidates are checked for existence; an explicit path
/// is returned as-is and reported later by the loader if unreadable.
pub fn resolve_package_file(
    env: &dyn Environment,
    override_path: Option<&str>,
) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = override_path.filter(|p| !p.is_empty()) {
        let path = expand(env, path);
        log::debug!("Using package file from --file: {}", path.display());
        return Ok(ResolvedPath {
            path,
            source: PathSource::Flag,
        });
    }

    if let Some(value) = env.var(ENV_PACKAGES_PATH).filter(|v| !v.is_empty()) {
        let path = expand(env, &value);
        log::debug!(
            "Using package file from {}: {}",
            ENV_PACKAGES_PATH,
            path.display()
        );
        return Ok(ResolvedPath {
            path,
            source: PathSource::EnvVar,
        });
    }

    let candidates = default_candidates(env)?;
    match candidates.iter().find(|candidate| candidate.is_file()) {
        Some(found) => {
            log::debug!("Using package file: {}", found.display());
            Ok(ResolvedPath {
                path: found.clone(),
                source: PathSource::Default,
            })
        }
        None => Err(ConfigError::NotFound { candidates }),
    }
}

/// Expand `~` and environment variables in a path
///
/// Unknown variables are left as-is.
pub fn expand(env: &dyn Environment, path: &str) -> PathBuf {
    let home = || env.home_dir().map(|h| h.to_string_lossy().into_owned());
    let expanded = shellexpand::full_with_context_no_errors(path, home, |var| env.var(var));
    PathBuf::from(expanded.as_ref())
}

/// Render a path with the home directory shortened to `~`
pub fn display_path(env: &dyn Environment, path: &Path) -> String {
    if let Some(home) = env.home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        return Path::new("~").join(rest).display().to_string();
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedEnv;
    use std::fs;

    fn write_default(home: &Path, name: &str) -> PathBuf {
        let dir = home.join(".config").join("confix");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, r#"{"packages": []}"#).unwrap();
        path
    }

    #[test]
    fn test_flag_wins_over_everything() {
        let home = tempfile::tempdir().unwrap();
        write_default(home.path(), "packages.json");
        let env = ScriptedEnv::new().home(home.path()).var(ENV_PACKAGES_PATH, "/from/env.json");

        let resolved = resolve_package_file(&env, Some("/from/flag.json")).unwrap();
        assert_eq!(resolved.path, PathBuf::from("/from/flag.json"));
        assert_eq!(resolved.source, PathSource::Flag);
    }

    #[test]
    fn test_env_var_wins_over_defaults() {
        let home = tempfile::tempdir().unwrap();
        write_default(home.path(), "packages.json");
        let env = ScriptedEnv::new().home(home.path()).var(ENV_PACKAGES_PATH, "/from/env.jsonc");

        let resolved = resolve_package_file(&env, None).unwrap();
        assert_eq!(resolved.path, PathBuf::from("/from/env.jsonc"));
        assert_eq!(resolved.source, PathSource::EnvVar);
    }

    #[test]
    fn test_empty_env_var_is_unset() {
        let home = tempfile::tempdir().unwrap();
        let expected = write_default(home.path(), "packages.json");
        let env = ScriptedEnv::new().home(home.path()).var(ENV_PACKAGES_PATH, "");

        let resolved = resolve_package_file(&env, None).unwrap();
        assert_eq!(resolved.path, expected);
        assert_eq!(resolved.source, PathSource::Default);
    }

    #[test]
    fn test_json_preferred_over_jsonc() {
        let home = tempfile::tempdir().unwrap();
        let json = write_default(home.path(), "packages.json");
        write_default(home.path(), "packages.jsonc");
        let env = ScriptedEnv::new().home(home.path());

        assert_eq!(resolve_package_file(&env, None).unwrap().path, json);
    }

    #[test]
    fn test_jsonc_used_when_json_missing() {
        let home = tempfile::tempdir().unwrap();
        let jsonc = write_default(home.path(), "packages.jsonc");
        let env = ScriptedEnv::new().home(home.path());

        assert_eq!(resolve_package_file(&env, None).unwrap().path, jsonc);
    }

    #[test]
    fn test_not_found_lists_candidates() {
        let home = tempfile::tempdir().unwrap();
        let env = ScriptedEnv::new().home(home.path());

        match resolve_package_file(&env, None) {
            Err(ConfigError::NotFound { candidates }) => {
                assert_eq!(candidates.len(), 2);
                assert!(candidates[0].ends_with(".config/confix/packages.json"));
                assert!(candidates[1].ends_with(".config/confix/packages.jsonc"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_no_home_dir() {
        let env = ScriptedEnv::new();
        assert!(matches!(
            resolve_package_file(&env, None),
            Err(ConfigError::NoHomeDir)
        ));
    }

    #[test]
    fn test_override_expands_tilde_and_vars() {
        let env = ScriptedEnv::new().home(Path::new("/home/user")).var("DOTFILES", "/srv/dots");

        assert_eq!(
            resolve_package_file(&env, Some("~/pkgs.json")).unwrap().path,
            PathBuf::from("/home/user/pkgs.json")
        );
        assert_eq!(
            expand(&env, "$DOTFILES/confix/packages.jsonc"),
            PathBuf::from("/srv/dots/confix/packages.jsonc")
        );
    }

    #[test]
    fn test_expand_unknown_var_unchanged() {
        let env = ScriptedEnv::new().home(Path::new("/home/user"));
        assert_eq!(
            expand(&env, "/path/$NONEXISTENT_VAR_12345/file"),
            PathBuf::from("/path/$NONEXISTENT_VAR_12345/file")
        );
    }

    #[test]
    fn test_display_path_shortens_home() {
        let env = ScriptedEnv::new().home(Path::new("/home/user"));
        assert_eq!(
            display_path(&env, Path::new("/home/user/.config/confix/packages.json")),
            "~/.config/confix/packages.json"
        );
        assert_eq!(display_path(&env, Path::new("/etc/confix.json")), "/etc/confix.json");
    }
}
