//! Resolution of the two storage scope files.
//!
//! - Global (per user):
//!   - Windows:  `%APPDATA%\Lean\config.toml`
//!   - Linux:    `$XDG_CONFIG_HOME/lean/config.toml` or `~/.config/lean/config.toml`
//!   - macOS:    `~/Library/Application Support/Lean/config.toml`
//! - Project: `<project dir>/.lean/config.toml`
//!
//! The library takes both paths as plain arguments; deciding where they live
//! is the front end's job.

#[cfg(target_os = "linux")]
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// File name used in both scopes.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory, relative to the project root, holding the project scope file.
pub const PROJECT_CONFIG_DIR: &str = ".lean";

/// Error type for path resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,
}

/// Determines the platform-appropriate directory for the global scope.
///
/// # Errors
///
/// Returns [`PathError::NoPlatformConfigDir`] when the base directory cannot be
/// determined from the environment.
pub fn global_config_dir() -> Result<PathBuf, PathError> {
    platform_config_dir().ok_or(PathError::NoPlatformConfigDir)
}

/// Resolves the full path of the global scope file.
pub fn global_config_path() -> Result<PathBuf, PathError> {
    Ok(global_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Resolves the project scope file for the project rooted at `project_dir`.
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(PROJECT_CONFIG_DIR).join(CONFIG_FILE_NAME)
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Lean"))
    }

    #[cfg(target_os = "linux")]
    {
        xdg_config_dir(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("Lean"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

/// `$XDG_CONFIG_HOME/lean`, falling back to `$HOME/.config/lean`.  An empty
/// `XDG_CONFIG_HOME` counts as unset.
#[cfg(target_os = "linux")]
fn xdg_config_dir(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let base = xdg_config_home
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("lean"))
}
