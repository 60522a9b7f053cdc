//! lean-config-cli library entry point.
//!
//! Holds everything the `lean-config` binary does besides argument parsing,
//! so that integration tests in `tests/` and `main.rs` share one module tree.
//!
//! - **`paths`** – where the global and project scope files live.
//! - **`commands`** – `list`, `get`, `set`, `unset` and `image` handlers.

pub mod commands;
pub mod paths;

use std::path::Path;

use anyhow::{Context, Result};
use lean_config::{CliConfigManager, Storage};

/// Opens both scope storages and builds the registry on top of them.
///
/// # Errors
///
/// Fails if either scope file exists but cannot be read or parsed.
pub fn open_manager(global_path: &Path, project_path: &Path) -> Result<CliConfigManager> {
    let global = Storage::open(global_path)
        .with_context(|| format!("failed to open global config {}", global_path.display()))?;
    let project = Storage::open(project_path)
        .with_context(|| format!("failed to open project config {}", project_path.display()))?;
    Ok(CliConfigManager::new(global, project))
}
