//! # lean-config
//!
//! Typed configuration for the Lean command-line tool: scoped file storage,
//! a registry of named options bound to those storages, and the rules for
//! resolving which container images to run.
//!
//! # Architecture overview
//!
//! ```text
//! CliConfigManager ─── options: [ConfigOption]  (fixed order, exact-key lookup)
//!        │
//!        ├── Storage (global)   ~/.config/lean/config.toml
//!        ├── Storage (project)  <project>/.lean/config.toml
//!        └── ImageDefaults ──► DockerImage / "name:version" strings
//! ```
//!
//! - **`storage`** – [`Storage`], a TOML-file-backed mapping with typed
//!   accessors and write-through persistence.
//! - **`domain`** – [`DockerImage`] and [`ConfigOption`]; pure values with no
//!   I/O.
//! - **`config`** – [`CliConfigManager`] plus the shipped defaults.
//!
//! The crate never prints, exits or installs a log subscriber.  It emits
//! `tracing` events at `debug`/`trace` level and returns typed errors; the
//! binary decides how to present them.
//!
//! # Example
//!
//! ```rust,no_run
//! use lean_config::{CliConfigManager, Storage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let global = Storage::open("/home/me/.config/lean/config.toml")?;
//! let project = Storage::open("./.lean/config.toml")?;
//! let mut manager = CliConfigManager::new(global, project);
//!
//! manager.set_value("default-language", "python")?;
//! let image = manager.get_engine_image(None)?;
//! assert_eq!(image.to_string(), "quantconnect/lean:latest");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod storage;

// Re-export the most-used types at the crate root so callers can write
// `lean_config::Storage` instead of `lean_config::storage::scoped::Storage`.
pub use config::defaults::{
    DEFAULT_ENGINE_IMAGE, DEFAULT_ENGINE_IMAGE_BASE_NAME, DEFAULT_IMAGE_VERSION,
    DEFAULT_RESEARCH_IMAGE, DEFAULT_RESEARCH_IMAGE_BASE_NAME,
};
pub use config::{CliConfigManager, ConfigError, ImageDefaults};
pub use domain::{ConfigOption, DockerImage, ImageError, Location, DEFAULT_TAG};
pub use storage::{Storage, StorageError};
