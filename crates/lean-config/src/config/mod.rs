//! The option registry.
//!
//! - **`defaults`** – shipped image references, the [`ImageDefaults`] value
//!   that carries them into the registry, and the built-in option list.
//! - **`manager`** – [`CliConfigManager`], which binds options to the global
//!   and project storages and resolves container images.

pub mod defaults;
pub mod manager;

pub use defaults::{builtin_options, keys, ImageDefaults};
pub use manager::{CliConfigManager, ConfigError};
