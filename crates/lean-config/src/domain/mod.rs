//! Domain types for the configuration registry.
//!
//! Everything in here is pure data plus the rules that govern it: no file
//! system access, no logging, no knowledge of where values are stored.
//!
//! - **`docker`** – [`DockerImage`], the `name:tag` reference used to pick the
//!   engine and research containers, and its parsing rules.
//! - **`option`** – [`ConfigOption`], the descriptor of one configurable
//!   setting and the [`Location`] of the storage it lives in.

pub mod docker;
pub mod option;

pub use docker::{DockerImage, ImageError, DEFAULT_TAG};
pub use option::{ConfigOption, Location};
