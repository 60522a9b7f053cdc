//! Storage infrastructure: scoped key-value persistence.
//!
//! A [`Storage`] is a thin adapter between the option registry and the file
//! system.  Each instance is bound to one TOML file and handles:
//!
//! - Loading the file once when the storage is opened (a missing file is an
//!   empty mapping, a malformed one is an error).
//! - Typed reads through `serde`, with no coercion between value kinds.
//! - Writing the whole mapping back to disk on every mutation.
//!
//! The storage has no knowledge of options or images; it only maps string
//! keys to TOML values.  The CLI creates two of them per process, one for the
//! user-global scope and one for the current project.

pub mod scoped;

pub use scoped::{Storage, StorageError};
