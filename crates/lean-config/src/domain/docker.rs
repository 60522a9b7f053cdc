//! Container image references.
//!
//! A reference has the form `name[:tag]`.  The name may contain `/` to
//! namespace the repository (`quantconnect/lean`) and may start with a
//! registry host and port (`localhost:5000/lean`).  When no tag is given the
//! reference means [`DEFAULT_TAG`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Tag used when a reference does not name one.
pub const DEFAULT_TAG: &str = "latest";

/// Errors that can occur when parsing an image reference.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    /// The reference does not contain a repository name.
    #[error("invalid image reference '{0}': name must not be empty")]
    InvalidFormat(String),
}

/// An immutable `name:tag` image reference.
///
/// Equality is structural: two images are equal when both the name and the
/// tag match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DockerImage {
    name: String,
    tag: String,
}

impl DockerImage {
    /// Builds an image from its parts.  A missing or empty `tag` becomes
    /// [`DEFAULT_TAG`].
    ///
    /// The name is taken as given; use [`DockerImage::parse`] for untrusted
    /// input.
    pub fn new(name: impl Into<String>, tag: Option<&str>) -> Self {
        let tag = match tag {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => DEFAULT_TAG.to_string(),
        };
        Self {
            name: name.into(),
            tag,
        }
    }

    /// Parses a `name[:tag]` reference, splitting on the last `:`.
    ///
    /// A colon whose right-hand side contains `/` belongs to a registry port,
    /// so `localhost:5000/lean` parses as name `localhost:5000/lean` with the
    /// default tag.  An empty tag (`lean:`) also falls back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidFormat`] if the name part is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lean_config::DockerImage;
    ///
    /// let image = DockerImage::parse("custom/engine:3").unwrap();
    /// assert_eq!(image.name(), "custom/engine");
    /// assert_eq!(image.tag(), "3");
    /// assert_eq!(image.to_string(), "custom/engine:3");
    /// ```
    pub fn parse(reference: &str) -> Result<Self, ImageError> {
        let (name, tag) = match reference.rsplit_once(':') {
            Some((name, tag)) if !tag.contains('/') => (name, Some(tag)),
            _ => (reference, None),
        };

        if name.trim().is_empty() {
            return Err(ImageError::InvalidFormat(reference.to_string()));
        }

        Ok(Self::new(name, tag))
    }

    /// Repository name, without the tag.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tag; [`DEFAULT_TAG`] when the reference carried none.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for DockerImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

impl FromStr for DockerImage {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
