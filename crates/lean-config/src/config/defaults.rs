//! Default image references and the registry's built-in options.
//!
//! The constants are the values the CLI ships with.  The registry never reads
//! them directly; it receives an [`ImageDefaults`] at construction so tests and
//! embedders can substitute their own.

use crate::domain::{ConfigOption, Location};

/// Image used to run the engine when nothing else is configured.
pub const DEFAULT_ENGINE_IMAGE: &str = "quantconnect/lean:latest";
/// Image used to run research notebooks when nothing else is configured.
pub const DEFAULT_RESEARCH_IMAGE: &str = "quantconnect/research:latest";
/// Repository of the engine image, without a tag.
pub const DEFAULT_ENGINE_IMAGE_BASE_NAME: &str = "quantconnect/lean";
/// Repository of the research image, without a tag.
pub const DEFAULT_RESEARCH_IMAGE_BASE_NAME: &str = "quantconnect/research";
/// Tag used when a version-pinned image name is requested without a version.
pub const DEFAULT_IMAGE_VERSION: &str = "latest";

/// Stable keys of the built-in options.
pub mod keys {
    pub const USER_ID: &str = "user-id";
    pub const API_TOKEN: &str = "api-token";
    pub const DEFAULT_LANGUAGE: &str = "default-language";
    pub const ENGINE_IMAGE: &str = "engine-image";
    pub const RESEARCH_IMAGE: &str = "research-image";
    pub const DATABASE_UPDATE_FREQUENCY: &str = "database-update-frequency";
}

/// Default image references consumed by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDefaults {
    /// Full reference returned when no engine image override is given.
    pub engine_image: String,
    /// Full reference returned when no research image override is given.
    pub research_image: String,
    /// Repository used to build version-pinned engine image names.
    pub engine_base_name: String,
    /// Repository used to build version-pinned research image names.
    pub research_base_name: String,
    /// Tag used by version-pinned names when no version is given.
    pub image_version: String,
}

impl Default for ImageDefaults {
    fn default() -> Self {
        Self {
            engine_image: DEFAULT_ENGINE_IMAGE.to_string(),
            research_image: DEFAULT_RESEARCH_IMAGE.to_string(),
            engine_base_name: DEFAULT_ENGINE_IMAGE_BASE_NAME.to_string(),
            research_base_name: DEFAULT_RESEARCH_IMAGE_BASE_NAME.to_string(),
            image_version: DEFAULT_IMAGE_VERSION.to_string(),
        }
    }
}

/// Options every registry starts with, in display order.
pub fn builtin_options() -> Vec<ConfigOption> {
    vec![
        ConfigOption::new(
            keys::USER_ID,
            "The user id used when making authenticated requests to the QuantConnect API.",
            Location::Global,
        )
        .sensitive(),
        ConfigOption::new(
            keys::API_TOKEN,
            "The API token used when making authenticated requests to the QuantConnect API.",
            Location::Global,
        )
        .sensitive(),
        ConfigOption::new(
            keys::DEFAULT_LANGUAGE,
            "The default language used when creating new projects.",
            Location::Global,
        )
        .with_choices(["python", "csharp"]),
        ConfigOption::new(
            keys::ENGINE_IMAGE,
            format!(
                "The Docker image used when running the LEAN engine ({DEFAULT_ENGINE_IMAGE} if not set)."
            ),
            Location::Project,
        ),
        ConfigOption::new(
            keys::RESEARCH_IMAGE,
            format!(
                "The Docker image used when running the research environment ({DEFAULT_RESEARCH_IMAGE} if not set)."
            ),
            Location::Project,
        ),
        ConfigOption::new(
            keys::DATABASE_UPDATE_FREQUENCY,
            "How often the local market data databases should be updated, in days.",
            Location::Global,
        ),
    ]
}
