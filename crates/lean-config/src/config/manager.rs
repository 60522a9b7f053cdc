//! The option registry and image-resolution facade.
//!
//! [`CliConfigManager`] owns the two scoped storages and a fixed, ordered list
//! of [`ConfigOption`] descriptors.  Callers look options up by key and read or
//! write their values through the manager, which routes every access to the
//! storage the option is bound to.
//!
//! # Image resolution
//!
//! Two kinds of image questions are answered here and kept apart on purpose:
//!
//! ```text
//! "which image do I run?"          get_engine_image(override)       -> DockerImage
//! "what is the name of version v?" get_engine_image_name_from_version(v) -> String
//! ```
//!
//! The first starts from a full default reference (`quantconnect/lean:latest`)
//! and yields a structured value; the second starts from a base name plus a
//! version and yields a plain string for pinned pulls and upgrades.

use thiserror::Error;
use toml::Value;
use tracing::{debug, trace};

use crate::config::defaults::{builtin_options, keys, ImageDefaults};
use crate::domain::{ConfigOption, DockerImage, ImageError, Location};
use crate::storage::{Storage, StorageError};

/// Error type for registry operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No option is registered under the key.
    #[error("there doesn't exist an option with key '{0}'")]
    UnknownOption(String),

    /// An option with the same key is already registered.
    #[error("an option with key '{0}' is already registered")]
    DuplicateOption(String),

    /// The value is not one of the option's allowed choices.
    #[error("invalid value '{value}' for option '{key}', expected one of: {}", .choices.join(", "))]
    InvalidValue {
        key: String,
        value: String,
        choices: Vec<String>,
    },

    /// The backing storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A configured or overriding image reference is malformed.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Registry of configurable options bound to a global and a project storage.
#[derive(Debug)]
pub struct CliConfigManager {
    global: Storage,
    project: Storage,
    options: Vec<ConfigOption>,
    defaults: ImageDefaults,
}

impl CliConfigManager {
    /// Creates a registry with the built-in options and the shipped defaults.
    pub fn new(global: Storage, project: Storage) -> Self {
        Self::with_defaults(global, project, ImageDefaults::default())
    }

    /// Creates a registry with the built-in options and custom image defaults.
    pub fn with_defaults(global: Storage, project: Storage, defaults: ImageDefaults) -> Self {
        Self {
            global,
            project,
            options: builtin_options(),
            defaults,
        }
    }

    /// Appends an option after the existing ones.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateOption`] if the key is taken.
    pub fn register(&mut self, option: ConfigOption) -> Result<(), ConfigError> {
        if self.options.iter().any(|o| o.key() == option.key()) {
            return Err(ConfigError::DuplicateOption(option.key().to_string()));
        }
        debug!(key = option.key(), location = %option.location(), "registered option");
        self.options.push(option);
        Ok(())
    }

    /// All registered options, in registration order.
    pub fn options(&self) -> &[ConfigOption] {
        &self.options
    }

    pub fn defaults(&self) -> &ImageDefaults {
        &self.defaults
    }

    /// Returns the storage backing `location`.
    pub fn storage(&self, location: Location) -> &Storage {
        match location {
            Location::Global => &self.global,
            Location::Project => &self.project,
        }
    }

    pub fn storage_mut(&mut self, location: Location) -> &mut Storage {
        match location {
            Location::Global => &mut self.global,
            Location::Project => &mut self.project,
        }
    }

    /// Looks up the descriptor registered under `key` (exact, case-sensitive).
    ///
    /// This does not read the option's value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownOption`] if no option has that key.
    pub fn get_option_by_key(&self, key: &str) -> Result<&ConfigOption, ConfigError> {
        trace!(key, "option lookup");
        self.options
            .iter()
            .find(|o| o.key() == key)
            .ok_or_else(|| ConfigError::UnknownOption(key.to_string()))
    }

    // ── Option values ─────────────────────────────────────────────────────────

    /// Reads the value of option `key`, or `None` if it has not been set.
    ///
    /// Strings come back verbatim.  Values of any other kind, written through
    /// [`CliConfigManager::storage_mut`], are rendered in TOML notation
    /// (`7`, `true`, `["a", "b"]`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownOption`] for unregistered keys.
    pub fn get_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let storage = self.storage(self.get_option_by_key(key)?.location());
        Ok(storage.get_value(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    /// Validates and persists `value` for option `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the option has a choice list
    /// that does not contain `value`, and [`ConfigError::Storage`] if the
    /// value cannot be written.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let option = self.get_option_by_key(key)?;
        if !option.accepts(value) {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                choices: option.choices().unwrap_or_default().to_vec(),
            });
        }

        let location = option.location();
        self.storage_mut(location).set(key, value)?;
        debug!(key, %location, "option value set");
        Ok(())
    }

    /// Removes the stored value of option `key`.  Unsetting an option that
    /// has no value is not an error.
    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        let location = self.get_option_by_key(key)?.location();
        self.storage_mut(location).delete(key)?;
        debug!(key, %location, "option value unset");
        Ok(())
    }

    // ── Image resolution ──────────────────────────────────────────────────────

    /// Returns the engine image to run: `image_override` when given and
    /// non-empty, otherwise the default engine image.
    ///
    /// The stored `engine-image` option is not consulted; see
    /// [`CliConfigManager::get_configured_engine_image`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidFormat`] if the reference has no name.
    pub fn get_engine_image(
        &self,
        image_override: Option<&str>,
    ) -> Result<DockerImage, ImageError> {
        resolve_image(image_override, &self.defaults.engine_image)
    }

    /// Research counterpart of [`CliConfigManager::get_engine_image`].
    pub fn get_research_image(
        &self,
        image_override: Option<&str>,
    ) -> Result<DockerImage, ImageError> {
        resolve_image(image_override, &self.defaults.research_image)
    }

    /// Returns the engine image to run, preferring `image_override`, then the
    /// stored `engine-image` option, then the default.
    pub fn get_configured_engine_image(
        &self,
        image_override: Option<&str>,
    ) -> Result<DockerImage, ConfigError> {
        self.resolve_configured(image_override, keys::ENGINE_IMAGE, &self.defaults.engine_image)
    }

    /// Returns the research image to run, preferring `image_override`, then
    /// the stored `research-image` option, then the default.
    pub fn get_configured_research_image(
        &self,
        image_override: Option<&str>,
    ) -> Result<DockerImage, ConfigError> {
        self.resolve_configured(
            image_override,
            keys::RESEARCH_IMAGE,
            &self.defaults.research_image,
        )
    }

    /// Formats `"{engine base name}:{version}"`, using the default image
    /// version when `version` is absent or empty.  The version is used
    /// verbatim.
    pub fn get_engine_image_name_from_version(&self, version: Option<&str>) -> String {
        self.image_name_from_version(&self.defaults.engine_base_name, version)
    }

    /// Research counterpart of
    /// [`CliConfigManager::get_engine_image_name_from_version`].
    pub fn get_research_image_name_from_version(&self, version: Option<&str>) -> String {
        self.image_name_from_version(&self.defaults.research_base_name, version)
    }

    fn image_name_from_version(&self, base_name: &str, version: Option<&str>) -> String {
        let version = non_empty(version).unwrap_or(self.defaults.image_version.as_str());
        format!("{base_name}:{version}")
    }

    fn resolve_configured(
        &self,
        image_override: Option<&str>,
        key: &str,
        default: &str,
    ) -> Result<DockerImage, ConfigError> {
        if let Some(reference) = non_empty(image_override) {
            return Ok(DockerImage::parse(reference)?);
        }

        match self.get_value(key)? {
            Some(stored) if !stored.is_empty() => {
                trace!(key, image = %stored, "using configured image");
                Ok(DockerImage::parse(&stored)?)
            }
            _ => Ok(DockerImage::parse(default)?),
        }
    }
}

fn resolve_image(image_override: Option<&str>, default: &str) -> Result<DockerImage, ImageError> {
    DockerImage::parse(non_empty(image_override).unwrap_or(default))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::{
        DEFAULT_ENGINE_IMAGE, DEFAULT_ENGINE_IMAGE_BASE_NAME, DEFAULT_IMAGE_VERSION,
        DEFAULT_RESEARCH_IMAGE, DEFAULT_RESEARCH_IMAGE_BASE_NAME,
    };
    use std::path::PathBuf;
    use uuid::Uuid;

    struct Fixture {
        dir: PathBuf,
        manager: CliConfigManager,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("lean_manager_test_{}", Uuid::new_v4()));
            let global = Storage::open(dir.join("global").join("config.toml")).unwrap();
            let project = Storage::open(dir.join("project").join("config.toml")).unwrap();
            Self {
                dir,
                manager: CliConfigManager::new(global, project),
            }
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.dir).ok();
        }
    }

    // ── Option lookup ─────────────────────────────────────────────────────────

    #[test]
    fn test_get_option_by_key_returns_option_with_matching_key() {
        let fx = Fixture::new();

        for key in ["user-id", "api-token", "default-language"] {
            assert_eq!(fx.manager.get_option_by_key(key).unwrap().key(), key);
        }
    }

    #[test]
    fn test_every_registered_option_is_found_by_its_key() {
        let fx = Fixture::new();

        for option in fx.manager.options() {
            let found = fx.manager.get_option_by_key(option.key()).unwrap();
            assert_eq!(found.key(), option.key());
        }
    }

    #[test]
    fn test_get_option_by_key_fails_for_unknown_key() {
        let fx = Fixture::new();

        let result = fx.manager.get_option_by_key("this-option-does-not-exist");

        assert!(matches!(
            result,
            Err(ConfigError::UnknownOption(k)) if k == "this-option-does-not-exist"
        ));
    }

    #[test]
    fn test_get_option_by_key_is_case_sensitive() {
        let fx = Fixture::new();

        assert!(fx.manager.get_option_by_key("User-Id").is_err());
    }

    #[test]
    fn test_register_appends_and_rejects_duplicates() {
        // Arrange
        let mut fx = Fixture::new();
        let count = fx.manager.options().len();

        // Act
        fx.manager
            .register(ConfigOption::new("jupyter-port", "Port", Location::Project))
            .unwrap();
        let duplicate = fx
            .manager
            .register(ConfigOption::new("api-token", "Again", Location::Project));

        // Assert
        assert_eq!(fx.manager.options().len(), count + 1);
        assert_eq!(fx.manager.options().last().unwrap().key(), "jupyter-port");
        assert!(matches!(duplicate, Err(ConfigError::DuplicateOption(_))));
    }

    // ── Option values ─────────────────────────────────────────────────────────

    #[test]
    fn test_set_value_writes_to_bound_storage_only() {
        // Arrange
        let mut fx = Fixture::new();

        // Act
        fx.manager.set_value("api-token", "abc123").unwrap();
        fx.manager.set_value("engine-image", "custom/engine:3").unwrap();

        // Assert
        assert!(fx.manager.storage(Location::Global).has("api-token"));
        assert!(!fx.manager.storage(Location::Project).has("api-token"));
        assert!(fx.manager.storage(Location::Project).has("engine-image"));
        assert!(!fx.manager.storage(Location::Global).has("engine-image"));
        assert_eq!(fx.manager.get_value("api-token").unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_get_value_of_unset_option_is_none() {
        let fx = Fixture::new();

        assert_eq!(fx.manager.get_value("user-id").unwrap(), None);
    }

    #[test]
    fn test_set_value_rejects_value_outside_choices() {
        let mut fx = Fixture::new();

        let result = fx.manager.set_value("default-language", "java");

        match result {
            Err(ConfigError::InvalidValue { choices, .. }) => {
                assert_eq!(choices, vec!["python".to_string(), "csharp".to_string()]);
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        assert_eq!(fx.manager.get_value("default-language").unwrap(), None);
    }

    #[test]
    fn test_unset_removes_value() {
        let mut fx = Fixture::new();
        fx.manager.set_value("default-language", "csharp").unwrap();

        fx.manager.unset("default-language").unwrap();

        assert_eq!(fx.manager.get_value("default-language").unwrap(), None);
    }

    #[test]
    fn test_value_operations_reject_unknown_keys() {
        let mut fx = Fixture::new();

        assert!(matches!(
            fx.manager.get_value("nope"),
            Err(ConfigError::UnknownOption(_))
        ));
        assert!(matches!(
            fx.manager.set_value("nope", "x"),
            Err(ConfigError::UnknownOption(_))
        ));
        assert!(matches!(
            fx.manager.unset("nope"),
            Err(ConfigError::UnknownOption(_))
        ));
    }

    #[test]
    fn test_get_value_renders_non_string_values() {
        // Arrange: a collaborator writes typed values under registered keys
        let mut fx = Fixture::new();
        fx.manager
            .storage_mut(Location::Global)
            .set("database-update-frequency", &7_i64)
            .unwrap();
        fx.manager
            .storage_mut(Location::Global)
            .set("user-id", &true)
            .unwrap();

        // Act
        let frequency = fx.manager.get_value("database-update-frequency").unwrap();
        let user_id = fx.manager.get_value("user-id").unwrap();

        // Assert
        assert_eq!(frequency.as_deref(), Some("7"));
        assert_eq!(user_id.as_deref(), Some("true"));
    }

    // ── Image resolution ──────────────────────────────────────────────────────

    #[test]
    fn test_get_engine_image_returns_default_image_when_nothing_is_passed() {
        let fx = Fixture::new();

        assert_eq!(
            fx.manager.get_engine_image(None).unwrap(),
            DockerImage::parse(DEFAULT_ENGINE_IMAGE).unwrap()
        );
    }

    #[test]
    fn test_get_engine_image_returns_image_from_passed_name() {
        let fx = Fixture::new();

        assert_eq!(
            fx.manager.get_engine_image(Some("custom/engine:3")).unwrap(),
            DockerImage::new("custom/engine", Some("3"))
        );
    }

    #[test]
    fn test_get_engine_image_treats_empty_override_as_absent() {
        let fx = Fixture::new();

        assert_eq!(
            fx.manager.get_engine_image(Some("")).unwrap(),
            DockerImage::parse(DEFAULT_ENGINE_IMAGE).unwrap()
        );
    }

    #[test]
    fn test_get_engine_image_ignores_stored_option() {
        let mut fx = Fixture::new();
        fx.manager.set_value("engine-image", "custom/engine:9").unwrap();

        assert_eq!(
            fx.manager.get_engine_image(None).unwrap(),
            DockerImage::parse(DEFAULT_ENGINE_IMAGE).unwrap()
        );
    }

    #[test]
    fn test_get_engine_image_rejects_override_without_name() {
        let fx = Fixture::new();

        assert!(matches!(
            fx.manager.get_engine_image(Some(":3")),
            Err(ImageError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_get_research_image_returns_default_image_when_nothing_is_passed() {
        let fx = Fixture::new();

        assert_eq!(
            fx.manager.get_research_image(None).unwrap(),
            DockerImage::parse(DEFAULT_RESEARCH_IMAGE).unwrap()
        );
    }

    #[test]
    fn test_get_research_image_returns_image_from_passed_name() {
        let fx = Fixture::new();

        assert_eq!(
            fx.manager.get_research_image(Some("custom/research:3")).unwrap(),
            DockerImage::new("custom/research", Some("3"))
        );
    }

    #[test]
    fn test_get_engine_image_name_with_custom_tag() {
        let fx = Fixture::new();

        assert_eq!(
            fx.manager.get_engine_image_name_from_version(Some("3.5.1")),
            format!("{DEFAULT_ENGINE_IMAGE_BASE_NAME}:3.5.1")
        );
    }

    #[test]
    fn test_get_engine_image_name_with_default_tag() {
        let fx = Fixture::new();

        assert_eq!(
            fx.manager.get_engine_image_name_from_version(None),
            format!("{DEFAULT_ENGINE_IMAGE_BASE_NAME}:{DEFAULT_IMAGE_VERSION}")
        );
    }

    #[test]
    fn test_get_research_image_name_with_custom_tag() {
        let fx = Fixture::new();

        assert_eq!(
            fx.manager.get_research_image_name_from_version(Some("3.5.1")),
            format!("{DEFAULT_RESEARCH_IMAGE_BASE_NAME}:3.5.1")
        );
    }

    #[test]
    fn test_get_research_image_name_with_default_tag() {
        let fx = Fixture::new();

        assert_eq!(
            fx.manager.get_research_image_name_from_version(None),
            format!("{DEFAULT_RESEARCH_IMAGE_BASE_NAME}:{DEFAULT_IMAGE_VERSION}")
        );
    }

    #[test]
    fn test_configured_engine_image_prefers_override_then_stored_then_default() {
        // Arrange
        let mut fx = Fixture::new();

        // Act / Assert: nothing stored
        assert_eq!(
            fx.manager.get_configured_engine_image(None).unwrap(),
            DockerImage::parse(DEFAULT_ENGINE_IMAGE).unwrap()
        );

        // Act / Assert: stored option wins over the default
        fx.manager.set_value("engine-image", "custom/engine:9").unwrap();
        assert_eq!(
            fx.manager.get_configured_engine_image(None).unwrap(),
            DockerImage::new("custom/engine", Some("9"))
        );

        // Act / Assert: override wins over the stored option
        assert_eq!(
            fx.manager.get_configured_engine_image(Some("other/engine:1")).unwrap(),
            DockerImage::new("other/engine", Some("1"))
        );
    }

    #[test]
    fn test_configured_research_image_reports_malformed_stored_value() {
        let mut fx = Fixture::new();
        fx.manager.set_value("research-image", ":broken").unwrap();

        let result = fx.manager.get_configured_research_image(None);

        assert!(matches!(result, Err(ConfigError::Image(ImageError::InvalidFormat(_)))));
    }

    #[test]
    fn test_injected_defaults_replace_shipped_ones() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("lean_manager_test_{}", Uuid::new_v4()));
        let defaults = ImageDefaults {
            engine_image: "mirror/lean:stable".to_string(),
            research_image: "mirror/research".to_string(),
            engine_base_name: "mirror/lean".to_string(),
            research_base_name: "mirror/research".to_string(),
            image_version: "stable".to_string(),
        };
        let manager = CliConfigManager::with_defaults(
            Storage::open(dir.join("g.toml")).unwrap(),
            Storage::open(dir.join("p.toml")).unwrap(),
            defaults,
        );

        // Act / Assert
        assert_eq!(
            manager.get_engine_image(None).unwrap(),
            DockerImage::new("mirror/lean", Some("stable"))
        );
        assert_eq!(manager.get_research_image(None).unwrap().tag(), "latest");
        assert_eq!(manager.get_engine_image_name_from_version(None), "mirror/lean:stable");
        assert_eq!(
            manager.get_research_image_name_from_version(Some("")),
            "mirror/research:stable"
        );
    }
}
