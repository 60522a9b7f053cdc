//! Configurable option descriptors.

use std::fmt;

/// Which storage scope backs an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Shared by every project of the current user.
    Global,
    /// Specific to the project in the working directory.
    Project,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Global => f.write_str("global"),
            Location::Project => f.write_str("project"),
        }
    }
}

/// Number of trailing characters left visible when masking a sensitive value.
const UNMASKED_SUFFIX: usize = 4;

/// Describes one configurable setting.
///
/// The descriptor does not hold the value; values live in the [`Storage`]
/// selected by [`ConfigOption::location`].
///
/// [`Storage`]: crate::storage::Storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOption {
    key: String,
    description: String,
    location: Location,
    sensitive: bool,
    choices: Option<Vec<String>>,
}

impl ConfigOption {
    pub fn new(key: impl Into<String>, description: impl Into<String>, location: Location) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            location,
            sensitive: false,
            choices: None,
        }
    }

    /// Marks the option as holding a secret that must be masked on display.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Restricts the option to a fixed set of values.
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    pub fn choices(&self) -> Option<&[String]> {
        self.choices.as_deref()
    }

    /// Returns `true` if `value` may be stored for this option.
    ///
    /// Options without a choice list accept any value.
    pub fn accepts(&self, value: &str) -> bool {
        match &self.choices {
            Some(choices) => choices.iter().any(|c| c == value),
            None => true,
        }
    }

    /// Formats `value` for display, masking all but the last few characters
    /// of sensitive values.
    pub fn display_value(&self, value: &str) -> String {
        if !self.sensitive {
            return value.to_string();
        }

        // Values too short to keep a suffix are masked entirely.
        let len = value.chars().count();
        let masked = if len > UNMASKED_SUFFIX {
            len - UNMASKED_SUFFIX
        } else {
            len
        };
        value
            .chars()
            .enumerate()
            .map(|(i, c)| if i < masked { '*' } else { c })
            .collect()
    }
}
