//! Form configuration.

use serde::{Deserialize, Serialize};
use tether::FieldValue;
use tether::mode::{ReValidateMode, ValidationMode};
use thiserror::Error;

/// Per-form configuration.
///
/// Deserializes from JSON using camelCase keys; missing keys take defaults.
///
/// ```json
/// {
///   "mode": "onBlur",
///   "reValidateMode": "onChange",
///   "defaultValues": { "email": "a@b.com" },
///   "trackTouched": true
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormConfig {
    /// When fields validate before the first submit.
    pub mode: ValidationMode,

    /// When fields validate again after a submit.
    pub re_validate_mode: ReValidateMode,

    /// Initial values, addressed by field path.
    pub default_values: FieldValue,

    /// Record which fields have been blurred.
    pub track_touched: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::default(),
            re_validate_mode: ReValidateMode::default(),
            default_values: FieldValue::Object(Default::default()),
            track_touched: true,
        }
    }
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the validation mode.
    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the revalidation mode.
    pub fn re_validate_mode(mut self, mode: ReValidateMode) -> Self {
        self.re_validate_mode = mode;
        self
    }

    /// Set the default values.
    pub fn default_values(mut self, values: FieldValue) -> Self {
        self.default_values = values;
        self
    }

    /// Enable or disable touched tracking.
    pub fn track_touched(mut self, track: bool) -> Self {
        self.track_touched = track;
        self
    }
}

/// Errors that can occur when loading a form configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid form configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
