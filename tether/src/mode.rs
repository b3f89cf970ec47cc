//! Validation and revalidation modes.

use serde::{Deserialize, Serialize};

/// When a field is validated before the form has been submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    /// Only on submit.
    #[default]
    OnSubmit,
    /// When the field loses focus.
    OnBlur,
    /// On every change.
    OnChange,
}

impl ValidationMode {
    /// Expand into the flag form read by the validation gate.
    pub fn flags(self) -> ModeFlags {
        ModeFlags {
            is_on_submit: self == Self::OnSubmit,
            is_on_blur: self == Self::OnBlur,
            is_on_change: self == Self::OnChange,
        }
    }
}

/// When a field is validated again after the form has been submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReValidateMode {
    /// On every change.
    #[default]
    OnChange,
    /// When the field loses focus.
    OnBlur,
    /// Only on the next submit.
    OnSubmit,
}

impl ReValidateMode {
    /// Expand into the flag form read by the validation gate.
    pub fn flags(self) -> ReValidateFlags {
        ReValidateFlags {
            is_revalidate_on_blur: self == Self::OnBlur,
            is_revalidate_on_submit: self == Self::OnSubmit,
        }
    }
}

/// Primary validation mode as individual flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub is_on_submit: bool,
    pub is_on_blur: bool,
    pub is_on_change: bool,
}

/// Revalidation mode as individual flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReValidateFlags {
    pub is_revalidate_on_blur: bool,
    pub is_revalidate_on_submit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_deserialize_camel_case() {
        let mode: ValidationMode = serde_json::from_str("\"onBlur\"").unwrap();
        assert_eq!(mode, ValidationMode::OnBlur);
        let mode: ReValidateMode = serde_json::from_str("\"onSubmit\"").unwrap();
        assert_eq!(mode, ReValidateMode::OnSubmit);
    }

    #[test]
    fn test_exactly_one_flag_set() {
        let flags = ValidationMode::OnChange.flags();
        assert!(flags.is_on_change && !flags.is_on_blur && !flags.is_on_submit);

        let flags = ReValidateMode::OnChange.flags();
        assert!(!flags.is_revalidate_on_blur && !flags.is_revalidate_on_submit);
    }
}
