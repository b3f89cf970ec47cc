//! Field names and values.

use std::fmt;

use crate::error::BindError;

/// The semantic value of a field.
///
/// Strings, numbers, booleans, arrays (file lists, multi-selects) and nested
/// objects are all carried as JSON values. A field with no value holds `Null`.
pub type FieldValue = serde_json::Value;

/// Dot/bracket path naming a field in the form's value tree.
///
/// Examples: `"email"`, `"address.city"`, `"items[0].title"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldName(String);

impl FieldName {
    /// Create a field name, rejecting empty paths.
    pub fn new(name: impl Into<String>) -> Result<Self, BindError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BindError::EmptyName);
        }
        Ok(Self(name))
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for FieldName {
    type Error = BindError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl TryFrom<String> for FieldName {
    type Error = BindError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_names() {
        assert_eq!(FieldName::new(""), Err(BindError::EmptyName));
        assert_eq!(FieldName::new("   "), Err(BindError::EmptyName));
    }

    #[test]
    fn test_keeps_path_verbatim() {
        let name = FieldName::new("items[0].title").unwrap();
        assert_eq!(name.as_str(), "items[0].title");
        assert_eq!(name.to_string(), "items[0].title");
    }
}
