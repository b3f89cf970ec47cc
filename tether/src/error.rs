//! Error types for binding fields and building rule sets.

use thiserror::Error;

/// Errors raised while mounting a field adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The field name was empty or whitespace.
    #[error("field name must not be empty")]
    EmptyName,

    /// No control was supplied and none is current on this thread.
    #[error("no form control available for field '{0}'")]
    NoControl(String),
}

/// Errors raised while building a rule set.
#[derive(Debug, Clone, Error)]
pub enum RuleError {
    /// A `pattern` rule was given an invalid regular expression.
    #[error("invalid pattern '{pattern}'")]
    InvalidPattern {
        /// The rejected pattern source.
        pattern: String,
        /// Why the regex engine rejected it.
        #[source]
        source: regex::Error,
    },
}
