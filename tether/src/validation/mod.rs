//! Field rule sets and validation results.
//!
//! Adapters never interpret rules: they hand the [`Rules`] they were given to
//! the control at registration time, and the control evaluates them.
//!
//! # Example
//!
//! ```ignore
//! use tether::validation::Rules;
//!
//! let rules = Rules::new()
//!     .required("Email is required")
//!     .email("Please enter a valid email")
//!     .max_length(120, "Email is too long");
//! ```

mod result;
mod rules;

pub use result::{FieldError, ValidationResult};
pub use rules::{RuleKind, Rules};
