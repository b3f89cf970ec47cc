//! In-memory form control for tether field adapters.
//!
//! [`FormControl`] keeps the registration table, errors, touched flags and
//! submission state of one form, and evaluates each field's rules when the
//! adapters (or a submit) ask it to.

mod arrays;
pub mod config;
pub mod control;

pub use config::{ConfigError, FormConfig};
pub use control::{FormControl, RenderCallback};

pub mod prelude {
    pub use crate::config::{ConfigError, FormConfig};
    pub use crate::control::FormControl;
    pub use tether::prelude::*;
}
