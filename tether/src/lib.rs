//! Bind arbitrary input widgets to a shared form state.
//!
//! A widget that knows nothing about validation is wrapped in a
//! [`FieldController`](controller::FieldController), which registers it with
//! a [`Control`] (the form-state store), mirrors its value in both
//! directions, and decides when changes and blurs should validate.

pub mod context;
pub mod control;
pub mod controller;
pub mod error;
pub mod event;
pub mod field;
pub mod gate;
pub mod handle;
pub mod mode;
pub mod path;
pub mod props;
pub mod shadow;
pub mod validation;

pub use control::{Control, SharedControl};
pub use controller::{ControllerProps, FieldController};
pub use error::{BindError, RuleError};
pub use field::{FieldName, FieldValue};

pub mod prelude {
    pub use crate::context::{ControlGuard, current_control, provide_control};
    pub use crate::control::{Control, SharedControl};
    pub use crate::controller::{ControllerProps, FieldController};
    pub use crate::error::{BindError, RuleError};
    pub use crate::event::{BlurEvent, FieldEvent};
    pub use crate::field::{FieldName, FieldValue};
    pub use crate::gate::{GateContext, Interaction, should_validate};
    pub use crate::handle::{FieldHandle, FocusCallback, HandleId, ValueAccessor};
    pub use crate::mode::{ModeFlags, ReValidateFlags, ReValidateMode, ValidationMode};
    pub use crate::props::{FieldProps, Prop, PropNames};
    pub use crate::validation::{FieldError, RuleKind, Rules, ValidationResult};
}
