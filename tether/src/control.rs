//! The form-state store contract consumed by field adapters.

use std::sync::Arc;

use crate::field::FieldValue;
use crate::handle::FieldHandle;
use crate::mode::{ModeFlags, ReValidateFlags};
use crate::validation::Rules;

/// Shared, type-erased control.
pub type SharedControl = Arc<dyn Control>;

/// A form-state store that field adapters register into.
///
/// Adapters call these from their handlers and lifecycle hooks. All methods
/// take `&self`; implementations keep their state behind interior mutability
/// and must not call back into an adapter while holding their own locks.
pub trait Control: Send + Sync {
    /// Install `handle` under its name, replacing any previous handle.
    ///
    /// The previous handle's listener bindings must be detached before the
    /// new handle becomes visible.
    fn register(&self, handle: FieldHandle, rules: Rules);

    /// Remove the handle, error and touched flag for `name`.
    fn unregister(&self, name: &str);

    /// Store `value` for `name`, validating it if `should_validate` is set.
    fn set_value(&self, name: &str, value: FieldValue, should_validate: bool);

    /// Validate `name` now. Returns true if it passed.
    fn trigger(&self, name: &str) -> bool;

    /// Detach listener bindings installed for `handle`.
    ///
    /// With `force`, also drop the handle from the registration table.
    fn remove_field_event_listener(&self, handle: &FieldHandle, force: bool);

    /// The handle currently registered under `name`.
    fn field(&self, name: &str) -> Option<FieldHandle>;

    /// The form's default value at `name`.
    fn default_value(&self, name: &str) -> Option<FieldValue>;

    fn has_error(&self, name: &str) -> bool;

    /// Whether the form tracks touched fields at all.
    fn tracks_touched(&self) -> bool;

    fn is_touched(&self, name: &str) -> bool;

    fn mark_touched(&self, name: &str);

    fn mode(&self) -> ModeFlags;

    fn revalidate_mode(&self) -> ReValidateFlags;

    fn is_submitted(&self) -> bool;

    /// Whether `name` lives inside a dynamically managed field array.
    fn is_field_array_name(&self, name: &str) -> bool;

    /// Ask the host to re-render. Fire and forget.
    fn re_render(&self);
}
