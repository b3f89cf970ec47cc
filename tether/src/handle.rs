//! The record a field adapter installs into its control.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::field::{FieldName, FieldValue};

/// Callback the control may invoke to focus the bound widget.
pub type FocusCallback = Arc<dyn Fn() + Send + Sync>;

/// Unique identity of one registration.
///
/// Re-registering a field produces a new handle with a new id, which lets the
/// control tell stale listener bindings apart from current ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(Uuid);

impl HandleId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__field_{}", self.0.simple())
    }
}

/// Live get/set access to a field's value.
///
/// The control reads field values and pushes external writes (resets,
/// programmatic updates) through this, never polling the adapter.
pub trait ValueAccessor: Send + Sync {
    /// Read the current value.
    fn get(&self) -> FieldValue;

    /// Replace the current value.
    fn set(&self, value: FieldValue);
}

/// A field registration: name, focus callback and value accessor.
///
/// Cheap to clone; clones share the accessor.
#[derive(Clone)]
pub struct FieldHandle {
    id: HandleId,
    name: FieldName,
    focus: Option<FocusCallback>,
    value: Arc<dyn ValueAccessor>,
}

impl FieldHandle {
    /// Create a handle backed by `value`.
    pub fn new(name: FieldName, value: Arc<dyn ValueAccessor>) -> Self {
        Self {
            id: HandleId::new(),
            name,
            focus: None,
            value,
        }
    }

    /// Attach a focus callback.
    pub fn with_focus(mut self, focus: Option<FocusCallback>) -> Self {
        self.focus = focus;
        self
    }

    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// Read the field's current value.
    pub fn value(&self) -> FieldValue {
        self.value.get()
    }

    /// Write a value into the field.
    pub fn set_value(&self, value: FieldValue) {
        self.value.set(value);
    }

    /// Focus the bound widget. Returns false if no focus callback is set.
    pub fn focus(&self) -> bool {
        match &self.focus {
            Some(focus) => {
                focus();
                true
            }
            None => false,
        }
    }

    pub fn has_focus(&self) -> bool {
        self.focus.is_some()
    }
}

impl fmt::Debug for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("has_focus", &self.focus.is_some())
            .finish()
    }
}
