//! Interaction events delivered by bound widgets, and value extraction.

use crate::field::FieldValue;

/// A change event as delivered by a bound widget.
///
/// Widgets that emit proper interaction events use [`FieldEvent::Input`].
/// Widgets (or caller transforms) that already know the value they want
/// stored can hand it over directly with [`FieldEvent::Value`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// An interaction on the widget.
    Input {
        /// The widget's value (text, number, file list, ...).
        value: FieldValue,
        /// The widget's checked state. Only read for checkbox-like fields.
        checked: bool,
    },
    /// An already-resolved value.
    Value(FieldValue),
}

impl FieldEvent {
    /// An interaction carrying an arbitrary value.
    pub fn input(value: impl Into<FieldValue>, checked: bool) -> Self {
        Self::Input {
            value: value.into(),
            checked,
        }
    }

    /// A text widget changed.
    pub fn text(text: impl Into<String>) -> Self {
        Self::input(FieldValue::String(text.into()), false)
    }

    /// A checkbox was toggled.
    pub fn checkbox(checked: bool) -> Self {
        Self::input(FieldValue::Bool(checked), checked)
    }

    /// A raw value, bypassing event inspection.
    pub fn value(value: impl Into<FieldValue>) -> Self {
        Self::Value(value.into())
    }
}

impl From<FieldValue> for FieldEvent {
    fn from(value: FieldValue) -> Self {
        Self::Value(value)
    }
}

/// A blur event as delivered by a bound widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlurEvent {
    /// The element that received focus (if any).
    pub new_target: Option<String>,
}

impl BlurEvent {
    /// Focus moved to `target`.
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            new_target: Some(target.into()),
        }
    }
}

/// Compute the value to store for a change event.
///
/// Checkbox-like fields store the checked flag of an interaction event; every
/// other field stores the event's value. Raw values pass through untouched.
pub fn extract(event: FieldEvent, is_checkbox_like: bool) -> FieldValue {
    match event {
        FieldEvent::Input { checked, .. } if is_checkbox_like => FieldValue::Bool(checked),
        FieldEvent::Input { value, .. } => value,
        FieldEvent::Value(value) => value,
    }
}
