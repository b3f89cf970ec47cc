//! Props synthesized for a bound widget.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::event::{BlurEvent, FieldEvent};
use crate::field::FieldValue;

/// Change handler handed to the bound widget.
pub type ChangeHandler = Arc<dyn Fn(FieldEvent) + Send + Sync>;

/// Blur handler handed to the bound widget.
pub type BlurHandler = Arc<dyn Fn(BlurEvent) + Send + Sync>;

/// Caller-supplied change transform. Its return value feeds value extraction.
pub type ChangeTransform = Arc<dyn Fn(FieldEvent) -> FieldEvent + Send + Sync>;

/// Caller-supplied blur callback, run before touched tracking.
pub type BlurCallback = Arc<dyn Fn(&BlurEvent) + Send + Sync>;

/// Standard prop keys:
/// - `"name"` - the field path
/// - `"onChange"` - change handler
/// - `"onBlur"` - blur handler
/// - `"value"` - value of a generic field
/// - `"checked"` - value of a checkbox-like field
pub const NAME_PROP: &str = "name";
pub const CHANGE_PROP: &str = "onChange";
pub const BLUR_PROP: &str = "onBlur";
pub const VALUE_PROP: &str = "value";
pub const CHECKED_PROP: &str = "checked";

/// Overrides for the keys of the synthesized handler and value props.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropNames {
    pub on_change: Option<String>,
    pub on_blur: Option<String>,
    pub value: Option<String>,
}

impl PropNames {
    pub fn change_key(&self) -> &str {
        self.on_change.as_deref().unwrap_or(CHANGE_PROP)
    }

    pub fn blur_key(&self) -> &str {
        self.on_blur.as_deref().unwrap_or(BLUR_PROP)
    }

    /// Key of the value prop; checkbox-like fields default to `checked`.
    pub fn value_key(&self, is_checkbox_like: bool) -> &str {
        match &self.value {
            Some(key) => key.as_str(),
            None if is_checkbox_like => CHECKED_PROP,
            None => VALUE_PROP,
        }
    }
}

/// One synthesized prop.
#[derive(Clone)]
pub enum Prop {
    Value(FieldValue),
    Change(ChangeHandler),
    Blur(BlurHandler),
}

impl Prop {
    pub fn as_value(&self) -> Option<&FieldValue> {
        match self {
            Prop::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_change(&self) -> Option<&ChangeHandler> {
        match self {
            Prop::Change(handler) => Some(handler),
            _ => None,
        }
    }

    pub fn as_blur(&self) -> Option<&BlurHandler> {
        match self {
            Prop::Blur(handler) => Some(handler),
            _ => None,
        }
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Prop::Change(_) => f.write_str("Change(<handler>)"),
            Prop::Blur(_) => f.write_str("Blur(<handler>)"),
        }
    }
}

/// Props for a bound widget, keyed by prop name.
///
/// Later inserts replace earlier ones, so handler and value props win over
/// caller extras that reuse their keys.
#[derive(Debug, Clone, Default)]
pub struct FieldProps {
    props: BTreeMap<String, Prop>,
}

impl FieldProps {
    pub(crate) fn insert(&mut self, key: impl Into<String>, prop: Prop) {
        self.props.insert(key.into(), prop);
    }

    pub fn get(&self, key: &str) -> Option<&Prop> {
        self.props.get(key)
    }

    /// The field path carried in the `name` prop.
    pub fn name(&self) -> Option<&str> {
        self.value(NAME_PROP).and_then(FieldValue::as_str)
    }

    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.get(key).and_then(Prop::as_value)
    }

    pub fn change(&self, key: &str) -> Option<&ChangeHandler> {
        self.get(key).and_then(Prop::as_change)
    }

    pub fn blur(&self, key: &str) -> Option<&BlurHandler> {
        self.get(key).and_then(Prop::as_blur)
    }

    /// Fire the change handler stored under `key`. Returns false if absent.
    pub fn emit_change(&self, key: &str, event: FieldEvent) -> bool {
        match self.change(key) {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }

    /// Fire the blur handler stored under `key`. Returns false if absent.
    pub fn emit_blur(&self, key: &str, event: BlurEvent) -> bool {
        match self.blur(key) {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prop)> {
        self.props.iter().map(|(key, prop)| (key.as_str(), prop))
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}
