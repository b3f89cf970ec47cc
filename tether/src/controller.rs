//! Field adapter binding one widget to a control.
//!
//! A [`FieldController`] owns the widget's shadow value, registers a
//! [`FieldHandle`] with its control, and hands the widget synthesized props
//! whose change and blur handlers drive validation and touched tracking.
//!
//! The host drives the lifecycle:
//! 1. [`ControllerProps::mount`] resolves the initial value and registers.
//! 2. Each render calls [`FieldController::props`], then
//!    [`FieldController::reconcile`] to recover from store-side resets.
//! 3. [`FieldController::unmount`] (or dropping the controller) unregisters,
//!    unless the field belongs to a field array.
//!
//! # Example
//!
//! ```ignore
//! let email = ControllerProps::new("email")
//!     .rules(Rules::new().required("Email is required"))
//!     .control(form.shared())
//!     .mount()?;
//!
//! let props = email.props();
//! props.emit_change("onChange", FieldEvent::text("a@b.com"));
//! props.emit_blur("onBlur", BlurEvent::default());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use log::{debug, trace};

use crate::context::resolve_control;
use crate::control::SharedControl;
use crate::error::BindError;
use crate::event::{BlurEvent, FieldEvent, extract};
use crate::field::{FieldName, FieldValue};
use crate::gate::{GateContext, Interaction, should_validate};
use crate::handle::{FieldHandle, FocusCallback};
use crate::props::{BlurCallback, ChangeTransform, FieldProps, NAME_PROP, Prop, PropNames};
use crate::shadow::ShadowValue;
use crate::validation::Rules;

/// Configuration for binding a widget to a field.
pub struct ControllerProps {
    name: String,
    rules: Rules,
    on_change: Option<ChangeTransform>,
    on_blur: Option<BlurCallback>,
    prop_names: PropNames,
    default_value: Option<FieldValue>,
    control: Option<SharedControl>,
    on_focus: Option<FocusCallback>,
    extra: BTreeMap<String, FieldValue>,
}

impl ControllerProps {
    /// Start configuring the field at `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Rules::default(),
            on_change: None,
            on_blur: None,
            prop_names: PropNames::default(),
            default_value: None,
            control: None,
            on_focus: None,
            extra: BTreeMap::new(),
        }
    }

    /// Set the rules passed to the control at registration.
    pub fn rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    /// Run `f` on every change event before value extraction.
    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(FieldEvent) -> FieldEvent + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    /// Run `f` on every blur event before touched tracking.
    pub fn on_blur<F>(mut self, f: F) -> Self
    where
        F: Fn(&BlurEvent) + Send + Sync + 'static,
    {
        self.on_blur = Some(Arc::new(f));
        self
    }

    /// Key of the change handler prop (default `onChange`).
    pub fn on_change_name(mut self, key: impl Into<String>) -> Self {
        self.prop_names.on_change = Some(key.into());
        self
    }

    /// Key of the blur handler prop (default `onBlur`).
    pub fn on_blur_name(mut self, key: impl Into<String>) -> Self {
        self.prop_names.on_blur = Some(key.into());
        self
    }

    /// Key of the value prop (default `checked` or `value`).
    pub fn value_name(mut self, key: impl Into<String>) -> Self {
        self.prop_names.value = Some(key.into());
        self
    }

    /// Initial value, taking precedence over the form's default values.
    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Bind to `control` instead of the current one.
    pub fn control(mut self, control: SharedControl) -> Self {
        self.control = Some(control);
        self
    }

    /// Callback the control may use to focus the widget.
    pub fn on_focus<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_focus = Some(Arc::new(f));
        self
    }

    /// Pass an extra prop through to the widget unchanged.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Mount the adapter: resolve the initial value and register.
    pub fn mount(self) -> Result<FieldController, BindError> {
        FieldController::mount(self)
    }
}

impl fmt::Debug for ControllerProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerProps")
            .field("name", &self.name)
            .field("rules", &self.rules)
            .field("prop_names", &self.prop_names)
            .field("default_value", &self.default_value)
            .field("has_control", &self.control.is_some())
            .field("extra", &self.extra)
            .finish()
    }
}

/// State shared between the controller and the handlers it hands out.
struct Binding {
    name: FieldName,
    control: SharedControl,
    shadow: ShadowValue,
    is_checkbox_like: bool,
    default_value: Option<FieldValue>,
    rules: RwLock<Rules>,
    focus: RwLock<Option<FocusCallback>>,
    on_change: Option<ChangeTransform>,
    on_blur: Option<BlurCallback>,
    prop_names: PropNames,
    extra: BTreeMap<String, FieldValue>,
    /// Cleared at teardown; handlers from stale props become no-ops.
    mounted: AtomicBool,
}

impl Binding {
    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    fn initial_value(&self) -> FieldValue {
        resolve_initial(&self.default_value, &self.control, &self.name)
    }

    fn is_array_owned(&self) -> bool {
        self.control.is_field_array_name(self.name.as_str())
    }

    fn register(&self) {
        let name = self.name.as_str();

        if let Some(existing) = self.control.field(name) {
            debug!(
                "[tether] Detaching listeners of {} for '{}' before re-registering",
                existing.id(),
                name
            );
            self.control.remove_field_event_listener(&existing, true);
        }

        let focus = self
            .focus
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone());
        let rules = self
            .rules
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone());

        let handle = FieldHandle::new(self.name.clone(), Arc::new(self.shadow.clone()))
            .with_focus(focus);
        debug!("[tether] Registering '{}' as {}", name, handle.id());
        self.control.register(handle, rules);
    }

    fn gate(&self, interaction: Interaction) -> bool {
        let name = self.name.as_str();
        let ctx = GateContext::new(
            self.control.mode(),
            self.control.revalidate_mode(),
            interaction,
        )
        .error(self.control.has_error(name))
        .submitted(self.control.is_submitted());
        let verdict = should_validate(&ctx);
        trace!("[tether] Gate for '{}' on {:?}: {}", name, interaction, verdict);
        verdict
    }

    fn handle_change(&self, event: FieldEvent) {
        if !self.is_mounted() {
            trace!("[tether] Ignoring change on unmounted '{}'", self.name);
            return;
        }
        let event = match &self.on_change {
            Some(transform) => transform(event),
            None => event,
        };
        let value = extract(event, self.is_checkbox_like);
        trace!("[tether] Change on '{}': {}", self.name, value);
        self.shadow.set(value.clone());

        let validate = self.gate(Interaction::Change);
        self.control.set_value(self.name.as_str(), value, validate);
    }

    fn handle_blur(&self, event: BlurEvent) {
        if !self.is_mounted() {
            trace!("[tether] Ignoring blur on unmounted '{}'", self.name);
            return;
        }
        if let Some(on_blur) = &self.on_blur {
            on_blur(&event);
        }

        let name = self.name.as_str();
        trace!("[tether] Blur on '{}' (focus to {:?})", name, event.new_target);

        if self.control.tracks_touched() && !self.control.is_touched(name) {
            self.control.mark_touched(name);
            self.control.re_render();
        }

        let mode = self.control.mode();
        let revalidate = self.control.revalidate_mode();
        if mode.is_on_blur || revalidate.is_revalidate_on_blur {
            self.control.trigger(name);
        }
    }
}

fn resolve_initial(
    explicit: &Option<FieldValue>,
    control: &SharedControl,
    name: &FieldName,
) -> FieldValue {
    explicit
        .clone()
        .or_else(|| control.default_value(name.as_str()))
        .unwrap_or(FieldValue::Null)
}

/// A mounted field adapter.
///
/// Dropping a mounted controller unmounts it.
pub struct FieldController {
    binding: Arc<Binding>,
}

impl FieldController {
    /// Resolve the control and initial value, then register the field.
    pub fn mount(props: ControllerProps) -> Result<Self, BindError> {
        let name = FieldName::new(props.name)?;
        let control = resolve_control(props.control)
            .ok_or_else(|| BindError::NoControl(name.to_string()))?;

        let initial = resolve_initial(&props.default_value, &control, &name);
        let is_checkbox_like = initial.is_boolean();

        let binding = Arc::new(Binding {
            name,
            control,
            shadow: ShadowValue::new(initial),
            is_checkbox_like,
            default_value: props.default_value,
            rules: RwLock::new(props.rules),
            focus: RwLock::new(props.on_focus),
            on_change: props.on_change,
            on_blur: props.on_blur,
            prop_names: props.prop_names,
            extra: props.extra,
            mounted: AtomicBool::new(true),
        });
        binding.register();

        Ok(Self { binding })
    }

    pub fn name(&self) -> &FieldName {
        &self.binding.name
    }

    /// The current value.
    pub fn value(&self) -> FieldValue {
        self.binding.shadow.get()
    }

    pub fn is_checkbox_like(&self) -> bool {
        self.binding.is_checkbox_like
    }

    pub fn is_mounted(&self) -> bool {
        self.binding.is_mounted()
    }

    /// Check if the value changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.binding.shadow.is_dirty()
    }

    pub fn clear_dirty(&self) {
        self.binding.shadow.clear_dirty();
    }

    /// Replace the rules used by the next registration.
    pub fn set_rules(&self, rules: Rules) {
        match self.binding.rules.write() {
            Ok(mut guard) => *guard = rules,
            Err(poisoned) => *poisoned.into_inner() = rules,
        }
    }

    /// Replace the focus callback used by the next registration.
    pub fn set_focus(&self, focus: Option<FocusCallback>) {
        match self.binding.focus.write() {
            Ok(mut guard) => *guard = focus,
            Err(poisoned) => *poisoned.into_inner() = focus,
        }
    }

    /// Handle a change event from the widget.
    pub fn on_change(&self, event: FieldEvent) {
        self.binding.handle_change(event);
    }

    /// Handle a blur event from the widget.
    pub fn on_blur(&self, event: BlurEvent) {
        self.binding.handle_blur(event);
    }

    /// Synthesize the props for the bound widget.
    pub fn props(&self) -> FieldProps {
        let binding = &self.binding;
        let mut props = FieldProps::default();

        props.insert(
            NAME_PROP,
            Prop::Value(FieldValue::String(binding.name.to_string())),
        );
        for (key, value) in &binding.extra {
            props.insert(key.clone(), Prop::Value(value.clone()));
        }

        let on_change = Arc::clone(binding);
        props.insert(
            binding.prop_names.change_key(),
            Prop::Change(Arc::new(move |event: FieldEvent| {
                on_change.handle_change(event)
            })),
        );

        let on_blur = Arc::clone(binding);
        props.insert(
            binding.prop_names.blur_key(),
            Prop::Blur(Arc::new(move |event: BlurEvent| on_blur.handle_blur(event))),
        );

        props.insert(
            binding.prop_names.value_key(binding.is_checkbox_like),
            Prop::Value(binding.shadow.rendered()),
        );

        props
    }

    /// Re-register if the control lost this field, e.g. after a form reset.
    ///
    /// Call after every render. Returns true if the field was re-registered.
    pub fn reconcile(&self) -> bool {
        let binding = &self.binding;
        if !binding.is_mounted() || binding.control.field(binding.name.as_str()).is_some() {
            return false;
        }

        debug!("[tether] '{}' missing from control, re-registering", binding.name);
        binding.register();
        if !binding.is_array_owned() {
            binding.shadow.set(binding.initial_value());
        }
        true
    }

    /// Unmount the adapter.
    pub fn unmount(self) {
        self.teardown();
    }

    fn teardown(&self) {
        if !self.binding.mounted.swap(false, Ordering::SeqCst) {
            return;
        }

        let name = self.binding.name.as_str();
        if self.binding.is_array_owned() {
            debug!("[tether] '{}' is owned by a field array, leaving it registered", name);
        } else {
            debug!("[tether] Unregistering '{}'", name);
            self.binding.control.unregister(name);
        }
    }
}

impl Drop for FieldController {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for FieldController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldController")
            .field("name", &self.binding.name)
            .field("value", &self.binding.shadow.get())
            .field("is_checkbox_like", &self.binding.is_checkbox_like)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
