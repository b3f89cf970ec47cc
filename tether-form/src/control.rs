//! In-memory form control.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, trace};
use tether::handle::FieldHandle;
use tether::mode::{ModeFlags, ReValidateFlags};
use tether::validation::{FieldError, Rules, ValidationResult};
use tether::{Control, FieldValue, SharedControl, path};

use crate::arrays::FieldArrayNames;
use crate::config::FormConfig;

/// Callback invoked when the form asks the host to re-render.
pub type RenderCallback = Arc<dyn Fn() + Send + Sync>;

struct Registration {
    handle: FieldHandle,
    rules: Rules,
}

#[derive(Default)]
struct FormState {
    /// Registered fields by name.
    fields: BTreeMap<String, Registration>,
    /// Handles that receive values written through the control.
    listeners: Vec<FieldHandle>,
    errors: BTreeMap<String, FieldError>,
    touched: BTreeSet<String>,
    field_arrays: FieldArrayNames,
    default_values: FieldValue,
    is_submitted: bool,
    submit_count: usize,
}

/// A form-state store that field adapters register into.
///
/// Cheap to clone; clones share state.
///
/// # Example
///
/// ```ignore
/// let form = FormControl::new(FormConfig::new().mode(ValidationMode::OnBlur));
/// let email = ControllerProps::new("email")
///     .rules(Rules::new().required("Email is required"))
///     .control(form.shared())
///     .mount()?;
///
/// let result = form.handle_submit(|values| println!("{values}"));
/// ```
#[derive(Clone)]
pub struct FormControl {
    config: Arc<FormConfig>,
    state: Arc<RwLock<FormState>>,
    render_requests: Arc<AtomicUsize>,
    on_re_render: Arc<RwLock<Option<RenderCallback>>>,
}

impl FormControl {
    /// Create a form from `config`.
    pub fn new(config: FormConfig) -> Self {
        let state = FormState {
            default_values: config.default_values.clone(),
            ..Default::default()
        };
        Self {
            config: Arc::new(config),
            state: Arc::new(RwLock::new(state)),
            render_requests: Arc::new(AtomicUsize::new(0)),
            on_re_render: Arc::new(RwLock::new(None)),
        }
    }

    /// This form as a shared control for adapters.
    pub fn shared(&self) -> SharedControl {
        Arc::new(self.clone())
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    fn read(&self) -> RwLockReadGuard<'_, FormState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, FormState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Call `f` whenever the form requests a re-render.
    pub fn on_re_render<F>(&self, f: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut callback = self
            .on_re_render
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *callback = Some(Arc::new(f));
    }

    /// Number of re-render requests so far.
    pub fn render_requests(&self) -> usize {
        self.render_requests.load(Ordering::SeqCst)
    }

    // -------------------------------------------------------------------------
    // Registrations
    // -------------------------------------------------------------------------

    pub fn is_registered(&self, name: &str) -> bool {
        self.read().fields.contains_key(name)
    }

    /// Names of all registered fields, sorted.
    pub fn registered_names(&self) -> Vec<String> {
        self.read().fields.keys().cloned().collect()
    }

    /// Number of handles receiving writes for `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.read()
            .listeners
            .iter()
            .filter(|handle| handle.name().as_str() == name)
            .count()
    }

    // -------------------------------------------------------------------------
    // Values
    // -------------------------------------------------------------------------

    /// Current value of a registered field.
    pub fn value(&self, name: &str) -> Option<FieldValue> {
        self.read()
            .fields
            .get(name)
            .map(|registration| registration.handle.value())
    }

    /// All registered values, assembled into one tree by field path.
    ///
    /// Fields are written in name order, so when paths overlap the longer
    /// path wins: `a = "leaf"` and `a.b = 1` give `{"a": {"b": 1}}`.
    pub fn values(&self) -> FieldValue {
        let state = self.read();
        let mut tree = FieldValue::Object(Default::default());
        for (name, registration) in &state.fields {
            path::set(&mut tree, name, registration.handle.value());
        }
        tree
    }

    pub fn default_values(&self) -> FieldValue {
        self.read().default_values.clone()
    }

    // -------------------------------------------------------------------------
    // Errors and touched
    // -------------------------------------------------------------------------

    pub fn error(&self, name: &str) -> Option<FieldError> {
        self.read().errors.get(name).cloned()
    }

    /// All current errors, ordered by field name.
    pub fn errors(&self) -> Vec<FieldError> {
        self.read().errors.values().cloned().collect()
    }

    /// Clear the error for `name`, or every error when `None`.
    pub fn clear_errors(&self, name: Option<&str>) {
        {
            let mut state = self.write();
            match name {
                Some(name) => {
                    state.errors.remove(name);
                }
                None => state.errors.clear(),
            }
        }
        self.re_render();
    }

    pub fn touched_fields(&self) -> Vec<String> {
        self.read().touched.iter().cloned().collect()
    }

    // -------------------------------------------------------------------------
    // Field arrays
    // -------------------------------------------------------------------------

    /// Hand the lifecycle of `name`'s items over to a field array.
    pub fn add_field_array(&self, name: &str) {
        if self.write().field_arrays.add(name) {
            debug!("[form] Field array '{}' mounted", name);
        }
    }

    pub fn remove_field_array(&self, name: &str) {
        if self.write().field_arrays.remove(name) {
            debug!("[form] Field array '{}' unmounted", name);
        }
    }

    // -------------------------------------------------------------------------
    // Validation, submit and reset
    // -------------------------------------------------------------------------

    /// Validate every registered field.
    pub fn trigger_all(&self) -> ValidationResult {
        let result = self.validate_all();
        self.re_render();
        result
    }

    fn validate_all(&self) -> ValidationResult {
        let outcomes: Vec<(String, Option<FieldError>)> = {
            let state = self.read();
            state
                .fields
                .iter()
                .map(|(name, registration)| {
                    let handle = &registration.handle;
                    (
                        name.clone(),
                        registration.rules.evaluate(handle.name(), &handle.value()),
                    )
                })
                .collect()
        };

        let mut state = self.write();
        let mut errors = Vec::new();
        for (name, outcome) in outcomes {
            match outcome {
                Some(error) => {
                    state.errors.insert(name, error.clone());
                    errors.push(error);
                }
                None => {
                    state.errors.remove(&name);
                }
            }
        }
        errors.sort_by(|a, b| a.name.cmp(&b.name));
        ValidationResult::from_errors(errors)
    }

    /// Validate all fields and mark the form submitted.
    ///
    /// Calls `on_valid` with the form values when every field passes;
    /// otherwise focuses the first invalid field that has a focus callback.
    pub fn handle_submit<F>(&self, on_valid: F) -> ValidationResult
    where
        F: FnOnce(FieldValue),
    {
        let result = self.validate_all();
        {
            let mut state = self.write();
            state.is_submitted = true;
            state.submit_count += 1;
        }
        debug!(
            "[form] Submit #{}: {} error(s)",
            self.submit_count(),
            result.errors().len()
        );

        match &result {
            ValidationResult::Valid => on_valid(self.values()),
            ValidationResult::Invalid(errors) => {
                let handles: Vec<FieldHandle> = {
                    let state = self.read();
                    errors
                        .iter()
                        .filter_map(|error| state.fields.get(&error.name))
                        .map(|registration| registration.handle.clone())
                        .collect()
                };
                if let Some(handle) = handles.iter().find(|handle| handle.has_focus()) {
                    handle.focus();
                }
            }
        }

        self.re_render();
        result
    }

    pub fn submit_count(&self) -> usize {
        self.read().submit_count
    }

    /// Forget every registration, error, touched flag and the submitted state.
    ///
    /// Mounted adapters notice on their next reconcile and re-register with
    /// their initial values. `values` replaces the default values.
    pub fn reset(&self, values: Option<FieldValue>) {
        {
            let mut state = self.write();
            state.fields.clear();
            state.listeners.clear();
            state.errors.clear();
            state.touched.clear();
            state.is_submitted = false;
            state.submit_count = 0;
            if let Some(values) = values {
                state.default_values = values;
            }
        }
        debug!("[form] Reset");
        self.re_render();
    }
}

impl Control for FormControl {
    fn register(&self, handle: FieldHandle, rules: Rules) {
        let name = handle.name().to_string();
        let mut state = self.write();

        if let Some(previous) = state.fields.remove(&name) {
            let previous_id = previous.handle.id();
            state.listeners.retain(|listener| listener.id() != previous_id);
            debug!("[form] Replaced {} for '{}'", previous_id, name);
        }

        state.listeners.push(handle.clone());
        state.fields.insert(name, Registration { handle, rules });
    }

    fn unregister(&self, name: &str) {
        let mut state = self.write();
        state.fields.remove(name);
        state
            .listeners
            .retain(|listener| listener.name().as_str() != name);
        state.errors.remove(name);
        state.touched.remove(name);
        debug!("[form] Unregistered '{}'", name);
    }

    fn set_value(&self, name: &str, value: FieldValue, should_validate: bool) {
        let listeners: Vec<FieldHandle> = self
            .read()
            .listeners
            .iter()
            .filter(|listener| listener.name().as_str() == name)
            .cloned()
            .collect();

        if listeners.is_empty() {
            debug!("[form] No listener for '{}', value dropped", name);
            return;
        }

        trace!("[form] Set '{}' = {} (validate: {})", name, value, should_validate);
        for listener in &listeners {
            listener.set_value(value.clone());
        }

        if should_validate {
            self.trigger(name);
        }
    }

    fn trigger(&self, name: &str) -> bool {
        let outcome = {
            let state = self.read();
            let Some(registration) = state.fields.get(name) else {
                return true;
            };
            let handle = &registration.handle;
            registration.rules.evaluate(handle.name(), &handle.value())
        };

        let valid = outcome.is_none();
        let changed = {
            let mut state = self.write();
            match outcome {
                Some(error) => {
                    let previous = state.errors.insert(name.to_string(), error.clone());
                    previous.as_ref() != Some(&error)
                }
                None => state.errors.remove(name).is_some(),
            }
        };
        trace!("[form] Validated '{}': valid={}", name, valid);

        if changed {
            self.re_render();
        }
        valid
    }

    fn remove_field_event_listener(&self, handle: &FieldHandle, force: bool) {
        let mut state = self.write();
        let id = handle.id();
        state.listeners.retain(|listener| listener.id() != id);

        let name = handle.name().as_str();
        let owned = state
            .fields
            .get(name)
            .is_some_and(|registration| registration.handle.id() == id);
        if force && owned {
            state.fields.remove(name);
        }
        debug!("[form] Detached {} from '{}' (force: {})", id, name, force);
    }

    fn field(&self, name: &str) -> Option<FieldHandle> {
        self.read()
            .fields
            .get(name)
            .map(|registration| registration.handle.clone())
    }

    fn default_value(&self, name: &str) -> Option<FieldValue> {
        path::get(&self.read().default_values, name).cloned()
    }

    fn has_error(&self, name: &str) -> bool {
        self.read().errors.contains_key(name)
    }

    fn tracks_touched(&self) -> bool {
        self.config.track_touched
    }

    fn is_touched(&self, name: &str) -> bool {
        self.read().touched.contains(name)
    }

    fn mark_touched(&self, name: &str) {
        self.write().touched.insert(name.to_string());
    }

    fn mode(&self) -> ModeFlags {
        self.config.mode.flags()
    }

    fn revalidate_mode(&self) -> ReValidateFlags {
        self.config.re_validate_mode.flags()
    }

    fn is_submitted(&self) -> bool {
        self.read().is_submitted
    }

    fn is_field_array_name(&self, name: &str) -> bool {
        self.read().field_arrays.owns(name)
    }

    fn re_render(&self) {
        self.render_requests.fetch_add(1, Ordering::SeqCst);
        let callback = self
            .on_re_render
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl fmt::Debug for FormControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("FormControl")
            .field("config", &self.config)
            .field("fields", &state.fields.len())
            .field("errors", &state.errors.len())
            .field("is_submitted", &state.is_submitted)
            .finish()
    }
}
