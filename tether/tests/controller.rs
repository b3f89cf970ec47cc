//! Tests for the field adapter against a recording control.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tether::prelude::*;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Register(String),
    Unregister(String),
    SetValue(String, FieldValue, bool),
    Trigger(String),
    RemoveListener(String, bool),
    MarkTouched(String),
    ReRender,
}

#[derive(Default)]
struct Recorded {
    calls: Vec<Call>,
    fields: HashMap<String, FieldHandle>,
    errors: HashSet<String>,
    touched: HashSet<String>,
    arrays: HashSet<String>,
    submitted: bool,
}

struct RecordingControl {
    mode: ValidationMode,
    revalidate: ReValidateMode,
    defaults: FieldValue,
    track_touched: bool,
    state: Mutex<Recorded>,
}

impl RecordingControl {
    fn new(mode: ValidationMode, revalidate: ReValidateMode) -> Arc<Self> {
        Self::with_defaults(mode, revalidate, json!({}))
    }

    fn with_defaults(
        mode: ValidationMode,
        revalidate: ReValidateMode,
        defaults: FieldValue,
    ) -> Arc<Self> {
        Arc::new(Self {
            mode,
            revalidate,
            defaults,
            track_touched: true,
            state: Mutex::new(Recorded::default()),
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn set_error(&self, name: &str) {
        self.state.lock().unwrap().errors.insert(name.to_string());
    }

    fn set_submitted(&self) {
        self.state.lock().unwrap().submitted = true;
    }

    fn add_array(&self, name: &str) {
        self.state.lock().unwrap().arrays.insert(name.to_string());
    }

    fn remove_array(&self, name: &str) {
        self.state.lock().unwrap().arrays.remove(name);
    }

    fn wipe_fields(&self) {
        self.state.lock().unwrap().fields.clear();
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl Control for RecordingControl {
    fn register(&self, handle: FieldHandle, _rules: Rules) {
        let mut state = self.state.lock().unwrap();
        let name = handle.name().to_string();
        state.calls.push(Call::Register(name.clone()));
        state.fields.insert(name, handle);
    }

    fn unregister(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Unregister(name.to_string()));
        state.fields.remove(name);
        state.errors.remove(name);
        state.touched.remove(name);
    }

    fn set_value(&self, name: &str, value: FieldValue, should_validate: bool) {
        self.record(Call::SetValue(name.to_string(), value, should_validate));
    }

    fn trigger(&self, name: &str) -> bool {
        self.record(Call::Trigger(name.to_string()));
        true
    }

    fn remove_field_event_listener(&self, handle: &FieldHandle, force: bool) {
        self.record(Call::RemoveListener(handle.name().to_string(), force));
    }

    fn field(&self, name: &str) -> Option<FieldHandle> {
        self.state.lock().unwrap().fields.get(name).cloned()
    }

    fn default_value(&self, name: &str) -> Option<FieldValue> {
        tether::path::get(&self.defaults, name).cloned()
    }

    fn has_error(&self, name: &str) -> bool {
        self.state.lock().unwrap().errors.contains(name)
    }

    fn tracks_touched(&self) -> bool {
        self.track_touched
    }

    fn is_touched(&self, name: &str) -> bool {
        self.state.lock().unwrap().touched.contains(name)
    }

    fn mark_touched(&self, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::MarkTouched(name.to_string()));
        state.touched.insert(name.to_string());
    }

    fn mode(&self) -> ModeFlags {
        self.mode.flags()
    }

    fn revalidate_mode(&self) -> ReValidateFlags {
        self.revalidate.flags()
    }

    fn is_submitted(&self) -> bool {
        self.state.lock().unwrap().submitted
    }

    fn is_field_array_name(&self, name: &str) -> bool {
        let state = self.state.lock().unwrap();
        state.arrays.iter().any(|array| {
            name.strip_prefix(array.as_str())
                .is_some_and(|rest| rest.starts_with('[') || rest.starts_with('.'))
        })
    }

    fn re_render(&self) {
        self.record(Call::ReRender);
    }
}

fn on_change_control() -> Arc<RecordingControl> {
    RecordingControl::new(ValidationMode::OnChange, ReValidateMode::OnChange)
}

// ============================================================================
// Mounting
// ============================================================================

#[test]
fn test_initial_value_from_form_defaults() {
    let control = RecordingControl::with_defaults(
        ValidationMode::OnSubmit,
        ReValidateMode::OnChange,
        json!({ "email": "a@b.com" }),
    );
    let field = ControllerProps::new("email")
        .control(control.clone())
        .mount()
        .unwrap();

    let props = field.props();
    assert_eq!(props.value("value"), Some(&json!("a@b.com")));
    assert_eq!(props.name(), Some("email"));
    assert_eq!(control.calls(), vec![Call::Register("email".into())]);
}

#[test]
fn test_explicit_default_beats_form_defaults() {
    let control = RecordingControl::with_defaults(
        ValidationMode::OnSubmit,
        ReValidateMode::OnChange,
        json!({ "email": "a@b.com" }),
    );
    let field = ControllerProps::new("email")
        .default_value("mine@b.com")
        .control(control.clone())
        .mount()
        .unwrap();

    assert_eq!(field.value(), json!("mine@b.com"));
}

#[test]
fn test_missing_default_is_null() {
    let control = on_change_control();
    let field = ControllerProps::new("nickname")
        .control(control.clone())
        .mount()
        .unwrap();

    assert_eq!(field.value(), FieldValue::Null);
    assert!(!field.is_checkbox_like());
}

#[test]
fn test_empty_name_is_rejected() {
    let control = on_change_control();
    let err = ControllerProps::new("")
        .control(control.clone())
        .mount()
        .unwrap_err();
    assert_eq!(err, BindError::EmptyName);
    assert!(control.calls().is_empty());
}

#[test]
fn test_handle_accessor_is_live() {
    let control = on_change_control();
    let field = ControllerProps::new("title")
        .default_value("draft")
        .control(control.clone())
        .mount()
        .unwrap();

    let handle = control.field("title").unwrap();
    assert_eq!(handle.value(), json!("draft"));

    handle.set_value(json!("from store"));
    assert_eq!(field.value(), json!("from store"));
    assert_eq!(field.props().value("value"), Some(&json!("from store")));
    assert!(field.is_dirty());

    field.on_change(FieldEvent::text("typed"));
    assert_eq!(handle.value(), json!("typed"));
}

// ============================================================================
// Change handling
// ============================================================================

#[test]
fn test_value_prop_tracks_every_change() {
    let control = on_change_control();
    let field = ControllerProps::new("title")
        .control(control.clone())
        .mount()
        .unwrap();

    for text in ["a", "ab", "abc", "", "final"] {
        field.props().emit_change("onChange", FieldEvent::text(text));
        assert_eq!(field.props().value("value"), Some(&json!(text)));
        assert_eq!(field.value(), json!(text));
    }
}

#[test]
fn test_checkbox_change() {
    let control = on_change_control();
    let field = ControllerProps::new("field")
        .default_value(true)
        .control(control.clone())
        .mount()
        .unwrap();

    assert!(field.is_checkbox_like());
    let props = field.props();
    assert_eq!(props.value("checked"), Some(&json!(true)));
    assert!(props.value("value").is_none());

    control.clear_calls();
    props.emit_change("onChange", FieldEvent::checkbox(false));

    assert_eq!(field.props().value("checked"), Some(&json!(false)));
    let set_values: Vec<Call> = control
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::SetValue(..)))
        .collect();
    assert_eq!(
        set_values,
        vec![Call::SetValue("field".into(), json!(false), true)]
    );
}

#[test]
fn test_on_blur_mode_change_then_blur() {
    let control = RecordingControl::new(ValidationMode::OnBlur, ReValidateMode::OnChange);
    let field = ControllerProps::new("field")
        .control(control.clone())
        .mount()
        .unwrap();
    control.clear_calls();

    let props = field.props();
    props.emit_change("onChange", FieldEvent::text("x"));
    assert_eq!(
        control.calls(),
        vec![Call::SetValue("field".into(), json!("x"), false)]
    );

    props.emit_blur("onBlur", BlurEvent::default());
    assert_eq!(control.count(|c| *c == Call::Trigger("field".into())), 1);
}

#[test]
fn test_existing_error_forces_validation() {
    let control = RecordingControl::new(ValidationMode::OnSubmit, ReValidateMode::OnSubmit);
    let field = ControllerProps::new("field")
        .control(control.clone())
        .mount()
        .unwrap();
    control.set_error("field");
    control.clear_calls();

    field.on_change(FieldEvent::text("fix"));
    assert_eq!(
        control.calls(),
        vec![Call::SetValue("field".into(), json!("fix"), true)]
    );
}

#[test]
fn test_on_submit_mode_skips_validation_until_submitted() {
    let control = RecordingControl::new(ValidationMode::OnSubmit, ReValidateMode::OnChange);
    let field = ControllerProps::new("field")
        .control(control.clone())
        .mount()
        .unwrap();
    control.clear_calls();

    field.on_change(FieldEvent::text("a"));
    control.set_submitted();
    field.on_change(FieldEvent::text("b"));

    assert_eq!(
        control.calls(),
        vec![
            Call::SetValue("field".into(), json!("a"), false),
            Call::SetValue("field".into(), json!("b"), true),
        ]
    );
}

#[test]
fn test_revalidate_on_blur_skips_changes_after_submit() {
    let control = RecordingControl::new(ValidationMode::OnSubmit, ReValidateMode::OnBlur);
    let field = ControllerProps::new("field")
        .control(control.clone())
        .mount()
        .unwrap();
    control.set_submitted();
    control.clear_calls();

    field.on_change(FieldEvent::text("a"));
    field.on_blur(BlurEvent::default());

    let calls = control.calls();
    assert_eq!(calls[0], Call::SetValue("field".into(), json!("a"), false));
    assert!(calls.contains(&Call::Trigger("field".into())));
}

#[test]
fn test_change_transform_feeds_extractor() {
    let control = on_change_control();
    let field = ControllerProps::new("age")
        .on_change(|event| match event {
            FieldEvent::Input { value, .. } => {
                let parsed = value.as_str().and_then(|s| s.parse::<i64>().ok());
                FieldEvent::value(parsed.map_or(FieldValue::Null, FieldValue::from))
            }
            other => other,
        })
        .control(control.clone())
        .mount()
        .unwrap();

    field.props().emit_change("onChange", FieldEvent::text("42"));
    assert_eq!(field.value(), json!(42));
}

#[test]
fn test_custom_prop_names() {
    let control = on_change_control();
    let field = ControllerProps::new("color")
        .on_change_name("onSelect")
        .on_blur_name("onClose")
        .value_name("selected")
        .prop("placeholder", "Pick a color")
        .control(control.clone())
        .mount()
        .unwrap();

    let props = field.props();
    assert!(props.change("onChange").is_none());
    assert!(props.blur("onBlur").is_none());
    assert_eq!(props.value("placeholder"), Some(&json!("Pick a color")));

    assert!(props.emit_change("onSelect", FieldEvent::text("red")));
    assert_eq!(field.props().value("selected"), Some(&json!("red")));
    assert!(props.emit_blur("onClose", BlurEvent::to("next")));
}

// ============================================================================
// Blur handling
// ============================================================================

#[test]
fn test_touched_is_marked_once() {
    let control = on_change_control();
    let field = ControllerProps::new("field")
        .control(control.clone())
        .mount()
        .unwrap();
    control.clear_calls();

    field.on_blur(BlurEvent::default());
    assert_eq!(control.count(|c| *c == Call::ReRender), 1);
    assert!(control.is_touched("field"));

    field.on_blur(BlurEvent::default());
    assert_eq!(control.count(|c| *c == Call::ReRender), 1);
    assert_eq!(control.count(|c| matches!(c, Call::MarkTouched(_))), 1);
}

#[test]
fn test_caller_blur_runs_first() {
    let control = on_change_control();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_cb = Arc::clone(&seen);
    let control_in_cb = control.clone();
    let field = ControllerProps::new("field")
        .on_blur(move |event| {
            let touched = control_in_cb.is_touched("field");
            seen_in_cb
                .lock()
                .unwrap()
                .push((event.new_target.clone(), touched));
        })
        .control(control.clone())
        .mount()
        .unwrap();

    field.on_blur(BlurEvent::to("submit"));
    assert_eq!(*seen.lock().unwrap(), vec![(Some("submit".to_string()), false)]);
    assert!(control.is_touched("field"));
}

#[test]
fn test_blur_without_blur_mode_does_not_trigger() {
    let control = on_change_control();
    let field = ControllerProps::new("field")
        .control(control.clone())
        .mount()
        .unwrap();

    field.on_blur(BlurEvent::default());
    assert_eq!(control.count(|c| matches!(c, Call::Trigger(_))), 0);
}

// ============================================================================
// Registration lifecycle
// ============================================================================

#[test]
fn test_second_registration_detaches_first() {
    let control = on_change_control();
    let first = ControllerProps::new("email")
        .control(control.clone())
        .mount()
        .unwrap();
    let first_id = control.field("email").unwrap().id();

    let second = ControllerProps::new("email")
        .control(control.clone())
        .mount()
        .unwrap();
    let second_id = control.field("email").unwrap().id();

    assert_ne!(first_id, second_id);
    assert_eq!(
        control.calls(),
        vec![
            Call::Register("email".into()),
            Call::RemoveListener("email".into(), true),
            Call::Register("email".into()),
        ]
    );

    drop(second);
    drop(first);
}

#[test]
fn test_unmount_unregisters() {
    let control = on_change_control();
    let field = ControllerProps::new("email")
        .control(control.clone())
        .mount()
        .unwrap();

    field.unmount();
    assert_eq!(control.count(|c| *c == Call::Unregister("email".into())), 1);
    assert!(control.field("email").is_none());
}

#[test]
fn test_drop_unregisters_once() {
    let control = on_change_control();
    {
        let _field = ControllerProps::new("email")
            .control(control.clone())
            .mount()
            .unwrap();
    }
    assert_eq!(control.count(|c| matches!(c, Call::Unregister(_))), 1);
}

#[test]
fn test_array_owned_field_survives_unmount() {
    let control = on_change_control();
    control.add_array("items");

    let owned = ControllerProps::new("items[0].title")
        .control(control.clone())
        .mount()
        .unwrap();
    let plain = ControllerProps::new("itemsCount")
        .control(control.clone())
        .mount()
        .unwrap();

    owned.unmount();
    plain.unmount();

    assert_eq!(
        control.count(|c| matches!(c, Call::Unregister(_))),
        1,
        "only the non-array field unregisters"
    );
    assert!(control.field("items[0].title").is_some());
    assert!(control.field("itemsCount").is_none());
}

#[test]
fn test_array_ownership_is_checked_at_unmount() {
    let control = on_change_control();

    let adopted = ControllerProps::new("items[0].title")
        .control(control.clone())
        .mount()
        .unwrap();
    control.add_array("items");
    adopted.unmount();
    assert!(control.field("items[0].title").is_some());
    assert_eq!(control.count(|c| matches!(c, Call::Unregister(_))), 0);

    let released = ControllerProps::new("items[1].title")
        .control(control.clone())
        .mount()
        .unwrap();
    control.remove_array("items");
    released.unmount();
    assert!(control.field("items[1].title").is_none());
    assert_eq!(
        control.calls().last(),
        Some(&Call::Unregister("items[1].title".into()))
    );
}

#[test]
fn test_stale_props_are_inert_after_unmount() {
    let control = RecordingControl::new(ValidationMode::OnBlur, ReValidateMode::OnChange);
    let field = ControllerProps::new("email")
        .control(control.clone())
        .mount()
        .unwrap();
    let props = field.props();

    field.unmount();
    control.clear_calls();

    assert!(props.emit_change("onChange", FieldEvent::text("late")));
    assert!(props.emit_blur("onBlur", BlurEvent::default()));

    assert!(control.calls().is_empty());
    assert!(!control.is_touched("email"));
}

#[test]
fn test_stale_props_do_not_reach_newer_adapter() {
    let control = on_change_control();
    let old = ControllerProps::new("email")
        .control(control.clone())
        .mount()
        .unwrap();
    let stale = old.props();
    old.unmount();

    let current = ControllerProps::new("email")
        .default_value("current")
        .control(control.clone())
        .mount()
        .unwrap();
    control.clear_calls();

    stale.emit_change("onChange", FieldEvent::text("stale"));

    assert!(control.calls().is_empty());
    assert_eq!(current.value(), json!("current"));
    assert!(current.is_mounted());
}

#[test]
fn test_reconcile_restores_lost_registration() {
    let control = RecordingControl::with_defaults(
        ValidationMode::OnChange,
        ReValidateMode::OnChange,
        json!({ "email": "a@b.com" }),
    );
    let field = ControllerProps::new("email")
        .control(control.clone())
        .mount()
        .unwrap();

    assert!(!field.reconcile());

    field.on_change(FieldEvent::text("typed"));
    control.wipe_fields();

    assert!(field.reconcile());
    assert!(control.field("email").is_some());
    assert_eq!(field.value(), json!("a@b.com"));
    assert_eq!(field.props().value("value"), Some(&json!("a@b.com")));

    assert!(!field.reconcile());
}

#[test]
fn test_reconcile_keeps_value_for_array_fields() {
    let control = on_change_control();
    control.add_array("items");
    let field = ControllerProps::new("items.0")
        .default_value("first")
        .control(control.clone())
        .mount()
        .unwrap();

    field.on_change(FieldEvent::text("edited"));
    control.wipe_fields();

    assert!(field.reconcile());
    assert_eq!(field.value(), json!("edited"));
}

#[test]
fn test_updated_rules_and_focus_apply_on_reregistration() {
    let control = on_change_control();
    let focused = Arc::new(AtomicUsize::new(0));
    let field = ControllerProps::new("email")
        .control(control.clone())
        .mount()
        .unwrap();
    assert!(!control.field("email").unwrap().has_focus());

    let counter = Arc::clone(&focused);
    field.set_focus(Some(Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })));
    field.set_rules(Rules::new().required("required"));

    control.wipe_fields();
    field.reconcile();

    assert!(control.field("email").unwrap().focus());
    assert_eq!(focused.load(Ordering::SeqCst), 1);
}
