//! Signup Example
//!
//! Binds three widgets to one form without any UI: an email text field, a
//! password field with a custom change transform, and a terms checkbox.
//! Events are replayed the way a host would deliver them, and the form is
//! submitted twice (once invalid, once valid).
//!
//! Logs are written to `signup.log`.

use std::fs::File;

use log::LevelFilter;
use serde_json::json;
use simplelog::{Config, WriteLogger};
use tether::context::provide_control;
use tether_form::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = File::create("signup.log")?;
    WriteLogger::init(LevelFilter::Trace, Config::default(), log_file)?;

    let config = FormConfig::from_json(
        r#"{
            "mode": "onBlur",
            "reValidateMode": "onChange",
            "defaultValues": { "account": { "email": "" }, "terms": false }
        }"#,
    )?;
    let form = FormControl::new(config);
    form.on_re_render(|| log::debug!("re-render requested"));

    let _guard = provide_control(form.shared());

    let email = ControllerProps::new("account.email")
        .rules(
            Rules::new()
                .required("Email is required")
                .email("Please enter a valid email"),
        )
        .prop("placeholder", "you@example.com")
        .mount()?;

    let password = ControllerProps::new("account.password")
        .default_value("")
        .rules(
            Rules::new()
                .required("Password is required")
                .min_length(8, "Password must be at least 8 characters")
                .pattern("[0-9]", "Password must contain a digit")?,
        )
        .on_change(|event| match event {
            FieldEvent::Input { value, .. } => {
                FieldEvent::value(value.as_str().map(str::trim).unwrap_or_default())
            }
            other => other,
        })
        .mount()?;

    let terms = ControllerProps::new("terms")
        .rules(Rules::new().checked("You must accept the terms"))
        .on_focus(|| println!("-> focusing the terms checkbox"))
        .mount()?;

    println!("terms renders as: {:?}", terms.props().value("checked"));

    // First pass: a bad email and a weak password.
    let props = email.props();
    props.emit_change("onChange", FieldEvent::text("not-an-email"));
    props.emit_blur("onBlur", BlurEvent::to("account.password"));
    password.on_change(FieldEvent::text("  short  "));
    password.on_blur(BlurEvent::to("terms"));

    for error in form.errors() {
        println!("{}: {}", error.name, error.message);
    }

    let result = form.handle_submit(|_| unreachable!("form is invalid"));
    println!("first submit valid: {}", result.is_valid());

    // Second pass: fix everything.
    email.on_change(FieldEvent::text("ada@example.com"));
    password.on_change(FieldEvent::text("correct horse 42"));
    terms.props().emit_change("onChange", FieldEvent::checkbox(true));

    let result = form.handle_submit(|values| {
        println!("submitted: {values}");
        assert_eq!(values["terms"], json!(true));
    });
    println!("second submit valid: {}", result.is_valid());

    Ok(())
}
