//! Ambient current control.
//!
//! Hosts that render a whole form under one control can make it current for
//! the duration of the render instead of passing it to every adapter. An
//! explicit control on [`ControllerProps`](crate::controller::ControllerProps)
//! always wins, and adapters resolve their control once, at mount.
//!
//! # Example
//!
//! ```ignore
//! let _guard = provide_control(form.shared());
//! let email = ControllerProps::new("email").mount()?;
//! ```

use std::cell::RefCell;

use crate::control::SharedControl;

thread_local! {
    static CURRENT: RefCell<Option<SharedControl>> = const { RefCell::new(None) };
}

/// Restores the previously current control when dropped.
#[must_use = "the control stops being current when the guard is dropped"]
pub struct ControlGuard {
    previous: Option<SharedControl>,
}

impl Drop for ControlGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|current| *current.borrow_mut() = previous);
    }
}

/// Make `control` current on this thread until the guard is dropped.
///
/// Guards nest: dropping an inner guard restores the outer control.
pub fn provide_control(control: SharedControl) -> ControlGuard {
    let previous = CURRENT.with(|current| current.replace(Some(control)));
    ControlGuard { previous }
}

/// The control current on this thread, if any.
pub fn current_control() -> Option<SharedControl> {
    CURRENT.with(|current| current.borrow().clone())
}

/// Pick the explicit control if given, else the current one.
pub fn resolve_control(explicit: Option<SharedControl>) -> Option<SharedControl> {
    explicit.or_else(current_control)
}
