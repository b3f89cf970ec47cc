use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::field::FieldValue;
use crate::handle::ValueAccessor;

/// An adapter's local copy of its field value.
///
/// The value lives in two cells that are always written together:
/// - the rendered cell, read when synthesizing props, which raises a dirty
///   flag the host polls to schedule a re-render;
/// - the current cell, read synchronously by handlers and the registration
///   handle's accessor.
///
/// Clones share the same cells.
#[derive(Debug, Clone)]
pub struct ShadowValue {
    rendered: Arc<RwLock<FieldValue>>,
    current: Arc<RwLock<FieldValue>>,
    dirty: Arc<AtomicBool>,
}

impl ShadowValue {
    /// Create a shadow holding `value`.
    pub fn new(value: FieldValue) -> Self {
        Self {
            rendered: Arc::new(RwLock::new(value.clone())),
            current: Arc::new(RwLock::new(value)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The value as last written, for use inside handlers.
    pub fn get(&self) -> FieldValue {
        read(&self.current)
    }

    /// The value to display.
    pub fn rendered(&self) -> FieldValue {
        read(&self.rendered)
    }

    /// Write `value` to both cells and flag a re-render.
    pub fn set(&self, value: FieldValue) {
        write(&self.current, value.clone());
        write(&self.rendered, value);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Check if the value changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl ValueAccessor for ShadowValue {
    fn get(&self) -> FieldValue {
        ShadowValue::get(self)
    }

    fn set(&self, value: FieldValue) {
        ShadowValue::set(self, value);
    }
}

fn read(cell: &RwLock<FieldValue>) -> FieldValue {
    cell.read()
        .map(|guard| guard.clone())
        .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
}

fn write(cell: &RwLock<FieldValue>, value: FieldValue) {
    match cell.write() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}
