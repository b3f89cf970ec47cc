//! Reading and writing values at dot/bracket paths.
//!
//! `"items[0].title"` and `"items.0.title"` address the same slot.

use serde_json::Map;

use crate::field::FieldValue;

/// Largest index stored as an array slot. Larger indices become object keys.
pub const MAX_ARRAY_INDEX: usize = 65_535;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

fn segments(path: &str) -> Vec<Segment> {
    path.split(['.', '[', ']'])
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<usize>() {
            Ok(index) => Segment::Index(index),
            Err(_) => Segment::Key(s.to_string()),
        })
        .collect()
}

/// Read the value at `path`.
pub fn get<'a>(tree: &'a FieldValue, path: &str) -> Option<&'a FieldValue> {
    segments(path)
        .iter()
        .try_fold(tree, |node, segment| match (segment, node) {
            (Segment::Key(key), FieldValue::Object(map)) => map.get(key),
            (Segment::Index(index), FieldValue::Array(items)) => items.get(*index),
            (Segment::Index(index), FieldValue::Object(map)) => map.get(&index.to_string()),
            _ => None,
        })
}

/// Write `value` at `path`, creating intermediate objects and arrays.
///
/// Non-container values in the way are replaced. An index above
/// [`MAX_ARRAY_INDEX`], or one that meets an existing object, is written as
/// an object key so `get` still finds it.
pub fn set(tree: &mut FieldValue, path: &str, value: FieldValue) {
    let segments = segments(path);
    if segments.is_empty() {
        return;
    }

    let mut cursor = tree;
    for segment in &segments {
        cursor = slot(cursor, segment);
    }
    *cursor = value;
}

fn slot<'a>(node: &'a mut FieldValue, segment: &Segment) -> &'a mut FieldValue {
    match segment {
        Segment::Key(key) => key_slot(node, key),
        Segment::Index(index) if *index > MAX_ARRAY_INDEX || node.is_object() => {
            key_slot(node, &index.to_string())
        }
        Segment::Index(index) => {
            if !node.is_array() {
                *node = FieldValue::Array(Vec::new());
            }
            match node {
                FieldValue::Array(items) => {
                    if items.len() <= *index {
                        items.resize(index + 1, FieldValue::Null);
                    }
                    &mut items[*index]
                }
                other => other,
            }
        }
    }
}

fn key_slot<'a>(node: &'a mut FieldValue, key: &str) -> &'a mut FieldValue {
    if !node.is_object() {
        *node = FieldValue::Object(Map::new());
    }
    match node {
        FieldValue::Object(map) => map.entry(key.to_string()).or_insert(FieldValue::Null),
        other => other,
    }
}
