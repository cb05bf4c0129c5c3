//! JSON Pointer maps over nested values.
//!
//! Pointers here use the plain subset of RFC 6901: property names and array
//! indices separated by `/`, without `~0`/`~1` escaping.

use serde_json::{Map, Value};

/// Flatten a nested object into a map from JSON Pointer to leaf value.
///
/// Scalars, `null`, empty objects and arrays are leaves; non-empty objects are
/// walked. The root is never an entry, so a non-object root yields an empty
/// map.
pub fn to_json_pointer_map(object: &Value) -> Map<String, Value> {
    let mut map = Map::new();
    if let Value::Object(members) = object {
        collect_leaves(members, "", &mut map);
    }
    map
}

/// Look up the value at `pointer`.
///
/// `"/"` (or `""`) addresses the whole object. Returns `None` as soon as the
/// walk reaches a missing member or a node that is neither object nor array.
pub fn get_value_from_pointer<'a>(object: &'a Value, pointer: &str) -> Option<&'a Value> {
    let mut current = object;
    for segment in segments(pointer) {
        current = child(current, segment)?;
    }
    Some(current)
}

/// Returns the prefix of `pointer` at which `object` stops being defined.
///
/// The walk ends at the first segment whose node is absent or `null`, and the
/// returned prefix includes that segment. If every node exists the whole
/// pointer is returned; the root pointer yields `"/"`.
pub fn walk_defined_path(object: &Value, pointer: &str) -> String {
    let mut current = object;
    let mut path = String::new();
    for segment in segments(pointer) {
        path.push('/');
        path.push_str(segment);
        match child(current, segment) {
            Some(next) if !next.is_null() => current = next,
            _ => return path,
        }
    }
    if path.is_empty() {
        "/".to_string()
    } else {
        path
    }
}

// --- Internal implementation ---

fn segments(pointer: &str) -> impl Iterator<Item = &str> {
    let trimmed = pointer.strip_prefix('/').unwrap_or(pointer);
    // A trailing empty segment only occurs for the root pointer "/".
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn is_leaf(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        _ => true,
    }
}

fn collect_leaves(members: &Map<String, Value>, prefix: &str, out: &mut Map<String, Value>) {
    for (key, value) in members {
        let pointer = format!("{}/{}", prefix, key);
        match value {
            Value::Object(inner) if !is_leaf(value) => collect_leaves(inner, &pointer, out),
            leaf => {
                out.insert(pointer, leaf.clone());
            }
        }
    }
}
