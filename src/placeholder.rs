//! Placeholder tokens (`&{dotted.identifier}`) embedded in configuration values.
//!
//! Values carrying a placeholder are resolved by the backend at deploy time
//! and must not be edited as ordinary form input. The functions here detect
//! them, unwrap the typed wrapper objects the backend sends, mask the matching
//! schema properties as read-only strings, and put the original values back
//! before anything is persisted.
//!
//! Masking and reversion are a pair: the schema returned by
//! [`convert_placeholder_schema_to_read_only`] carries the `originalValue`
//! annotations that [`revert_placeholders_to_original_value`] reads.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::FormError;
use crate::types::{is_truthy, Wrapper, ORIGINAL_TYPE, ORIGINAL_VALUE, READ_ONLY};

/// Enumerated-widget keys that get the raw placeholder appended so the
/// widget can still display it.
const ENUM_KEYS: &[&str] = &["enum", "enumNames"];

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^([A-Za-z0-9_ '",.:/$£@]+)?&\{[A-Za-z0-9_]+(\.[A-Za-z0-9_]+)*\}([A-Za-z0-9_ '",.:/$£@]+)?$"#,
        )
        .unwrap()
    })
}

/// Returns true iff `value` is a string matching the placeholder grammar.
///
/// Non-string values are never placeholders.
pub fn is_placeholder(value: &Value) -> bool {
    value
        .as_str()
        .map(|s| placeholder_regex().is_match(s))
        .unwrap_or(false)
}

/// Returns true if `value` is a placeholder, or an object/array with a
/// placeholder as a direct member.
///
/// Only one level is inspected: `{"nested": {"value": "&{x}"}}` does not
/// contain a placeholder. Looking deeper would change which fields become
/// read-only for existing configurations.
pub fn contains_placeholder(value: &Value) -> bool {
    if !is_truthy(value) {
        return false;
    }
    match value {
        Value::Object(map) => map.values().any(is_placeholder),
        Value::Array(items) => items.iter().any(is_placeholder),
        other => is_placeholder(other),
    }
}

/// Unwrap typed placeholder wrappers one level below an object.
///
/// Each member whose value is an object holding `$bool`, `$list`, `$object`,
/// `$string` or `$int` is replaced by the wrapped value; an unwrapped array is
/// flattened into a single flat array. Anything other than an object is
/// returned unchanged. The input is never modified.
pub fn flatten_placeholder(value: &Value) -> Value {
    let Value::Object(map) = value else {
        return value.clone();
    };

    let mut flattened = map.clone();
    for member in flattened.values_mut() {
        let Some(inner) = Wrapper::unwrap_value(member) else {
            continue;
        };
        *member = match inner {
            Value::Array(items) => Value::Array(flatten_deep(items)),
            other => other.clone(),
        };
    }
    Value::Object(flattened)
}

/// Mark schema properties whose values hold placeholders as read-only strings.
///
/// Returns a new schema; neither input is modified. For every top-level key of
/// `values` whose value (deep-flattened when it is an array) contains a
/// placeholder, the matching property gets `readOnly: true`, its previous
/// `type` in `originalType`, the flattened value in `originalValue`, and
/// `type`/`format` forced to `"string"`. If the property has `enum`,
/// `enumNames` or `options.enum_titles` arrays, the raw value is appended to
/// each.
///
/// # Errors
///
/// Returns `FormError::MissingSchemaProperty` if a placeholder value has no
/// matching schema property.
pub fn convert_placeholder_schema_to_read_only(
    values: &Value,
    schema: &Value,
) -> Result<Value, FormError> {
    let mut masked = schema.clone();
    let Some(value_map) = values.as_object() else {
        return Ok(masked);
    };

    for (key, raw) in value_map {
        let flattened = match raw {
            Value::Array(items) => Value::Array(flatten_deep(items)),
            other => other.clone(),
        };
        if !contains_placeholder(&flattened) {
            continue;
        }

        let prop = masked
            .get_mut("properties")
            .and_then(|props| props.get_mut(key))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| FormError::MissingSchemaProperty { key: key.clone() })?;

        log::debug!("masking placeholder field {} as read-only", key);
        mask_property(prop, raw, flattened);
    }

    Ok(masked)
}

/// Put original values back for every masked property.
///
/// Returns a deep copy of `values`. When `values.raw` is an object, the keys
/// under `raw` are reverted instead of the top-level keys. A key is reverted
/// when `schema.properties[key].originalValue` exists.
pub fn revert_placeholders_to_original_value(values: &Value, schema: &Value) -> Value {
    let mut reverted = values.clone();
    let Some(props) = schema.get("properties").and_then(Value::as_object) else {
        return reverted;
    };

    let has_raw = matches!(reverted.get("raw"), Some(Value::Object(_)));
    let target = if has_raw {
        reverted.get_mut("raw").and_then(Value::as_object_mut)
    } else {
        reverted.as_object_mut()
    };
    if let Some(target) = target {
        revert_members(target, props);
    }
    reverted
}

// --- Internal implementation ---

fn flatten_deep(items: &[Value]) -> Vec<Value> {
    let mut out = Vec::with_capacity(items.len());
    flatten_into(items, &mut out);
    out
}

fn flatten_into(items: &[Value], out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(inner) => flatten_into(inner, out),
            other => out.push(other.clone()),
        }
    }
}

fn mask_property(prop: &mut Map<String, Value>, raw: &Value, flattened: Value) {
    let original_type = prop.get("type").cloned().unwrap_or(Value::Null);
    prop.insert(READ_ONLY.to_string(), Value::Bool(true));
    prop.insert(ORIGINAL_TYPE.to_string(), original_type);
    prop.insert(ORIGINAL_VALUE.to_string(), flattened);
    prop.insert("type".to_string(), Value::String("string".into()));
    prop.insert("format".to_string(), Value::String("string".into()));

    if let Some(Value::Array(titles)) = prop
        .get_mut("options")
        .and_then(|options| options.get_mut("enum_titles"))
    {
        titles.push(raw.clone());
    }
    for key in ENUM_KEYS {
        if let Some(Value::Array(list)) = prop.get_mut(*key) {
            list.push(raw.clone());
        }
    }
}

fn revert_members(target: &mut Map<String, Value>, props: &Map<String, Value>) {
    for (key, member) in target.iter_mut() {
        if let Some(original) = props.get(key).and_then(|p| p.get(ORIGINAL_VALUE)) {
            *member = original.clone();
        }
    }
}
