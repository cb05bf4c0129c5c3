//! Schema normalization - legacy `required` flags and password-aware requirements.

use serde_json::{Map, Value};

use crate::error::FormError;
use crate::types::IS_PASSWORD;

/// Convert legacy per-property `required: true/false` flags into
/// draft-4 style `required: [name, ...]` arrays.
///
/// Flags are lifted into the parent object's `required` array (appended to
/// an existing array without duplicates) and removed from the property.
/// Recurses through `properties` and `items`. A schema without legacy flags
/// comes back structurally unchanged.
pub fn convert_to_draft4_plus_required(schema: &Value) -> Value {
    let mut converted = schema.clone();
    lift_required_flags(&mut converted);
    converted
}

/// Remove password properties from every `required` array.
///
/// Returns a new schema; the input is untouched. Non-required password
/// properties and all other schema content are left as they are.
///
/// # Errors
///
/// Returns `FormError::UnknownRequiredProperty` if a `required` entry has no
/// matching entry in `properties`.
pub fn remove_passwords_from_required(schema: &Value) -> Result<Value, FormError> {
    let mut stripped = schema.clone();
    strip_password_requirements(&mut stripped, "")?;
    Ok(stripped)
}

/// Returns true iff `property._isPassword` is exactly `true`.
pub fn is_password(property: &Value) -> bool {
    matches!(property.get(IS_PASSWORD), Some(Value::Bool(true)))
}

// --- Internal implementation ---

fn lift_required_flags(node: &mut Value) {
    let Value::Object(map) = node else {
        return;
    };

    let mut lifted: Vec<String> = Vec::new();

    if let Some(Value::Object(props)) = map.get_mut("properties") {
        for (name, prop) in props.iter_mut() {
            if let Value::Object(prop_map) = prop {
                let flag = prop_map.get("required").and_then(Value::as_bool);
                if let Some(flag) = flag {
                    prop_map.remove("required");
                    if flag {
                        lifted.push(name.clone());
                    }
                }
            }
            lift_required_flags(prop);
        }
    }

    match map.get_mut("items") {
        Some(Value::Array(tuple)) => tuple.iter_mut().for_each(lift_required_flags),
        Some(items) => lift_required_flags(items),
        None => {}
    }

    if !lifted.is_empty() {
        merge_required(map, lifted);
    }
}

fn merge_required(map: &mut Map<String, Value>, lifted: Vec<String>) {
    match map.get_mut("required") {
        Some(Value::Array(existing)) => {
            for name in lifted {
                let value = Value::String(name);
                if !existing.contains(&value) {
                    existing.push(value);
                }
            }
        }
        _ => {
            map.insert(
                "required".to_string(),
                Value::Array(lifted.into_iter().map(Value::String).collect()),
            );
        }
    }
}

fn strip_password_requirements(node: &mut Value, path: &str) -> Result<(), FormError> {
    let Value::Object(map) = node else {
        return Ok(());
    };

    let kept = match map.get("required") {
        Some(Value::Array(required)) => {
            let mut kept = Vec::with_capacity(required.len());
            for entry in required {
                let Some(name) = entry.as_str() else {
                    kept.push(entry.clone());
                    continue;
                };
                let prop = map
                    .get("properties")
                    .and_then(|props| props.get(name))
                    .ok_or_else(|| FormError::UnknownRequiredProperty {
                        path: if path.is_empty() { "/".into() } else { path.into() },
                        name: name.to_string(),
                    })?;
                if is_password(prop) {
                    log::debug!("dropping password {}/{} from required", path, name);
                } else {
                    kept.push(entry.clone());
                }
            }
            Some(kept)
        }
        _ => None,
    };

    if let Some(kept) = kept {
        map.insert("required".to_string(), Value::Array(kept));
    }

    if let Some(Value::Object(props)) = map.get_mut("properties") {
        for (name, prop) in props.iter_mut() {
            let prop_path = format!("{}/properties/{}", path, name);
            strip_password_requirements(prop, &prop_path)?;
        }
    }

    Ok(())
}
