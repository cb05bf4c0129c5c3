//! Patch generation between two object states.
//!
//! Arrays are treated as sets: a changed array produces one `add` per new
//! item and one `remove` per dropped item rather than index-wise edits.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pointer::{get_value_from_pointer, to_json_pointer_map, walk_defined_path};

/// A single field-level change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum PatchOperation {
    Add {
        field: String,
        value: Value,
    },
    Replace {
        field: String,
        value: Value,
    },
    /// Array removals carry the removed item in `value`; field removals
    /// carry none.
    Remove {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
}

impl PatchOperation {
    pub fn field(&self) -> &str {
        match self {
            PatchOperation::Add { field, .. }
            | PatchOperation::Replace { field, .. }
            | PatchOperation::Remove { field, .. } => field,
        }
    }

    fn value(&self) -> Option<&Value> {
        match self {
            PatchOperation::Add { value, .. } | PatchOperation::Replace { value, .. } => {
                Some(value)
            }
            PatchOperation::Remove { value, .. } => value.as_ref(),
        }
    }

    /// Same kind, same field and JSON-equal value.
    fn same_as(&self, other: &PatchOperation) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.field() == other.field()
            && match (self.value(), other.value()) {
                (Some(a), Some(b)) => json_eq(a, b),
                (a, b) => a.is_none() && b.is_none(),
            }
    }
}

/// Order-independent equality of two arrays.
///
/// Each element of either side must have a counterpart on the other side:
/// nested arrays via `is_equal_set`, objects via partial structural match
/// (the counterpart contains the element's shape), scalars by equality.
/// Duplicates are not counted.
pub fn is_equal_set(set1: &[Value], set2: &[Value]) -> bool {
    covers(set1, set2) && covers(set2, set1)
}

/// Items of `set1` not deep-equal to any item of `set2`, in `set1` order.
pub fn find_items_not_in_set(set1: &[Value], set2: &[Value]) -> Vec<Value> {
    set1.iter()
        .filter(|item| !set2.iter().any(|other| json_eq(item, other)))
        .cloned()
        .collect()
}

/// Compute the operations that turn `old_object` into `new_object`.
///
/// Changed pointers are widened to the first path segment missing in the old
/// object so that new containers are added whole. Operations for changed and
/// added fields come first, followed by removals of pointers that no longer
/// exist in the new object. Each group is deduplicated.
pub fn generate_patch_set(new_object: &Value, old_object: &Value) -> Vec<PatchOperation> {
    let new_map = to_json_pointer_map(new_object);
    let old_map = to_json_pointer_map(old_object);

    let mut changes: Vec<PatchOperation> = Vec::new();
    for (pointer, new_value) in &new_map {
        if values_equal(Some(new_value), old_map.get(pointer)) {
            continue;
        }

        let path = walk_defined_path(old_object, pointer);
        let Some(new_at_path) = get_value_from_pointer(new_object, &path) else {
            continue;
        };
        let old_at_path = get_value_from_pointer(old_object, &path);

        match (new_at_path, old_at_path) {
            (Value::Array(new_items), Some(Value::Array(old_items))) => {
                let append = format!("{}/-", path.trim_end_matches('/'));
                for item in find_items_not_in_set(new_items, old_items) {
                    push_unique(
                        &mut changes,
                        PatchOperation::Add {
                            field: append.clone(),
                            value: item,
                        },
                    );
                }
                for item in find_items_not_in_set(old_items, new_items) {
                    push_unique(
                        &mut changes,
                        PatchOperation::Remove {
                            field: path.clone(),
                            value: Some(item),
                        },
                    );
                }
            }
            (Value::Null, _) => push_unique(
                &mut changes,
                PatchOperation::Remove {
                    field: path,
                    value: None,
                },
            ),
            (value, None) => push_unique(
                &mut changes,
                PatchOperation::Add {
                    field: path,
                    value: value.clone(),
                },
            ),
            (value, Some(_)) => push_unique(
                &mut changes,
                PatchOperation::Replace {
                    field: path,
                    value: value.clone(),
                },
            ),
        }
    }

    let mut removals: Vec<PatchOperation> = Vec::new();
    for pointer in old_map.keys() {
        if get_value_from_pointer(new_object, pointer).is_some() {
            continue;
        }
        push_unique(
            &mut removals,
            PatchOperation::Remove {
                field: walk_defined_path(new_object, pointer),
                value: None,
            },
        );
    }

    log::debug!(
        "generated patch with {} change(s) and {} removal(s)",
        changes.len(),
        removals.len()
    );
    changes.extend(removals);
    for op in &changes {
        log::trace!("patch op: {:?}", op);
    }
    changes
}

// --- Internal implementation ---

fn values_equal(new_value: Option<&Value>, old_value: Option<&Value>) -> bool {
    match (new_value, old_value) {
        (Some(Value::Array(a)), Some(Value::Array(b))) => is_equal_set(a, b),
        (Some(a), Some(b)) => json_eq(a, b),
        (a, b) => a.is_none() && b.is_none(),
    }
}

/// Deep JSON equality. Numbers compare by value, so `8080` equals `8080.0`.
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| json_eq(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, xv)| y.get(key).map(|yv| json_eq(xv, yv)).unwrap_or(false))
        }
        (a, b) => a == b,
    }
}

/// Every element of `items` has a counterpart in `candidates`.
fn covers(items: &[Value], candidates: &[Value]) -> bool {
    items.iter().all(|item| match item {
        Value::Array(inner) => candidates
            .iter()
            .any(|c| matches!(c, Value::Array(other) if is_equal_set(inner, other))),
        Value::Object(_) => candidates.iter().any(|c| is_match(c, item)),
        scalar => candidates.iter().any(|c| json_eq(c, scalar)),
    })
}

/// Partial deep match: `candidate` contains everything in `shape`.
///
/// Object shapes match when every member matches; array shapes match when
/// each shape element matches some candidate element.
fn is_match(candidate: &Value, shape: &Value) -> bool {
    match (candidate, shape) {
        (Value::Object(c), Value::Object(s)) => s
            .iter()
            .all(|(key, sv)| c.get(key).map(|cv| is_match(cv, sv)).unwrap_or(false)),
        (Value::Array(c), Value::Array(s)) => {
            s.iter().all(|sv| c.iter().any(|cv| is_match(cv, sv)))
        }
        (c, s) => json_eq(c, s),
    }
}

fn push_unique(ops: &mut Vec<PatchOperation>, op: PatchOperation) {
    if !ops.iter().any(|existing| existing.same_as(&op)) {
        ops.push(op);
    }
}
