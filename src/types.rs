//! Core types shared by the schema, placeholder and UI-schema passes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema keys introduced together by read-only placeholder masking.
pub const READ_ONLY: &str = "readOnly";
pub const ORIGINAL_TYPE: &str = "originalType";
pub const ORIGINAL_VALUE: &str = "originalValue";

/// Presentation extension marking a property as a password.
pub const IS_PASSWORD: &str = "_isPassword";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// JavaScript truthiness of a JSON value.
///
/// `null`, `false`, `0` and `""` are falsy; every container is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether a form is creating a new object or editing a loaded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Create,
    Edit,
}

impl Mode {
    /// Create mode from an edit flag (true = Edit, false = Create).
    pub fn from_edit_flag(is_edit: bool) -> Self {
        if is_edit {
            Mode::Edit
        } else {
            Mode::Create
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, Mode::Edit)
    }
}

/// Borrowed view of a schema node, keyed on its declared `type`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaNode<'a> {
    Object(&'a Map<String, Value>),
    String(&'a Map<String, Value>),
    Boolean(&'a Map<String, Value>),
    Array(&'a Map<String, Value>),
    Number(&'a Map<String, Value>),
    Integer(&'a Map<String, Value>),
    Null(&'a Map<String, Value>),
    /// Missing, non-string or unrecognized `type`, or a non-object schema.
    Unknown,
}

impl<'a> SchemaNode<'a> {
    pub fn of(schema: &'a Value) -> Self {
        let Some(map) = schema.as_object() else {
            return SchemaNode::Unknown;
        };
        match map.get("type").and_then(Value::as_str) {
            Some("object") => SchemaNode::Object(map),
            Some("string") => SchemaNode::String(map),
            Some("boolean") => SchemaNode::Boolean(map),
            Some("array") => SchemaNode::Array(map),
            Some("number") => SchemaNode::Number(map),
            Some("integer") => SchemaNode::Integer(map),
            Some("null") => SchemaNode::Null(map),
            _ => SchemaNode::Unknown,
        }
    }
}

/// Typed wrapper objects the backend uses around placeholder values,
/// e.g. `{"$bool": "&{feature.enabled}"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrapper {
    Bool,
    List,
    Object,
    String,
    Int,
}

impl Wrapper {
    /// Lookup order when a wrapper object carries more than one key.
    pub const ALL: [Wrapper; 5] = [
        Wrapper::Bool,
        Wrapper::List,
        Wrapper::Object,
        Wrapper::String,
        Wrapper::Int,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Wrapper::Bool => "$bool",
            Wrapper::List => "$list",
            Wrapper::Object => "$object",
            Wrapper::String => "$string",
            Wrapper::Int => "$int",
        }
    }

    /// Returns the wrapped value if `value` is an object carrying a wrapper key.
    pub fn unwrap_value(value: &Value) -> Option<&Value> {
        let map = value.as_object()?;
        Wrapper::ALL.iter().find_map(|w| map.get(w.key()))
    }
}
