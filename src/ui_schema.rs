//! UI-schema derivation - rendering hints for a schema-driven form renderer.
//!
//! Hints never change the schema itself. They are serialized in the
//! react-jsonschema-form UI-schema dialect (`ui:widget`, `ui:options`, ...).

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::schema::is_password;
use crate::types::{is_truthy, Mode, SchemaNode, ORIGINAL_VALUE};

/// Display text used by the derived hints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiText {
    /// Placeholder shown in password inputs.
    pub password_placeholder: String,
    /// Instructions for file uploads. `{types}` is replaced by the accepted
    /// file types.
    pub file_instructions: String,
}

impl Default for UiText {
    fn default() -> Self {
        Self {
            password_placeholder: "********".to_string(),
            file_instructions: "Drop a file here or click to browse. Accepted file types: {types}"
                .to_string(),
        }
    }
}

/// Options for UI-schema derivation.
#[derive(Debug, Clone, Default)]
pub struct DeriveOptions {
    /// Creating a new object or editing a loaded one.
    pub mode: Mode,
    pub text: UiText,
}

impl DeriveOptions {
    /// Create options with the default display text.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            text: UiText::default(),
        }
    }

    /// Replace the display text.
    pub fn text(mut self, text: UiText) -> Self {
        self.text = text;
        self
    }
}

/// A rendering hint for one schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum UiHint {
    /// Placeholder-masked field shown as plain, non-editable text.
    ReadOnly,
    /// Per-property hints plus display order.
    Object {
        properties: Map<String, Value>,
        order: Vec<String>,
    },
    Checkbox,
    Password {
        placeholder: String,
    },
    FileUpload {
        accept: String,
        instructions: String,
    },
    Prefixed {
        prefix: Value,
    },
    DateTime,
    Enum,
    /// An emptied string field submits `""` instead of dropping the key.
    EmptyString,
    /// Orderable list of scalar or object items.
    Array {
        items: Option<Box<UiHint>>,
    },
}

impl UiHint {
    /// Serialize the hint as UI-schema JSON.
    pub fn to_ui_schema(&self) -> Value {
        match self {
            UiHint::ReadOnly => json!({ "ui:widget": "plainText", "ui:readonly": true }),
            UiHint::Object { properties, order } => {
                let mut ui = properties.clone();
                if !order.is_empty() {
                    ui.insert("ui:order".to_string(), json!(order));
                }
                Value::Object(ui)
            }
            UiHint::Checkbox => json!({ "ui:widget": "checkbox" }),
            UiHint::Password { placeholder } => {
                json!({ "ui:widget": "password", "ui:placeholder": placeholder })
            }
            UiHint::FileUpload {
                accept,
                instructions,
            } => json!({
                "ui:widget": "file",
                "ui:options": { "accept": accept },
                "ui:help": instructions
            }),
            UiHint::Prefixed { prefix } => json!({
                "ui:widget": "prefixedText",
                "ui:options": { "prefix": prefix }
            }),
            UiHint::DateTime => json!({ "ui:widget": "alt-datetime" }),
            UiHint::Enum => json!({ "ui:widget": "select" }),
            UiHint::EmptyString => json!({ "ui:emptyValue": "" }),
            UiHint::Array { items } => {
                let mut ui = json!({ "ui:options": { "orderable": true } });
                if let Some(items) = items {
                    ui["items"] = items.to_ui_schema();
                }
                ui
            }
        }
    }
}

/// Derive the rendering hint for a schema node.
///
/// Placeholder-masked nodes (carrying `originalValue`) are always read-only
/// text. Otherwise the hint follows the declared `type`; for strings the
/// first matching rule wins: password, file upload, prefix, date-time, enum,
/// then the edit-mode empty-string rule. Returns `None` when no hint applies,
/// which callers treat as default rendering.
pub fn derive_ui_schema(schema: &Value, options: &DeriveOptions) -> Option<UiHint> {
    if schema.get(ORIGINAL_VALUE).is_some() {
        return Some(UiHint::ReadOnly);
    }

    match SchemaNode::of(schema) {
        SchemaNode::Object(map) => Some(derive_object(map, options)),
        SchemaNode::Boolean(_) => Some(UiHint::Checkbox),
        SchemaNode::String(map) => derive_string(schema, map, options),
        SchemaNode::Array(map) => Some(UiHint::Array {
            items: map
                .get("items")
                .and_then(|items| derive_ui_schema(items, options))
                .map(Box::new),
        }),
        SchemaNode::Number(_)
        | SchemaNode::Integer(_)
        | SchemaNode::Null(_)
        | SchemaNode::Unknown => None,
    }
}

// --- Internal implementation ---

fn derive_string(
    schema: &Value,
    map: &Map<String, Value>,
    options: &DeriveOptions,
) -> Option<UiHint> {
    let format = map.get("format").and_then(Value::as_str);

    if is_password(schema) {
        return Some(UiHint::Password {
            placeholder: options.text.password_placeholder.clone(),
        });
    }
    if let (Some(accepted), Some("file")) = (map.get("acceptedFiles"), format) {
        let accept = accepted_types(accepted);
        let instructions = options.text.file_instructions.replace("{types}", &accept);
        return Some(UiHint::FileUpload {
            accept,
            instructions,
        });
    }
    if let Some(prefix) = map.get("prefix").filter(|p| is_truthy(p)) {
        return Some(UiHint::Prefixed {
            prefix: prefix.clone(),
        });
    }
    if format == Some("date-time") {
        return Some(UiHint::DateTime);
    }
    if map.get("enum").is_some_and(is_truthy) {
        return Some(UiHint::Enum);
    }
    if options.mode.is_edit() {
        return Some(UiHint::EmptyString);
    }
    None
}

fn accepted_types(accepted: &Value) -> String {
    match accepted {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn derive_object(map: &Map<String, Value>, options: &DeriveOptions) -> UiHint {
    let mut properties = Map::new();
    let mut ordered: Vec<(Option<f64>, String)> = Vec::new();

    if let Some(Value::Object(props)) = map.get("properties") {
        for (name, prop) in props {
            if let Some(hint) = derive_ui_schema(prop, options) {
                properties.insert(name.clone(), hint.to_ui_schema());
            }
            let position = prop.get("propertyOrder").and_then(Value::as_f64);
            ordered.push((position, name.clone()));
        }
    }

    let order = if ordered.iter().any(|(position, _)| position.is_some()) {
        // Stable sort keeps declaration order for ties and unordered properties.
        ordered.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => a.total_cmp(b),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        ordered.into_iter().map(|(_, name)| name).collect()
    } else {
        Vec::new()
    };

    UiHint::Object { properties, order }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit() -> DeriveOptions {
        DeriveOptions::new(Mode::Edit)
    }

    fn create() -> DeriveOptions {
        DeriveOptions::new(Mode::Create)
    }

    #[test]
    fn masked_node_is_read_only_regardless_of_type() {
        let schema = json!({ "type": "boolean", "originalValue": "&{flag}" });
        assert_eq!(derive_ui_schema(&schema, &edit()), Some(UiHint::ReadOnly));
    }

    #[test]
    fn boolean_is_checkbox() {
        let schema = json!({ "type": "boolean" });
        assert_eq!(derive_ui_schema(&schema, &create()), Some(UiHint::Checkbox));
    }

    #[test]
    fn password_wins_over_other_string_rules() {
        let schema = json!({
            "type": "string",
            "_isPassword": true,
            "format": "date-time",
            "enum": ["a"]
        });
        assert_eq!(
            derive_ui_schema(&schema, &edit()),
            Some(UiHint::Password {
                placeholder: "********".into()
            })
        );
    }

    #[test]
    fn file_upload_interpolates_accepted_types() {
        let schema = json!({
            "type": "string",
            "format": "file",
            "acceptedFiles": [".pem", ".crt"]
        });
        let text = UiText {
            password_placeholder: String::new(),
            file_instructions: "Upload {types}".into(),
        };
        let hint = derive_ui_schema(&schema, &create().text(text));
        assert_eq!(
            hint,
            Some(UiHint::FileUpload {
                accept: ".pem, .crt".into(),
                instructions: "Upload .pem, .crt".into()
            })
        );
    }

    #[test]
    fn accepted_files_without_file_format_is_not_upload() {
        let schema = json!({ "type": "string", "acceptedFiles": ".pem", "prefix": "x" });
        assert_eq!(
            derive_ui_schema(&schema, &create()),
            Some(UiHint::Prefixed {
                prefix: json!("x")
            })
        );
    }

    #[test]
    fn string_rule_precedence() {
        let prefix_and_date = json!({ "type": "string", "prefix": "p", "format": "date-time" });
        assert!(matches!(
            derive_ui_schema(&prefix_and_date, &create()),
            Some(UiHint::Prefixed { .. })
        ));

        let date_and_enum = json!({ "type": "string", "format": "date-time", "enum": ["a"] });
        assert_eq!(derive_ui_schema(&date_and_enum, &create()), Some(UiHint::DateTime));

        let enumerated = json!({ "type": "string", "enum": ["a"] });
        assert_eq!(derive_ui_schema(&enumerated, &edit()), Some(UiHint::Enum));
    }

    #[test]
    fn falsy_prefix_and_enum_fall_through() {
        let empty_prefix = json!({ "type": "string", "prefix": "", "format": "date-time" });
        assert_eq!(derive_ui_schema(&empty_prefix, &create()), Some(UiHint::DateTime));

        let null_enum = json!({ "type": "string", "prefix": null, "enum": null });
        assert_eq!(derive_ui_schema(&null_enum, &edit()), Some(UiHint::EmptyString));
        assert_eq!(derive_ui_schema(&null_enum, &create()), None);
    }

    #[test]
    fn plain_string_depends_on_mode() {
        let schema = json!({ "type": "string" });
        assert_eq!(derive_ui_schema(&schema, &edit()), Some(UiHint::EmptyString));
        assert_eq!(derive_ui_schema(&schema, &create()), None);
    }

    #[test]
    fn unknown_types_have_no_hint() {
        assert_eq!(derive_ui_schema(&json!({ "type": "number" }), &edit()), None);
        assert_eq!(derive_ui_schema(&json!({ "type": "custom" }), &edit()), None);
        assert_eq!(derive_ui_schema(&json!({}), &edit()), None);
    }

    #[test]
    fn array_derives_item_hint() {
        let schema = json!({ "type": "array", "items": { "type": "boolean" } });
        let hint = derive_ui_schema(&schema, &create()).unwrap();
        assert_eq!(
            hint.to_ui_schema(),
            json!({
                "ui:options": { "orderable": true },
                "items": { "ui:widget": "checkbox" }
            })
        );
    }

    #[test]
    fn object_orders_by_property_order() {
        let schema = json!({
            "type": "object",
            "properties": {
                "c": { "type": "string" },
                "a": { "type": "boolean", "propertyOrder": 2 },
                "b": { "type": "number", "propertyOrder": 1 }
            }
        });
        let hint = derive_ui_schema(&schema, &create()).unwrap();
        assert_eq!(
            hint.to_ui_schema(),
            json!({
                "a": { "ui:widget": "checkbox" },
                "ui:order": ["b", "a", "c"]
            })
        );
    }

    #[test]
    fn ui_text_deserializes_with_defaults() {
        let text: UiText =
            serde_json::from_value(json!({ "passwordPlaceholder": "unchanged" })).unwrap();
        assert_eq!(text.password_placeholder, "unchanged");
        assert_eq!(text.file_instructions, UiText::default().file_instructions);
    }
}
