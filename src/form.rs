//! Form sessions - the render and submit pipeline for one edited object.
//!
//! A [`FormSession`] is prepared once per loaded object. It keeps the initial
//! form values (the baseline for patches) and the masked schema (needed to put
//! placeholder values back on submit), so the two halves of the placeholder
//! round trip cannot be separated.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::diff::{generate_patch_set, PatchOperation};
use crate::error::{FormError, ValidateError};
use crate::placeholder::{
    convert_placeholder_schema_to_read_only, flatten_placeholder,
    revert_placeholders_to_original_value,
};
use crate::schema::{convert_to_draft4_plus_required, remove_passwords_from_required};
use crate::types::Mode;
use crate::ui_schema::{derive_ui_schema, DeriveOptions, UiHint};
use crate::validator::validate_values;

/// Prepared state for editing or creating one object.
#[derive(Debug, Clone)]
pub struct FormSession {
    options: DeriveOptions,
    schema: Value,
    values: Value,
    ui: Option<UiHint>,
}

/// What a submit hands to the REST layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    /// Full values with placeholder fields reverted.
    pub values: Value,
    /// Operations turning the initial form values into `values`.
    pub patch: Vec<PatchOperation>,
}

impl FormSession {
    /// Prepare a schema and loaded values for rendering.
    ///
    /// Converts legacy `required` flags, drops passwords from `required` in
    /// edit mode, strips `null` members, unwraps placeholder wrappers, masks
    /// placeholder fields read-only and derives the UI schema.
    ///
    /// # Errors
    ///
    /// Returns `FormError` if the schema has dangling `required` names or a
    /// placeholder value has no schema property.
    pub fn prepare(
        schema: &Value,
        loaded: &Value,
        options: DeriveOptions,
    ) -> Result<Self, FormError> {
        let mut prepared = convert_to_draft4_plus_required(schema);
        if options.mode.is_edit() {
            prepared = remove_passwords_from_required(&prepared)?;
        }

        let values = flatten_placeholder(&strip_nulls(loaded));
        let prepared = convert_placeholder_schema_to_read_only(&values, &prepared)?;
        let ui = derive_ui_schema(&prepared, &options);

        log::debug!(
            "prepared {:?} form with {} field(s)",
            options.mode,
            values.as_object().map(Map::len).unwrap_or(0)
        );

        Ok(Self {
            options,
            schema: prepared,
            values,
            ui,
        })
    }

    pub fn mode(&self) -> Mode {
        self.options.mode
    }

    /// The normalized, placeholder-masked schema to render.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Initial form values, also the baseline for [`FormSession::submit`].
    pub fn values(&self) -> &Value {
        &self.values
    }

    pub fn ui_hint(&self) -> Option<&UiHint> {
        self.ui.as_ref()
    }

    /// UI-schema JSON, `{}` when no hint applies.
    pub fn ui_schema(&self) -> Value {
        self.ui
            .as_ref()
            .map(UiHint::to_ui_schema)
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// Validate edited values against the prepared schema.
    pub fn validate(&self, values: &Value) -> Result<(), ValidateError> {
        validate_values(&self.schema, values)
    }

    /// Revert placeholder fields and compute the patch against the values the
    /// form started from.
    pub fn submit(&self, values: &Value) -> Submission {
        let reverted = revert_placeholders_to_original_value(values, &self.schema);
        let patch = generate_patch_set(&reverted, &self.values);
        Submission {
            values: reverted,
            patch,
        }
    }
}

/// Remove `null` object members at every depth.
///
/// Array elements are kept as they are.
pub fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_nulls).collect()),
        other => other.clone(),
    }
}
