//! Form value validation against prepared schemas.

use serde_json::Value;

use crate::error::{FieldError, FormError, ValidateError};
use crate::form::strip_nulls;

/// Validate form values against a schema.
///
/// `null` members mean "absent" and are stripped before validation, so a
/// cleared optional field never fails a type check.
///
/// # Errors
///
/// Returns `ValidateError::Form` if the schema cannot be compiled, or
/// `ValidateError::Invalid` with every failing field.
pub fn validate_values(schema: &Value, values: &Value) -> Result<(), ValidateError> {
    let validator = jsonschema::validator_for(schema).map_err(|e| {
        ValidateError::Form(FormError::InvalidSchema {
            message: e.to_string(),
        })
    })?;

    let instance = strip_nulls(values);
    let errors: Vec<FieldError> = validator
        .iter_errors(&instance)
        .map(|e| FieldError {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        log::debug!("values failed validation with {} error(s)", errors.len());
        Err(ValidateError::Invalid { errors })
    }
}
