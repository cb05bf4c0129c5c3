//! Loading schema and value documents from files and strings.

use std::path::Path;

use serde_json::Value;

use crate::error::FormError;

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `FormError::FileNotFound` if the file doesn't exist,
/// or `FormError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Value, FormError> {
    if !path.exists() {
        return Err(FormError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| FormError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("loaded {} ({} bytes)", path.display(), content.len());
    load_json_str(&content)
}

/// Load a JSON document from a string.
///
/// # Errors
///
/// Returns `FormError::InvalidJson` if the string isn't valid JSON.
pub fn load_json_str(content: &str) -> Result<Value, FormError> {
    serde_json::from_str(content).map_err(|source| FormError::InvalidJson { source })
}
