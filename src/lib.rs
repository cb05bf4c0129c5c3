//! IDM Console Forms
//!
//! Schema and value transformations behind the identity-management console's
//! schema-driven forms.
//!
//! Backend object schemas arrive as generic JSON Schema, sometimes in a
//! legacy dialect, and configuration values may hold deploy-time placeholders
//! such as `&{openidm.port.http}`. This library adapts both for editing and
//! turns the edited result back into a patch for the backend.
//!
//! # Example
//!
//! ```
//! use idm_forms::{DeriveOptions, FormSession, Mode, PatchOperation};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "required": ["name", "password"],
//!     "properties": {
//!         "name": { "type": "string" },
//!         "password": { "type": "string", "_isPassword": true }
//!     }
//! });
//! let loaded = json!({ "name": "bjensen" });
//!
//! let session = FormSession::prepare(&schema, &loaded, DeriveOptions::new(Mode::Edit)).unwrap();
//!
//! // Passwords are not required when editing an existing object
//! assert_eq!(session.schema()["required"], json!(["name"]));
//!
//! let submission = session.submit(&json!({ "name": "babs" }));
//! assert_eq!(
//!     submission.patch,
//!     vec![PatchOperation::Replace { field: "/name".into(), value: json!("babs") }]
//! );
//! ```
//!
//! # Pipeline
//!
//! | Stage | Function |
//! |-------|----------|
//! | Legacy `required` flags | [`convert_to_draft4_plus_required`] |
//! | Passwords in edit mode | [`remove_passwords_from_required`] |
//! | Placeholder wrappers | [`flatten_placeholder`] |
//! | Read-only masking | [`convert_placeholder_schema_to_read_only`] |
//! | Rendering hints | [`derive_ui_schema`] |
//! | Placeholder reversion | [`revert_placeholders_to_original_value`] |
//! | Patch | [`generate_patch_set`] |

mod diff;
mod error;
mod form;
mod loader;
mod placeholder;
mod pointer;
mod schema;
mod types;
mod ui_schema;
mod validator;

pub use diff::{find_items_not_in_set, generate_patch_set, is_equal_set, PatchOperation};
pub use error::{FieldError, FormError, ValidateError};
pub use form::{strip_nulls, FormSession, Submission};
pub use loader::{load_json, load_json_str};
pub use placeholder::{
    contains_placeholder, convert_placeholder_schema_to_read_only, flatten_placeholder,
    is_placeholder, revert_placeholders_to_original_value,
};
pub use pointer::{get_value_from_pointer, to_json_pointer_map, walk_defined_path};
pub use schema::{convert_to_draft4_plus_required, is_password, remove_passwords_from_required};
pub use types::{json_type_name, Mode, SchemaNode, Wrapper};
pub use ui_schema::{derive_ui_schema, DeriveOptions, UiHint, UiText};
pub use validator::validate_values;
