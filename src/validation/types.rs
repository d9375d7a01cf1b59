//! Schema `type` validation.

use serde_json::Value;

use crate::convert::ConversionError;

/// Type names an OpenAPI 3.0 schema may declare
pub const VALID_TYPES: &[&str] = &["integer", "number", "string", "boolean", "object", "array"];

/// Validate the value of a `type` keyword.
///
/// Accepts one of [`VALID_TYPES`], or the `[<type>, "null"]` pair the converter
/// itself produces for nullable schemas, so already converted schemas convert
/// again unchanged.
///
/// # Errors
///
/// [`ConversionError::InvalidType`] carrying the compact JSON rendering of `value`.
///
/// # Example
///
/// ```rust
/// use openapi_schema_to_json_schema::validation::validate_type;
/// use serde_json::json;
///
/// assert!(validate_type(&json!("integer")).is_ok());
/// assert!(validate_type(&json!(["string", "null"])).is_ok());
///
/// let err = validate_type(&json!("dateTime")).unwrap_err();
/// assert_eq!(err.to_string(), "Type \"dateTime\" is not a valid type.");
/// ```
pub fn validate_type(value: &Value) -> Result<(), ConversionError> {
    let valid = match value {
        Value::String(name) => is_valid_name(name),
        Value::Array(items) => is_nullable_pair(items),
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ConversionError::InvalidType(value.to_string()))
    }
}

fn is_valid_name(name: &str) -> bool {
    VALID_TYPES.contains(&name)
}

/// `true` for a converted nullable type, e.g. `["string", "null"]`
pub(crate) fn is_nullable_pair(items: &[Value]) -> bool {
    matches!(
        items,
        [Value::String(name), Value::String(null)] if is_valid_name(name) && null == "null"
    )
}
