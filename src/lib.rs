//! OpenAPI Schema to JSON Schema - converts OpenAPI 3.0 schema objects to JSON Schema draft-04
//!
//! Provides:
//! - Schema conversion (`nullable`, numeric and byte formats, unsupported keywords,
//!   read-only/write-only property removal, `x-patternProperties`)
//! - Parameter conversion (`schema` or per media type `content`)
//! - Conversion options, readable from any serde format
//!
//! # Example
//!
//! ```rust
//! use openapi_schema_to_json_schema::{ConvertOptions, openapi_schema_to_json_schema};
//! use serde_json::json;
//!
//! let mut schema = json!({
//!     "type": "object",
//!     "required": ["id", "secret"],
//!     "properties": {
//!         "id": {"type": "string", "format": "byte"},
//!         "secret": {"type": "string", "writeOnly": true}
//!     }
//! });
//!
//! let options = ConvertOptions::default().with_remove_write_only(true);
//! let converted = openapi_schema_to_json_schema(&mut schema, &options).unwrap();
//!
//! assert_eq!(converted.as_ref(), &json!({
//!     "$schema": "http://json-schema.org/draft-04/schema#",
//!     "type": "object",
//!     "required": ["id"],
//!     "properties": {
//!         "id": {"type": "string", "format": "byte", "pattern": "^[\\w\\d+\\/=]*$"}
//!     }
//! }));
//! ```

use std::borrow::Cow;

use serde_json::Value;

pub mod convert;
pub mod options;
pub mod validation;

// Re-export commonly used types
pub use convert::{
    ConversionError, JsonSchemaConverter, ParameterConverter, ParameterSchema,
    PatternPropertiesHandler, SchemaConverter, default_pattern_properties_handler,
};
pub use options::{ConvertOptions, DRAFT_04_SCHEMA_URI, ResolvedOptions};

/// Convert an OpenAPI schema object to JSON Schema draft-04.
///
/// With `clone_schema` (the default) `schema` is left untouched and an owned
/// result is returned. With `clone_schema` disabled `schema` itself is converted
/// and the result borrows it.
///
/// # Errors
///
/// * [`ConversionError::InvalidType`] if any node has an invalid `type`.
/// * [`ConversionError::InvalidInput`] if `schema` is not an object.
pub fn openapi_schema_to_json_schema<'s>(
    schema: &'s mut Value,
    options: &ConvertOptions,
) -> Result<Cow<'s, Value>, ConversionError> {
    JsonSchemaConverter::new(options).convert_schema(schema)
}

/// Convert an OpenAPI parameter object to JSON Schema draft-04.
///
/// Returns a single schema for a parameter with `schema`, or one schema per
/// media type for a parameter with `content`.
///
/// # Errors
///
/// * [`ConversionError::InvalidInput`] if the parameter has neither `schema` nor
///   `content`.
/// * [`ConversionError::InvalidType`] if an embedded schema has an invalid `type`.
///
/// # Example
///
/// ```rust
/// use openapi_schema_to_json_schema::{ConvertOptions, openapi_parameter_to_json_schema};
/// use serde_json::{Value, json};
///
/// let mut parameter = json!({
///     "name": "body",
///     "in": "query",
///     "content": {
///         "application/json": {"schema": {"type": "string", "nullable": true}},
///         "text/plain": {}
///     }
/// });
///
/// let result = openapi_parameter_to_json_schema(&mut parameter, &ConvertOptions::default())
///     .unwrap();
/// assert_eq!(Value::from(result), json!({
///     "application/json": {
///         "$schema": "http://json-schema.org/draft-04/schema#",
///         "type": ["string", "null"]
///     },
///     "text/plain": {"$schema": "http://json-schema.org/draft-04/schema#"}
/// }));
/// ```
pub fn openapi_parameter_to_json_schema<'p>(
    parameter: &'p mut Value,
    options: &ConvertOptions,
) -> Result<ParameterSchema<'p>, ConversionError> {
    JsonSchemaConverter::new(options).convert_parameter(parameter)
}
