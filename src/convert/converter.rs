//! OpenAPI to JSON Schema converter
//!
//! Entry point that resolves options once and routes schema and parameter
//! objects into the recursive converters.

use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use crate::convert::parameter::{ParameterConverter, ParameterSchema};
use crate::convert::schema::SchemaConverter;
use crate::options::{ConvertOptions, ResolvedOptions};

/// Error during schema or parameter conversion
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// A `type` keyword holds something other than a draft-04 primitive type name.
    /// Carries the JSON rendering of the offending value.
    #[error("Type {0} is not a valid type.")]
    InvalidType(String),
    /// The input is not shaped like a schema or parameter object
    #[error("{0}")]
    InvalidInput(String),
}

/// OpenAPI to JSON Schema converter
///
/// Holds a resolved option set so any number of schemas and parameters can be
/// converted with the same configuration.
///
/// # Example
///
/// ```rust
/// use openapi_schema_to_json_schema::{ConvertOptions, JsonSchemaConverter};
/// use serde_json::json;
///
/// let converter = JsonSchemaConverter::new(&ConvertOptions::default());
/// let mut schema = json!({"type": "integer", "format": "int32", "example": 4});
/// let converted = converter.convert_schema(&mut schema).unwrap();
///
/// assert_eq!(converted["maximum"], json!(2147483647));
/// assert!(converted.get("example").is_none());
/// // The input was cloned, so it is unchanged
/// assert_eq!(schema["example"], json!(4));
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaConverter {
    options: ResolvedOptions,
}

impl JsonSchemaConverter {
    /// Create a converter, resolving `options`
    pub fn new(options: &ConvertOptions) -> Self {
        Self::from_resolved(options.resolve())
    }

    pub fn from_resolved(options: ResolvedOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    /// Convert an OpenAPI schema object.
    ///
    /// With `clone_schema` enabled the input is left untouched and the converted
    /// copy is returned as [`Cow::Owned`]. Otherwise the input is converted in
    /// place and [`Cow::Borrowed`] points at it.
    ///
    /// # Arguments
    ///
    /// * `schema` - The OpenAPI schema object.
    ///
    /// # Returns
    ///
    /// The draft-04 JSON Schema, stamped with `$schema`.
    pub fn convert_schema<'s>(
        &self,
        schema: &'s mut Value,
    ) -> Result<Cow<'s, Value>, ConversionError> {
        debug!(
            clone_schema = self.options.clone_schema,
            "Converting OpenAPI schema"
        );
        let converter = SchemaConverter::new(&self.options);

        if self.options.clone_schema {
            let mut copy = schema.clone();
            converter.convert_from_schema(&mut copy)?;
            Ok(Cow::Owned(copy))
        } else {
            converter.convert_from_schema(schema)?;
            Ok(Cow::Borrowed(schema))
        }
    }

    /// Convert an OpenAPI schema object the caller no longer needs.
    ///
    /// Takes ownership, so no copy is made whatever `clone_schema` says.
    pub fn convert_owned_schema(&self, mut schema: Value) -> Result<Value, ConversionError> {
        debug!("Converting owned OpenAPI schema");
        SchemaConverter::new(&self.options).convert_from_schema(&mut schema)?;
        Ok(schema)
    }

    /// Convert an OpenAPI parameter object.
    ///
    /// See [`ParameterConverter::convert_from_parameter`] for the accepted shapes.
    /// `clone_schema` decides whether embedded schemas are copied or converted in
    /// place, as for [`JsonSchemaConverter::convert_schema`].
    pub fn convert_parameter<'p>(
        &self,
        parameter: &'p mut Value,
    ) -> Result<ParameterSchema<'p>, ConversionError> {
        debug!(
            clone_schema = self.options.clone_schema,
            "Converting OpenAPI parameter"
        );
        ParameterConverter::new(&self.options).convert_from_parameter(parameter)
    }
}
