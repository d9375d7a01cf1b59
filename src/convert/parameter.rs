//! Parameter converter
//!
//! Extracts the schema(s) embedded in an OpenAPI 3.0 parameter object and runs
//! them through the schema converter.

use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::trace;

use crate::convert::ConversionError;
use crate::convert::schema::SchemaConverter;
use crate::options::ResolvedOptions;

const MISSING_SCHEMA_MESSAGE: &str =
    "OpenAPI parameter must have either a 'schema' or a 'content' property.";

/// Result of converting a parameter object.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSchema<'a> {
    /// The parameter carried a `schema`
    Schema(Cow<'a, Value>),
    /// The parameter carried `content`; one schema per media type, in document order
    Content(Vec<(String, Cow<'a, Value>)>),
}

impl ParameterSchema<'_> {
    /// The converted schema, for the `schema` form
    pub fn schema(&self) -> Option<&Value> {
        match self {
            Self::Schema(schema) => Some(&**schema),
            Self::Content(_) => None,
        }
    }

    /// The converted schema for `media_type`, for the `content` form
    pub fn media_type(&self, media_type: &str) -> Option<&Value> {
        match self {
            Self::Schema(_) => None,
            Self::Content(schemas) => schemas
                .iter()
                .find(|(name, _)| name == media_type)
                .map(|(_, schema)| &**schema),
        }
    }

    /// Plain JSON form: the schema itself, or an object keyed by media type.
    pub fn into_value(self) -> Value {
        match self {
            Self::Schema(schema) => schema.into_owned(),
            Self::Content(schemas) => Value::Object(
                schemas
                    .into_iter()
                    .map(|(media_type, schema)| (media_type, schema.into_owned()))
                    .collect(),
            ),
        }
    }
}

impl From<ParameterSchema<'_>> for Value {
    fn from(schema: ParameterSchema<'_>) -> Self {
        schema.into_value()
    }
}

/// OpenAPI parameter to JSON Schema converter.
#[derive(Debug, Clone, Copy)]
pub struct ParameterConverter<'a> {
    options: &'a ResolvedOptions,
}

impl<'a> ParameterConverter<'a> {
    pub fn new(options: &'a ResolvedOptions) -> Self {
        Self { options }
    }

    /// Convert a parameter object.
    ///
    /// A `schema` is converted on its own. Otherwise every media type of `content`
    /// is converted, a media type without a schema object counting as an empty
    /// schema. A parameter `description` overwrites the description of every
    /// resulting schema.
    ///
    /// # Errors
    ///
    /// * [`ConversionError::InvalidInput`] if the parameter has neither `schema`
    ///   nor an object `content`, or is not an object at all.
    /// * Any error from converting the embedded schemas.
    ///
    /// # Example
    ///
    /// ```rust
    /// use openapi_schema_to_json_schema::convert::ParameterConverter;
    /// use openapi_schema_to_json_schema::options::ResolvedOptions;
    /// use serde_json::json;
    ///
    /// let options = ResolvedOptions::default();
    /// let mut parameter = json!({
    ///     "name": "id",
    ///     "in": "query",
    ///     "description": "Identifier",
    ///     "schema": {"type": "integer", "description": "ignored"}
    /// });
    ///
    /// let result = ParameterConverter::new(&options)
    ///     .convert_from_parameter(&mut parameter)
    ///     .unwrap();
    /// assert_eq!(result.schema().unwrap()["description"], json!("Identifier"));
    /// ```
    pub fn convert_from_parameter<'p>(
        &self,
        parameter: &'p mut Value,
    ) -> Result<ParameterSchema<'p>, ConversionError> {
        let description = parameter
            .get("description")
            .filter(|d| !d.is_null())
            .cloned();

        let Some(map) = parameter.as_object_mut() else {
            return Err(missing_schema());
        };

        let has_schema = map.get("schema").is_some_and(|s| !s.is_null());
        if has_schema {
            let schema = map.get_mut("schema").ok_or_else(missing_schema)?;
            let schema = self.convert_parameter_schema(schema, description.as_ref())?;
            return Ok(ParameterSchema::Schema(schema));
        }

        match map.get_mut("content").and_then(Value::as_object_mut) {
            Some(content) => {
                let mut schemas = Vec::with_capacity(content.len());
                for (media_type, media) in content.iter_mut() {
                    let schema = match media.get_mut("schema").filter(|s| s.is_object()) {
                        Some(schema) => {
                            self.convert_parameter_schema(schema, description.as_ref())?
                        }
                        None => {
                            trace!("No schema for media type '{}'", media_type);
                            let empty = Value::Object(Map::new());
                            Cow::Owned(self.convert_owned(empty, description.as_ref())?)
                        }
                    };
                    schemas.push((media_type.clone(), schema));
                }
                Ok(ParameterSchema::Content(schemas))
            }
            None => Err(missing_schema()),
        }
    }

    fn convert_parameter_schema<'s>(
        &self,
        schema: &'s mut Value,
        description: Option<&Value>,
    ) -> Result<Cow<'s, Value>, ConversionError> {
        if self.options.clone_schema {
            return Ok(Cow::Owned(self.convert_owned(schema.clone(), description)?));
        }

        SchemaConverter::new(self.options).convert_from_schema(schema)?;
        overwrite_description(schema, description);
        Ok(Cow::Borrowed(schema))
    }

    fn convert_owned(
        &self,
        mut schema: Value,
        description: Option<&Value>,
    ) -> Result<Value, ConversionError> {
        SchemaConverter::new(self.options).convert_from_schema(&mut schema)?;
        overwrite_description(&mut schema, description);
        Ok(schema)
    }
}

fn overwrite_description(schema: &mut Value, description: Option<&Value>) {
    if let (Some(map), Some(description)) = (schema.as_object_mut(), description) {
        map.insert("description".to_string(), description.clone());
    }
}

fn missing_schema() -> ConversionError {
    ConversionError::InvalidInput(MISSING_SCHEMA_MESSAGE.to_string())
}
