//! OpenAPI to JSON Schema conversion
//!
//! Provides the recursive schema converter, the parameter adapter built on it,
//! and the pattern-properties hook.

pub mod converter;
pub mod parameter;
pub mod pattern_properties;
pub mod schema;

pub use converter::{ConversionError, JsonSchemaConverter};
pub use parameter::{ParameterConverter, ParameterSchema};
pub use pattern_properties::{PatternPropertiesHandler, default_pattern_properties_handler};
pub use schema::SchemaConverter;
