//! Pattern-properties handling
//!
//! OpenAPI 3.0 has no `patternProperties`, so documents carry it as the
//! `x-patternProperties` extension. Once the schema converter has renamed the
//! extension, a [`PatternPropertiesHandler`] gets the whole node to post-process.

use serde_json::{Map, Value};

/// Post-processing hook run on a node after `x-patternProperties` was renamed
/// to `patternProperties`.
///
/// Any `Fn(Value) -> Value` closure or function that is `Send + Sync` is a handler.
pub trait PatternPropertiesHandler: Send + Sync {
    /// Take the node and return the node to continue converting with.
    fn handle(&self, schema: Value) -> Value;
}

impl<F> PatternPropertiesHandler for F
where
    F: Fn(Value) -> Value + Send + Sync,
{
    fn handle(&self, schema: Value) -> Value {
        self(schema)
    }
}

/// Built-in handler.
///
/// When `additionalProperties` is a schema that is structurally equal to the
/// schema of any pattern, every value is already covered by the patterns and
/// `additionalProperties` becomes `false`. Nodes without both an object
/// `additionalProperties` and an object `patternProperties` are returned as is.
///
/// # Example
///
/// ```rust
/// use openapi_schema_to_json_schema::convert::default_pattern_properties_handler;
/// use serde_json::json;
///
/// let schema = default_pattern_properties_handler(json!({
///     "additionalProperties": {"type": "string"},
///     "patternProperties": {"^[a-z]*$": {"type": "string"}}
/// }));
/// assert_eq!(schema["additionalProperties"], json!(false));
/// ```
pub fn default_pattern_properties_handler(mut schema: Value) -> Value {
    if let Some(map) = schema.as_object_mut() {
        close_additional_properties(map);
    }
    schema
}

fn close_additional_properties(map: &mut Map<String, Value>) {
    let covered = match (map.get("additionalProperties"), map.get("patternProperties")) {
        (Some(additional @ Value::Object(_)), Some(Value::Object(patterns))) => {
            patterns.values().any(|pattern| pattern == additional)
        }
        _ => false,
    };

    if covered {
        map.insert("additionalProperties".to_string(), Value::Bool(false));
    }
}
