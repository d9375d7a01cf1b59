//! Schema converter
//!
//! Rewrites an OpenAPI 3.0 schema object, and every schema nested under a
//! structural keyword or `properties`, into draft-04 JSON Schema. Each node goes
//! through the same pipeline; children are fully converted before their parent's
//! own `type`, `format` and unsupported keywords are processed.

use serde_json::{Map, Value, json};
use tracing::trace;

use crate::convert::ConversionError;
use crate::options::{DRAFT_04_SCHEMA_URI, ResolvedOptions};
use crate::validation::types::{is_nullable_pair, validate_type};

/// Keywords that trigger the `oneOf: [{type: null}, ...]` wrap for nullable nodes
const COMPOSITION_KEYWORDS: &[&str] = &["oneOf", "anyOf", "allOf"];

/// Formats draft-04 understands as is
const PASS_THROUGH_FORMATS: &[&str] = &[
    "date-time",
    "email",
    "hostname",
    "ipv4",
    "ipv6",
    "uri",
    "uri-reference",
];

/// Standard (not URL-safe) base64 alphabet
const BYTE_PATTERN: &str = r"^[\w\d+\/=]*$";

/// Rewrite applied to a node for its `format`.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FormatRule {
    DateTime,
    IntegerRange { minimum: i64, maximum: i64 },
    FloatRange { minimum: f64, maximum: f64 },
    Base64Pattern,
}

impl FormatRule {
    fn for_format(format: &str, options: &ResolvedOptions) -> Option<Self> {
        if PASS_THROUGH_FORMATS.contains(&format) {
            return None;
        }

        match format {
            "date" if options.date_to_date_time => Some(Self::DateTime),
            "int32" => Some(Self::IntegerRange {
                minimum: i32::MIN.into(),
                maximum: i32::MAX.into(),
            }),
            "int64" => Some(Self::IntegerRange {
                minimum: i64::MIN,
                maximum: i64::MAX,
            }),
            "float" => {
                let bound = 2f64.powi(128);
                Some(Self::FloatRange {
                    minimum: -bound,
                    maximum: bound - 1.0,
                })
            }
            "double" => Some(Self::FloatRange {
                minimum: f64::MIN,
                maximum: f64::MAX,
            }),
            "byte" => Some(Self::Base64Pattern),
            _ => None,
        }
    }

    fn apply(self, map: &mut Map<String, Value>) {
        match self {
            Self::DateTime => {
                map.insert("format".to_string(), json!("date-time"));
            }
            Self::IntegerRange { minimum, maximum } => {
                map.insert("minimum".to_string(), Value::from(minimum));
                map.insert("maximum".to_string(), Value::from(maximum));
            }
            Self::FloatRange { minimum, maximum } => {
                map.insert("minimum".to_string(), Value::from(minimum));
                map.insert("maximum".to_string(), Value::from(maximum));
            }
            Self::Base64Pattern => {
                map.insert("pattern".to_string(), json!(BYTE_PATTERN));
            }
        }
    }
}

/// Recursive OpenAPI schema to JSON Schema converter.
///
/// Conversion happens in place; callers that need the input untouched convert a
/// copy.
#[derive(Debug, Clone, Copy)]
pub struct SchemaConverter<'a> {
    options: &'a ResolvedOptions,
}

impl<'a> SchemaConverter<'a> {
    pub fn new(options: &'a ResolvedOptions) -> Self {
        Self { options }
    }

    /// Convert a schema document in place and stamp it with the draft-04 `$schema` URI.
    ///
    /// # Arguments
    ///
    /// * `schema` - Root schema object. Replaced wholesale when the root is a
    ///   nullable composition.
    ///
    /// # Errors
    ///
    /// * [`ConversionError::InvalidInput`] if the root is not a JSON object.
    /// * [`ConversionError::InvalidType`] if any node declares an unknown `type`.
    ///   The tree may be partially converted at that point; nodes that were not
    ///   reached are left as they were.
    ///
    /// # Example
    ///
    /// ```rust
    /// use openapi_schema_to_json_schema::convert::SchemaConverter;
    /// use openapi_schema_to_json_schema::options::ResolvedOptions;
    /// use serde_json::json;
    ///
    /// let options = ResolvedOptions::default();
    /// let mut schema = json!({"type": "string", "nullable": true});
    /// SchemaConverter::new(&options).convert_from_schema(&mut schema).unwrap();
    /// assert_eq!(schema, json!({
    ///     "type": ["string", "null"],
    ///     "$schema": "http://json-schema.org/draft-04/schema#"
    /// }));
    /// ```
    pub fn convert_from_schema(&self, schema: &mut Value) -> Result<(), ConversionError> {
        if !schema.is_object() {
            return Err(ConversionError::InvalidInput(
                "OpenAPI schema must be an object.".to_string(),
            ));
        }

        self.convert_schema(schema)?;

        if let Some(map) = schema.as_object_mut() {
            map.insert("$schema".to_string(), json!(DRAFT_04_SCHEMA_URI));
        }
        Ok(())
    }

    /// Run the per-node pipeline. Values that are not objects pass through.
    fn convert_schema(&self, node: &mut Value) -> Result<(), ConversionError> {
        let Some(map) = node.as_object_mut() else {
            return Ok(());
        };

        if is_nullable(map) && has_composition(map) {
            return self.convert_nullable_composition(node);
        }

        self.convert_structs(map)?;
        self.convert_properties(map)?;

        if let Some(schema_type) = map.get("type") {
            validate_type(schema_type)?;
        }

        merge_nullable_type(map);
        self.convert_format(map);

        if self.options.support_pattern_properties && rename_pattern_properties(map) {
            let schema = std::mem::take(node);
            *node = self.options.pattern_properties_handler.handle(schema);
        }

        if let Some(map) = node.as_object_mut() {
            for keyword in &self.options.not_supported {
                map.shift_remove(*keyword);
            }
        }
        Ok(())
    }

    /// `nullable` next to `oneOf`/`anyOf`/`allOf` cannot be expressed with a type
    /// array, so the node becomes `oneOf: [{type: null}, <node without nullable>]`.
    fn convert_nullable_composition(&self, node: &mut Value) -> Result<(), ConversionError> {
        let mut inner = std::mem::take(node);
        if let Some(map) = inner.as_object_mut() {
            map.shift_remove("nullable");
        }
        if let Err(err) = self.convert_schema(&mut inner) {
            *node = inner;
            return Err(err);
        }

        trace!("Wrapped nullable composition in oneOf");
        let mut wrapper = Map::new();
        wrapper.insert(
            "oneOf".to_string(),
            Value::Array(vec![json!({"type": "null"}), inner]),
        );
        *node = Value::Object(wrapper);
        Ok(())
    }

    fn convert_structs(&self, map: &mut Map<String, Value>) -> Result<(), ConversionError> {
        for keyword in self.options.structs {
            match map.get_mut(*keyword) {
                Some(Value::Array(schemas)) => {
                    for schema in schemas.iter_mut() {
                        self.convert_schema(schema)?;
                    }
                }
                Some(schema @ Value::Object(_)) => self.convert_schema(schema)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Convert each property, dropping those flagged by a remove flag, then keep
    /// `required` consistent with what survived. Properties are converted where
    /// they sit, so a failure leaves the unconverted siblings in place.
    fn convert_properties(&self, map: &mut Map<String, Value>) -> Result<(), ConversionError> {
        let Some(Value::Object(properties)) = map.get_mut("properties") else {
            return Ok(());
        };

        properties.retain(|name, property| match self.removal_flag(property) {
            Some(flag) => {
                trace!("Removed property '{}' flagged {}", name, flag);
                false
            }
            None => true,
        });
        for property in properties.values_mut() {
            self.convert_schema(property)?;
        }
        let properties_emptied = properties.is_empty();

        let required = match (map.get("required"), map.get("properties")) {
            (Some(Value::Array(required)), Some(Value::Object(properties))) => Some(
                required
                    .iter()
                    .filter(|name| name.as_str().is_some_and(|n| properties.contains_key(n)))
                    .cloned()
                    .collect::<Vec<_>>(),
            ),
            _ => None,
        };
        match required {
            Some(required) if required.is_empty() => {
                map.shift_remove("required");
            }
            Some(required) => {
                map.insert("required".to_string(), Value::Array(required));
            }
            None => {}
        }

        if properties_emptied {
            map.shift_remove("properties");
        }
        Ok(())
    }

    fn removal_flag(&self, property: &Value) -> Option<&'a str> {
        self.options
            .remove_props
            .iter()
            .map(String::as_str)
            .find(|flag| property.get(*flag) == Some(&Value::Bool(true)))
    }

    fn convert_format(&self, map: &mut Map<String, Value>) {
        let Some(Value::String(format)) = map.get("format") else {
            return;
        };

        if let Some(rule) = FormatRule::for_format(format, self.options) {
            trace!("Applying {:?} for format '{}'", rule, format);
            rule.apply(map);
        }
    }
}

fn is_nullable(map: &Map<String, Value>) -> bool {
    map.get("nullable") == Some(&Value::Bool(true))
}

fn has_composition(map: &Map<String, Value>) -> bool {
    COMPOSITION_KEYWORDS
        .iter()
        .any(|keyword| matches!(map.get(*keyword), Some(Value::Array(_))))
}

/// `type: T` with `nullable: true` becomes `type: [T, "null"]`, and a sibling
/// `enum` gains a `null` member.
fn merge_nullable_type(map: &mut Map<String, Value>) {
    if !is_nullable(map) {
        return;
    }
    let Some(schema_type) = map.get_mut("type") else {
        return;
    };

    let already_merged = matches!(schema_type, Value::Array(items) if is_nullable_pair(items));
    if !already_merged {
        let original = schema_type.take();
        *schema_type = Value::Array(vec![original, Value::String("null".to_string())]);
    }

    if let Some(Value::Array(values)) = map.get_mut("enum") {
        if !already_merged || !values.contains(&Value::Null) {
            values.push(Value::Null);
        }
    }
}

/// Move `x-patternProperties` to `patternProperties`. Returns `false` when the
/// node carries no `x-patternProperties` object.
fn rename_pattern_properties(map: &mut Map<String, Value>) -> bool {
    if !matches!(map.get("x-patternProperties"), Some(Value::Object(_))) {
        return false;
    }
    let Some(patterns) = map.shift_remove("x-patternProperties") else {
        return false;
    };

    trace!("Bridged x-patternProperties to patternProperties");
    map.insert("patternProperties".to_string(), patterns);
    true
}
