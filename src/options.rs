//! Conversion options
//!
//! [`ConvertOptions`] is the caller-facing configuration. It is resolved once into
//! an immutable [`ResolvedOptions`] value that the converters read from.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::convert::ConversionError;
use crate::convert::pattern_properties::{
    PatternPropertiesHandler, default_pattern_properties_handler,
};

/// `$schema` URI stamped on every converted document
pub const DRAFT_04_SCHEMA_URI: &str = "http://json-schema.org/draft-04/schema#";

/// Keywords whose values are nested schemas (or lists of them) and are recursed into
pub const STRUCTS: &[&str] = &[
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "items",
    "additionalProperties",
];

/// OpenAPI-only keywords that have no draft-04 meaning and are stripped by default
pub const NOT_SUPPORTED: &[&str] = &[
    "nullable",
    "discriminator",
    "readOnly",
    "writeOnly",
    "xml",
    "externalDocs",
    "example",
    "deprecated",
];

/// Option keys accepted by [`ConvertOptions::from_config`]
const RECOGNIZED_KEYS: &[&str] = &[
    "cloneSchema",
    "dateToDateTime",
    "supportPatternProperties",
    "patternPropertiesHandler",
    "removeReadOnly",
    "removeWriteOnly",
    "keepNotSupported",
];

/// Caller-facing conversion options.
///
/// Field names serialize in camelCase so an options object can be read from the
/// same JSON/YAML documents that carry OpenAPI schemas.
///
/// # Example
///
/// ```rust
/// use openapi_schema_to_json_schema::ConvertOptions;
///
/// let options = ConvertOptions::default()
///     .with_clone_schema(false)
///     .with_remove_read_only(true)
///     .with_keep_not_supported(["example"]);
///
/// let resolved = options.resolve();
/// assert_eq!(resolved.remove_props, vec!["readOnly".to_string()]);
/// assert!(!resolved.not_supported.contains(&"example"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Deep-copy the input before converting. When `false` the caller's tree is
    /// converted in place.
    pub clone_schema: bool,
    /// Rewrite `format: date` to `format: date-time`
    pub date_to_date_time: bool,
    /// Enable the `x-patternProperties` to `patternProperties` bridge
    pub support_pattern_properties: bool,
    /// Drop properties flagged `readOnly: true`
    pub remove_read_only: bool,
    /// Drop properties flagged `writeOnly: true`
    pub remove_write_only: bool,
    /// Not-supported keywords to keep in the output
    pub keep_not_supported: Vec<String>,
    /// Hook run on a node after the pattern-properties bridge. `None` installs
    /// the built-in handler.
    #[serde(skip)]
    pub pattern_properties_handler: Option<Arc<dyn PatternPropertiesHandler>>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            clone_schema: true,
            date_to_date_time: false,
            support_pattern_properties: false,
            remove_read_only: false,
            remove_write_only: false,
            keep_not_supported: Vec::new(),
            pattern_properties_handler: None,
        }
    }
}

impl fmt::Debug for ConvertOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("clone_schema", &self.clone_schema)
            .field("date_to_date_time", &self.date_to_date_time)
            .field(
                "support_pattern_properties",
                &self.support_pattern_properties,
            )
            .field("remove_read_only", &self.remove_read_only)
            .field("remove_write_only", &self.remove_write_only)
            .field("keep_not_supported", &self.keep_not_supported)
            .field(
                "pattern_properties_handler",
                &self.pattern_properties_handler.as_ref().map(|_| "custom"),
            )
            .finish()
    }
}

impl ConvertOptions {
    /// Create options with the default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clone_schema(mut self, clone_schema: bool) -> Self {
        self.clone_schema = clone_schema;
        self
    }

    pub fn with_date_to_date_time(mut self, date_to_date_time: bool) -> Self {
        self.date_to_date_time = date_to_date_time;
        self
    }

    pub fn with_support_pattern_properties(mut self, support: bool) -> Self {
        self.support_pattern_properties = support;
        self
    }

    pub fn with_remove_read_only(mut self, remove: bool) -> Self {
        self.remove_read_only = remove;
        self
    }

    pub fn with_remove_write_only(mut self, remove: bool) -> Self {
        self.remove_write_only = remove;
        self
    }

    /// Keep the given not-supported keywords instead of stripping them.
    pub fn with_keep_not_supported<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep_not_supported = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the built-in pattern-properties handler.
    ///
    /// The handler only runs when `support_pattern_properties` is enabled and a
    /// node carries `x-patternProperties`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use openapi_schema_to_json_schema::ConvertOptions;
    /// use serde_json::Value;
    ///
    /// let options = ConvertOptions::default()
    ///     .with_support_pattern_properties(true)
    ///     .with_pattern_properties_handler(|schema: Value| schema);
    /// assert!(options.pattern_properties_handler.is_some());
    /// ```
    pub fn with_pattern_properties_handler<H>(mut self, handler: H) -> Self
    where
        H: PatternPropertiesHandler + 'static,
    {
        self.pattern_properties_handler = Some(Arc::new(handler));
        self
    }

    /// Build options from a raw configuration map.
    ///
    /// Flag values are coerced to booleans by truthiness rather than rejected.
    /// `keepNotSupported` is only honoured when it is an array; its non-string
    /// entries are ignored. Unrecognized keys are logged and ignored, and a
    /// non-object config yields the defaults. `patternPropertiesHandler` cannot be
    /// expressed in JSON, so its key is accepted but has no effect here; use
    /// [`ConvertOptions::with_pattern_properties_handler`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use openapi_schema_to_json_schema::ConvertOptions;
    /// use serde_json::json;
    ///
    /// let options = ConvertOptions::from_config(&json!({
    ///     "cloneSchema": 0,
    ///     "removeReadOnly": "yes",
    ///     "keepNotSupported": ["example", 3]
    /// }));
    /// assert!(!options.clone_schema);
    /// assert!(options.remove_read_only);
    /// assert_eq!(options.keep_not_supported, vec!["example".to_string()]);
    /// ```
    pub fn from_config(config: &Value) -> Self {
        let mut options = Self::default();
        let Some(map) = config.as_object() else {
            return options;
        };

        for key in map.keys() {
            if !RECOGNIZED_KEYS.contains(&key.as_str()) {
                warn!("Ignoring unrecognized conversion option '{}'", key);
            }
        }

        let flag = |key: &str| map.get(key).filter(|v| !v.is_null()).map(is_truthy);

        if let Some(value) = flag("cloneSchema") {
            options.clone_schema = value;
        }
        if let Some(value) = flag("dateToDateTime") {
            options.date_to_date_time = value;
        }
        if let Some(value) = flag("supportPatternProperties") {
            options.support_pattern_properties = value;
        }
        if let Some(value) = flag("removeReadOnly") {
            options.remove_read_only = value;
        }
        if let Some(value) = flag("removeWriteOnly") {
            options.remove_write_only = value;
        }
        if let Some(Value::Array(keys)) = map.get("keepNotSupported") {
            options.keep_not_supported = keys
                .iter()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect();
        }

        options
    }

    /// Build options from a YAML (or JSON) configuration document.
    ///
    /// The document is read the same way as [`ConvertOptions::from_config`].
    ///
    /// # Errors
    ///
    /// [`ConversionError::InvalidInput`] if `document` is not valid YAML.
    ///
    /// # Example
    ///
    /// ```rust
    /// use openapi_schema_to_json_schema::ConvertOptions;
    ///
    /// let options = ConvertOptions::from_yaml("removeWriteOnly: true\nkeepNotSupported: [xml]\n")
    ///     .unwrap();
    /// assert!(options.remove_write_only);
    /// assert_eq!(options.keep_not_supported, vec!["xml".to_string()]);
    /// ```
    pub fn from_yaml(document: &str) -> Result<Self, ConversionError> {
        let config: Value = serde_yaml::from_str(document).map_err(|e| {
            ConversionError::InvalidInput(format!("Failed to parse options YAML: {}", e))
        })?;
        Ok(Self::from_config(&config))
    }

    /// Resolve into the immutable option set the converters consume.
    pub fn resolve(&self) -> ResolvedOptions {
        let mut remove_props = Vec::new();
        if self.remove_read_only {
            remove_props.push("readOnly".to_string());
        }
        if self.remove_write_only {
            remove_props.push("writeOnly".to_string());
        }

        for key in &self.keep_not_supported {
            if !NOT_SUPPORTED.contains(&key.as_str()) {
                warn!(
                    "keepNotSupported entry '{}' is not a stripped keyword and has no effect",
                    key
                );
            }
        }

        let not_supported = NOT_SUPPORTED
            .iter()
            .copied()
            .filter(|key| !self.keep_not_supported.iter().any(|kept| kept == key))
            .collect();

        let pattern_properties_handler: Arc<dyn PatternPropertiesHandler> =
            match &self.pattern_properties_handler {
                Some(handler) => Arc::clone(handler),
                None => Arc::new(default_pattern_properties_handler),
            };

        ResolvedOptions {
            clone_schema: self.clone_schema,
            date_to_date_time: self.date_to_date_time,
            support_pattern_properties: self.support_pattern_properties,
            pattern_properties_handler,
            remove_props,
            structs: STRUCTS,
            not_supported,
        }
    }
}

/// Immutable option set read by the schema and parameter converters.
#[derive(Clone)]
pub struct ResolvedOptions {
    pub clone_schema: bool,
    pub date_to_date_time: bool,
    pub support_pattern_properties: bool,
    pub pattern_properties_handler: Arc<dyn PatternPropertiesHandler>,
    /// Property flags whose `true` value removes the owning property
    pub remove_props: Vec<String>,
    pub structs: &'static [&'static str],
    /// Keywords stripped from every node
    pub not_supported: Vec<&'static str>,
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("clone_schema", &self.clone_schema)
            .field("date_to_date_time", &self.date_to_date_time)
            .field(
                "support_pattern_properties",
                &self.support_pattern_properties,
            )
            .field("remove_props", &self.remove_props)
            .field("structs", &self.structs)
            .field("not_supported", &self.not_supported)
            .finish_non_exhaustive()
    }
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        ConvertOptions::default().resolve()
    }
}

/// Loose boolean coercion for raw option values
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}
