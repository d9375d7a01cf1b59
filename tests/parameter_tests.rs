//! Integration tests for OpenAPI parameter conversion

use std::borrow::Cow;

use openapi_schema_to_json_schema::{
    ConversionError, ConvertOptions, ParameterSchema, openapi_parameter_to_json_schema,
};
use serde_json::{Value, json};

const SCHEMA_URI: &str = "http://json-schema.org/draft-04/schema#";
const MISSING_SCHEMA: &str =
    "OpenAPI parameter must have either a 'schema' or a 'content' property.";

fn convert(mut parameter: Value) -> Result<Value, ConversionError> {
    openapi_parameter_to_json_schema(&mut parameter, &ConvertOptions::default()).map(Value::from)
}

mod schema_parameter_tests {
    use super::*;

    #[test]
    fn test_minimal_parameter() {
        let result = convert(json!({
            "name": "parameter name",
            "in": "cookie",
            "schema": {"type": "string", "nullable": true}
        }))
        .unwrap();
        assert_eq!(
            result,
            json!({"$schema": SCHEMA_URI, "type": ["string", "null"]})
        );
    }

    #[test]
    fn test_extensive_parameter() {
        let result = convert(json!({
            "name": "parameter name",
            "in": "cookie",
            "schema": {"type": "string", "nullable": true},
            "required": true,
            "allowEmptyValue": true,
            "deprecated": true,
            "allowReserved": true,
            "style": "matrix",
            "explode": true,
            "example": "parameter example"
        }))
        .unwrap();
        assert_eq!(
            result,
            json!({"$schema": SCHEMA_URI, "type": ["string", "null"]})
        );
    }

    #[test]
    fn test_parameter_description_overwrites_schema_description() {
        let result = convert(json!({
            "name": "parameter name",
            "in": "cookie",
            "description": "parameter description",
            "schema": {"description": "schema description"}
        }))
        .unwrap();
        assert_eq!(
            result,
            json!({"$schema": SCHEMA_URI, "description": "parameter description"})
        );
    }

    #[test]
    fn test_schema_description_kept_without_parameter_description() {
        let result = convert(json!({
            "name": "limit",
            "in": "query",
            "schema": {"type": "integer", "description": "page size"}
        }))
        .unwrap();
        assert_eq!(result["description"], json!("page size"));
    }

    #[test]
    fn test_null_description_is_ignored() {
        let result = convert(json!({
            "name": "limit",
            "in": "query",
            "description": null,
            "schema": {"type": "integer", "description": "page size"}
        }))
        .unwrap();
        assert_eq!(result["description"], json!("page size"));
    }

    #[test]
    fn test_schema_wins_over_content() {
        let mut parameter = json!({
            "name": "id",
            "in": "path",
            "schema": {"type": "integer"},
            "content": {"application/json": {"schema": {"type": "string"}}}
        });
        let result =
            openapi_parameter_to_json_schema(&mut parameter, &ConvertOptions::default()).unwrap();
        assert_eq!(
            result.schema(),
            Some(&json!({"$schema": SCHEMA_URI, "type": "integer"}))
        );
        assert!(result.media_type("application/json").is_none());
    }

    #[test]
    fn test_options_apply_to_parameter_schema() {
        let options = ConvertOptions::default().with_remove_read_only(true);
        let mut parameter = json!({
            "name": "filter",
            "in": "query",
            "schema": {
                "type": "object",
                "required": ["id"],
                "properties": {"id": {"type": "string", "readOnly": true}, "q": {"type": "string"}}
            }
        });
        let result = openapi_parameter_to_json_schema(&mut parameter, &options).unwrap();
        assert_eq!(
            result.schema(),
            Some(&json!({
                "$schema": SCHEMA_URI,
                "type": "object",
                "properties": {"q": {"type": "string"}}
            }))
        );
    }

    #[test]
    fn test_invalid_type_in_parameter_schema() {
        let err = convert(json!({"name": "x", "in": "query", "schema": {"type": "dateTime"}}))
            .unwrap_err();
        assert_eq!(err.to_string(), "Type \"dateTime\" is not a valid type.");
    }
}

mod content_parameter_tests {
    use super::*;

    #[test]
    fn test_parameter_with_mime_schemas() {
        let result = convert(json!({
            "name": "parameter name",
            "in": "cookie",
            "content": {
                "application/javascript": {"schema": {"type": "string", "nullable": true}},
                "text/css": {"schema": {"type": "string", "nullable": true}}
            }
        }))
        .unwrap();
        assert_eq!(
            result,
            json!({
                "application/javascript": {"$schema": SCHEMA_URI, "type": ["string", "null"]},
                "text/css": {"$schema": SCHEMA_URI, "type": ["string", "null"]}
            })
        );
    }

    #[test]
    fn test_parameter_with_mimes_without_schema() {
        let result = convert(json!({
            "name": "parameter name",
            "in": "cookie",
            "content": {
                "application/javascript": {"schema": {"type": "string", "nullable": true}},
                "text/css": {}
            }
        }))
        .unwrap();
        assert_eq!(
            result,
            json!({
                "application/javascript": {"$schema": SCHEMA_URI, "type": ["string", "null"]},
                "text/css": {"$schema": SCHEMA_URI}
            })
        );
    }

    #[test]
    fn test_description_applies_to_every_media_type() {
        let result = convert(json!({
            "name": "payload",
            "in": "query",
            "description": "the payload",
            "content": {
                "application/json": {"schema": {"type": "object", "description": "json"}},
                "text/plain": {}
            }
        }))
        .unwrap();
        assert_eq!(result["application/json"]["description"], json!("the payload"));
        assert_eq!(
            result["text/plain"],
            json!({"$schema": SCHEMA_URI, "description": "the payload"})
        );
    }

    #[test]
    fn test_media_type_order_is_preserved() {
        let mut parameter = json!({
            "name": "payload",
            "in": "query",
            "content": {
                "text/plain": {},
                "application/xml": {},
                "application/json": {}
            }
        });
        let result =
            openapi_parameter_to_json_schema(&mut parameter, &ConvertOptions::default()).unwrap();
        let ParameterSchema::Content(schemas) = result else {
            panic!("expected one schema per media type");
        };
        let names: Vec<&str> = schemas.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["text/plain", "application/xml", "application/json"]);
    }

    #[test]
    fn test_empty_content_yields_empty_map() {
        let result = convert(json!({"name": "x", "in": "query", "content": {}})).unwrap();
        assert_eq!(result, json!({}));
    }

    #[test]
    fn test_invalid_type_in_media_type_schema() {
        let err = convert(json!({
            "name": "x",
            "in": "query",
            "content": {"application/json": {"schema": {"type": "foo"}}}
        }))
        .unwrap_err();
        assert_eq!(err, ConversionError::InvalidType("\"foo\"".to_string()));
    }
}

mod missing_schema_tests {
    use super::*;

    #[test]
    fn test_parameter_without_schema_or_content() {
        let err = convert(json!({"name": "parameter name", "in": "cookie"})).unwrap_err();
        assert_eq!(err, ConversionError::InvalidInput(MISSING_SCHEMA.to_string()));
        assert_eq!(err.to_string(), MISSING_SCHEMA);
    }

    #[test]
    fn test_null_schema_and_non_object_content() {
        let err = convert(json!({"name": "x", "in": "query", "schema": null, "content": "nope"}))
            .unwrap_err();
        assert_eq!(err, ConversionError::InvalidInput(MISSING_SCHEMA.to_string()));
    }

    #[test]
    fn test_non_object_parameter() {
        let err = convert(json!("not a parameter")).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidInput(_)));
    }
}

mod clone_schema_tests {
    use super::*;

    #[test]
    fn test_cloning_leaves_parameter_untouched() {
        let mut parameter = json!({
            "name": "q",
            "in": "query",
            "description": "search",
            "schema": {"type": "string", "nullable": true}
        });
        let before = parameter.clone();
        let result =
            openapi_parameter_to_json_schema(&mut parameter, &ConvertOptions::default()).unwrap();

        assert!(matches!(result, ParameterSchema::Schema(Cow::Owned(_))));
        assert_eq!(parameter, before);
    }

    #[test]
    fn test_in_place_converts_embedded_schema() {
        let mut parameter = json!({
            "name": "q",
            "in": "query",
            "description": "search",
            "schema": {"type": "string", "nullable": true}
        });
        let options = ConvertOptions::default().with_clone_schema(false);
        let result = openapi_parameter_to_json_schema(&mut parameter, &options).unwrap();
        assert!(matches!(result, ParameterSchema::Schema(Cow::Borrowed(_))));

        assert_eq!(
            parameter["schema"],
            json!({
                "type": ["string", "null"],
                "$schema": SCHEMA_URI,
                "description": "search"
            })
        );
    }

    #[test]
    fn test_in_place_content_mixes_borrowed_and_owned() {
        let mut parameter = json!({
            "name": "payload",
            "in": "query",
            "content": {
                "application/json": {"schema": {"type": "integer", "format": "int32"}},
                "text/plain": {}
            }
        });
        let options = ConvertOptions::default().with_clone_schema(false);
        let result = openapi_parameter_to_json_schema(&mut parameter, &options).unwrap();

        let ParameterSchema::Content(schemas) = result else {
            panic!("expected one schema per media type");
        };
        assert!(matches!(schemas[0].1, Cow::Borrowed(_)));
        assert!(matches!(schemas[1].1, Cow::Owned(_)));
        drop(schemas);

        assert_eq!(
            parameter["content"]["application/json"]["schema"]["maximum"],
            json!(2147483647)
        );
        assert!(parameter["content"]["text/plain"].get("schema").is_none());
    }
}
