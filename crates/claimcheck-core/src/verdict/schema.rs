//! JSON Schema for the verdict object.

use std::sync::OnceLock;

/// Embedded verdict schema (loaded at compile time).
const VERDICT_SCHEMA_JSON: &str = include_str!("../../schemas/verdict.schema.json");

/// Compiled validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn get_validator() -> Result<&'static jsonschema::Validator, String> {
    COMPILED_SCHEMA
        .get_or_init(|| {
            let schema: serde_json::Value = serde_json::from_str(VERDICT_SCHEMA_JSON)
                .map_err(|e| format!("Invalid schema JSON: {}", e))?;
            jsonschema::options()
                .build(&schema)
                .map_err(|e| format!("Failed to compile schema: {}", e))
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// Validate a candidate verdict object.
///
/// Returns every violation as `"<message> at <path>"`.
pub fn validate_verdict_schema(value: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_verdict_passes() {
        let value = serde_json::json!({"accurate": true, "explanation": "Matches."});
        assert!(validate_verdict_schema(&value).is_ok());
    }

    #[test]
    fn test_wrong_types_fail() {
        let value = serde_json::json!({"accurate": "yes", "explanation": 3});
        let errors = validate_verdict_schema(&value).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_missing_field_fails() {
        let value = serde_json::json!({"accurate": false});
        assert!(validate_verdict_schema(&value).is_err());
    }
}
