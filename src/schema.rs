use jsonschema::validator_for;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema parse error: {0}")]
    SchemaParse(#[from] serde_json::Error),
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("Instance validation failed: {0}")]
    ValidationFailed(String),
}

/// Check that a tool's `inputSchema` is itself a usable JSON Schema.
///
/// Tool arguments are never validated against these schemas at call time;
/// they only describe the tools to the client.
pub fn check_schema(schema: &Value) -> Result<(), SchemaValidationError> {
    validator_for(schema)
        .map(|_| ())
        .map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))
}

/// Validate a JSON instance against a JSON Schema (draft 2020-12).
pub fn validate_value(schema: &Value, instance: &Value) -> Result<(), SchemaValidationError> {
    let validator =
        validator_for(schema).map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    let first = validator.iter_errors(instance).next().map(|err| err.to_string());
    match first {
        None => Ok(()),
        Some(err) => Err(SchemaValidationError::ValidationFailed(err)),
    }
}

/// String form of [`validate_value`].
pub fn validate_json(schema_str: &str, instance_str: &str) -> Result<(), SchemaValidationError> {
    let schema_json: Value = serde_json::from_str(schema_str)?;
    let instance_json: Value = serde_json::from_str(instance_str)?;
    validate_value(&schema_json, &instance_json)
}
