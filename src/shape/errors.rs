//! Shape normalization errors

use thiserror::Error;

/// Result type for shape operations
pub type ShapeResult<T> = Result<T, ShapeError>;

/// Errors raised while classifying a filter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The filter was not a mapping of field name to condition
    #[error("filter must be a mapping of field name to condition, got {found}")]
    NotAMapping {
        /// JSON type name of the rejected input
        found: &'static str,
    },
}

impl ShapeError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ShapeError::NotAMapping { .. } => "DOCSCOPE_SHAPE_INVALID",
        }
    }

    /// Shape errors are always input-contract violations
    pub fn is_validation(&self) -> bool {
        true
    }
}

/// Returns the JSON type name used in error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_code() {
        let err = ShapeError::NotAMapping { found: "array" };
        assert_eq!(err.code(), "DOCSCOPE_SHAPE_INVALID");
        assert!(err.is_validation());
    }

    #[test]
    fn test_error_display_names_type() {
        let err = ShapeError::NotAMapping {
            found: json_type_name(&json!([1, 2])),
        };
        assert!(err.to_string().contains("array"));
    }
}
