use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreditError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Malformed number in {field}: {value:?}")]
    MalformedNumber { field: String, value: String },

    #[error("Malformed date: {value:?}")]
    MalformedDate { value: String },

    #[error("Out of numeric range computing {field}")]
    Overflow { field: String },

    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl From<serde_json::Error> for CreditError {
    fn from(e: serde_json::Error) -> Self {
        CreditError::SerializationError {
            message: e.to_string(),
        }
    }
}
