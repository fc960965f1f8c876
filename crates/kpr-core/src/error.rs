use thiserror::Error;

#[derive(Debug, Error)]
pub enum KprError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Advisor error: {0}")]
    Advisor(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for KprError {
    fn from(e: serde_json::Error) -> Self {
        KprError::SerializationError(e.to_string())
    }
}
