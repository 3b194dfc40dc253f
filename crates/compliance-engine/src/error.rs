//! Error types for the calculation engine

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A referenced calculation type (or canton, for administrative edits) does not exist
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// The calculation type exists but no formula is registered for it
    #[error("Unknown calculation type: {0}")]
    InvalidArgument(String),
}

impl EngineError {
    pub fn calculation_type_not_found(slug: &str) -> Self {
        EngineError::NotFound {
            entity: "Calculation type",
            key: slug.to_string(),
        }
    }

    pub fn canton_not_found(code: &str) -> Self {
        EngineError::NotFound {
            entity: "Canton",
            key: code.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
