//! Domain error taxonomy.
//!
//! Services return `anyhow::Result`; recoverable, caller-relevant failures
//! are wrapped in [`DomainError`] so the REST layer can map them to
//! meaningful status codes instead of a blanket 500.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed input, rejected at construction time.
    #[error("{0}")]
    Validation(String),

    /// The addressed record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The operation conflicts with existing state.
    #[error("{0}")]
    Constraint(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            id: id.into(),
        }
    }
}
