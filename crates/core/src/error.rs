use std::collections::BTreeMap;

use crate::types::DbId;

/// Boxed error from a persistence backend.
pub type StorageSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Per-field validation messages, keyed by field name.
    #[error("Validation failed for fields: {}", field_list(.0))]
    FieldErrors(BTreeMap<String, String>),

    #[error("Invalid status: '{0}'")]
    InvalidStatus(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(#[source] StorageSource),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a single-field validation failure.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_string(), message.into());
        CoreError::FieldErrors(errors)
    }
}

fn field_list(errors: &BTreeMap<String, String>) -> String {
    errors.keys().cloned().collect::<Vec<_>>().join(", ")
}
