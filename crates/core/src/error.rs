use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A state-machine violation, e.g. mutating or re-publishing a
    /// published template version.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A paper profile whose declared grid does not fit its sheet.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A sheet preview was requested but neither the version default nor
    /// an override paper profile is available.
    #[error("No paper profile available: {0}")]
    MissingPaperProfile(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
