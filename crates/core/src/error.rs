//! Domain errors shared by every crate. The API maps each variant to one
//! HTTP status.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No row with this id, or one the caller may not see.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input breaks a business rule; the message is shown to the user.
    #[error("{0}")]
    Validation(String),

    /// The request clashes with current state (already sent, already
    /// processed, duplicate value).
    #[error("{0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}
