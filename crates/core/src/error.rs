use crate::types::DbId;

/// Message returned for every failed credential check.
///
/// Unknown usernames and wrong passwords share it so callers cannot tell
/// which accounts exist.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Duplicate user: {0}")]
    DuplicateUser(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The uniform credential failure.
    pub fn invalid_credentials() -> Self {
        Self::Unauthenticated(INVALID_CREDENTIALS.into())
    }
}
