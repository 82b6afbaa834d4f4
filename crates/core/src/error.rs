use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Activity source error: {0}")]
    Source(String),

    #[error("Dismissal store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
