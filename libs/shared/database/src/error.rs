use thiserror::Error;

/// Transport-level failures from the document store, already classified by
/// HTTP status so callers can map them to user-visible error kinds.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    Conflict(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Store rejected credentials: {0}")]
    Auth(String),

    #[error("Malformed store response: {0}")]
    Payload(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
