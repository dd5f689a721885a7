use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated")]
    AuthenticationRequired,

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}
