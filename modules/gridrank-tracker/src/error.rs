use thiserror::Error;

use gridrank_client::ClientError;

pub type Result<T> = std::result::Result<T, TrackError>;

#[derive(Debug, Error)]
pub enum TrackError {
    /// Rejected client-side before any network call.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Client(#[from] ClientError),
}
