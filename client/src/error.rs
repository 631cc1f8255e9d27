use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api url `{0}`")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("item {0} is not in the current view")]
    UnknownItem(String),
}
