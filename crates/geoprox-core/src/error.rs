// crates/geoprox-core/src/error.rs
use thiserror::Error;

/// Recoverable failure while acquiring one of the datasets.
///
/// None of these abort a [`Session`](crate::Session): the caller surfaces
/// the error and keeps working with whatever was already loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[cfg(feature = "http")]
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request to {url} failed with HTTP status {status}")]
    Status { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected payload: {0}")]
    Payload(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("load cancelled")]
    Cancelled,
}

/// Rejected filter input. The state is left untouched.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("buffer radius must be a number, got {0}")]
    InvalidRadius(f64),
}

pub type Result<T> = std::result::Result<T, LoadError>;
