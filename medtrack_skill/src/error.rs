use medtrack_core::{DateError, KeyError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Required slot missing: {0}")]
    MissingSlot(&'static str),

    #[error("No caller identity in request")]
    MissingCaller,

    #[error("Invalid subject: {0}")]
    Key(#[from] KeyError),

    #[error("Invalid date: {0}")]
    Date(#[from] DateError),

    #[error("Unsupported request type: {0}")]
    UnsupportedRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
