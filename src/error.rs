//! Typed errors for the adherence library.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A caller-supplied value could not be used: unparseable timestamp,
    /// malformed dose slot, unknown status, inverted date range.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
