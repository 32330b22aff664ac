//! Centralized error type for the sonora umbrella crate.
//!
//! Wraps the analysis crate's errors so `?` propagates naturally across crate boundaries.
//! Malformed buffers surface as [`Error::InvalidBuffer`] whichever crate caught them.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Analysis(sonora_analysis::Error),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),

    #[error("Invalid segment: start {start}s, duration {duration}s")]
    InvalidSegment { start: f64, duration: f64 },
}

impl From<sonora_analysis::Error> for Error {
    fn from(err: sonora_analysis::Error) -> Self {
        match err {
            sonora_analysis::Error::InvalidBuffer(msg) => Error::InvalidBuffer(msg),
            other => Error::Analysis(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
