//! Error types for sonora-analysis.

use thiserror::Error;

/// Error type for sonora-analysis operations.
///
/// Only construction and parsing can fail. A window without a detectable
/// pitch, tempo or chord is reported as `None` by the detectors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),

    #[error("Invalid note name: {0:?}. Expected <letter>[#]<octave>, e.g. \"A4\" or \"C#3\"")]
    InvalidNoteName(String),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, Error>;
