//! Error types for the gesture recognition library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame or parameter outside the accepted domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark source could not deliver a frame
    #[error("Landmark source error: {0}")]
    LandmarkSource(String),

    /// Gesture pipeline lifecycle error
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Filter initialization error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Playback command could not be applied
    #[error("Playback error: {0}")]
    Playback(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
