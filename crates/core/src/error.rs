//! Error types for webpage-to-deck conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting sections or writing the deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP container error while assembling the deck.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing error while building a slide part.
    #[error("XML error: {0}")]
    XmlError(String),

    /// An image file could not be read or decoded.
    #[error("Image error: {0}")]
    ImageError(String),

    /// Failed to persist the finished deck.
    #[error("Failed to save deck: {0}")]
    SaveError(String),
}
