//! Error types for the page-curl book renderer.

use thiserror::Error;

/// Result type alias using CurlError.
pub type Result<T> = std::result::Result<T, CurlError>;

/// Main error type for book construction, loading and export.
///
/// Runtime problems inside a mounted book (a texture that fails to load, a
/// command issued in the wrong state, a frame before the rig is ready) are
/// not errors: they degrade to a neutral material, a no-op, or a skipped
/// frame.
#[derive(Error, Debug)]
pub enum CurlError {
    /// Failed to decode or encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A texture source could not supply the requested image.
    #[error("Texture fetch failed: {0}")]
    TextureFetch(String),

    /// The book description cannot produce a book.
    #[error("Invalid book: {0}")]
    InvalidBook(String),

    /// A scripted command could not be parsed.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Failed to export the book.
    #[error("Export error: {0}")]
    Export(String),
}
