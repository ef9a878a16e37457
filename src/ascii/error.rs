//! Error types for the image-to-ASCII pipeline.

/// Errors that can occur while loading an image or converting it to glyphs.
#[derive(Debug, thiserror::Error)]
pub enum AsciiError {
    /// Zero-dimension or malformed pixel data
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Configuration rejected before any pixel work
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The image bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
