//! I/O error types.

use dropsize_core::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input directory could not be listed.
    #[error("cannot read input directory {}: {source}", path.display())]
    InputDir {
        /// Directory that was listed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Image decode or encode failure.
    #[error("image error for {}: {source}", path.display())]
    Image {
        /// Offending image path.
        path: PathBuf,
        /// Underlying error.
        source: image::ImageError,
    },

    /// A decoded image has no pixels.
    #[error("image {} is empty", .0.display())]
    EmptyImage(PathBuf),

    /// Configuration file could not be parsed or written.
    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] dropsize_core::Error),
}
