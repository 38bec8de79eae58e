//! Error types for fftw-age

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using fftw-age's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating or loading wisdom
#[derive(Error, Debug)]
pub enum Error {
    /// A one-letter code did not name any known value
    #[error("Invalid transform {what}: {code:?}")]
    InvalidCode {
        /// Which part of the transform was being parsed
        what: &'static str,
        /// The text that failed to parse
        code: String,
    },

    /// The transform is well formed but outside the supported subset
    #[error("Unsupported transform {tag}: {reason}")]
    Unsupported {
        /// Tag of the rejected transform
        tag: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// A grid dimension is zero, too large for FFTW, or the grid overflows
    #[error("Invalid transform dimensions {dims:?}: {reason}")]
    InvalidDimensions {
        /// The requested grid
        dims: [usize; 3],
        /// What is wrong with it
        reason: &'static str,
    },

    /// A thread count of zero, or one that could not be parsed
    #[error("Invalid thread count: {0:?}")]
    InvalidThreads(String),

    /// `fftw_init_threads` reported failure
    #[error("Failed to initialise FFTW threads")]
    ThreadInit,

    /// `fftw_alloc_complex` could not provide the transform buffer
    #[error("Failed to allocate {bytes} bytes for {tag}")]
    Alloc {
        /// Tag of the transform being planned
        tag: String,
        /// Requested buffer size
        bytes: usize,
    },

    /// FFTW returned a null plan
    #[error("No FFTW plan has been generated for {tag}")]
    Plan {
        /// Tag of the transform being planned
        tag: String,
    },

    /// FFTW could not write the wisdom file
    #[error("Failed to export FFTW wisdom file: {}", .path.display())]
    Export {
        /// Destination that could not be written
        path: PathBuf,
    },

    /// FFTW could not read or parse the wisdom file
    #[error("Failed to import FFTW wisdom file: {}", .path.display())]
    Import {
        /// File that could not be imported
        path: PathBuf,
    },

    /// The wisdom file loaded but does not cover the transform
    #[error("FFTW wisdom file {} does not cover {tag}", .path.display())]
    NotCovered {
        /// Tag of the transform that was probed
        tag: String,
        /// Wisdom file that was imported
        path: PathBuf,
    },

    /// The target exists and the caller asked not to replace it
    #[error("FFTW wisdom file already exists: {}", .path.display())]
    Exists {
        /// The existing file
        path: PathBuf,
    },

    /// A file name that does not follow the wisdom naming convention
    #[error("Not a wisdom file name: {0:?}")]
    FileName(String),

    /// Filesystem error at a given path
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
