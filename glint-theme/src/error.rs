//! # Theme Error Types
//!
//! Error types for the glint theming system. Most runtime paths in the
//! resolver degrade instead of failing (unparseable colors become `None`,
//! unreachable images keep the previous decision), so these errors surface
//! mainly from configuration loading and image decoding diagnostics.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the theming system.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// Configuration file was not found.
    #[error("Configuration file not found: {path:?}")]
    ConfigNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Error parsing a configuration file.
    #[error("Failed to parse configuration file {path:?}: {details}")]
    ConfigParse {
        /// The path of the file that failed to parse.
        path: PathBuf,
        /// Details about the parse error.
        details: String,
    },

    /// A theme decision string was neither `light` nor `dark`.
    #[error("Invalid theme decision: {0}")]
    InvalidDecision(String),

    /// An image reference failed to decode.
    #[error("Failed to decode image {reference}: {details}")]
    ImageDecode {
        /// The image reference that failed.
        reference: String,
        /// Details about the decode error.
        details: String,
    },

    /// An image reference could not be loaded at all.
    #[error("Image unavailable: {reference}")]
    ImageUnavailable {
        /// The image reference that could not be loaded.
        reference: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for theme operations.
pub type ThemeResult<T> = Result<T, ThemeError>;

impl ThemeError {
    /// Create a configuration not found error.
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a configuration parse error.
    pub fn config_parse(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create an image decode error.
    pub fn image_decode(reference: impl Into<String>, details: impl Into<String>) -> Self {
        Self::ImageDecode {
            reference: reference.into(),
            details: details.into(),
        }
    }

    /// Create an image unavailable error.
    pub fn image_unavailable(reference: impl Into<String>) -> Self {
        Self::ImageUnavailable {
            reference: reference.into(),
        }
    }
}
