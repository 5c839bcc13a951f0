//! Error types for annotation interchange.

use thiserror::Error;

/// Errors that can occur while decoding interchange text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// A line did not have the expected shape
    #[error("Line {line}: {message}")]
    InvalidLine {
        /// 1-based line number
        line: usize,
        message: String,
    },

    /// Coordinates were not finite or outside the normalized range
    #[error("Line {line}: invalid coordinates: {message}")]
    InvalidCoordinates {
        /// 1-based line number
        line: usize,
        message: String,
    },

    /// Image dimensions required but not usable
    #[error("Image dimensions {width}x{height} are not valid for normalized coordinates")]
    InvalidDimensions { width: f32, height: f32 },
}

impl FormatError {
    /// Create an invalid line error.
    pub fn invalid_line(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidLine {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid coordinates error.
    pub fn invalid_coordinates(line: usize, message: impl Into<String>) -> Self {
        Self::InvalidCoordinates {
            line,
            message: message.into(),
        }
    }
}
