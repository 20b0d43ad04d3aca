// Error types module

use std::fmt;

/// Centralized error type for the compositing pipeline
///
/// Categorizes failures so callers can distinguish user-correctable
/// problems (missing source, unsupported upload) from pipeline faults
/// (decode/encode errors).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubslateError {
    /// Upload MIME type outside the accepted set (jpeg, png, webp)
    UnsupportedFormat(String),

    /// Source or watermark bytes could not be decoded
    Decode(String),

    /// Canvas could not be serialized to the output format
    Encode(String),

    /// Generation requested with no source image loaded
    NoSourceImage,

    /// Download requested before any output was generated
    NoRenderedOutput,

    /// Configuration record failed validation
    InvalidConfig(String),
}

impl SubslateError {
    /// Decode failure with the underlying library message.
    pub fn decode(msg: impl Into<String>) -> Self {
        SubslateError::Decode(msg.into())
    }

    /// Encode failure with the underlying library message.
    pub fn encode(msg: impl Into<String>) -> Self {
        SubslateError::Encode(msg.into())
    }

    /// Rejected upload type, carrying the offending MIME string.
    pub fn unsupported_format(mime: impl Into<String>) -> Self {
        SubslateError::UnsupportedFormat(mime.into())
    }

    /// Invalid configuration record.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        SubslateError::InvalidConfig(msg.into())
    }
}

impl fmt::Display for SubslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubslateError::UnsupportedFormat(mime) => {
                write!(f, "Unsupported image format: {}", mime)
            }
            SubslateError::Decode(msg) => write!(f, "Decode error: {}", msg),
            SubslateError::Encode(msg) => write!(f, "Encode error: {}", msg),
            SubslateError::NoSourceImage => write!(f, "No source image loaded"),
            SubslateError::NoRenderedOutput => write!(f, "No rendered output available"),
            SubslateError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for SubslateError {}
