//! Error types for the regenradar pipeline.
//!
//! Decode failures are scoped to a single radar record, geometry and fetch
//! failures abort a whole refresh cycle. Nothing here is fatal to the host.

use thiserror::Error;

/// The main error type for regenradar operations.
#[derive(Error, Debug)]
pub enum RadarError {
    /// A record's compressed grid could not be decoded
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// The response geometry or pixel bounding box is missing or malformed
    #[error("Geometry error: {message}")]
    Geometry { message: String },

    /// Network, HTTP status or body parsing failure
    #[error("Fetch error: {message}")]
    Fetch { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Image encoding errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },

    /// The playback controller is no longer running
    #[error("Playback error: {message}")]
    Playback { message: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for RadarError {
    fn from(err: reqwest::Error) -> Self {
        RadarError::Fetch {
            message: err.to_string(),
        }
    }
}

impl From<base64::DecodeError> for RadarError {
    fn from(err: base64::DecodeError) -> Self {
        RadarError::Decode {
            message: format!("invalid base64: {}", err),
        }
    }
}

impl From<image::ImageError> for RadarError {
    fn from(err: image::ImageError) -> Self {
        RadarError::ImageGeneration {
            message: err.to_string(),
        }
    }
}

impl RadarError {
    /// Whether this error only invalidates a single record rather than a cycle
    pub fn is_record_local(&self) -> bool {
        matches!(self, RadarError::Decode { .. })
    }
}

/// Convenience type alias for Results with RadarError
pub type Result<T> = std::result::Result<T, RadarError>;
