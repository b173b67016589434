//! Error types for voxlate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxlateError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio capture errors
    #[error("Audio input device unavailable: {message}")]
    DeviceUnavailable { message: String },

    #[error("Recording produced no audio data")]
    EmptyCapture,

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    // Remote service errors
    #[error("Speech service unreachable: {message}")]
    ServiceUnreachable { message: String },

    #[error("Speech service returned {status}: {message}")]
    ServiceError { status: u16, message: String },

    // Playback errors
    #[error("Playback failed: {message}")]
    Playback { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for VoxlateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::ServiceUnreachable {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::ServiceError {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::ServiceUnreachable {
                message: err.to_string(),
            }
        }
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, VoxlateError>;
