//! Custom error types for the model and tracking boundaries

use thiserror::Error;

/// Errors from the chat-completion model boundary
#[derive(Error, Debug)]
pub enum ModelError {
    /// API request failed
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        message: String,
    },

    /// Request timeout
    #[error("Request timeout")]
    TimeoutError,

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelError::TimeoutError
        } else {
            ModelError::NetworkError {
                message: err.to_string(),
            }
        }
    }
}

/// Errors from the experiment-tracking boundary
#[derive(Error, Debug)]
pub enum TrackingError {
    /// Tracking server rejected the request
    #[error("Tracking API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
    },

    /// Invalid response from the tracking server
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        message: String,
    },
}

impl From<reqwest::Error> for TrackingError {
    fn from(err: reqwest::Error) -> Self {
        TrackingError::NetworkError {
            message: err.to_string(),
        }
    }
}
