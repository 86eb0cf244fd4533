// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::models::Provider;

#[derive(Error, Debug)]
pub enum AdError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid provider: {0}")]
    InvalidProvider(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("{0}")]
    NotFound(String),

    /// The provider answered, but not with a usable image.
    #[error("{} API error: {message}", .provider.display_name())]
    Upstream { provider: Provider, message: String },

    /// The provider could not be reached or its body could not be read.
    #[error("{} request failed: {message}", .provider.display_name())]
    Transport { provider: Provider, message: String },

    #[error("{} API key not configured", .provider.display_name())]
    MissingCredential { provider: Provider },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AdError {
    pub fn upstream(provider: Provider, message: impl Into<String>) -> Self {
        AdError::Upstream {
            provider,
            message: message.into(),
        }
    }

    pub fn transport(provider: Provider, err: reqwest::Error) -> Self {
        // reqwest's Display carries the URL but never request headers.
        AdError::Transport {
            provider,
            message: err.to_string(),
        }
    }
}

impl ResponseError for AdError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdError::Validation(_) | AdError::InvalidProvider(_) | AdError::ImageProcessing(_) => {
                StatusCode::BAD_REQUEST
            }
            AdError::NotFound(_) => StatusCode::NOT_FOUND,
            AdError::Upstream { .. }
            | AdError::Transport { .. }
            | AdError::MissingCredential { .. }
            | AdError::Storage(_)
            | AdError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

impl From<redis::RedisError> for AdError {
    fn from(err: redis::RedisError) -> Self {
        AdError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AdError {
    fn from(err: serde_json::Error) -> Self {
        AdError::Serialization(err.to_string())
    }
}
