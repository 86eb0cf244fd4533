// src/services/providers/mod.rs
pub mod openai;
pub mod stability;

#[cfg(test)]
pub mod mock;

pub use openai::OpenAiImageClient;
pub use stability::StabilityImageClient;

use crate::errors::AdError;
use crate::models::{ImageReference, Provider};
use async_trait::async_trait;
use log::error;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

pub const UNKNOWN_ERROR: &str = "Unknown error";

/// One text-to-image backend. Each call is a single request with no retry.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn provider(&self) -> Provider;
    async fn generate(&self, prompt: &str) -> Result<ImageReference, AdError>;
}

/// Sends a prepared request and decodes a 2xx body as `T`.
///
/// Non-2xx bodies are handed to `error_message` to pull the provider's own
/// message out; anything unreadable falls back to [`UNKNOWN_ERROR`].
pub(crate) async fn send_json<T, F>(
    provider: Provider,
    request: RequestBuilder,
    error_message: F,
) -> Result<T, AdError>
where
    T: DeserializeOwned,
    F: Fn(&serde_json::Value) -> Option<&str>,
{
    let response = request.send().await.map_err(|e| {
        error!("{} request failed: {}", provider.display_name(), e);
        AdError::transport(provider, e)
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AdError::transport(provider, e))?;

    if !status.is_success() {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .as_ref()
            .and_then(|value| error_message(value).map(str::to_string))
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        error!(
            "{} API error (status {}): {}",
            provider.display_name(),
            status,
            message
        );
        return Err(AdError::upstream(provider, message));
    }

    serde_json::from_str(&body).map_err(|e| {
        error!("Failed to parse {} response: {}", provider.display_name(), e);
        AdError::upstream(provider, format!("Malformed response: {}", e))
    })
}

pub(crate) fn bearer(client: &Client, url: &str, api_key: &str) -> RequestBuilder {
    client
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
}
