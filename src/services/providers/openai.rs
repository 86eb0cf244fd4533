// src/services/providers/openai.rs
use super::{ImageProvider, bearer, send_json};
use crate::config::DEFAULT_OPENAI_BASE_URL;
use crate::errors::AdError;
use crate::models::{ImageReference, Provider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const GENERATIONS_PATH: &str = "/v1/images/generations";
const MODEL: &str = "dall-e-3";

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    quality: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

pub struct OpenAiImageClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiImageClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ImageProvider for OpenAiImageClient {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn generate(&self, prompt: &str) -> Result<ImageReference, AdError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AdError::MissingCredential {
                provider: Provider::OpenAi,
            })?;

        debug!("Sending image generation request to OpenAI");

        let request = ImageGenerationRequest {
            model: MODEL,
            prompt,
            n: 1,
            size: "1024x1024",
            quality: "standard",
            response_format: "url",
        };

        let url = format!("{}{}", self.base_url, GENERATIONS_PATH);
        let response: ImageGenerationResponse = send_json(
            Provider::OpenAi,
            bearer(&self.client, &url, api_key).json(&request),
            |body| body["error"]["message"].as_str(),
        )
        .await?;

        response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty())
            .map(ImageReference::Url)
            .ok_or_else(|| AdError::upstream(Provider::OpenAi, "No image URL in response"))
    }
}
