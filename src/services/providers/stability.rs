// src/services/providers/stability.rs
use super::{ImageProvider, bearer, send_json};
use crate::config::DEFAULT_STABILITY_BASE_URL;
use crate::errors::AdError;
use crate::models::{ImageReference, Provider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const TEXT_TO_IMAGE_PATH: &str = "/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image";

#[derive(Debug, Serialize)]
struct TextToImageRequest<'a> {
    text_prompts: [TextPrompt<'a>; 1],
    cfg_scale: u32,
    height: u32,
    width: u32,
    samples: u32,
    steps: u32,
}

#[derive(Debug, Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
    weight: u32,
}

#[derive(Debug, Deserialize)]
struct TextToImageResponse {
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    base64: Option<String>,
}

pub struct StabilityImageClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl StabilityImageClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_STABILITY_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ImageProvider for StabilityImageClient {
    fn provider(&self) -> Provider {
        Provider::Stability
    }

    async fn generate(&self, prompt: &str) -> Result<ImageReference, AdError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AdError::MissingCredential {
                provider: Provider::Stability,
            })?;

        debug!("Sending text-to-image request to Stability AI");

        let request = TextToImageRequest {
            text_prompts: [TextPrompt {
                text: prompt,
                weight: 1,
            }],
            cfg_scale: 7,
            height: 1024,
            width: 1024,
            samples: 1,
            steps: 30,
        };

        let url = format!("{}{}", self.base_url, TEXT_TO_IMAGE_PATH);
        let response: TextToImageResponse = send_json(
            Provider::Stability,
            bearer(&self.client, &url, api_key)
                .header("Accept", "application/json")
                .json(&request),
            |body| body["message"].as_str(),
        )
        .await?;

        response
            .artifacts
            .into_iter()
            .next()
            .and_then(|artifact| artifact.base64)
            .filter(|payload| !payload.is_empty())
            .map(|payload| ImageReference::png_base64(&payload))
            .ok_or_else(|| AdError::upstream(Provider::Stability, "No image artifact in response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StabilityImageClient {
        StabilityImageClient::new(Client::new(), Some("sk-stab".to_string()))
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_generate_wraps_artifact_as_data_uri() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TEXT_TO_IMAGE_PATH))
            .and(header("Authorization", "Bearer sk-stab"))
            .and(header("Accept", "application/json"))
            .and(body_json(serde_json::json!({
                "text_prompts": [{ "text": "a lamp", "weight": 1 }],
                "cfg_scale": 7,
                "height": 1024,
                "width": 1024,
                "samples": 1,
                "steps": 30
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artifacts": [{ "base64": "AAAA", "seed": 1, "finishReason": "SUCCESS" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reference = client_for(&server).generate("a lamp").await.unwrap();
        assert_eq!(
            reference,
            ImageReference::DataUri("data:image/png;base64,AAAA".to_string())
        );
    }

    #[tokio::test]
    async fn test_error_uses_top_level_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TEXT_TO_IMAGE_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "id": "9160aa70222f5cb8ea9e6a2b2bfe1c9c",
                "name": "unauthorized",
                "message": "missing authorization header"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).generate("a lamp").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Stability AI API error: missing authorization header"
        );
    }

    #[tokio::test]
    async fn test_openai_shaped_error_body_falls_back() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TEXT_TO_IMAGE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": { "message": "not where stability puts it" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).generate("a lamp").await.unwrap_err();
        assert!(matches!(
            err,
            AdError::Upstream { ref message, .. } if message == "Unknown error"
        ));
    }

    #[tokio::test]
    async fn test_repeated_calls_are_shape_checked() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TEXT_TO_IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artifacts": [{ "base64": "iVBORw0KGgo=" }]
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);
        for _ in 0..2 {
            let reference = client.generate("a lamp").await.unwrap();
            assert!(reference.is_well_formed());
        }
    }
}
