// src/services/generation_service.rs
use crate::config::Config;
use crate::errors::AdError;
use crate::models::{ImageReference, Provider};
use crate::services::prompt_composer;
use crate::services::providers::{ImageProvider, OpenAiImageClient, StabilityImageClient};
use log::{info, warn};
use reqwest::Client;
use std::time::Instant;

/// Routes a prompt to the provider chosen by the caller.
pub struct GenerationService {
    openai: Box<dyn ImageProvider>,
    stability: Box<dyn ImageProvider>,
}

impl GenerationService {
    pub fn new(openai: Box<dyn ImageProvider>, stability: Box<dyn ImageProvider>) -> Self {
        Self { openai, stability }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        if config.openai_api_key.is_none() {
            warn!("OPENAI_API_KEY is not set; openai generations will fail");
        }
        if config.stability_api_key.is_none() {
            warn!("STABILITY_API_KEY is not set; stability generations will fail");
        }

        Self::new(
            Box::new(
                OpenAiImageClient::new(client.clone(), config.openai_api_key.clone())
                    .with_base_url(config.openai_base_url.clone()),
            ),
            Box::new(
                StabilityImageClient::new(client, config.stability_api_key.clone())
                    .with_base_url(config.stability_base_url.clone()),
            ),
        )
    }

    fn client(&self, provider: Provider) -> &dyn ImageProvider {
        match provider {
            Provider::OpenAi => self.openai.as_ref(),
            Provider::Stability => self.stability.as_ref(),
        }
    }

    /// Sends an already enhanced prompt upstream.
    pub async fn generate(
        &self,
        prompt: &str,
        provider: Provider,
    ) -> Result<ImageReference, AdError> {
        if prompt.trim().is_empty() {
            return Err(AdError::Validation("Prompt is required".to_string()));
        }

        let client = self.client(provider);
        let start = Instant::now();
        let reference = client.generate(prompt).await?;
        if !reference.is_well_formed() {
            return Err(AdError::upstream(provider, "Malformed image reference"));
        }
        info!(
            "Generated image with {} in {}ms",
            client.provider().display_name(),
            start.elapsed().as_millis()
        );
        Ok(reference)
    }

    /// Composes the provider-specific prompt from a product description, then generates.
    pub async fn generate_ad(
        &self,
        description: &str,
        style: &str,
        mood: &str,
        provider: Provider,
    ) -> Result<ImageReference, AdError> {
        if description.trim().is_empty() {
            return Err(AdError::Validation(
                "Please enter a description for your ad".to_string(),
            ));
        }

        let prompt = prompt_composer::compose_for(provider, description, style, mood);
        self.generate(&prompt, provider).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockImageProvider;

    fn service_with_mocks() -> (
        GenerationService,
        std::sync::Arc<std::sync::Mutex<Vec<String>>>,
        std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    ) {
        let openai = MockImageProvider::new(Provider::OpenAi);
        let stability = MockImageProvider::new(Provider::Stability);
        let (openai_calls, stability_calls) = (openai.prompts(), stability.prompts());
        (
            GenerationService::new(Box::new(openai), Box::new(stability)),
            openai_calls,
            stability_calls,
        )
    }

    #[tokio::test]
    async fn test_routes_by_provider() {
        let (service, openai_calls, stability_calls) = service_with_mocks();

        let url = service.generate("a mug", Provider::OpenAi).await.unwrap();
        assert!(matches!(url, ImageReference::Url(_)));

        let data = service.generate("a mug", Provider::Stability).await.unwrap();
        assert!(matches!(data, ImageReference::DataUri(_)));

        assert_eq!(openai_calls.lock().unwrap().len(), 1);
        assert_eq!(stability_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_prompt_never_reaches_provider() {
        let (service, openai_calls, stability_calls) = service_with_mocks();

        for prompt in ["", "   ", "\n\t"] {
            let err = service.generate(prompt, Provider::OpenAi).await.unwrap_err();
            assert!(matches!(err, AdError::Validation(_)));
        }

        assert!(openai_calls.lock().unwrap().is_empty());
        assert!(stability_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_ad_composes_provider_prompt() {
        let (service, openai_calls, stability_calls) = service_with_mocks();

        service
            .generate_ad("a ceramic mug", "vintage", "cozy", Provider::OpenAi)
            .await
            .unwrap();
        service
            .generate_ad("a ceramic mug", "vintage", "cozy", Provider::Stability)
            .await
            .unwrap();

        assert_eq!(
            openai_calls.lock().unwrap()[0],
            prompt_composer::compose("a ceramic mug", "vintage", "cozy")
        );
        assert!(!stability_calls.lock().unwrap()[0].contains("4K"));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let service = GenerationService::new(
            Box::new(MockImageProvider::new(Provider::OpenAi).failing("quota exceeded")),
            Box::new(MockImageProvider::new(Provider::Stability)),
        );

        let err = service.generate("a mug", Provider::OpenAi).await.unwrap_err();
        assert_eq!(err.to_string(), "OpenAI API error: quota exceeded");
    }
}
