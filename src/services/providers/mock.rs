// src/services/providers/mock.rs
use super::ImageProvider;
use crate::errors::AdError;
use crate::models::{ImageReference, Provider};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted provider that records every prompt it receives.
pub struct MockImageProvider {
    provider: Provider,
    failure: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageProvider {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            failure: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Shared handle on the recorded prompts, usable after the mock is moved.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl ImageProvider for MockImageProvider {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn generate(&self, prompt: &str) -> Result<ImageReference, AdError> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };

        if let Some(message) = &self.failure {
            return Err(AdError::upstream(self.provider, message.clone()));
        }

        Ok(match self.provider {
            Provider::OpenAi => ImageReference::Url(format!("https://images.test/{call}.png")),
            Provider::Stability => ImageReference::png_base64("iVBORw0KGgo="),
        })
    }
}
