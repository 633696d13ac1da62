//! Completion backends: the network seam of the classifier.

use anyhow::Result;
use async_trait::async_trait;
use openai_client::{CompletionOptions, OpenAIClient};
use tracing::instrument;

use crate::config::ClassifierConfig;

/// Something that turns a prompt into model text. Implementations may be slow or fail.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier recorded alongside classifications.
    fn model(&self) -> &str;
}

/// [`CompletionBackend`] over an OpenAI-compatible chat endpoint.
#[derive(Clone)]
pub struct OpenAIBackend {
    client: OpenAIClient,
    model: String,
}

impl OpenAIBackend {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Returns None when no API key is configured.
    pub fn from_config(config: &ClassifierConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let client = OpenAIClient::with_base_url(api_key, config.base_url.clone());
        Some(Self::new(client, config.model.clone()))
    }
}

#[async_trait]
impl CompletionBackend for OpenAIBackend {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.client
            .complete_prompt(
                &self.model,
                prompt,
                CompletionOptions {
                    temperature: Some(0.0),
                },
            )
            .await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
