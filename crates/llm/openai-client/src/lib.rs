//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for non-streaming chat completion against OpenAI or any
//! OpenAI-compatible endpoint. Provides token masking for safe logging.

use async_openai::{types::CreateChatCompletionRequestArgs, Client};
use std::sync::Arc;

pub use async_openai::types::{ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs};

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[len - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Sampling knobs forwarded to the completion request.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
}

/// OpenAI chat client. Wraps async-openai client and keeps the masked key for logging.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<async_openai::config::OpenAIConfig>>,
    masked_key: String,
}

impl OpenAIClient {
    /// Builds a client with a custom base URL (proxies, Gemini's OpenAI-compatible endpoint, local servers).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let masked_key = mask_token(&api_key);
        let config = async_openai::config::OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            masked_key,
        }
    }

    /// The API key as it appears in logs.
    pub fn masked_key(&self) -> &str {
        &self.masked_key
    }

    /// Sends a chat completion request and returns the first choice's content.
    ///
    /// Errors if the request cannot be built, the transport fails, or the response has no choices.
    pub async fn chat_completion(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
        options: CompletionOptions,
    ) -> anyhow::Result<String> {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            api_key = %self.masked_key,
            "OpenAI chat_completion request"
        );

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(model).messages(messages);
        if let Some(temperature) = options.temperature {
            args.temperature(temperature);
        }
        let request = args.build()?;

        // Request bodies contain customer text: debug level only.
        if let Ok(json) = serde_json::to_string(&request) {
            tracing::debug!(request_json = %json, "OpenAI chat_completion request JSON");
        }

        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "OpenAI chat_completion usage"
            );
        }

        match response.choices.first() {
            Some(choice) => Ok(choice.message.content.clone().unwrap_or_default()),
            None => anyhow::bail!("No response from OpenAI"),
        }
    }

    /// Single user-turn completion.
    pub async fn complete_prompt(
        &self,
        model: &str,
        prompt: &str,
        options: CompletionOptions,
    ) -> anyhow::Result<String> {
        let message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?
            .into();
        self.chat_completion(model, vec![message], options).await
    }
}
