use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::LlmConfig;
use crate::error::ToolError;
use crate::services::LlmService;

/// The general-purpose fallback: an OpenAI-compatible chat endpoint
/// (Groq unless `api_base` says otherwise).
pub struct Brain {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Brain {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .context("GROQ_API_KEY must be set in .env")?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to build LLM HTTP client")?;

        let openai = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.api_base);
        // Rate limits surface on the first 429 instead of being retried
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        let client = Client::with_config(openai)
            .with_http_client(http)
            .with_backoff(no_retry);

        info!("Brain connected. Model: {} @ {}", config.model, config.api_base);
        Ok(Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Start-up connectivity check
    pub async fn say_hello(&self) -> Result<String> {
        let reply = self.ask("Hello! Reply with 'System Online'.").await?;
        Ok(reply)
    }

    async fn ask(&self, prompt: &str) -> Result<String, OpenAIError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?,
            )])
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await?;
        debug!(choices = response.choices.len(), "LLM response received");

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default())
    }
}

#[async_trait]
impl LlmService for Brain {
    async fn complete(&self, prompt: &str) -> Result<String, ToolError> {
        let text = self.ask(prompt).await.map_err(classify)?;
        if text.is_empty() {
            return Err(ToolError::unclassified("The LLM returned an empty answer."));
        }
        Ok(text)
    }
}

/// Transport and API-level errors are service outages; anything else is
/// unexpected.
fn classify(error: OpenAIError) -> ToolError {
    match error {
        OpenAIError::Reqwest(e) => ToolError::service_unavailable(format!("LLM request failed: {e}")),
        OpenAIError::ApiError(e) => ToolError::service_unavailable(format!("LLM API error: {}", e.message)),
        other => ToolError::unclassified(format!("LLM client error: {other}")),
    }
}
