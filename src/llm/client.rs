use super::{gemini::GeminiClient, types::*};
use crate::{Error, Result, config::LlmConfig};
use async_openai::{Client, config::OpenAIConfig, types as openai_types};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// A hosted text-generation model.
///
/// One call per request: no retries, caching, or streaming.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, parts: Vec<Part>) -> Result<String>;
}

/// Builds the client named by `config.provider`.
pub fn create_model_client(config: LlmConfig) -> Result<Arc<dyn ModelClient>> {
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::new(config)?)),
        "openai" => Ok(Arc::new(OpenAiClient::new(config))),
        other => Err(Error::config(format!(
            "Unknown LLM provider: '{}'. Valid providers: gemini, openai",
            other
        ))),
    }
}

/// Client for OpenAI-compatible chat completion endpoints.
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
    has_api_key: bool,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Self {
        let has_api_key = !config.api_key.is_empty();
        let mut openai_config = OpenAIConfig::new().with_api_key(config.api_key);

        if !config.base_url.is_empty() {
            openai_config = openai_config.with_api_base(config.base_url);
        }

        let client = Client::with_config(openai_config);

        Self {
            client,
            model: config.model,
            has_api_key,
        }
    }

    fn user_message(parts: Vec<Part>) -> Result<openai_types::ChatCompletionRequestMessage> {
        let content = match parts.as_slice() {
            [Part::Text(text)] => {
                openai_types::ChatCompletionRequestUserMessageContent::Text(text.clone())
            }
            _ => {
                let mut content_parts = Vec::with_capacity(parts.len());
                for part in &parts {
                    content_parts.push(Self::content_part(part)?);
                }
                openai_types::ChatCompletionRequestUserMessageContent::Array(content_parts)
            }
        };

        let msg = openai_types::ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?;
        Ok(msg.into())
    }

    fn content_part(
        part: &Part,
    ) -> Result<openai_types::ChatCompletionRequestUserMessageContentPart> {
        match part {
            Part::Text(text) => Ok(
                openai_types::ChatCompletionRequestMessageContentPartTextArgs::default()
                    .text(text.clone())
                    .build()?
                    .into(),
            ),
            Part::Image { .. } => {
                let url = part
                    .data_url()
                    .ok_or_else(|| Error::internal("image part without data"))?;
                let image_url = openai_types::ImageUrlArgs::default().url(url).build()?;
                Ok(
                    openai_types::ChatCompletionRequestMessageContentPartImageArgs::default()
                        .image_url(image_url)
                        .build()?
                        .into(),
                )
            }
        }
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn generate(&self, parts: Vec<Part>) -> Result<String> {
        if !self.has_api_key {
            return Err(Error::llm("API key is not configured"));
        }

        debug!(
            model = %self.model,
            parts = parts.len(),
            "Creating chat completion"
        );

        let request = openai_types::CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![Self::user_message(parts)?])
            .build()?;

        let response = self.client.chat().create(request).await?;

        debug!(
            "Received chat completion response with {} choices",
            response.choices.len()
        );

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::llm("Chat completion returned no content"))
    }
}
