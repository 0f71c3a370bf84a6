//! Streaming text generation against the Gemini `streamGenerateContent` API.
//!
//! Requests ask for server-sent events (`alt=sse`); each event carries a
//! `GenerateContentResponse` whose candidate parts are forwarded as chunks.

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::domain::ports::{GenerationPrompt, TextChunkStream, TextGenerationError, TextGenerator};

use self::wire::{GenerateContentRequest, decode_event};

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Longest error body quoted back from a failed request.
const ERROR_BODY_LIMIT: usize = 512;

/// Connection settings for [`GeminiTextGenerator`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// [`TextGenerator`] backed by Gemini.
#[derive(Clone)]
pub struct GeminiTextGenerator {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiTextGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, TextGenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| TextGenerationError::unavailable(err.to_string()))?;
        Ok(Self { client, config })
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > ERROR_BODY_LIMIT {
        let mut end = ERROR_BODY_LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    body
}

#[async_trait]
impl TextGenerator for GeminiTextGenerator {
    async fn stream(
        &self,
        prompt: GenerationPrompt,
    ) -> Result<TextChunkStream, TextGenerationError> {
        let body = GenerateContentRequest::from_prompt(&prompt);
        debug!(model = %self.config.model, turns = prompt.turns.len(), "starting generation");

        let response = self
            .client
            .post(self.config.stream_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| TextGenerationError::transport(err.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "generation request rejected");
            return Err(TextGenerationError::status(status.as_u16(), truncate(message)));
        }

        let chunks = response
            .bytes_stream()
            .eventsource()
            .filter_map(|event| async move {
                match event {
                    Ok(event) => decode_event(&event.data).transpose(),
                    Err(err) => Some(Err(TextGenerationError::transport(err.to_string()))),
                }
            })
            .boxed();
        Ok(chunks)
    }
}
