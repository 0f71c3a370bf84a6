//! Port for the external streaming text-generation model.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::define_port_error;

define_port_error! {
    /// Errors raised by text-generation adapters.
    pub enum TextGenerationError {
        /// No generation backend is configured or reachable.
        Unavailable { message: String } => "text generation unavailable: {message}",
        /// The request could not be sent or the stream broke mid-flight.
        Transport { message: String } => "text generation transport failed: {message}",
        /// The backend answered with a non-success status.
        Status { status: u16, message: String } =>
            "text generation returned status {status}: {message}",
        /// A streamed event could not be decoded.
        Decode { message: String } => "text generation event malformed: {message}",
    }
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptRole {
    User,
    Model,
}

/// One turn of the conversation sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTurn {
    pub role: PromptRole,
    pub text: String,
}

impl PromptTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Model,
            text: text.into(),
        }
    }
}

/// Structured context for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPrompt {
    /// System instruction framing the task.
    pub system: String,
    /// Conversation turns in chronological order; the last is the request.
    pub turns: Vec<PromptTurn>,
}

/// Incremental text chunks; the concatenation is the final text.
pub type TextChunkStream = BoxStream<'static, Result<String, TextGenerationError>>;

/// Streaming text generation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Start generating; the returned stream ends when the model finishes.
    async fn stream(&self, prompt: GenerationPrompt)
    -> Result<TextChunkStream, TextGenerationError>;
}

/// Fixture generator used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTextGenerator;

#[async_trait]
impl TextGenerator for FixtureTextGenerator {
    async fn stream(
        &self,
        _prompt: GenerationPrompt,
    ) -> Result<TextChunkStream, TextGenerationError> {
        Err(TextGenerationError::unavailable(
            "no generation API key configured",
        ))
    }
}
