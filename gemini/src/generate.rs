//! `generateContent` request and response types

use crate::error::GeminiError;
use crate::types::{Content, GenerationConfig, UsageMetadata};
use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:generateContent`
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns
    pub contents: Vec<Content>,
    /// System instruction (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Generation options (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Create a request from conversation turns
    #[must_use]
    pub const fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Create a single-turn request from a prompt
    #[must_use]
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self::new(vec![Content::prompt(prompt)])
    }

    /// Builder: Set system instruction
    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::prompt(instruction));
        self
    }

    /// Builder: Set generation config
    #[must_use]
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

/// Response from `generateContent`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Token usage statistics
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::EmptyResponse`] if there is no candidate, no part,
    /// or the part carries no text.
    pub fn text(&self) -> Result<&str, GeminiError> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .and_then(|content| content.parts.first())
            .and_then(|part| part.text.as_deref())
            .ok_or(GeminiError::EmptyResponse)
    }
}

/// One generated answer
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content; absent when the candidate was blocked
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Why the model stopped generating
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Natural stop point
    Stop,
    /// Token limit reached
    MaxTokens,
    /// Blocked for safety
    Safety,
    /// Blocked for recitation
    Recitation,
    /// Anything else the API reports
    #[serde(other)]
    Other,
}
