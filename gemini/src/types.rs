//! Core types for the Gemini API

use serde::{Deserialize, Serialize};

/// A turn in the conversation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// Author of the turn; omitted for single-turn prompts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Parts making up the turn
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Single-part user turn
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some(Role::User),
            parts: vec![Part::text(text)],
        }
    }

    /// Single-part turn without a role, as used for one-shot prompts
    #[must_use]
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

/// Turn author
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User turn
    User,
    /// Model turn
    Model,
}

/// A piece of content
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Part {
    /// Text payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    /// Text part
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Generation options
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// MIME type of the response, e.g. `application/json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Schema the JSON response must follow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationConfig {
    /// Constrain the response to JSON matching `schema`
    #[must_use]
    pub fn json(schema: serde_json::Value) -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            temperature: None,
        }
    }
}

/// Token accounting returned with every response
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_token_count: u32,
    /// Tokens across all candidates
    #[serde(default)]
    pub candidates_token_count: u32,
    /// Prompt plus candidates
    #[serde(default)]
    pub total_token_count: u32,
}
