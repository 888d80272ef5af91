//! Gemini API client implementation

use crate::{
    error::GeminiError,
    generate::{GenerateContentRequest, GenerateContentResponse},
};
use reqwest::{Client, StatusCode};

/// Default API base URL
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new client with API key from environment
    ///
    /// # Errors
    ///
    /// Returns `GeminiError::MissingApiKey` if `GEMINI_API_KEY` is not set
    pub fn from_env() -> Result<Self, GeminiError> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| GeminiError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Create a new client with explicit API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Builder: Point the client at another base URL
    #[must_use]
    pub fn with_base_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: Set model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Model requests are sent to
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate content (non-streaming)
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        tracing::debug!(model = %self.model, "Calling generateContent");

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.api_url, self.model))
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<GenerateContentResponse>()
                .await
                .map_err(|e| GeminiError::ResponseParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(GeminiError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GeminiError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), "generateContent failed");
                Err(GeminiError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            },
        }
    }
}
