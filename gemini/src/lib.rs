//! # Gemini API Client
//!
//! Rust client for the Gemini `generateContent` endpoint, with support for
//! plain text prompts and JSON-schema constrained responses.
//!
//! ## Example
//!
//! ```no_run
//! use venueflow_gemini::{GeminiClient, GenerateContentRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create client from GEMINI_API_KEY environment variable
//!     let client = GeminiClient::from_env()?;
//!
//!     let request = GenerateContentRequest::from_prompt("Describe the Grand Auditorium");
//!     let response = client.generate_content(request).await?;
//!
//!     println!("{}", response.text()?);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod generate;
pub mod types;

// Re-export main types for convenience
pub use client::{DEFAULT_API_URL, DEFAULT_MODEL, GeminiClient};
pub use error::GeminiError;
pub use generate::{Candidate, FinishReason, GenerateContentRequest, GenerateContentResponse};
pub use types::{Content, GenerationConfig, Part, Role, UsageMetadata};
