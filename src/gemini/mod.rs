//! Gemini API integration module
//!
//! Provides API key resolution, the HTTP client, SSE streaming support and the
//! [`GenerationBackend`] trait the study logic is written against.

pub mod auth;
pub mod backend;
pub mod client;
pub mod error;
pub mod models;
pub mod streaming;

// Re-export commonly used types
pub use auth::{ApiKeyManager, KeySource};
pub use backend::GenerationBackend;
pub use client::GeminiClient;
pub use error::GeminiError;
pub use models::{Content, GeminiModel, GenerateContentRequest, GenerateContentResponse, Role};
pub use streaming::TextStream;
