//! The seam between study logic and the generation service

use std::future::Future;

use super::error::GeminiError;
use super::models::{GenerateContentRequest, GenerateContentResponse};
use super::streaming::TextStream;

/// A service that can generate content
///
/// Two capabilities: a single-shot call returning the whole response, and a
/// streaming call yielding text chunks as they are produced. Multi-turn chat is
/// built on top of the streaming call by resending the history.
pub trait GenerationBackend: Send + Sync + 'static {
    /// Generate a complete response
    fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> impl Future<Output = Result<GenerateContentResponse, GeminiError>> + Send;

    /// Start a streamed response
    ///
    /// Resolves once the service has accepted the request; the chunks follow
    /// on the returned stream.
    fn stream(
        &self,
        request: GenerateContentRequest,
    ) -> impl Future<Output = Result<TextStream, GeminiError>> + Send;
}
