//! HTTP client for the Gemini API

use std::time::Duration;

use reqwest::{Client, Response};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::backend::GenerationBackend;
use super::error::GeminiError;
use super::models::{GeminiModel, GenerateContentRequest, GenerateContentResponse};
use super::streaming::{self, TextStream};

/// Gemini API client
pub struct GeminiClient {
    /// HTTP client
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Parent token of every in-flight stream
    shutdown: CancellationToken,
}

impl GeminiClient {
    /// Model endpoints base URL
    const API_BASE: &'static str = "https://generativelanguage.googleapis.com/v1beta/models";
    /// Buffered events between the reader task and the consumer
    const STREAM_CHANNEL_CAPACITY: usize = 64;
    /// Connection establishment timeout
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Create a new client with the given API key and overall request timeout
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, GeminiError> {
        let client =
            Client::builder().connect_timeout(Self::CONNECT_TIMEOUT).timeout(timeout).build()?;

        Ok(Self { client, api_key, shutdown: CancellationToken::new() })
    }

    /// URL of a model method, e.g. `generateContent`
    fn endpoint(model: GeminiModel, method: &str) -> String {
        format!("{}/{}:{}", Self::API_BASE, model.model_id(), method)
    }

    /// Post a request and map HTTP failures to errors
    async fn post(&self, url: &str, request: &GenerateContentRequest) -> Result<Response, GeminiError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(GeminiError::RateLimited { retry_after_seconds: retry_after });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                message: "Invalid API key".to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::ApiError {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(response)
    }

    /// Send a single-shot request and return the complete response
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = Self::endpoint(request.model, "generateContent");
        tracing::debug!("generateContent on {}", request.model.model_id());

        let response = self.post(&url, &request).await?;
        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(reason) = parsed.block_reason() {
            return Err(GeminiError::Blocked { reason });
        }
        Ok(parsed)
    }

    /// Send a streaming request
    ///
    /// Spawns a background task that reads the SSE body and feeds the returned
    /// stream. The task stops early only when the consumer drops the stream or
    /// [`GeminiClient::shutdown`] is called.
    pub async fn stream_generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<TextStream, GeminiError> {
        let url =
            format!("{}?alt=sse", Self::endpoint(request.model, "streamGenerateContent"));
        tracing::debug!("streamGenerateContent on {}", request.model.model_id());

        let response = self.post(&url, &request).await?;

        let (tx, rx) = mpsc::channel(Self::STREAM_CHANNEL_CAPACITY);
        let cancel_token = self.shutdown.child_token();
        tokio::spawn(async move {
            let result =
                streaming::process_stream(response.bytes_stream(), tx.clone(), cancel_token).await;
            if let Err(e) = result {
                tracing::debug!("Stream ended with error: {}", e);
                let _ = tx.send(Err(e)).await;
            }
        });

        Ok(streaming::text_stream(rx))
    }

    /// Test the API key by sending a minimal request
    pub async fn test_connection(&self, model: GeminiModel) -> Result<(), GeminiError> {
        let request = GenerateContentRequest::prompt(model, "Hi")
            .without_thinking()
            .with_max_output_tokens(8);

        self.generate_content(request).await?;
        Ok(())
    }

    /// Cancel every in-flight stream; called once at process exit
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl GenerationBackend for GeminiClient {
    async fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        self.generate_content(request).await
    }

    async fn stream(&self, request: GenerateContentRequest) -> Result<TextStream, GeminiError> {
        self.stream_generate_content(request).await
    }
}

/// Extract `error.message` from an error body, falling back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
