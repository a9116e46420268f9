//! Scripted generation backend for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use futures_util::StreamExt;
use futures_util::stream;

use crate::gemini::models::Candidate;
use crate::gemini::{
    Content, GeminiError, GenerateContentRequest, GenerateContentResponse, GenerationBackend,
    TextStream,
};

/// What one `stream` call produces
enum StreamScript {
    /// The call itself fails
    Rejected(GeminiError),
    /// Chunks, then optionally an error instead of a clean end
    Chunks { chunks: Vec<String>, error: Option<GeminiError> },
}

/// Backend that replays queued answers and records every request
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<GenerateContentResponse, GeminiError>>>,
    streams: Mutex<VecDeque<StreamScript>>,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

pub(crate) fn response_with_text(text: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: vec![Candidate {
            content: Some(Content::model(text)),
            finish_reason: Some("STOP".to_string()),
        }],
        ..Default::default()
    }
}

impl ScriptedBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a single-shot answer
    pub(crate) fn with_response(self, text: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response_with_text(text)));
        self
    }

    /// Queue a single-shot failure
    pub(crate) fn with_error(self, error: GeminiError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queue a stream that yields `chunks` and ends cleanly
    pub(crate) fn with_stream<I, S>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunks = chunks.into_iter().map(Into::into).collect();
        self.streams.lock().unwrap().push_back(StreamScript::Chunks { chunks, error: None });
        self
    }

    /// Queue a stream that yields `chunks` and then fails
    pub(crate) fn with_failing_stream<I, S>(self, chunks: I, error: GeminiError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chunks = chunks.into_iter().map(Into::into).collect();
        self.streams
            .lock()
            .unwrap()
            .push_back(StreamScript::Chunks { chunks, error: Some(error) });
        self
    }

    /// Queue a stream call that is rejected outright
    pub(crate) fn with_rejected_stream(self, error: GeminiError) -> Self {
        self.streams.lock().unwrap().push_back(StreamScript::Rejected(error));
        self
    }

    /// Every request received so far
    pub(crate) fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        self.requests.lock().unwrap().push(request);
        self.responses.lock().unwrap().pop_front().unwrap_or(Err(GeminiError::EmptyResponse))
    }

    async fn stream(&self, request: GenerateContentRequest) -> Result<TextStream, GeminiError> {
        self.requests.lock().unwrap().push(request);
        let script = self.streams.lock().unwrap().pop_front();
        match script {
            None => Err(GeminiError::EmptyResponse),
            Some(StreamScript::Rejected(error)) => Err(error),
            Some(StreamScript::Chunks { chunks, error }) => {
                let items = chunks.into_iter().map(Ok).chain(error.map(Err));
                Ok(stream::iter(items.collect::<Vec<_>>()).boxed())
            }
        }
    }
}
