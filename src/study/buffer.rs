//! Accumulating buffer for streamed generations

use futures_util::StreamExt;

use super::navigation::RequestId;
use super::sanitize::sanitize;
use crate::gemini::{GeminiError, TextStream};

/// Shown in place of notes when generation fails before any text arrives
pub const NOTES_ERROR: &str =
    "Error generating notes. Please check your connection and try again.";

/// Lifecycle of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferPhase {
    /// Chunks are still arriving
    Streaming,
    /// The stream ended normally
    Complete,
    /// The stream failed; any partial text is kept as final
    Failed,
}

/// One step of a consumed stream
#[derive(Debug)]
pub enum StreamUpdate {
    Chunk(String),
    Finished,
    Failed(GeminiError),
}

/// Text accumulated from one generation request
///
/// `loading` is cleared by the first non-empty chunk, not by completion.
/// Once the buffer leaves [`BufferPhase::Streaming`] it is frozen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationBuffer {
    request: RequestId,
    text: String,
    loading: bool,
    phase: BufferPhase,
}

impl GenerationBuffer {
    pub fn new(request: RequestId) -> Self {
        Self { request, text: String::new(), loading: true, phase: BufferPhase::Streaming }
    }

    pub fn request(&self) -> RequestId {
        self.request
    }

    /// Raw accumulated text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Accumulated text with stray diagram fences removed
    pub fn display_text(&self) -> String {
        sanitize(&self.text)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_streaming(&self) -> bool {
        self.phase == BufferPhase::Streaming
    }

    pub fn phase(&self) -> BufferPhase {
        self.phase
    }

    /// Append a chunk; returns false if the buffer is frozen or the chunk empty
    pub fn push_chunk(&mut self, chunk: &str) -> bool {
        if !self.is_streaming() || chunk.is_empty() {
            return false;
        }
        self.text.push_str(chunk);
        self.loading = false;
        true
    }

    /// The stream ended normally
    pub fn finish(&mut self) {
        if !self.is_streaming() {
            return;
        }
        if self.text.is_empty() {
            // Nothing ever arrived: same outcome as a failure before the first chunk
            tracing::warn!("Note stream for {:?} finished without text", self.request);
            self.text = NOTES_ERROR.to_string();
            self.phase = BufferPhase::Failed;
        } else {
            self.phase = BufferPhase::Complete;
        }
        self.loading = false;
    }

    /// The stream failed; partial text survives, otherwise the error text replaces it
    pub fn fail(&mut self, error: &GeminiError) {
        if !self.is_streaming() {
            return;
        }
        tracing::warn!(
            "Note stream for {:?} failed after {} bytes: {}",
            self.request,
            self.text.len(),
            error
        );
        if self.text.is_empty() {
            self.text = NOTES_ERROR.to_string();
        }
        self.phase = BufferPhase::Failed;
        self.loading = false;
    }

    /// Apply one stream update; returns true if the buffer changed
    pub fn apply(&mut self, update: &StreamUpdate) -> bool {
        if !self.is_streaming() {
            return false;
        }
        match update {
            StreamUpdate::Chunk(chunk) => self.push_chunk(chunk),
            StreamUpdate::Finished => {
                self.finish();
                true
            }
            StreamUpdate::Failed(e) => {
                self.fail(e);
                true
            }
        }
    }
}

/// Consume a text stream, handing each step to `emit`
///
/// Emits every chunk in arrival order, then exactly one `Finished` or `Failed`.
/// Stops early, without a terminal update, if `emit` returns false.
pub async fn drive_stream<F>(mut stream: TextStream, mut emit: F)
where
    F: FnMut(StreamUpdate) -> bool,
{
    let mut chunks = 0usize;
    while let Some(item) = stream.next().await {
        match item {
            Ok(text) => {
                chunks += 1;
                if !emit(StreamUpdate::Chunk(text)) {
                    return;
                }
            }
            Err(e) => {
                emit(StreamUpdate::Failed(e));
                return;
            }
        }
    }
    tracing::debug!("Stream complete after {} chunks", chunks);
    emit(StreamUpdate::Finished);
}

#[cfg(test)]
mod tests {
    use futures_util::stream;
    use pretty_assertions::assert_eq;

    use super::*;

    fn buffer() -> GenerationBuffer {
        GenerationBuffer::new(RequestId::new(1))
    }

    #[test]
    fn loading_clears_on_first_chunk() {
        let mut buf = buffer();
        assert!(buf.is_loading());

        assert!(buf.push_chunk("Hello "));
        assert_eq!(buf.text(), "Hello ");
        assert!(!buf.is_loading());
        assert!(buf.is_streaming());

        assert!(buf.push_chunk("world"));
        assert_eq!(buf.text(), "Hello world");
    }

    #[test]
    fn empty_chunk_keeps_loading() {
        let mut buf = buffer();
        assert!(!buf.push_chunk(""));
        assert!(buf.is_loading());
    }

    #[test]
    fn failure_before_data_shows_error_text() {
        let mut buf = buffer();
        buf.fail(&GeminiError::EmptyResponse);
        assert_eq!(buf.text(), NOTES_ERROR);
        assert_eq!(buf.phase(), BufferPhase::Failed);
        assert!(!buf.is_loading());
    }

    #[test]
    fn failure_after_data_keeps_partial() {
        let mut buf = buffer();
        buf.push_chunk("Partial notes");
        buf.fail(&GeminiError::Cancelled);
        assert_eq!(buf.text(), "Partial notes");
        assert_eq!(buf.phase(), BufferPhase::Failed);
    }

    #[test]
    fn frozen_buffer_ignores_chunks() {
        let mut buf = buffer();
        buf.push_chunk("Done");
        buf.finish();
        assert_eq!(buf.phase(), BufferPhase::Complete);
        assert!(!buf.push_chunk(" late"));
        assert!(!buf.apply(&StreamUpdate::Failed(GeminiError::EmptyResponse)));
        assert_eq!(buf.text(), "Done");
    }

    #[test]
    fn finishing_empty_is_a_failure() {
        let mut buf = buffer();
        buf.finish();
        assert_eq!(buf.text(), NOTES_ERROR);
        assert_eq!(buf.phase(), BufferPhase::Failed);
    }

    #[test]
    fn display_text_is_sanitized() {
        let mut buf = buffer();
        buf.push_chunk("```html\n<svg></svg>\n```");
        assert_eq!(buf.display_text(), "<svg></svg>");
        assert_eq!(buf.text(), "```html\n<svg></svg>\n```");
    }

    #[tokio::test]
    async fn drive_stream_republishes_after_every_chunk() {
        let chunks: TextStream =
            stream::iter(vec![Ok("Hello ".to_string()), Ok("world".to_string())]).boxed();
        let mut buf = buffer();
        let mut seen = Vec::new();

        drive_stream(chunks, |update| {
            buf.apply(&update);
            seen.push((buf.text().to_string(), buf.is_loading()));
            true
        })
        .await;

        assert_eq!(
            seen,
            vec![
                ("Hello ".to_string(), false),
                ("Hello world".to_string(), false),
                ("Hello world".to_string(), false),
            ]
        );
        assert_eq!(buf.phase(), BufferPhase::Complete);
    }

    #[tokio::test]
    async fn drive_stream_reports_failure_once() {
        let chunks: TextStream = stream::iter(vec![
            Ok("Part".to_string()),
            Err(GeminiError::StreamParseError("bad".into())),
        ])
        .boxed();
        let mut updates = Vec::new();
        drive_stream(chunks, |update| {
            updates.push(update);
            true
        })
        .await;

        assert_eq!(updates.len(), 2);
        assert!(matches!(&updates[0], StreamUpdate::Chunk(c) if c == "Part"));
        assert!(matches!(updates[1], StreamUpdate::Failed(_)));
    }

    #[tokio::test]
    async fn drive_stream_stops_when_emit_declines() {
        let chunks: TextStream =
            stream::iter(vec![Ok("a".to_string()), Ok("b".to_string())]).boxed();
        let mut count = 0;
        drive_stream(chunks, |_| {
            count += 1;
            false
        })
        .await;
        assert_eq!(count, 1);
    }
}
