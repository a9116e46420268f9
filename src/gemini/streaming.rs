//! Server-Sent Events (SSE) parser for Gemini streaming responses

use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::error::GeminiError;
use super::models::{GenerateContentResponse, StreamEvent};

/// Lazy, finite, non-restartable sequence of generated text chunks
///
/// Yields only non-empty text and ends after the first error.
pub type TextStream = BoxStream<'static, Result<String, GeminiError>>;

/// Channel item flowing from the reader task to the consumer
pub type EventResult = Result<StreamEvent, GeminiError>;

/// Process an SSE body from the Gemini API
///
/// Reads the body as a stream of byte chunks, splits it into lines and sends
/// parsed events through the provided channel. Respects the cancellation
/// token, which only fires at shutdown.
pub async fn process_stream<S, B>(
    mut body: S,
    tx: mpsc::Sender<EventResult>,
    cancel_token: CancellationToken,
) -> Result<(), GeminiError>
where
    S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    // Bytes, not a String: a chunk boundary may split a multi-byte character
    let mut buffer: Vec<u8> = Vec::new();

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                return Err(GeminiError::Cancelled);
            }

            chunk = body.next() => {
                match chunk {
                    Some(Ok(bytes)) => {
                        buffer.extend_from_slice(bytes.as_ref());

                        while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                            let line: Vec<u8> = buffer.drain(..=newline_pos).collect();
                            let line = String::from_utf8_lossy(&line);
                            for event in parse_line(line.trim_end()) {
                                // Receiver dropped: nobody is watching any more
                                if tx.send(Ok(event)).await.is_err() {
                                    return Ok(());
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        return Err(GeminiError::RequestError(e));
                    }
                    None => break,
                }
            }
        }
    }

    // Final line without a trailing newline
    let rest = String::from_utf8_lossy(&buffer);
    for event in parse_line(rest.trim_end()) {
        if tx.send(Ok(event)).await.is_err() {
            break;
        }
    }

    Ok(())
}

/// Parse a single SSE line
///
/// Only `data:` lines carry payloads; comments, `event:` and blank lines
/// are ignored.
fn parse_line(line: &str) -> Vec<StreamEvent> {
    match line.strip_prefix("data:") {
        Some(data) => parse_event(data.trim_start()),
        None => Vec::new(),
    }
}

/// Parse one `data:` payload into events
pub(crate) fn parse_event(data: &str) -> Vec<StreamEvent> {
    let value: serde_json::Value = match serde_json::from_str(data) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Skipping malformed SSE payload: {}", e);
            return Vec::new();
        }
    };

    if let Some(error) = value.get("error") {
        let status = error["code"].as_u64().and_then(|c| u16::try_from(c).ok()).unwrap_or(0);
        let message = error["message"].as_str().unwrap_or("Unknown error").to_string();
        return vec![StreamEvent::Error { status, message }];
    }

    let response: GenerateContentResponse = match serde_json::from_value(value) {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Skipping unexpected SSE payload shape: {}", e);
            return Vec::new();
        }
    };

    if let Some(reason) = response.block_reason() {
        return vec![StreamEvent::Blocked { reason }];
    }

    let mut events = Vec::new();
    if let Some(text) = response.text() {
        events.push(StreamEvent::Delta { text });
    }
    if let Some(reason) = response.finish_reason() {
        events.push(StreamEvent::Finished { reason: reason.to_string() });
    }
    events
}

/// Adapt the event channel into a [`TextStream`]
pub fn text_stream(rx: mpsc::Receiver<EventResult>) -> TextStream {
    stream::unfold(Some(rx), |state| async move {
        let mut rx = state?;
        loop {
            match rx.recv().await? {
                Ok(StreamEvent::Delta { text }) if !text.is_empty() => {
                    return Some((Ok(text), Some(rx)));
                }
                Ok(StreamEvent::Delta { .. }) => {}
                Ok(StreamEvent::Finished { reason }) => {
                    tracing::debug!("Stream finished: {}", reason);
                }
                Ok(StreamEvent::Blocked { reason }) => {
                    return Some((Err(GeminiError::Blocked { reason }), None));
                }
                Ok(StreamEvent::Error { status, message }) => {
                    return Some((Err(GeminiError::ApiError { status, message }), None));
                }
                Err(e) => return Some((Err(e), None)),
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use futures_util::stream;
    use pretty_assertions::assert_eq;

    use super::*;

    fn body(chunks: &[&str]) -> impl Stream<Item = Result<Vec<u8>, reqwest::Error>> + Unpin {
        stream::iter(chunks.iter().map(|c| Ok(c.as_bytes().to_vec())).collect::<Vec<_>>())
    }

    async fn collect(chunks: &[&str]) -> Vec<Result<String, String>> {
        let (tx, rx) = mpsc::channel(16);
        let result = process_stream(body(chunks), tx.clone(), CancellationToken::new()).await;
        if let Err(e) = result {
            tx.send(Err(e)).await.unwrap();
        }
        drop(tx);
        text_stream(rx).map(|item| item.map_err(|e| e.to_string())).collect().await
    }

    #[test]
    fn parse_delta_with_finish() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"Hi"}],"role":"model"},"finishReason":"STOP"}]}"#;
        assert_eq!(
            parse_event(data),
            vec![
                StreamEvent::Delta { text: "Hi".into() },
                StreamEvent::Finished { reason: "STOP".into() },
            ]
        );
    }

    #[test]
    fn parse_error_payload() {
        let data = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            parse_event(data),
            vec![StreamEvent::Error { status: 429, message: "Quota exceeded".into() }]
        );
    }

    #[test]
    fn parse_blocked_prompt() {
        let data = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert_eq!(parse_event(data), vec![StreamEvent::Blocked { reason: "SAFETY".into() }]);
    }

    #[test]
    fn malformed_payload_is_skipped() {
        assert!(parse_event("{not json").is_empty());
        assert!(parse_line(": keepalive").is_empty());
        assert!(parse_line("").is_empty());
    }

    #[tokio::test]
    async fn chunks_split_across_reads() {
        let items = collect(&[
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hello \"}]}}]}\r\n\r\ndata: {\"cand",
            "idates\":[{\"content\":{\"parts\":[{\"text\":\"world\"}]},\"finishReason\":\"STOP\"}]}\r\n\r\n",
        ])
        .await;
        assert_eq!(items, vec![Ok("Hello ".to_string()), Ok("world".to_string())]);
    }

    #[tokio::test]
    async fn multibyte_character_split_across_reads() {
        let line = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"π≈3.14\"}]}}]}\n";
        let bytes = line.as_bytes();
        let split = line.find('π').unwrap() + 1;
        let chunks: Vec<Result<Vec<u8>, reqwest::Error>> =
            vec![Ok(bytes[..split].to_vec()), Ok(bytes[split..].to_vec())];

        let (tx, rx) = mpsc::channel(16);
        process_stream(stream::iter(chunks), tx, CancellationToken::new()).await.unwrap();
        let items: Vec<_> = text_stream(rx).collect().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap(), "π≈3.14");
    }

    #[tokio::test]
    async fn error_event_ends_stream() {
        let items = collect(&[
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"partial\"}]}}]}\n",
            "data: {\"error\":{\"code\":500,\"message\":\"boom\"}}\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"never\"}]}}]}\n",
        ])
        .await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], Ok("partial".to_string()));
        assert!(items[1].as_ref().unwrap_err().contains("boom"));
    }

    #[tokio::test]
    async fn cancelled_before_data() {
        let (tx, _rx) = mpsc::channel(16);
        let token = CancellationToken::new();
        token.cancel();
        let result = process_stream(stream::pending::<Result<Vec<u8>, reqwest::Error>>(), tx, token)
            .await;
        assert!(matches!(result, Err(GeminiError::Cancelled)));
    }
}
