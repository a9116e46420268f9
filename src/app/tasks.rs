//! Background tasks that run effects and report back as [`AppEvent`]s
//!
//! Tasks never touch application state. Everything they learn travels over
//! the event channel and is applied by the controller on its own thread.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::gemini::{GeminiModel, GenerationBackend};
use crate::study::notes::stream_notes;
use crate::study::{
    ChatTurn, Effect, RequestId, StreamUpdate, TopicList, TurnId, drive_stream, fetch_topics,
};

/// Results flowing back from background work
#[derive(Debug)]
pub enum AppEvent {
    Topics { request: RequestId, list: TopicList },
    Notes { request: RequestId, update: StreamUpdate },
    Chat { turn: TurnId, update: StreamUpdate },
}

/// Start the work an [`Effect`] asks for
pub fn spawn_effect<B: GenerationBackend>(
    backend: Arc<B>,
    model: GeminiModel,
    effect: Effect,
    events: UnboundedSender<AppEvent>,
) {
    match effect {
        Effect::FetchTopics { request, class, subject } => {
            tokio::spawn(async move {
                let list = fetch_topics(&*backend, model, class, subject).await;
                if events.send(AppEvent::Topics { request, list }).is_err() {
                    tracing::debug!("Event channel closed before topics for {:?}", request);
                }
            });
        }
        Effect::StreamNotes { request, class, subject, topic } => {
            tokio::spawn(async move {
                match stream_notes(&*backend, model, class, subject, &topic).await {
                    Ok(stream) => {
                        drive_stream(stream, |update| {
                            events.send(AppEvent::Notes { request, update }).is_ok()
                        })
                        .await;
                    }
                    Err(e) => {
                        let update = StreamUpdate::Failed(e);
                        if events.send(AppEvent::Notes { request, update }).is_err() {
                            tracing::debug!("Event channel closed before notes for {:?}", request);
                        }
                    }
                }
            });
        }
    }
}

/// Send one chat turn and stream the reply back
pub fn spawn_chat_turn<B: GenerationBackend>(
    backend: Arc<B>,
    turn: ChatTurn,
    events: UnboundedSender<AppEvent>,
) {
    let ChatTurn { turn, request } = turn;
    tokio::spawn(async move {
        match backend.stream(request).await {
            Ok(stream) => {
                drive_stream(stream, |update| events.send(AppEvent::Chat { turn, update }).is_ok())
                    .await;
            }
            Err(e) => {
                let update = StreamUpdate::Failed(e);
                if events.send(AppEvent::Chat { turn, update }).is_err() {
                    tracing::debug!("Event channel closed before chat {:?}", turn);
                }
            }
        }
    });
}
