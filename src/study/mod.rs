//! Study core: the navigation funnel, the generation clients and the
//! buffers their streamed output accumulates in.

pub mod buffer;
pub mod chat;
pub mod error;
pub mod navigation;
pub mod notes;
pub mod render;
pub mod sanitize;
pub mod topics;

#[cfg(test)]
pub(crate) mod testing;

pub use buffer::{BufferPhase, GenerationBuffer, NOTES_ERROR, StreamUpdate, drive_stream};
pub use chat::{CHAT_APOLOGY, ChatEntry, ChatTurn, Speaker, TurnId, TutorChat};
pub use error::{ChatError, NavigationError};
pub use navigation::{Effect, RequestId, Selection, StudySession, Tab, TopicState, View};
pub use render::{NoteBlock, NoteDocument, parse_note, parse_streaming_note, plain_text, render_html};
pub use sanitize::sanitize;
pub use topics::{TOPICS_ERROR, TopicList, TopicSource, fetch_topics, filter_topics};
