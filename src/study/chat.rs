//! Tutor chat session
//!
//! One session lives for the whole process. The transcript is what the
//! student sees; the history is what the model is sent. They differ: the
//! greeting is display-only, and failed turns never enter the history.

use super::buffer::StreamUpdate;
use super::error::ChatError;
use crate::gemini::{Content, GeminiError, GeminiModel, GenerateContentRequest};

/// Opening line of every transcript
pub const GREETING: &str = "Hello! I'm your SmartStudy Tutor. I can help you revise, explain complex topics, or create practice questions. What do you need help with today?";

/// Replaces the reply of a failed turn
pub const CHAT_APOLOGY: &str = "I'm having trouble connecting right now. Please try again.";

/// Persona and formatting rules sent as the system instruction
pub const TUTOR_INSTRUCTION: &str = "You are a friendly, encouraging, and highly intelligent AI study tutor for Ugandan High School students (S1-S4). Your answers must be well-structured using Markdown. Use bold headings (###), bullet points, and clear paragraph spacing to make notes easy to read. Be concise but comprehensive. If asked for a diagram, describe it vividly.";

/// Who wrote a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Student,
    Tutor,
}

/// One transcript line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub speaker: Speaker,
    pub text: String,
    /// Still receiving chunks
    pub pending: bool,
}

impl ChatEntry {
    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self { speaker, text: text.into(), pending: false }
    }
}

/// Identifies one send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(u64);

/// A turn ready to be sent
#[derive(Debug)]
pub struct ChatTurn {
    pub turn: TurnId,
    pub request: GenerateContentRequest,
}

/// State of the multi-turn tutoring conversation
#[derive(Debug)]
pub struct TutorChat {
    model: GeminiModel,
    transcript: Vec<ChatEntry>,
    history: Vec<Content>,
    in_flight: Option<InFlight>,
    next_turn: u64,
}

#[derive(Debug)]
struct InFlight {
    turn: TurnId,
    message: String,
}

impl TutorChat {
    pub fn new(model: GeminiModel) -> Self {
        tracing::info!("Starting tutor chat on {}", model.display_name());
        Self {
            model,
            transcript: vec![ChatEntry::new(Speaker::Tutor, GREETING)],
            history: Vec::new(),
            in_flight: None,
            next_turn: 0,
        }
    }

    pub fn model(&self) -> GeminiModel {
        self.model
    }

    pub fn transcript(&self) -> &[ChatEntry] {
        &self.transcript
    }

    /// Model-facing history of completed turns
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    pub fn in_flight(&self) -> Option<TurnId> {
        self.in_flight.as_ref().map(|f| f.turn)
    }

    /// A turn is in flight and no reply text has arrived yet
    pub fn is_typing(&self) -> bool {
        self.in_flight.is_some() && self.transcript.last().is_some_and(|e| e.text.is_empty())
    }

    /// Start a turn: records the message and an empty reply placeholder
    pub fn begin_turn(&mut self, message: &str) -> Result<ChatTurn, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if self.in_flight.is_some() {
            return Err(ChatError::TurnInFlight);
        }

        let turn = TurnId(self.next_turn);
        self.next_turn += 1;

        self.transcript.push(ChatEntry::new(Speaker::Student, message));
        self.transcript.push(ChatEntry { speaker: Speaker::Tutor, text: String::new(), pending: true });

        let mut contents = self.history.clone();
        contents.push(Content::user(message));
        let request = GenerateContentRequest::new(self.model, contents)
            .with_system(TUTOR_INSTRUCTION)
            .without_thinking();

        self.in_flight = Some(InFlight { turn, message: message.to_string() });
        tracing::debug!("Chat turn {:?} started ({} prior turns)", turn, self.history.len() / 2);
        Ok(ChatTurn { turn, request })
    }

    fn placeholder(&mut self, turn: TurnId) -> Option<&mut ChatEntry> {
        if self.in_flight() != Some(turn) {
            return None;
        }
        self.transcript.last_mut().filter(|e| e.pending)
    }

    /// Append reply text; returns false for stale turns
    pub fn apply_chunk(&mut self, turn: TurnId, chunk: &str) -> bool {
        match self.placeholder(turn) {
            Some(entry) => {
                entry.text.push_str(chunk);
                true
            }
            None => false,
        }
    }

    /// Finalize a reply and commit the exchange to history
    pub fn complete_turn(&mut self, turn: TurnId) -> bool {
        let Some(entry) = self.placeholder(turn) else {
            return false;
        };
        if entry.text.is_empty() {
            return self.fail_turn(turn, &GeminiError::EmptyResponse);
        }
        entry.pending = false;
        let reply = entry.text.clone();

        if let Some(done) = self.in_flight.take() {
            self.history.push(Content::user(done.message));
            self.history.push(Content::model(reply));
        }
        true
    }

    /// Replace the reply with an apology; history is left as it was
    pub fn fail_turn(&mut self, turn: TurnId, error: &GeminiError) -> bool {
        let Some(entry) = self.placeholder(turn) else {
            return false;
        };
        tracing::warn!("Chat turn {:?} failed: {}", turn, error);
        entry.text = CHAT_APOLOGY.to_string();
        entry.pending = false;
        self.in_flight = None;
        true
    }

    /// Apply one stream step to the turn
    pub fn apply(&mut self, turn: TurnId, update: &StreamUpdate) -> bool {
        match update {
            StreamUpdate::Chunk(chunk) => self.apply_chunk(turn, chunk),
            StreamUpdate::Finished => self.complete_turn(turn),
            StreamUpdate::Failed(e) => self.fail_turn(turn, e),
        }
    }
}
