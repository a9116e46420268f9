//! Data models for Gemini API requests and responses

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Available Gemini models
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeminiModel {
    /// Gemini 2.5 Flash - fast, thinking can be switched off
    #[default]
    Flash25,
    /// Gemini 2.5 Flash-Lite - cheapest and lowest latency
    FlashLite25,
    /// Gemini 2.5 Pro - most capable, always thinks a little
    Pro25,
}

impl GeminiModel {
    /// Get the API model identifier
    pub fn model_id(&self) -> &'static str {
        match self {
            Self::Flash25 => "gemini-2.5-flash",
            Self::FlashLite25 => "gemini-2.5-flash-lite",
            Self::Pro25 => "gemini-2.5-pro",
        }
    }

    /// Get a human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Flash25 => "Gemini 2.5 Flash",
            Self::FlashLite25 => "Gemini 2.5 Flash-Lite",
            Self::Pro25 => "Gemini 2.5 Pro",
        }
    }

    /// Smallest thinking budget the model accepts
    ///
    /// Flash models accept 0, which disables thinking entirely. Pro cannot
    /// disable thinking and rejects budgets below 128.
    pub fn minimal_thinking_budget(&self) -> u32 {
        match self {
            Self::Flash25 | Self::FlashLite25 => 0,
            Self::Pro25 => 128,
        }
    }

    /// Parse model from string (friendly name or model ID)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flash" | "flash25" | "flash2.5" | "gemini-2.5-flash" => Some(Self::Flash25),
            "lite" | "flash-lite" | "flashlite" | "gemini-2.5-flash-lite" => {
                Some(Self::FlashLite25)
            }
            "pro" | "pro25" | "pro2.5" | "gemini-2.5-pro" => Some(Self::Pro25),
            _ => None,
        }
    }

    /// List all available models
    pub fn all() -> &'static [GeminiModel] {
        &[Self::Flash25, Self::FlashLite25, Self::Pro25]
    }

    /// The model after this one, wrapping around
    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|m| m == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl std::str::FromStr for GeminiModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown model: {}. Options: flash, lite, pro", s))
    }
}

/// Author of a content turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User turn
    User,
    /// Model turn
    Model,
}

/// A single part of a content turn
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    /// Text payload
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<String>,
    /// Set on thought-summary parts, which are never shown to the student
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thought: Option<bool>,
}

/// A turn in the conversation, or a system instruction
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    /// Role of the author; absent for system instructions
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<Role>,
    /// Parts of the turn
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user turn
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role(Some(Role::User), text)
    }

    /// Create a model turn
    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role(Some(Role::Model), text)
    }

    /// Create a role-less system instruction
    pub fn system(text: impl Into<String>) -> Self {
        Self::with_role(None, text)
    }

    fn with_role(role: Option<Role>, text: impl Into<String>) -> Self {
        Self { role, parts: vec![Part { text: Some(text.into()), thought: None }] }
    }

    /// Visible text of this content (thought parts skipped)
    pub fn visible_text(&self) -> String {
        self.parts
            .iter()
            .filter(|p| p.thought != Some(true))
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

/// Thinking controls
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    /// Token budget for internal reasoning
    pub thinking_budget: u32,
}

/// Generation parameters
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// MIME type of the response, e.g. `application/json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Schema the response must conform to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
    /// Thinking controls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
    /// Maximum output tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Request body for `generateContent` and `streamGenerateContent`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Model to address; goes in the URL, not the body
    #[serde(skip)]
    pub model: GeminiModel,
    /// Conversation turns
    pub contents: Vec<Content>,
    /// Optional system instruction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Optional generation parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Create a new request with default settings
    pub fn new(model: GeminiModel, contents: Vec<Content>) -> Self {
        Self { model, contents, system_instruction: None, generation_config: None }
    }

    /// Single user prompt
    pub fn prompt(model: GeminiModel, text: impl Into<String>) -> Self {
        Self::new(model, vec![Content::user(text)])
    }

    /// Set the system instruction
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system_instruction = Some(Content::system(system));
        self
    }

    /// Constrain the output to JSON matching `schema`
    pub fn with_json_schema(mut self, schema: Value) -> Self {
        let config = self.config_mut();
        config.response_mime_type = Some("application/json".to_string());
        config.response_schema = Some(schema);
        self
    }

    /// Ask for the lowest thinking budget the model allows
    ///
    /// Lowers first-token latency, which is what the student sees.
    pub fn without_thinking(mut self) -> Self {
        let budget = self.model.minimal_thinking_budget();
        self.config_mut().thinking_config = Some(ThinkingConfig { thinking_budget: budget });
        self
    }

    /// Set max output tokens
    pub fn with_max_output_tokens(mut self, max_tokens: u32) -> Self {
        self.config_mut().max_output_tokens = Some(max_tokens);
        self
    }

    fn config_mut(&mut self) -> &mut GenerationConfig {
        self.generation_config.get_or_insert_with(GenerationConfig::default)
    }
}

/// Finish reasons that mean the candidate was withheld
const BLOCKING_FINISH_REASONS: &[&str] =
    &["SAFETY", "RECITATION", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

/// Response from `generateContent`, also the payload of every SSE event
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate completions
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt (block reason)
    pub prompt_feedback: Option<PromptFeedback>,
    /// Token usage statistics
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Visible text of the first candidate, if any
    pub fn text(&self) -> Option<String> {
        let text = self.candidates.first()?.content.as_ref()?.visible_text();
        if text.is_empty() { None } else { Some(text) }
    }

    /// Finish reason of the first candidate
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }

    /// Why the prompt or candidate was withheld, if it was
    pub fn block_reason(&self) -> Option<String> {
        if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.clone()) {
            return Some(reason);
        }
        self.finish_reason()
            .filter(|reason| BLOCKING_FINISH_REASONS.contains(reason))
            .map(str::to_string)
    }
}

/// A candidate completion
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    pub content: Option<Content>,
    /// Why generation stopped (only on the last chunk when streaming)
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked
    pub block_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt
    pub prompt_token_count: Option<u32>,
    /// Tokens generated
    pub candidates_token_count: Option<u32>,
    /// Tokens spent thinking
    pub thoughts_token_count: Option<u32>,
}

/// Events parsed from the streaming endpoint (SSE)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A piece of generated text (may be empty)
    Delta {
        /// Text chunk
        text: String,
    },
    /// The candidate finished normally
    Finished {
        /// Finish reason, e.g. `STOP` or `MAX_TOKENS`
        reason: String,
    },
    /// Prompt or candidate withheld by safety filters
    Blocked {
        /// Block reason
        reason: String,
    },
    /// Error object sent in place of a response
    Error {
        /// Error code carried in the payload
        status: u16,
        /// Error message
        message: String,
    },
}
