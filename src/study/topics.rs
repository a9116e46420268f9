//! Topic generation client
//!
//! One structured call per class and subject. Whatever comes back, the caller
//! always gets a usable [`TopicList`].

use std::ops::Range;

use serde::Deserialize;
use serde_json::json;

use crate::catalog::{ClassLevel, Subject};
use crate::gemini::{GeminiModel, GenerateContentRequest, GenerationBackend};

/// Substituted when the response has no usable topics
pub const FALLBACK_TOPICS: [&str; 3] = ["Introduction", "Topic 1", "Topic 2"];

/// The single pseudo-topic shown when the call fails
pub const TOPICS_ERROR: &str = "Error loading topics. Please try again.";

/// Where a topic list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicSource {
    /// Parsed from the model's answer
    Syllabus,
    /// Placeholder list; the answer had no topics
    Fallback,
    /// The call failed; the only entry is [`TOPICS_ERROR`]
    Failed,
}

/// An ordered list of topics for one class and subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicList {
    source: TopicSource,
    topics: Vec<String>,
}

impl TopicList {
    pub fn syllabus(topics: Vec<String>) -> Self {
        Self { source: TopicSource::Syllabus, topics }
    }

    pub fn fallback() -> Self {
        Self {
            source: TopicSource::Fallback,
            topics: FALLBACK_TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn failed() -> Self {
        Self { source: TopicSource::Failed, topics: vec![TOPICS_ERROR.to_string()] }
    }

    pub fn source(&self) -> TopicSource {
        self.source
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn is_failure(&self) -> bool {
        self.source == TopicSource::Failed
    }

    /// Whether `topic` is the failure pseudo-topic of this list
    pub fn is_failure_entry(&self, topic: &str) -> bool {
        self.is_failure() && topic == TOPICS_ERROR
    }
}

#[derive(Deserialize)]
struct TopicsPayload {
    #[serde(default)]
    topics: Option<Vec<String>>,
}

fn topic_prompt(class: ClassLevel, subject: &Subject) -> String {
    format!(
        "List the main syllabus topics for {} {} according to the new Ugandan NCDC \
         (National Curriculum Development Centre) lower secondary curriculum.\n\
         Return ONLY a JSON object with a property \"topics\" containing an array of strings. \
         Do not format as markdown code block. Just raw JSON.",
        class.label(),
        subject.name
    )
}

/// Build the structured topic request
pub fn topic_request(model: GeminiModel, class: ClassLevel, subject: &Subject) -> GenerateContentRequest {
    GenerateContentRequest::prompt(model, topic_prompt(class, subject))
        .with_json_schema(json!({
            "type": "OBJECT",
            "properties": {
                "topics": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                }
            }
        }))
        .without_thinking()
}

/// Interpret the response text
///
/// No text, no `topics` field or an empty array give the fallback list.
/// Text that is not JSON at all counts as a failed call.
pub fn parse_topics(text: Option<&str>) -> TopicList {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        tracing::warn!("Topic response had no text, using fallback topics");
        return TopicList::fallback();
    };

    let payload: TopicsPayload = match serde_json::from_str(text) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!("Topic response was not valid JSON: {}", e);
            return TopicList::failed();
        }
    };

    let topics: Vec<String> = payload
        .topics
        .unwrap_or_default()
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    if topics.is_empty() {
        tracing::warn!("Topic response listed no topics, using fallback topics");
        TopicList::fallback()
    } else {
        TopicList::syllabus(topics)
    }
}

/// Fetch the topic list; never fails
pub async fn fetch_topics<B: GenerationBackend>(
    backend: &B,
    model: GeminiModel,
    class: ClassLevel,
    subject: &Subject,
) -> TopicList {
    tracing::info!("Fetching topics for {} {}", class, subject.name);
    match backend.generate(topic_request(model, class, subject)).await {
        Ok(response) => parse_topics(response.text().as_deref()),
        Err(e) => {
            tracing::warn!("Topic fetch failed: {}", e);
            TopicList::failed()
        }
    }
}

/// A topic that passed the search filter, with the byte ranges that matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMatch<'a> {
    pub topic: &'a str,
    pub matches: Vec<Range<usize>>,
}

/// Case-insensitive substring filter
///
/// An empty query keeps every topic with no highlights.
pub fn filter_topics<'a>(topics: &'a [String], query: &str) -> Vec<TopicMatch<'a>> {
    let query = query.trim();
    topics
        .iter()
        .filter_map(|topic| {
            if query.is_empty() {
                return Some(TopicMatch { topic, matches: Vec::new() });
            }
            let matches = match_ranges(topic, query);
            if matches.is_empty() { None } else { Some(TopicMatch { topic, matches }) }
        })
        .collect()
}

/// Non-overlapping byte ranges of `needle` in `haystack`, ignoring case
fn match_ranges(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }
    // (byte offset, lowercased char) pairs so ranges map back onto the original
    let folded: Vec<(usize, char)> = haystack
        .char_indices()
        .flat_map(|(i, c)| c.to_lowercase().map(move |l| (i, l)))
        .collect();

    let mut ranges = Vec::new();
    let mut i = 0;
    while i + needle.len() <= folded.len() {
        let window = &folded[i..i + needle.len()];
        if window.iter().map(|(_, c)| *c).eq(needle.iter().copied()) {
            let start = window[0].0;
            let last = window[window.len() - 1].0;
            let end = last + haystack[last..].chars().next().map_or(0, char::len_utf8);
            ranges.push(start..end);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::find_subject;
    use crate::gemini::GeminiError;
    use crate::study::testing::ScriptedBackend;

    fn maths() -> &'static Subject {
        find_subject("math").unwrap()
    }

    #[test]
    fn parses_topic_array() {
        let list = parse_topics(Some(r#"{"topics":["Numbers"," Algebra ",""]}"#));
        assert_eq!(list.source(), TopicSource::Syllabus);
        assert_eq!(list.topics(), ["Numbers".to_string(), "Algebra".to_string()]);
    }

    #[test]
    fn missing_field_gives_fallback() {
        let list = parse_topics(Some("{}"));
        assert_eq!(list, TopicList::fallback());
        assert_eq!(list.topics().len(), 3);
    }

    #[test]
    fn empty_array_gives_fallback() {
        assert_eq!(parse_topics(Some(r#"{"topics":[]}"#)), TopicList::fallback());
    }

    #[test]
    fn no_text_gives_fallback() {
        assert_eq!(parse_topics(None), TopicList::fallback());
        assert_eq!(parse_topics(Some("  ")), TopicList::fallback());
    }

    #[test]
    fn invalid_json_counts_as_failure() {
        let list = parse_topics(Some("Here are the topics: Numbers, Algebra"));
        assert!(list.is_failure());
        assert!(list.is_failure_entry(TOPICS_ERROR));
        assert!(!TopicList::fallback().is_failure_entry(TOPICS_ERROR));
    }

    #[test]
    fn request_is_structured_without_thinking() {
        let request = topic_request(GeminiModel::Flash25, ClassLevel::S2, maths());
        let body = serde_json::to_value(&request).unwrap();
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("S2 Mathematics"));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["properties"]["topics"]["type"],
            "ARRAY"
        );
        assert_eq!(body["generationConfig"]["thinkingConfig"]["thinkingBudget"], 0);
    }

    #[tokio::test]
    async fn fetch_uses_backend_answer() {
        let backend = ScriptedBackend::new().with_response(r#"{"topics":["Sets","Geometry"]}"#);
        let list = fetch_topics(&backend, GeminiModel::Flash25, ClassLevel::S1, maths()).await;
        assert_eq!(list, TopicList::syllabus(vec!["Sets".into(), "Geometry".into()]));
    }

    #[tokio::test]
    async fn fetch_failure_gives_error_entry() {
        let backend = ScriptedBackend::new().with_error(GeminiError::ApiError {
            status: 500,
            message: "boom".into(),
        });
        let list = fetch_topics(&backend, GeminiModel::Flash25, ClassLevel::S1, maths()).await;
        assert_eq!(list.topics(), [TOPICS_ERROR.to_string()]);
    }

    #[test]
    fn filter_is_case_insensitive_with_ranges() {
        let topics = vec!["Cell Biology".to_string(), "Forces".to_string(), "Cells and tissues".into()];
        let matched = filter_topics(&topics, "CELL");
        assert_eq!(
            matched,
            vec![
                TopicMatch { topic: "Cell Biology", matches: vec![0..4] },
                TopicMatch { topic: "Cells and tissues", matches: vec![0..4] },
            ]
        );
    }

    #[test]
    fn empty_query_keeps_everything() {
        let topics = vec!["A".to_string(), "B".to_string()];
        assert_eq!(filter_topics(&topics, "  ").len(), 2);
    }

    #[test]
    fn match_ranges_handle_repeats_and_unicode() {
        assert_eq!(match_ranges("banana", "an"), vec![1..3, 3..5]);
        assert_eq!(match_ranges("Énergie", "éner"), vec![0..5]);
        assert!(match_ranges("Forces", "xyz").is_empty());
    }
}
