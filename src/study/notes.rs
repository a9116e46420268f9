//! Note generation client

use crate::catalog::{ClassLevel, Subject};
use crate::gemini::{GeminiError, GeminiModel, GenerateContentRequest, GenerationBackend, TextStream};

/// Revision-notes prompt for one topic
///
/// Catalog topics and typed topics go through here identically.
pub fn notes_prompt(class: ClassLevel, subject: &Subject, topic: &str) -> String {
    format!(
        r#"Act as an expert teacher for the Ugandan NCDC New Lower Secondary Curriculum.
You are generating revision notes for a student in {class} studying {subject}.
Topic: "{topic}".

**CONTENT REQUIREMENTS:**
1. **Visual Illustrations (MANDATORY):**
   - Generate **HTML <svg>** diagrams that visually explain the concepts of this topic.
   - **Mathematics:** draw the exact shapes, graphs or figures discussed, with clear labels, dimensions and angles.
   - **Sciences:** draw schematic diagrams (a plant cell, the human heart, an electric circuit, forces on a block).
   - **CRITICAL:** output the <div> and <svg> tags RAW. **DO NOT** wrap them in ```html or ``` blocks.
   - Use colours in greens, blues and reds.
   - Wrap every SVG in exactly this structure:
     <div class="my-8 flex justify-center bg-white rounded-2xl shadow-sm border border-gray-100 p-6 w-full overflow-x-auto"><div class="w-full max-w-md"> ...svg content... </div></div>
   (Put a blank line before and after the HTML block.)

2. **Structure:**
   - **Learning Goal:** brief bullet points.
   - **Core Knowledge:** detailed explanation of the concept.
   - **ILLUSTRATION:** (insert your SVG here).
   - **Step-by-Step / Key Facts:** bullet points or numbered lists.
   - **Activity of Integration:** a real-world problem or scenario for the student to solve.
   - **Summary:** a quick recap.

3. **Format:**
   - Markdown for text (bold headers, lists).
   - Raw HTML for SVGs (do not escape them).
   - Start responding IMMEDIATELY."#,
        class = class.label(),
        subject = subject.name,
        topic = topic.trim(),
    )
}

/// Build the streamed notes request
pub fn notes_request(
    model: GeminiModel,
    class: ClassLevel,
    subject: &Subject,
    topic: &str,
) -> GenerateContentRequest {
    GenerateContentRequest::prompt(model, notes_prompt(class, subject, topic)).without_thinking()
}

/// Start streaming notes for a topic
pub async fn stream_notes<B: GenerationBackend>(
    backend: &B,
    model: GeminiModel,
    class: ClassLevel,
    subject: &Subject,
    topic: &str,
) -> Result<TextStream, GeminiError> {
    tracing::info!("Streaming notes for {} {}: {}", class, subject.name, topic);
    backend.stream(notes_request(model, class, subject, topic)).await
}
