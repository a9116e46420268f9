//! SmartStudy - a terminal study companion for lower secondary students
//!
//! Pick a class, a subject and a topic; SmartStudy generates syllabus topics
//! and revision notes with Gemini and offers a tutor to chat with.

pub mod app;
pub mod catalog;
pub mod config;
pub mod gemini;
pub mod study;
pub mod syntax;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
