//! The controller: turns actions into state transitions and effects
//!
//! All state is mutated here, on one thread. Effects run as spawned tasks
//! whose results come back over an unbounded channel as [`AppEvent`]s.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::input::Action;
use super::state::{UiState, topic_rows};
use super::tasks::{AppEvent, spawn_chat_turn, spawn_effect};
use crate::catalog::{ClassLevel, SUBJECTS};
use crate::config::Config;
use crate::gemini::GenerationBackend;
use crate::study::render::{parse_note, plain_text};
use crate::study::{ChatError, Effect, NavigationError, StudySession, Tab, TutorChat, View};

/// What the event loop should do after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    /// Put this text on the clipboard
    Copy(String),
}

/// Borrowed view of everything the renderer needs
pub struct Screen<'a> {
    pub session: &'a StudySession,
    pub chat: Option<&'a TutorChat>,
    pub config: &'a Config,
    pub config_path: Option<&'a Path>,
    /// Masked credential and where it came from
    pub credential: Option<&'a str>,
    pub ui: &'a mut UiState,
}

pub struct Controller<B> {
    backend: Arc<B>,
    session: StudySession,
    /// Created the first time the tutor tab is opened
    chat: Option<TutorChat>,
    ui: UiState,
    config: Config,
    config_path: Option<PathBuf>,
    credential: Option<String>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl<B: GenerationBackend> Controller<B> {
    pub fn new(backend: Arc<B>, config: Config) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            session: StudySession::new(),
            chat: None,
            ui: UiState::new(),
            config,
            config_path: None,
            credential: None,
            events_tx,
            events_rx,
        }
    }

    /// Persist config changes to `path`
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Credential description for the settings tab
    pub fn with_credential(mut self, credential: String) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn session(&self) -> &StudySession {
        &self.session
    }

    pub fn chat(&self) -> Option<&TutorChat> {
        self.chat.as_ref()
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UiState {
        &mut self.ui
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn screen(&mut self) -> Screen<'_> {
        Screen {
            session: &self.session,
            chat: self.chat.as_ref(),
            config: &self.config,
            config_path: self.config_path.as_deref(),
            credential: self.credential.as_deref(),
            ui: &mut self.ui,
        }
    }

    /// Whether keys should be typed into a text field
    pub fn text_entry(&self) -> bool {
        match self.session.tab() {
            Tab::Chat => true,
            Tab::Study => self.session.view() == View::TopicBrowser && self.ui.searching,
            Tab::Settings => false,
        }
    }

    /// Apply every event that has already arrived
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    /// Wait for the next event and apply it
    pub async fn next_event(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply_event(event);
                true
            }
            None => false,
        }
    }

    /// Fold a background result into state; stale results are dropped
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Topics { request, list } => {
                if self.session.apply_topics(request, list) {
                    let rows =
                        topic_rows(self.session.topic_list(), self.ui.topic_search.as_str()).len();
                    self.ui.topic_cursor.clamp(rows);
                }
            }
            AppEvent::Notes { request, update } => {
                if self.session.apply_note_update(request, &update) {
                    self.ui.note_view.refresh(self.session.notes());
                }
            }
            AppEvent::Chat { turn, update } => {
                let applied = self.chat.as_mut().is_some_and(|chat| chat.apply(turn, &update));
                if !applied {
                    tracing::debug!("Dropping chat update for stale turn {:?}", turn);
                }
            }
        }
    }

    fn run_effect(&self, effect: Effect) {
        spawn_effect(Arc::clone(&self.backend), self.config.model, effect, self.events_tx.clone());
    }

    /// Handle one user action
    pub fn handle_action(&mut self, action: Action) -> Flow {
        self.ui.status.clear();
        match action {
            Action::Quit => return Flow::Quit,
            Action::Home => self.go_home(),
            Action::NextTab => self.switch_tab(self.session.tab().next()),
            Action::PrevTab => self.switch_tab(self.session.tab().prev()),
            Action::GoToTab(tab) => self.switch_tab(tab),
            _ => match self.session.tab() {
                Tab::Study => return self.handle_study(action),
                Tab::Chat => self.handle_chat(action),
                Tab::Settings => self.handle_settings(action),
            },
        }
        Flow::Continue
    }

    fn go_home(&mut self) {
        self.session.home();
        self.ui.class_cursor.reset();
        self.ui.subject_cursor.reset();
        self.ui.reset_topic_browser();
        self.ui.reset_note_view();
        self.ui.note_view.refresh(None);
        self.ui.status.clear();
    }

    fn switch_tab(&mut self, tab: Tab) {
        match self.session.switch_tab(tab) {
            Ok(()) => {
                if tab == Tab::Chat {
                    let model = self.config.model;
                    self.chat.get_or_insert_with(|| TutorChat::new(model));
                }
            }
            Err(NavigationError::TabsHidden) => {
                self.ui.status.set_message("Pick a class first");
            }
            Err(e) => tracing::debug!("Tab switch refused: {}", e),
        }
    }

    fn handle_study(&mut self, action: Action) -> Flow {
        match self.session.view() {
            View::ClassPicker => self.handle_class_picker(action),
            View::SubjectPicker => self.handle_subject_picker(action),
            View::TopicBrowser => self.handle_topic_browser(action),
            View::NoteViewer => return self.handle_note_viewer(action),
        }
        Flow::Continue
    }

    fn handle_class_picker(&mut self, action: Action) {
        let cursor = &mut self.ui.class_cursor;
        let len = ClassLevel::ALL.len();
        match action {
            Action::Up => cursor.up(),
            Action::Down => cursor.down(len),
            Action::Top => cursor.top(),
            Action::Bottom => cursor.bottom(len),
            Action::Select => {
                let class = ClassLevel::ALL[cursor.selected.min(len - 1)];
                if let Err(e) = self.session.select_class(class) {
                    tracing::warn!("Class selection refused: {}", e);
                    return;
                }
                self.ui.subject_cursor.reset();
                self.ui.status.clear();
            }
            _ => {}
        }
    }

    fn handle_subject_picker(&mut self, action: Action) {
        let cursor = &mut self.ui.subject_cursor;
        let len = SUBJECTS.len();
        match action {
            Action::Up => cursor.up(),
            Action::Down => cursor.down(len),
            Action::Top => cursor.top(),
            Action::Bottom => cursor.bottom(len),
            Action::Select => {
                let subject = &SUBJECTS[cursor.selected.min(len - 1)];
                match self.session.select_subject(subject) {
                    Ok(effect) => {
                        self.ui.reset_topic_browser();
                        self.run_effect(effect);
                    }
                    Err(e) => tracing::warn!("Subject selection refused: {}", e),
                }
            }
            Action::Back => self.back(),
            _ => {}
        }
    }

    fn topic_row_count(&self) -> usize {
        topic_rows(self.session.topic_list(), self.ui.topic_search.as_str()).len()
    }

    fn handle_topic_browser(&mut self, action: Action) {
        let len = self.topic_row_count();
        if self.ui.searching {
            let search = &mut self.ui.topic_search;
            match action {
                Action::Insert(c) => search.insert_char(c),
                Action::DeleteBack => search.delete_char(),
                Action::DeleteForward => search.delete_char_forward(),
                Action::CursorLeft => search.move_left(),
                Action::CursorRight => search.move_right(),
                Action::CursorStart => search.move_start(),
                Action::CursorEnd => search.move_end(),
                Action::Up => self.ui.topic_cursor.up(),
                Action::Down => self.ui.topic_cursor.down(len),
                Action::Select => self.choose_topic(),
                Action::Back => self.ui.searching = false,
                _ => {}
            }
            if matches!(action, Action::Insert(_) | Action::DeleteBack | Action::DeleteForward) {
                self.ui.topic_cursor.reset();
            }
            return;
        }

        match action {
            Action::Up => self.ui.topic_cursor.up(),
            Action::Down => self.ui.topic_cursor.down(len),
            Action::Top => self.ui.topic_cursor.top(),
            Action::Bottom => self.ui.topic_cursor.bottom(len),
            Action::Search => self.ui.searching = true,
            Action::Select => self.choose_topic(),
            Action::Back => self.back(),
            _ => {}
        }
    }

    fn choose_topic(&mut self) {
        let topic = {
            let rows = topic_rows(self.session.topic_list(), self.ui.topic_search.as_str());
            match rows.get(self.ui.topic_cursor.selected) {
                Some(row) => row.topic().to_string(),
                None => return,
            }
        };

        match self.session.select_topic(&topic) {
            Ok(effect) => {
                if matches!(effect, Effect::StreamNotes { .. }) {
                    self.ui.searching = false;
                    self.ui.reset_note_view();
                    self.ui.note_view.refresh(self.session.notes());
                } else {
                    self.ui.topic_cursor.reset();
                }
                self.run_effect(effect);
            }
            Err(NavigationError::EmptyTopic) => self.ui.status.set_error("Type a topic to study"),
            Err(e) => tracing::warn!("Topic selection refused: {}", e),
        }
    }

    fn handle_note_viewer(&mut self, action: Action) -> Flow {
        if let Some(index) = self.ui.diagram {
            let count = self.ui.note_view.document.diagrams.len();
            match action {
                Action::Back => self.ui.diagram = None,
                Action::Diagram | Action::Down | Action::Select if count > 0 => {
                    self.ui.diagram = Some((index + 1) % count);
                }
                Action::Up if count > 0 => self.ui.diagram = Some((index + count - 1) % count),
                _ => {}
            }
            return Flow::Continue;
        }

        let scroll = &mut self.ui.note_scroll;
        match action {
            Action::Up => scroll.scroll_up(1),
            Action::Down => scroll.scroll_down(1),
            Action::PageUp => scroll.scroll_up(scroll.page()),
            Action::PageDown => scroll.scroll_down(scroll.page()),
            Action::HalfPageUp => scroll.scroll_up(scroll.visible_height / 2),
            Action::HalfPageDown => scroll.scroll_down(scroll.visible_height / 2),
            Action::Top => scroll.to_top(),
            Action::Bottom => scroll.to_bottom(),
            Action::Back => self.back(),
            Action::Copy => return self.copy_notes(),
            Action::Diagram => {
                if self.ui.note_view.document.diagrams.is_empty() {
                    self.ui.status.set_message("These notes have no diagrams");
                } else {
                    self.ui.diagram = Some(0);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    /// Plain text of finished notes, for the clipboard
    fn copy_notes(&mut self) -> Flow {
        let Some(buffer) = self.session.notes() else {
            return Flow::Continue;
        };
        if buffer.is_streaming() {
            self.ui.status.set_error("Notes are still being written");
            return Flow::Continue;
        }
        let text = plain_text(&parse_note(&buffer.display_text()));
        if text.trim().is_empty() {
            self.ui.status.set_error("Nothing to copy");
            return Flow::Continue;
        }
        Flow::Copy(text)
    }

    fn back(&mut self) {
        match self.session.back() {
            Ok(()) => {
                match self.session.view() {
                    View::TopicBrowser => {
                        self.ui.reset_note_view();
                        self.ui.note_view.refresh(None);
                    }
                    View::SubjectPicker => self.ui.reset_topic_browser(),
                    _ => {}
                }
                self.ui.status.clear();
            }
            Err(e) => tracing::debug!("Back refused: {}", e),
        }
    }

    fn handle_chat(&mut self, action: Action) {
        let input = &mut self.ui.chat_input;
        let scroll = &mut self.ui.chat_scroll;
        match action {
            Action::Insert(c) => input.insert_char(c),
            Action::DeleteBack => input.delete_char(),
            Action::DeleteForward => input.delete_char_forward(),
            Action::CursorLeft => input.move_left(),
            Action::CursorRight => input.move_right(),
            Action::CursorStart => input.move_start(),
            Action::CursorEnd => input.move_end(),
            Action::Back => input.clear(),
            Action::Up => scroll.scroll_up(1),
            Action::Down => scroll.scroll_down(1),
            Action::PageUp | Action::HalfPageUp => scroll.scroll_up(scroll.page()),
            Action::PageDown | Action::HalfPageDown => scroll.scroll_down(scroll.page()),
            Action::Select => self.send_chat(),
            _ => {}
        }
    }

    fn send_chat(&mut self) {
        let model = self.config.model;
        let chat = self.chat.get_or_insert_with(|| TutorChat::new(model));
        match chat.begin_turn(self.ui.chat_input.as_str()) {
            Ok(turn) => {
                self.ui.chat_input.clear();
                self.ui.chat_scroll.follow = true;
                spawn_chat_turn(Arc::clone(&self.backend), turn, self.events_tx.clone());
            }
            Err(ChatError::TurnInFlight) => {
                self.ui.status.set_message("The tutor is still answering");
            }
            Err(ChatError::EmptyMessage) => {}
        }
    }

    fn handle_settings(&mut self, action: Action) {
        if !matches!(action, Action::CycleModel | Action::Select) {
            return;
        }
        self.config.model = self.config.model.next();
        tracing::info!("Model changed to {}", self.config.model.display_name());

        let Some(path) = &self.config_path else {
            self.ui.status.set_message(format!("Model: {}", self.config.model.display_name()));
            return;
        };
        match self.config.save_to(path) {
            Ok(()) => self
                .ui
                .status
                .set_message(format!("Model: {} (saved)", self.config.model.display_name())),
            Err(e) => {
                tracing::warn!("Failed to save config: {:#}", e);
                self.ui.status.set_error(format!("Could not save settings: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::gemini::{GeminiError, GeminiModel};
    use crate::study::chat::GREETING;
    use crate::study::testing::ScriptedBackend;
    use crate::study::{BufferPhase, CHAT_APOLOGY, NOTES_ERROR, Speaker, TOPICS_ERROR};

    fn controller(backend: ScriptedBackend) -> (Controller<ScriptedBackend>, Arc<ScriptedBackend>) {
        let backend = Arc::new(backend);
        (Controller::new(Arc::clone(&backend), Config::default()), backend)
    }

    /// Apply `n` background events, failing instead of hanging
    async fn pump(controller: &mut Controller<ScriptedBackend>, n: usize) {
        for _ in 0..n {
            let next = tokio::time::timeout(Duration::from_secs(5), controller.next_event()).await;
            assert_eq!(next, Ok(true), "expected another event");
        }
    }

    fn press(controller: &mut Controller<ScriptedBackend>, actions: &[Action]) {
        for action in actions {
            assert_eq!(controller.handle_action(*action), Flow::Continue);
        }
    }

    fn type_text(controller: &mut Controller<ScriptedBackend>, text: &str) {
        for c in text.chars() {
            controller.handle_action(Action::Insert(c));
        }
    }

    /// S2 Mathematics, with topics loaded
    async fn at_topics(controller: &mut Controller<ScriptedBackend>) {
        // S1 is first, S2 one down; Mathematics is the first subject
        press(controller, &[Action::Down, Action::Select, Action::Select]);
        assert_eq!(controller.session().view(), View::TopicBrowser);
        pump(controller, 1).await;
    }

    #[tokio::test]
    async fn topics_load_into_the_browser() {
        let (mut controller, backend) =
            controller(ScriptedBackend::new().with_response(r#"{"topics":["Sets","Numbers"]}"#));
        at_topics(&mut controller).await;

        let selection = controller.session().selection();
        assert_eq!(selection.class, Some(ClassLevel::S2));
        assert_eq!(selection.subject.map(|s| s.name), Some("Mathematics"));
        assert_eq!(controller.session().topic_list().unwrap().topics(), ["Sets", "Numbers"]);
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn notes_stream_into_the_viewer_and_copy() {
        let (mut controller, _) = controller(
            ScriptedBackend::new()
                .with_response(r#"{"topics":["Sets"]}"#)
                .with_stream(["# Sets\n\n", "A set is a **collection**."]),
        );
        at_topics(&mut controller).await;
        press(&mut controller, &[Action::Select]);
        assert_eq!(controller.session().view(), View::NoteViewer);
        assert!(controller.session().notes().unwrap().is_loading());

        pump(&mut controller, 1).await;
        assert!(!controller.session().notes().unwrap().is_loading());
        assert_eq!(controller.handle_action(Action::Copy), Flow::Continue);
        assert!(controller.ui().status.is_error);

        pump(&mut controller, 2).await;
        let notes = controller.session().notes().unwrap();
        assert_eq!(notes.phase(), BufferPhase::Complete);
        assert_eq!(notes.text(), "# Sets\n\nA set is a **collection**.");
        assert_eq!(controller.ui().note_view.document.blocks.len(), 2);

        let Flow::Copy(text) = controller.handle_action(Action::Copy) else {
            panic!("Expected clipboard text");
        };
        assert!(text.contains("A set is a collection."));
        assert!(!text.contains("**"));
    }

    #[tokio::test]
    async fn typed_topic_is_studied_like_a_listed_one() {
        let (mut controller, backend) = controller(
            ScriptedBackend::new()
                .with_response(r#"{"topics":["Sets"]}"#)
                .with_stream(["Probability notes"]),
        );
        at_topics(&mut controller).await;

        press(&mut controller, &[Action::Search]);
        assert!(controller.text_entry());
        type_text(&mut controller, "Probability");
        press(&mut controller, &[Action::Select]);

        assert_eq!(controller.session().selection().topic.as_deref(), Some("Probability"));
        pump(&mut controller, 2).await;
        assert_eq!(controller.session().notes().unwrap().text(), "Probability notes");
        assert!(!controller.text_entry());

        let requests = backend.requests();
        let prompt = requests[1].contents[0].visible_text();
        assert!(prompt.contains("Topic: \"Probability\""));
    }

    #[tokio::test]
    async fn failed_topic_fetch_offers_a_retry() {
        let (mut controller, backend) = controller(
            ScriptedBackend::new()
                .with_error(GeminiError::EmptyResponse)
                .with_response(r#"{"topics":["Sets"]}"#),
        );
        at_topics(&mut controller).await;
        assert_eq!(controller.session().topic_list().unwrap().topics(), [TOPICS_ERROR]);

        press(&mut controller, &[Action::Select]);
        assert_eq!(controller.session().view(), View::TopicBrowser);
        assert!(controller.session().topics_loading());

        pump(&mut controller, 1).await;
        assert_eq!(controller.session().topic_list().unwrap().topics(), ["Sets"]);
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn leaving_a_topic_drops_its_late_chunks() {
        let (mut controller, _) = controller(
            ScriptedBackend::new()
                .with_response(r#"{"topics":["Sets","Numbers"]}"#)
                .with_stream(["old topic"])
                .with_stream(["new topic"]),
        );
        at_topics(&mut controller).await;

        press(&mut controller, &[Action::Select, Action::Back, Action::Down, Action::Select]);
        assert_eq!(controller.session().selection().topic.as_deref(), Some("Numbers"));

        pump(&mut controller, 4).await;
        assert_eq!(controller.session().notes().unwrap().text(), "new topic");
    }

    #[tokio::test]
    async fn rejected_note_stream_shows_error_text() {
        let (mut controller, _) = controller(
            ScriptedBackend::new()
                .with_response(r#"{"topics":["Sets"]}"#)
                .with_rejected_stream(GeminiError::EmptyResponse),
        );
        at_topics(&mut controller).await;
        press(&mut controller, &[Action::Select]);
        pump(&mut controller, 1).await;

        let notes = controller.session().notes().unwrap();
        assert_eq!(notes.text(), NOTES_ERROR);
        assert_eq!(notes.phase(), BufferPhase::Failed);
    }

    #[tokio::test]
    async fn tabs_are_unavailable_at_the_root() {
        let (mut controller, _) = controller(ScriptedBackend::new());
        press(&mut controller, &[Action::NextTab]);
        assert_eq!(controller.session().tab(), Tab::Study);
        assert!(controller.chat().is_none());
        assert!(controller.ui().status.message.is_some());
    }

    #[tokio::test]
    async fn chat_round_trip() {
        let (mut controller, _) =
            controller(ScriptedBackend::new().with_stream(["Plants ", "make food."]));
        press(&mut controller, &[Action::Select, Action::GoToTab(Tab::Chat)]);
        assert_eq!(controller.chat().unwrap().transcript()[0].text, GREETING);
        assert!(controller.text_entry());

        type_text(&mut controller, "What is photosynthesis?");
        press(&mut controller, &[Action::Select]);
        assert!(controller.ui().chat_input.is_empty());
        assert!(controller.chat().unwrap().is_typing());

        type_text(&mut controller, "and respiration?");
        press(&mut controller, &[Action::Select]);
        assert_eq!(controller.ui().chat_input.as_str(), "and respiration?");

        pump(&mut controller, 3).await;
        let chat = controller.chat().unwrap();
        let last = chat.transcript().last().unwrap();
        assert_eq!(last.speaker, Speaker::Tutor);
        assert_eq!(last.text, "Plants make food.");
        assert_eq!(chat.history().len(), 2);
    }

    #[tokio::test]
    async fn chat_failure_becomes_an_apology() {
        let (mut controller, _) = controller(
            ScriptedBackend::new().with_failing_stream(["Half"], GeminiError::Cancelled),
        );
        press(&mut controller, &[Action::Select, Action::GoToTab(Tab::Chat)]);
        type_text(&mut controller, "hello");
        press(&mut controller, &[Action::Select]);
        pump(&mut controller, 2).await;

        let chat = controller.chat().unwrap();
        assert_eq!(chat.transcript().last().unwrap().text, CHAT_APOLOGY);
        assert!(chat.history().is_empty());
    }

    #[tokio::test]
    async fn switching_tabs_keeps_the_funnel() {
        let (mut controller, _) =
            controller(ScriptedBackend::new().with_response(r#"{"topics":["Sets"]}"#));
        at_topics(&mut controller).await;
        press(
            &mut controller,
            &[Action::GoToTab(Tab::Settings), Action::PrevTab, Action::NextTab, Action::NextTab],
        );
        assert_eq!(controller.session().tab(), Tab::Study);
        assert_eq!(controller.session().view(), View::TopicBrowser);
        assert_eq!(controller.session().topic_list().unwrap().topics(), ["Sets"]);
    }

    #[tokio::test]
    async fn home_clears_everything() {
        let (mut controller, _) =
            controller(ScriptedBackend::new().with_response(r#"{"topics":["Sets"]}"#));
        at_topics(&mut controller).await;
        press(&mut controller, &[Action::Search]);
        type_text(&mut controller, "se");
        press(&mut controller, &[Action::Home]);

        assert_eq!(controller.session().view(), View::ClassPicker);
        assert!(controller.ui().topic_search.is_empty());
        assert!(!controller.text_entry());
    }

    #[tokio::test]
    async fn cycling_the_model_saves_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let (controller, _) = controller(ScriptedBackend::new());
        let mut controller = controller.with_config_path(path.clone());

        press(&mut controller, &[Action::Select, Action::GoToTab(Tab::Settings)]);
        press(&mut controller, &[Action::CycleModel]);

        assert_ne!(controller.config().model, GeminiModel::Flash25);
        assert_eq!(Config::load_from(&path).unwrap().model, controller.config().model);
    }

    #[tokio::test]
    async fn new_model_applies_to_later_requests() {
        let (mut controller, backend) =
            controller(ScriptedBackend::new().with_response(r#"{"topics":["Sets"]}"#));
        press(
            &mut controller,
            &[Action::Down, Action::Select, Action::GoToTab(Tab::Settings), Action::CycleModel],
        );
        press(&mut controller, &[Action::GoToTab(Tab::Study), Action::Select]);
        pump(&mut controller, 1).await;

        assert_eq!(backend.requests()[0].model, controller.config().model);
    }
}
