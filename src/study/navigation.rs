//! Navigation state machine
//!
//! Owns the study funnel (`View`), the orthogonal `Tab`, the `Selection`
//! that parameterizes generation, and the results of those generations.
//! Transitions are synchronous and return [`Effect`]s for the caller to run;
//! results come back through the `apply_*` methods tagged with the
//! [`RequestId`] that started them, so late results from an abandoned
//! selection are dropped.

use super::buffer::{GenerationBuffer, StreamUpdate};
use super::error::NavigationError;
use super::topics::TopicList;
use crate::catalog::{ClassLevel, Subject};

/// Identifies one generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Funnel screens, ordered by depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum View {
    #[default]
    ClassPicker,
    SubjectPicker,
    TopicBrowser,
    NoteViewer,
}

/// Top-level tabs; only `Study` shows the funnel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Study,
    Chat,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Study, Tab::Chat, Tab::Settings];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Study => "Study",
            Tab::Chat => "AI Tutor",
            Tab::Settings => "Settings",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Study => Tab::Chat,
            Tab::Chat => Tab::Settings,
            Tab::Settings => Tab::Study,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Study => Tab::Settings,
            Tab::Chat => Tab::Study,
            Tab::Settings => Tab::Chat,
        }
    }
}

/// Choices made so far in the funnel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub class: Option<ClassLevel>,
    pub subject: Option<&'static Subject>,
    pub topic: Option<String>,
}

/// Topic list for the current subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicState {
    /// Fetch in flight
    Loading(RequestId),
    Ready(TopicList),
}

/// Work the caller must start after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchTopics { request: RequestId, class: ClassLevel, subject: &'static Subject },
    StreamNotes { request: RequestId, class: ClassLevel, subject: &'static Subject, topic: String },
}

/// The study session
#[derive(Debug, Default)]
pub struct StudySession {
    view: View,
    tab: Tab,
    selection: Selection,
    topics: Option<TopicState>,
    notes: Option<GenerationBuffer>,
    next_request: u64,
}

impl StudySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn topics(&self) -> Option<&TopicState> {
        self.topics.as_ref()
    }

    /// Loaded topic list, if any
    pub fn topic_list(&self) -> Option<&TopicList> {
        match &self.topics {
            Some(TopicState::Ready(list)) => Some(list),
            _ => None,
        }
    }

    pub fn topics_loading(&self) -> bool {
        matches!(self.topics, Some(TopicState::Loading(_)))
    }

    pub fn notes(&self) -> Option<&GenerationBuffer> {
        self.notes.as_ref()
    }

    /// Tabs are hidden at the root of the funnel
    pub fn tabs_visible(&self) -> bool {
        self.view() != View::ClassPicker
    }

    fn issue_request(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    fn expect_study(&self, expected: View) -> Result<(), NavigationError> {
        if self.tab != Tab::Study {
            return Err(NavigationError::WrongTab(self.tab));
        }
        if self.view() != expected {
            return Err(NavigationError::WrongView { expected, actual: self.view() });
        }
        Ok(())
    }

    fn set_view(&mut self, view: View) {
        tracing::info!("View {:?} -> {:?}", self.view(), view);
        self.view = view;
        debug_assert!(self.is_consistent(), "inconsistent session: {:?}", self);
    }

    /// ClassPicker → SubjectPicker
    pub fn select_class(&mut self, class: ClassLevel) -> Result<(), NavigationError> {
        self.expect_study(View::ClassPicker)?;
        self.selection.class = Some(class);
        self.set_view(View::SubjectPicker);
        Ok(())
    }

    /// SubjectPicker → TopicBrowser; starts the topic fetch
    pub fn select_subject(&mut self, subject: &'static Subject) -> Result<Effect, NavigationError> {
        self.expect_study(View::SubjectPicker)?;
        let class = self.selection.class.ok_or(NavigationError::NothingSelected)?;

        self.selection.subject = Some(subject);
        let request = self.issue_request();
        self.topics = Some(TopicState::Loading(request));
        self.set_view(View::TopicBrowser);
        Ok(Effect::FetchTopics { request, class, subject })
    }

    /// TopicBrowser → NoteViewer; starts the note stream
    ///
    /// The failure pseudo-topic is not a real topic: choosing it fetches the
    /// topic list again and stays in the browser.
    pub fn select_topic(&mut self, topic: &str) -> Result<Effect, NavigationError> {
        self.expect_study(View::TopicBrowser)?;
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(NavigationError::EmptyTopic);
        }
        if self.topic_list().is_some_and(|list| list.is_failure_entry(topic)) {
            return self.retry_topics();
        }

        let (Some(class), Some(subject)) = (self.selection.class, self.selection.subject) else {
            return Err(NavigationError::NothingSelected);
        };

        self.selection.topic = Some(topic.to_string());
        let request = self.issue_request();
        self.notes = Some(GenerationBuffer::new(request));
        self.set_view(View::NoteViewer);
        Ok(Effect::StreamNotes { request, class, subject, topic: topic.to_string() })
    }

    /// Fetch the topic list for the current subject again
    pub fn retry_topics(&mut self) -> Result<Effect, NavigationError> {
        self.expect_study(View::TopicBrowser)?;
        let (Some(class), Some(subject)) = (self.selection.class, self.selection.subject) else {
            return Err(NavigationError::NothingSelected);
        };
        let request = self.issue_request();
        tracing::info!("Retrying topic fetch for {} {}", class, subject.name);
        self.topics = Some(TopicState::Loading(request));
        Ok(Effect::FetchTopics { request, class, subject })
    }

    /// One step back up the funnel, clearing the level being left
    pub fn back(&mut self) -> Result<(), NavigationError> {
        if self.tab != Tab::Study {
            return Err(NavigationError::WrongTab(self.tab));
        }
        match self.view() {
            View::ClassPicker => return Err(NavigationError::NothingSelected),
            View::SubjectPicker => {
                self.selection.class = None;
                self.set_view(View::ClassPicker);
            }
            View::TopicBrowser => {
                self.selection.subject = None;
                self.topics = None;
                self.set_view(View::SubjectPicker);
            }
            View::NoteViewer => {
                self.selection.topic = None;
                self.notes = None;
                self.set_view(View::TopicBrowser);
            }
        }
        Ok(())
    }

    /// Straight back to the class picker on the Study tab
    pub fn home(&mut self) {
        self.selection = Selection::default();
        self.topics = None;
        self.notes = None;
        self.tab = Tab::Study;
        self.set_view(View::ClassPicker);
    }

    /// Change tab; funnel state is untouched
    pub fn switch_tab(&mut self, tab: Tab) -> Result<(), NavigationError> {
        if tab != Tab::Study && !self.tabs_visible() {
            return Err(NavigationError::TabsHidden);
        }
        if tab != self.tab {
            tracing::debug!("Tab {:?} -> {:?}", self.tab, tab);
            self.tab = tab;
        }
        Ok(())
    }

    /// Install a fetched topic list; false if `request` is no longer awaited
    pub fn apply_topics(&mut self, request: RequestId, list: TopicList) -> bool {
        if self.topics != Some(TopicState::Loading(request)) {
            tracing::debug!("Dropping topics for stale request {:?}", request);
            return false;
        }
        self.topics = Some(TopicState::Ready(list));
        true
    }

    /// Feed a note stream step into the buffer it belongs to
    pub fn apply_note_update(&mut self, request: RequestId, update: &StreamUpdate) -> bool {
        match self.notes.as_mut() {
            Some(buffer) if buffer.request() == request => buffer.apply(update),
            _ => {
                tracing::trace!("Dropping note update for stale request {:?}", request);
                false
            }
        }
    }

    /// Depth invariants between view, selection and buffers
    pub fn is_consistent(&self) -> bool {
        let view = self.view();
        let s = &self.selection;
        let depth_ok = (view >= View::SubjectPicker) == s.class.is_some()
            && (view >= View::TopicBrowser) == s.subject.is_some()
            && (view >= View::TopicBrowser) == self.topics.is_some()
            && (view == View::NoteViewer) == s.topic.is_some()
            && (view == View::NoteViewer) == self.notes.is_some();
        let tab_ok = self.tab == Tab::Study || self.tabs_visible();
        depth_ok && tab_ok
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::catalog::{SUBJECTS, find_subject};
    use crate::study::topics::{TOPICS_ERROR, TopicList};

    fn maths() -> &'static Subject {
        find_subject("Mathematics").unwrap()
    }

    fn at_topics() -> (StudySession, RequestId) {
        let mut session = StudySession::new();
        session.select_class(ClassLevel::S2).unwrap();
        let Effect::FetchTopics { request, .. } = session.select_subject(maths()).unwrap() else {
            panic!("Expected topic fetch");
        };
        (session, request)
    }

    fn note_request(effect: Effect) -> RequestId {
        match effect {
            Effect::StreamNotes { request, .. } => request,
            other => panic!("Expected note stream, got {:?}", other),
        }
    }

    #[test]
    fn starts_at_class_picker_without_tabs() {
        let session = StudySession::new();
        assert_eq!(session.view(), View::ClassPicker);
        assert_eq!(session.tab(), Tab::Study);
        assert!(!session.tabs_visible());
        assert!(session.is_consistent());
    }

    #[test]
    fn forward_through_the_funnel() {
        let mut session = StudySession::new();
        session.select_class(ClassLevel::S2).unwrap();
        assert_eq!(session.view(), View::SubjectPicker);
        assert!(session.tabs_visible());

        let effect = session.select_subject(maths()).unwrap();
        assert!(matches!(
            effect,
            Effect::FetchTopics { class: ClassLevel::S2, subject, .. } if subject.name == "Mathematics"
        ));
        assert_eq!(session.view(), View::TopicBrowser);
        assert!(session.topics_loading());

        let effect = session.select_topic("Sets").unwrap();
        let Effect::StreamNotes { topic, .. } = &effect else {
            panic!("Expected note stream");
        };
        assert_eq!(topic, "Sets");
        assert_eq!(session.view(), View::NoteViewer);
        assert!(session.notes().unwrap().is_loading());
    }

    #[test]
    fn typed_topic_follows_the_same_path() {
        let (mut session, request) = at_topics();
        session.apply_topics(request, TopicList::syllabus(vec!["Numbers".into()]));

        let effect = session.select_topic("  Probability games ").unwrap();
        assert_eq!(
            effect,
            Effect::StreamNotes {
                request: session.notes().unwrap().request(),
                class: ClassLevel::S2,
                subject: maths(),
                topic: "Probability games".into(),
            }
        );
        assert_eq!(session.selection().topic.as_deref(), Some("Probability games"));
    }

    #[test]
    fn cannot_skip_levels() {
        let mut session = StudySession::new();
        assert_eq!(
            session.select_subject(maths()).unwrap_err(),
            NavigationError::WrongView { expected: View::SubjectPicker, actual: View::ClassPicker }
        );
        assert!(session.select_topic("Sets").is_err());
        assert_eq!(session.back().unwrap_err(), NavigationError::NothingSelected);
    }

    #[test]
    fn back_clears_one_level() {
        let (mut session, _) = at_topics();
        session.select_topic("Sets").unwrap();

        session.back().unwrap();
        assert_eq!(session.view(), View::TopicBrowser);
        assert_eq!(session.selection().topic, None);
        assert!(session.notes().is_none());
        assert!(session.selection().subject.is_some());

        session.back().unwrap();
        assert_eq!(session.view(), View::SubjectPicker);
        assert!(session.topics().is_none());
        assert_eq!(session.selection().class, Some(ClassLevel::S2));

        session.back().unwrap();
        assert_eq!(session.view(), View::ClassPicker);
        assert_eq!(session.selection(), &Selection::default());
    }

    #[test]
    fn home_resets_everything_and_the_tab() {
        let (mut session, _) = at_topics();
        session.switch_tab(Tab::Chat).unwrap();
        session.home();
        assert_eq!(session.view(), View::ClassPicker);
        assert_eq!(session.tab(), Tab::Study);
        assert_eq!(session.selection(), &Selection::default());
        assert!(session.topics().is_none());
    }

    #[test]
    fn tabs_hidden_at_root() {
        let mut session = StudySession::new();
        assert_eq!(session.switch_tab(Tab::Settings).unwrap_err(), NavigationError::TabsHidden);
        assert!(session.switch_tab(Tab::Study).is_ok());
    }

    #[test]
    fn tab_round_trip_preserves_funnel() {
        let (mut session, request) = at_topics();
        session.apply_topics(request, TopicList::syllabus(vec!["Sets".into()]));
        let notes = note_request(session.select_topic("Sets").unwrap());
        session.apply_note_update(notes, &StreamUpdate::Chunk("Hello ".into()));

        let view = session.view();
        let selection = session.selection().clone();
        let buffer = session.notes().cloned();

        session.switch_tab(Tab::Chat).unwrap();
        assert_eq!(session.back().unwrap_err(), NavigationError::WrongTab(Tab::Chat));
        session.switch_tab(Tab::Settings).unwrap();
        session.switch_tab(Tab::Study).unwrap();

        assert_eq!(session.view(), view);
        assert_eq!(session.selection(), &selection);
        assert_eq!(session.notes().cloned(), buffer);
    }

    #[test]
    fn stale_topics_are_dropped() {
        let (mut session, first) = at_topics();
        session.back().unwrap();
        let Effect::FetchTopics { request: second, .. } = session.select_subject(maths()).unwrap()
        else {
            panic!("Expected topic fetch");
        };

        assert!(!session.apply_topics(first, TopicList::fallback()));
        assert!(session.topics_loading());
        assert!(session.apply_topics(second, TopicList::fallback()));
        assert_eq!(session.topic_list(), Some(&TopicList::fallback()));
    }

    #[test]
    fn stale_note_chunks_never_reach_the_new_topic() {
        let (mut session, _) = at_topics();
        let first = note_request(session.select_topic("Sets").unwrap());
        session.back().unwrap();
        let second = note_request(session.select_topic("Algebra").unwrap());

        assert!(!session.apply_note_update(first, &StreamUpdate::Chunk("sets text".into())));
        assert!(session.apply_note_update(second, &StreamUpdate::Chunk("algebra text".into())));
        assert_eq!(session.notes().unwrap().text(), "algebra text");
    }

    #[test]
    fn failure_entry_refetches_topics() {
        let (mut session, request) = at_topics();
        session.apply_topics(request, TopicList::failed());

        let effect = session.select_topic(TOPICS_ERROR).unwrap();
        assert!(matches!(effect, Effect::FetchTopics { .. }));
        assert_eq!(session.view(), View::TopicBrowser);
        assert!(session.topics_loading());
    }

    #[test]
    fn empty_topic_is_rejected() {
        let (mut session, _) = at_topics();
        assert_eq!(session.select_topic("  ").unwrap_err(), NavigationError::EmptyTopic);
        assert_eq!(session.view(), View::TopicBrowser);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Class(usize),
        Subject(usize),
        Topic(String),
        Retry,
        Back,
        Home,
        SwitchTab(usize),
        TopicsArrive(u64),
        Chunk(u64),
        Finish(u64),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (0..4usize).prop_map(Step::Class),
            (0..SUBJECTS.len()).prop_map(Step::Subject),
            "[A-Za-z ]{0,12}".prop_map(Step::Topic),
            Just(Step::Retry),
            Just(Step::Back),
            Just(Step::Home),
            (0..3usize).prop_map(Step::SwitchTab),
            (0..20u64).prop_map(Step::TopicsArrive),
            (0..20u64).prop_map(Step::Chunk),
            (0..20u64).prop_map(Step::Finish),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_sequence(steps in proptest::collection::vec(step(), 0..60)) {
            let mut session = StudySession::new();
            for step in steps {
                match step {
                    Step::Class(i) => { let _ = session.select_class(ClassLevel::ALL[i]); }
                    Step::Subject(i) => { let _ = session.select_subject(&SUBJECTS[i]); }
                    Step::Topic(t) => { let _ = session.select_topic(&t); }
                    Step::Retry => { let _ = session.retry_topics(); }
                    Step::Back => { let _ = session.back(); }
                    Step::Home => session.home(),
                    Step::SwitchTab(i) => { let _ = session.switch_tab(Tab::ALL[i]); }
                    Step::TopicsArrive(id) => {
                        session.apply_topics(RequestId(id), TopicList::fallback());
                    }
                    Step::Chunk(id) => {
                        session.apply_note_update(RequestId(id), &StreamUpdate::Chunk("x".into()));
                    }
                    Step::Finish(id) => {
                        session.apply_note_update(RequestId(id), &StreamUpdate::Finished);
                    }
                }
                prop_assert!(session.is_consistent(), "{:?}", session);
                if let Some(buffer) = session.notes() {
                    prop_assert!(session.view() == View::NoteViewer);
                    prop_assert!(buffer.text().chars().all(|c| c == 'x') || !buffer.is_streaming());
                }
            }
        }
    }
}
