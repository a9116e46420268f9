//! Error types for the study funnel and tutor chat

use thiserror::Error;

use super::navigation::{Tab, View};

/// A navigation action that is not valid in the current state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Action needs the {expected:?} view, but {actual:?} is showing")]
    WrongView { expected: View, actual: View },

    #[error("Study navigation is only available on the Study tab (now on {0:?})")]
    WrongTab(Tab),

    #[error("Tabs are hidden until a class is chosen")]
    TabsHidden,

    #[error("Topic is empty")]
    EmptyTopic,

    #[error("Nothing selected to go back from")]
    NothingSelected,
}

/// A chat send that cannot start
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Wait for the tutor to finish replying")]
    TurnInFlight,
}
