//! The shared conversation log.
//!
//! A [`ChatHistory`] is an append-only ordered sequence of [`Turn`]s, owned by
//! the orchestrator and shared read-only with every other component. Append
//! order is the sole synchronization primitive: there are no timestamps and no
//! mutation or deletion operations. The control strategies never see the
//! history directly — they receive the deterministic textual transcript
//! produced by [`ChatHistory::render`], so repeated renders of the same
//! history must be byte-identical.

use std::fmt;

/// Role attached to a turn of conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// Steering text set by the developer.
    System,
    /// A message typed by the human user.
    User,
    /// A message generated by one of the agents.
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One produced unit of conversation. Immutable once appended to a history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    /// The role of whoever produced this turn.
    pub role: Role,
    /// Display name of the authoring agent, when one exists. User and system
    /// turns carry no author.
    pub author: Option<String>,
    /// The text of the turn.
    pub text: String,
}

impl Turn {
    /// A turn typed by the human user.
    pub fn user(text: impl Into<String>) -> Self {
        Turn {
            role: Role::User,
            author: None,
            text: text.into(),
        }
    }

    /// A turn generated by the named agent.
    pub fn assistant(author: impl Into<String>, text: impl Into<String>) -> Self {
        Turn {
            role: Role::Assistant,
            author: Some(author.into()),
            text: text.into(),
        }
    }

    /// The label used for this turn in a rendered transcript: the author name
    /// when present, otherwise the role.
    pub fn speaker(&self) -> &str {
        self.author.as_deref().unwrap_or_else(|| self.role.as_str())
    }
}

/// Append-only ordered log of [`Turn`]s for a single session.
#[derive(Debug, Default)]
pub struct ChatHistory {
    turns: Vec<Turn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        ChatHistory { turns: Vec::new() }
    }

    /// Add a turn to the end of the log. There is no validation beyond what
    /// the type system already guarantees, and no way to remove it afterwards.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Render the log as a textual transcript, one `speaker: text` line per
    /// turn, in append order.
    ///
    /// This is the sole view of conversation state the control strategies
    /// receive, so it is deterministic: the same history always renders to the
    /// same string, and a longer history renders to a string the shorter
    /// rendering is a prefix of.
    pub fn render(&self) -> String {
        let mut transcript = String::new();
        for turn in &self.turns {
            transcript.push_str(turn.speaker());
            transcript.push_str(": ");
            transcript.push_str(&turn.text);
            transcript.push('\n');
        }
        transcript
    }
}
