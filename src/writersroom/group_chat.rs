//! The group chat orchestrator.
//!
//! [`GroupChat`] ties the roster, the shared history, and the two control
//! strategies into one strictly sequential state machine:
//!
//! ```text
//! Seeded → loop {
//!     Selecting   — selection strategy picks the next speaker
//!     Speaking    — that agent produces a turn, appended to history
//!     Evaluating  — ceiling check, then (observed agents only) approval check
//! } → Terminated
//! ```
//!
//! [`GroupChat::invoke`] seeds the history with the user's input and hands
//! back a [`GroupChatRun`]: a lazy, finite, non-restartable producer that
//! yields each [`Turn`] as it is appended. Callers stream turns with
//! [`GroupChatRun::next_turn`] or collect the transcript with
//! [`GroupChatRun::run_to_end`]; simply dropping the run mid-session is fine —
//! turns already appended stay valid.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::writersroom::agent::ChatAgent;
use crate::writersroom::client_wrapper::ProviderError;
use crate::writersroom::history::{ChatHistory, Turn};
use crate::writersroom::selection::SelectionStrategy;
use crate::writersroom::termination::TerminationStrategy;

/// Why a session stopped producing turns.
///
/// Ceiling exhaustion is a normal terminal state, not an error: the transcript
/// produced so far is the session's result either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// The termination strategy read approval in an observed agent's turn.
    Approved,
    /// The configured maximum number of agent turns was reached.
    MaximumIterations,
}

/// Errors surfaced by the orchestrator.
#[derive(Debug)]
pub enum GroupChatError {
    /// A completion call failed; the session's remaining turns are aborted.
    Provider(ProviderError),
    /// A session was started with no agents in the roster.
    EmptyRoster,
    /// An agent was added under a name already present in the roster.
    DuplicateAgent(String),
}

impl fmt::Display for GroupChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupChatError::Provider(err) => write!(f, "provider failure: {}", err),
            GroupChatError::EmptyRoster => write!(f, "no agents in roster"),
            GroupChatError::DuplicateAgent(name) => {
                write!(f, "agent name already in roster: {}", name)
            }
        }
    }
}

impl Error for GroupChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GroupChatError::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProviderError> for GroupChatError {
    fn from(err: ProviderError) -> Self {
        GroupChatError::Provider(err)
    }
}

/// A turn-based collaborative session between a fixed cast of agents.
///
/// Owns the [`ChatHistory`] exclusively; every other component only ever sees
/// a read-only rendering of it. One `GroupChat` drives one session at a time —
/// invoking it again starts a fresh session with a fresh history.
pub struct GroupChat {
    session_id: Uuid,
    agents: Vec<Arc<ChatAgent>>,
    history: ChatHistory,
    selection: Arc<dyn SelectionStrategy>,
    termination: Arc<dyn TerminationStrategy>,
}

impl GroupChat {
    pub fn new(
        selection: Arc<dyn SelectionStrategy>,
        termination: Arc<dyn TerminationStrategy>,
    ) -> Self {
        GroupChat {
            session_id: Uuid::new_v4(),
            agents: Vec::new(),
            history: ChatHistory::new(),
            selection,
            termination,
        }
    }

    /// Add an agent to the roster. Names must be unique; the roster is fixed
    /// once a session starts.
    pub fn add_agent(&mut self, agent: ChatAgent) -> Result<(), GroupChatError> {
        if self.agents.iter().any(|a| a.name == agent.name) {
            return Err(GroupChatError::DuplicateAgent(agent.name));
        }
        self.agents.push(Arc::new(agent));
        Ok(())
    }

    pub fn agents(&self) -> &[Arc<ChatAgent>] {
        &self.agents
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Start a session: recreate the history, seed it with the user's input
    /// as a user turn, and return the run handle that produces agent turns.
    pub fn invoke(&mut self, user_input: impl Into<String>) -> Result<GroupChatRun<'_>, GroupChatError> {
        if self.agents.is_empty() {
            return Err(GroupChatError::EmptyRoster);
        }

        self.session_id = Uuid::new_v4();
        self.history = ChatHistory::new();
        self.history.append(Turn::user(user_input));
        log::info!("session {} seeded", self.session_id);

        Ok(GroupChatRun {
            chat: self,
            iterations: 0,
            end: None,
            failed: false,
        })
    }
}

/// One in-flight session: a lazy, finite, non-restartable sequence of turns.
///
/// Produced by [`GroupChat::invoke`]. Each [`next_turn`](Self::next_turn) call
/// drives the state machine through one Selecting → Speaking → Evaluating
/// cycle; after termination it keeps returning `Ok(None)`.
pub struct GroupChatRun<'a> {
    chat: &'a mut GroupChat,
    iterations: usize,
    end: Option<EndReason>,
    failed: bool,
}

impl<'a> GroupChatRun<'a> {
    /// Produce the next agent turn, or `None` once the session is over.
    ///
    /// A provider failure aborts the session's remaining turns and propagates;
    /// turns already appended to the history stay visible through
    /// [`GroupChat::history`].
    pub async fn next_turn(&mut self) -> Result<Option<Turn>, GroupChatError> {
        if self.failed || self.end.is_some() {
            return Ok(None);
        }
        match self.advance().await {
            Ok(turn) => Ok(Some(turn)),
            Err(err) => {
                log::error!(
                    "session {} aborted after {} turns: {}",
                    self.chat.session_id,
                    self.iterations,
                    err
                );
                self.failed = true;
                Err(err)
            }
        }
    }

    async fn advance(&mut self) -> Result<Turn, GroupChatError> {
        // Selecting
        let agent = self
            .chat
            .selection
            .select_next(&self.chat.history, &self.chat.agents)
            .await?;
        log::debug!("session {}: {} speaks next", self.chat.session_id, agent.name);

        // Speaking
        let turn = agent.produce_turn(&self.chat.history).await?;
        self.chat.history.append(turn.clone());

        // Evaluating
        self.iterations += 1;
        if self.iterations >= self.chat.termination.maximum_iterations() {
            log::info!(
                "session {} reached the iteration ceiling ({})",
                self.chat.session_id,
                self.iterations
            );
            self.end = Some(EndReason::MaximumIterations);
        } else if self.chat.termination.observes(&agent.name)
            && self.chat.termination.should_stop(&self.chat.history).await?
        {
            log::info!(
                "session {} approved after {} turns",
                self.chat.session_id,
                self.iterations
            );
            self.end = Some(EndReason::Approved);
        }

        Ok(turn)
    }

    /// Drain the run, collecting every remaining turn in order. Query
    /// [`end_reason`](Self::end_reason) afterwards to distinguish approval
    /// from ceiling exhaustion.
    pub async fn run_to_end(&mut self) -> Result<Vec<Turn>, GroupChatError> {
        let mut transcript = Vec::new();
        while let Some(turn) = self.next_turn().await? {
            transcript.push(turn);
        }
        Ok(transcript)
    }

    /// Number of agent turns produced so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Why the session ended, once it has.
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end
    }

    pub fn is_complete(&self) -> bool {
        self.failed || self.end.is_some()
    }

    pub fn history(&self) -> &ChatHistory {
        &self.chat.history
    }
}
