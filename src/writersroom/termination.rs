//! Termination decisions.
//!
//! A session ends in one of two ways: the termination strategy reads approval
//! in the latest observed turn, or the orchestrator's iteration ceiling is
//! reached. The strategy here is model-driven like speaker selection — it asks
//! the completion client whether the most recent feedback constitutes
//! approval — but the answer is reduced to a boolean by a trivially testable
//! token check rather than trusting the model to answer in a fixed shape.
//!
//! The iteration ceiling is carried alongside the strategy but enforced by the
//! orchestrator unconditionally: both control prompts run on free-text model
//! output and cannot be proven to converge, so the ceiling is the liveness
//! guarantee, not an error path.

use async_trait::async_trait;
use std::sync::Arc;

use crate::writersroom::client_wrapper::ClientWrapper;
use crate::writersroom::group_chat::GroupChatError;
use crate::writersroom::history::ChatHistory;

/// Default hard ceiling on agent turns per session.
pub const DEFAULT_MAXIMUM_ITERATIONS: usize = 10;

/// Instructions sent with every termination control prompt.
const TERMINATOR_INSTRUCTIONS: &str = "You judge whether the most recent feedback in a \
collaborative conversation approves the proposed work. Answer with a single word: yes or no.";

/// True when the raw answer contains an affirmative token anywhere,
/// case-insensitively. Any other text in the answer is ignored.
pub fn is_affirmative(raw: &str) -> bool {
    raw.to_lowercase().contains("yes")
}

/// Strategy deciding whether a session should end.
///
/// Only consulted after a turn authored by one of its observed agents; the
/// orchestrator never invokes it for anyone else.
#[async_trait]
pub trait TerminationStrategy: Send + Sync {
    /// Names of the agents whose turns are subject to evaluation.
    fn observed_agents(&self) -> &[String];

    /// Hard ceiling on agent turns per session, enforced by the orchestrator
    /// regardless of what [`should_stop`](Self::should_stop) ever answers.
    fn maximum_iterations(&self) -> usize {
        DEFAULT_MAXIMUM_ITERATIONS
    }

    /// Whether a turn by the named agent triggers an evaluation.
    fn observes(&self, agent_name: &str) -> bool {
        self.observed_agents().iter().any(|name| name == agent_name)
    }

    /// Decide, from the conversation so far, whether the session is done.
    async fn should_stop(&self, history: &ChatHistory) -> Result<bool, GroupChatError>;
}

/// Model-driven approval check: one control-prompt completion per evaluation,
/// reduced to a boolean via [`is_affirmative`].
pub struct ApprovalTerminationStrategy {
    client: Arc<dyn ClientWrapper>,
    observed: Vec<String>,
    maximum_iterations: usize,
}

impl ApprovalTerminationStrategy {
    pub fn new(client: Arc<dyn ClientWrapper>) -> Self {
        ApprovalTerminationStrategy {
            client,
            observed: Vec::new(),
            maximum_iterations: DEFAULT_MAXIMUM_ITERATIONS,
        }
    }

    /// Add an agent whose turns trigger an approval check. Typically the
    /// critic; a generator turn never triggers one.
    pub fn observing(mut self, agent_name: impl Into<String>) -> Self {
        self.observed.push(agent_name.into());
        self
    }

    pub fn with_maximum_iterations(mut self, maximum_iterations: usize) -> Self {
        self.maximum_iterations = maximum_iterations;
        self
    }
}

#[async_trait]
impl TerminationStrategy for ApprovalTerminationStrategy {
    fn observed_agents(&self) -> &[String] {
        &self.observed
    }

    fn maximum_iterations(&self) -> usize {
        self.maximum_iterations
    }

    async fn should_stop(&self, history: &ChatHistory) -> Result<bool, GroupChatError> {
        let mut context = String::from("Conversation so far:\n");
        context.push_str(&history.render());
        context.push_str("\nHas the work been approved?");

        let raw = self
            .client
            .complete(TERMINATOR_INSTRUCTIONS, &context)
            .await
            .map_err(GroupChatError::Provider)?;

        Ok(is_affirmative(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_token_anywhere() {
        assert!(is_affirmative("Yes, approved"));
        assert!(is_affirmative("yES"));
        assert!(is_affirmative("well, yes it is"));
    }

    #[test]
    fn negative_answers() {
        assert!(!is_affirmative("no, needs work"));
        assert!(!is_affirmative("approved"));
        assert!(!is_affirmative(""));
    }
}
