//! Conversational participants.

use std::sync::Arc;

use crate::writersroom::client_wrapper::{ClientWrapper, ProviderError};
use crate::writersroom::history::{ChatHistory, Turn};

/// A named participant bound to a fixed instruction block and a completion
/// client. Immutable for the lifetime of a session.
///
/// A session's roster typically holds two of these, distinguished only by
/// `name` and `instructions`: a generator that proposes work and a critic that
/// reviews it.
pub struct ChatAgent {
    /// Display name, unique within a roster.
    pub name: String,
    /// The persona/steering text sent as the system instructions on every one
    /// of this agent's completion calls.
    pub instructions: String,
    client: Arc<dyn ClientWrapper>,
}

impl ChatAgent {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        client: Arc<dyn ClientWrapper>,
    ) -> Self {
        ChatAgent {
            name: name.into(),
            instructions: instructions.into(),
            client,
        }
    }

    /// Produce this agent's next turn given the conversation so far.
    ///
    /// One completion call: the agent's fixed instructions plus the rendered
    /// history. The raw response text is wrapped as an assistant turn tagged
    /// with the agent's name — no retries, no validation of the content.
    pub async fn produce_turn(&self, history: &ChatHistory) -> Result<Turn, ProviderError> {
        let raw = self
            .client
            .complete(&self.instructions, &history.render())
            .await?;
        Ok(Turn::assistant(self.name.as_str(), raw))
    }
}
