//! Speaker selection.
//!
//! Deciding who talks next is delegated to the model itself: the strategy
//! renders a control prompt embedding the allowed participant names, the
//! hand-off rules, and the transcript, and asks the completion client for a
//! bare agent name. Because the answer is free text, parsing is lenient —
//! anything that is not an exact roster name resolves to a designated default
//! agent instead of failing. That fallback is policy, not error handling.
//!
//! The policy data (names, rules, default) lives in [`SelectionPolicy`],
//! separate from prompt rendering, so the routing rules can be swapped or unit
//! tested without ever invoking a model.

use async_trait::async_trait;
use std::sync::Arc;

use crate::writersroom::agent::ChatAgent;
use crate::writersroom::client_wrapper::ClientWrapper;
use crate::writersroom::group_chat::GroupChatError;
use crate::writersroom::history::ChatHistory;

/// Instructions sent with every selection control prompt.
const SELECTOR_INSTRUCTIONS: &str = "You choose which participant takes the next turn in a \
collaborative conversation. Answer with the name of exactly one participant and nothing else.";

/// Turn-taking policy for a session: who may speak, in what order, and who
/// speaks when the model's answer cannot be matched to a participant.
#[derive(Clone, Debug)]
pub struct SelectionPolicy {
    /// Names of every participant eligible to take a turn.
    pub participants: Vec<String>,
    /// Plain-language hand-off rules embedded in the control prompt, e.g.
    /// "After user input, it is CopyWriter's turn.".
    pub hand_off_rules: Vec<String>,
    /// Name of the agent chosen when the raw answer matches nothing.
    pub default_agent: String,
}

impl SelectionPolicy {
    pub fn new(participants: Vec<String>, default_agent: impl Into<String>) -> Self {
        SelectionPolicy {
            participants,
            hand_off_rules: Vec::new(),
            default_agent: default_agent.into(),
        }
    }

    /// Append one hand-off rule. Order is preserved in the rendered prompt.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.hand_off_rules.push(rule.into());
        self
    }

    /// Match a raw model answer against the participant list.
    ///
    /// Surrounding whitespace is ignored; anything short of an exact name
    /// match resolves to the default agent.
    pub fn resolve<'a>(&'a self, raw: &str) -> &'a str {
        let candidate = raw.trim();
        self.participants
            .iter()
            .map(String::as_str)
            .find(|name| *name == candidate)
            .unwrap_or(&self.default_agent)
    }

    /// Render the control prompt context for this policy and transcript.
    fn render_context(&self, transcript: &str) -> String {
        let mut prompt = String::from("Choose only from these participants:\n");
        for name in &self.participants {
            prompt.push_str("- ");
            prompt.push_str(name);
            prompt.push('\n');
        }
        prompt.push_str("\nAlways follow these rules when choosing the next participant:\n");
        for rule in &self.hand_off_rules {
            prompt.push_str("- ");
            prompt.push_str(rule);
            prompt.push('\n');
        }
        prompt.push_str("\nConversation so far:\n");
        prompt.push_str(transcript);
        prompt
    }
}

/// Strategy deciding which agent takes the next turn.
///
/// Implementations always return a member of the supplied roster; selection
/// never fails for parsing reasons, only when the underlying completion call
/// does.
#[async_trait]
pub trait SelectionStrategy: Send + Sync {
    async fn select_next(
        &self,
        history: &ChatHistory,
        roster: &[Arc<ChatAgent>],
    ) -> Result<Arc<ChatAgent>, GroupChatError>;
}

/// Model-driven selection: one control-prompt completion per decision.
pub struct PromptSelectionStrategy {
    client: Arc<dyn ClientWrapper>,
    policy: SelectionPolicy,
}

impl PromptSelectionStrategy {
    pub fn new(client: Arc<dyn ClientWrapper>, policy: SelectionPolicy) -> Self {
        PromptSelectionStrategy { client, policy }
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }
}

#[async_trait]
impl SelectionStrategy for PromptSelectionStrategy {
    async fn select_next(
        &self,
        history: &ChatHistory,
        roster: &[Arc<ChatAgent>],
    ) -> Result<Arc<ChatAgent>, GroupChatError> {
        let context = self.policy.render_context(&history.render());
        let raw = self
            .client
            .complete(SELECTOR_INSTRUCTIONS, &context)
            .await
            .map_err(GroupChatError::Provider)?;

        let chosen = self.policy.resolve(&raw);
        if chosen != raw.trim() {
            log::debug!(
                "selection answer {:?} matched no participant, falling back to {}",
                raw,
                chosen
            );
        }

        // The policy default is expected to name a roster member; should the
        // two ever disagree, the first roster agent stands in.
        match roster.iter().find(|agent| agent.name == chosen) {
            Some(agent) => Ok(agent.clone()),
            None => roster
                .first()
                .cloned()
                .ok_or(GroupChatError::EmptyRoster),
        }
    }
}
