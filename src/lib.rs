//! # writersroom
//!
//! writersroom coordinates a small fixed cast of independently-instructed LLM
//! participants in a turn-based collaborative session. A model-driven
//! controller decides whose turn comes next and when the collaboration is
//! done; the crate supplies the bounded loop, the shared history, and the
//! deterministic fallback policies that keep free-text control decisions safe.
//!
//! The crate provides layered abstractions for:
//!
//! * **Shared history**: [`ChatHistory`], an append-only ordered log of
//!   [`Turn`]s whose deterministic rendering is the sole conversation state
//!   the control prompts ever see
//! * **Agents**: [`ChatAgent`], a named participant bound to fixed
//!   instructions and a [`ClientWrapper`] completion client
//! * **Speaker selection**: [`PromptSelectionStrategy`] driven by an explicit
//!   [`SelectionPolicy`] (allowed names, hand-off rules, default agent) so the
//!   routing policy is unit-testable without a model
//! * **Termination**: [`ApprovalTerminationStrategy`], consulted only after
//!   turns by its observed agents, plus a hard iteration ceiling enforced by
//!   the orchestrator as a liveness guarantee
//! * **Orchestration**: [`GroupChat`], whose [`invoke`](GroupChat::invoke)
//!   yields each turn as it is produced through a lazy, finite
//!   [`GroupChatRun`]
//!
//! ## Quickstart
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use writersroom::clients::openai::OpenAIClient;
//! use writersroom::{
//!     ApprovalTerminationStrategy, ChatAgent, ChatConfig, GroupChat,
//!     PromptSelectionStrategy, SelectionPolicy,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     writersroom::init_logger();
//!
//!     let config = ChatConfig::from_env()?;
//!     let client = Arc::new(OpenAIClient::from_config(&config));
//!
//!     let policy = SelectionPolicy::new(
//!         vec!["CopyWriter".to_string(), "Reviewer".to_string()],
//!         "CopyWriter",
//!     )
//!     .with_rule("After user input, it is CopyWriter's turn.")
//!     .with_rule("After CopyWriter replies, it is Reviewer's turn.")
//!     .with_rule("After Reviewer provides feedback, it is CopyWriter's turn.");
//!
//!     let selection = Arc::new(PromptSelectionStrategy::new(client.clone(), policy));
//!     let termination = Arc::new(
//!         ApprovalTerminationStrategy::new(client.clone()).observing("Reviewer"),
//!     );
//!
//!     let mut chat = GroupChat::new(selection, termination);
//!     chat.add_agent(ChatAgent::new(
//!         "CopyWriter",
//!         "You are a copywriter. Propose exactly one refined tagline per turn.",
//!         client.clone(),
//!     ))?;
//!     chat.add_agent(ChatAgent::new(
//!         "Reviewer",
//!         "You are an art director. Approve the copy or say how to refine it.",
//!         client,
//!     ))?;
//!
//!     let mut run = chat.invoke("Write a tagline for a coffee shop.")?;
//!     while let Some(turn) = run.next_turn().await? {
//!         println!("{}: {}", turn.speaker(), turn.text);
//!     }
//!     Ok(())
//! }
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Applications embedding writersroom can opt in to `RUST_LOG` driven
/// diagnostics without committing to a logging backend of their own.
///
/// ```rust
/// writersroom::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `writersroom` module.
pub mod writersroom;

// Re-exporting key items for easier external access.
pub use crate::writersroom::agent::ChatAgent;
pub use crate::writersroom::client_wrapper;
pub use crate::writersroom::client_wrapper::{ClientWrapper, ProviderError};
pub use crate::writersroom::clients;
pub use crate::writersroom::config::{ChatConfig, ConfigError};
pub use crate::writersroom::group_chat::{EndReason, GroupChat, GroupChatError, GroupChatRun};
pub use crate::writersroom::history::{ChatHistory, Role, Turn};
pub use crate::writersroom::selection::{
    PromptSelectionStrategy, SelectionPolicy, SelectionStrategy,
};
pub use crate::writersroom::termination::{
    ApprovalTerminationStrategy, TerminationStrategy, DEFAULT_MAXIMUM_ITERATIONS,
};
