use async_trait::async_trait;
use std::error::Error;
use std::fmt;

/// A ClientWrapper is a wrapper around a specific cloud LLM completion service.
/// It provides the one capability everything else in the crate is built on:
/// given a block of steering instructions and a rendered conversation context,
/// produce a block of generated text.
///
/// Both the conversational agents and the two control prompts (speaker
/// selection, termination) go through this interface, so a single mock
/// implementation is enough to drive an entire session in tests.

/// Error raised when a completion call fails.
///
/// The crate never retries these; they propagate out of the orchestrator loop
/// and abort the remaining turns of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Transport-level failure (connection, TLS, timeout, malformed body).
    Http(String),
    /// The service answered with a non-success status code.
    Api { status: u16, message: String },
    /// The service answered successfully but returned no completion choices.
    EmptyResponse,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Http(msg) => write!(f, "completion request failed: {}", msg),
            ProviderError::Api { status, message } => {
                write!(f, "completion service returned HTTP {}: {}", status, message)
            }
            ProviderError::EmptyResponse => {
                write!(f, "completion service returned no choices")
            }
        }
    }
}

impl Error for ProviderError {}

/// Trait defining the interface to interact with a text-completion service.
#[async_trait]
pub trait ClientWrapper: Send + Sync {
    /// Generate text from a fixed instruction block and a conversation context.
    ///
    /// - `instructions`: the system-level steering text (an agent's persona or
    ///   a control prompt).
    /// - `context`: the rendered conversation transcript the model should act
    ///   on.
    async fn complete(&self, instructions: &str, context: &str) -> Result<String, ProviderError>;
}
