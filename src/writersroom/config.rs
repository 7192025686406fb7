//! Environment-driven configuration.
//!
//! The orchestration core never reads the environment itself; everything it
//! needs arrives through [`ChatConfig`], resolved once before any session
//! starts. A missing required value is a fatal [`ConfigError`] whose message
//! names the variable to set.

use std::env;
use std::error::Error;
use std::fmt;

/// Base URL of the completion service, e.g. `https://myresource.openai.azure.com`.
pub const ENDPOINT_VAR: &str = "WRITERSROOM_ENDPOINT";
/// API key for the completion service.
pub const API_KEY_VAR: &str = "WRITERSROOM_API_KEY";
/// Deployment (model) identifier to route completions through.
pub const DEPLOYMENT_VAR: &str = "WRITERSROOM_DEPLOYMENT";
/// Optional override for the default system prompt.
pub const SYSTEM_PROMPT_VAR: &str = "WRITERSROOM_SYSTEM_PROMPT";

const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a participant in a collaborative writers' room session.";

/// Raised before any session starts when a required value is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(var) => write!(
                f,
                "missing required environment variable {}; export it before starting a session",
                var
            ),
        }
    }
}

impl Error for ConfigError {}

/// Connection settings for the completion service plus the default system
/// prompt used when callers don't supply their own.
#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub system_prompt: String,
}

impl ChatConfig {
    /// Resolve the configuration from the process environment.
    ///
    /// `WRITERSROOM_ENDPOINT`, `WRITERSROOM_API_KEY` and
    /// `WRITERSROOM_DEPLOYMENT` are required; empty values count as missing.
    /// `WRITERSROOM_SYSTEM_PROMPT` is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(ChatConfig {
            endpoint: require(ENDPOINT_VAR)?,
            api_key: require(API_KEY_VAR)?,
            deployment: require(DEPLOYMENT_VAR)?,
            system_prompt: env::var(SYSTEM_PROMPT_VAR)
                .ok()
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(var))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_names_the_variable() {
        let message = ConfigError::MissingVar(ENDPOINT_VAR).to_string();
        assert!(message.contains("WRITERSROOM_ENDPOINT"));
    }
}
