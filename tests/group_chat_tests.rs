use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use writersroom::{
    ChatAgent, ChatHistory, ClientWrapper, EndReason, GroupChat, GroupChatError, ProviderError,
    SelectionStrategy, TerminationStrategy,
};

/// Always answers with the same text.
struct FixedClient {
    response: String,
}

impl FixedClient {
    fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

#[async_trait]
impl ClientWrapper for FixedClient {
    async fn complete(&self, _instructions: &str, _context: &str) -> Result<String, ProviderError> {
        Ok(self.response.clone())
    }
}

/// Answers from a fixed script, one entry per call.
struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
}

impl ScriptedClient {
    fn new(script: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }
}

#[async_trait]
impl ClientWrapper for ScriptedClient {
    async fn complete(&self, _instructions: &str, _context: &str) -> Result<String, ProviderError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted client ran out of answers")
    }
}

/// Picks speakers in a fixed order, cycling.
struct ScriptedSelection {
    order: Vec<String>,
    cursor: AtomicUsize,
}

impl ScriptedSelection {
    fn new(order: &[&str]) -> Self {
        Self {
            order: order.iter().map(|s| s.to_string()).collect(),
            cursor: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SelectionStrategy for ScriptedSelection {
    async fn select_next(
        &self,
        _history: &ChatHistory,
        roster: &[Arc<ChatAgent>],
    ) -> Result<Arc<ChatAgent>, GroupChatError> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let name = &self.order[index % self.order.len()];
        Ok(roster
            .iter()
            .find(|agent| &agent.name == name)
            .expect("scripted speaker is in the roster")
            .clone())
    }
}

/// Termination stub that answers from a script and counts how often it is
/// actually consulted.
struct ScriptedTermination {
    observed: Vec<String>,
    maximum_iterations: usize,
    answers: Mutex<VecDeque<bool>>,
    checks: AtomicUsize,
}

impl ScriptedTermination {
    fn new(observed: &[&str], maximum_iterations: usize, answers: Vec<bool>) -> Self {
        Self {
            observed: observed.iter().map(|s| s.to_string()).collect(),
            maximum_iterations,
            answers: Mutex::new(answers.into_iter().collect()),
            checks: AtomicUsize::new(0),
        }
    }

    fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TerminationStrategy for ScriptedTermination {
    fn observed_agents(&self) -> &[String] {
        &self.observed
    }

    fn maximum_iterations(&self) -> usize {
        self.maximum_iterations
    }

    async fn should_stop(&self, _history: &ChatHistory) -> Result<bool, GroupChatError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
    }
}

#[tokio::test]
async fn approval_ends_session_right_after_the_observed_turn() {
    // CopyWriter speaks twice before the Reviewer approves; the termination
    // strategy must not be consulted between the two CopyWriter turns.
    let selection = Arc::new(ScriptedSelection::new(&[
        "CopyWriter",
        "CopyWriter",
        "Reviewer",
    ]));
    let termination = Arc::new(ScriptedTermination::new(&["Reviewer"], 10, vec![true]));

    let mut chat = GroupChat::new(selection, termination.clone());
    chat.add_agent(ChatAgent::new(
        "CopyWriter",
        "Propose one tagline.",
        Arc::new(FixedClient::new("Espresso yourself.")),
    ))
    .unwrap();
    chat.add_agent(ChatAgent::new(
        "Reviewer",
        "Approve or refine.",
        Arc::new(FixedClient::new("Approved.")),
    ))
    .unwrap();

    let mut run = chat.invoke("Write a tagline for a coffee shop.").unwrap();
    let transcript = run.run_to_end().await.unwrap();

    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[2].author.as_deref(), Some("Reviewer"));
    assert_eq!(transcript[2].text, "Approved.");
    assert_eq!(run.end_reason(), Some(EndReason::Approved));
    assert_eq!(termination.checks(), 1);

    // One seeded user turn plus one history entry per produced turn.
    assert_eq!(run.history().len(), 1 + transcript.len());
    assert_eq!(run.iterations(), transcript.len());
}

#[tokio::test]
async fn iteration_ceiling_is_absolute() {
    // Termination always answers false, so only the ceiling can stop the run.
    let selection = Arc::new(ScriptedSelection::new(&["CopyWriter", "Reviewer"]));
    let termination = Arc::new(ScriptedTermination::new(&["Reviewer"], 10, Vec::new()));

    let mut chat = GroupChat::new(selection, termination);
    chat.add_agent(ChatAgent::new(
        "CopyWriter",
        "Propose one tagline.",
        Arc::new(FixedClient::new("Another draft.")),
    ))
    .unwrap();
    chat.add_agent(ChatAgent::new(
        "Reviewer",
        "Approve or refine.",
        Arc::new(FixedClient::new("Not there yet.")),
    ))
    .unwrap();

    let mut run = chat.invoke("Write a tagline.").unwrap();
    let transcript = run.run_to_end().await.unwrap();

    assert_eq!(transcript.len(), 10);
    assert_eq!(run.end_reason(), Some(EndReason::MaximumIterations));
    assert_eq!(run.history().len(), 11);

    // The run is exhausted: further polls yield nothing and append nothing.
    assert_eq!(run.next_turn().await.unwrap(), None);
    assert_eq!(run.history().len(), 11);
}

#[tokio::test]
async fn provider_failure_aborts_but_preserves_history() {
    let selection = Arc::new(ScriptedSelection::new(&["CopyWriter"]));
    let termination = Arc::new(ScriptedTermination::new(&["Reviewer"], 10, Vec::new()));

    let mut chat = GroupChat::new(selection, termination);
    chat.add_agent(ChatAgent::new(
        "CopyWriter",
        "Propose one tagline.",
        Arc::new(ScriptedClient::new(vec![
            Ok("First draft.".to_string()),
            Err(ProviderError::Http("connection reset".to_string())),
        ])),
    ))
    .unwrap();
    chat.add_agent(ChatAgent::new(
        "Reviewer",
        "Approve or refine.",
        Arc::new(FixedClient::new("unused")),
    ))
    .unwrap();

    let mut run = chat.invoke("Write a tagline.").unwrap();

    let first = run.next_turn().await.unwrap().unwrap();
    assert_eq!(first.text, "First draft.");

    match run.next_turn().await {
        Err(GroupChatError::Provider(ProviderError::Http(msg))) => {
            assert_eq!(msg, "connection reset");
        }
        other => panic!("expected a provider error, got {:?}", other),
    }

    // The seeded user turn and the one successful agent turn survive.
    assert_eq!(run.history().len(), 2);
    assert_eq!(run.history().turns()[1].text, "First draft.");
    assert!(run.is_complete());
    assert_eq!(run.next_turn().await.unwrap(), None);
}

#[tokio::test]
async fn early_abandonment_leaves_history_intact() {
    let selection = Arc::new(ScriptedSelection::new(&["CopyWriter", "Reviewer"]));
    let termination = Arc::new(ScriptedTermination::new(&["Reviewer"], 10, Vec::new()));

    let mut chat = GroupChat::new(selection, termination);
    chat.add_agent(ChatAgent::new(
        "CopyWriter",
        "Propose one tagline.",
        Arc::new(FixedClient::new("A draft.")),
    ))
    .unwrap();
    chat.add_agent(ChatAgent::new(
        "Reviewer",
        "Approve or refine.",
        Arc::new(FixedClient::new("Hmm.")),
    ))
    .unwrap();

    {
        let mut run = chat.invoke("Write a tagline.").unwrap();
        let first = run.next_turn().await.unwrap().unwrap();
        assert_eq!(first.text, "A draft.");
        // Caller stops consuming here; the run is simply dropped.
    }

    assert_eq!(chat.history().len(), 2);
    assert_eq!(chat.history().turns()[1].text, "A draft.");
}

#[tokio::test]
async fn duplicate_agent_names_are_rejected() {
    let selection = Arc::new(ScriptedSelection::new(&["CopyWriter"]));
    let termination = Arc::new(ScriptedTermination::new(&[], 10, Vec::new()));

    let mut chat = GroupChat::new(selection, termination);
    chat.add_agent(ChatAgent::new(
        "CopyWriter",
        "first",
        Arc::new(FixedClient::new("a")),
    ))
    .unwrap();

    match chat.add_agent(ChatAgent::new(
        "CopyWriter",
        "second",
        Arc::new(FixedClient::new("b")),
    )) {
        Err(GroupChatError::DuplicateAgent(name)) => assert_eq!(name, "CopyWriter"),
        other => panic!("expected a duplicate agent error, got {:?}", other),
    }
}

#[tokio::test]
async fn invoking_an_empty_roster_fails() {
    let selection = Arc::new(ScriptedSelection::new(&["CopyWriter"]));
    let termination = Arc::new(ScriptedTermination::new(&[], 10, Vec::new()));

    let mut chat = GroupChat::new(selection, termination);
    match chat.invoke("hello") {
        Err(GroupChatError::EmptyRoster) => {}
        _ => panic!("expected an empty roster error"),
    }
}

#[tokio::test]
async fn each_invocation_starts_a_fresh_history() {
    let selection = Arc::new(ScriptedSelection::new(&["CopyWriter"]));
    let termination = Arc::new(ScriptedTermination::new(&["CopyWriter"], 10, vec![true, true]));

    let mut chat = GroupChat::new(selection, termination);
    chat.add_agent(ChatAgent::new(
        "CopyWriter",
        "Propose one tagline.",
        Arc::new(FixedClient::new("A draft.")),
    ))
    .unwrap();

    let first_session = chat.session_id();
    chat.invoke("first").unwrap().run_to_end().await.unwrap();
    assert_eq!(chat.history().turns()[0].text, "first");

    chat.invoke("second").unwrap().run_to_end().await.unwrap();
    assert_eq!(chat.history().turns()[0].text, "second");
    assert_eq!(chat.history().len(), 2);
    assert_ne!(chat.session_id(), first_session);
}
