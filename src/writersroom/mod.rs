// src/writersroom/mod.rs

pub mod agent;
pub mod client_wrapper;
pub mod clients;
pub mod config;
pub mod group_chat;
pub mod history;
pub mod selection;
pub mod termination;

// Explicitly export the orchestrator so callers reach it as
// writersroom::GroupChat instead of writersroom::group_chat::GroupChat.
pub use group_chat::GroupChat;
