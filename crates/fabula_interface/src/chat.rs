//! Chat-session records and their store.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use fabula_core::{new_entity_id, GenerationPhase};
use fabula_error::FabulaResult;
use serde::{Deserialize, Serialize};

/// Generation progress held inside a chat session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    /// Phase the session is currently working through
    #[serde(default)]
    pub current_phase: Option<GenerationPhase>,
    /// Phases marked complete, in the order they completed
    #[serde(default)]
    pub completed_phases: Vec<GenerationPhase>,
}

/// A chat session driving generation for one story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique identifier (`chat_<millis>_<suffix>`)
    pub id: String,
    /// Story the session is generating
    pub story_id: Option<String>,
    /// Progress context
    #[serde(default)]
    pub context: ChatContext,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

impl ChatSession {
    /// Build a fresh session, synthesizing the id.
    pub fn create(story_id: Option<String>) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: new_entity_id("chat"),
            story_id,
            context: ChatContext::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Store for chat-session records.
///
/// Sessions are opaque documents keyed by chat id; the orchestration layer
/// only reads and rewrites the nested `context`.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Load a session by id.
    async fn get_chat(&self, id: &str) -> FabulaResult<Option<ChatSession>>;

    /// Persist a new session.
    async fn insert_chat(&self, chat: ChatSession) -> FabulaResult<ChatSession>;

    /// Replace a session's progress context and stamp `updated_at`.
    /// Returns `Ok(None)` when the session does not exist.
    async fn update_chat_phase(
        &self,
        id: &str,
        context: ChatContext,
    ) -> FabulaResult<Option<ChatSession>>;
}
