//! PostgreSQL implementation of ChatStore.

use crate::conversions::{chat_to_row, row_to_chat};
use crate::models::ChatSessionRow;
use crate::schema::chat_sessions;

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use fabula_error::{DatabaseError, FabulaResult};
use fabula_interface::{ChatContext, ChatSession, ChatStore};
use std::sync::Arc;
use tokio::sync::Mutex;

/// PostgreSQL implementation of ChatStore.
///
/// Sessions are single rows with the progress context held in one JSONB
/// column, rewritten whole on every phase update.
pub struct PostgresChatStore {
    conn: Arc<Mutex<PgConnection>>,
}

impl PostgresChatStore {
    /// Create a new PostgreSQL chat store.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a store from an `Arc<Mutex<PgConnection>>` (for sharing
    /// connections with a story store).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ChatStore for PostgresChatStore {
    async fn get_chat(&self, id: &str) -> FabulaResult<Option<ChatSession>> {
        let mut conn = self.conn.lock().await;
        let row: Option<ChatSessionRow> = chat_sessions::table
            .find(id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_chat).transpose().map_err(Into::into)
    }

    async fn insert_chat(&self, chat: ChatSession) -> FabulaResult<ChatSession> {
        let mut conn = self.conn.lock().await;
        diesel::insert_into(chat_sessions::table)
            .values(chat_to_row(&chat)?)
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        tracing::debug!(chat_id = %chat.id, "Inserted chat session");
        Ok(chat)
    }

    async fn update_chat_phase(
        &self,
        id: &str,
        context: ChatContext,
    ) -> FabulaResult<Option<ChatSession>> {
        let context_json = serde_json::to_value(&context).map_err(DatabaseError::from)?;
        let mut conn = self.conn.lock().await;
        let row: Option<ChatSessionRow> = diesel::update(chat_sessions::table.find(id))
            .set((
                chat_sessions::context.eq(context_json),
                chat_sessions::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_chat).transpose().map_err(Into::into)
    }
}
