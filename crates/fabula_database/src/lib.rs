//! PostgreSQL integration for Fabula.
//!
//! This crate provides database models, schema definitions, and store
//! implementations for persisting the story aggregate and chat sessions.
//!
//! # Features
//!
//! - Diesel-based PostgreSQL integration
//! - Story aggregate persistence with cascade deletion
//! - Chat-session progress records
//! - Embedded migrations
//!
//! # Example
//!
//! ```rust,ignore
//! use fabula_database::{establish_connection, run_migrations, PostgresStoryStore};
//!
//! let mut conn = establish_connection()?;
//! run_migrations(&mut conn)?;
//! let store = PostgresStoryStore::new(conn);
//! ```

mod chat_store;
mod connection;
mod conversions;
mod models;
mod story_store;

// Public module for external access
pub mod schema;

// Re-export connection utilities
pub use connection::{establish_connection, run_migrations, MIGRATIONS};

// Re-export model types
pub use models::{
    ChapterChangeset, ChapterRow, CharacterChangeset, CharacterRow, ChatSessionRow, PartChangeset,
    PartRow, SceneChangeset, SceneRow, SettingChangeset, SettingRow, StoryChangeset, StoryRow,
};

// Re-export store implementations
pub use chat_store::PostgresChatStore;
pub use story_store::PostgresStoryStore;

use fabula_error::DatabaseError;

/// Result type for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
