//! Diesel row models and update changesets.

use crate::schema::{chapters, characters, chat_sessions, parts, scenes, settings, stories};
use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Row in the `stories` table. The moral framework is stored flat.
#[derive(Debug, Clone, Queryable, Insertable, Identifiable)]
#[diesel(table_name = stories)]
pub struct StoryRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub genre: Option<String>,
    pub status: String,
    pub summary: String,
    pub tone: Option<String>,
    pub adversity: String,
    pub virtue: String,
    pub consequence: String,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update for a story row.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = stories)]
pub struct StoryChangeset {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub tone: Option<String>,
    pub adversity: Option<String>,
    pub virtue: Option<String>,
    pub consequence: Option<String>,
    pub image_url: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Row in the `parts` table.
#[derive(Debug, Clone, Queryable, Insertable, Identifiable, Associations)]
#[diesel(table_name = parts, belongs_to(StoryRow, foreign_key = story_id))]
pub struct PartRow {
    pub id: String,
    pub story_id: String,
    pub title: String,
    pub summary: String,
    pub order_index: i32,
    pub character_arc: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update for a part row.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = parts)]
pub struct PartChangeset {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub order_index: Option<i32>,
    pub character_arc: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Row in the `chapters` table.
#[derive(Debug, Clone, Queryable, Insertable, Identifiable, Associations)]
#[diesel(table_name = chapters, belongs_to(StoryRow, foreign_key = story_id))]
pub struct ChapterRow {
    pub id: String,
    pub story_id: String,
    pub part_id: Option<String>,
    pub character_id: Option<String>,
    pub title: String,
    pub summary: String,
    pub order_index: i32,
    pub arc_position: String,
    pub adversity_type: Option<String>,
    pub virtue_type: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update for a chapter row.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = chapters)]
pub struct ChapterChangeset {
    pub part_id: Option<String>,
    pub character_id: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub order_index: Option<i32>,
    pub arc_position: Option<String>,
    pub adversity_type: Option<String>,
    pub virtue_type: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Row in the `scenes` table.
#[derive(Debug, Clone, Queryable, Insertable, Identifiable, Associations)]
#[diesel(table_name = scenes, belongs_to(ChapterRow, foreign_key = chapter_id))]
pub struct SceneRow {
    pub id: String,
    pub story_id: String,
    pub chapter_id: String,
    pub title: String,
    pub content: String,
    pub order_index: i32,
    pub cycle_phase: String,
    pub emotional_beat: String,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update for a scene row.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = scenes)]
pub struct SceneChangeset {
    pub title: Option<String>,
    pub content: Option<String>,
    pub order_index: Option<i32>,
    pub cycle_phase: Option<String>,
    pub emotional_beat: Option<String>,
    pub image_url: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Row in the `characters` table. Personality is stored as JSONB.
#[derive(Debug, Clone, Queryable, Insertable, Identifiable, Associations)]
#[diesel(table_name = characters, belongs_to(StoryRow, foreign_key = story_id))]
pub struct CharacterRow {
    pub id: String,
    pub story_id: String,
    pub name: String,
    pub is_main: bool,
    pub role: Option<String>,
    pub core_trait: Option<String>,
    pub internal_flaw: Option<String>,
    pub external_goal: Option<String>,
    pub backstory: Option<String>,
    pub personality: serde_json::Value,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update for a character row.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = characters)]
pub struct CharacterChangeset {
    pub name: Option<String>,
    pub is_main: Option<bool>,
    pub role: Option<String>,
    pub core_trait: Option<String>,
    pub internal_flaw: Option<String>,
    pub external_goal: Option<String>,
    pub backstory: Option<String>,
    pub personality: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Row in the `settings` table. Element lists are stored as JSONB.
#[derive(Debug, Clone, Queryable, Insertable, Identifiable, Associations)]
#[diesel(table_name = settings, belongs_to(StoryRow, foreign_key = story_id))]
pub struct SettingRow {
    pub id: String,
    pub story_id: String,
    pub name: String,
    pub summary: String,
    pub adversity_elements: serde_json::Value,
    pub virtue_elements: serde_json::Value,
    pub consequence_elements: serde_json::Value,
    pub symbolic_meaning: Option<String>,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update for a setting row.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = settings)]
pub struct SettingChangeset {
    pub name: Option<String>,
    pub summary: Option<String>,
    pub adversity_elements: Option<serde_json::Value>,
    pub virtue_elements: Option<serde_json::Value>,
    pub consequence_elements: Option<serde_json::Value>,
    pub symbolic_meaning: Option<String>,
    pub image_url: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Row in the `chat_sessions` table. The progress context is one JSONB
/// document, read and rewritten whole.
#[derive(Debug, Clone, Queryable, Insertable, Identifiable)]
#[diesel(table_name = chat_sessions)]
pub struct ChatSessionRow {
    pub id: String,
    pub story_id: Option<String>,
    pub context: serde_json::Value,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
