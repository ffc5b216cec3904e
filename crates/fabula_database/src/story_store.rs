//! PostgreSQL implementation of StoryStore.

use crate::conversions::{
    chapter_patch_to_changeset, chapter_to_row, character_patch_to_changeset, character_to_row,
    part_patch_to_changeset, part_to_row, row_to_chapter, row_to_character, row_to_part,
    row_to_scene, row_to_setting, row_to_story, scene_patch_to_changeset, scene_to_row,
    setting_patch_to_changeset, setting_to_row, story_patch_to_changeset, story_to_row,
};
use crate::models::{ChapterRow, CharacterRow, PartRow, SceneRow, SettingRow, StoryRow};
use crate::schema::{chapters, characters, parts, scenes, settings, stories};

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use fabula_core::{
    Chapter, ChapterPatch, Character, CharacterPatch, Part, PartPatch, Scene, ScenePatch, Setting,
    SettingPatch, Story, StoryPatch,
};
use fabula_error::{DatabaseError, FabulaResult};
use fabula_interface::{StoryCounts, StoryStore};
use std::sync::Arc;
use tokio::sync::Mutex;

/// PostgreSQL implementation of StoryStore using Diesel ORM.
///
/// Cascade deletion is enforced by the schema (`ON DELETE CASCADE` on every
/// child foreign key), so the store issues a single delete per aggregate.
///
/// # Example
/// ```no_run
/// use fabula_database::{establish_connection, PostgresStoryStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let conn = establish_connection()?;
/// let store = PostgresStoryStore::new(conn);
/// # Ok(())
/// # }
/// ```
pub struct PostgresStoryStore {
    /// Database connection wrapped in Arc<Mutex> for async safety.
    ///
    /// Note: This is a simple implementation. For production use, consider
    /// using a connection pool like r2d2 or deadpool.
    conn: Arc<Mutex<PgConnection>>,
}

impl PostgresStoryStore {
    /// Create a new PostgreSQL story store.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a store from an `Arc<Mutex<PgConnection>>` (for sharing
    /// connections with a chat store).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl StoryStore for PostgresStoryStore {
    async fn get_story(&self, id: &str) -> FabulaResult<Option<Story>> {
        let mut conn = self.conn.lock().await;
        let row: Option<StoryRow> = stories::table
            .find(id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_story).transpose().map_err(Into::into)
    }

    async fn insert_story(&self, story: Story) -> FabulaResult<Story> {
        let mut conn = self.conn.lock().await;
        diesel::insert_into(stories::table)
            .values(story_to_row(&story))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        tracing::debug!(story_id = %story.id, "Inserted story");
        Ok(story)
    }

    async fn update_story(&self, id: &str, patch: StoryPatch) -> FabulaResult<Option<Story>> {
        let mut conn = self.conn.lock().await;
        let row: Option<StoryRow> = diesel::update(stories::table.find(id))
            .set(story_patch_to_changeset(patch))
            .get_result(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_story).transpose().map_err(Into::into)
    }

    async fn delete_story(&self, id: &str) -> FabulaResult<()> {
        let mut conn = self.conn.lock().await;
        let deleted = diesel::delete(stories::table.find(id))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        tracing::debug!(story_id = %id, deleted, "Deleted story");
        Ok(())
    }

    async fn get_part(&self, id: &str) -> FabulaResult<Option<Part>> {
        let mut conn = self.conn.lock().await;
        let row: Option<PartRow> = parts::table
            .find(id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(row.map(row_to_part))
    }

    async fn insert_part(&self, part: Part) -> FabulaResult<Part> {
        let mut conn = self.conn.lock().await;
        diesel::insert_into(parts::table)
            .values(part_to_row(&part))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(part)
    }

    async fn update_part(&self, id: &str, patch: PartPatch) -> FabulaResult<Option<Part>> {
        let mut conn = self.conn.lock().await;
        let row: Option<PartRow> = diesel::update(parts::table.find(id))
            .set(part_patch_to_changeset(patch))
            .get_result(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        Ok(row.map(row_to_part))
    }

    async fn delete_part(&self, id: &str) -> FabulaResult<()> {
        let mut conn = self.conn.lock().await;
        diesel::delete(parts::table.find(id))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn list_parts(&self, story_id: &str) -> FabulaResult<Vec<Part>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<PartRow> = parts::table
            .filter(parts::story_id.eq(story_id))
            .order(parts::order_index.asc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(rows.into_iter().map(row_to_part).collect())
    }

    async fn get_chapter(&self, id: &str) -> FabulaResult<Option<Chapter>> {
        let mut conn = self.conn.lock().await;
        let row: Option<ChapterRow> = chapters::table
            .find(id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_chapter).transpose().map_err(Into::into)
    }

    async fn insert_chapter(&self, chapter: Chapter) -> FabulaResult<Chapter> {
        let mut conn = self.conn.lock().await;
        diesel::insert_into(chapters::table)
            .values(chapter_to_row(&chapter))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(chapter)
    }

    async fn update_chapter(
        &self,
        id: &str,
        patch: ChapterPatch,
    ) -> FabulaResult<Option<Chapter>> {
        let mut conn = self.conn.lock().await;
        let row: Option<ChapterRow> = diesel::update(chapters::table.find(id))
            .set(chapter_patch_to_changeset(patch))
            .get_result(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_chapter).transpose().map_err(Into::into)
    }

    async fn delete_chapter(&self, id: &str) -> FabulaResult<()> {
        let mut conn = self.conn.lock().await;
        diesel::delete(chapters::table.find(id))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn list_chapters(&self, story_id: &str) -> FabulaResult<Vec<Chapter>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<ChapterRow> = chapters::table
            .filter(chapters::story_id.eq(story_id))
            .order(chapters::order_index.asc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|row| row_to_chapter(row).map_err(Into::into))
            .collect()
    }

    async fn get_scene(&self, id: &str) -> FabulaResult<Option<Scene>> {
        let mut conn = self.conn.lock().await;
        let row: Option<SceneRow> = scenes::table
            .find(id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_scene).transpose().map_err(Into::into)
    }

    async fn insert_scene(&self, scene: Scene) -> FabulaResult<Scene> {
        let mut conn = self.conn.lock().await;
        diesel::insert_into(scenes::table)
            .values(scene_to_row(&scene))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(scene)
    }

    async fn update_scene(&self, id: &str, patch: ScenePatch) -> FabulaResult<Option<Scene>> {
        let mut conn = self.conn.lock().await;
        let row: Option<SceneRow> = diesel::update(scenes::table.find(id))
            .set(scene_patch_to_changeset(patch))
            .get_result(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_scene).transpose().map_err(Into::into)
    }

    async fn delete_scene(&self, id: &str) -> FabulaResult<()> {
        let mut conn = self.conn.lock().await;
        diesel::delete(scenes::table.find(id))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn list_scenes(&self, story_id: &str) -> FabulaResult<Vec<Scene>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<SceneRow> = scenes::table
            .filter(scenes::story_id.eq(story_id))
            .order((scenes::chapter_id.asc(), scenes::order_index.asc()))
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|row| row_to_scene(row).map_err(Into::into))
            .collect()
    }

    async fn get_character(&self, id: &str) -> FabulaResult<Option<Character>> {
        let mut conn = self.conn.lock().await;
        let row: Option<CharacterRow> = characters::table
            .find(id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_character).transpose().map_err(Into::into)
    }

    async fn insert_character(&self, character: Character) -> FabulaResult<Character> {
        let mut conn = self.conn.lock().await;
        diesel::insert_into(characters::table)
            .values(character_to_row(&character)?)
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(character)
    }

    async fn update_character(
        &self,
        id: &str,
        patch: CharacterPatch,
    ) -> FabulaResult<Option<Character>> {
        let mut conn = self.conn.lock().await;
        let row: Option<CharacterRow> = diesel::update(characters::table.find(id))
            .set(character_patch_to_changeset(patch)?)
            .get_result(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_character).transpose().map_err(Into::into)
    }

    async fn delete_character(&self, id: &str) -> FabulaResult<()> {
        let mut conn = self.conn.lock().await;
        diesel::delete(characters::table.find(id))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn list_characters(&self, story_id: &str) -> FabulaResult<Vec<Character>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<CharacterRow> = characters::table
            .filter(characters::story_id.eq(story_id))
            .order(characters::created_at.asc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|row| row_to_character(row).map_err(Into::into))
            .collect()
    }

    async fn get_setting(&self, id: &str) -> FabulaResult<Option<Setting>> {
        let mut conn = self.conn.lock().await;
        let row: Option<SettingRow> = settings::table
            .find(id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_setting).transpose().map_err(Into::into)
    }

    async fn insert_setting(&self, setting: Setting) -> FabulaResult<Setting> {
        let mut conn = self.conn.lock().await;
        diesel::insert_into(settings::table)
            .values(setting_to_row(&setting)?)
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(setting)
    }

    async fn update_setting(
        &self,
        id: &str,
        patch: SettingPatch,
    ) -> FabulaResult<Option<Setting>> {
        let mut conn = self.conn.lock().await;
        let row: Option<SettingRow> = diesel::update(settings::table.find(id))
            .set(setting_patch_to_changeset(patch)?)
            .get_result(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;
        row.map(row_to_setting).transpose().map_err(Into::into)
    }

    async fn delete_setting(&self, id: &str) -> FabulaResult<()> {
        let mut conn = self.conn.lock().await;
        diesel::delete(settings::table.find(id))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn list_settings(&self, story_id: &str) -> FabulaResult<Vec<Setting>> {
        let mut conn = self.conn.lock().await;
        let rows: Vec<SettingRow> = settings::table
            .filter(settings::story_id.eq(story_id))
            .order(settings::created_at.asc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        rows.into_iter()
            .map(|row| row_to_setting(row).map_err(Into::into))
            .collect()
    }

    async fn count_children(&self, story_id: &str) -> FabulaResult<StoryCounts> {
        let mut conn = self.conn.lock().await;

        let parts: i64 = parts::table
            .filter(parts::story_id.eq(story_id))
            .count()
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        let chapters: i64 = chapters::table
            .filter(chapters::story_id.eq(story_id))
            .count()
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        let scenes: i64 = scenes::table
            .filter(scenes::story_id.eq(story_id))
            .count()
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        let scenes_with_content: i64 = scenes::table
            .filter(scenes::story_id.eq(story_id))
            .filter(scenes::content.ne(""))
            .count()
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        let characters: i64 = characters::table
            .filter(characters::story_id.eq(story_id))
            .count()
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;
        let settings: i64 = settings::table
            .filter(settings::story_id.eq(story_id))
            .count()
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(StoryCounts {
            parts,
            chapters,
            scenes,
            scenes_with_content,
            characters,
            settings,
        })
    }
}
