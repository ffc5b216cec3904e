//! Entity store trait.

use async_trait::async_trait;
use fabula_core::{
    Chapter, ChapterPatch, Character, CharacterPatch, Part, PartPatch, Scene, ScenePatch, Setting,
    SettingPatch, Story, StoryPatch,
};
use fabula_error::FabulaResult;
use serde::{Deserialize, Serialize};

/// Row counts per child table for one story.
///
/// `scenes_with_content` counts scenes whose prose is non-empty; the store
/// records no other trace of which generation pass produced a scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryCounts {
    /// Number of parts
    pub parts: i64,
    /// Number of chapters
    pub chapters: i64,
    /// Number of scenes
    pub scenes: i64,
    /// Number of scenes with non-empty content
    pub scenes_with_content: i64,
    /// Number of characters
    pub characters: i64,
    /// Number of settings
    pub settings: i64,
}

/// Persistence operations over the six-entity story aggregate.
///
/// Implementations sit on a relational store (or an in-memory map for
/// tests) and are responsible for cascade deletion: removing a story
/// removes all of its parts, chapters, scenes, characters, and settings.
///
/// Conventions:
/// - `get_*` returns `Ok(None)` for a missing id, never an error.
/// - `insert_*` persists an entity the caller has already built (ids are
///   synthesized by `fabula_core` constructors, not by the store).
/// - `update_*` merges a patch and returns `Ok(None)` when zero rows match.
/// - `delete_*` is idempotent; deleting a missing id succeeds.
#[async_trait]
pub trait StoryStore: Send + Sync {
    /// Load a story by id.
    async fn get_story(&self, id: &str) -> FabulaResult<Option<Story>>;

    /// Persist a new story.
    async fn insert_story(&self, story: Story) -> FabulaResult<Story>;

    /// Merge a patch into a story.
    async fn update_story(&self, id: &str, patch: StoryPatch) -> FabulaResult<Option<Story>>;

    /// Delete a story and all descendants.
    async fn delete_story(&self, id: &str) -> FabulaResult<()>;

    /// Load a part by id.
    async fn get_part(&self, id: &str) -> FabulaResult<Option<Part>>;

    /// Persist a new part.
    async fn insert_part(&self, part: Part) -> FabulaResult<Part>;

    /// Merge a patch into a part.
    async fn update_part(&self, id: &str, patch: PartPatch) -> FabulaResult<Option<Part>>;

    /// Delete a part and its chapters.
    async fn delete_part(&self, id: &str) -> FabulaResult<()>;

    /// List a story's parts ordered by `order_index`.
    async fn list_parts(&self, story_id: &str) -> FabulaResult<Vec<Part>>;

    /// Load a chapter by id.
    async fn get_chapter(&self, id: &str) -> FabulaResult<Option<Chapter>>;

    /// Persist a new chapter.
    async fn insert_chapter(&self, chapter: Chapter) -> FabulaResult<Chapter>;

    /// Merge a patch into a chapter.
    async fn update_chapter(&self, id: &str, patch: ChapterPatch)
        -> FabulaResult<Option<Chapter>>;

    /// Delete a chapter and its scenes.
    async fn delete_chapter(&self, id: &str) -> FabulaResult<()>;

    /// List a story's chapters ordered by `order_index`.
    async fn list_chapters(&self, story_id: &str) -> FabulaResult<Vec<Chapter>>;

    /// Load a scene by id.
    async fn get_scene(&self, id: &str) -> FabulaResult<Option<Scene>>;

    /// Persist a new scene.
    async fn insert_scene(&self, scene: Scene) -> FabulaResult<Scene>;

    /// Merge a patch into a scene.
    async fn update_scene(&self, id: &str, patch: ScenePatch) -> FabulaResult<Option<Scene>>;

    /// Delete a scene.
    async fn delete_scene(&self, id: &str) -> FabulaResult<()>;

    /// List a story's scenes ordered by chapter then `order_index`.
    async fn list_scenes(&self, story_id: &str) -> FabulaResult<Vec<Scene>>;

    /// Load a character by id.
    async fn get_character(&self, id: &str) -> FabulaResult<Option<Character>>;

    /// Persist a new character.
    async fn insert_character(&self, character: Character) -> FabulaResult<Character>;

    /// Merge a patch into a character.
    async fn update_character(
        &self,
        id: &str,
        patch: CharacterPatch,
    ) -> FabulaResult<Option<Character>>;

    /// Delete a character.
    async fn delete_character(&self, id: &str) -> FabulaResult<()>;

    /// List a story's characters.
    async fn list_characters(&self, story_id: &str) -> FabulaResult<Vec<Character>>;

    /// Load a setting by id.
    async fn get_setting(&self, id: &str) -> FabulaResult<Option<Setting>>;

    /// Persist a new setting.
    async fn insert_setting(&self, setting: Setting) -> FabulaResult<Setting>;

    /// Merge a patch into a setting.
    async fn update_setting(&self, id: &str, patch: SettingPatch)
        -> FabulaResult<Option<Setting>>;

    /// Delete a setting.
    async fn delete_setting(&self, id: &str) -> FabulaResult<()>;

    /// List a story's settings.
    async fn list_settings(&self, story_id: &str) -> FabulaResult<Vec<Setting>>;

    /// Count child rows for a story in one pass.
    async fn count_children(&self, story_id: &str) -> FabulaResult<StoryCounts>;
}
