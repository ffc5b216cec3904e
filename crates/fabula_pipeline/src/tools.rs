//! Tool-facing CRUD envelopes over the entity store.
//!
//! Each operation returns the uniform `ToolOutcome` envelope; a missing
//! entity comes back as `{"success": false, "error": "<Entity> not found"}`
//! rather than an error type, so tool-calling harnesses can branch on
//! `success` alone.

use fabula_core::{
    Chapter, ChapterPatch, Character, CharacterPatch, NewChapter, NewCharacter, NewPart, NewScene,
    NewSetting, NewStory, Part, PartPatch, Scene, ScenePatch, Setting, SettingPatch, Story,
    StoryPatch,
};
use fabula_interface::{StoryStore, ToolOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Envelope payload carrying one story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryPayload {
    /// The story
    pub story: Story,
}

/// Envelope payload carrying one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartPayload {
    /// The part
    pub part: Part,
}

/// Envelope payload carrying one chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterPayload {
    /// The chapter
    pub chapter: Chapter,
}

/// Envelope payload carrying one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePayload {
    /// The scene
    pub scene: Scene,
}

/// Envelope payload carrying one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterPayload {
    /// The character
    pub character: Character,
}

/// Envelope payload carrying one setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingPayload {
    /// The setting
    pub setting: Setting,
}

/// Envelope payload for deletions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletePayload {
    /// What happened
    pub message: String,
}

/// Typed CRUD accessors over the entity store.
///
/// Creation synthesizes ids and applies entity defaults through the
/// `fabula_core` constructors; deletion is idempotent and relies on the
/// store's cascade rules for descendants.
pub struct StoryTools {
    store: Arc<dyn StoryStore>,
}

impl StoryTools {
    /// Create the tool surface over a store.
    pub fn new(store: Arc<dyn StoryStore>) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &Arc<dyn StoryStore> {
        &self.store
    }

    /// Returns the failure message when the story is missing or unreadable.
    async fn require_story(&self, story_id: &str) -> Option<String> {
        match self.store.get_story(story_id).await {
            Ok(Some(_)) => None,
            Ok(None) => Some("Story not found".to_string()),
            Err(e) => Some(e.to_string()),
        }
    }

    /// Fetch a story by id.
    #[instrument(skip(self))]
    pub async fn get_story(&self, story_id: &str) -> ToolOutcome<StoryPayload> {
        match self.store.get_story(story_id).await {
            Ok(Some(story)) => ToolOutcome::ok(StoryPayload { story }),
            Ok(None) => ToolOutcome::err("Story not found"),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Create a story.
    #[instrument(skip(self, spec), fields(title = %spec.title))]
    pub async fn create_story(&self, spec: NewStory) -> ToolOutcome<StoryPayload> {
        match self.store.insert_story(Story::create(spec)).await {
            Ok(story) => ToolOutcome::ok(StoryPayload { story }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Merge a patch into a story.
    #[instrument(skip(self, patch))]
    pub async fn update_story(
        &self,
        story_id: &str,
        patch: StoryPatch,
    ) -> ToolOutcome<StoryPayload> {
        match self.store.update_story(story_id, patch).await {
            Ok(Some(story)) => ToolOutcome::ok(StoryPayload { story }),
            Ok(None) => ToolOutcome::err("Story not found"),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Delete a story and all of its descendants. Deleting a missing id is
    /// not an error.
    #[instrument(skip(self))]
    pub async fn delete_story(&self, story_id: &str) -> ToolOutcome<DeletePayload> {
        match self.store.delete_story(story_id).await {
            Ok(()) => ToolOutcome::ok(DeletePayload {
                message: "Story deleted".to_string(),
            }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Create a part under a story.
    #[instrument(skip(self, spec), fields(story_id = %spec.story_id))]
    pub async fn create_part(&self, spec: NewPart) -> ToolOutcome<PartPayload> {
        if let Some(error) = self.require_story(&spec.story_id).await {
            return ToolOutcome::err(error);
        }
        match self.store.insert_part(Part::create(spec)).await {
            Ok(part) => ToolOutcome::ok(PartPayload { part }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Merge a patch into a part.
    #[instrument(skip(self, patch))]
    pub async fn update_part(&self, part_id: &str, patch: PartPatch) -> ToolOutcome<PartPayload> {
        match self.store.update_part(part_id, patch).await {
            Ok(Some(part)) => ToolOutcome::ok(PartPayload { part }),
            Ok(None) => ToolOutcome::err("Part not found"),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Delete a part and its chapters.
    #[instrument(skip(self))]
    pub async fn delete_part(&self, part_id: &str) -> ToolOutcome<DeletePayload> {
        match self.store.delete_part(part_id).await {
            Ok(()) => ToolOutcome::ok(DeletePayload {
                message: "Part deleted".to_string(),
            }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Create a chapter under a story.
    #[instrument(skip(self, spec), fields(story_id = %spec.story_id))]
    pub async fn create_chapter(&self, spec: NewChapter) -> ToolOutcome<ChapterPayload> {
        if let Some(error) = self.require_story(&spec.story_id).await {
            return ToolOutcome::err(error);
        }
        match self.store.insert_chapter(Chapter::create(spec)).await {
            Ok(chapter) => ToolOutcome::ok(ChapterPayload { chapter }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Merge a patch into a chapter.
    #[instrument(skip(self, patch))]
    pub async fn update_chapter(
        &self,
        chapter_id: &str,
        patch: ChapterPatch,
    ) -> ToolOutcome<ChapterPayload> {
        match self.store.update_chapter(chapter_id, patch).await {
            Ok(Some(chapter)) => ToolOutcome::ok(ChapterPayload { chapter }),
            Ok(None) => ToolOutcome::err("Chapter not found"),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Delete a chapter and its scenes.
    #[instrument(skip(self))]
    pub async fn delete_chapter(&self, chapter_id: &str) -> ToolOutcome<DeletePayload> {
        match self.store.delete_chapter(chapter_id).await {
            Ok(()) => ToolOutcome::ok(DeletePayload {
                message: "Chapter deleted".to_string(),
            }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Create a scene under a chapter. New scenes default to cycle phase
    /// `setup` and emotional beat `hope`.
    #[instrument(skip(self, spec), fields(chapter_id = %spec.chapter_id))]
    pub async fn create_scene(&self, spec: NewScene) -> ToolOutcome<ScenePayload> {
        match self.store.get_chapter(&spec.chapter_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return ToolOutcome::err("Chapter not found"),
            Err(e) => return ToolOutcome::err(e.to_string()),
        }
        match self.store.insert_scene(Scene::create(spec)).await {
            Ok(scene) => ToolOutcome::ok(ScenePayload { scene }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Merge a patch into a scene.
    #[instrument(skip(self, patch))]
    pub async fn update_scene(
        &self,
        scene_id: &str,
        patch: ScenePatch,
    ) -> ToolOutcome<ScenePayload> {
        match self.store.update_scene(scene_id, patch).await {
            Ok(Some(scene)) => ToolOutcome::ok(ScenePayload { scene }),
            Ok(None) => ToolOutcome::err("Scene not found"),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Delete a scene.
    #[instrument(skip(self))]
    pub async fn delete_scene(&self, scene_id: &str) -> ToolOutcome<DeletePayload> {
        match self.store.delete_scene(scene_id).await {
            Ok(()) => ToolOutcome::ok(DeletePayload {
                message: "Scene deleted".to_string(),
            }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Create a character under a story.
    #[instrument(skip(self, spec), fields(story_id = %spec.story_id))]
    pub async fn create_character(&self, spec: NewCharacter) -> ToolOutcome<CharacterPayload> {
        if let Some(error) = self.require_story(&spec.story_id).await {
            return ToolOutcome::err(error);
        }
        match self.store.insert_character(Character::create(spec)).await {
            Ok(character) => ToolOutcome::ok(CharacterPayload { character }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Merge a patch into a character.
    #[instrument(skip(self, patch))]
    pub async fn update_character(
        &self,
        character_id: &str,
        patch: CharacterPatch,
    ) -> ToolOutcome<CharacterPayload> {
        match self.store.update_character(character_id, patch).await {
            Ok(Some(character)) => ToolOutcome::ok(CharacterPayload { character }),
            Ok(None) => ToolOutcome::err("Character not found"),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Delete a character.
    #[instrument(skip(self))]
    pub async fn delete_character(&self, character_id: &str) -> ToolOutcome<DeletePayload> {
        match self.store.delete_character(character_id).await {
            Ok(()) => ToolOutcome::ok(DeletePayload {
                message: "Character deleted".to_string(),
            }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Create a setting under a story.
    #[instrument(skip(self, spec), fields(story_id = %spec.story_id))]
    pub async fn create_setting(&self, spec: NewSetting) -> ToolOutcome<SettingPayload> {
        if let Some(error) = self.require_story(&spec.story_id).await {
            return ToolOutcome::err(error);
        }
        match self.store.insert_setting(Setting::create(spec)).await {
            Ok(setting) => ToolOutcome::ok(SettingPayload { setting }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Merge a patch into a setting.
    #[instrument(skip(self, patch))]
    pub async fn update_setting(
        &self,
        setting_id: &str,
        patch: SettingPatch,
    ) -> ToolOutcome<SettingPayload> {
        match self.store.update_setting(setting_id, patch).await {
            Ok(Some(setting)) => ToolOutcome::ok(SettingPayload { setting }),
            Ok(None) => ToolOutcome::err("Setting not found"),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }

    /// Delete a setting.
    #[instrument(skip(self))]
    pub async fn delete_setting(&self, setting_id: &str) -> ToolOutcome<DeletePayload> {
        match self.store.delete_setting(setting_id).await {
            Ok(()) => ToolOutcome::ok(DeletePayload {
                message: "Setting deleted".to_string(),
            }),
            Err(e) => ToolOutcome::err(e.to_string()),
        }
    }
}
