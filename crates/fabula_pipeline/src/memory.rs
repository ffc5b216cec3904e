//! In-memory implementations of the stores for testing.
//!
//! HashMap-based stores protected by an RwLock. Cascade deletion mirrors the
//! relational schema's `ON DELETE CASCADE` rules. All data is lost when the
//! store is dropped.

use async_trait::async_trait;
use chrono::Utc;
use fabula_core::{
    Chapter, ChapterPatch, Character, CharacterPatch, Part, PartPatch, Scene, ScenePatch, Setting,
    SettingPatch, Story, StoryPatch,
};
use fabula_error::FabulaResult;
use fabula_interface::{ChatContext, ChatSession, ChatStore, StoryCounts, StoryStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct StoreInner {
    stories: HashMap<String, Story>,
    parts: HashMap<String, Part>,
    chapters: HashMap<String, Chapter>,
    scenes: HashMap<String, Scene>,
    characters: HashMap<String, Character>,
    settings: HashMap<String, Setting>,
}

/// In-memory story store.
///
/// # Example
/// ```no_run
/// use fabula_pipeline::InMemoryStoryStore;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryStoryStore::new();
///     // Use store.insert_story(), get_story(), etc.
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemoryStoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored stories (for testing).
    pub async fn story_count(&self) -> usize {
        self.inner.read().await.stories.len()
    }

    /// Clear all entities (for testing).
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        *inner = StoreInner::default();
    }
}

#[async_trait]
impl StoryStore for InMemoryStoryStore {
    async fn get_story(&self, id: &str) -> FabulaResult<Option<Story>> {
        Ok(self.inner.read().await.stories.get(id).cloned())
    }

    async fn insert_story(&self, story: Story) -> FabulaResult<Story> {
        self.inner
            .write()
            .await
            .stories
            .insert(story.id.clone(), story.clone());
        Ok(story)
    }

    async fn update_story(&self, id: &str, patch: StoryPatch) -> FabulaResult<Option<Story>> {
        let mut inner = self.inner.write().await;
        Ok(inner.stories.get_mut(id).map(|story| {
            story.apply(patch);
            story.clone()
        }))
    }

    async fn delete_story(&self, id: &str) -> FabulaResult<()> {
        let mut inner = self.inner.write().await;
        inner.stories.remove(id);
        inner.parts.retain(|_, p| p.story_id != id);
        inner.chapters.retain(|_, c| c.story_id != id);
        inner.scenes.retain(|_, s| s.story_id != id);
        inner.characters.retain(|_, c| c.story_id != id);
        inner.settings.retain(|_, s| s.story_id != id);
        Ok(())
    }

    async fn get_part(&self, id: &str) -> FabulaResult<Option<Part>> {
        Ok(self.inner.read().await.parts.get(id).cloned())
    }

    async fn insert_part(&self, part: Part) -> FabulaResult<Part> {
        self.inner
            .write()
            .await
            .parts
            .insert(part.id.clone(), part.clone());
        Ok(part)
    }

    async fn update_part(&self, id: &str, patch: PartPatch) -> FabulaResult<Option<Part>> {
        let mut inner = self.inner.write().await;
        Ok(inner.parts.get_mut(id).map(|part| {
            part.apply(patch);
            part.clone()
        }))
    }

    async fn delete_part(&self, id: &str) -> FabulaResult<()> {
        let mut inner = self.inner.write().await;
        inner.parts.remove(id);
        let orphaned: Vec<String> = inner
            .chapters
            .values()
            .filter(|c| c.part_id.as_deref() == Some(id))
            .map(|c| c.id.clone())
            .collect();
        inner.chapters.retain(|_, c| c.part_id.as_deref() != Some(id));
        inner
            .scenes
            .retain(|_, s| !orphaned.contains(&s.chapter_id));
        Ok(())
    }

    async fn list_parts(&self, story_id: &str) -> FabulaResult<Vec<Part>> {
        let inner = self.inner.read().await;
        let mut parts: Vec<Part> = inner
            .parts
            .values()
            .filter(|p| p.story_id == story_id)
            .cloned()
            .collect();
        parts.sort_by_key(|p| (p.order_index, p.id.clone()));
        Ok(parts)
    }

    async fn get_chapter(&self, id: &str) -> FabulaResult<Option<Chapter>> {
        Ok(self.inner.read().await.chapters.get(id).cloned())
    }

    async fn insert_chapter(&self, chapter: Chapter) -> FabulaResult<Chapter> {
        self.inner
            .write()
            .await
            .chapters
            .insert(chapter.id.clone(), chapter.clone());
        Ok(chapter)
    }

    async fn update_chapter(
        &self,
        id: &str,
        patch: ChapterPatch,
    ) -> FabulaResult<Option<Chapter>> {
        let mut inner = self.inner.write().await;
        Ok(inner.chapters.get_mut(id).map(|chapter| {
            chapter.apply(patch);
            chapter.clone()
        }))
    }

    async fn delete_chapter(&self, id: &str) -> FabulaResult<()> {
        let mut inner = self.inner.write().await;
        inner.chapters.remove(id);
        inner.scenes.retain(|_, s| s.chapter_id != id);
        Ok(())
    }

    async fn list_chapters(&self, story_id: &str) -> FabulaResult<Vec<Chapter>> {
        let inner = self.inner.read().await;
        let mut chapters: Vec<Chapter> = inner
            .chapters
            .values()
            .filter(|c| c.story_id == story_id)
            .cloned()
            .collect();
        chapters.sort_by_key(|c| (c.order_index, c.id.clone()));
        Ok(chapters)
    }

    async fn get_scene(&self, id: &str) -> FabulaResult<Option<Scene>> {
        Ok(self.inner.read().await.scenes.get(id).cloned())
    }

    async fn insert_scene(&self, scene: Scene) -> FabulaResult<Scene> {
        self.inner
            .write()
            .await
            .scenes
            .insert(scene.id.clone(), scene.clone());
        Ok(scene)
    }

    async fn update_scene(&self, id: &str, patch: ScenePatch) -> FabulaResult<Option<Scene>> {
        let mut inner = self.inner.write().await;
        Ok(inner.scenes.get_mut(id).map(|scene| {
            scene.apply(patch);
            scene.clone()
        }))
    }

    async fn delete_scene(&self, id: &str) -> FabulaResult<()> {
        self.inner.write().await.scenes.remove(id);
        Ok(())
    }

    async fn list_scenes(&self, story_id: &str) -> FabulaResult<Vec<Scene>> {
        let inner = self.inner.read().await;
        let mut scenes: Vec<Scene> = inner
            .scenes
            .values()
            .filter(|s| s.story_id == story_id)
            .cloned()
            .collect();
        scenes.sort_by_key(|s| (s.chapter_id.clone(), s.order_index, s.id.clone()));
        Ok(scenes)
    }

    async fn get_character(&self, id: &str) -> FabulaResult<Option<Character>> {
        Ok(self.inner.read().await.characters.get(id).cloned())
    }

    async fn insert_character(&self, character: Character) -> FabulaResult<Character> {
        self.inner
            .write()
            .await
            .characters
            .insert(character.id.clone(), character.clone());
        Ok(character)
    }

    async fn update_character(
        &self,
        id: &str,
        patch: CharacterPatch,
    ) -> FabulaResult<Option<Character>> {
        let mut inner = self.inner.write().await;
        Ok(inner.characters.get_mut(id).map(|character| {
            character.apply(patch);
            character.clone()
        }))
    }

    async fn delete_character(&self, id: &str) -> FabulaResult<()> {
        self.inner.write().await.characters.remove(id);
        Ok(())
    }

    async fn list_characters(&self, story_id: &str) -> FabulaResult<Vec<Character>> {
        let inner = self.inner.read().await;
        let mut characters: Vec<Character> = inner
            .characters
            .values()
            .filter(|c| c.story_id == story_id)
            .cloned()
            .collect();
        characters.sort_by_key(|c| (c.created_at, c.id.clone()));
        Ok(characters)
    }

    async fn get_setting(&self, id: &str) -> FabulaResult<Option<Setting>> {
        Ok(self.inner.read().await.settings.get(id).cloned())
    }

    async fn insert_setting(&self, setting: Setting) -> FabulaResult<Setting> {
        self.inner
            .write()
            .await
            .settings
            .insert(setting.id.clone(), setting.clone());
        Ok(setting)
    }

    async fn update_setting(
        &self,
        id: &str,
        patch: SettingPatch,
    ) -> FabulaResult<Option<Setting>> {
        let mut inner = self.inner.write().await;
        Ok(inner.settings.get_mut(id).map(|setting| {
            setting.apply(patch);
            setting.clone()
        }))
    }

    async fn delete_setting(&self, id: &str) -> FabulaResult<()> {
        self.inner.write().await.settings.remove(id);
        Ok(())
    }

    async fn list_settings(&self, story_id: &str) -> FabulaResult<Vec<Setting>> {
        let inner = self.inner.read().await;
        let mut settings: Vec<Setting> = inner
            .settings
            .values()
            .filter(|s| s.story_id == story_id)
            .cloned()
            .collect();
        settings.sort_by_key(|s| (s.created_at, s.id.clone()));
        Ok(settings)
    }

    async fn count_children(&self, story_id: &str) -> FabulaResult<StoryCounts> {
        let inner = self.inner.read().await;
        let scenes: Vec<&Scene> = inner
            .scenes
            .values()
            .filter(|s| s.story_id == story_id)
            .collect();
        Ok(StoryCounts {
            parts: inner.parts.values().filter(|p| p.story_id == story_id).count() as i64,
            chapters: inner
                .chapters
                .values()
                .filter(|c| c.story_id == story_id)
                .count() as i64,
            scenes: scenes.len() as i64,
            scenes_with_content: scenes.iter().filter(|s| !s.content.is_empty()).count() as i64,
            characters: inner
                .characters
                .values()
                .filter(|c| c.story_id == story_id)
                .count() as i64,
            settings: inner
                .settings
                .values()
                .filter(|s| s.story_id == story_id)
                .count() as i64,
        })
    }
}

/// In-memory chat-session store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatStore {
    chats: Arc<RwLock<HashMap<String, ChatSession>>>,
}

impl InMemoryChatStore {
    /// Create a new empty in-memory chat store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn get_chat(&self, id: &str) -> FabulaResult<Option<ChatSession>> {
        Ok(self.chats.read().await.get(id).cloned())
    }

    async fn insert_chat(&self, chat: ChatSession) -> FabulaResult<ChatSession> {
        self.chats
            .write()
            .await
            .insert(chat.id.clone(), chat.clone());
        Ok(chat)
    }

    async fn update_chat_phase(
        &self,
        id: &str,
        context: ChatContext,
    ) -> FabulaResult<Option<ChatSession>> {
        let mut chats = self.chats.write().await;
        Ok(chats.get_mut(id).map(|chat| {
            chat.context = context;
            chat.updated_at = Utc::now().naive_utc();
            chat.clone()
        }))
    }
}
