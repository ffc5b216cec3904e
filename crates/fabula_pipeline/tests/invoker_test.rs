//! Tests for the generation invoker against a scripted driver.

use async_trait::async_trait;
use fabula_core::{GenerationPhase, NewChapter, NewStory};
use fabula_error::{FabulaResult, HttpError};
use fabula_interface::{PhaseGenerator, PhaseRequest, StoryStore};
use fabula_pipeline::{GenerationInvoker, InMemoryStoryStore, StoryTools};
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Driver that replays canned bodies instead of calling a server.
#[derive(Clone, Default)]
struct ScriptedGenerator {
    responses: Arc<Mutex<HashMap<GenerationPhase, Result<JsonValue, String>>>>,
    calls: Arc<Mutex<Vec<(GenerationPhase, PhaseRequest)>>>,
}

impl ScriptedGenerator {
    fn respond(self, phase: GenerationPhase, body: JsonValue) -> Self {
        self.responses.lock().unwrap().insert(phase, Ok(body));
        self
    }

    fn fail(self, phase: GenerationPhase, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(phase, Err(message.to_string()));
        self
    }

    fn calls(&self) -> Vec<(GenerationPhase, PhaseRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhaseGenerator for ScriptedGenerator {
    async fn run_phase(
        &self,
        phase: GenerationPhase,
        request: &PhaseRequest,
    ) -> FabulaResult<JsonValue> {
        self.calls.lock().unwrap().push((phase, request.clone()));
        match self.responses.lock().unwrap().get(&phase) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => Err(HttpError::new(message.clone()).into()),
            None => Err(HttpError::new("no scripted response").into()),
        }
    }
}

async fn seeded_story(store: &Arc<dyn StoryStore>) -> String {
    let tools = StoryTools::new(store.clone());
    tools
        .create_story(NewStory {
            user_id: "user_1".into(),
            title: "The Long Winter".into(),
            summary: Some("A hook".into()),
            ..Default::default()
        })
        .await
        .payload()
        .expect("story")
        .story
        .id
        .clone()
}

#[tokio::test]
async fn test_generate_characters_persists_and_relays() {
    let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
    let story_id = seeded_story(&store).await;

    let driver = ScriptedGenerator::default().respond(
        GenerationPhase::Characters,
        json!({
            "characters": [
                {"name": "Mara", "isMain": true, "role": "protagonist"},
                {"name": "Old Ferris", "coreTrait": "stubborn"}
            ]
        }),
    );
    let invoker = GenerationInvoker::new(driver, store.clone());

    let outcome = invoker.generate_characters(&story_id).await;
    assert!(outcome.success);
    let payload = outcome.payload().expect("payload");
    assert_eq!(payload.message, "Generated 2 characters");
    assert_eq!(payload.characters.len(), 2);
    assert!(payload.characters[0].id.starts_with("char_"));
    assert!(payload.characters.iter().all(|c| c.story_id == story_id));

    let stored = store.list_characters(&story_id).await.unwrap();
    assert_eq!(stored.len(), 2);
}

#[tokio::test]
async fn test_upstream_failure_collapses_to_phase_message() {
    let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
    let story_id = seeded_story(&store).await;

    let driver =
        ScriptedGenerator::default().fail(GenerationPhase::Characters, "Server returned: 500");
    let invoker = GenerationInvoker::new(driver, store.clone());

    let outcome = invoker.generate_characters(&story_id).await;
    assert!(!outcome.success);
    assert_eq!(outcome.error(), Some("Character generation failed"));
    // No partial rows on failure.
    assert!(store.list_characters(&story_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_collapses_to_phase_message() {
    let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
    let story_id = seeded_story(&store).await;

    let driver = ScriptedGenerator::default()
        .respond(GenerationPhase::Settings, json!({"unexpected": true}));
    let invoker = GenerationInvoker::new(driver, store);

    let outcome = invoker.generate_settings(&story_id).await;
    assert!(!outcome.success);
    assert_eq!(outcome.error(), Some("Setting generation failed"));
}

#[tokio::test]
async fn test_missing_story_short_circuits_without_calling_endpoint() {
    let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
    let driver = ScriptedGenerator::default();
    let probe = driver.clone();
    let invoker = GenerationInvoker::new(driver, store);

    let outcome = invoker.generate_parts("story_missing").await;
    assert!(!outcome.success);
    assert_eq!(outcome.error(), Some("Story not found"));
    assert!(probe.calls().is_empty());
}

#[tokio::test]
async fn test_generate_chapters_scopes_to_part() {
    let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
    let story_id = seeded_story(&store).await;

    let driver = ScriptedGenerator::default().respond(
        GenerationPhase::Chapters,
        json!({
            "chapters": [
                {"title": "Thaw", "arcPosition": "beginning"},
                {"title": "Flood", "arcPosition": "middle"}
            ]
        }),
    );
    let probe = driver.clone();
    let invoker = GenerationInvoker::new(driver, store.clone());

    let outcome = invoker
        .generate_chapters(&story_id, Some("part_1"))
        .await;
    assert!(outcome.success);

    let calls = probe.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.part_id.as_deref(), Some("part_1"));

    let chapters = store.list_chapters(&story_id).await.unwrap();
    assert_eq!(chapters.len(), 2);
    assert!(chapters.iter().all(|c| c.part_id.as_deref() == Some("part_1")));
    assert_eq!(chapters[0].order_index, 0);
    assert_eq!(chapters[1].order_index, 1);
}

#[tokio::test]
async fn test_scene_phases_create_then_fill_prose() {
    let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
    let story_id = seeded_story(&store).await;
    let tools = StoryTools::new(store.clone());
    let chapter_id = tools
        .create_chapter(NewChapter {
            story_id: story_id.clone(),
            title: "Chapter One".into(),
            ..Default::default()
        })
        .await
        .payload()
        .expect("chapter")
        .chapter
        .id
        .clone();

    let driver = ScriptedGenerator::default().respond(
        GenerationPhase::SceneSummaries,
        json!({
            "scenes": [
                {"title": "Cold open", "cyclePhase": "setup"},
                {"title": "The gate breaks", "cyclePhase": "adversity", "emotionalBeat": "fear"}
            ]
        }),
    );
    let invoker = GenerationInvoker::new(driver, store.clone());

    let outcome = invoker
        .generate_scene_summaries(&story_id, Some(&chapter_id))
        .await;
    assert!(outcome.success);
    let scenes = outcome.payload().expect("payload").scenes.clone();
    assert_eq!(scenes.len(), 2);
    assert!(scenes.iter().all(|s| s.content.is_empty()));

    let driver = ScriptedGenerator::default().respond(
        GenerationPhase::SceneContent,
        json!({
            "scenes": [
                {"sceneId": scenes[0].id, "content": "Snow fell on the orchard."},
                {"sceneId": scenes[1].id, "content": "The gate gave way at dusk."}
            ]
        }),
    );
    let invoker = GenerationInvoker::new(driver, store.clone());

    let outcome = invoker.generate_scene_content(&story_id, None).await;
    assert!(outcome.success);
    assert_eq!(
        outcome.payload().expect("payload").message,
        "Generated prose for 2 scenes"
    );

    let stored = store.list_scenes(&story_id).await.unwrap();
    assert!(stored.iter().all(|s| !s.content.is_empty()));
}

#[tokio::test]
async fn test_evaluation_applies_revised_prose() {
    let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
    let story_id = seeded_story(&store).await;
    let tools = StoryTools::new(store.clone());
    let chapter_id = tools
        .create_chapter(NewChapter {
            story_id: story_id.clone(),
            title: "Chapter One".into(),
            ..Default::default()
        })
        .await
        .payload()
        .expect("chapter")
        .chapter
        .id
        .clone();
    let scene_id = tools
        .create_scene(fabula_core::NewScene {
            story_id: story_id.clone(),
            chapter_id,
            title: "Cold open".into(),
            content: Some("Rough draft.".into()),
            ..Default::default()
        })
        .await
        .payload()
        .expect("scene")
        .scene
        .id
        .clone();

    let driver = ScriptedGenerator::default().respond(
        GenerationPhase::Evaluation,
        json!({
            "evaluations": [
                {"sceneId": scene_id, "score": 6.5, "notes": "flat opening",
                 "revisedContent": "Snow hissed against the lamps."}
            ]
        }),
    );
    let invoker = GenerationInvoker::new(driver, store.clone());

    let outcome = invoker.evaluate_scenes(&story_id).await;
    assert!(outcome.success);
    assert_eq!(
        outcome.payload().expect("payload").message,
        "Evaluated 1 scenes"
    );

    let scene = store.get_scene(&scene_id).await.unwrap().unwrap();
    assert_eq!(scene.content, "Snow hissed against the lamps.");
}

#[tokio::test]
async fn test_images_stamp_references_on_rows() {
    let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
    let story_id = seeded_story(&store).await;

    let driver = ScriptedGenerator::default().respond(
        GenerationPhase::Images,
        json!({
            "images": [
                {"target": "story", "targetId": story_id, "url": "blob://covers/1.png"}
            ]
        }),
    );
    let invoker = GenerationInvoker::new(driver, store.clone());

    let outcome = invoker.generate_images(&story_id).await;
    assert!(outcome.success);
    assert_eq!(outcome.payload().expect("payload").message, "Generated 1 images");

    let story = store.get_story(&story_id).await.unwrap().unwrap();
    assert_eq!(story.image_url.as_deref(), Some("blob://covers/1.png"));
}

#[tokio::test]
async fn test_generate_summary_writes_through_to_story() {
    let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
    let story_id = seeded_story(&store).await;

    let driver = ScriptedGenerator::default().respond(
        GenerationPhase::StorySummary,
        json!({
            "summary": "An orchard keeper holds the line through a hard winter.",
            "tone": "quiet, resolute",
            "moralFramework": {
                "adversity": "the long frost",
                "virtue": "patience",
                "consequence": "a late harvest"
            }
        }),
    );
    let invoker = GenerationInvoker::new(driver, store.clone());

    let outcome = invoker.generate_summary(&story_id).await;
    assert!(outcome.success);

    let story = store.get_story(&story_id).await.unwrap().unwrap();
    assert_eq!(
        story.summary,
        "An orchard keeper holds the line through a hard winter."
    );
    assert_eq!(story.tone.as_deref(), Some("quiet, resolute"));
    assert_eq!(story.moral_framework.virtue, "patience");
}
