//! Tests for the tool-facing CRUD envelopes and cascade deletion.

use fabula_core::{
    CyclePhase, EmotionalBeat, NewChapter, NewCharacter, NewPart, NewScene, NewSetting, NewStory,
    ScenePatch, StoryPatch,
};
use fabula_interface::StoryStore;
use fabula_pipeline::{InMemoryStoryStore, StoryTools};
use std::sync::Arc;

fn harness() -> (Arc<dyn StoryStore>, StoryTools) {
    let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
    (store.clone(), StoryTools::new(store))
}

async fn seeded_story(tools: &StoryTools) -> String {
    tools
        .create_story(NewStory {
            user_id: "user_1".into(),
            title: "The Long Winter".into(),
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
async fn test_create_synthesizes_prefixed_ids_and_defaults() {
    let (_, tools) = harness();
    let story_id = seeded_story(&tools).await;
    assert!(story_id.starts_with("story_"));

    let chapter = tools
        .create_chapter(NewChapter {
            story_id: story_id.clone(),
            title: "Chapter One".into(),
            ..Default::default()
        })
        .await;
    let chapter_id = chapter.payload().expect("chapter").chapter.id.clone();
    assert!(chapter_id.starts_with("chapter_"));

    let scene = tools
        .create_scene(NewScene {
            story_id,
            chapter_id,
            title: "Cold open".into(),
            ..Default::default()
        })
        .await;
    let scene = &scene.payload().expect("scene").scene;
    assert!(scene.id.starts_with("scene_"));
    assert_eq!(scene.cycle_phase, CyclePhase::Setup);
    assert_eq!(scene.emotional_beat, EmotionalBeat::Hope);
}

#[tokio::test]
async fn test_update_merges_patch_and_reports_not_found() {
    let (_, tools) = harness();
    let story_id = seeded_story(&tools).await;

    let updated = tools
        .update_story(
            &story_id,
            StoryPatch {
                summary: Some("hook".into()),
                ..Default::default()
            },
        )
        .await;
    let story = &updated.payload().expect("story").story;
    assert_eq!(story.summary, "hook");
    assert_eq!(story.title, "The Long Winter");

    let missing = tools
        .update_scene(
            "scene_missing",
            ScenePatch {
                content: Some("prose".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(!missing.success);
    assert_eq!(missing.error(), Some("Scene not found"));
}

#[tokio::test]
async fn test_child_creation_requires_existing_parent() {
    let (_, tools) = harness();

    let outcome = tools
        .create_character(NewCharacter {
            story_id: "story_missing".into(),
            name: "Mara".into(),
            ..Default::default()
        })
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.error(), Some("Story not found"));

    let outcome = tools
        .create_scene(NewScene {
            story_id: "story_missing".into(),
            chapter_id: "chapter_missing".into(),
            title: "Orphan".into(),
            ..Default::default()
        })
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.error(), Some("Chapter not found"));
}

#[tokio::test]
async fn test_delete_story_cascades_and_is_idempotent() {
    let (store, tools) = harness();
    let story_id = seeded_story(&tools).await;

    tools
        .create_part(NewPart {
            story_id: story_id.clone(),
            title: "Part One".into(),
            ..Default::default()
        })
        .await;
    let chapter = tools
        .create_chapter(NewChapter {
            story_id: story_id.clone(),
            title: "Chapter One".into(),
            ..Default::default()
        })
        .await;
    let chapter_id = chapter.payload().expect("chapter").chapter.id.clone();
    tools
        .create_scene(NewScene {
            story_id: story_id.clone(),
            chapter_id,
            title: "Cold open".into(),
            ..Default::default()
        })
        .await;
    tools
        .create_character(NewCharacter {
            story_id: story_id.clone(),
            name: "Mara".into(),
            ..Default::default()
        })
        .await;
    tools
        .create_setting(NewSetting {
            story_id: story_id.clone(),
            name: "The orchard".into(),
            ..Default::default()
        })
        .await;

    let counts = store.count_children(&story_id).await.unwrap();
    assert_eq!(counts.parts, 1);
    assert_eq!(counts.chapters, 1);
    assert_eq!(counts.scenes, 1);
    assert_eq!(counts.characters, 1);
    assert_eq!(counts.settings, 1);

    let deleted = tools.delete_story(&story_id).await;
    assert!(deleted.success);

    assert!(store.get_story(&story_id).await.unwrap().is_none());
    let counts = store.count_children(&story_id).await.unwrap();
    assert_eq!(counts.parts, 0);
    assert_eq!(counts.chapters, 0);
    assert_eq!(counts.scenes, 0);
    assert_eq!(counts.characters, 0);
    assert_eq!(counts.settings, 0);

    // Deleting again is not an error.
    let deleted = tools.delete_story(&story_id).await;
    assert!(deleted.success);
}

#[tokio::test]
async fn test_delete_chapter_cascades_to_scenes() {
    let (store, tools) = harness();
    let story_id = seeded_story(&tools).await;

    let chapter = tools
        .create_chapter(NewChapter {
            story_id: story_id.clone(),
            title: "Chapter One".into(),
            ..Default::default()
        })
        .await;
    let chapter_id = chapter.payload().expect("chapter").chapter.id.clone();
    tools
        .create_scene(NewScene {
            story_id: story_id.clone(),
            chapter_id: chapter_id.clone(),
            title: "Cold open".into(),
            ..Default::default()
        })
        .await;

    tools.delete_chapter(&chapter_id).await;
    let counts = store.count_children(&story_id).await.unwrap();
    assert_eq!(counts.chapters, 0);
    assert_eq!(counts.scenes, 0);
}

#[tokio::test]
async fn test_get_story_returns_empty_summary_verbatim() {
    let (_, tools) = harness();
    let story_id = seeded_story(&tools).await;

    let outcome = tools.get_story(&story_id).await;
    assert!(outcome.success);
    assert_eq!(outcome.payload().expect("story").story.summary, "");
}

#[tokio::test]
async fn test_envelope_serialization_shape() {
    let (_, tools) = harness();
    let story_id = seeded_story(&tools).await;

    let json = serde_json::to_value(tools.get_story(&story_id).await).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["story"]["id"], story_id);

    let json = serde_json::to_value(tools.get_story("story_missing").await).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Story not found");
}
