//! Tests for the advisory layer: prerequisites, next-phase suggestion, and
//! structure validation.

use fabula_core::{GenerationPhase, NewCharacter, NewChapter, NewPart, NewScene, NewSetting, NewStory, ScenePatch, StoryPatch};
use fabula_interface::StoryStore;
use fabula_pipeline::{Advisor, InMemoryStoryStore, StoryTools};
use std::sync::Arc;

fn harness() -> (Arc<dyn StoryStore>, StoryTools, Advisor) {
    let store: Arc<dyn StoryStore> = Arc::new(InMemoryStoryStore::new());
    (store.clone(), StoryTools::new(store.clone()), Advisor::new(store))
}

async fn create_story(tools: &StoryTools, summary: Option<&str>) -> String {
    let outcome = tools
        .create_story(NewStory {
            user_id: "user_1".into(),
            title: "The Long Winter".into(),
            summary: summary.map(String::from),
            ..Default::default()
        })
        .await;
    outcome.payload().expect("story created").story.id.clone()
}

#[tokio::test]
async fn test_empty_summary_blocks_characters() {
    let (_, tools, advisor) = harness();
    let story_id = create_story(&tools, None).await;

    let outcome = advisor
        .check_prerequisites(&story_id, GenerationPhase::Characters)
        .await;
    let report = outcome.payload().expect("report");
    assert!(!report.prerequisites_met);
    assert!(report
        .missing_prerequisites
        .contains(&"Story summary is required".to_string()));
}

#[tokio::test]
async fn test_parts_prerequisites_met_with_summary_character_setting() {
    let (_, tools, advisor) = harness();
    let story_id = create_story(&tools, Some("A hook")).await;

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

    let outcome = advisor
        .check_prerequisites(&story_id, GenerationPhase::Parts)
        .await;
    let report = outcome.payload().expect("report");
    assert!(report.prerequisites_met);
    assert!(report.missing_prerequisites.is_empty());
}

#[tokio::test]
async fn test_fresh_story_suggests_story_summary() {
    let (_, tools, advisor) = harness();
    let story_id = create_story(&tools, None).await;

    let outcome = advisor.suggest_next_phase(&story_id).await;
    let payload = outcome.payload().expect("payload");
    assert_eq!(payload.next_phase, Some(GenerationPhase::StorySummary));
}

#[tokio::test]
async fn test_suggestion_never_skips_an_unmet_phase() {
    let (_, tools, advisor) = harness();
    let story_id = create_story(&tools, Some("A hook")).await;

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

    // Parts are still missing, so chapters must not be suggested yet.
    let outcome = advisor.suggest_next_phase(&story_id).await;
    assert_eq!(
        outcome.payload().expect("payload").next_phase,
        Some(GenerationPhase::Parts)
    );

    tools
        .create_part(NewPart {
            story_id: story_id.clone(),
            title: "Part One".into(),
            ..Default::default()
        })
        .await;

    let outcome = advisor.suggest_next_phase(&story_id).await;
    assert_eq!(
        outcome.payload().expect("payload").next_phase,
        Some(GenerationPhase::Chapters)
    );
}

#[tokio::test]
async fn test_scene_existence_satisfies_both_scene_phases() {
    let (store, tools, advisor) = harness();
    let story_id = create_story(&tools, Some("A hook")).await;
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

    // An outline-only scene (no prose) satisfies the scene-content walk too;
    // the next suggestion lands on evaluation.
    let scene = tools
        .create_scene(NewScene {
            story_id: story_id.clone(),
            chapter_id,
            title: "Cold open".into(),
            ..Default::default()
        })
        .await;
    let scene_id = scene.payload().expect("scene").scene.id.clone();

    let outcome = advisor.suggest_next_phase(&story_id).await;
    assert_eq!(
        outcome.payload().expect("payload").next_phase,
        Some(GenerationPhase::Evaluation)
    );

    // With prose everywhere, the walk reaches images.
    store
        .update_scene(
            &scene_id,
            ScenePatch {
                content: Some("Snow fell on the orchard.".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let outcome = advisor.suggest_next_phase(&story_id).await;
    assert_eq!(
        outcome.payload().expect("payload").next_phase,
        Some(GenerationPhase::Images)
    );

    // A cover image completes the sequence.
    store
        .update_story(
            &story_id,
            StoryPatch {
                image_url: Some("blob://covers/1.png".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let outcome = advisor.suggest_next_phase(&story_id).await;
    let payload = outcome.payload().expect("payload");
    assert_eq!(payload.next_phase, None);
    assert_eq!(payload.reason, "All generation phases are complete");
}

#[tokio::test]
async fn test_missing_story_yields_not_found_envelope() {
    let (_, _, advisor) = harness();

    let prerequisites = advisor
        .check_prerequisites("story_missing", GenerationPhase::Parts)
        .await;
    assert!(!prerequisites.success);
    assert_eq!(prerequisites.error(), Some("Story not found"));

    let suggestion = advisor.suggest_next_phase("story_missing").await;
    assert!(!suggestion.success);
    assert_eq!(suggestion.error(), Some("Story not found"));

    let structure = advisor.validate_story_structure("story_missing").await;
    assert!(!structure.success);
    assert_eq!(structure.error(), Some("Story not found"));
}

#[tokio::test]
async fn test_prerequisite_scenario_end_to_end() {
    // Story with an empty summary: the parts check reports all three gaps,
    // and filling them flips the check to met.
    let (_, tools, advisor) = harness();
    let story_id = create_story(&tools, None).await;

    let fetched = tools.get_story(&story_id).await;
    assert!(fetched.success);
    assert_eq!(fetched.payload().expect("story").story.summary, "");

    let outcome = advisor
        .check_prerequisites(&story_id, GenerationPhase::Parts)
        .await;
    let report = outcome.payload().expect("report");
    assert!(!report.prerequisites_met);
    assert_eq!(
        report.missing_prerequisites,
        vec![
            "Story summary is required".to_string(),
            "At least one character is required".to_string(),
            "At least one setting is required".to_string(),
        ]
    );
    assert_eq!(report.suggestions.len(), 3);

    tools
        .create_character(NewCharacter {
            story_id: story_id.clone(),
            name: "A".into(),
            ..Default::default()
        })
        .await;
    tools
        .create_setting(NewSetting {
            story_id: story_id.clone(),
            name: "B".into(),
            summary: Some("x".into()),
            symbolic_meaning: Some("y".into()),
            ..Default::default()
        })
        .await;
    tools
        .update_story(
            &story_id,
            StoryPatch {
                summary: Some("hook".into()),
                ..Default::default()
            },
        )
        .await;

    let outcome = advisor
        .check_prerequisites(&story_id, GenerationPhase::Parts)
        .await;
    assert!(outcome.payload().expect("report").prerequisites_met);
}

#[tokio::test]
async fn test_validate_story_structure_separates_issues_from_warnings() {
    let (_, tools, advisor) = harness();
    let story_id = create_story(&tools, None).await;

    let outcome = advisor.validate_story_structure(&story_id).await;
    let report = outcome.payload().expect("report");
    assert!(!report.is_valid);
    assert!(report
        .issues
        .contains(&"Story summary is missing".to_string()));
    assert!(report.warnings.contains(&"Story has no characters".to_string()));
    assert!(report.warnings.contains(&"Story has no settings".to_string()));

    tools
        .update_story(
            &story_id,
            StoryPatch {
                summary: Some("hook".into()),
                ..Default::default()
            },
        )
        .await;

    let outcome = advisor.validate_story_structure(&story_id).await;
    let report = outcome.payload().expect("report");
    // Zero characters stays a warning, not an issue.
    assert!(report.is_valid);
    assert!(!report.warnings.is_empty());
    assert_eq!(report.counts.characters, 0);
}
