//! Tests for the progress tracker.

use fabula_core::GenerationPhase;
use fabula_interface::{ChatSession, ChatStore};
use fabula_pipeline::{InMemoryChatStore, ProgressTracker};
use std::sync::Arc;

async fn harness() -> (ProgressTracker, String) {
    let chats: Arc<dyn ChatStore> = Arc::new(InMemoryChatStore::new());
    let chat = chats
        .insert_chat(ChatSession::create(Some("story_1".into())))
        .await
        .unwrap();
    (ProgressTracker::new(chats), chat.id)
}

#[tokio::test]
async fn test_marking_all_phases_drives_progress_to_100() {
    let (tracker, chat_id) = harness().await;

    let mut last_progress = 0;
    for phase in GenerationPhase::ORDER {
        let outcome = tracker.update_phase_progress(&chat_id, phase, true).await;
        let payload = outcome.payload().expect("payload");
        assert!(payload.snapshot.overall_progress >= last_progress);
        last_progress = payload.snapshot.overall_progress;
        assert_eq!(payload.next_phase, phase.next());
    }
    assert_eq!(last_progress, 100);

    // Re-marking the final phase is a no-op with no next phase.
    let outcome = tracker
        .update_phase_progress(&chat_id, GenerationPhase::Images, true)
        .await;
    let payload = outcome.payload().expect("payload");
    assert_eq!(payload.snapshot.overall_progress, 100);
    assert_eq!(payload.snapshot.completed_phases.len(), 9);
    assert_eq!(payload.next_phase, None);
}

#[tokio::test]
async fn test_unmarking_a_phase_lowers_progress() {
    let (tracker, chat_id) = harness().await;

    tracker
        .update_phase_progress(&chat_id, GenerationPhase::StorySummary, true)
        .await;
    tracker
        .update_phase_progress(&chat_id, GenerationPhase::Characters, true)
        .await;

    let outcome = tracker
        .update_phase_progress(&chat_id, GenerationPhase::Characters, false)
        .await;
    let payload = outcome.payload().expect("payload");
    assert_eq!(
        payload.snapshot.completed_phases,
        vec![GenerationPhase::StorySummary]
    );
    assert_eq!(payload.snapshot.overall_progress, 11);
}

#[tokio::test]
async fn test_time_estimate_shrinks_with_completion() {
    let (tracker, chat_id) = harness().await;

    let outcome = tracker.get_generation_progress(&chat_id).await;
    let payload = outcome.payload().expect("payload");
    assert_eq!(payload.remaining_phases, 9);
    assert_eq!(payload.estimated_time_remaining.min_minutes, 45);
    assert_eq!(payload.estimated_time_remaining.max_minutes, 135);
    assert_eq!(payload.snapshot.overall_progress, 0);

    for phase in [
        GenerationPhase::StorySummary,
        GenerationPhase::Characters,
        GenerationPhase::Settings,
    ] {
        tracker.update_phase_progress(&chat_id, phase, true).await;
    }

    let outcome = tracker.get_generation_progress(&chat_id).await;
    let payload = outcome.payload().expect("payload");
    assert_eq!(payload.remaining_phases, 6);
    assert_eq!(payload.estimated_time_remaining.min_minutes, 30);
    assert_eq!(payload.estimated_time_remaining.max_minutes, 90);
    assert_eq!(payload.snapshot.overall_progress, 33);
    assert_eq!(
        payload.snapshot.current_phase,
        Some(GenerationPhase::Settings)
    );
}

#[tokio::test]
async fn test_missing_chat_session_is_a_tagged_error() {
    let chats: Arc<dyn ChatStore> = Arc::new(InMemoryChatStore::new());
    let tracker = ProgressTracker::new(chats);

    let outcome = tracker
        .update_phase_progress("chat_missing", GenerationPhase::Parts, true)
        .await;
    assert!(!outcome.success);
    assert_eq!(outcome.error(), Some("Chat session not found"));

    let outcome = tracker.get_generation_progress("chat_missing").await;
    assert!(!outcome.success);
    assert_eq!(outcome.error(), Some("Chat session not found"));
}

#[tokio::test]
async fn test_marking_a_phase_twice_does_not_duplicate() {
    let (tracker, chat_id) = harness().await;

    tracker
        .update_phase_progress(&chat_id, GenerationPhase::StorySummary, true)
        .await;
    let outcome = tracker
        .update_phase_progress(&chat_id, GenerationPhase::StorySummary, true)
        .await;
    let payload = outcome.payload().expect("payload");
    assert_eq!(
        payload.snapshot.completed_phases,
        vec![GenerationPhase::StorySummary]
    );
    assert_eq!(payload.snapshot.overall_progress, 11);
    assert_eq!(payload.next_phase, Some(GenerationPhase::Characters));
}
