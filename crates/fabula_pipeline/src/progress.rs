//! Per-session generation progress tracking.

use fabula_core::GenerationPhase;
use fabula_interface::{ChatStore, ToolOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Static wall-clock heuristic: each remaining phase is assumed to take
/// between five and fifteen minutes. Not measured from historical runs.
const PHASE_MINUTES_MIN: usize = 5;
const PHASE_MINUTES_MAX: usize = 15;

/// Estimated time remaining, as a range in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEstimate {
    /// Lower bound in minutes
    pub min_minutes: usize,
    /// Upper bound in minutes
    pub max_minutes: usize,
}

/// Snapshot of one session's progress through the phase sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// Session the snapshot belongs to
    pub chat_id: String,
    /// Phase the session is currently working through
    pub current_phase: Option<GenerationPhase>,
    /// Phases marked complete, in completion order
    pub completed_phases: Vec<GenerationPhase>,
    /// `floor(completed / 9 * 100)`
    pub overall_progress: u8,
}

/// Result of marking a phase complete or incomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgressPayload {
    /// Updated snapshot
    #[serde(flatten)]
    pub snapshot: ProgressSnapshot,
    /// Phase that follows the one just marked, `None` for the last phase
    pub next_phase: Option<GenerationPhase>,
}

/// Full progress view with the time estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationProgressPayload {
    /// Current snapshot
    #[serde(flatten)]
    pub snapshot: ProgressSnapshot,
    /// Phases not yet complete
    pub remaining_phases: usize,
    /// Estimated wall-clock time remaining
    pub estimated_time_remaining: TimeEstimate,
}

fn overall_progress(completed: usize) -> u8 {
    (completed * 100 / GenerationPhase::COUNT) as u8
}

/// Tracks which phases each chat session has completed.
pub struct ProgressTracker {
    chats: Arc<dyn ChatStore>,
}

impl ProgressTracker {
    /// Create a tracker over a chat store.
    pub fn new(chats: Arc<dyn ChatStore>) -> Self {
        Self { chats }
    }

    /// Mark a phase complete or incomplete for a session.
    ///
    /// Marking an already-complete phase complete again is a no-op; the
    /// completion list never holds duplicates. Returns the updated snapshot
    /// and the phase that follows the marked one in sequence.
    #[instrument(skip(self), fields(chat_id = %chat_id, phase = %phase, completed))]
    pub async fn update_phase_progress(
        &self,
        chat_id: &str,
        phase: GenerationPhase,
        completed: bool,
    ) -> ToolOutcome<PhaseProgressPayload> {
        let chat = match self.chats.get_chat(chat_id).await {
            Ok(Some(chat)) => chat,
            Ok(None) => return ToolOutcome::err("Chat session not found"),
            Err(e) => return ToolOutcome::err(e.to_string()),
        };

        let mut context = chat.context;
        if completed {
            if !context.completed_phases.contains(&phase) {
                context.completed_phases.push(phase);
            }
        } else {
            context.completed_phases.retain(|p| *p != phase);
        }
        context.current_phase = Some(phase);

        let updated = match self.chats.update_chat_phase(chat_id, context).await {
            Ok(Some(updated)) => updated,
            Ok(None) => return ToolOutcome::err("Chat session not found"),
            Err(e) => return ToolOutcome::err(e.to_string()),
        };

        let snapshot = ProgressSnapshot {
            chat_id: updated.id,
            current_phase: updated.context.current_phase,
            overall_progress: overall_progress(updated.context.completed_phases.len()),
            completed_phases: updated.context.completed_phases,
        };

        tracing::debug!(
            progress = snapshot.overall_progress,
            "Updated phase progress"
        );

        ToolOutcome::ok(PhaseProgressPayload {
            snapshot,
            next_phase: phase.next(),
        })
    }

    /// Read a session's progress and estimate time remaining.
    #[instrument(skip(self), fields(chat_id = %chat_id))]
    pub async fn get_generation_progress(
        &self,
        chat_id: &str,
    ) -> ToolOutcome<GenerationProgressPayload> {
        let chat = match self.chats.get_chat(chat_id).await {
            Ok(Some(chat)) => chat,
            Ok(None) => return ToolOutcome::err("Chat session not found"),
            Err(e) => return ToolOutcome::err(e.to_string()),
        };

        let completed = chat.context.completed_phases.len();
        let remaining_phases = GenerationPhase::COUNT.saturating_sub(completed);

        let snapshot = ProgressSnapshot {
            chat_id: chat.id,
            current_phase: chat.context.current_phase,
            overall_progress: overall_progress(completed),
            completed_phases: chat.context.completed_phases,
        };

        ToolOutcome::ok(GenerationProgressPayload {
            snapshot,
            remaining_phases,
            estimated_time_remaining: TimeEstimate {
                min_minutes: remaining_phases * PHASE_MINUTES_MIN,
                max_minutes: remaining_phases * PHASE_MINUTES_MAX,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_progress_floors() {
        assert_eq!(overall_progress(0), 0);
        assert_eq!(overall_progress(1), 11);
        assert_eq!(overall_progress(4), 44);
        assert_eq!(overall_progress(9), 100);
    }
}
