//! Read-only advisory queries over the entity store.
//!
//! These answer "are this phase's prerequisites satisfied?" and "what phase
//! should run next?" by counting rows; nothing here mutates data.

use fabula_core::{GenerationPhase, Story};
use fabula_interface::{StoryCounts, StoryStore, ToolOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// A single prerequisite a phase can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Summary,
    Characters,
    Settings,
    Parts,
    Chapters,
    Scenes,
}

impl Requirement {
    fn is_met(self, story: &Story, counts: &StoryCounts) -> bool {
        match self {
            Requirement::Summary => !story.summary.is_empty(),
            Requirement::Characters => counts.characters > 0,
            Requirement::Settings => counts.settings > 0,
            Requirement::Parts => counts.parts > 0,
            Requirement::Chapters => counts.chapters > 0,
            Requirement::Scenes => counts.scenes > 0,
        }
    }

    fn missing_message(self) -> &'static str {
        match self {
            Requirement::Summary => "Story summary is required",
            Requirement::Characters => "At least one character is required",
            Requirement::Settings => "At least one setting is required",
            Requirement::Parts => "At least one part is required",
            Requirement::Chapters => "At least one chapter is required",
            Requirement::Scenes => "At least one scene is required",
        }
    }

    fn suggestion(self) -> &'static str {
        match self {
            Requirement::Summary => "Run the story-summary phase first",
            Requirement::Characters => "Run the characters phase first",
            Requirement::Settings => "Run the settings phase first",
            Requirement::Parts => "Run the parts phase first",
            Requirement::Chapters => "Run the chapters phase first",
            Requirement::Scenes => "Run the scene-summaries phase first",
        }
    }
}

/// Fixed per-phase prerequisite rules.
fn requirements_for(phase: GenerationPhase) -> &'static [Requirement] {
    match phase {
        GenerationPhase::StorySummary => &[],
        GenerationPhase::Characters => &[Requirement::Summary],
        GenerationPhase::Settings => &[Requirement::Summary],
        GenerationPhase::Parts => &[
            Requirement::Summary,
            Requirement::Characters,
            Requirement::Settings,
        ],
        GenerationPhase::Chapters => &[Requirement::Summary, Requirement::Parts],
        GenerationPhase::SceneSummaries => &[Requirement::Chapters],
        GenerationPhase::SceneContent => &[Requirement::Scenes],
        GenerationPhase::Evaluation => &[Requirement::Scenes],
        GenerationPhase::Images => &[Requirement::Summary, Requirement::Scenes],
    }
}

/// Prerequisite report for one target phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerequisiteReport {
    /// Whether every prerequisite holds
    pub prerequisites_met: bool,
    /// Human-readable descriptions of what is missing
    pub missing_prerequisites: Vec<String>,
    /// Which phases to run to fill the gaps
    pub suggestions: Vec<String>,
}

/// Next-phase suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPhasePayload {
    /// First phase whose existence condition does not hold; `None` once the
    /// whole sequence is satisfied
    pub next_phase: Option<GenerationPhase>,
    /// Why this phase is next
    pub reason: String,
}

/// Structure validation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureReport {
    /// True when no hard issues were found
    pub is_valid: bool,
    /// Hard problems that block a coherent story
    pub issues: Vec<String>,
    /// Soft findings worth surfacing
    pub warnings: Vec<String>,
    /// Child row counts backing the findings
    pub counts: StoryCounts,
}

/// Read-only advisor over the entity store.
pub struct Advisor {
    store: Arc<dyn StoryStore>,
}

impl Advisor {
    /// Create an advisor over a store.
    pub fn new(store: Arc<dyn StoryStore>) -> Self {
        Self { store }
    }

    async fn load(&self, story_id: &str) -> Result<Option<(Story, StoryCounts)>, String> {
        let story = match self.store.get_story(story_id).await {
            Ok(Some(story)) => story,
            Ok(None) => return Ok(None),
            Err(e) => return Err(e.to_string()),
        };
        let counts = self
            .store
            .count_children(story_id)
            .await
            .map_err(|e| e.to_string())?;
        Ok(Some((story, counts)))
    }

    /// Check whether a phase's prerequisites are satisfied.
    #[instrument(skip(self), fields(story_id = %story_id, phase = %target_phase))]
    pub async fn check_prerequisites(
        &self,
        story_id: &str,
        target_phase: GenerationPhase,
    ) -> ToolOutcome<PrerequisiteReport> {
        let (story, counts) = match self.load(story_id).await {
            Ok(Some(loaded)) => loaded,
            Ok(None) => return ToolOutcome::err("Story not found"),
            Err(e) => return ToolOutcome::err(e),
        };

        let mut missing_prerequisites = Vec::new();
        let mut suggestions = Vec::new();
        for requirement in requirements_for(target_phase) {
            if !requirement.is_met(&story, &counts) {
                missing_prerequisites.push(requirement.missing_message().to_string());
                suggestions.push(requirement.suggestion().to_string());
            }
        }

        tracing::debug!(
            missing = missing_prerequisites.len(),
            "Checked prerequisites"
        );

        ToolOutcome::ok(PrerequisiteReport {
            prerequisites_met: missing_prerequisites.is_empty(),
            missing_prerequisites,
            suggestions,
        })
    }

    /// Suggest the next phase to run.
    ///
    /// Walks the phase order and returns the first phase whose existence
    /// condition is false; a phase is never skipped while an earlier one is
    /// unmet. Scene-summaries and scene-content share one existence signal
    /// (a scene row exists); the schema does not record which pass produced
    /// a scene, so an outlined-but-unwritten story satisfies both.
    #[instrument(skip(self), fields(story_id = %story_id))]
    pub async fn suggest_next_phase(&self, story_id: &str) -> ToolOutcome<NextPhasePayload> {
        let (story, counts) = match self.load(story_id).await {
            Ok(Some(loaded)) => loaded,
            Ok(None) => return ToolOutcome::err("Story not found"),
            Err(e) => return ToolOutcome::err(e),
        };

        for phase in GenerationPhase::ORDER {
            let (done, reason) = match phase {
                GenerationPhase::StorySummary => (
                    !story.summary.is_empty(),
                    "Story has no summary yet",
                ),
                GenerationPhase::Characters => {
                    (counts.characters > 0, "No characters exist yet")
                }
                GenerationPhase::Settings => (counts.settings > 0, "No settings exist yet"),
                GenerationPhase::Parts => (counts.parts > 0, "No parts exist yet"),
                GenerationPhase::Chapters => (counts.chapters > 0, "No chapters exist yet"),
                GenerationPhase::SceneSummaries => (counts.scenes > 0, "No scenes exist yet"),
                GenerationPhase::SceneContent => (counts.scenes > 0, "No scenes exist yet"),
                GenerationPhase::Evaluation => (
                    counts.scenes > 0 && counts.scenes_with_content == counts.scenes,
                    "Scene prose has not been evaluated yet",
                ),
                GenerationPhase::Images => (
                    story.image_url.is_some(),
                    "No cover image has been generated yet",
                ),
            };
            if !done {
                tracing::debug!(next = %phase, "Suggested next phase");
                return ToolOutcome::ok(NextPhasePayload {
                    next_phase: Some(phase),
                    reason: reason.to_string(),
                });
            }
        }

        ToolOutcome::ok(NextPhasePayload {
            next_phase: None,
            reason: "All generation phases are complete".to_string(),
        })
    }

    /// Validate the story's structural health.
    ///
    /// Hard problems land in `issues`, soft findings in `warnings`;
    /// `is_valid` is true exactly when `issues` is empty.
    #[instrument(skip(self), fields(story_id = %story_id))]
    pub async fn validate_story_structure(
        &self,
        story_id: &str,
    ) -> ToolOutcome<StructureReport> {
        let (story, counts) = match self.load(story_id).await {
            Ok(Some(loaded)) => loaded,
            Ok(None) => return ToolOutcome::err("Story not found"),
            Err(e) => return ToolOutcome::err(e),
        };

        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        if story.summary.is_empty() {
            issues.push("Story summary is missing".to_string());
        }
        if counts.scenes > 0 && counts.chapters == 0 {
            issues.push("Scenes exist without any chapter".to_string());
        }

        if counts.characters == 0 {
            warnings.push("Story has no characters".to_string());
        }
        if counts.settings == 0 {
            warnings.push("Story has no settings".to_string());
        }
        if counts.chapters > 0 && counts.parts == 0 {
            warnings.push("Chapters exist but no parts are defined".to_string());
        }
        if counts.parts > 0 && counts.chapters == 0 {
            warnings.push("Parts exist but have no chapters".to_string());
        }
        if counts.chapters > 0 && counts.scenes == 0 {
            warnings.push("Chapters exist but have no scenes".to_string());
        }
        if counts.scenes_with_content < counts.scenes {
            warnings.push("Some scenes have no prose content".to_string());
        }

        ToolOutcome::ok(StructureReport {
            is_valid: issues.is_empty(),
            issues,
            warnings,
            counts,
        })
    }
}
