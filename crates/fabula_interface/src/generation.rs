//! Outbound generation driver trait and wire payloads.

use async_trait::async_trait;
use fabula_core::{
    ArcPosition, CyclePhase, EmotionalBeat, GenerationPhase, MoralFramework, Personality,
};
use fabula_error::FabulaResult;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Request body for one phase generation call.
///
/// Serializes to the endpoint's JSON contract: `storyId` plus optional
/// scoping ids and the sampling parameters the server accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseRequest {
    /// Story the generation targets
    pub story_id: String,
    /// Scope chapter generation to one part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,
    /// Scope scene generation to one chapter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Token budget for the response
    pub max_tokens: u32,
}

impl PhaseRequest {
    /// Request scoped to a story only, with the server's default sampling
    /// parameters (0.7 / 2048).
    pub fn for_story(story_id: impl Into<String>) -> Self {
        Self {
            story_id: story_id.into(),
            part_id: None,
            chapter_id: None,
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    /// Narrow the request to one part.
    pub fn with_part(mut self, part_id: impl Into<String>) -> Self {
        self.part_id = Some(part_id.into());
        self
    }

    /// Narrow the request to one chapter.
    pub fn with_chapter(mut self, chapter_id: impl Into<String>) -> Self {
        self.chapter_id = Some(chapter_id.into());
        self
    }
}

/// A generated character, before it is assigned an id and a story.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSeed {
    /// Name
    pub name: String,
    /// Whether this is a main character
    #[serde(default)]
    pub is_main: bool,
    /// Narrative role
    #[serde(default)]
    pub role: Option<String>,
    /// Defining trait
    #[serde(default)]
    pub core_trait: Option<String>,
    /// Internal flaw
    #[serde(default)]
    pub internal_flaw: Option<String>,
    /// External goal
    #[serde(default)]
    pub external_goal: Option<String>,
    /// Backstory
    #[serde(default)]
    pub backstory: Option<String>,
    /// Structured personality sketch
    #[serde(default)]
    pub personality: Option<Personality>,
}

/// A generated setting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingSeed {
    /// Name
    pub name: String,
    /// Summary
    #[serde(default)]
    pub summary: Option<String>,
    /// Adversity elements
    #[serde(default)]
    pub adversity_elements: Vec<String>,
    /// Virtue elements
    #[serde(default)]
    pub virtue_elements: Vec<String>,
    /// Consequence elements
    #[serde(default)]
    pub consequence_elements: Vec<String>,
    /// What the setting stands for
    #[serde(default)]
    pub symbolic_meaning: Option<String>,
}

/// A generated part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartSeed {
    /// Title
    pub title: String,
    /// Summary
    #[serde(default)]
    pub summary: Option<String>,
    /// Position among siblings
    #[serde(default)]
    pub order_index: Option<i32>,
    /// Character arc notes
    #[serde(default)]
    pub character_arc: Option<String>,
}

/// A generated chapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSeed {
    /// Containing part
    #[serde(default)]
    pub part_id: Option<String>,
    /// Viewpoint or focus character
    #[serde(default)]
    pub character_id: Option<String>,
    /// Title
    pub title: String,
    /// Summary
    #[serde(default)]
    pub summary: Option<String>,
    /// Position among siblings
    #[serde(default)]
    pub order_index: Option<i32>,
    /// Position in the dramatic arc
    #[serde(default)]
    pub arc_position: Option<ArcPosition>,
    /// Kind of adversity this chapter turns on
    #[serde(default)]
    pub adversity_type: Option<String>,
    /// Kind of virtue answering it
    #[serde(default)]
    pub virtue_type: Option<String>,
}

/// A generated scene outline or prose block.
///
/// The scene-summaries phase sends seeds without content; the
/// scene-content phase sends seeds carrying `scene_id` and prose for
/// scenes that already exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSeed {
    /// Existing scene to fill with prose; absent for new outlines
    #[serde(default)]
    pub scene_id: Option<String>,
    /// Containing chapter for new outlines
    #[serde(default)]
    pub chapter_id: Option<String>,
    /// Title
    #[serde(default)]
    pub title: Option<String>,
    /// Prose content
    #[serde(default)]
    pub content: Option<String>,
    /// Position among siblings
    #[serde(default)]
    pub order_index: Option<i32>,
    /// Position in the adversity cycle
    #[serde(default)]
    pub cycle_phase: Option<CyclePhase>,
    /// Dominant emotional beat
    #[serde(default)]
    pub emotional_beat: Option<EmotionalBeat>,
}

/// One scene's evaluation verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEvaluation {
    /// Scene the verdict applies to
    pub scene_id: String,
    /// Score on the endpoint's rubric
    #[serde(default)]
    pub score: Option<f32>,
    /// Reviewer notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Improved prose, when the endpoint rewrote the scene
    #[serde(default)]
    pub revised_content: Option<String>,
}

/// What an image belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ImageTarget {
    /// Story cover
    Story,
    /// Scene illustration
    Scene,
    /// Character portrait
    Character,
    /// Setting illustration
    Setting,
}

/// A generated image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    /// What the image belongs to
    pub target: ImageTarget,
    /// Id of the owning row
    pub target_id: String,
    /// Where the image was stored
    pub url: String,
}

/// Summary payload returned by the story-summary phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySeed {
    /// The generated summary
    pub summary: String,
    /// Narrative tone, when the endpoint proposes one
    #[serde(default)]
    pub tone: Option<String>,
    /// Moral framework, when the endpoint proposes one
    #[serde(default)]
    pub moral_framework: Option<MoralFramework>,
}

/// Driver for the external generation endpoint.
///
/// One call per phase; the driver owns transport, authentication, and model
/// selection, and hands back the response body as JSON. Any transport or
/// non-2xx failure surfaces as an error — the invoker collapses it to the
/// phase's failure envelope, so implementations do not retry.
#[async_trait]
pub trait PhaseGenerator: Send + Sync {
    /// Run one phase generation call and return the response body.
    async fn run_phase(
        &self,
        phase: GenerationPhase,
        request: &PhaseRequest,
    ) -> FabulaResult<JsonValue>;
}
