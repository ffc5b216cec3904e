//! The generation invoker: one operation per phase.
//!
//! Each operation issues a single request through the `PhaseGenerator`
//! driver, persists the returned entities into the store, and relays them to
//! the caller under a phase-specific envelope key plus a `message`
//! summarizing the count. Every failure inside a phase call — transport,
//! non-2xx, malformed body, or persistence — collapses to
//! `{"success": false, "error": "<Phase> generation failed"}`; detail goes
//! to the log, not the caller. There is no retry and no idempotency key:
//! calls are fire-and-forget from the orchestration's perspective.

use fabula_core::{
    Chapter, Character, GenerationPhase, NewChapter, NewCharacter, NewPart, NewScene, NewSetting,
    Part, Scene, ScenePatch, Setting, StoryPatch,
};
use fabula_error::{FabulaError, FabulaResult, PipelineError, PipelineErrorKind};
use fabula_interface::{
    ChapterSeed, CharacterSeed, GeneratedImage, ImageTarget, PartSeed, PhaseGenerator,
    PhaseRequest, SceneEvaluation, SceneSeed, SettingSeed, StoryStore, SummarySeed, ToolOutcome,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Deserialize)]
struct CharactersResponse {
    characters: Vec<CharacterSeed>,
}

#[derive(Debug, Deserialize)]
struct SettingsResponse {
    settings: Vec<SettingSeed>,
}

#[derive(Debug, Deserialize)]
struct PartsResponse {
    parts: Vec<PartSeed>,
}

#[derive(Debug, Deserialize)]
struct ChaptersResponse {
    chapters: Vec<ChapterSeed>,
}

#[derive(Debug, Deserialize)]
struct ScenesResponse {
    scenes: Vec<SceneSeed>,
}

#[derive(Debug, Deserialize)]
struct EvaluationsResponse {
    evaluations: Vec<SceneEvaluation>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    images: Vec<GeneratedImage>,
}

/// Envelope payload for the story-summary phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEnvelope {
    /// The generated summary
    pub summary: String,
    /// Count summary
    pub message: String,
}

/// Envelope payload for the characters phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharactersEnvelope {
    /// The persisted characters
    pub characters: Vec<Character>,
    /// Count summary
    pub message: String,
}

/// Envelope payload for the settings phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsEnvelope {
    /// The persisted settings
    pub settings: Vec<Setting>,
    /// Count summary
    pub message: String,
}

/// Envelope payload for the parts phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartsEnvelope {
    /// The persisted parts
    pub parts: Vec<Part>,
    /// Count summary
    pub message: String,
}

/// Envelope payload for the chapters phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaptersEnvelope {
    /// The persisted chapters
    pub chapters: Vec<Chapter>,
    /// Count summary
    pub message: String,
}

/// Envelope payload for the scene-summaries and scene-content phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenesEnvelope {
    /// The persisted scenes
    pub scenes: Vec<Scene>,
    /// Count summary
    pub message: String,
}

/// Envelope payload for the evaluation phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationsEnvelope {
    /// Per-scene verdicts relayed from the endpoint
    pub evaluations: Vec<SceneEvaluation>,
    /// Count summary
    pub message: String,
}

/// Envelope payload for the images phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagesEnvelope {
    /// Image references relayed from the endpoint
    pub images: Vec<GeneratedImage>,
    /// Count summary
    pub message: String,
}

/// Invokes the external generation endpoint, one operation per phase.
pub struct GenerationInvoker<G: PhaseGenerator> {
    driver: G,
    store: Arc<dyn StoryStore>,
    temperature: f32,
    max_tokens: u32,
}

impl<G: PhaseGenerator> GenerationInvoker<G> {
    /// Create an invoker with the endpoint's default sampling parameters.
    pub fn new(driver: G, store: Arc<dyn StoryStore>) -> Self {
        Self {
            driver,
            store,
            temperature: 0.7,
            max_tokens: 2048,
        }
    }

    /// Override the sampling parameters sent with every phase request.
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    fn request(&self, story_id: &str) -> PhaseRequest {
        let mut request = PhaseRequest::for_story(story_id);
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;
        request
    }

    /// Collapse any phase failure to the caller-facing message, logging the
    /// detail.
    fn failure<T>(phase: GenerationPhase, error: &FabulaError) -> ToolOutcome<T> {
        tracing::error!(phase = %phase, error = %error, "Phase generation failed");
        ToolOutcome::err(format!("{} generation failed", phase.label()))
    }

    fn parse<T: serde::de::DeserializeOwned>(
        phase: GenerationPhase,
        body: JsonValue,
    ) -> FabulaResult<T> {
        serde_json::from_value(body).map_err(|e| {
            PipelineError::new(PipelineErrorKind::MalformedResponse {
                phase: phase.to_string(),
                message: e.to_string(),
            })
            .into()
        })
    }

    /// Returns the not-found envelope when the story does not exist, so a
    /// generation call never fabricates children for a missing aggregate.
    async fn require_story<T>(&self, story_id: &str) -> Option<ToolOutcome<T>> {
        match self.store.get_story(story_id).await {
            Ok(Some(_)) => None,
            Ok(None) => Some(ToolOutcome::err("Story not found")),
            Err(e) => Some(ToolOutcome::err(e.to_string())),
        }
    }

    /// Generate the story summary and persist it onto the story row.
    #[instrument(skip(self), fields(story_id = %story_id))]
    pub async fn generate_summary(&self, story_id: &str) -> ToolOutcome<SummaryEnvelope> {
        let phase = GenerationPhase::StorySummary;
        if let Some(failure) = self.require_story(story_id).await {
            return failure;
        }

        let result: FabulaResult<SummarySeed> = async {
            let body = self.driver.run_phase(phase, &self.request(story_id)).await?;
            let seed: SummarySeed = Self::parse(phase, body)?;
            let patch = StoryPatch {
                summary: Some(seed.summary.clone()),
                tone: seed.tone.clone(),
                moral_framework: seed.moral_framework.clone(),
                ..Default::default()
            };
            self.store.update_story(story_id, patch).await?;
            Ok(seed)
        }
        .await;

        match result {
            Ok(seed) => ToolOutcome::ok(SummaryEnvelope {
                summary: seed.summary,
                message: "Generated story summary".to_string(),
            }),
            Err(e) => Self::failure(phase, &e),
        }
    }

    /// Generate characters and persist them.
    #[instrument(skip(self), fields(story_id = %story_id))]
    pub async fn generate_characters(&self, story_id: &str) -> ToolOutcome<CharactersEnvelope> {
        let phase = GenerationPhase::Characters;
        if let Some(failure) = self.require_story(story_id).await {
            return failure;
        }

        let result: FabulaResult<Vec<Character>> = async {
            let body = self.driver.run_phase(phase, &self.request(story_id)).await?;
            let response: CharactersResponse = Self::parse(phase, body)?;
            let mut characters = Vec::with_capacity(response.characters.len());
            for seed in response.characters {
                let character = Character::create(NewCharacter {
                    story_id: story_id.to_string(),
                    name: seed.name,
                    is_main: seed.is_main,
                    role: seed.role,
                    core_trait: seed.core_trait,
                    internal_flaw: seed.internal_flaw,
                    external_goal: seed.external_goal,
                    backstory: seed.backstory,
                    personality: seed.personality,
                });
                characters.push(self.store.insert_character(character).await?);
            }
            Ok(characters)
        }
        .await;

        match result {
            Ok(characters) => {
                let message = format!("Generated {} characters", characters.len());
                ToolOutcome::ok(CharactersEnvelope {
                    characters,
                    message,
                })
            }
            Err(e) => Self::failure(phase, &e),
        }
    }

    /// Generate settings and persist them.
    #[instrument(skip(self), fields(story_id = %story_id))]
    pub async fn generate_settings(&self, story_id: &str) -> ToolOutcome<SettingsEnvelope> {
        let phase = GenerationPhase::Settings;
        if let Some(failure) = self.require_story(story_id).await {
            return failure;
        }

        let result: FabulaResult<Vec<Setting>> = async {
            let body = self.driver.run_phase(phase, &self.request(story_id)).await?;
            let response: SettingsResponse = Self::parse(phase, body)?;
            let mut settings = Vec::with_capacity(response.settings.len());
            for seed in response.settings {
                let setting = Setting::create(NewSetting {
                    story_id: story_id.to_string(),
                    name: seed.name,
                    summary: seed.summary,
                    adversity_elements: seed.adversity_elements,
                    virtue_elements: seed.virtue_elements,
                    consequence_elements: seed.consequence_elements,
                    symbolic_meaning: seed.symbolic_meaning,
                });
                settings.push(self.store.insert_setting(setting).await?);
            }
            Ok(settings)
        }
        .await;

        match result {
            Ok(settings) => {
                let message = format!("Generated {} settings", settings.len());
                ToolOutcome::ok(SettingsEnvelope { settings, message })
            }
            Err(e) => Self::failure(phase, &e),
        }
    }

    /// Generate parts and persist them.
    #[instrument(skip(self), fields(story_id = %story_id))]
    pub async fn generate_parts(&self, story_id: &str) -> ToolOutcome<PartsEnvelope> {
        let phase = GenerationPhase::Parts;
        if let Some(failure) = self.require_story(story_id).await {
            return failure;
        }

        let result: FabulaResult<Vec<Part>> = async {
            let body = self.driver.run_phase(phase, &self.request(story_id)).await?;
            let response: PartsResponse = Self::parse(phase, body)?;
            let mut parts = Vec::with_capacity(response.parts.len());
            for (index, seed) in response.parts.into_iter().enumerate() {
                let part = Part::create(NewPart {
                    story_id: story_id.to_string(),
                    title: seed.title,
                    summary: seed.summary,
                    order_index: seed.order_index.or(Some(index as i32)),
                    character_arc: seed.character_arc,
                });
                parts.push(self.store.insert_part(part).await?);
            }
            Ok(parts)
        }
        .await;

        match result {
            Ok(parts) => {
                let message = format!("Generated {} parts", parts.len());
                ToolOutcome::ok(PartsEnvelope { parts, message })
            }
            Err(e) => Self::failure(phase, &e),
        }
    }

    /// Generate chapters, optionally scoped to one part, and persist them.
    #[instrument(skip(self), fields(story_id = %story_id, part_id = ?part_id))]
    pub async fn generate_chapters(
        &self,
        story_id: &str,
        part_id: Option<&str>,
    ) -> ToolOutcome<ChaptersEnvelope> {
        let phase = GenerationPhase::Chapters;
        if let Some(failure) = self.require_story(story_id).await {
            return failure;
        }

        let result: FabulaResult<Vec<Chapter>> = async {
            let mut request = self.request(story_id);
            if let Some(part_id) = part_id {
                request = request.with_part(part_id);
            }
            let body = self.driver.run_phase(phase, &request).await?;
            let response: ChaptersResponse = Self::parse(phase, body)?;
            let mut chapters = Vec::with_capacity(response.chapters.len());
            for (index, seed) in response.chapters.into_iter().enumerate() {
                let chapter = Chapter::create(NewChapter {
                    story_id: story_id.to_string(),
                    part_id: seed.part_id.or_else(|| part_id.map(String::from)),
                    character_id: seed.character_id,
                    title: seed.title,
                    summary: seed.summary,
                    order_index: seed.order_index.or(Some(index as i32)),
                    arc_position: seed.arc_position,
                    adversity_type: seed.adversity_type,
                    virtue_type: seed.virtue_type,
                });
                chapters.push(self.store.insert_chapter(chapter).await?);
            }
            Ok(chapters)
        }
        .await;

        match result {
            Ok(chapters) => {
                let message = format!("Generated {} chapters", chapters.len());
                ToolOutcome::ok(ChaptersEnvelope { chapters, message })
            }
            Err(e) => Self::failure(phase, &e),
        }
    }

    /// Generate scene outlines, optionally scoped to one chapter, and
    /// persist them as scenes without prose.
    #[instrument(skip(self), fields(story_id = %story_id, chapter_id = ?chapter_id))]
    pub async fn generate_scene_summaries(
        &self,
        story_id: &str,
        chapter_id: Option<&str>,
    ) -> ToolOutcome<ScenesEnvelope> {
        let phase = GenerationPhase::SceneSummaries;
        if let Some(failure) = self.require_story(story_id).await {
            return failure;
        }

        let result = self.persist_scenes(phase, story_id, chapter_id).await;
        match result {
            Ok(scenes) => {
                let message = format!("Generated {} scene summaries", scenes.len());
                ToolOutcome::ok(ScenesEnvelope { scenes, message })
            }
            Err(e) => Self::failure(phase, &e),
        }
    }

    /// Generate prose for existing scenes (and persist any new scenes the
    /// endpoint returns alongside).
    #[instrument(skip(self), fields(story_id = %story_id, chapter_id = ?chapter_id))]
    pub async fn generate_scene_content(
        &self,
        story_id: &str,
        chapter_id: Option<&str>,
    ) -> ToolOutcome<ScenesEnvelope> {
        let phase = GenerationPhase::SceneContent;
        if let Some(failure) = self.require_story(story_id).await {
            return failure;
        }

        let result = self.persist_scenes(phase, story_id, chapter_id).await;
        match result {
            Ok(scenes) => {
                let message = format!("Generated prose for {} scenes", scenes.len());
                ToolOutcome::ok(ScenesEnvelope { scenes, message })
            }
            Err(e) => Self::failure(phase, &e),
        }
    }

    /// Shared persistence for the two scene phases. Seeds carrying a
    /// `scene_id` patch the existing row; seeds without one become new
    /// scenes under their chapter.
    async fn persist_scenes(
        &self,
        phase: GenerationPhase,
        story_id: &str,
        chapter_id: Option<&str>,
    ) -> FabulaResult<Vec<Scene>> {
        let mut request = self.request(story_id);
        if let Some(chapter_id) = chapter_id {
            request = request.with_chapter(chapter_id);
        }
        let body = self.driver.run_phase(phase, &request).await?;
        let response: ScenesResponse = Self::parse(phase, body)?;

        let mut scenes = Vec::with_capacity(response.scenes.len());
        for (index, seed) in response.scenes.into_iter().enumerate() {
            if let Some(scene_id) = seed.scene_id {
                let patch = ScenePatch {
                    title: seed.title,
                    content: seed.content,
                    cycle_phase: seed.cycle_phase,
                    emotional_beat: seed.emotional_beat,
                    ..Default::default()
                };
                if let Some(scene) = self.store.update_scene(&scene_id, patch).await? {
                    scenes.push(scene);
                } else {
                    tracing::warn!(scene_id = %scene_id, "Endpoint referenced unknown scene");
                }
                continue;
            }

            let Some(target_chapter) = seed.chapter_id.or_else(|| chapter_id.map(String::from))
            else {
                return Err(PipelineError::new(PipelineErrorKind::MalformedResponse {
                    phase: phase.to_string(),
                    message: "scene seed missing chapter id".to_string(),
                })
                .into());
            };
            let scene = Scene::create(NewScene {
                story_id: story_id.to_string(),
                chapter_id: target_chapter,
                title: seed.title.unwrap_or_else(|| format!("Scene {}", index + 1)),
                content: seed.content,
                order_index: seed.order_index.or(Some(index as i32)),
                cycle_phase: seed.cycle_phase,
                emotional_beat: seed.emotional_beat,
            });
            scenes.push(self.store.insert_scene(scene).await?);
        }
        Ok(scenes)
    }

    /// Evaluate scene prose; verdicts that carry revised prose are written
    /// back to their scenes.
    #[instrument(skip(self), fields(story_id = %story_id))]
    pub async fn evaluate_scenes(&self, story_id: &str) -> ToolOutcome<EvaluationsEnvelope> {
        let phase = GenerationPhase::Evaluation;
        if let Some(failure) = self.require_story(story_id).await {
            return failure;
        }

        let result: FabulaResult<Vec<SceneEvaluation>> = async {
            let body = self.driver.run_phase(phase, &self.request(story_id)).await?;
            let response: EvaluationsResponse = Self::parse(phase, body)?;
            for evaluation in &response.evaluations {
                if let Some(revised) = &evaluation.revised_content {
                    let patch = ScenePatch {
                        content: Some(revised.clone()),
                        ..Default::default()
                    };
                    if self
                        .store
                        .update_scene(&evaluation.scene_id, patch)
                        .await?
                        .is_none()
                    {
                        tracing::warn!(
                            scene_id = %evaluation.scene_id,
                            "Evaluation referenced unknown scene"
                        );
                    }
                }
            }
            Ok(response.evaluations)
        }
        .await;

        match result {
            Ok(evaluations) => {
                let message = format!("Evaluated {} scenes", evaluations.len());
                ToolOutcome::ok(EvaluationsEnvelope {
                    evaluations,
                    message,
                })
            }
            Err(e) => Self::failure(phase, &e),
        }
    }

    /// Generate images and stamp the returned references onto their rows.
    #[instrument(skip(self), fields(story_id = %story_id))]
    pub async fn generate_images(&self, story_id: &str) -> ToolOutcome<ImagesEnvelope> {
        let phase = GenerationPhase::Images;
        if let Some(failure) = self.require_story(story_id).await {
            return failure;
        }

        let result: FabulaResult<Vec<GeneratedImage>> = async {
            let body = self.driver.run_phase(phase, &self.request(story_id)).await?;
            let response: ImagesResponse = Self::parse(phase, body)?;
            for image in &response.images {
                let url = image.url.clone();
                match image.target {
                    ImageTarget::Story => {
                        let patch = StoryPatch {
                            image_url: Some(url),
                            ..Default::default()
                        };
                        self.store.update_story(&image.target_id, patch).await?;
                    }
                    ImageTarget::Scene => {
                        let patch = ScenePatch {
                            image_url: Some(url),
                            ..Default::default()
                        };
                        self.store.update_scene(&image.target_id, patch).await?;
                    }
                    ImageTarget::Character => {
                        let patch = fabula_core::CharacterPatch {
                            image_url: Some(url),
                            ..Default::default()
                        };
                        self.store.update_character(&image.target_id, patch).await?;
                    }
                    ImageTarget::Setting => {
                        let patch = fabula_core::SettingPatch {
                            image_url: Some(url),
                            ..Default::default()
                        };
                        self.store.update_setting(&image.target_id, patch).await?;
                    }
                }
            }
            Ok(response.images)
        }
        .await;

        match result {
            Ok(images) => {
                let message = format!("Generated {} images", images.len());
                ToolOutcome::ok(ImagesEnvelope { images, message })
            }
            Err(e) => Self::failure(phase, &e),
        }
    }
}
