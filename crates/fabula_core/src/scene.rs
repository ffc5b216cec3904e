//! Scenes and their cycle annotations.

use crate::new_entity_id;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a scene sits in the adversity cycle.
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
pub enum CyclePhase {
    /// Establishes normalcy before the cycle turns
    Setup,
    /// The adversity lands
    Adversity,
    /// The virtue is exercised
    Virtue,
    /// The consequence plays out
    Consequence,
    /// Connective tissue between cycles
    Transition,
}

/// The dominant emotional beat of a scene.
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
pub enum EmotionalBeat {
    /// Things may yet work out
    Hope,
    /// Danger closing in
    Fear,
    /// Unresolved pressure
    Tension,
    /// Pressure released
    Relief,
    /// Loss felt
    Grief,
    /// Open happiness
    Joy,
    /// Hot conflict
    Anger,
    /// Quiet determination
    Resolve,
}

/// A scene: the unit of prose.
///
/// A scene with an empty `content` is an outline from the scene-summaries
/// phase; the store does not otherwise record which phase produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Unique identifier (`scene_<millis>_<suffix>`)
    pub id: String,
    /// Owning story
    pub story_id: String,
    /// Containing chapter
    pub chapter_id: String,
    /// Title
    pub title: String,
    /// Prose content; empty until the scene-content phase runs
    #[serde(default)]
    pub content: String,
    /// Position among siblings (advisory uniqueness only)
    pub order_index: i32,
    /// Position in the adversity cycle
    pub cycle_phase: CyclePhase,
    /// Dominant emotional beat
    pub emotional_beat: EmotionalBeat,
    /// Illustration reference
    pub image_url: Option<String>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

/// Attributes for creating a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScene {
    /// Owning story
    pub story_id: String,
    /// Containing chapter
    pub chapter_id: String,
    /// Title
    pub title: String,
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

/// Partial update for a scene. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePatch {
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New prose content
    #[serde(default)]
    pub content: Option<String>,
    /// New position among siblings
    #[serde(default)]
    pub order_index: Option<i32>,
    /// New cycle phase
    #[serde(default)]
    pub cycle_phase: Option<CyclePhase>,
    /// New emotional beat
    #[serde(default)]
    pub emotional_beat: Option<EmotionalBeat>,
    /// New illustration reference
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Scene {
    /// Build a scene from creation attributes, synthesizing the id and
    /// applying defaults (cycle phase `setup`, emotional beat `hope`).
    pub fn create(spec: NewScene) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: new_entity_id("scene"),
            story_id: spec.story_id,
            chapter_id: spec.chapter_id,
            title: spec.title,
            content: spec.content.unwrap_or_default(),
            order_index: spec.order_index.unwrap_or(0),
            cycle_phase: spec.cycle_phase.unwrap_or(CyclePhase::Setup),
            emotional_beat: spec.emotional_beat.unwrap_or(EmotionalBeat::Hope),
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial patch and stamp `updated_at`.
    pub fn apply(&mut self, patch: ScenePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(order_index) = patch.order_index {
            self.order_index = order_index;
        }
        if let Some(cycle_phase) = patch.cycle_phase {
            self.cycle_phase = cycle_phase;
        }
        if let Some(emotional_beat) = patch.emotional_beat {
            self.emotional_beat = emotional_beat;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        self.updated_at = Utc::now().naive_utc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_defaults() {
        let scene = Scene::create(NewScene {
            story_id: "story_1".into(),
            chapter_id: "chapter_1".into(),
            title: "Cold open".into(),
            ..Default::default()
        });
        assert_eq!(scene.cycle_phase, CyclePhase::Setup);
        assert_eq!(scene.emotional_beat, EmotionalBeat::Hope);
        assert_eq!(scene.content, "");
    }

    #[test]
    fn test_beat_names_round_trip() {
        use std::str::FromStr;
        for beat in [
            EmotionalBeat::Hope,
            EmotionalBeat::Fear,
            EmotionalBeat::Tension,
            EmotionalBeat::Relief,
            EmotionalBeat::Grief,
            EmotionalBeat::Joy,
            EmotionalBeat::Anger,
            EmotionalBeat::Resolve,
        ] {
            assert_eq!(EmotionalBeat::from_str(&beat.to_string()).unwrap(), beat);
        }
    }
}
