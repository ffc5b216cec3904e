//! Chapters.

use crate::new_entity_id;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a chapter falls in the dramatic arc.
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
pub enum ArcPosition {
    /// Establishing material
    Beginning,
    /// Rising action
    Middle,
    /// Peak confrontation
    Climax,
    /// Falling action and closure
    Resolution,
}

/// A chapter, optionally scoped to a part and focused on a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Unique identifier (`chapter_<millis>_<suffix>`)
    pub id: String,
    /// Owning story
    pub story_id: String,
    /// Containing part, if parts are in use
    pub part_id: Option<String>,
    /// Viewpoint or focus character
    pub character_id: Option<String>,
    /// Title
    pub title: String,
    /// Summary
    #[serde(default)]
    pub summary: String,
    /// Position among siblings (advisory uniqueness only)
    pub order_index: i32,
    /// Position in the dramatic arc
    pub arc_position: ArcPosition,
    /// Kind of adversity this chapter turns on
    pub adversity_type: Option<String>,
    /// Kind of virtue answering it
    pub virtue_type: Option<String>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

/// Attributes for creating a chapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChapter {
    /// Owning story
    pub story_id: String,
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

/// Partial update for a chapter. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterPatch {
    /// New containing part
    #[serde(default)]
    pub part_id: Option<String>,
    /// New viewpoint character
    #[serde(default)]
    pub character_id: Option<String>,
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New summary
    #[serde(default)]
    pub summary: Option<String>,
    /// New position among siblings
    #[serde(default)]
    pub order_index: Option<i32>,
    /// New arc position
    #[serde(default)]
    pub arc_position: Option<ArcPosition>,
    /// New adversity type
    #[serde(default)]
    pub adversity_type: Option<String>,
    /// New virtue type
    #[serde(default)]
    pub virtue_type: Option<String>,
}

impl Chapter {
    /// Build a chapter from creation attributes, synthesizing the id and
    /// defaulting the arc position to `beginning`.
    pub fn create(spec: NewChapter) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: new_entity_id("chapter"),
            story_id: spec.story_id,
            part_id: spec.part_id,
            character_id: spec.character_id,
            title: spec.title,
            summary: spec.summary.unwrap_or_default(),
            order_index: spec.order_index.unwrap_or(0),
            arc_position: spec.arc_position.unwrap_or(ArcPosition::Beginning),
            adversity_type: spec.adversity_type,
            virtue_type: spec.virtue_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial patch and stamp `updated_at`.
    pub fn apply(&mut self, patch: ChapterPatch) {
        if let Some(part_id) = patch.part_id {
            self.part_id = Some(part_id);
        }
        if let Some(character_id) = patch.character_id {
            self.character_id = Some(character_id);
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(order_index) = patch.order_index {
            self.order_index = order_index;
        }
        if let Some(arc_position) = patch.arc_position {
            self.arc_position = arc_position;
        }
        if let Some(adversity_type) = patch.adversity_type {
            self.adversity_type = Some(adversity_type);
        }
        if let Some(virtue_type) = patch.virtue_type {
            self.virtue_type = Some(virtue_type);
        }
        self.updated_at = Utc::now().naive_utc();
    }
}
