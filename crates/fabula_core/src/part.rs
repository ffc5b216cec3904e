//! Story parts (top-level divisions).

use crate::new_entity_id;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A top-level division of a story, holding chapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Unique identifier (`part_<millis>_<suffix>`)
    pub id: String,
    /// Owning story
    pub story_id: String,
    /// Title
    pub title: String,
    /// Summary of the part's role in the story
    #[serde(default)]
    pub summary: String,
    /// Position among siblings (advisory uniqueness only)
    pub order_index: i32,
    /// Notes on how character arcs move in this part
    pub character_arc: Option<String>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

/// Attributes for creating a part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPart {
    /// Owning story
    pub story_id: String,
    /// Title
    pub title: String,
    /// Summary of the part's role in the story
    #[serde(default)]
    pub summary: Option<String>,
    /// Position among siblings
    #[serde(default)]
    pub order_index: Option<i32>,
    /// Notes on how character arcs move in this part
    #[serde(default)]
    pub character_arc: Option<String>,
}

/// Partial update for a part. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartPatch {
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New summary
    #[serde(default)]
    pub summary: Option<String>,
    /// New position among siblings
    #[serde(default)]
    pub order_index: Option<i32>,
    /// New character arc notes
    #[serde(default)]
    pub character_arc: Option<String>,
}

impl Part {
    /// Build a part from creation attributes, synthesizing the id.
    pub fn create(spec: NewPart) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: new_entity_id("part"),
            story_id: spec.story_id,
            title: spec.title,
            summary: spec.summary.unwrap_or_default(),
            order_index: spec.order_index.unwrap_or(0),
            character_arc: spec.character_arc,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial patch and stamp `updated_at`.
    pub fn apply(&mut self, patch: PartPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(order_index) = patch.order_index {
            self.order_index = order_index;
        }
        if let Some(character_arc) = patch.character_arc {
            self.character_arc = Some(character_arc);
        }
        self.updated_at = Utc::now().naive_utc();
    }
}
