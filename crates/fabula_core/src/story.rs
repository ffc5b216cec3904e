//! The story aggregate root.

use crate::new_entity_id;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a story.
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
pub enum StoryStatus {
    /// Created but generation has not finished
    Draft,
    /// Generation or writing is underway
    InProgress,
    /// All phases complete
    Completed,
}

/// The adversity/virtue/consequence framework a story is built around.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoralFramework {
    /// The adversity the protagonist faces
    #[serde(default)]
    pub adversity: String,
    /// The virtue exercised against it
    #[serde(default)]
    pub virtue: String,
    /// The consequence that follows
    #[serde(default)]
    pub consequence: String,
}

/// A story and its generation-relevant attributes.
///
/// An empty `summary` means the story-summary phase has not run yet; the
/// advisory layer keys its first existence check off that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    /// Unique identifier (`story_<millis>_<suffix>`)
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Title
    pub title: String,
    /// Genre, free-form
    pub genre: Option<String>,
    /// Lifecycle status
    pub status: StoryStatus,
    /// One-paragraph summary; empty until generated or written
    #[serde(default)]
    pub summary: String,
    /// Narrative tone
    pub tone: Option<String>,
    /// Moral framework driving the cycle structure
    #[serde(default)]
    pub moral_framework: MoralFramework,
    /// Cover image reference
    pub image_url: Option<String>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

/// Attributes for creating a story.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStory {
    /// Owning user
    pub user_id: String,
    /// Title
    pub title: String,
    /// Genre, free-form
    #[serde(default)]
    pub genre: Option<String>,
    /// Narrative tone
    #[serde(default)]
    pub tone: Option<String>,
    /// Initial summary, if already written
    #[serde(default)]
    pub summary: Option<String>,
}

/// Partial update for a story. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPatch {
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New genre
    #[serde(default)]
    pub genre: Option<String>,
    /// New status
    #[serde(default)]
    pub status: Option<StoryStatus>,
    /// New summary
    #[serde(default)]
    pub summary: Option<String>,
    /// New tone
    #[serde(default)]
    pub tone: Option<String>,
    /// New moral framework
    #[serde(default)]
    pub moral_framework: Option<MoralFramework>,
    /// New cover image reference
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Story {
    /// Build a story from creation attributes, synthesizing the id and
    /// applying defaults (status `draft`, empty summary).
    pub fn create(spec: NewStory) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: new_entity_id("story"),
            user_id: spec.user_id,
            title: spec.title,
            genre: spec.genre,
            status: StoryStatus::Draft,
            summary: spec.summary.unwrap_or_default(),
            tone: spec.tone,
            moral_framework: MoralFramework::default(),
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial patch and stamp `updated_at`.
    pub fn apply(&mut self, patch: StoryPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(genre) = patch.genre {
            self.genre = Some(genre);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(tone) = patch.tone {
            self.tone = Some(tone);
        }
        if let Some(framework) = patch.moral_framework {
            self.moral_framework = framework;
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
    fn test_create_applies_defaults() {
        let story = Story::create(NewStory {
            user_id: "user_1".into(),
            title: "The Long Winter".into(),
            ..Default::default()
        });
        assert_eq!(story.status, StoryStatus::Draft);
        assert_eq!(story.summary, "");
        assert!(story.id.starts_with("story_"));
    }

    #[test]
    fn test_apply_merges_and_stamps() {
        let mut story = Story::create(NewStory {
            user_id: "user_1".into(),
            title: "Draft".into(),
            ..Default::default()
        });
        let created = story.updated_at;
        story.apply(StoryPatch {
            summary: Some("A hook".into()),
            status: Some(StoryStatus::InProgress),
            ..Default::default()
        });
        assert_eq!(story.summary, "A hook");
        assert_eq!(story.status, StoryStatus::InProgress);
        assert_eq!(story.title, "Draft");
        assert!(story.updated_at >= created);
    }
}
