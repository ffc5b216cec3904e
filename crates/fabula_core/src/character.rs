//! Characters.

use crate::new_entity_id;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured personality sketch for a character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personality {
    /// Temperament descriptors
    #[serde(default)]
    pub temperament: Vec<String>,
    /// What the character values
    #[serde(default)]
    pub values: Vec<String>,
    /// Habits and quirks
    #[serde(default)]
    pub quirks: Vec<String>,
}

/// A character belonging to a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Unique identifier (`char_<millis>_<suffix>`)
    pub id: String,
    /// Owning story
    pub story_id: String,
    /// Name
    pub name: String,
    /// Whether this is a main character
    pub is_main: bool,
    /// Narrative role (protagonist, mentor, rival, ...)
    pub role: Option<String>,
    /// Defining trait
    pub core_trait: Option<String>,
    /// Internal flaw the arc works against
    pub internal_flaw: Option<String>,
    /// External goal driving the plot
    pub external_goal: Option<String>,
    /// Backstory
    pub backstory: Option<String>,
    /// Structured personality sketch
    #[serde(default)]
    pub personality: Personality,
    /// Portrait reference
    pub image_url: Option<String>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

/// Attributes for creating a character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCharacter {
    /// Owning story
    pub story_id: String,
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

/// Partial update for a character. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPatch {
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// New main-character flag
    #[serde(default)]
    pub is_main: Option<bool>,
    /// New role
    #[serde(default)]
    pub role: Option<String>,
    /// New defining trait
    #[serde(default)]
    pub core_trait: Option<String>,
    /// New internal flaw
    #[serde(default)]
    pub internal_flaw: Option<String>,
    /// New external goal
    #[serde(default)]
    pub external_goal: Option<String>,
    /// New backstory
    #[serde(default)]
    pub backstory: Option<String>,
    /// New personality sketch
    #[serde(default)]
    pub personality: Option<Personality>,
    /// New portrait reference
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Character {
    /// Build a character from creation attributes, synthesizing the id.
    pub fn create(spec: NewCharacter) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: new_entity_id("char"),
            story_id: spec.story_id,
            name: spec.name,
            is_main: spec.is_main,
            role: spec.role,
            core_trait: spec.core_trait,
            internal_flaw: spec.internal_flaw,
            external_goal: spec.external_goal,
            backstory: spec.backstory,
            personality: spec.personality.unwrap_or_default(),
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial patch and stamp `updated_at`.
    pub fn apply(&mut self, patch: CharacterPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(is_main) = patch.is_main {
            self.is_main = is_main;
        }
        if let Some(role) = patch.role {
            self.role = Some(role);
        }
        if let Some(core_trait) = patch.core_trait {
            self.core_trait = Some(core_trait);
        }
        if let Some(internal_flaw) = patch.internal_flaw {
            self.internal_flaw = Some(internal_flaw);
        }
        if let Some(external_goal) = patch.external_goal {
            self.external_goal = Some(external_goal);
        }
        if let Some(backstory) = patch.backstory {
            self.backstory = Some(backstory);
        }
        if let Some(personality) = patch.personality {
            self.personality = personality;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        self.updated_at = Utc::now().naive_utc();
    }
}
