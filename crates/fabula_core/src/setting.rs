//! Settings (locations and environments).

use crate::new_entity_id;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A setting with the cycle elements it can host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    /// Unique identifier (`setting_<millis>_<suffix>`)
    pub id: String,
    /// Owning story
    pub story_id: String,
    /// Name
    pub name: String,
    /// Summary
    #[serde(default)]
    pub summary: String,
    /// Adversity elements this setting can stage
    #[serde(default)]
    pub adversity_elements: Vec<String>,
    /// Virtue elements this setting can stage
    #[serde(default)]
    pub virtue_elements: Vec<String>,
    /// Consequence elements this setting can stage
    #[serde(default)]
    pub consequence_elements: Vec<String>,
    /// What the setting stands for
    pub symbolic_meaning: Option<String>,
    /// Illustration reference
    pub image_url: Option<String>,
    /// Creation timestamp
    pub created_at: NaiveDateTime,
    /// Last update timestamp
    pub updated_at: NaiveDateTime,
}

/// Attributes for creating a setting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSetting {
    /// Owning story
    pub story_id: String,
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

/// Partial update for a setting. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingPatch {
    /// New name
    #[serde(default)]
    pub name: Option<String>,
    /// New summary
    #[serde(default)]
    pub summary: Option<String>,
    /// New adversity elements
    #[serde(default)]
    pub adversity_elements: Option<Vec<String>>,
    /// New virtue elements
    #[serde(default)]
    pub virtue_elements: Option<Vec<String>>,
    /// New consequence elements
    #[serde(default)]
    pub consequence_elements: Option<Vec<String>>,
    /// New symbolic meaning
    #[serde(default)]
    pub symbolic_meaning: Option<String>,
    /// New illustration reference
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Setting {
    /// Build a setting from creation attributes, synthesizing the id.
    pub fn create(spec: NewSetting) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: new_entity_id("setting"),
            story_id: spec.story_id,
            name: spec.name,
            summary: spec.summary.unwrap_or_default(),
            adversity_elements: spec.adversity_elements,
            virtue_elements: spec.virtue_elements,
            consequence_elements: spec.consequence_elements,
            symbolic_meaning: spec.symbolic_meaning,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial patch and stamp `updated_at`.
    pub fn apply(&mut self, patch: SettingPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(adversity_elements) = patch.adversity_elements {
            self.adversity_elements = adversity_elements;
        }
        if let Some(virtue_elements) = patch.virtue_elements {
            self.virtue_elements = virtue_elements;
        }
        if let Some(consequence_elements) = patch.consequence_elements {
            self.consequence_elements = consequence_elements;
        }
        if let Some(symbolic_meaning) = patch.symbolic_meaning {
            self.symbolic_meaning = Some(symbolic_meaning);
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        self.updated_at = Utc::now().naive_utc();
    }
}
