//! Core data types for the Fabula story generation library.
//!
//! This crate provides the foundation data types used across all Fabula
//! interfaces: the six story entities, the nine-phase generation sequence,
//! and telemetry initialization.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chapter;
mod character;
mod id;
mod part;
mod phase;
mod scene;
mod setting;
mod story;
mod telemetry;

pub use chapter::{ArcPosition, Chapter, ChapterPatch, NewChapter};
pub use character::{Character, CharacterPatch, NewCharacter, Personality};
pub use id::new_entity_id;
pub use part::{NewPart, Part, PartPatch};
pub use phase::GenerationPhase;
pub use scene::{CyclePhase, EmotionalBeat, NewScene, Scene, ScenePatch};
pub use setting::{NewSetting, Setting, SettingPatch};
pub use story::{MoralFramework, NewStory, Story, StoryPatch, StoryStatus};
pub use telemetry::init_telemetry;
