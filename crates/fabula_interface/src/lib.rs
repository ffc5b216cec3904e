//! Trait definitions for the Fabula story generation library.
//!
//! This crate provides the seams between the orchestration layer and its
//! collaborators: the entity store, the chat-session store, and the outbound
//! generation driver, plus the uniform result envelope every tool-facing
//! operation returns.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chat;
mod envelope;
mod generation;
mod store;

pub use chat::{ChatContext, ChatSession, ChatStore};
pub use envelope::ToolOutcome;
pub use generation::{
    ChapterSeed, CharacterSeed, GeneratedImage, ImageTarget, PartSeed, PhaseGenerator,
    PhaseRequest, SceneEvaluation, SceneSeed, SettingSeed, SummarySeed,
};
pub use store::{StoryCounts, StoryStore};
