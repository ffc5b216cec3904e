//! Fabula - AI-assisted story generation orchestration
//!
//! Fabula provides typed CRUD over a six-entity story aggregate, a
//! nine-phase generation sequence with prerequisite checking, an HTTP
//! invoker for an external generation endpoint, and per-session progress
//! tracking.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fabula::{
//!     Advisor, GenerationInvoker, GenerationSettings, HttpGenerationClient,
//!     InMemoryStoryStore, NewStory, StoryTools,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryStoryStore::new());
//!     let tools = StoryTools::new(store.clone());
//!     let advisor = Advisor::new(store.clone());
//!
//!     let created = tools
//!         .create_story(NewStory {
//!             user_id: "user_1".into(),
//!             title: "The Long Winter".into(),
//!             ..Default::default()
//!         })
//!         .await;
//!     let story_id = &created.payload().unwrap().story.id;
//!
//!     let suggestion = advisor.suggest_next_phase(story_id).await;
//!     println!("Next: {:?}", suggestion.payload());
//!
//!     let client = HttpGenerationClient::new(GenerationSettings::load()?)?;
//!     let invoker = GenerationInvoker::new(client, store);
//!     let outcome = invoker.generate_summary(story_id).await;
//!     println!("{}", serde_json::to_string(&outcome)?);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Fabula is organized as a workspace with focused crates:
//!
//! - `fabula_core` - Entity types and the phase sequence
//! - `fabula_interface` - Store and driver traits, result envelope
//! - `fabula_error` - Error types
//! - `fabula_database` - PostgreSQL persistence (feature `database`)
//! - `fabula_pipeline` - Advisory, invoker, progress, tool surface
//!
//! This crate (`fabula`) re-exports everything for convenience.
//!
//! # Cargo Features
//!
//! - `database` - PostgreSQL persistence via Diesel (enabled by default)

#![forbid(unsafe_code)]

pub use fabula_core::{
    init_telemetry, new_entity_id, ArcPosition, Chapter, ChapterPatch, Character, CharacterPatch,
    CyclePhase, EmotionalBeat, GenerationPhase, MoralFramework, NewChapter, NewCharacter, NewPart,
    NewScene, NewSetting, NewStory, Part, PartPatch, Personality, Scene, ScenePatch, Setting,
    SettingPatch, Story, StoryPatch, StoryStatus,
};

pub use fabula_error::{FabulaError, FabulaErrorKind, FabulaResult};

pub use fabula_interface::{
    ChapterSeed, CharacterSeed, ChatContext, ChatSession, ChatStore, GeneratedImage, ImageTarget,
    PartSeed, PhaseGenerator, PhaseRequest, SceneEvaluation, SceneSeed, SettingSeed, StoryCounts,
    StoryStore, SummarySeed, ToolOutcome,
};

pub use fabula_pipeline::{
    Advisor, ChapterPayload, ChaptersEnvelope, CharacterPayload, CharactersEnvelope,
    DeletePayload, EvaluationsEnvelope, GenerationInvoker, GenerationProgressPayload,
    GenerationSettings, HttpGenerationClient, ImagesEnvelope, InMemoryChatStore,
    InMemoryStoryStore, NextPhasePayload, PartPayload, PartsEnvelope, PhaseProgressPayload,
    PrerequisiteReport, ProgressSnapshot, ProgressTracker, ScenePayload, ScenesEnvelope,
    SettingPayload, SettingsEnvelope, StoryPayload, StoryTools, StructureReport, SummaryEnvelope,
    TimeEstimate,
};

#[cfg(feature = "database")]
pub use fabula_database::{
    establish_connection, run_migrations, PostgresChatStore, PostgresStoryStore,
};
