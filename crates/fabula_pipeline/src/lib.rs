//! Generation pipeline orchestration for Fabula.
//!
//! This crate ties the nine-phase generation sequence together:
//!
//! - [`StoryTools`] — typed CRUD envelopes over the entity store
//! - [`Advisor`] — read-only prerequisite / next-phase / structure queries
//! - [`GenerationInvoker`] — one fire-and-forget call per phase against the
//!   external generation endpoint, persisting results into the store
//! - [`ProgressTracker`] — per-session completion tracking with a static
//!   time estimate
//! - [`HttpGenerationClient`] — reqwest driver for the generation server
//! - [`InMemoryStoryStore`] / [`InMemoryChatStore`] — test stores
//!
//! Every tool-facing operation returns the
//! [`ToolOutcome`](fabula_interface::ToolOutcome) envelope and never panics
//! or escapes an error type: callers branch on `success`.
//!
//! Control flow, end to end: ask the [`Advisor`] whether a phase's
//! prerequisites are met; if so, run the phase through the
//! [`GenerationInvoker`]; record completion with the [`ProgressTracker`];
//! then ask the advisor for the next phase.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod advisory;
mod client;
mod invoker;
mod memory;
mod progress;
mod settings;
mod tools;

pub use advisory::{Advisor, NextPhasePayload, PrerequisiteReport, StructureReport};
pub use client::HttpGenerationClient;
pub use invoker::{
    ChaptersEnvelope, CharactersEnvelope, EvaluationsEnvelope, GenerationInvoker, ImagesEnvelope,
    PartsEnvelope, ScenesEnvelope, SettingsEnvelope, SummaryEnvelope,
};
pub use memory::{InMemoryChatStore, InMemoryStoryStore};
pub use progress::{
    GenerationProgressPayload, PhaseProgressPayload, ProgressSnapshot, ProgressTracker,
    TimeEstimate,
};
pub use settings::GenerationSettings;
pub use tools::{
    ChapterPayload, CharacterPayload, DeletePayload, PartPayload, ScenePayload, SettingPayload,
    StoryPayload, StoryTools,
};
