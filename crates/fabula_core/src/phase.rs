//! The nine-phase generation sequence.

use serde::{Deserialize, Serialize};

/// One named stage in the content generation sequence.
///
/// Phases form a fixed order; each phase's generation call expects the
/// entities of the phases before it to already exist in the store.
///
/// # Examples
///
/// ```
/// use fabula_core::GenerationPhase;
/// use std::str::FromStr;
///
/// let phase = GenerationPhase::from_str("scene-content").unwrap();
/// assert_eq!(phase.next(), Some(GenerationPhase::Evaluation));
/// assert_eq!(GenerationPhase::Images.next(), None);
/// ```
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
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GenerationPhase {
    /// Story summary, tone, and moral framework
    StorySummary,
    /// Main and supporting characters
    Characters,
    /// Settings with adversity/virtue/consequence elements
    Settings,
    /// High-level parts of the story
    Parts,
    /// Chapters within parts
    Chapters,
    /// Scene outlines for each chapter
    SceneSummaries,
    /// Full scene prose
    SceneContent,
    /// Scene evaluation and improvement
    Evaluation,
    /// Cover and scene images
    Images,
}

impl GenerationPhase {
    /// Number of phases in the sequence.
    pub const COUNT: usize = 9;

    /// All phases in generation order.
    pub const ORDER: [GenerationPhase; Self::COUNT] = [
        GenerationPhase::StorySummary,
        GenerationPhase::Characters,
        GenerationPhase::Settings,
        GenerationPhase::Parts,
        GenerationPhase::Chapters,
        GenerationPhase::SceneSummaries,
        GenerationPhase::SceneContent,
        GenerationPhase::Evaluation,
        GenerationPhase::Images,
    ];

    /// Zero-based position of this phase in the sequence.
    pub fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|p| *p == self)
            .expect("phase is a member of ORDER")
    }

    /// The phase that follows this one, or `None` for the last phase.
    pub fn next(self) -> Option<GenerationPhase> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// Human-readable label used in advisory messages.
    pub fn label(self) -> &'static str {
        match self {
            GenerationPhase::StorySummary => "Story summary",
            GenerationPhase::Characters => "Character",
            GenerationPhase::Settings => "Setting",
            GenerationPhase::Parts => "Part",
            GenerationPhase::Chapters => "Chapter",
            GenerationPhase::SceneSummaries => "Scene summary",
            GenerationPhase::SceneContent => "Scene content",
            GenerationPhase::Evaluation => "Evaluation",
            GenerationPhase::Images => "Image",
        }
    }

    /// URL path segment for the generation endpoint.
    pub fn path(self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_order_covers_all_variants() {
        let from_iter: Vec<GenerationPhase> = GenerationPhase::iter().collect();
        assert_eq!(from_iter, GenerationPhase::ORDER.to_vec());
    }

    #[test]
    fn test_kebab_case_names() {
        assert_eq!(GenerationPhase::StorySummary.to_string(), "story-summary");
        assert_eq!(GenerationPhase::SceneSummaries.to_string(), "scene-summaries");
        assert_eq!(
            GenerationPhase::from_str("scene-content").unwrap(),
            GenerationPhase::SceneContent
        );
    }

    #[test]
    fn test_next_walks_the_sequence() {
        let mut phase = GenerationPhase::StorySummary;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            seen.push(next);
            phase = next;
        }
        assert_eq!(seen.len(), GenerationPhase::COUNT);
        assert_eq!(phase, GenerationPhase::Images);
    }
}
