//! Conversions between domain entities and Diesel rows.
//!
//! Enum-valued columns are stored as text and parsed back with strum;
//! structured columns (personality, element lists, chat context) round-trip
//! through JSONB.

use crate::models::{
    ChapterChangeset, ChapterRow, CharacterChangeset, CharacterRow, ChatSessionRow, PartChangeset,
    PartRow, SceneChangeset, SceneRow, SettingChangeset, SettingRow, StoryChangeset, StoryRow,
};
use crate::DatabaseResult;
use chrono::Utc;
use fabula_core::{
    ArcPosition, Chapter, ChapterPatch, Character, CharacterPatch, CyclePhase, EmotionalBeat,
    MoralFramework, Part, PartPatch, Scene, ScenePatch, Setting, SettingPatch, Story, StoryPatch,
    StoryStatus,
};
use fabula_error::{DatabaseError, DatabaseErrorKind};
use fabula_interface::{ChatContext, ChatSession};
use std::str::FromStr;

fn parse_enum<T: FromStr>(column: &str, value: &str) -> DatabaseResult<T> {
    T::from_str(value).map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Serialization(format!(
            "Invalid {} value: {}",
            column, value
        )))
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> DatabaseResult<serde_json::Value> {
    serde_json::to_value(value).map_err(DatabaseError::from)
}

fn from_json<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> DatabaseResult<T> {
    serde_json::from_value(value).map_err(DatabaseError::from)
}

pub fn story_to_row(story: &Story) -> StoryRow {
    StoryRow {
        id: story.id.clone(),
        user_id: story.user_id.clone(),
        title: story.title.clone(),
        genre: story.genre.clone(),
        status: story.status.to_string(),
        summary: story.summary.clone(),
        tone: story.tone.clone(),
        adversity: story.moral_framework.adversity.clone(),
        virtue: story.moral_framework.virtue.clone(),
        consequence: story.moral_framework.consequence.clone(),
        image_url: story.image_url.clone(),
        created_at: story.created_at,
        updated_at: story.updated_at,
    }
}

pub fn row_to_story(row: StoryRow) -> DatabaseResult<Story> {
    Ok(Story {
        status: parse_enum::<StoryStatus>("status", &row.status)?,
        id: row.id,
        user_id: row.user_id,
        title: row.title,
        genre: row.genre,
        summary: row.summary,
        tone: row.tone,
        moral_framework: MoralFramework {
            adversity: row.adversity,
            virtue: row.virtue,
            consequence: row.consequence,
        },
        image_url: row.image_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn story_patch_to_changeset(patch: StoryPatch) -> StoryChangeset {
    let (adversity, virtue, consequence) = match patch.moral_framework {
        Some(framework) => (
            Some(framework.adversity),
            Some(framework.virtue),
            Some(framework.consequence),
        ),
        None => (None, None, None),
    };
    StoryChangeset {
        title: patch.title,
        genre: patch.genre,
        status: patch.status.map(|s| s.to_string()),
        summary: patch.summary,
        tone: patch.tone,
        adversity,
        virtue,
        consequence,
        image_url: patch.image_url,
        updated_at: Some(Utc::now().naive_utc()),
    }
}

pub fn part_to_row(part: &Part) -> PartRow {
    PartRow {
        id: part.id.clone(),
        story_id: part.story_id.clone(),
        title: part.title.clone(),
        summary: part.summary.clone(),
        order_index: part.order_index,
        character_arc: part.character_arc.clone(),
        created_at: part.created_at,
        updated_at: part.updated_at,
    }
}

pub fn row_to_part(row: PartRow) -> Part {
    Part {
        id: row.id,
        story_id: row.story_id,
        title: row.title,
        summary: row.summary,
        order_index: row.order_index,
        character_arc: row.character_arc,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn part_patch_to_changeset(patch: PartPatch) -> PartChangeset {
    PartChangeset {
        title: patch.title,
        summary: patch.summary,
        order_index: patch.order_index,
        character_arc: patch.character_arc,
        updated_at: Some(Utc::now().naive_utc()),
    }
}

pub fn chapter_to_row(chapter: &Chapter) -> ChapterRow {
    ChapterRow {
        id: chapter.id.clone(),
        story_id: chapter.story_id.clone(),
        part_id: chapter.part_id.clone(),
        character_id: chapter.character_id.clone(),
        title: chapter.title.clone(),
        summary: chapter.summary.clone(),
        order_index: chapter.order_index,
        arc_position: chapter.arc_position.to_string(),
        adversity_type: chapter.adversity_type.clone(),
        virtue_type: chapter.virtue_type.clone(),
        created_at: chapter.created_at,
        updated_at: chapter.updated_at,
    }
}

pub fn row_to_chapter(row: ChapterRow) -> DatabaseResult<Chapter> {
    Ok(Chapter {
        arc_position: parse_enum::<ArcPosition>("arc_position", &row.arc_position)?,
        id: row.id,
        story_id: row.story_id,
        part_id: row.part_id,
        character_id: row.character_id,
        title: row.title,
        summary: row.summary,
        order_index: row.order_index,
        adversity_type: row.adversity_type,
        virtue_type: row.virtue_type,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn chapter_patch_to_changeset(patch: ChapterPatch) -> ChapterChangeset {
    ChapterChangeset {
        part_id: patch.part_id,
        character_id: patch.character_id,
        title: patch.title,
        summary: patch.summary,
        order_index: patch.order_index,
        arc_position: patch.arc_position.map(|p| p.to_string()),
        adversity_type: patch.adversity_type,
        virtue_type: patch.virtue_type,
        updated_at: Some(Utc::now().naive_utc()),
    }
}

pub fn scene_to_row(scene: &Scene) -> SceneRow {
    SceneRow {
        id: scene.id.clone(),
        story_id: scene.story_id.clone(),
        chapter_id: scene.chapter_id.clone(),
        title: scene.title.clone(),
        content: scene.content.clone(),
        order_index: scene.order_index,
        cycle_phase: scene.cycle_phase.to_string(),
        emotional_beat: scene.emotional_beat.to_string(),
        image_url: scene.image_url.clone(),
        created_at: scene.created_at,
        updated_at: scene.updated_at,
    }
}

pub fn row_to_scene(row: SceneRow) -> DatabaseResult<Scene> {
    Ok(Scene {
        cycle_phase: parse_enum::<CyclePhase>("cycle_phase", &row.cycle_phase)?,
        emotional_beat: parse_enum::<EmotionalBeat>("emotional_beat", &row.emotional_beat)?,
        id: row.id,
        story_id: row.story_id,
        chapter_id: row.chapter_id,
        title: row.title,
        content: row.content,
        order_index: row.order_index,
        image_url: row.image_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn scene_patch_to_changeset(patch: ScenePatch) -> SceneChangeset {
    SceneChangeset {
        title: patch.title,
        content: patch.content,
        order_index: patch.order_index,
        cycle_phase: patch.cycle_phase.map(|p| p.to_string()),
        emotional_beat: patch.emotional_beat.map(|b| b.to_string()),
        image_url: patch.image_url,
        updated_at: Some(Utc::now().naive_utc()),
    }
}

pub fn character_to_row(character: &Character) -> DatabaseResult<CharacterRow> {
    Ok(CharacterRow {
        id: character.id.clone(),
        story_id: character.story_id.clone(),
        name: character.name.clone(),
        is_main: character.is_main,
        role: character.role.clone(),
        core_trait: character.core_trait.clone(),
        internal_flaw: character.internal_flaw.clone(),
        external_goal: character.external_goal.clone(),
        backstory: character.backstory.clone(),
        personality: to_json(&character.personality)?,
        image_url: character.image_url.clone(),
        created_at: character.created_at,
        updated_at: character.updated_at,
    })
}

pub fn row_to_character(row: CharacterRow) -> DatabaseResult<Character> {
    Ok(Character {
        personality: from_json(row.personality)?,
        id: row.id,
        story_id: row.story_id,
        name: row.name,
        is_main: row.is_main,
        role: row.role,
        core_trait: row.core_trait,
        internal_flaw: row.internal_flaw,
        external_goal: row.external_goal,
        backstory: row.backstory,
        image_url: row.image_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn character_patch_to_changeset(patch: CharacterPatch) -> DatabaseResult<CharacterChangeset> {
    let personality = match patch.personality {
        Some(personality) => Some(to_json(&personality)?),
        None => None,
    };
    Ok(CharacterChangeset {
        name: patch.name,
        is_main: patch.is_main,
        role: patch.role,
        core_trait: patch.core_trait,
        internal_flaw: patch.internal_flaw,
        external_goal: patch.external_goal,
        backstory: patch.backstory,
        personality,
        image_url: patch.image_url,
        updated_at: Some(Utc::now().naive_utc()),
    })
}

pub fn setting_to_row(setting: &Setting) -> DatabaseResult<SettingRow> {
    Ok(SettingRow {
        id: setting.id.clone(),
        story_id: setting.story_id.clone(),
        name: setting.name.clone(),
        summary: setting.summary.clone(),
        adversity_elements: to_json(&setting.adversity_elements)?,
        virtue_elements: to_json(&setting.virtue_elements)?,
        consequence_elements: to_json(&setting.consequence_elements)?,
        symbolic_meaning: setting.symbolic_meaning.clone(),
        image_url: setting.image_url.clone(),
        created_at: setting.created_at,
        updated_at: setting.updated_at,
    })
}

pub fn row_to_setting(row: SettingRow) -> DatabaseResult<Setting> {
    Ok(Setting {
        adversity_elements: from_json(row.adversity_elements)?,
        virtue_elements: from_json(row.virtue_elements)?,
        consequence_elements: from_json(row.consequence_elements)?,
        id: row.id,
        story_id: row.story_id,
        name: row.name,
        summary: row.summary,
        symbolic_meaning: row.symbolic_meaning,
        image_url: row.image_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn setting_patch_to_changeset(patch: SettingPatch) -> DatabaseResult<SettingChangeset> {
    let adversity_elements = match patch.adversity_elements {
        Some(elements) => Some(to_json(&elements)?),
        None => None,
    };
    let virtue_elements = match patch.virtue_elements {
        Some(elements) => Some(to_json(&elements)?),
        None => None,
    };
    let consequence_elements = match patch.consequence_elements {
        Some(elements) => Some(to_json(&elements)?),
        None => None,
    };
    Ok(SettingChangeset {
        name: patch.name,
        summary: patch.summary,
        adversity_elements,
        virtue_elements,
        consequence_elements,
        symbolic_meaning: patch.symbolic_meaning,
        image_url: patch.image_url,
        updated_at: Some(Utc::now().naive_utc()),
    })
}

pub fn chat_to_row(chat: &ChatSession) -> DatabaseResult<ChatSessionRow> {
    Ok(ChatSessionRow {
        id: chat.id.clone(),
        story_id: chat.story_id.clone(),
        context: to_json(&chat.context)?,
        created_at: chat.created_at,
        updated_at: chat.updated_at,
    })
}

pub fn row_to_chat(row: ChatSessionRow) -> DatabaseResult<ChatSession> {
    let context: ChatContext = from_json(row.context)?;
    Ok(ChatSession {
        id: row.id,
        story_id: row.story_id,
        context,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabula_core::{NewCharacter, NewScene, NewStory, Personality};

    #[test]
    fn test_story_round_trip() {
        let mut story = Story::create(NewStory {
            user_id: "user_1".into(),
            title: "The Orchard Gate".into(),
            genre: Some("fable".into()),
            ..Default::default()
        });
        story.moral_framework = MoralFramework {
            adversity: "drought".into(),
            virtue: "patience".into(),
            consequence: "harvest".into(),
        };
        let round_tripped = row_to_story(story_to_row(&story)).unwrap();
        assert_eq!(round_tripped, story);
    }

    #[test]
    fn test_scene_enum_columns_round_trip() {
        let scene = Scene::create(NewScene {
            story_id: "story_1".into(),
            chapter_id: "chapter_1".into(),
            title: "Storm".into(),
            cycle_phase: Some(CyclePhase::Adversity),
            emotional_beat: Some(EmotionalBeat::Fear),
            ..Default::default()
        });
        let round_tripped = row_to_scene(scene_to_row(&scene)).unwrap();
        assert_eq!(round_tripped, scene);
    }

    #[test]
    fn test_bad_enum_value_is_a_serialization_error() {
        let scene = Scene::create(NewScene {
            story_id: "story_1".into(),
            chapter_id: "chapter_1".into(),
            title: "Storm".into(),
            ..Default::default()
        });
        let mut row = scene_to_row(&scene);
        row.cycle_phase = "interlude".into();
        assert!(row_to_scene(row).is_err());
    }

    #[test]
    fn test_character_personality_round_trips_through_jsonb() {
        let character = Character::create(NewCharacter {
            story_id: "story_1".into(),
            name: "Mara".into(),
            is_main: true,
            personality: Some(Personality {
                temperament: vec!["stoic".into()],
                values: vec!["loyalty".into()],
                quirks: vec!["hums when nervous".into()],
            }),
            ..Default::default()
        });
        let row = character_to_row(&character).unwrap();
        let round_tripped = row_to_character(row).unwrap();
        assert_eq!(round_tripped, character);
    }
}
