//! Entity identifier synthesis.

use chrono::Utc;

/// Synthesize a new entity identifier.
///
/// Identifiers take the form `<prefix>_<millis>_<suffix>`, where the suffix
/// is drawn from a v4 UUID. The millisecond component makes ids roughly
/// sortable by creation time; uniqueness rests on the random suffix.
///
/// # Examples
///
/// ```
/// use fabula_core::new_entity_id;
///
/// let id = new_entity_id("scene");
/// assert!(id.starts_with("scene_"));
/// assert_eq!(id.split('_').count(), 3);
/// ```
pub fn new_entity_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, millis, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_shape() {
        let id = new_entity_id("story");
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "story");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = new_entity_id("char");
        let b = new_entity_id("char");
        assert_ne!(a, b);
    }
}
