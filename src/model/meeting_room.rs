use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Amenities are stored comma-separated in one column; order is preserved.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct MeetingRoom {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Blue Room")]
    pub name: String,

    #[schema(example = 8)]
    pub capacity: u32,

    #[schema(example = "whiteboard,tv,video-call")]
    pub amenities: String,
}

impl MeetingRoom {
    pub fn amenity_list(&self) -> Vec<String> {
        split_amenities(&self.amenities)
    }
}

pub fn split_amenities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joined form for storage. Rejects empty entries and duplicates.
pub fn join_amenities(amenities: &[String]) -> Result<String, String> {
    let mut seen = Vec::with_capacity(amenities.len());
    for amenity in amenities {
        let trimmed = amenity.trim();
        if trimmed.is_empty() {
            return Err("amenities must not contain empty entries".to_string());
        }
        if seen.iter().any(|s: &String| s == trimmed) {
            return Err(format!("duplicate amenity: {trimmed}"));
        }
        seen.push(trimmed.to_string());
    }
    Ok(seen.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_preserves_order() {
        let list = vec!["tv".to_string(), "whiteboard".to_string()];
        assert_eq!(join_amenities(&list).unwrap(), "tv,whiteboard");
    }

    #[test]
    fn join_rejects_duplicates_and_blanks() {
        let dup = vec!["tv".to_string(), "tv".to_string()];
        assert!(join_amenities(&dup).is_err());
        let blank = vec!["tv".to_string(), "  ".to_string()];
        assert!(join_amenities(&blank).is_err());
    }

    #[test]
    fn split_round_trip() {
        assert_eq!(
            split_amenities("whiteboard, tv ,video-call"),
            vec!["whiteboard", "tv", "video-call"]
        );
        assert!(split_amenities("").is_empty());
    }
}
