//! Feed item entity.

use serde::{Deserialize, Serialize};

/// A single entry of the paginated list resource.
///
/// Decoded once from the wire and immutable afterwards. Identity is `id`,
/// but the feed performs no deduplication: if the backend returns
/// overlapping ranges, duplicates are kept in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier assigned by the backend.
    pub id: u64,
    /// Short title text.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Identifier of the user that owns this item.
    #[serde(rename = "userId")]
    pub owner_id: u64,
}

impl Item {
    /// Creates a new item.
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>, body: impl Into<String>, owner_id: u64) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            owner_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_wire_field_names() {
        let json = r#"{"id": 7, "title": "hello", "body": "world", "userId": 3}"#;
        let item: Item = serde_json::from_str(json).unwrap();

        assert_eq!(item.id, 7);
        assert_eq!(item.title, "hello");
        assert_eq!(item.body, "world");
        assert_eq!(item.owner_id, 3);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let json = r#"{"id": 7, "title": "hello", "userId": 3}"#;
        assert!(serde_json::from_str::<Item>(json).is_err());
    }
}
