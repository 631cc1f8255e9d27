use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single shopping list entry, addressed by `(list_id, item_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub list_id: String,
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub done: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Item {
    /// Creates a fresh, not-done item with a newly minted id.
    ///
    /// `createdAt` and `updatedAt` are stamped from the same instant.
    pub fn new(list_id: impl Into<String>, text: Option<String>, now: DateTime<Utc>) -> Self {
        let stamp = timestamp(now);
        Self {
            list_id: list_id.into(),
            item_id: Uuid::new_v4().to_string(),
            text,
            done: false,
            created_at: stamp.clone(),
            updated_at: stamp,
        }
    }
}

/// Body of `POST /lists/{listId}/items`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(default)]
    pub text: Option<String>,
}

/// Body of `PUT /lists/{listId}/items/{itemId}`. Absent fields are left untouched.
///
/// A field sent as JSON `null` is read the same as an absent one and leaves
/// the stored value as it is; it never clears `text` or `done`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

/// Renders `now` as RFC 3339 UTC with millisecond precision, e.g. `2024-05-01T09:30:00.123Z`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_item_is_not_done_and_stamped_once() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let item = Item::new("L1", Some("milk".to_string()), now);

        assert_eq!(item.list_id, "L1");
        assert_eq!(item.text.as_deref(), Some("milk"));
        assert!(!item.done);
        assert_eq!(item.created_at, "2024-05-01T09:30:00.000Z");
        assert_eq!(item.created_at, item.updated_at);
        assert!(Uuid::parse_str(&item.item_id).is_ok());
    }

    #[test]
    fn minted_ids_are_distinct() {
        let now = Utc::now();
        let a = Item::new("L1", None, now);
        let b = Item::new("L1", None, now);
        assert_ne!(a.item_id, b.item_id);
    }

    #[test]
    fn item_uses_camel_case_and_omits_missing_text() {
        let item = Item {
            list_id: "L1".to_string(),
            item_id: "abc".to_string(),
            text: None,
            done: true,
            created_at: "2024-05-01T09:30:00.000Z".to_string(),
            updated_at: "2024-05-01T09:31:00.000Z".to_string(),
        };
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["listId"], "L1");
        assert_eq!(json["itemId"], "abc");
        assert_eq!(json["done"], true);
        assert_eq!(json["updatedAt"], "2024-05-01T09:31:00.000Z");
        assert!(json.get("text").is_none());
    }

    #[test]
    fn patch_treats_null_as_absent() {
        let patch: ItemPatch = serde_json::from_str(r#"{"text":null,"done":true}"#).unwrap();
        assert_eq!(patch.text, None);
        assert_eq!(patch.done, Some(true));

        let empty: ItemPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ItemPatch::default());
    }

    #[test]
    fn new_item_ignores_unknown_fields() {
        let body: NewItem = serde_json::from_str(r#"{"text":"eggs","done":true}"#).unwrap();
        assert_eq!(body.text.as_deref(), Some("eggs"));
    }

    #[test]
    fn timestamps_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let later = earlier + chrono::Duration::milliseconds(5);
        assert!(timestamp(earlier) < timestamp(later));
    }
}
