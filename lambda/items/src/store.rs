use async_trait::async_trait;
use kaimono_shared::{Item, ItemPatch};

#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("{0}")]
    Backend(String),
    #[error("stored item is missing attribute `{field}`")]
    Malformed { field: &'static str },
}

/// Point and partition access to item rows keyed by `(listId, itemId)`.
#[async_trait]
pub(crate) trait ItemStore: Send + Sync {
    async fn put(&self, item: &Item) -> Result<(), StoreError>;

    async fn get(&self, list_id: &str, item_id: &str) -> Result<Option<Item>, StoreError>;

    /// Applies `update` to an existing row and returns the row as written.
    /// Returns `Ok(None)` if no row has this key.
    async fn update(
        &self,
        list_id: &str,
        item_id: &str,
        update: &ItemUpdate,
    ) -> Result<Option<Item>, StoreError>;

    /// Removing an absent key is not an error.
    async fn delete(&self, list_id: &str, item_id: &str) -> Result<(), StoreError>;

    async fn query(&self, list_id: &str) -> Result<Vec<Item>, StoreError>;
}

/// A partial update. `updatedAt` is always part of the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ItemUpdate {
    pub text: Option<String>,
    pub done: Option<bool>,
    pub updated_at: String,
}

impl ItemUpdate {
    pub fn new(patch: ItemPatch, updated_at: String) -> Self {
        Self {
            text: patch.text,
            done: patch.done,
            updated_at,
        }
    }

    pub fn apply(&self, item: &mut Item) {
        if let Some(text) = &self.text {
            item.text = Some(text.clone());
        }
        if let Some(done) = self.done {
            item.done = done;
        }
        item.updated_at = self.updated_at.clone();
    }
}
