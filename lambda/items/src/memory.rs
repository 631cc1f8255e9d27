use crate::store::{ItemStore, ItemUpdate, StoreError};
use async_trait::async_trait;
use kaimono_shared::Item;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-process store with the same key semantics as the DynamoDB table.
/// Rows live only as long as the process.
#[derive(Default)]
pub(crate) struct MemoryItemStore {
    rows: RwLock<BTreeMap<(String, String), Item>>,
}

impl MemoryItemStore {
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

fn key(list_id: &str, item_id: &str) -> (String, String) {
    (list_id.to_string(), item_id.to_string())
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn put(&self, item: &Item) -> Result<(), StoreError> {
        self.rows
            .write()
            .await
            .insert(key(&item.list_id, &item.item_id), item.clone());
        Ok(())
    }

    async fn get(&self, list_id: &str, item_id: &str) -> Result<Option<Item>, StoreError> {
        Ok(self.rows.read().await.get(&key(list_id, item_id)).cloned())
    }

    async fn update(
        &self,
        list_id: &str,
        item_id: &str,
        update: &ItemUpdate,
    ) -> Result<Option<Item>, StoreError> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&key(list_id, item_id)).map(|item| {
            update.apply(item);
            item.clone()
        }))
    }

    async fn delete(&self, list_id: &str, item_id: &str) -> Result<(), StoreError> {
        self.rows.write().await.remove(&key(list_id, item_id));
        Ok(())
    }

    async fn query(&self, list_id: &str) -> Result<Vec<Item>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|((list, _), _)| list == list_id)
            .map(|(_, item)| item.clone())
            .collect())
    }
}
