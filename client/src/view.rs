use crate::api::ItemsApi;
use crate::error::ClientError;
use kaimono_shared::Item;
use std::fmt::Write;
use tracing::{debug, error};

/// The rendered state of one list.
///
/// Every successful mutation is followed by a full re-fetch, and every fetch
/// replaces the whole collection. A failed call is logged and leaves the
/// current collection untouched.
pub struct ListView<A> {
    api: A,
    items: Vec<Item>,
}

impl<A: ItemsApi> ListView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Replaces the collection with the server's. Returns `false` on failure.
    pub async fn refresh(&mut self) -> bool {
        match self.api.fetch_items().await {
            Ok(items) => {
                debug!(count = items.len(), "loaded items");
                self.items = items;
                true
            }
            Err(e) => {
                error!(error = %e, "error loading items");
                false
            }
        }
    }

    /// Adds `text` unless it is blank. Returns `true` once the item was
    /// accepted, which is when an input field should be cleared.
    pub async fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        match self.api.add_item(text).await {
            Ok(_) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                error!(error = %e, "error adding item");
                false
            }
        }
    }

    /// Flips `done` on an item in the current view.
    pub async fn toggle(&mut self, item_id: &str) -> bool {
        let result = match self.items.iter().find(|i| i.item_id == item_id) {
            Some(item) => self.api.set_done(item_id, !item.done).await.map(|_| ()),
            None => Err(ClientError::UnknownItem(item_id.to_string())),
        };
        self.settle(result, "error updating item").await
    }

    pub async fn delete(&mut self, item_id: &str) -> bool {
        let result = self.api.delete_item(item_id).await;
        self.settle(result, "error deleting item").await
    }

    async fn settle(&mut self, result: Result<(), ClientError>, context: &str) -> bool {
        match result {
            Ok(()) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                error!(error = %e, "{}", context);
                false
            }
        }
    }

    /// One line per item: `[x] text  (itemId)`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            let mark = if item.done { 'x' } else { ' ' };
            let _ = writeln!(
                out,
                "[{}] {}  ({})",
                mark,
                item.text.as_deref().unwrap_or(""),
                item.item_id
            );
        }
        out
    }
}
