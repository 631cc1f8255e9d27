use crate::store::{ItemStore, ItemUpdate, StoreError};
use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use kaimono_shared::Item;
use lambda_http::tracing;
use std::collections::HashMap;

type Row = HashMap<String, AttributeValue>;

/// Item rows in a DynamoDB table with `listId` as partition key and `itemId` as sort key.
pub(crate) struct DynamoItemStore {
    client: Client,
    table: String,
}

impl DynamoItemStore {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

/// The full source chain goes to the log; callers only see the service message.
fn backend<E: ProvideErrorMetadata + std::error::Error>(err: E) -> StoreError {
    tracing::error!(error = %DisplayErrorContext(&err), "dynamodb request failed");
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());
    StoreError::Backend(message)
}

fn to_row(item: &Item) -> Row {
    let mut row = HashMap::new();
    row.insert("listId".to_string(), AttributeValue::S(item.list_id.clone()));
    row.insert("itemId".to_string(), AttributeValue::S(item.item_id.clone()));
    if let Some(text) = &item.text {
        row.insert("text".to_string(), AttributeValue::S(text.clone()));
    }
    row.insert("done".to_string(), AttributeValue::Bool(item.done));
    row.insert(
        "createdAt".to_string(),
        AttributeValue::S(item.created_at.clone()),
    );
    row.insert(
        "updatedAt".to_string(),
        AttributeValue::S(item.updated_at.clone()),
    );
    row
}

fn string_attr(row: &Row, field: &'static str) -> Result<String, StoreError> {
    row.get(field)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or(StoreError::Malformed { field })
}

fn from_row(row: &Row) -> Result<Item, StoreError> {
    Ok(Item {
        list_id: string_attr(row, "listId")?,
        item_id: string_attr(row, "itemId")?,
        text: row.get("text").and_then(|v| v.as_s().ok()).cloned(),
        done: row
            .get("done")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
        created_at: string_attr(row, "createdAt")?,
        updated_at: string_attr(row, "updatedAt")?,
    })
}

/// `SET` expression for `update`, with placeholders only for the fields it carries.
fn update_expression(
    update: &ItemUpdate,
) -> (
    String,
    HashMap<String, String>,
    HashMap<String, AttributeValue>,
) {
    let mut clauses = Vec::new();
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    if let Some(text) = &update.text {
        clauses.push("#T = :text");
        names.insert("#T".to_string(), "text".to_string());
        values.insert(":text".to_string(), AttributeValue::S(text.clone()));
    }
    if let Some(done) = update.done {
        clauses.push("#D = :done");
        names.insert("#D".to_string(), "done".to_string());
        values.insert(":done".to_string(), AttributeValue::Bool(done));
    }
    clauses.push("#U = :updatedAt");
    names.insert("#U".to_string(), "updatedAt".to_string());
    values.insert(
        ":updatedAt".to_string(),
        AttributeValue::S(update.updated_at.clone()),
    );

    (format!("SET {}", clauses.join(", ")), names, values)
}

#[async_trait]
impl ItemStore for DynamoItemStore {
    async fn put(&self, item: &Item) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_row(item)))
            .send()
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn get(&self, list_id: &str, item_id: &str) -> Result<Option<Item>, StoreError> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("listId", AttributeValue::S(list_id.to_string()))
            .key("itemId", AttributeValue::S(item_id.to_string()))
            .send()
            .await
            .map_err(backend)?;

        result.item().map(from_row).transpose()
    }

    async fn update(
        &self,
        list_id: &str,
        item_id: &str,
        update: &ItemUpdate,
    ) -> Result<Option<Item>, StoreError> {
        let (expression, names, values) = update_expression(update);

        let result = self
            .client
            .update_item()
            .table_name(&self.table)
            .key("listId", AttributeValue::S(list_id.to_string()))
            .key("itemId", AttributeValue::S(item_id.to_string()))
            .update_expression(expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            // Never create rows here; item ids are only minted on POST.
            .condition_expression("attribute_exists(itemId)")
            .return_values(ReturnValue::AllNew)
            .send()
            .await;

        match result {
            Ok(output) => output.attributes().map(from_row).transpose(),
            Err(err) => match err.into_service_error() {
                UpdateItemError::ConditionalCheckFailedException(_) => Ok(None),
                err => Err(backend(err)),
            },
        }
    }

    async fn delete(&self, list_id: &str, item_id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .key("listId", AttributeValue::S(list_id.to_string()))
            .key("itemId", AttributeValue::S(item_id.to_string()))
            .send()
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn query(&self, list_id: &str) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table)
                .key_condition_expression("listId = :listId")
                .expression_attribute_values(":listId", AttributeValue::S(list_id.to_string()))
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(backend)?;

            for row in output.items() {
                items.push(from_row(row)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::error::{ErrorMetadata, SdkError};
    use kaimono_shared::ItemPatch;

    const STAMP: &str = "2024-05-01T09:30:00.000Z";

    fn milk() -> Item {
        Item {
            list_id: "L1".to_string(),
            item_id: "abc".to_string(),
            text: Some("milk".to_string()),
            done: false,
            created_at: STAMP.to_string(),
            updated_at: STAMP.to_string(),
        }
    }

    #[test]
    fn row_has_flat_string_and_bool_attributes() {
        let row = to_row(&milk());

        assert_eq!(row.get("listId"), Some(&AttributeValue::S("L1".to_string())));
        assert_eq!(row.get("itemId"), Some(&AttributeValue::S("abc".to_string())));
        assert_eq!(row.get("done"), Some(&AttributeValue::Bool(false)));
        assert_eq!(row.len(), 6);
        assert_eq!(from_row(&row).unwrap(), milk());
    }

    #[test]
    fn text_is_optional_in_rows() {
        let mut item = milk();
        item.text = None;
        item.done = true;

        let row = to_row(&item);
        assert!(!row.contains_key("text"));
        assert_eq!(from_row(&row).unwrap(), item);
    }

    #[test]
    fn missing_key_attribute_is_malformed() {
        let mut row = to_row(&milk());
        row.remove("itemId");

        match from_row(&row) {
            Err(StoreError::Malformed { field }) => assert_eq!(field, "itemId"),
            other => panic!("expected malformed row, got {:?}", other),
        }
    }

    #[test]
    fn touch_only_sets_updated_at() {
        let update = ItemUpdate::new(ItemPatch::default(), STAMP.to_string());
        let (expr, names, values) = update_expression(&update);

        assert_eq!(expr, "SET #U = :updatedAt");
        assert_eq!(names.len(), 1);
        assert_eq!(
            values.get(":updatedAt"),
            Some(&AttributeValue::S(STAMP.to_string()))
        );
    }

    #[test]
    fn update_names_only_supplied_fields() {
        let patch = ItemPatch {
            text: None,
            done: Some(true),
        };
        let (expr, names, values) = update_expression(&ItemUpdate::new(patch, STAMP.to_string()));

        assert_eq!(expr, "SET #D = :done, #U = :updatedAt");
        assert!(!names.contains_key("#T"));
        assert_eq!(values.get(":done"), Some(&AttributeValue::Bool(true)));

        let patch = ItemPatch {
            text: Some("bread".to_string()),
            done: Some(false),
        };
        let (expr, names, _) = update_expression(&ItemUpdate::new(patch, STAMP.to_string()));
        assert_eq!(expr, "SET #T = :text, #D = :done, #U = :updatedAt");
        assert_eq!(names.get("#T").map(String::as_str), Some("text"));
    }

    #[test]
    fn backend_error_carries_the_service_message() {
        let err = UpdateItemError::generic(
            ErrorMetadata::builder()
                .code("ProvisionedThroughputExceededException")
                .message("Rate of requests exceeds the allowed throughput")
                .build(),
        );

        match backend(err) {
            StoreError::Backend(message) => {
                assert_eq!(message, "Rate of requests exceeds the allowed throughput")
            }
            other => panic!("expected backend error, got {:?}", other),
        }
    }

    #[test]
    fn backend_error_hides_transport_details() {
        let err: SdkError<UpdateItemError, ()> =
            SdkError::timeout_error("tcp connect error: 10.0.0.7:443 (os error 111)");

        match backend(err) {
            StoreError::Backend(message) => {
                assert!(!message.is_empty());
                assert!(!message.contains("10.0.0.7"));
                assert!(!message.contains("os error"));
            }
            other => panic!("expected backend error, got {:?}", other),
        }
    }
}
