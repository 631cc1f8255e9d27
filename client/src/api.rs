use crate::error::ClientError;
use async_trait::async_trait;
use kaimono_shared::{Item, ItemPatch, NewItem};
use reqwest::{Response, Url};
use serde::Deserialize;

/// The calls the list view makes against one list.
#[async_trait]
pub trait ItemsApi: Send + Sync {
    async fn fetch_items(&self) -> Result<Vec<Item>, ClientError>;

    async fn add_item(&self, text: &str) -> Result<Item, ClientError>;

    async fn set_done(&self, item_id: &str, done: bool) -> Result<Item, ClientError>;

    async fn delete_item(&self, item_id: &str) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`ItemsApi`] over HTTP, bound to a single `listId`.
#[derive(Debug, Clone)]
pub struct HttpItemsApi {
    http: reqwest::Client,
    base: Url,
    list_id: String,
    identity: Option<(String, String)>,
}

impl HttpItemsApi {
    pub fn new(api_url: &str, list_id: impl Into<String>) -> Result<Self, ClientError> {
        let base = Url::parse(api_url).map_err(|_| ClientError::InvalidUrl(api_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(api_url.to_string()));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            list_id: list_id.into(),
            identity: None,
        })
    }

    /// Sends `user_id` in `header` on every request. The API does not enforce it.
    pub fn with_identity(mut self, header: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.identity = Some((header.into(), user_id.into()));
        self
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    /// `{base}/lists/{listId}/items[/{itemId}]`
    pub fn items_url(&self, item_id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["lists", self.list_id.as_str(), "items"]);
            if let Some(id) = item_id {
                segments.push(id);
            }
        }
        url
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.identity {
            Some((header, value)) => builder.header(header.as_str(), value.as_str()),
            None => builder,
        }
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.message)
        .unwrap_or(text);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ItemsApi for HttpItemsApi {
    async fn fetch_items(&self) -> Result<Vec<Item>, ClientError> {
        let response = self
            .request(reqwest::Method::GET, self.items_url(None))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn add_item(&self, text: &str) -> Result<Item, ClientError> {
        let body = NewItem {
            text: Some(text.to_string()),
        };
        let response = self
            .request(reqwest::Method::POST, self.items_url(None))
            .json(&body)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn set_done(&self, item_id: &str, done: bool) -> Result<Item, ClientError> {
        let body = ItemPatch {
            text: None,
            done: Some(done),
        };
        let response = self
            .request(reqwest::Method::PUT, self.items_url(Some(item_id)))
            .json(&body)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn delete_item(&self, item_id: &str) -> Result<(), ClientError> {
        let response = self
            .request(reqwest::Method::DELETE, self.items_url(Some(item_id)))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
