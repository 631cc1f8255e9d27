use crate::config::Config;
use crate::route::Route;
use crate::store::{ItemStore, ItemUpdate, StoreError};
use chrono::Utc;
use kaimono_shared::{timestamp, Item, ItemPatch, NewItem};
use lambda_http::{tracing, Body, Error, Request, RequestExt, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("Not Found")]
    UnknownRoot,
    #[error("Missing listId for GET operation")]
    MissingListIdForGet,
    #[error("Missing listId for POST operation on items")]
    MissingListIdForPost,
    #[error("Delete entire list not supported in this version")]
    ListDelete,
    #[error("Item not found")]
    ItemNotFound,
    #[error("Method Not Allowed")]
    MethodNotAllowed,
    #[error("Unhandled API path or method")]
    Unhandled,
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> u16 {
        match self {
            ApiError::UnknownRoot | ApiError::ItemNotFound => 404,
            ApiError::MethodNotAllowed => 405,
            ApiError::Store(_) => 500,
            _ => 400,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

enum Reply {
    Json(u16, String),
    NoContent,
}

impl Reply {
    fn json<T: Serialize>(status: u16, value: &T) -> Result<Reply, ApiError> {
        Ok(Reply::Json(status, serde_json::to_string(value)?))
    }
}

/// Empty bodies are read as `{}`.
fn parse_body<T: DeserializeOwned>(body: &Body) -> Result<T, ApiError> {
    let bytes: &[u8] = body.as_ref();
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"{}")?);
    }
    Ok(serde_json::from_slice(bytes)?)
}

async fn dispatch<S: ItemStore + ?Sized>(
    store: &S,
    method: &str,
    path: &str,
    body: &Body,
) -> Result<Reply, ApiError> {
    let route = Route::parse(path).ok_or(ApiError::UnknownRoot)?;
    let list_id = route.list_id.as_deref();
    let item_id = route.item_id.as_deref();

    match method {
        "GET" => match (list_id, item_id) {
            (Some(list_id), None) => {
                let items = store.query(list_id).await?;
                Reply::json(200, &items)
            }
            (Some(list_id), Some(item_id)) => match store.get(list_id, item_id).await? {
                Some(item) => Reply::json(200, &item),
                None => Err(ApiError::ItemNotFound),
            },
            (None, _) => Err(ApiError::MissingListIdForGet),
        },
        "POST" => match (list_id, item_id) {
            (Some(list_id), None) if route.items_segment => {
                let req: NewItem = parse_body(body)?;
                let item = Item::new(list_id, req.text, Utc::now());
                store.put(&item).await?;
                tracing::info!(list_id, item_id = %item.item_id, "item created");
                Reply::json(201, &item)
            }
            (None, _) => Err(ApiError::MissingListIdForPost),
            _ => Err(ApiError::Unhandled),
        },
        "PUT" => match (list_id, item_id) {
            (Some(list_id), Some(item_id)) => {
                let patch: ItemPatch = parse_body(body)?;
                let update = ItemUpdate::new(patch, timestamp(Utc::now()));
                match store.update(list_id, item_id, &update).await? {
                    Some(item) => Reply::json(200, &item),
                    None => Err(ApiError::ItemNotFound),
                }
            }
            _ => Err(ApiError::Unhandled),
        },
        "DELETE" => match (list_id, item_id) {
            (Some(list_id), Some(item_id)) => {
                store.delete(list_id, item_id).await?;
                Ok(Reply::NoContent)
            }
            (Some(_), None) => Err(ApiError::ListDelete),
            (None, _) => Err(ApiError::Unhandled),
        },
        _ => Err(ApiError::MethodNotAllowed),
    }
}

/// Path as the client sent it. API Gateway REST events carry the stage in
/// `uri()`, so prefer the raw path when the runtime recorded one.
fn request_path(event: &Request) -> &str {
    match event.raw_http_path() {
        "" => event.uri().path(),
        raw => raw,
    }
}

pub(crate) async fn function_handler<S: ItemStore + ?Sized>(
    store: &S,
    config: &Config,
    event: Request,
) -> Result<Response<Body>, Error> {
    let path = request_path(&event);
    let method = event.method().as_str();
    let caller = event
        .headers()
        .get(config.identity_header.as_str())
        .and_then(|v| v.to_str().ok());
    tracing::info!(method, path, "handling request");
    tracing::debug!(caller = caller.unwrap_or("-"), "caller identity");

    let reply = match dispatch(store, method, path, event.body()).await {
        Ok(reply) => reply,
        Err(err) => {
            if let ApiError::Store(e) = &err {
                tracing::error!(error = %e, method, path, "item store failure");
            }
            let body = serde_json::to_string(&ErrorResponse {
                message: err.to_string(),
            })?;
            Reply::Json(err.status(), body)
        }
    };

    let builder =
        Response::builder().header("Access-Control-Allow-Origin", config.allow_origin.as_str());
    Ok(match reply {
        Reply::Json(status, body) => builder
            .status(status)
            .header("content-type", "application/json")
            .body(Body::Text(body))?,
        Reply::NoContent => builder.status(204).body(Body::Empty)?,
    })
}
