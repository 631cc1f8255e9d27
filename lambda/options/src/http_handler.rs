use lambda_http::{Body, Error, Request, Response};
use serde_json::json;

const ALLOW_METHODS: &str = "OPTIONS,POST,GET,PUT,DELETE";

/// Answers every CORS preflight with the same fixed grant.
pub(crate) async fn function_handler(_event: Request) -> Result<Response<Body>, Error> {
    let body = json!({ "message": "CORS preflight successful" }).to_string();
    Ok(Response::builder()
        .status(200)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .header("Access-Control-Allow-Methods", ALLOW_METHODS)
        .header("content-type", "application/json")
        .body(Body::Text(body))?)
}
