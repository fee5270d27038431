//! Response payloads and builders shared by the route handlers.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Response, StatusCode};
use serde::Serialize;
use std::collections::BTreeMap;

/// Response type produced by every handler.
pub type HttpResponse = Response<Full<Bytes>>;

/// Boxed error used for generic request bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// `{"message": ...}` body used by most routes
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"error": ...}` body used for simulated and request-level failures
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// GET / payload
#[derive(Debug, Serialize)]
pub struct Greeting<'a> {
    pub message: &'static str,
    pub version: &'a str,
}

/// One entry of the fixed sample user list
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UserRecord {
    pub id: u32,
    pub name: &'static str,
    pub role: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListing {
    pub message: &'static str,
    pub query_params: BTreeMap<String, String>,
    pub data: Vec<UserRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    pub message: &'static str,
    pub received_data: serde_json::Value,
    pub id: u32,
}

#[derive(Debug, Serialize)]
pub struct UpdatedUser {
    pub message: String,
    pub updates: serde_json::Value,
}

/// `{"status": ..., "message": ...}` body of the API-key check
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AccessGranted {
    pub status: &'static str,
    pub headers: BTreeMap<String, String>,
}

// =============================================================================
// Response helper functions
// =============================================================================

/// Create a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(json) => {
            build_response_with_headers(status, [(CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE)], json)
        }
        Err(e) => {
            tracing::error!("Failed to serialize response body: {}", e);
            build_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

/// Create a plain-text response
pub fn text_response(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    build_response_with_headers(status, [(CONTENT_TYPE.as_str(), TEXT_CONTENT_TYPE)], body)
}

/// Build an HTTP response with the given status and body.
pub fn build_response(status: StatusCode, body: impl Into<Bytes>) -> HttpResponse {
    Response::builder()
        .status(status)
        .body(Full::new(body.into()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Internal Server Error"))))
}

/// Build an HTTP response with headers.
///
/// Falls back to a bare response if a header name or value is invalid.
pub fn build_response_with_headers(
    status: StatusCode,
    headers: impl IntoIterator<Item = (impl AsRef<str>, impl AsRef<str>)>,
    body: impl Into<Bytes>,
) -> HttpResponse {
    let mut builder = Response::builder().status(status);
    for (key, value) in headers {
        builder = builder.header(key.as_ref(), value.as_ref());
    }
    builder
        .body(Full::new(body.into()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from("Internal Server Error"))))
}

/// Create an `{"error": ...}` response
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    json_response(
        status,
        &ErrorBody {
            error: message.to_string(),
        },
    )
}

/// Fallback for requests no route accepts
pub fn not_found(method: &Method, path: &str) -> HttpResponse {
    text_response(StatusCode::NOT_FOUND, format!("Cannot {method} {path}"))
}

#[cfg(test)]
pub(crate) async fn read_json(resp: HttpResponse) -> serde_json::Value {
    serde_json::from_slice(&read_bytes(resp).await).expect("response body is not JSON")
}

#[cfg(test)]
pub(crate) async fn read_text(resp: HttpResponse) -> String {
    String::from_utf8(read_bytes(resp).await.to_vec()).expect("response body is not UTF-8")
}

#[cfg(test)]
async fn read_bytes(resp: HttpResponse) -> Bytes {
    use http_body_util::BodyExt;
    match resp.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    }
}
