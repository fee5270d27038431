//! Request body and query-string extraction.
//!
//! Echo routes accept whatever the client sends: JSON bodies are parsed,
//! URL-encoded forms become a flat string map, and anything else echoes
//! as an empty object.

use crate::error::SimulatorError;
use crate::types::BoxError;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::header::CONTENT_TYPE;
use hyper::{HeaderMap, Request};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// How a request body should be interpreted, from its Content-Type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
            return Self::Other;
        };
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/json" {
            Self::Json
        } else if essence == "application/x-www-form-urlencoded" {
            Self::Form
        } else {
            Self::Other
        }
    }
}

/// Read and decode a request body for echoing.
pub async fn read_body<B>(req: Request<B>, limit: usize) -> Result<Value, SimulatorError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let kind = BodyKind::from_headers(req.headers());
    if kind == BodyKind::Other {
        return Ok(Value::Object(Map::new()));
    }

    let bytes = collect_limited(req.into_body(), limit).await?;
    match kind {
        BodyKind::Json => parse_json(&bytes),
        BodyKind::Form => Ok(string_map_to_value(parse_form(&bytes))),
        BodyKind::Other => Ok(Value::Object(Map::new())),
    }
}

/// Collect a body, failing with `PayloadTooLarge` past `limit` bytes.
pub async fn collect_limited<B>(body: B, limit: usize) -> Result<Bytes, SimulatorError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(SimulatorError::PayloadTooLarge),
        Err(e) => Err(SimulatorError::BodyRead(e)),
    }
}

/// Parse a JSON body. Only objects and arrays are accepted at the top level.
pub fn parse_json(bytes: &[u8]) -> Result<Value, SimulatorError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    match serde_json::from_slice(bytes)? {
        value @ (Value::Object(_) | Value::Array(_)) => Ok(value),
        _ => Err(SimulatorError::UnsupportedJson),
    }
}

/// Parse an `application/x-www-form-urlencoded` body.
pub fn parse_form(bytes: &[u8]) -> BTreeMap<String, String> {
    parse_query_string(&String::from_utf8_lossy(bytes))
}

/// Parse a query string into a map. The last occurrence of a key wins.
pub fn parse_query_string(query: &str) -> BTreeMap<String, String> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_component(key), decode_component(value)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

/// Percent-decode a query or form component, treating `+` as a space.
pub fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

/// Percent-decode a path segment. `+` is literal in paths.
pub fn decode_path_segment(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

fn string_map_to_value(map: BTreeMap<String, String>) -> Value {
    Value::Object(map.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
}
