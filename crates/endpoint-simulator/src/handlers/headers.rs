//! GET /api/headers - API-key check with header echo.

use crate::types::{json_response, AccessGranted, HttpResponse, StatusMessage};
use hyper::{HeaderMap, StatusCode};
use std::collections::BTreeMap;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const EXPECTED_API_KEY: &str = "secret123";

pub fn handle_headers(headers: &HeaderMap) -> HttpResponse {
    let echoed = header_map(headers);

    if echoed.get(API_KEY_HEADER).map(String::as_str) == Some(EXPECTED_API_KEY) {
        json_response(
            StatusCode::OK,
            &AccessGranted {
                status: "Access Granted",
                headers: echoed,
            },
        )
    } else {
        json_response(
            StatusCode::FORBIDDEN,
            &StatusMessage {
                status: "Forbidden",
                message: "Missing or invalid x-api-key header",
            },
        )
    }
}

/// Lowercase header names to values; repeated headers are joined with ", ".
pub fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        map.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    map
}
