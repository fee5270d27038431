//! Basic and Bearer authentication simulations.
//!
//! Both Basic failure paths answer in plain text while every other route
//! answers in JSON. Existing client suites assert on that content type.

use crate::types::{json_response, text_response, HttpResponse, Message};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use hyper::header::AUTHORIZATION;
use hyper::{HeaderMap, StatusCode};

pub const BASIC_USERNAME: &str = "admin";
pub const BASIC_PASSWORD: &str = "password";
pub const BEARER_PREFIX: &str = "Bearer my-secret-token";

/// Standard alphabet, padding optional, trailing bits ignored
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// GET /api/auth/basic
pub fn handle_basic(headers: &HeaderMap) -> HttpResponse {
    let Some(header) = authorization(headers) else {
        return text_response(StatusCode::UNAUTHORIZED, "Authentication required");
    };

    match decode_basic_credentials(header) {
        Some((user, pass)) if user == BASIC_USERNAME && pass == BASIC_PASSWORD => {
            json_response(StatusCode::OK, &Message::new("Basic Auth Successful!"))
        }
        _ => text_response(StatusCode::UNAUTHORIZED, "Invalid Credentials"),
    }
}

/// GET /api/auth/bearer
pub fn handle_bearer(headers: &HeaderMap) -> HttpResponse {
    match authorization(headers) {
        Some(header) if header.starts_with(BEARER_PREFIX.as_bytes()) => {
            json_response(StatusCode::OK, &Message::new("Bearer Token Validated!"))
        }
        _ => json_response(
            StatusCode::UNAUTHORIZED,
            &Message::new("Invalid or missing Bearer token"),
        ),
    }
}

/// Authorization header bytes; an empty value counts as absent.
fn authorization(headers: &HeaderMap) -> Option<&[u8]> {
    headers
        .get(AUTHORIZATION)
        .map(|v| v.as_bytes())
        .filter(|v| !v.is_empty())
}

/// Decode `<scheme> <base64(user:pass)>`, splitting on the first `:`.
///
/// The scheme word is not checked.
pub fn decode_basic_credentials(header: &[u8]) -> Option<(String, String)> {
    let header = String::from_utf8_lossy(header);
    let token = header.split(' ').nth(1)?;
    let decoded = LENIENT_BASE64.decode(normalize_base64(token)).ok()?;
    let credentials = String::from_utf8_lossy(&decoded);
    let (user, pass) = credentials.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Accept both alphabets and drop anything that is not a base64 symbol.
///
/// Decoding stops at the first `=`; a lone trailing symbol carries no full byte and is dropped.
fn normalize_base64(token: &str) -> String {
    let mut symbols: String = token
        .chars()
        .take_while(|&c| c != '=')
        .filter_map(|c| match c {
            '-' => Some('+'),
            '_' => Some('/'),
            c if c.is_ascii_alphanumeric() || c == '+' || c == '/' => Some(c),
            _ => None,
        })
        .collect();
    if symbols.len() % 4 == 1 {
        symbols.pop();
    }
    symbols
}
