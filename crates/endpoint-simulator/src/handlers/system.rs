//! GET / greeting.

use crate::types::{json_response, Greeting, HttpResponse};
use hyper::StatusCode;

pub const GREETING: &str = "Postman Test Server is Running! 🚀";

/// GET / - Liveness greeting with the configured version
pub fn handle_root(version: &str) -> HttpResponse {
    json_response(
        StatusCode::OK,
        &Greeting {
            message: GREETING,
            version,
        },
    )
}
