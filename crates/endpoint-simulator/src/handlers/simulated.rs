//! Hardcoded failure routes for exercising client error handling.

use crate::types::{error_response, HttpResponse};
use hyper::StatusCode;

/// GET /api/error/500
pub fn handle_server_error() -> HttpResponse {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error Simulation",
    )
}

/// GET /api/error/400
pub fn handle_bad_request() -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, "Bad Request Simulation")
}
