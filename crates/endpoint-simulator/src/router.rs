//! Route dispatch.
//!
//! Literal path segments match case-insensitively and a single trailing
//! slash is ignored. `HEAD` is served by the `GET` routes.

use crate::body::decode_path_segment;
use crate::config::SimulatorConfig;
use crate::handlers::{auth, delay, headers, simulated, system, upload, users};
use crate::types::{not_found, BoxError, HttpResponse};
use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use hyper::body::Body;
use hyper::{Method, Request};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, info};

/// A (method, path pattern) pair with its extracted path parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// GET /
    Root,
    /// GET /api/users
    ListUsers,
    /// POST /api/users
    CreateUser,
    /// PUT /api/users/:id
    UpdateUser(String),
    /// DELETE /api/users/:id
    DeleteUser(String),
    /// GET /api/headers
    Headers,
    /// GET /api/auth/basic
    BasicAuth,
    /// GET /api/auth/bearer
    BearerAuth,
    /// POST /api/upload
    Upload,
    /// GET /api/delay/:seconds
    Delay(String),
    /// GET /api/error/500
    ServerError,
    /// GET /api/error/400
    BadRequest,
}

impl Route {
    /// Resolve a request line to a route
    pub fn parse(method: &Method, path: &str) -> Option<Self> {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        let rest = path.strip_prefix('/')?;
        let segments: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };
        let lowered: Vec<String> = segments.iter().map(|s| s.to_ascii_lowercase()).collect();
        let keys: Vec<&str> = lowered.iter().map(String::as_str).collect();

        let is_get = *method == Method::GET || *method == Method::HEAD;

        match keys.as_slice() {
            [] if is_get => Some(Route::Root),
            ["api", "users"] => match *method {
                Method::GET | Method::HEAD => Some(Route::ListUsers),
                Method::POST => Some(Route::CreateUser),
                _ => None,
            },
            ["api", "users", _] => {
                let id = path_param(segments[2])?;
                match *method {
                    Method::PUT => Some(Route::UpdateUser(id)),
                    Method::DELETE => Some(Route::DeleteUser(id)),
                    _ => None,
                }
            }
            ["api", "headers"] if is_get => Some(Route::Headers),
            ["api", "auth", "basic"] if is_get => Some(Route::BasicAuth),
            ["api", "auth", "bearer"] if is_get => Some(Route::BearerAuth),
            ["api", "upload"] if *method == Method::POST => Some(Route::Upload),
            ["api", "delay", _] if is_get => path_param(segments[2]).map(Route::Delay),
            ["api", "error", "500"] if is_get => Some(Route::ServerError),
            ["api", "error", "400"] if is_get => Some(Route::BadRequest),
            _ => None,
        }
    }
}

/// Path parameters must be non-empty; they are percent-decoded.
fn path_param(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(decode_path_segment(raw))
    }
}

/// Main request router
pub async fn route_request<B>(
    req: Request<B>,
    config: Arc<SimulatorConfig>,
) -> Result<HttpResponse, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError> + 'static,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let target = req
        .uri()
        .path_and_query()
        .map_or_else(|| path.clone(), |pq| pq.as_str().to_string());

    info!(
        "[{}] {} {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        method,
        target
    );

    let response = match Route::parse(&method, &path) {
        Some(route) => dispatch(route, req, &config).await,
        None => not_found(&method, &path),
    };

    debug!("{} {} -> {}", method, target, response.status());
    Ok(response)
}

async fn dispatch<B>(route: Route, req: Request<B>, config: &SimulatorConfig) -> HttpResponse
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError> + 'static,
{
    let body_limit = config.limits.max_body_bytes;

    match route {
        Route::Root => system::handle_root(&config.service.version),
        Route::ListUsers => users::handle_list(req.uri().query()),
        Route::CreateUser => users::handle_create(req, body_limit).await,
        Route::UpdateUser(id) => users::handle_update(&id, req, body_limit).await,
        Route::DeleteUser(id) => users::handle_delete(&id),
        Route::Headers => headers::handle_headers(req.headers()),
        Route::BasicAuth => auth::handle_basic(req.headers()),
        Route::BearerAuth => auth::handle_bearer(req.headers()),
        Route::Upload => upload::handle_upload(req, &config.upload).await,
        Route::Delay(seconds) => delay::handle_delay(&seconds).await,
        Route::ServerError => simulated::handle_server_error(),
        Route::BadRequest => simulated::handle_bad_request(),
    }
}
