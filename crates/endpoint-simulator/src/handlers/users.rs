//! `/api/users` echo routes.

use crate::body::{parse_query_string, read_body};
use crate::types::{
    json_response, BoxError, CreatedUser, HttpResponse, Message, UpdatedUser, UserListing,
    UserRecord,
};
use bytes::Bytes;
use hyper::body::Body;
use hyper::{Request, StatusCode};
use rand::Rng;
use tracing::debug;

/// Fixed records returned by the list route
pub const SAMPLE_USERS: [UserRecord; 2] = [
    UserRecord {
        id: 1,
        name: "Alice",
        role: "Admin",
    },
    UserRecord {
        id: 2,
        name: "Bob",
        role: "User",
    },
];

/// Exclusive upper bound of generated user ids
pub const MAX_GENERATED_ID: u32 = 1000;

/// GET /api/users - Echo query parameters alongside the sample list
pub fn handle_list(query: Option<&str>) -> HttpResponse {
    let query_params = query.map(parse_query_string).unwrap_or_default();
    json_response(
        StatusCode::OK,
        &UserListing {
            message: "Fetched users successfully",
            query_params,
            data: SAMPLE_USERS.to_vec(),
        },
    )
}

/// POST /api/users - Echo the body with a random id
pub async fn handle_create<B>(req: Request<B>, body_limit: usize) -> HttpResponse
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let received_data = match read_body(req, body_limit).await {
        Ok(body) => body,
        Err(e) => return e.into_response(),
    };
    let id = rand::thread_rng().gen_range(0..MAX_GENERATED_ID);
    debug!("Simulated user creation with id {}", id);

    json_response(
        StatusCode::CREATED,
        &CreatedUser {
            message: "User created successfully",
            received_data,
            id,
        },
    )
}

/// PUT /api/users/:id - Echo the body as `updates`
pub async fn handle_update<B>(id: &str, req: Request<B>, body_limit: usize) -> HttpResponse
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let updates = match read_body(req, body_limit).await {
        Ok(body) => body,
        Err(e) => return e.into_response(),
    };

    json_response(
        StatusCode::OK,
        &UpdatedUser {
            message: format!("User with ID {id} updated"),
            updates,
        },
    )
}

/// DELETE /api/users/:id
pub fn handle_delete(id: &str) -> HttpResponse {
    json_response(
        StatusCode::OK,
        &Message::new(format!("User with ID {id} deleted")),
    )
}
