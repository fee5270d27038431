//! Request-level error taxonomy.

use crate::types::{error_response, BoxError, HttpResponse};
use hyper::StatusCode;
use thiserror::Error;

/// Failures raised while reading or decoding a request.
///
/// None of these are fatal: each one becomes the final response for the
/// request that caused it.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Failed to read request body: {0}")]
    BodyRead(BoxError),

    #[error("Payload Too Large")]
    PayloadTooLarge,

    #[error("Malformed JSON body: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("JSON body must be an object or an array")]
    UnsupportedJson,

    #[error("Malformed multipart body")]
    Multipart(#[source] multer::Error),

    #[error("Unexpected field")]
    UnexpectedField(String),

    #[error("File too large")]
    FileTooLarge,

    #[error("Failed to spool upload: {0}")]
    Spool(#[from] std::io::Error),
}

impl SimulatorError {
    /// HTTP status reported to the client
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BodyRead(_)
            | Self::MalformedJson(_)
            | Self::UnsupportedJson
            | Self::Multipart(_)
            | Self::UnexpectedField(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge | Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Spool(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        error_response(self.status(), &self.to_string())
    }
}
