use std::time::Duration;

use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use derive_more::Display;
use serde_json::json;

use crate::errors::ContactError;

/// Client-facing errors of the HTTP surface. Bodies are `{"error": "<message>"}`.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display("Invalid request body")]
    MalformedBody,

    #[display("All fields are required")]
    MissingFields,

    #[display("Request body too large")]
    PayloadTooLarge,

    #[display("Too many requests, please try again later.")]
    RateLimited { retry_after: Duration },

    #[display("Failed to save your message")]
    PersistenceFailure,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody | ApiError::MissingFields => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::PersistenceFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());

        if let ApiError::RateLimited { retry_after } = self {
            response.insert_header((header::RETRY_AFTER, retry_after_secs(*retry_after).to_string()));
        }

        response.json(json!({ "error": self.to_string() }))
    }
}

/// Whole seconds a client must wait, rounded up so the hint is never early.
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Validation(_) => ApiError::MissingFields,
            ContactError::Persistence(_) => ApiError::PersistenceFailure,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(_: serde_json::Error) -> Self {
        ApiError::MalformedBody
    }
}
