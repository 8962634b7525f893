//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while letting Actix
//! handlers turn domain failures into consistent JSON responses and status
//! codes.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::domain::Error;

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Auth(_) => StatusCode::UNAUTHORIZED,
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::Conflict(_) => StatusCode::CONFLICT,
        Error::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        Error::Delivery(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Server-fault details stay in the logs; clients get a generic message
/// with the stable code so retries remain safe.
fn client_message(error: &Error) -> String {
    match error {
        Error::Persistence(inner) => {
            error!(error = %inner, "persistence failure while handling request");
            "internal server error".to_owned()
        }
        other => other.to_string(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "code": self.code(),
            "message": client_message(self),
        }))
    }
}
