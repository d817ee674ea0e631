//! Domain error to HTTP response mapping

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use tg_core::errors::{DomainError, ErrorKind};
use tg_shared::{error_codes, ErrorResponse};

/// A domain failure leaving through an HTTP handler
///
/// Clients get the stable key and a public message; repository causes are
/// logged, never rendered.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DomainError);

/// HTTP status for an error class
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Permission => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.0.kind())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let code = self.0.code();

        if status.is_server_error() {
            tracing::error!(code, error = ?self.0, "Request failed");
        } else {
            tracing::debug!(code, "Request rejected");
        }

        HttpResponse::build(status).json(ErrorResponse::new(code, self.0.public_message()))
    }
}

/// Malformed JSON bodies answer in the same envelope as domain errors
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let body = ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string());
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

/// Fallback for unknown routes
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
