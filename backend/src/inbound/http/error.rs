//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and
//! status codes. The ambient trace identifier is attached here, both as a
//! `traceId` body field and as the `Trace-Id` response header.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::{json, Value};
use tracing::error;

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::{TraceId, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        Error::internal("Internal server error")
    } else {
        error.clone()
    }
}

fn envelope(error: &Error, trace_id: Option<&TraceId>) -> Value {
    let mut body = match serde_json::to_value(error) {
        Ok(value) => value,
        Err(err) => {
            error!(error = %err, "failed to serialise error payload");
            json!({ "code": "internal_error", "message": "Internal server error" })
        }
    };
    if let (Some(id), Some(object)) = (trace_id, body.as_object_mut()) {
        object.insert("traceId".to_owned(), json!(id.to_string()));
    }
    body
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let trace_id = TraceId::current();
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.to_string()));
        }
        builder.json(envelope(&redact_if_internal(self), trace_id.as_ref()))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
