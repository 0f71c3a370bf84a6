//! Rendering of domain errors onto HTTP responses.
//!
//! REST endpoints answer with the JSON error envelope. The streaming
//! generation endpoints answer with a plain-text body instead, wrapped in
//! [`PlainTextError`]. Both carry the `trace-id` header when the error has one
//! and never reveal the message of an internal error.

use std::fmt;

use actix_web::error::JsonPayloadError;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result type returned by the JSON handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

const fn http_status(code: ErrorCode) -> StatusCode {
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

/// The error as the client may see it.
fn public_view(err: &Error) -> Error {
    if err.code() != ErrorCode::InternalError {
        return err.clone();
    }
    match err.trace_id() {
        Some(trace_id) => Error::internal(REDACTED_MESSAGE).with_trace_id(trace_id.to_owned()),
        None => Error::internal(REDACTED_MESSAGE),
    }
}

fn response_for(err: &Error) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(http_status(err.code()));
    if let Some(trace_id) = err.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, trace_id.to_owned()));
    }
    builder
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        http_status(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        response_for(self).json(public_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced as internal error");
        Error::internal(REDACTED_MESSAGE)
    }
}

/// Render JSON body extraction failures with the error envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("malformed request body: {err}")).into()
}

/// Domain error rendered as a `text/plain` body carrying only the message.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainTextError(Error);

impl PlainTextError {
    pub fn into_inner(self) -> Error {
        self.0
    }
}

impl From<Error> for PlainTextError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl fmt::Display for PlainTextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.message())
    }
}

impl ResponseError for PlainTextError {
    fn status_code(&self) -> StatusCode {
        http_status(self.0.code())
    }

    fn error_response(&self) -> HttpResponse {
        response_for(&self.0)
            .content_type(ContentType::plaintext())
            .body(public_view(&self.0).message().to_owned())
    }
}
