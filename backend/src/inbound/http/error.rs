//! Centralized mapping from domain failures to rendered error pages.
//!
//! Validation and authorization outcomes are resolved close to the route as
//! redirects with flash notices; what reaches this module is the remainder:
//! malformed input (400), stray not-founds (404), conflicts (409), and
//! unexpected upstream failures (500). Internal messages are replaced with a
//! generic one so store errors never leak into a page.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode};

use super::views;

/// Fallback message for failures that carry none of their own.
pub const GENERIC_FAILURE: &str = "Oh no, something went wrong!";
/// Body of the catch-all 404 page.
pub const PAGE_NOT_FOUND: &str = "Oh Snap! Page not found, another 404 classic!";

/// Wrapper rendering a [`Error`] as an HTML failure page.
#[derive(Debug, Clone)]
pub struct PageError(Error);

impl PageError {
    fn status(&self) -> StatusCode {
        match self.0.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for PageError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(
                code = ?self.0.code(),
                trace_id = self.0.trace_id().unwrap_or("-"),
                "request failed: {}",
                self.0.message()
            );
            GENERIC_FAILURE
        } else if self.0.message().is_empty() {
            GENERIC_FAILURE
        } else {
            self.0.message()
        };
        HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(views::error_page(status.as_u16(), message))
    }
}

/// Convenience alias for page handlers.
pub type PageResult = Result<HttpResponse, PageError>;

/// Catch-all handler for unmatched paths.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    tracing::debug!(path = %req.path(), "no route matched");
    HttpResponse::NotFound()
        .content_type(ContentType::html())
        .body(views::error_page(404, PAGE_NOT_FOUND))
}
