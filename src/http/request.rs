//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request
//! - Collect request parameters from the query string and form body
//!
//! # Design Decisions
//! - Query-string fields come before form-body fields
//! - Only `application/x-www-form-urlencoded` bodies contribute fields
//! - Body size is bounded by the router's body limit

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::{header, HeaderMap, HeaderValue},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::binding::FieldSet;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Generates `x-request-id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of a request, or `"unknown"` if none was assigned.
pub fn request_id_of(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Extractor for every request parameter: query string, then form body.
///
/// Consumes the body, so it must be the last extractor of a handler.
#[derive(Debug, Clone, Default)]
pub struct RequestFields(pub FieldSet);

impl<S> FromRequest<S> for RequestFields
where
    S: Send + Sync,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let mut fields = req
            .uri()
            .query()
            .map(|q| FieldSet::from_urlencoded(q.as_bytes()))
            .unwrap_or_default();

        if is_form(req.headers()) {
            let body = Bytes::from_request(req, state).await?;
            fields.extend_urlencoded(&body);
        }

        Ok(Self(fields))
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}
