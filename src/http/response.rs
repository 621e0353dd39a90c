//! Response mapping.
//!
//! Binding failures are client errors: both kinds become `400 Bad Request`
//! with a plain-text explanation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::binding::BindError;

/// Body of every successful endpoint response.
pub const OK_BODY: &str = "ok";

impl IntoResponse for BindError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}
