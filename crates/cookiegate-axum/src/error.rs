//! Error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Errors produced by the auth layer.
///
/// Only [`AuthError::Unauthorized`] is a decision this layer makes on its
/// own; everything a handler raises passes through untouched.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request reached an enforced route without a resolvable identity.
    #[error("please login")]
    Unauthorized,

    /// An auth extractor ran on a route that was not registered through
    /// `AuthRouter`. This is a wiring bug in the host application.
    #[error("request did not pass through the auth gate")]
    MissingContext,

    /// A crypto or cookie-assembly failure, surfaced to the sign-in caller.
    #[error(transparent)]
    Crypto(#[from] cookiegate_core::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "please login".to_string()),
            AuthError::MissingContext => {
                tracing::error!("auth extractor used outside an AuthRouter route");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            AuthError::Crypto(e) => {
                // Log the detail, keep the body generic.
                tracing::error!(error = %e, "session crypto failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "statusCode": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Unknown"),
            "message": message,
        }));

        (status, body).into_response()
    }
}
