//! Handler-side extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cookiegate_core::Identity;

use crate::AuthError;
use crate::resolve::IdentityCell;

/// The authenticated caller.
///
/// Rejects with the gate's 401 when no identity resolves, so it can also be
/// used on Optional routes as a per-handler requirement. On Enforced routes
/// the gate has already resolved the cell and extraction is free.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cell = IdentityCell::from_request_parts(parts, state).await?;
        cell.get().await.map(Caller).ok_or(AuthError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{context, seal};
    use crate::{AuthMode, AuthRouter};

    #[tokio::test]
    async fn caller_requires_identity_on_optional_routes() {
        let app = AuthRouter::new(context())
            .get("/mixed", AuthMode::Optional, |caller: Caller| async move {
                axum::Json(caller.0.into_payload())
            })
            .into_router();

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/mixed")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let token = seal(&serde_json::json!({"userId": 3})).await;
        let res = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/mixed")
                    .header(header::COOKIE, format!("authorization={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn caller_outside_the_gate_is_a_500() {
        // Route registered directly on axum, bypassing AuthRouter.
        let app: Router = Router::new().route(
            "/raw",
            get(|_caller: Caller| async { StatusCode::NO_CONTENT }),
        );

        let res = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/raw")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
