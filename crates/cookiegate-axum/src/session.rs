//! Session establishment and termination.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, IntoResponseParts, Response, ResponseParts};
use cookiegate_core::{CookieOverrides, Identity, build_clear_cookie, build_set_cookie};
use serde::Serialize;

use crate::AuthError;
use crate::context::AuthContext;
use crate::resolve::IdentityCell;

/// Per-request handle for reading identity and mutating session state.
///
/// Extracted in any handler registered through `AuthRouter`. Sign-in and
/// sign-out return response parts; the handler composes them with its own
/// body, which is how the cookie mutation reaches the response.
#[derive(Debug, Clone)]
pub struct Session {
    ctx: AuthContext,
    cell: IdentityCell,
}

impl Session {
    /// The caller's identity, if any. Shares the request's memoized
    /// resolution with the gate and the other extractors.
    pub async fn identity(&self) -> Option<Identity> {
        self.cell.get().await
    }

    /// Establish a session: seal `payload` and set it as the session cookie.
    ///
    /// `overrides` are merged per-field over the context's default cookie
    /// policy. A sealing failure propagates and no cookie is written.
    pub async fn sign_in<T>(
        &self,
        payload: &T,
        overrides: CookieOverrides,
    ) -> Result<SignedIn, AuthError>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(payload).map_err(cookiegate_core::Error::from)?;
        let token = self.ctx.crypto().encrypt(&value).await?;

        let opts = self.ctx.cookie_defaults().merged(&overrides);
        let cookie = build_set_cookie(self.ctx.cookie_name(), &token, &opts)?;
        tracing::debug!(max_age = opts.max_age_seconds, "session established");
        Ok(SignedIn {
            header: to_header_value(cookie)?,
        })
    }

    /// Terminate the session: clear the session cookie.
    pub fn sign_out(&self) -> Result<SignedOut, AuthError> {
        let cookie = build_clear_cookie(self.ctx.cookie_name(), self.ctx.cookie_defaults())?;
        tracing::debug!("session cleared");
        Ok(SignedOut {
            header: to_header_value(cookie)?,
        })
    }
}

fn to_header_value(cookie: String) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(&cookie)
        .map_err(|e| AuthError::Crypto(cookiegate_core::Error::Validation(e.to_string())))
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingContext)?;
        let cell = parts
            .extensions
            .get::<IdentityCell>()
            .cloned()
            .ok_or(AuthError::MissingContext)?;
        Ok(Session { ctx, cell })
    }
}

/// `Set-Cookie` response part produced by a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    header: HeaderValue,
}

/// `Set-Cookie` response part that clears the session cookie.
#[derive(Debug, Clone)]
pub struct SignedOut {
    header: HeaderValue,
}

impl IntoResponseParts for SignedIn {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.headers_mut().append(header::SET_COOKIE, self.header);
        Ok(res)
    }
}

impl IntoResponse for SignedIn {
    fn into_response(self) -> Response {
        (self, ()).into_response()
    }
}

impl IntoResponseParts for SignedOut {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.headers_mut().append(header::SET_COOKIE, self.header);
        Ok(res)
    }
}

impl IntoResponse for SignedOut {
    fn into_response(self) -> Response {
        (self, ()).into_response()
    }
}
