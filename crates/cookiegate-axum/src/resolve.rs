//! Per-request identity resolution.

use std::fmt;
use std::sync::Arc;

use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use axum::extract::FromRequestParts;
use cookiegate_core::{Identity, SessionCrypto, read_cookie};
use tokio::sync::OnceCell;

use crate::AuthError;
use crate::context::AuthContext;

/// Lazy, memoized identity resolution for one request.
///
/// The cell captures the raw session cookie value (if any) when the request
/// enters the gate and unseals it at most once, on first access. Every
/// failure mode — missing cookie, malformed token, tamper, wrong key,
/// expiry — resolves to `None`; callers never see a decrypt error. Clones
/// share the same resolution, so the gate, extractors, and handler all
/// observe one result per request.
///
/// The cell lives in the request's extensions and is dropped with the
/// request; resolutions are never shared across requests.
#[derive(Clone)]
pub struct IdentityCell {
    raw: Option<String>,
    crypto: Arc<dyn SessionCrypto>,
    resolved: Arc<OnceCell<Option<Identity>>>,
}

impl IdentityCell {
    pub(crate) fn new(raw: Option<String>, crypto: Arc<dyn SessionCrypto>) -> Self {
        Self {
            raw,
            crypto,
            resolved: Arc::new(OnceCell::new()),
        }
    }

    /// Capture the session cookie value from the request headers.
    pub(crate) fn from_headers(ctx: &AuthContext, headers: &HeaderMap) -> Self {
        let raw = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .find_map(|h| read_cookie(h, ctx.cookie_name()))
            .map(str::to_string);
        Self::new(raw, ctx.crypto().clone())
    }

    /// Resolve the identity, unsealing the cookie on first call only.
    pub async fn get(&self) -> Option<Identity> {
        self.resolved
            .get_or_init(|| async {
                let raw = self.raw.as_deref()?;
                match self.crypto.decrypt(raw).await {
                    Ok(payload) => Some(Identity::from(payload)),
                    Err(e) => {
                        tracing::debug!(error = %e, "session cookie did not unseal");
                        None
                    }
                }
            })
            .await
            .clone()
    }
}

impl fmt::Debug for IdentityCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCell")
            .field("has_cookie", &self.raw.is_some())
            .field("resolved", &self.resolved.get().is_some())
            .finish_non_exhaustive()
    }
}

impl<S> FromRequestParts<S> for IdentityCell
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityCell>()
            .cloned()
            .ok_or(AuthError::MissingContext)
    }
}
