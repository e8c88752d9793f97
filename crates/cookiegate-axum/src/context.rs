//! The middleware value holding collaborator handles.

use std::fmt;
use std::sync::Arc;

use cookiegate_core::{CookieOptions, Result, SESSION_COOKIE, SessionCrypto, build_clear_cookie};

struct Inner {
    crypto: Arc<dyn SessionCrypto>,
    cookie_name: String,
    defaults: CookieOptions,
}

/// Collaborators and cookie policy for the auth layer, constructed once at
/// startup and injected into route registration.
///
/// Cloning is cheap; every clone shares the same crypto handle and policy.
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<Inner>,
}

impl AuthContext {
    /// Build a context with the default cookie name (`authorization`) and
    /// the default sign-in cookie policy.
    pub fn new(crypto: Arc<dyn SessionCrypto>) -> Self {
        Self {
            inner: Arc::new(Inner {
                crypto,
                cookie_name: SESSION_COOKIE.to_string(),
                defaults: CookieOptions::default(),
            }),
        }
    }

    /// Start building a context with a custom cookie name or policy.
    pub fn builder() -> AuthContextBuilder {
        AuthContextBuilder::default()
    }

    /// Name of the session cookie.
    pub fn cookie_name(&self) -> &str {
        &self.inner.cookie_name
    }

    /// Default cookie attributes applied at sign-in.
    pub fn cookie_defaults(&self) -> &CookieOptions {
        &self.inner.defaults
    }

    pub(crate) fn crypto(&self) -> &Arc<dyn SessionCrypto> {
        &self.inner.crypto
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("cookie_name", &self.inner.cookie_name)
            .field("defaults", &self.inner.defaults)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AuthContext`].
///
/// Construction fails fast when a required collaborator is missing or the
/// cookie configuration is invalid, rather than failing per request.
#[derive(Default)]
pub struct AuthContextBuilder {
    crypto: Option<Arc<dyn SessionCrypto>>,
    cookie_name: Option<String>,
    defaults: Option<CookieOptions>,
}

impl AuthContextBuilder {
    /// Set the crypto collaborator. Required.
    #[must_use]
    pub fn crypto(mut self, crypto: Arc<dyn SessionCrypto>) -> Self {
        self.crypto = Some(crypto);
        self
    }

    /// Override the session cookie name.
    #[must_use]
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = Some(name.into());
        self
    }

    /// Override the default cookie attributes.
    #[must_use]
    pub fn cookie_defaults(mut self, defaults: CookieOptions) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Build the context, validating the cookie configuration.
    pub fn build(self) -> Result<AuthContext> {
        let crypto = self.crypto.ok_or_else(|| {
            cookiegate_core::Error::Validation("crypto collaborator is required".to_string())
        })?;
        let cookie_name = self
            .cookie_name
            .unwrap_or_else(|| SESSION_COOKIE.to_string());
        let defaults = self.defaults.unwrap_or_default();

        // The header builders validate name and path; probe once here so a
        // bad configuration surfaces at startup.
        build_clear_cookie(&cookie_name, &defaults)?;

        Ok(AuthContext {
            inner: Arc::new(Inner {
                crypto,
                cookie_name,
                defaults,
            }),
        })
    }
}

impl fmt::Debug for AuthContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContextBuilder")
            .field("cookie_name", &self.cookie_name)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::token_crypto;

    #[test]
    fn builder_requires_crypto() {
        assert!(AuthContext::builder().build().is_err());
    }

    #[test]
    fn builder_rejects_bad_cookie_name() {
        let result = AuthContext::builder()
            .crypto(Arc::new(token_crypto()))
            .cookie_name("bad;name")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn defaults_match_sign_in_policy() {
        let ctx = AuthContext::new(Arc::new(token_crypto()));
        assert_eq!(ctx.cookie_name(), "authorization");
        assert_eq!(ctx.cookie_defaults().path, "/");
        assert_eq!(ctx.cookie_defaults().max_age_seconds, 86_400);
        assert!(ctx.cookie_defaults().http_only);
        assert!(ctx.cookie_defaults().secure);
    }
}
