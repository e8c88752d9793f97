//! The reversible seal/unseal collaborator and its token-based implementation.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Reversible encryption of session payloads.
///
/// `encrypt` turns an application payload into an opaque token carried in the
/// session cookie; `decrypt` recovers the payload and must fail on any
/// invalid, tampered, or expired token. Both operations are async so
/// implementations may offload CPU-bound work or call out to a KMS without
/// blocking other requests.
#[async_trait]
pub trait SessionCrypto: Send + Sync {
    /// Seal a payload into a cookie-safe token.
    async fn encrypt(&self, payload: &Value) -> Result<String>;

    /// Unseal a token back into the payload it was sealed from.
    async fn decrypt(&self, token: &str) -> Result<Value>;
}

const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    data: Value,
    iat: u64,
    exp: u64,
}

/// HS256 token sealing over a shared secret.
///
/// Payloads are wrapped in signed claims with issued-at and expiry stamps;
/// decoding rejects tampered tokens, tokens signed with a different key, and
/// tokens past their expiry (with a small leeway for clock skew). The token
/// TTL defaults to the cookie's default Max-Age so both expire together.
pub struct TokenCrypto {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_seconds: u64,
    leeway_seconds: u64,
}

impl TokenCrypto {
    /// Build from raw secret bytes.
    ///
    /// Secrets shorter than 32 bytes are rejected so a misconfigured
    /// deployment fails at startup, not per request.
    pub fn from_secret(secret: &[u8]) -> Result<Self> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(Error::Validation(format!(
                "session secret must be at least {MIN_SECRET_BYTES} bytes, got {}",
                secret.len()
            )));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_seconds: 86_400,
            leeway_seconds: 60,
        })
    }

    /// Build from a secret stored in an environment variable.
    pub fn from_env(var: &str) -> Result<Self> {
        let secret = std::env::var(var)
            .map_err(|_| Error::Validation(format!("missing secret env var {var}")))?;
        Self::from_secret(secret.as_bytes())
    }

    /// Set the token TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_seconds = ttl.as_secs();
        self
    }

    /// Set the clock-skew leeway applied when validating expiry.
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway_seconds = leeway.as_secs();
        self
    }
}

#[async_trait]
impl SessionCrypto for TokenCrypto {
    async fn encrypt(&self, payload: &Value) -> Result<String> {
        let now = now_epoch_secs();
        let claims = Claims {
            data: payload.clone(),
            iat: now,
            exp: now + self.ttl_seconds,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| Error::Encrypt(e.to_string()))
    }

    async fn decrypt(&self, token: &str) -> Result<Value> {
        if token.is_empty() {
            return Err(Error::Decrypt("empty token".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_seconds;
        validation.validate_exp = true;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| Error::Decrypt(e.to_string()))?;
        Ok(data.claims.data)
    }
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn crypto() -> TokenCrypto {
        TokenCrypto::from_secret(SECRET).unwrap()
    }

    #[tokio::test]
    async fn round_trip() {
        let c = crypto();
        let payload = serde_json::json!({"userId": 42, "name": "ada"});
        let token = c.encrypt(&payload).await.unwrap();
        assert_eq!(c.decrypt(&token).await.unwrap(), payload);
    }

    #[tokio::test]
    async fn tampered_token_fails() {
        let c = crypto();
        let token = c.encrypt(&serde_json::json!({"userId": 42})).await.unwrap();

        // Flip one character of the signature.
        let mut bytes = token.into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = if bytes[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(matches!(
            c.decrypt(&tampered).await,
            Err(Error::Decrypt(_))
        ));
    }

    #[tokio::test]
    async fn wrong_key_fails() {
        let token = crypto()
            .encrypt(&serde_json::json!({"userId": 42}))
            .await
            .unwrap();
        let other = TokenCrypto::from_secret(b"ffffffffffffffffffffffffffffffff").unwrap();
        assert!(other.decrypt(&token).await.is_err());
    }

    #[tokio::test]
    async fn expired_token_fails() {
        let c = crypto()
            .with_ttl(Duration::from_secs(0))
            .with_leeway(Duration::from_secs(0));
        let token = c.encrypt(&serde_json::json!({"userId": 42})).await.unwrap();

        // exp == iat and no leeway, so the token is stale one second later.
        std::thread::sleep(Duration::from_millis(1_100));
        assert!(c.decrypt(&token).await.is_err());
    }

    #[tokio::test]
    async fn garbage_tokens_fail() {
        let c = crypto();
        assert!(c.decrypt("").await.is_err());
        assert!(c.decrypt("not-a-token").await.is_err());
        assert!(c.decrypt("a.b.c").await.is_err());
    }

    #[test]
    fn short_secret_rejected() {
        assert!(matches!(
            TokenCrypto::from_secret(b"short"),
            Err(Error::Validation(_))
        ));
    }
}
