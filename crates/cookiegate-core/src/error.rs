//! Error types.

use thiserror::Error;

/// Crate result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or input (cookie name, path, key material).
    #[error("validation error: {0}")]
    Validation(String),

    /// Sealing a payload failed. Surfaced to the sign-in caller; no cookie
    /// is written when this happens.
    #[error("failed to seal session payload: {0}")]
    Encrypt(String),

    /// Unsealing a token failed (malformed, tampered, wrong key, expired).
    /// Identity resolution converts this to an absent identity.
    #[error("failed to unseal session token: {0}")]
    Decrypt(String),

    /// JSON conversion error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
