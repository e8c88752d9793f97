//! cookiegate-core
//!
//! Framework-independent pieces of the cookiegate session layer:
//!
//! - **`Identity`** — the opaque, application-defined payload recovered from a
//!   decrypted session cookie
//! - **`SessionCrypto`** — the reversible seal/unseal collaborator, with
//!   `TokenCrypto` as a batteries-included HS256 implementation
//! - **Cookie helpers** — `CookieOptions` with the defaulted sign-in policy
//!   (`Path=/`, `Max-Age=86400`, `HttpOnly`, `Secure`), per-field overrides,
//!   and `Set-Cookie`/`Cookie` header construction and reading
//!
//! The axum integration lives in `cookiegate-axum`; this crate has no HTTP
//! framework dependency so other front ends can reuse the same primitives.
//!
//! ## Quick start
//! ```
//! use cookiegate_core::{SessionCrypto, TokenCrypto};
//!
//! # async fn demo() -> cookiegate_core::Result<()> {
//! let crypto = TokenCrypto::from_secret(b"an-example-secret-of-32-bytes-ok")?;
//! let token = crypto.encrypt(&serde_json::json!({"userId": 42})).await?;
//! let payload = crypto.decrypt(&token).await?;
//! assert_eq!(payload["userId"], 42);
//! # Ok(()) }
//! ```

#![forbid(unsafe_code)]

mod cookie;
mod crypto;
mod error;
mod identity;

pub use cookie::{
    CookieOptions, CookieOverrides, SESSION_COOKIE, build_clear_cookie, build_set_cookie,
    read_cookie,
};
pub use crypto::{SessionCrypto, TokenCrypto};
pub use error::{Error, Result};
pub use identity::Identity;
