//! cookiegate-axum
//!
//! Encrypted-cookie request authentication for axum. Routes registered
//! through [`AuthRouter`] pass through an auth gate before the handler runs:
//!
//! - **Enforced** routes reject requests without a valid session cookie with
//!   `401` and the message `please login`; the handler never runs.
//! - **Optional** routes always run the handler and expose a lazy,
//!   per-request-memoized identity accessor.
//!
//! Identity is resolved from the `authorization` cookie at most once per
//! request, no matter how many times the gate or the handler asks for it.
//! Handlers establish a session with [`Session::sign_in`] (encrypts an
//! application payload into the cookie) and end it with
//! [`Session::sign_out`].
//!
//! ## Quick start
//! ```no_run
//! use std::sync::Arc;
//!
//! use axum::Json;
//! use cookiegate_axum::{AuthContext, AuthMode, AuthRouter, Caller, CookieOverrides, Session};
//! use cookiegate_core::TokenCrypto;
//!
//! async fn profile(caller: Caller) -> Json<serde_json::Value> {
//!     Json(caller.0.into_payload())
//! }
//!
//! async fn login(session: Session) -> Result<impl axum::response::IntoResponse, cookiegate_axum::AuthError> {
//!     let signed_in = session
//!         .sign_in(&serde_json::json!({"userId": 42}), CookieOverrides::default())
//!         .await?;
//!     Ok((signed_in, "welcome"))
//! }
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let crypto = Arc::new(TokenCrypto::from_env("COOKIEGATE_SECRET")?);
//! let ctx = AuthContext::new(crypto);
//! let app: axum::Router = AuthRouter::new(ctx)
//!     .get("/profile", AuthMode::Enforced, profile)
//!     .post("/login", AuthMode::Optional, login)
//!     .into_router();
//! # let _ = app;
//! # Ok(()) }
//! ```

mod context;
mod error;
mod extract;
mod gate;
mod resolve;
mod session;

pub use context::{AuthContext, AuthContextBuilder};
pub use error::AuthError;
pub use extract::Caller;
pub use gate::{AuthMode, AuthRouter, Verb};
pub use resolve::IdentityCell;
pub use session::{Session, SignedIn, SignedOut};

// Re-exported so applications only need this crate in the common case.
pub use cookiegate_core::{CookieOptions, CookieOverrides, Identity, SessionCrypto};
