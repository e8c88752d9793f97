//! Route registration and the auth gate.

use axum::Router;
use axum::extract::{Request, State};
use axum::handler::Handler;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodFilter, any, on};

use crate::AuthError;
use crate::context::AuthContext;
use crate::resolve::IdentityCell;

/// Route policy fixed at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Reject requests without a resolvable identity before the handler runs.
    Enforced,
    /// Always run the handler; identity is exposed lazily and may be absent.
    Optional,
}

/// HTTP verbs the gate registers.
///
/// `Push` is a non-standard verb; axum's `MethodFilter` cannot express it,
/// so those routes accept any method and a guard answers 405 to everything
/// but `PUSH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// PUSH (custom)
    Push,
}

impl Verb {
    /// Method name on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Push => "PUSH",
        }
    }

    fn filter(self) -> Option<MethodFilter> {
        match self {
            Verb::Get => Some(MethodFilter::GET),
            Verb::Post => Some(MethodFilter::POST),
            Verb::Patch => Some(MethodFilter::PATCH),
            Verb::Delete => Some(MethodFilter::DELETE),
            Verb::Push => None,
        }
    }
}

#[derive(Clone)]
struct GateState {
    ctx: AuthContext,
    mode: AuthMode,
}

/// Registers routes behind the auth gate.
///
/// Every route registered here gets the per-request [`IdentityCell`] and the
/// [`AuthContext`] attached to its request extensions, which is what the
/// `Caller`, `IdentityCell`, and `Session` extractors read. Enforced routes
/// additionally force resolution and answer 401 when identity is absent.
pub struct AuthRouter<S = ()> {
    ctx: AuthContext,
    router: Router<S>,
}

impl<S> AuthRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Start a fresh router.
    pub fn new(ctx: AuthContext) -> Self {
        Self {
            ctx,
            router: Router::new(),
        }
    }

    /// Register gated routes onto an existing router.
    pub fn from_router(ctx: AuthContext, router: Router<S>) -> Self {
        Self { ctx, router }
    }

    /// Register a handler for `verb` on `path` under the given mode.
    pub fn route<H, T>(mut self, verb: Verb, path: &str, mode: AuthMode, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let gate = GateState {
            ctx: self.ctx.clone(),
            mode,
        };

        let mut method_router = match verb.filter() {
            Some(filter) => on(filter, handler),
            None => any(handler),
        };
        method_router = method_router.layer(middleware::from_fn_with_state(gate, run_gate));
        if verb == Verb::Push {
            // Outermost, so the method check happens before the gate.
            method_router = method_router.layer(middleware::from_fn(require_push));
        }

        self.router = self.router.route(path, method_router);
        self
    }

    /// Register a GET route.
    pub fn get<H, T>(self, path: &str, mode: AuthMode, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.route(Verb::Get, path, mode, handler)
    }

    /// Register a POST route.
    pub fn post<H, T>(self, path: &str, mode: AuthMode, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.route(Verb::Post, path, mode, handler)
    }

    /// Register a PATCH route.
    pub fn patch<H, T>(self, path: &str, mode: AuthMode, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.route(Verb::Patch, path, mode, handler)
    }

    /// Register a DELETE route.
    pub fn delete<H, T>(self, path: &str, mode: AuthMode, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.route(Verb::Delete, path, mode, handler)
    }

    /// Register a PUSH route (the host application's custom verb).
    pub fn push<H, T>(self, path: &str, mode: AuthMode, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.route(Verb::Push, path, mode, handler)
    }

    /// The context routes were registered with.
    pub fn context(&self) -> &AuthContext {
        &self.ctx
    }

    /// Finish registration.
    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

async fn run_gate(State(gate): State<GateState>, mut req: Request, next: Next) -> Response {
    let cell = IdentityCell::from_headers(&gate.ctx, req.headers());
    req.extensions_mut().insert(gate.ctx.clone());
    req.extensions_mut().insert(cell.clone());

    match gate.mode {
        AuthMode::Enforced => {
            if cell.get().await.is_none() {
                tracing::debug!(path = %req.uri().path(), "rejecting unauthenticated request");
                return AuthError::Unauthorized.into_response();
            }
            next.run(req).await
        }
        AuthMode::Optional => next.run(req).await,
    }
}

async fn require_push(req: Request, next: Next) -> Response {
    if req.method().as_str() == "PUSH" {
        next.run(req).await
    } else {
        StatusCode::METHOD_NOT_ALLOWED.into_response()
    }
}
