//! The dispatcher shell: wires the router and the database together and
//! runs one handler per request.
//!
//! Request and response are plain values threaded through explicitly; there
//! is no ambient request state anywhere. Handlers receive a [`Context`]
//! carrying the request, the captured path parameters, and the database
//! handle to check a connection out of.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DbError;
use crate::pool::{Database, DbConnection};
use crate::router::{Dispatch, Method, PathParams, Router};

/// One incoming request, as handed to [`App::handle`].
#[derive(Debug, Clone)]
pub struct Request {
    /// Raw method text; unknown methods fall through to the 404 path.
    pub method: String,
    pub path: String,
    pub body: Option<String>,
}

impl Request {
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// The response a handler produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    #[must_use]
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(404, "Not Found")
    }

    #[must_use]
    pub fn server_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

/// Everything a handler gets for one request.
pub struct Context {
    pub request: Request,
    pub params: PathParams,
    db: Database,
}

impl Context {
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Check a connection out of the pool for this request.
    ///
    /// # Errors
    /// Returns the pool error when no connection can be provided.
    pub async fn acquire(&self) -> Result<DbConnection, DbError> {
        self.db.acquire().await
    }
}

/// A request handler. Controllers implement this (or use [`FnHandler`]).
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, ctx: Context) -> Result<Response, DbError>;
}

/// Shared, cloneable handler reference stored in the route table.
pub type SharedHandler = Arc<dyn Handler>;

/// Adapter turning an async function into a [`Handler`].
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<Response, DbError>> + Send,
{
    async fn call(&self, ctx: Context) -> Result<Response, DbError> {
        (self.0)(ctx).await
    }
}

/// Wrap an async function as a [`SharedHandler`].
pub fn handler<F, Fut>(f: F) -> SharedHandler
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<Response, DbError>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// The application shell: one router, one database, one optional not-found
/// handler.
pub struct App {
    router: Router<SharedHandler>,
    db: Database,
    not_found: Option<SharedHandler>,
}

impl App {
    #[must_use]
    pub fn new(router: Router<SharedHandler>, db: Database) -> Self {
        Self {
            router,
            db,
            not_found: None,
        }
    }

    /// Install a handler for requests no route matches.
    #[must_use]
    pub fn with_not_found(mut self, handler: SharedHandler) -> Self {
        self.not_found = Some(handler);
        self
    }

    #[must_use]
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Dispatch one request and run the resolved handler.
    ///
    /// Handler errors never escape: they are logged and rendered as a 500,
    /// so a driver failure or a transaction-state bug in a controller cannot
    /// take the worker down.
    pub async fn handle(&self, request: Request) -> Response {
        let Ok(method) = request.method.parse::<Method>() else {
            tracing::debug!(method = %request.method, "request used an unroutable method");
            return self.render_not_found(request).await;
        };

        match self.router.dispatch(method, &request.path) {
            Dispatch::Matched(matched) => {
                tracing::debug!(method = %method, template = matched.template, "dispatching");
                let handler = Arc::clone(matched.handler);
                let ctx = Context {
                    request,
                    params: matched.params,
                    db: self.db.clone(),
                };
                match handler.call(ctx).await {
                    Ok(response) => response,
                    Err(err) => {
                        tracing::error!(error = %err, "handler failed");
                        Response::server_error()
                    }
                }
            }
            Dispatch::NotFound => self.render_not_found(request).await,
        }
    }

    async fn render_not_found(&self, request: Request) -> Response {
        let Some(handler) = &self.not_found else {
            return Response::not_found();
        };
        let ctx = Context {
            request,
            params: PathParams::default(),
            db: self.db.clone(),
        };
        match handler.call(ctx).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "not-found handler failed");
                Response::server_error()
            }
        }
    }
}
