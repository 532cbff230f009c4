//! Prefix-scoped route registration.
//!
//! Groups exist only at setup time. Every group created on an engine lands
//! in one flat, creation-ordered list; at dispatch the engine concatenates
//! the middleware of every group whose prefix is a textual prefix of the
//! request path, in that creation order. A group registered later with a
//! shorter overlapping prefix therefore still applies to matching paths.

use crate::engine::Engine;
use crate::handler::{BoxHandler, Handler};
use http::Method;
use std::sync::Arc;

/// A registered prefix scope: its combined prefix and its own middleware.
pub(crate) struct Group {
    pub(crate) prefix: String,
    pub(crate) middlewares: Vec<BoxHandler>,
}

impl Group {
    pub(crate) fn root() -> Self {
        Group {
            prefix: String::new(),
            middlewares: Vec::new(),
        }
    }

    pub(crate) fn new(prefix: String) -> Self {
        Group {
            prefix,
            middlewares: Vec::new(),
        }
    }
}

/// A registration handle scoped to a group's prefix.
///
/// ```
/// use tern::{Context, Engine, HandlerFuture};
///
/// fn ping(cx: &mut Context) -> HandlerFuture<'_> {
///     Box::pin(async move { cx.text("pong") })
/// }
///
/// # fn run() -> tern::Result<()> {
/// let mut app = Engine::default();
/// let mut api = app.group("/api");
/// api.get("/ping", ping)?; // serves GET /api/ping
/// let mut v2 = api.group("/v2");
/// v2.get("/ping", ping)?; // serves GET /api/v2/ping
/// # Ok(())
/// # }
/// # run().unwrap();
/// ```
pub struct RouterGroup<'e> {
    engine: &'e mut Engine,
    index: usize,
}

impl<'e> RouterGroup<'e> {
    pub(crate) fn new(engine: &'e mut Engine, index: usize) -> Self {
        RouterGroup { engine, index }
    }

    /// The group's combined prefix.
    pub fn prefix(&self) -> &str {
        &self.engine.groups[self.index].prefix
    }

    /// Creates a child group whose prefix is this group's prefix followed
    /// by `prefix`.
    pub fn group(&mut self, prefix: &str) -> RouterGroup<'_> {
        let combined = format!("{}{}", self.prefix(), prefix);
        let index = self.engine.push_group(combined);
        RouterGroup {
            engine: &mut *self.engine,
            index,
        }
    }

    /// Appends middleware to this group only; ancestors and siblings are
    /// unaffected.
    pub fn middleware<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.engine.groups[self.index]
            .middlewares
            .push(Arc::new(handler));
        self
    }

    /// Registers a route under this group's prefix.
    pub fn route<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> crate::Result<&mut Self> {
        let full = format!("{}{}", self.prefix(), pattern);
        self.engine.add_route_arc(method, &full, Arc::new(handler))?;
        Ok(self)
    }

    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn patch<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::PATCH, pattern, handler)
    }

    pub fn delete<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::DELETE, pattern, handler)
    }

    pub fn head<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::HEAD, pattern, handler)
    }

    pub fn options<H: Handler>(&mut self, pattern: &str, handler: H) -> crate::Result<&mut Self> {
        self.route(Method::OPTIONS, pattern, handler)
    }
}
